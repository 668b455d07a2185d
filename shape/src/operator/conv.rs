use super::{check_names, pad, validate_strides, PadDim};
use crate::{udim, Name, Names, Result, Shape, ShapeError};
use log::trace;

/// Output of convolving `(batch, in_channels, *spatial)` with a kernel shaped
/// `(out_channels, in_channels, *filter)`.
///
/// `padding` holds `(low, high)` for each spatial axis. The input names are
/// passed through untouched even though the channel axis changes meaning.
pub fn conv_output_shape(
    input_shape: &[udim],
    input_names: &[Name],
    kernel_shape: &[udim],
    strides: &[udim],
    padding: &[(udim, udim)],
) -> Result<(Shape, Names)> {
    let &[batch, in_channels, ref spatial @ ..] = input_shape else {
        return Err(ShapeError::RankMismatch {
            what: "convolution input",
            expected: 2,
            actual: input_shape.len(),
        });
    };
    check_names(input_shape, input_names)?;
    if kernel_shape.len() != input_shape.len() {
        return Err(ShapeError::RankMismatch {
            what: "kernel",
            expected: input_shape.len(),
            actual: kernel_shape.len(),
        });
    }
    validate_strides(spatial, strides)?;
    if padding.len() != spatial.len() {
        return Err(ShapeError::RankMismatch {
            what: "padding",
            expected: spatial.len(),
            actual: padding.len(),
        });
    }
    let (out_channels, filter) = (kernel_shape[0], &kernel_shape[2..]);
    if kernel_shape[1] != in_channels {
        return Err(ShapeError::DimensionMismatch {
            axis1: 1,
            dim1: in_channels,
            axis2: 1,
            dim2: kernel_shape[1],
        });
    }

    let config = [PadDim::default(); 2]
        .into_iter()
        .chain(padding.iter().map(|&(low, high)| PadDim::new(low, high, 0)))
        .collect::<Vec<_>>();
    let padded = pad(input_shape, &config)?;

    let mut shape = Shape::with_capacity(input_shape.len());
    shape.push(batch);
    shape.push(out_channels);
    for (i, ((&d, &f), &s)) in padded[2..].iter().zip(filter).zip(strides).enumerate() {
        if f > d {
            return Err(ShapeError::KernelTooLarge {
                axis: i + 2,
                padded: d,
                filter: f,
            });
        }
        shape.push((d - f) / s + 1);
    }
    trace!("conv {input_shape:?} * {kernel_shape:?} -> {shape:?}");
    Ok((shape, Names::from(input_names)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{same_padding, unnamed, Label};

    #[test]
    fn test_valid() {
        let (shape, names) =
            conv_output_shape(&[1, 3, 224, 224], &unnamed(4), &[64, 3, 7, 7], &[2, 2], &[(3, 3), (3, 3)])
                .unwrap();
        assert_eq!(shape.as_slice(), &[1, 64, 112, 112]);
        assert_eq!(names.len(), 4);

        let (shape, _) =
            conv_output_shape(&[2, 1, 5], &unnamed(3), &[4, 1, 3], &[1], &[(0, 0)]).unwrap();
        assert_eq!(shape.as_slice(), &[2, 4, 3]);
    }

    #[test]
    fn test_same() {
        let spatial = [9, 9];
        let padding = same_padding(&spatial, &[3, 3], &[1, 1]).unwrap();
        let (shape, _) =
            conv_output_shape(&[8, 16, 9, 9], &unnamed(4), &[32, 16, 3, 3], &[1, 1], &padding)
                .unwrap();
        assert_eq!(shape.as_slice(), &[8, 32, 9, 9]);
    }

    #[test]
    fn test_names_pass_through() {
        let names: Names = ["batch", "channels", "height", "width"]
            .into_iter()
            .map(|n| Some(Label::from(n)))
            .collect();
        let (_, out) =
            conv_output_shape(&[1, 3, 4, 4], &names, &[6, 3, 2, 2], &[1, 1], &[(0, 0), (0, 0)])
                .unwrap();
        assert_eq!(out, names);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            conv_output_shape(&[3], &unnamed(1), &[3], &[], &[]),
            Err(ShapeError::RankMismatch {
                what: "convolution input",
                ..
            })
        ));
        assert!(matches!(
            conv_output_shape(&[1, 3, 5], &unnamed(3), &[4, 3, 2, 2], &[1], &[(0, 0)]),
            Err(ShapeError::RankMismatch { what: "kernel", .. })
        ));
        assert!(matches!(
            conv_output_shape(&[1, 3, 5], &unnamed(3), &[4, 3, 2], &[1, 1], &[(0, 0)]),
            Err(ShapeError::RankMismatch {
                what: "strides",
                ..
            })
        ));
        assert!(matches!(
            conv_output_shape(&[1, 3, 5], &unnamed(3), &[4, 3, 2], &[0], &[(0, 0)]),
            Err(ShapeError::ZeroExtent { .. })
        ));
        assert_eq!(
            conv_output_shape(&[1, 3, 5], &unnamed(3), &[4, 2, 2], &[1], &[(0, 0)]),
            Err(ShapeError::DimensionMismatch {
                axis1: 1,
                dim1: 3,
                axis2: 1,
                dim2: 2,
            })
        );
        assert_eq!(
            conv_output_shape(&[1, 3, 2], &unnamed(3), &[4, 3, 5], &[1], &[(1, 1)]),
            Err(ShapeError::KernelTooLarge {
                axis: 2,
                padded: 4,
                filter: 5,
            })
        );
        assert!(matches!(
            conv_output_shape(&[1, 3, 5], &unnamed(2), &[4, 3, 2], &[1], &[(0, 0)]),
            Err(ShapeError::RankMismatch { what: "names", .. })
        ));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            conv_output_shape(&[1, 1, udim::MAX], &unnamed(3), &[1, 1, 1], &[1], &[(1, 0)]),
            Err(ShapeError::DimOverflow { axis: 2 })
        );
    }
}
