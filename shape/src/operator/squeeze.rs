use super::{contract, Operator};
use crate::{udim, Axes, Name, Names, Result, Shape, ShapeError};
use log::debug;

/// Removes size-1 axes; without explicit axes every size-1 axis goes.
pub struct Squeeze {
    pub axes: Option<Axes>,
}

impl Operator for Squeeze {
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        match &self.axes {
            Some(axes) => squeeze(shape, axes, names),
            None => {
                let axes = squeeze_axes(shape);
                debug!("default squeeze axes {axes:?}");
                squeeze(shape, &axes, names)
            }
        }
    }
}

/// Removes `axes`, each of which must have size 1.
pub fn squeeze(shape: &[udim], axes: &[usize], names: &[Name]) -> Result<(Shape, Names)> {
    for &axis in axes {
        match shape.get(axis) {
            Some(1) => {}
            Some(&size) => return Err(ShapeError::SqueezeNonUnitDim { axis, size }),
            None => {
                return Err(ShapeError::AxisOutOfRange {
                    axis: axis as _,
                    rank: shape.len(),
                })
            }
        }
    }
    contract(shape, axes, names)
}

/// Every axis of size 1, ascending.
pub fn squeeze_axes(shape: &[udim]) -> Axes {
    shape
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 1)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test() {
    use crate::Label;

    let names = [Some(Label::from("n")), None, Some(Label::from("h")), None];
    let (shape, kept) = squeeze(&[1, 3, 224, 1], &[0, 3], &names).unwrap();
    assert_eq!(shape.as_slice(), &[3, 224]);
    assert_eq!(kept.as_slice(), &[None, names[2].clone()]);

    assert_eq!(
        squeeze(&[1, 3, 224, 1], &[1], &names),
        Err(ShapeError::SqueezeNonUnitDim { axis: 1, size: 3 })
    );
    assert!(matches!(
        squeeze(&[1, 3], &[2], &names[..2]),
        Err(ShapeError::AxisOutOfRange { axis: 2, rank: 2 })
    ));
}

#[test]
fn test_default_axes() {
    let shape = [1, 5, 1, 1, 7];
    let axes = squeeze_axes(&shape);
    assert_eq!(axes.as_slice(), &[0, 2, 3]);

    let names = crate::unnamed(shape.len());
    for mask in 0..(1 << axes.len()) {
        let subset = axes
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &a)| a)
            .collect::<Axes>();
        let (squeezed, _) = squeeze(&shape, &subset, &names).unwrap();
        assert_eq!(squeezed.len(), shape.len() - subset.len());
    }
    for axis in [1, 4] {
        assert!(matches!(
            squeeze(&shape, &[axis], &names),
            Err(ShapeError::SqueezeNonUnitDim { .. })
        ));
    }

    let (shape, _) = Squeeze { axes: None }.infer(&shape, &names).unwrap();
    assert_eq!(shape.as_slice(), &[5, 7]);
}
