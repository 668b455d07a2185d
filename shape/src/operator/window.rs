use super::{pad, Operator, PadDim};
use crate::{udim, Name, Names, Result, Shape, ShapeError};
use log::trace;
use serde::{Deserialize, Serialize};
use std::iter::zip;

/// How a windowed operation pads its input.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// No padding.
    Valid,
    /// Enough padding for the output to cover `ceil(dim / stride)` windows.
    Same,
    /// Explicit `(low, high)` per padded axis.
    Explicit(Vec<(udim, udim)>),
}

impl Padding {
    /// `(low, high)` for every axis of `shape`.
    pub fn resolve(
        &self,
        shape: &[udim],
        window: &[udim],
        strides: &[udim],
    ) -> Result<Vec<(udim, udim)>> {
        match self {
            Self::Valid => Ok(vec![(0, 0); shape.len()]),
            Self::Same => same_padding(shape, window, strides),
            Self::Explicit(config) if config.len() == shape.len() => Ok(config.clone()),
            Self::Explicit(config) => Err(ShapeError::RankMismatch {
                what: "padding",
                expected: shape.len(),
                actual: config.len(),
            }),
        }
    }
}

/// Sliding-window reduction such as pooling.
pub struct WindowReduce {
    pub window: Shape,
    pub strides: Shape,
    pub padding: Padding,
}

impl Operator for WindowReduce {
    #[inline]
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        let shape = window_reduce(shape, &self.window, &self.strides, &self.padding)?;
        Ok((shape, Names::from(names)))
    }
}

fn validate_extents(shape: &[udim], extents: &[udim], what: &'static str) -> Result<()> {
    if extents.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            what,
            expected: shape.len(),
            actual: extents.len(),
        });
    }
    match extents.iter().position(|&e| e == 0) {
        Some(axis) => Err(ShapeError::ZeroExtent { what, axis }),
        None => Ok(()),
    }
}

/// Checks a window has one positive extent per axis.
#[inline]
pub fn validate_window(shape: &[udim], window: &[udim]) -> Result<()> {
    validate_extents(shape, window, "window")
}

/// Checks strides have one positive entry per axis.
#[inline]
pub fn validate_strides(shape: &[udim], strides: &[udim]) -> Result<()> {
    validate_extents(shape, strides, "strides")
}

/// Number of window positions along each axis, at least one.
pub fn window_output_shape(shape: &[udim], window: &[udim], strides: &[udim]) -> Result<Shape> {
    validate_window(shape, window)?;
    validate_strides(shape, strides)?;
    Ok(zip(shape, zip(window, strides))
        .map(|(&d, (&w, &s))| {
            let n = (d as i64 - w as i64).div_euclid(s as i64) + 1;
            n.max(1) as udim
        })
        .collect())
}

/// Padding that keeps `ceil(dim / stride)` outputs, split with the extra element high.
pub fn same_padding(
    shape: &[udim],
    window: &[udim],
    strides: &[udim],
) -> Result<Vec<(udim, udim)>> {
    validate_window(shape, window)?;
    validate_strides(shape, strides)?;
    Ok(zip(shape, zip(window, strides))
        .map(|(&d, (&w, &s))| {
            let out = d.div_ceil(s) as i64;
            let total = ((out - 1) * s as i64 + w as i64 - d as i64).max(0) as udim;
            (total / 2, total - total / 2)
        })
        .collect())
}

/// [`same_padding`] with unit strides.
#[inline]
pub fn same_padding_unit(shape: &[udim], window: &[udim]) -> Result<Vec<(udim, udim)>> {
    same_padding(shape, window, &vec![1; shape.len()])
}

/// Output shape of a padded sliding-window reduction.
pub fn window_reduce(
    shape: &[udim],
    window: &[udim],
    strides: &[udim],
    padding: &Padding,
) -> Result<Shape> {
    validate_window(shape, window)?;
    validate_strides(shape, strides)?;
    let config = padding
        .resolve(shape, window, strides)?
        .into_iter()
        .map(|(low, high)| PadDim::new(low, high, 0))
        .collect::<Vec<_>>();
    let padded = pad(shape, &config)?;
    let output = window_output_shape(&padded, window, strides)?;
    trace!("window {window:?} over {padded:?} yields {output:?}");
    Ok(output)
}

#[test]
fn test_output_shape() {
    let shape = window_output_shape(&[4, 6, 7], &[2, 3, 7], &[2, 1, 1]).unwrap();
    assert_eq!(shape.as_slice(), &[2, 4, 1]);
    // a window wider than the axis still yields one position
    let shape = window_output_shape(&[2, 3], &[5, 4], &[2, 1]).unwrap();
    assert_eq!(shape.as_slice(), &[1, 1]);
}

#[test]
fn test_validate() {
    assert_eq!(
        validate_window(&[4, 4], &[2]),
        Err(ShapeError::RankMismatch {
            what: "window",
            expected: 2,
            actual: 1,
        })
    );
    assert_eq!(
        validate_strides(&[4, 4], &[1, 1, 1]),
        Err(ShapeError::RankMismatch {
            what: "strides",
            expected: 2,
            actual: 3,
        })
    );
    assert_eq!(
        window_output_shape(&[4, 4], &[2, 2], &[1, 0]),
        Err(ShapeError::ZeroExtent {
            what: "strides",
            axis: 1,
        })
    );
}

#[test]
fn test_same_padding() {
    assert_eq!(
        same_padding(&[4, 4], &[2, 2], &[1, 1]).unwrap(),
        [(0, 1), (0, 1)]
    );
    assert_eq!(same_padding_unit(&[4, 4], &[2, 2]).unwrap(), [(0, 1), (0, 1)]);
    assert_eq!(
        same_padding(&[5, 6], &[3, 3], &[2, 2]).unwrap(),
        [(1, 1), (0, 1)]
    );
    assert_eq!(same_padding(&[8], &[1], &[4]).unwrap(), [(0, 0)]);
}

#[test]
fn test_window_reduce() {
    let shape = window_reduce(&[1, 8, 8, 3], &[1, 3, 3, 1], &[1, 2, 2, 1], &Padding::Same).unwrap();
    assert_eq!(shape.as_slice(), &[1, 4, 4, 3]);
    let shape =
        window_reduce(&[1, 8, 8, 3], &[1, 3, 3, 1], &[1, 2, 2, 1], &Padding::Valid).unwrap();
    assert_eq!(shape.as_slice(), &[1, 3, 3, 3]);
    let explicit = Padding::Explicit(vec![(0, 0), (1, 1), (1, 1), (0, 0)]);
    let (shape, _) = WindowReduce {
        window: Shape::from_slice(&[1, 3, 3, 1]),
        strides: Shape::from_slice(&[1, 1, 1, 1]),
        padding: explicit,
    }
    .infer(&[1, 8, 8, 3], &crate::unnamed(4))
    .unwrap();
    assert_eq!(shape.as_slice(), &[1, 8, 8, 3]);
    assert!(matches!(
        window_reduce(&[8, 8], &[3, 3], &[1, 1], &Padding::Explicit(vec![(1, 1)])),
        Err(ShapeError::RankMismatch {
            what: "padding",
            ..
        })
    ));
}

#[test]
fn test_serde() {
    let modes: Vec<Padding> = serde_json::from_str(r#"["valid","same",{"explicit":[[0,1]]}]"#).unwrap();
    assert_eq!(
        modes,
        [Padding::Valid, Padding::Same, Padding::Explicit(vec![(0, 1)])]
    );
}
