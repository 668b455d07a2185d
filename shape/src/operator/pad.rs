use super::Operator;
use crate::{udim, Name, Names, Result, Shape, ShapeError};
use serde::{Deserialize, Serialize};
use std::iter::zip;

/// Padding along one axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct PadDim {
    /// Elements prepended.
    pub low: udim,
    /// Elements appended.
    pub high: udim,
    /// Elements inserted between each pair of neighbours.
    #[serde(default)]
    pub interior: udim,
}

impl PadDim {
    #[inline]
    pub const fn new(low: udim, high: udim, interior: udim) -> Self {
        Self {
            low,
            high,
            interior,
        }
    }

    /// Size of an axis of `size` elements after padding, `None` if it overflows.
    pub fn apply(&self, size: udim) -> Option<udim> {
        // an empty axis has no gaps, so it pads to `low + high` whatever `interior` is
        size.saturating_sub(1)
            .checked_mul(self.interior)?
            .checked_add(size)?
            .checked_add(self.low)?
            .checked_add(self.high)
    }
}

#[repr(transparent)]
pub struct Pad(pub Vec<PadDim>);

impl Operator for Pad {
    #[inline]
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        Ok((pad(shape, &self.0)?, Names::from(names)))
    }
}

/// Shape after applying `config` axis by axis.
pub fn pad(shape: &[udim], config: &[PadDim]) -> Result<Shape> {
    if config.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            what: "padding config",
            expected: shape.len(),
            actual: config.len(),
        });
    }
    zip(shape, config)
        .enumerate()
        .map(|(axis, (&d, p))| p.apply(d).ok_or(ShapeError::DimOverflow { axis }))
        .collect()
}

#[test]
fn test() {
    let shape = pad(
        &[5, 6, 7],
        &[PadDim::new(1, 2, 0), PadDim::new(0, 0, 1), PadDim::new(3, 0, 2)],
    )
    .unwrap();
    assert_eq!(shape.as_slice(), &[8, 11, 22]);
    assert_eq!(
        pad(&[5, 6], &[PadDim::default()]),
        Err(ShapeError::RankMismatch {
            what: "padding config",
            expected: 2,
            actual: 1,
        })
    );
    assert!(pad(&[], &[]).unwrap().is_empty());
}

#[test]
fn test_formula() {
    for size in 1..6 {
        for low in 0..3 {
            for high in 0..3 {
                for interior in 0..3 {
                    let config = PadDim::new(low, high, interior);
                    let shape = pad(&[size], &[config]).unwrap();
                    assert_eq!(shape[0], size + (size - 1) * interior + low + high);
                }
            }
        }
    }
    assert_eq!(PadDim::new(1, 2, 5).apply(0), Some(3));
}

#[test]
fn test_overflow() {
    assert_eq!(
        pad(&[70_000], &[PadDim::new(0, 0, 70_000)]),
        Err(ShapeError::DimOverflow { axis: 0 })
    );
    assert_eq!(
        pad(&[3, udim::MAX], &[PadDim::default(), PadDim::new(1, 0, 0)]),
        Err(ShapeError::DimOverflow { axis: 1 })
    );
    assert_eq!(PadDim::new(0, 0, 0).apply(udim::MAX), Some(udim::MAX));
}

#[test]
fn test_serde() {
    let config: Vec<PadDim> =
        serde_json::from_str(r#"[{"low":1,"high":2},{"low":0,"high":0,"interior":1}]"#).unwrap();
    assert_eq!(config, [PadDim::new(1, 2, 0), PadDim::new(0, 0, 1)]);
}
