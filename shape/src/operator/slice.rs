use super::Operator;
use crate::{udim, Name, Names, Result, Shape, ShapeError};
use serde::{Deserialize, Serialize};

/// Strided range `start..limit` along one axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SliceDim {
    pub start: udim,
    pub limit: udim,
    #[serde(default = "unit_stride")]
    pub stride: udim,
}

#[inline]
const fn unit_stride() -> udim {
    1
}

#[macro_export]
macro_rules! slice {
    [$start:expr => $limit:expr] => {
        $crate::SliceDim {
            start: $start,
            limit: $limit,
            stride: 1,
        }
    };
    [$start:expr => $limit:expr; $stride:expr] => {
        $crate::SliceDim {
            start: $start,
            limit: $limit,
            stride: $stride,
        }
    };
}

impl SliceDim {
    /// Number of elements selected, rejecting empty selections.
    fn len(&self, axis: usize) -> Result<udim> {
        if self.stride == 0 || self.limit <= self.start {
            Err(ShapeError::EmptySlice {
                axis,
                start: self.start,
                limit: self.limit,
                stride: self.stride,
            })
        } else {
            Ok((self.limit - self.start).div_ceil(self.stride))
        }
    }
}

#[repr(transparent)]
pub struct Slice(pub Vec<SliceDim>);

impl Operator for Slice {
    #[inline]
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        Ok((slice(shape, &self.0)?, Names::from(names)))
    }
}

/// Shape selected by per-axis `start`, `limit` and `stride`.
pub fn slice_shape(start: &[udim], limit: &[udim], stride: &[udim]) -> Result<Shape> {
    for (what, len) in [("slice limits", limit.len()), ("slice strides", stride.len())] {
        if len != start.len() {
            return Err(ShapeError::RankMismatch {
                what,
                expected: start.len(),
                actual: len,
            });
        }
    }
    (0..start.len())
        .map(|i| {
            SliceDim {
                start: start[i],
                limit: limit[i],
                stride: stride[i],
            }
            .len(i)
        })
        .collect()
}

/// Slices `shape`, checking every range lies inside its axis.
pub fn slice(shape: &[udim], dims: &[SliceDim]) -> Result<Shape> {
    if dims.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            what: "slice",
            expected: shape.len(),
            actual: dims.len(),
        });
    }
    shape
        .iter()
        .zip(dims)
        .enumerate()
        .map(|(axis, (&size, d))| {
            if d.start > d.limit || d.limit > size {
                Err(ShapeError::SliceOutOfBounds {
                    axis,
                    start: d.start,
                    limit: d.limit,
                    size,
                })
            } else {
                d.len(axis)
            }
        })
        .collect()
}

#[test]
fn test() {
    let shape = slice_shape(&[1, 4, 10], &[2, 5, 20], &[1, 2, 3]).unwrap();
    assert_eq!(shape.as_slice(), &[1, 1, 4]);
    assert_eq!(
        slice_shape(&[3], &[3], &[1]),
        Err(ShapeError::EmptySlice {
            axis: 0,
            start: 3,
            limit: 3,
            stride: 1,
        })
    );
    assert!(matches!(
        slice_shape(&[0], &[4], &[0]),
        Err(ShapeError::EmptySlice { stride: 0, .. })
    ));
    assert!(matches!(
        slice_shape(&[0, 0], &[4], &[1, 1]),
        Err(ShapeError::RankMismatch {
            what: "slice limits",
            ..
        })
    ));
}

#[test]
fn test_bounds() {
    let shape = slice(&[5, 6, 7], &[slice![2 => 4], slice![0 => 6], slice![1 => 7; 2]]).unwrap();
    assert_eq!(shape.as_slice(), &[2, 6, 3]);
    assert_eq!(
        slice(&[5], &[slice![2 => 6]]),
        Err(ShapeError::SliceOutOfBounds {
            axis: 0,
            start: 2,
            limit: 6,
            size: 5,
        })
    );
    assert!(matches!(
        slice(&[5, 6], &[slice![0 => 1]]),
        Err(ShapeError::RankMismatch { .. })
    ));
}

#[test]
fn test_serde() {
    let dims: Vec<SliceDim> =
        serde_json::from_str(r#"[{"start":1,"limit":4},{"start":0,"limit":9,"stride":3}]"#)
            .unwrap();
    assert_eq!(dims, [slice![1 => 4], slice![0 => 9; 3]]);
}
