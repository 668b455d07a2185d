use crate::{
    fmt::{on_axes, DisplayNames, DisplayShape},
    udim, Axes, Label, Names, Shape,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShapeError>;

/// Reasons a shape operation is rejected.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ShapeError {
    #[error("{what} has rank {actual}, expected {expected}")]
    RankMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("rank {rank} does not fit into rank {target}")]
    RankExceeded { rank: usize, target: usize },
    #[error("axis {axis} is out of range for rank {rank}")]
    AxisOutOfRange { axis: i64, rank: usize },
    #[error("name {name} not found in {}", DisplayNames(.names))]
    UnknownName { name: Label, names: Names },
    #[error("an unnamed axis cannot be referenced by name")]
    NilAxis,
    #[error("axes {axes:?} must be unique")]
    DuplicateAxes { axes: Axes },
    #[error("broadcast axes {axes:?} must be in ascending order")]
    UnorderedAxes { axes: Axes },
    #[error(
        "cannot broadcast {} to {}{}",
        DisplayShape(.from),
        DisplayShape(.to),
        on_axes(.axes)
    )]
    BroadcastIncompatible {
        from: Shape,
        to: Shape,
        axes: Option<Axes>,
    },
    #[error("cannot merge name {left} with {right}")]
    NameConflict { left: Label, right: Label },
    #[error("dimension {dim1} of axis {axis1} does not match dimension {dim2} of axis {axis2}")]
    DimensionMismatch {
        axis1: usize,
        dim1: udim,
        axis2: usize,
        dim2: udim,
    },
    #[error("names {} must be unique", DisplayNames(.names))]
    DuplicateNames { names: Names },
    #[error("cannot squeeze axis {axis} of size {size}")]
    SqueezeNonUnitDim { axis: usize, size: udim },
    #[error("slice {start}..{limit} by {stride} on axis {axis} is empty")]
    EmptySlice {
        axis: usize,
        start: udim,
        limit: udim,
        stride: udim,
    },
    #[error("slice {start}..{limit} on axis {axis} exceeds size {size}")]
    SliceOutOfBounds {
        axis: usize,
        start: udim,
        limit: udim,
        size: udim,
    },
    #[error("{what} on axis {axis} must be positive")]
    ZeroExtent { what: &'static str, axis: usize },
    #[error("filter size {filter} on axis {axis} exceeds padded input size {padded}")]
    KernelTooLarge {
        axis: usize,
        padded: udim,
        filter: udim,
    },
    #[error("cannot reshape {} into {}", DisplayShape(.from), DisplayShape(.to))]
    SizeMismatch { from: Shape, to: Shape },
    #[error("size of axis {axis} overflows")]
    DimOverflow { axis: usize },
}

#[test]
fn test_message() {
    use smallvec::smallvec;

    let e = ShapeError::BroadcastIncompatible {
        from: smallvec![4, 2, 5],
        to: smallvec![3, 2, 5],
        axes: None,
    };
    assert_eq!(e.to_string(), "cannot broadcast (4, 2, 5) to (3, 2, 5)");

    let e = ShapeError::BroadcastIncompatible {
        from: smallvec![3],
        to: smallvec![2, 4],
        axes: Some(smallvec![1]),
    };
    assert_eq!(e.to_string(), "cannot broadcast (3) to (2, 4) on axes [1]");

    let e = ShapeError::DuplicateNames {
        names: smallvec![Some(Label::from("x")), None, Some(Label::from("x"))],
    };
    assert_eq!(e.to_string(), "names [x, _, x] must be unique");

    let e = ShapeError::DimOverflow { axis: 2 };
    assert_eq!(e.to_string(), "size of axis 2 overflows");
}
