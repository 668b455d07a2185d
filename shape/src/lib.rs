//! Shape algebra for named tensors.
//!
//! Every function here takes shapes, optional axis names and descriptors, and
//! returns the shape (and names) a transformation produces, or a [`ShapeError`]
//! describing why the transformation is malformed.

mod axis;
mod error;
mod fmt;
mod name;
mod operator;
mod tensor;

use smallvec::SmallVec;

#[allow(non_camel_case_types)]
pub type udim = u32;

#[allow(non_camel_case_types)]
pub type idim = i32;

pub type Shape = SmallVec<[udim; 4]>;
pub type Names = SmallVec<[Name; 4]>;
pub type Axes = SmallVec<[usize; 4]>;

pub use axis::{normalize_axes, normalize_axis, AxisRef};
pub use error::{Result, ShapeError};
pub use fmt::{DisplayNames, DisplayShape};
pub use name::{merge_names, Label, Name};
pub use operator::{
    binary_broadcast, broadcast, broadcast_check, concatenate, contract, conv_output_shape,
    default_broadcast_axes, outer, pad, reduce, reshape, same_padding, same_padding_unit, slice,
    slice_shape, squeeze, squeeze_axes, transpose, transpose_axes, validate_strides,
    validate_window, window_output_shape, window_reduce, zip_reduce, Broadcast, Operator, Pad, PadDim,
    Padding, Reduce, Reshape, Slice, SliceDim, Squeeze, Transpose, WindowReduce,
};
pub use tensor::TensorMeta;

/// Number of elements a tensor of `shape` holds.
pub fn size(shape: &[udim]) -> Result<usize> {
    shape.iter().enumerate().try_fold(1usize, |acc, (axis, &d)| {
        acc.checked_mul(d as usize)
            .ok_or(ShapeError::DimOverflow { axis })
    })
}

/// Names for a tensor of `rank` axes, none of them labelled.
#[inline]
pub fn unnamed(rank: usize) -> Names {
    smallvec::smallvec![None; rank]
}

#[test]
fn test_size() {
    assert_eq!(size(&[]), Ok(1));
    assert_eq!(size(&[2, 3, 4]), Ok(24));
    assert_eq!(size(&[2, 0, 4]), Ok(0));
    assert!(matches!(
        size(&[udim::MAX; 4]),
        Err(ShapeError::DimOverflow { .. })
    ));
}
