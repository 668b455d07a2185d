mod broadcast;
mod contract;
mod conv;
mod pad;
mod reshape;
mod slice;
mod squeeze;
mod transpose;
mod window;

use crate::{udim, Name, Names, Result, Shape, ShapeError};

/// A unary shape transformation.
///
/// Implementors fill in whatever defaults the caller left out (axes,
/// permutation, padding mode) and validate through the matching free function.
pub trait Operator {
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)>;
}

fn check_in_range(axes: &[usize], rank: usize) -> Result<()> {
    match axes.iter().find(|&&a| a >= rank) {
        Some(&axis) => Err(ShapeError::AxisOutOfRange {
            axis: axis as _,
            rank,
        }),
        None => Ok(()),
    }
}

/// Checks there is exactly one name per axis.
fn check_names(shape: &[udim], names: &[Name]) -> Result<()> {
    if names.len() == shape.len() {
        Ok(())
    } else {
        Err(ShapeError::RankMismatch {
            what: "names",
            expected: shape.len(),
            actual: names.len(),
        })
    }
}

pub use broadcast::{binary_broadcast, broadcast, broadcast_check, default_broadcast_axes, Broadcast};
pub use contract::{contract, outer, reduce, zip_reduce, Reduce};
pub use conv::conv_output_shape;
pub use pad::{pad, Pad, PadDim};
pub use reshape::{concatenate, reshape, Reshape};
pub use slice::{slice, slice_shape, Slice, SliceDim};
pub use squeeze::{squeeze, squeeze_axes, Squeeze};
pub use transpose::{transpose, transpose_axes, Transpose};
pub use window::{
    same_padding, same_padding_unit, validate_strides, validate_window, window_output_shape,
    window_reduce, Padding, WindowReduce,
};
