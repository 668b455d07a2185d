use crate::{
    binary_broadcast, concatenate, conv_output_shape, normalize_axes, normalize_axis, outer, udim,
    unnamed, zip_reduce, Axes, AxisRef, DisplayNames, DisplayShape, Name, Names, Operator,
    Padding, Reduce, Result, Shape, ShapeError,
};
use std::fmt;

/// Shape and axis names of one tensor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TensorMeta {
    shape: Shape,
    names: Names,
}

impl TensorMeta {
    pub fn new(shape: &[udim], names: &[Name]) -> Result<Self> {
        if names.len() != shape.len() {
            return Err(ShapeError::RankMismatch {
                what: "names",
                expected: shape.len(),
                actual: names.len(),
            });
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            names: Names::from(names),
        })
    }

    #[inline]
    pub fn unnamed(shape: &[udim]) -> Self {
        Self {
            shape: Shape::from_slice(shape),
            names: unnamed(shape.len()),
        }
    }

    #[inline]
    pub fn scalar() -> Self {
        Self::unnamed(&[])
    }

    #[inline]
    pub fn shape(&self) -> &[udim] {
        &self.shape
    }

    #[inline]
    pub fn names(&self) -> &[Name] {
        &self.names
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn size(&self) -> Result<usize> {
        crate::size(&self.shape)
    }

    #[inline]
    pub fn axis(&self, axis: impl Into<AxisRef>) -> Result<usize> {
        normalize_axis(&self.shape, &axis.into(), &self.names)
    }

    #[inline]
    pub fn axes(&self, axes: &[AxisRef]) -> Result<Axes> {
        normalize_axes(&self.shape, axes, &self.names)
    }

    pub fn apply(&self, operator: &impl Operator) -> Result<Self> {
        let (shape, names) = operator.infer(&self.shape, &self.names)?;
        Ok(Self { shape, names })
    }

    pub fn reduce(&self, axes: &[AxisRef], keep_axes: bool) -> Result<Self> {
        let axes = self.axes(axes)?;
        self.apply(&Reduce { axes, keep_axes })
    }

    pub fn broadcast_with(&self, other: &Self) -> Result<Self> {
        let (shape, names) = binary_broadcast(&self.shape, &self.names, &other.shape, &other.names)?;
        Ok(Self { shape, names })
    }

    /// Contracts `axes` of `self` against `other_axes` of `other`, pair by pair.
    pub fn dot(&self, axes: &[AxisRef], other: &Self, other_axes: &[AxisRef]) -> Result<Self> {
        let axes1 = self.axes(axes)?;
        let axes2 = other.axes(other_axes)?;
        let (shape, names) = zip_reduce(
            &self.shape,
            &axes1,
            &self.names,
            &other.shape,
            &axes2,
            &other.names,
        )?;
        Ok(Self { shape, names })
    }

    pub fn outer(&self, other: &Self) -> Result<Self> {
        let (shape, names) = outer(&self.shape, &self.names, &other.shape, &other.names)?;
        Ok(Self { shape, names })
    }

    /// Convolves with a `(out_channels, in_channels, *filter)` kernel.
    pub fn conv(&self, kernel: &[udim], strides: &[udim], padding: &Padding) -> Result<Self> {
        let spatial = self.shape.get(2..).unwrap_or_default();
        let filter = kernel.get(2..).unwrap_or_default();
        let padding = padding.resolve(spatial, filter, strides)?;
        let (shape, names) = conv_output_shape(&self.shape, &self.names, kernel, strides, &padding)?;
        Ok(Self { shape, names })
    }

    pub fn concatenate(inputs: &[Self], axis: impl Into<AxisRef>) -> Result<Self> {
        let Some(first) = inputs.first() else {
            return Err(ShapeError::RankMismatch {
                what: "concatenated inputs",
                expected: 1,
                actual: 0,
            });
        };
        let axis = first.axis(axis)?;
        let parts = inputs
            .iter()
            .map(|t| (t.shape(), t.names()))
            .collect::<Vec<_>>();
        let (shape, names) = concatenate(&parts, axis)?;
        Ok(Self { shape, names })
    }
}

impl fmt::Display for TensorMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.iter().all(Option::is_none) {
            write!(f, "{}", DisplayShape(&self.shape))
        } else {
            write!(
                f,
                "{}{}",
                DisplayShape(&self.shape),
                DisplayNames(&self.names)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, Squeeze, Transpose};

    fn named(shape: &[udim], names: &[Option<&str>]) -> TensorMeta {
        let names = names.iter().map(|n| n.map(Label::from)).collect::<Names>();
        TensorMeta::new(shape, &names).unwrap()
    }

    #[test]
    fn test_new() {
        assert!(matches!(
            TensorMeta::new(&[2, 3], &[None]),
            Err(ShapeError::RankMismatch { what: "names", .. })
        ));
        let scalar = TensorMeta::scalar();
        assert_eq!(scalar.rank(), 0);
        assert_eq!(scalar.size(), Ok(1));
        assert_eq!(scalar.to_string(), "()");
        assert_eq!(
            named(&[2, 3], &[Some("a"), None]).to_string(),
            "(2, 3)[a, _]"
        );
    }

    #[test]
    fn test_reduce_by_name() {
        let t = named(&[2, 3, 4], &[Some("batch"), Some("seq"), None]);
        let r = t.reduce(&["seq".into(), (-1).into()], false).unwrap();
        assert_eq!(r.shape(), &[2]);
        assert_eq!(r.names(), &[Some(Label::from("batch"))]);

        let r = t.reduce(&["seq".into()], true).unwrap();
        assert_eq!(r.shape(), &[2, 1, 4]);
        assert!(matches!(
            t.reduce(&["seq".into(), 1.into()], false),
            Err(ShapeError::DuplicateAxes { .. })
        ));
    }

    #[test]
    fn test_dot() {
        let a = named(&[2, 3], &[Some("i"), Some("k")]);
        let b = named(&[3, 5], &[Some("k"), Some("j")]);
        let c = a.dot(&["k".into()], &b, &["k".into()]).unwrap();
        assert_eq!(c.shape(), &[2, 5]);
        assert_eq!(c.to_string(), "(2, 5)[i, j]");
        assert!(matches!(
            a.outer(&b),
            Err(ShapeError::DuplicateNames { .. })
        ));
    }

    #[test]
    fn test_apply() {
        let t = named(&[1, 3, 1, 5], &[Some("n"), Some("c"), None, Some("w")]);
        let squeezed = t.apply(&Squeeze { axes: None }).unwrap();
        assert_eq!(squeezed.to_string(), "(3, 5)[c, w]");
        let transposed = squeezed.apply(&Transpose { perm: None }).unwrap();
        assert_eq!(transposed.to_string(), "(5, 3)[w, c]");
        let broadcast = transposed
            .broadcast_with(&named(&[2, 1, 1], &[Some("b"), None, None]))
            .unwrap();
        assert_eq!(broadcast.to_string(), "(2, 5, 3)[b, w, c]");
    }

    #[test]
    fn test_conv() {
        let input = named(&[1, 3, 8, 8], &[Some("n"), Some("c"), Some("h"), Some("w")]);
        let out = input.conv(&[16, 3, 3, 3], &[2, 2], &Padding::Same).unwrap();
        assert_eq!(out.shape(), &[1, 16, 4, 4]);
        assert_eq!(out.names(), input.names());
        let out = input.conv(&[16, 3, 3, 3], &[1, 1], &Padding::Valid).unwrap();
        assert_eq!(out.shape(), &[1, 16, 6, 6]);
    }

    #[test]
    fn test_concatenate() {
        let a = named(&[2, 3], &[Some("n"), None]);
        let b = TensorMeta::unnamed(&[2, 4]);
        let c = TensorMeta::concatenate(&[a, b], -1).unwrap();
        assert_eq!(c.to_string(), "(2, 7)[n, _]");
    }
}
