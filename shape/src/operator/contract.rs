use super::{check_in_range, check_names, Operator};
use crate::{udim, Axes, Name, Names, Result, Shape, ShapeError};
use itertools::Itertools;
use std::iter::zip;

/// Reduces a tensor along `axes`, optionally keeping them as size-1 axes.
pub struct Reduce {
    pub axes: Axes,
    pub keep_axes: bool,
}

impl Operator for Reduce {
    #[inline]
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        check_in_range(&self.axes, shape.len())?;
        reduce(shape, &self.axes, names, self.keep_axes)
    }
}

/// Drops the axes listed in `axes`, keeping the others in order.
///
/// Indices must already be normalized; those outside the shape are ignored.
pub fn contract(shape: &[udim], axes: &[usize], names: &[Name]) -> Result<(Shape, Names)> {
    check_names(shape, names)?;
    Ok(zip(shape, names)
        .enumerate()
        .filter(|(i, _)| !axes.contains(i))
        .map(|(_, (&d, n))| (d, n.clone()))
        .unzip())
}

/// Shape left after reducing over `axes`.
pub fn reduce(
    shape: &[udim],
    axes: &[usize],
    names: &[Name],
    keep_axes: bool,
) -> Result<(Shape, Names)> {
    if keep_axes {
        check_names(shape, names)?;
        let shape = shape
            .iter()
            .enumerate()
            .map(|(i, &d)| if axes.contains(&i) { 1 } else { d })
            .collect();
        Ok((shape, Names::from(names)))
    } else {
        contract(shape, axes, names)
    }
}

/// Shape of a generalized dot product contracting `axes1[k]` against `axes2[k]`.
pub fn zip_reduce(
    shape1: &[udim],
    axes1: &[usize],
    names1: &[Name],
    shape2: &[udim],
    axes2: &[usize],
    names2: &[Name],
) -> Result<(Shape, Names)> {
    if axes1.len() != axes2.len() {
        return Err(ShapeError::RankMismatch {
            what: "contraction axes",
            expected: axes1.len(),
            actual: axes2.len(),
        });
    }
    check_in_range(axes1, shape1.len())?;
    check_in_range(axes2, shape2.len())?;
    if let Some((&axis1, &axis2)) =
        zip(axes1, axes2).find(|(&a1, &a2)| shape1[a1] != shape2[a2])
    {
        return Err(ShapeError::DimensionMismatch {
            axis1,
            dim1: shape1[axis1],
            axis2,
            dim2: shape2[axis2],
        });
    }

    let (mut shape, mut names) = contract(shape1, axes1, names1)?;
    let (tail_shape, tail_names) = contract(shape2, axes2, names2)?;
    shape.extend(tail_shape);
    names.extend(tail_names);

    if names.iter().flatten().all_unique() {
        Ok((shape, names))
    } else {
        Err(ShapeError::DuplicateNames { names })
    }
}

/// Shape of the outer product: both shapes side by side.
#[inline]
pub fn outer(
    shape1: &[udim],
    names1: &[Name],
    shape2: &[udim],
    names2: &[Name],
) -> Result<(Shape, Names)> {
    zip_reduce(shape1, &[], names1, shape2, &[], names2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{unnamed, Label};

    fn names(list: &[Option<&str>]) -> Names {
        list.iter().map(|n| n.map(Label::from)).collect()
    }

    #[test]
    fn test_contract() {
        let (shape, kept) = contract(
            &[2, 3, 4, 5],
            &[3, 1],
            &names(&[Some("a"), Some("b"), None, Some("d")]),
        )
        .unwrap();
        assert_eq!(shape.as_slice(), &[2, 4]);
        assert_eq!(kept, names(&[Some("a"), None]));

        let (shape, kept) = contract(&[2, 3], &[], &unnamed(2)).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_names_length() {
        assert_eq!(
            contract(&[2, 3], &[], &unnamed(1)),
            Err(ShapeError::RankMismatch {
                what: "names",
                expected: 2,
                actual: 1,
            })
        );
        assert!(matches!(
            reduce(&[2, 3], &[0], &unnamed(3), true),
            Err(ShapeError::RankMismatch { what: "names", .. })
        ));
        assert!(matches!(
            zip_reduce(&[2, 3], &[0], &unnamed(2), &[2], &[0], &[]),
            Err(ShapeError::RankMismatch { what: "names", .. })
        ));
    }

    #[test]
    fn test_contract_restores_rank() {
        let shape = [2, 3, 4, 5, 6];
        for axes in [&[][..], &[0], &[1, 3], &[4, 0, 2], &[0, 1, 2, 3, 4]] {
            let (left, names) = contract(&shape, axes, &unnamed(5)).unwrap();
            assert_eq!(left.len(), names.len());
            assert_eq!(left.len() + axes.len(), shape.len());
        }
    }

    #[test]
    fn test_reduce_keep() {
        let (shape, kept) =
            reduce(&[2, 3, 4], &[1], &names(&[Some("a"), Some("b"), None]), true).unwrap();
        assert_eq!(shape.as_slice(), &[2, 1, 4]);
        assert_eq!(kept, names(&[Some("a"), Some("b"), None]));

        let (shape, _) = Reduce {
            axes: Axes::from_slice(&[0, 2]),
            keep_axes: false,
        }
        .infer(&[2, 3, 4], &unnamed(3))
        .unwrap();
        assert_eq!(shape.as_slice(), &[3]);

        assert!(matches!(
            Reduce {
                axes: Axes::from_slice(&[3]),
                keep_axes: false,
            }
            .infer(&[2, 3, 4], &unnamed(3)),
            Err(ShapeError::AxisOutOfRange { axis: 3, rank: 3 })
        ));
    }

    #[test]
    fn test_zip_reduce() {
        let (shape, out) = zip_reduce(
            &[2, 3, 4],
            &[2],
            &names(&[Some("batch"), Some("i"), None]),
            &[4, 5],
            &[0],
            &names(&[None, Some("j")]),
        )
        .unwrap();
        assert_eq!(shape.as_slice(), &[2, 3, 5]);
        assert_eq!(out, names(&[Some("batch"), Some("i"), Some("j")]));
    }

    #[test]
    fn test_zip_reduce_mismatch() {
        assert_eq!(
            zip_reduce(&[2, 3], &[0, 1], &unnamed(2), &[2, 4], &[0, 1], &unnamed(2)),
            Err(ShapeError::DimensionMismatch {
                axis1: 1,
                dim1: 3,
                axis2: 1,
                dim2: 4,
            })
        );
        assert!(matches!(
            zip_reduce(&[2, 3], &[0, 1], &unnamed(2), &[2, 3], &[0], &unnamed(2)),
            Err(ShapeError::RankMismatch { .. })
        ));
    }

    #[test]
    fn test_zip_reduce_duplicate_names() {
        assert_eq!(
            zip_reduce(
                &[2, 2],
                &[1],
                &names(&[Some("x"), Some("y")]),
                &[2, 2],
                &[0],
                &names(&[Some("y"), Some("x")]),
            ),
            Err(ShapeError::DuplicateNames {
                names: names(&[Some("x"), Some("x")]),
            })
        );
    }

    #[test]
    fn test_outer() {
        let (shape, out) = outer(&[2], &names(&[Some("i")]), &[3, 4], &unnamed(2)).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3, 4]);
        assert_eq!(out, names(&[Some("i"), None, None]));
    }
}
