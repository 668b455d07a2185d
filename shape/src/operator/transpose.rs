use super::{check_in_range, check_names, Operator};
use crate::{udim, Axes, Name, Names, Result, Shape, ShapeError};
use itertools::Itertools;

/// Permutes axes; the default permutation reverses them.
pub struct Transpose {
    pub perm: Option<Axes>,
}

impl Operator for Transpose {
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        match &self.perm {
            Some(perm) => transpose(shape, perm, names),
            None => transpose(shape, &transpose_axes(shape), names),
        }
    }
}

/// Places input axis `perm[i]` at output position `i`.
pub fn transpose(shape: &[udim], perm: &[usize], names: &[Name]) -> Result<(Shape, Names)> {
    if perm.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            what: "permutation",
            expected: shape.len(),
            actual: perm.len(),
        });
    }
    check_in_range(perm, shape.len())?;
    check_names(shape, names)?;
    if !perm.iter().all_unique() {
        return Err(ShapeError::DuplicateAxes {
            axes: Axes::from_slice(perm),
        });
    }
    Ok(perm.iter().map(|&i| (shape[i], names[i].clone())).unzip())
}

/// Permutation reversing every axis.
#[inline]
pub fn transpose_axes(shape: &[udim]) -> Axes {
    (0..shape.len()).rev().collect()
}

#[test]
fn test() {
    use crate::Label;

    let names = [Some(Label::from("a")), None, Some(Label::from("c")), None];
    let (shape, permuted) = transpose(&[1, 2, 3, 4], &[0, 3, 1, 2], &names).unwrap();
    assert_eq!(shape.as_slice(), &[1, 4, 2, 3]);
    assert_eq!(
        permuted.as_slice(),
        &[names[0].clone(), None, None, names[2].clone()]
    );

    let (shape, _) = Transpose { perm: None }
        .infer(&[1, 2, 3], &crate::unnamed(3))
        .unwrap();
    assert_eq!(shape.as_slice(), &[3, 2, 1]);
    assert!(transpose_axes(&[]).is_empty());
}

#[test]
fn test_invalid() {
    let names = crate::unnamed(3);
    assert_eq!(
        transpose(&[1, 2, 3], &[0, 1], &names),
        Err(ShapeError::RankMismatch {
            what: "permutation",
            expected: 3,
            actual: 2,
        })
    );
    assert!(matches!(
        transpose(&[1, 2, 3], &[0, 1, 3], &names),
        Err(ShapeError::AxisOutOfRange { axis: 3, rank: 3 })
    ));
    assert!(matches!(
        transpose(&[1, 2, 3], &[0, 1, 1], &names),
        Err(ShapeError::DuplicateAxes { .. })
    ));
    assert!(matches!(
        transpose(&[1, 2, 3], &[2, 1, 0], &names[..2]),
        Err(ShapeError::RankMismatch { what: "names", .. })
    ));
}
