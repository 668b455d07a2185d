use crate::{idim, udim, Axes, Label, Name, Result, ShapeError};
use itertools::Itertools;

/// An axis given either by position or by name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AxisRef {
    /// Position; negative values count from the last axis.
    Index(idim),
    /// Name; `None` is the unnamed marker and never resolves.
    Name(Name),
}

impl From<idim> for AxisRef {
    #[inline]
    fn from(axis: idim) -> Self {
        Self::Index(axis)
    }
}

impl From<&str> for AxisRef {
    #[inline]
    fn from(name: &str) -> Self {
        Self::Name(Some(Label::from(name)))
    }
}

impl From<Label> for AxisRef {
    #[inline]
    fn from(name: Label) -> Self {
        Self::Name(Some(name))
    }
}

impl From<Name> for AxisRef {
    #[inline]
    fn from(name: Name) -> Self {
        Self::Name(name)
    }
}

/// Resolves `axis` to a position in `shape`.
pub fn normalize_axis(shape: &[udim], axis: &AxisRef, names: &[Name]) -> Result<usize> {
    let rank = shape.len();
    match axis {
        &AxisRef::Index(i) if i >= 0 && (i as usize) < rank => Ok(i as usize),
        &AxisRef::Index(i) if i < 0 && i.unsigned_abs() as usize <= rank => {
            Ok(rank - i.unsigned_abs() as usize)
        }
        &AxisRef::Index(i) => Err(ShapeError::AxisOutOfRange {
            axis: i as i64,
            rank,
        }),
        AxisRef::Name(None) => Err(ShapeError::NilAxis),
        AxisRef::Name(Some(name)) => names
            .iter()
            .position(|n| n.as_ref() == Some(name))
            .ok_or_else(|| ShapeError::UnknownName {
                name: name.clone(),
                names: names.iter().cloned().collect(),
            }),
    }
}

/// Resolves every axis in `axes`, rejecting lists that name one axis twice.
pub fn normalize_axes(shape: &[udim], axes: &[AxisRef], names: &[Name]) -> Result<Axes> {
    let normalized = axes
        .iter()
        .map(|axis| normalize_axis(shape, axis, names))
        .collect::<Result<Axes>>()?;
    if normalized.iter().all_unique() {
        Ok(normalized)
    } else {
        Err(ShapeError::DuplicateAxes { axes: normalized })
    }
}

#[cfg(test)]
fn names(list: &[Option<&str>]) -> crate::Names {
    list.iter().map(|n| n.map(Label::from)).collect()
}

#[test]
fn test_index() {
    let shape = [2, 3, 4];
    let unnamed = crate::unnamed(3);
    assert_eq!(normalize_axis(&shape, &1.into(), &unnamed), Ok(1));
    assert_eq!(normalize_axis(&shape, &(-1).into(), &unnamed), Ok(2));
    assert_eq!(normalize_axis(&shape, &(-3).into(), &unnamed), Ok(0));
    assert_eq!(
        normalize_axis(&shape, &3.into(), &unnamed),
        Err(ShapeError::AxisOutOfRange { axis: 3, rank: 3 })
    );
    assert_eq!(
        normalize_axis(&shape, &(-4).into(), &unnamed),
        Err(ShapeError::AxisOutOfRange { axis: -4, rank: 3 })
    );
    assert!(normalize_axis(&[], &0.into(), &[]).is_err());
}

#[test]
fn test_negative_agrees() {
    let shape = [5, 1, 7, 2];
    let unnamed = crate::unnamed(4);
    for i in 0..4 {
        assert_eq!(
            normalize_axis(&shape, &AxisRef::Index(i), &unnamed),
            normalize_axis(&shape, &AxisRef::Index(i - 4), &unnamed),
        );
    }
}

#[test]
fn test_name() {
    let shape = [2, 3, 4];
    let names = names(&[Some("batch"), None, Some("data")]);
    assert_eq!(normalize_axis(&shape, &"data".into(), &names), Ok(2));
    assert_eq!(
        normalize_axis(&shape, &AxisRef::Name(None), &names),
        Err(ShapeError::NilAxis)
    );
    assert_eq!(
        normalize_axis(&shape, &"time".into(), &names),
        Err(ShapeError::UnknownName {
            name: Label::from("time"),
            names: names.clone(),
        })
    );
}

#[test]
fn test_axes() {
    let shape = [2, 3, 4];
    let names = names(&[Some("batch"), None, Some("data")]);
    assert_eq!(
        normalize_axes(&shape, &["data".into(), 0.into()], &names).unwrap().as_slice(),
        &[2, 0]
    );
    assert_eq!(
        normalize_axes(&shape, &["data".into(), (-1).into()], &names),
        Err(ShapeError::DuplicateAxes {
            axes: smallvec::smallvec![2, 2],
        })
    );
}
