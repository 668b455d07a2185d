use super::{check_in_range, check_names, Operator};
use crate::{merge_names, udim, unnamed, Axes, Name, Names, Result, Shape, ShapeError};
use log::{debug, trace};
use std::iter::zip;

/// Broadcasts a tensor into `shape`, mapping input axis `i` onto `axes[i]`.
///
/// Without explicit axes the input is right-aligned under `shape`.
pub struct Broadcast {
    pub shape: Shape,
    pub axes: Option<Axes>,
}

impl Operator for Broadcast {
    fn infer(&self, shape: &[udim], names: &[Name]) -> Result<(Shape, Names)> {
        let axes = match &self.axes {
            Some(axes) => axes.clone(),
            None => {
                let axes = default_broadcast_axes(shape, &self.shape)?;
                debug!("default broadcast axes {axes:?}");
                axes
            }
        };
        broadcast(shape, names, &self.shape, &axes)
    }
}

/// Checks that `old_shape` broadcasts into `new_shape` along `axes`.
pub fn broadcast_check(old_shape: &[udim], new_shape: &[udim], axes: &[usize]) -> Result<()> {
    if axes.len() != old_shape.len() {
        return Err(ShapeError::RankMismatch {
            what: "broadcast axes",
            expected: old_shape.len(),
            actual: axes.len(),
        });
    }
    if old_shape.len() > new_shape.len() {
        return Err(ShapeError::RankExceeded {
            rank: old_shape.len(),
            target: new_shape.len(),
        });
    }
    check_in_range(axes, new_shape.len())?;
    // equal neighbours are only legal between two size-1 axes
    let ordered = (1..axes.len()).all(|i| {
        axes[i - 1] < axes[i]
            || (axes[i - 1] == axes[i] && old_shape[i - 1] == 1 && old_shape[i] == 1)
    });
    if !ordered {
        return Err(ShapeError::UnorderedAxes {
            axes: Axes::from_slice(axes),
        });
    }
    if zip(old_shape, axes).all(|(&d, &a)| d == 1 || d == new_shape[a]) {
        Ok(())
    } else {
        Err(ShapeError::BroadcastIncompatible {
            from: Shape::from_slice(old_shape),
            to: Shape::from_slice(new_shape),
            axes: Some(Axes::from_slice(axes)),
        })
    }
}

/// Axes that right-align `shape` under `new_shape`.
pub fn default_broadcast_axes(shape: &[udim], new_shape: &[udim]) -> Result<Axes> {
    let offset = new_shape
        .len()
        .checked_sub(shape.len())
        .ok_or(ShapeError::RankExceeded {
            rank: shape.len(),
            target: new_shape.len(),
        })?;
    Ok((offset..new_shape.len()).collect())
}

/// Broadcasts `old_shape` into `new_shape` and moves each name onto its target axis.
pub fn broadcast(
    old_shape: &[udim],
    names: &[Name],
    new_shape: &[udim],
    axes: &[usize],
) -> Result<(Shape, Names)> {
    broadcast_check(old_shape, new_shape, axes)?;
    check_names(old_shape, names)?;
    let mut new_names = unnamed(new_shape.len());
    for (name, &axis) in zip(names, axes) {
        if name.is_some() {
            new_names[axis] = name.clone();
        }
    }
    Ok((Shape::from_slice(new_shape), new_names))
}

/// Mutual broadcast of two named shapes, aligned from the last axis.
pub fn binary_broadcast(
    shape1: &[udim],
    names1: &[Name],
    shape2: &[udim],
    names2: &[Name],
) -> Result<(Shape, Names)> {
    check_names(shape1, names1)?;
    check_names(shape2, names2)?;
    if shape1 == shape2 && names1 == names2 {
        trace!("broadcast fast path");
        return Ok((Shape::from_slice(shape1), Names::from(names1)));
    }

    let rank = shape1.len().max(shape2.len());
    let pad1 = rank - shape1.len();
    let pad2 = rank - shape2.len();
    let dim = |shape: &[udim], pad: usize, i: usize| i.checked_sub(pad).map_or(1, |i| shape[i]);
    let name = |names: &[Name], pad: usize, i: usize| {
        i.checked_sub(pad).and_then(|i| names[i].clone())
    };

    let shape = (0..rank)
        .map(|i| match (dim(shape1, pad1, i), dim(shape2, pad2, i)) {
            (1, d) | (d, 1) => Some(d),
            (d1, d2) if d1 == d2 => Some(d1),
            _ => None,
        })
        .collect::<Option<Shape>>()
        .ok_or_else(|| ShapeError::BroadcastIncompatible {
            from: Shape::from_slice(shape1),
            to: Shape::from_slice(shape2),
            axes: None,
        })?;
    let names = (0..rank)
        .map(|i| merge_names(&name(names1, pad1, i), &name(names2, pad2, i)))
        .collect::<Result<Names>>()?;
    Ok((shape, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;

    fn names(list: &[Option<&str>]) -> Names {
        list.iter().map(|n| n.map(Label::from)).collect()
    }

    #[test]
    fn test_check() {
        assert_eq!(broadcast_check(&[1], &[2, 3, 4], &[2]), Ok(()));
        assert_eq!(broadcast_check(&[3, 1], &[2, 3, 4], &[1, 2]), Ok(()));
        assert_eq!(broadcast_check(&[1, 1], &[2, 3, 4], &[1, 1]), Ok(()));
        assert_eq!(broadcast_check(&[], &[2, 3], &[]), Ok(()));
        assert_eq!(
            broadcast_check(&[3], &[2, 3, 4], &[2]),
            Err(ShapeError::BroadcastIncompatible {
                from: Shape::from_slice(&[3]),
                to: Shape::from_slice(&[2, 3, 4]),
                axes: Some(Axes::from_slice(&[2])),
            })
        );
        assert_eq!(
            broadcast_check(&[3, 4], &[2, 3, 4], &[2, 1]),
            Err(ShapeError::UnorderedAxes {
                axes: Axes::from_slice(&[2, 1]),
            })
        );
        assert!(matches!(
            broadcast_check(&[3, 3], &[3, 3], &[0, 0]),
            Err(ShapeError::UnorderedAxes { .. })
        ));
        assert!(matches!(
            broadcast_check(&[3, 4], &[3, 4], &[0]),
            Err(ShapeError::RankMismatch { .. })
        ));
        assert!(matches!(
            broadcast_check(&[3, 4, 5], &[4, 5], &[0, 1, 2]),
            Err(ShapeError::RankExceeded { .. })
        ));
        assert!(matches!(
            broadcast_check(&[1], &[4, 5], &[2]),
            Err(ShapeError::AxisOutOfRange { axis: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_default_axes() {
        assert_eq!(
            default_broadcast_axes(&[3, 1], &[2, 3, 4]).unwrap().as_slice(),
            &[1, 2]
        );
        assert!(default_broadcast_axes(&[], &[2]).unwrap().is_empty());
        assert_eq!(
            default_broadcast_axes(&[1, 2, 3], &[2, 3]),
            Err(ShapeError::RankExceeded { rank: 3, target: 2 })
        );
    }

    #[test]
    fn test_broadcast_names() {
        let (shape, new_names) = broadcast(
            &[3, 1],
            &names(&[Some("x"), Some("y")]),
            &[2, 3, 4],
            &[1, 2],
        )
        .unwrap();
        assert_eq!(shape.as_slice(), &[2, 3, 4]);
        assert_eq!(new_names, names(&[None, Some("x"), Some("y")]));
    }

    #[test]
    fn test_binary() {
        let (shape, merged) = binary_broadcast(
            &[8, 1, 6, 1],
            &names(&[Some("batch"), None, Some("data"), None]),
            &[7, 1, 5],
            &names(&[Some("time"), Some("data"), None]),
        )
        .unwrap();
        assert_eq!(shape.as_slice(), &[8, 7, 6, 5]);
        assert_eq!(
            merged,
            names(&[Some("batch"), Some("time"), Some("data"), None])
        );
    }

    #[test]
    fn test_binary_incompatible() {
        assert_eq!(
            binary_broadcast(
                &[4, 2, 5],
                &names(&[None, None, None]),
                &[3, 2, 5],
                &names(&[Some("batch"), Some("x"), Some("y")]),
            ),
            Err(ShapeError::BroadcastIncompatible {
                from: Shape::from_slice(&[4, 2, 5]),
                to: Shape::from_slice(&[3, 2, 5]),
                axes: None,
            })
        );
        // shape failure wins over name failure
        assert!(matches!(
            binary_broadcast(&[4], &names(&[Some("a")]), &[3], &names(&[Some("b")])),
            Err(ShapeError::BroadcastIncompatible { .. })
        ));
        assert!(matches!(
            binary_broadcast(&[4], &names(&[Some("a")]), &[4, 1], &names(&[None, Some("b")])),
            Err(ShapeError::NameConflict { .. })
        ));
    }

    #[test]
    fn test_names_length() {
        assert_eq!(
            broadcast(&[3, 1], &names(&[Some("x")]), &[2, 3, 4], &[1, 2]),
            Err(ShapeError::RankMismatch {
                what: "names",
                expected: 2,
                actual: 1,
            })
        );
        assert!(matches!(
            binary_broadcast(&[2, 3], &unnamed(2), &[4, 2, 3], &unnamed(2)),
            Err(ShapeError::RankMismatch { what: "names", .. })
        ));
    }

    #[test]
    fn test_binary_fast_path() {
        let n = names(&[Some("a"), None]);
        let (shape, merged) = binary_broadcast(&[2, 3], &n, &[2, 3], &n).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3]);
        assert_eq!(merged, n);
        let (shape, _) = binary_broadcast(&[], &[], &[], &[]).unwrap();
        assert!(shape.is_empty());
    }

    #[test]
    fn test_binary_commutes() {
        let cases: [(&[udim], &[udim]); 4] = [
            (&[8, 1, 6, 1], &[7, 1, 5]),
            (&[1], &[3, 4]),
            (&[], &[2, 2]),
            (&[5, 1, 3], &[1, 4, 1]),
        ];
        for (a, b) in cases {
            let (ab, _) = binary_broadcast(a, &unnamed(a.len()), b, &unnamed(b.len())).unwrap();
            let (ba, _) = binary_broadcast(b, &unnamed(b.len()), a, &unnamed(a.len())).unwrap();
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn test_operator() {
        let op = Broadcast {
            shape: Shape::from_slice(&[2, 3, 4]),
            axes: None,
        };
        let (shape, _) = op.infer(&[3, 1], &unnamed(2)).unwrap();
        assert_eq!(shape.as_slice(), &[2, 3, 4]);
    }
}
