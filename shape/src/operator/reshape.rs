use super::{check_names, Operator};
use crate::{merge_names, size, udim, unnamed, Name, Names, Result, Shape, ShapeError};

/// Reinterprets a tensor with a new shape holding the same number of elements.
pub struct Reshape {
    pub shape: Shape,
}

impl Operator for Reshape {
    #[inline]
    fn infer(&self, shape: &[udim], _names: &[Name]) -> Result<(Shape, Names)> {
        let shape = reshape(shape, &self.shape)?;
        let names = unnamed(shape.len());
        Ok((shape, names))
    }
}

pub fn reshape(old_shape: &[udim], new_shape: &[udim]) -> Result<Shape> {
    if size(old_shape)? == size(new_shape)? {
        Ok(Shape::from_slice(new_shape))
    } else {
        Err(ShapeError::SizeMismatch {
            from: Shape::from_slice(old_shape),
            to: Shape::from_slice(new_shape),
        })
    }
}

/// Joins tensors along `axis`; every other axis must agree in size.
pub fn concatenate(inputs: &[(&[udim], &[Name])], axis: usize) -> Result<(Shape, Names)> {
    let Some(&(first, first_names)) = inputs.first() else {
        return Err(ShapeError::RankMismatch {
            what: "concatenated inputs",
            expected: 1,
            actual: 0,
        });
    };
    check_names(first, first_names)?;
    if axis >= first.len() {
        return Err(ShapeError::AxisOutOfRange {
            axis: axis as _,
            rank: first.len(),
        });
    }

    let mut shape = Shape::from_slice(first);
    let mut names = Names::from(first_names);
    for &(other, other_names) in &inputs[1..] {
        if other.len() != shape.len() {
            return Err(ShapeError::RankMismatch {
                what: "concatenated input",
                expected: shape.len(),
                actual: other.len(),
            });
        }
        check_names(other, other_names)?;
        for (i, &d) in other.iter().enumerate() {
            if i == axis {
                shape[i] = shape[i]
                    .checked_add(d)
                    .ok_or(ShapeError::DimOverflow { axis: i })?;
            } else if shape[i] != d {
                return Err(ShapeError::DimensionMismatch {
                    axis1: i,
                    dim1: shape[i],
                    axis2: i,
                    dim2: d,
                });
            }
        }
        for (name, other) in names.iter_mut().zip(other_names) {
            *name = merge_names(name, other)?;
        }
    }
    Ok((shape, names))
}

#[test]
fn test_reshape() {
    assert_eq!(reshape(&[2, 3, 4], &[6, 4]).unwrap().as_slice(), &[6, 4]);
    assert_eq!(reshape(&[], &[1, 1]).unwrap().as_slice(), &[1, 1]);
    assert_eq!(
        reshape(&[2, 3], &[5]),
        Err(ShapeError::SizeMismatch {
            from: Shape::from_slice(&[2, 3]),
            to: Shape::from_slice(&[5]),
        })
    );
    let (shape, names) = Reshape {
        shape: Shape::from_slice(&[3, 2]),
    }
    .infer(&[2, 3], &[Some(crate::Label::from("a")), None])
    .unwrap();
    assert_eq!(shape.as_slice(), &[3, 2]);
    assert_eq!(names.as_slice(), &[None, None]);

    assert!(matches!(
        reshape(&[udim::MAX; 4], &[1]),
        Err(ShapeError::DimOverflow { .. })
    ));
}

#[test]
fn test_concatenate() {
    use crate::Label;

    let a = [Some(Label::from("n")), None];
    let b = [None, Some(Label::from("c"))];
    let (shape, names) = concatenate(&[(&[2, 3][..], &a[..]), (&[4, 3][..], &b[..])], 0).unwrap();
    assert_eq!(shape.as_slice(), &[6, 3]);
    assert_eq!(names.as_slice(), &[a[0].clone(), b[1].clone()]);

    assert_eq!(
        concatenate(&[(&[2, 3][..], &a[..]), (&[2, 4][..], &b[..])], 0),
        Err(ShapeError::DimensionMismatch {
            axis1: 1,
            dim1: 3,
            axis2: 1,
            dim2: 4,
        })
    );
    assert!(matches!(
        concatenate(&[(&[2, 3][..], &a[..])], 2),
        Err(ShapeError::AxisOutOfRange { axis: 2, rank: 2 })
    ));
    assert!(concatenate(&[], 0).is_err());
    assert!(matches!(
        concatenate(&[(&[2, 3][..], &a[..1])], 0),
        Err(ShapeError::RankMismatch { what: "names", .. })
    ));
}

#[test]
fn test_concatenate_overflow() {
    let names = crate::unnamed(1);
    assert_eq!(
        concatenate(&[(&[udim::MAX][..], &names[..]), (&[1][..], &names[..])], 0),
        Err(ShapeError::DimOverflow { axis: 0 })
    );
}
