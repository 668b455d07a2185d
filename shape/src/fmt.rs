use crate::{udim, Axes, Name};
use std::fmt;

/// Renders a shape as `(2, 3, 4)`; the scalar shape renders as `()`.
pub struct DisplayShape<'a>(pub &'a [udim]);

/// Renders names as `[batch, _, data]`, with `_` for unnamed axes.
pub struct DisplayNames<'a>(pub &'a [Name]);

impl fmt::Display for DisplayShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for DisplayNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match name {
                Some(label) => write!(f, "{label}")?,
                None => write!(f, "_")?,
            }
        }
        write!(f, "]")
    }
}

pub(crate) fn on_axes(axes: &Option<Axes>) -> String {
    match axes {
        Some(axes) => format!(" on axes {:?}", axes.as_slice()),
        None => String::new(),
    }
}

#[test]
fn test_display() {
    use crate::Label;

    assert_eq!(DisplayShape(&[]).to_string(), "()");
    assert_eq!(DisplayShape(&[8, 7, 6]).to_string(), "(8, 7, 6)");
    assert_eq!(
        DisplayNames(&[Some(Label::from("batch")), None]).to_string(),
        "[batch, _]"
    );
}
