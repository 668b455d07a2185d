use crate::{Result, ShapeError};
use serde::{
    de::{Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Label of a single axis.
///
/// Cloning shares the text, and two clones of one label compare equal in O(1)
/// without looking at the characters. Labels built separately from equal text
/// are not interned and fall back to comparing the text.
#[derive(Clone)]
pub struct Label(Arc<str>);

/// Optional axis label; `None` marks an unnamed axis.
pub type Name = Option<Label>;

impl Label {
    #[inline]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Label {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Label {}

impl Hash for Label {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl From<&str> for Label {
    #[inline]
    fn from(text: &str) -> Self {
        Self(text.into())
    }
}

impl From<String> for Label {
    #[inline]
    fn from(text: String) -> Self {
        Self(text.into())
    }
}

impl fmt::Display for Label {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Label {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(LabelVisitor)
    }
}

struct LabelVisitor;

impl<'de> Visitor<'de> for LabelVisitor {
    type Value = Label;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a non-empty axis name")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v.is_empty() {
            Err(E::invalid_value(Unexpected::Str(v), &self))
        } else {
            Ok(Label::from(v))
        }
    }
}

/// Combines the names two aligned axes carry.
///
/// An unnamed side adopts the other side's name; two different names conflict.
pub fn merge_names(a: &Name, b: &Name) -> Result<Name> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(x), None) | (None, Some(x)) => Ok(Some(x.clone())),
        (Some(x), Some(y)) if x == y => Ok(Some(x.clone())),
        (Some(x), Some(y)) => Err(ShapeError::NameConflict {
            left: x.clone(),
            right: y.clone(),
        }),
    }
}

#[test]
fn test_merge() {
    let x = Some(Label::from("x"));
    let y = Some(Label::from("y"));
    assert_eq!(merge_names(&None, &None), Ok(None));
    assert_eq!(merge_names(&None, &x), Ok(x.clone()));
    assert_eq!(merge_names(&x, &None), Ok(x.clone()));
    assert_eq!(merge_names(&x, &Some(Label::from("x"))), Ok(x.clone()));
    assert_eq!(
        merge_names(&x, &y),
        Err(ShapeError::NameConflict {
            left: Label::from("x"),
            right: Label::from("y"),
        })
    );
}

#[test]
fn test_merge_commutes() {
    let names = [None, Some(Label::from("a")), Some(Label::from("b"))];
    for a in &names {
        for b in &names {
            match (merge_names(a, b), merge_names(b, a)) {
                (Ok(l), Ok(r)) => assert_eq!(l, r),
                (Err(_), Err(_)) => {}
                (l, r) => panic!("{l:?} vs {r:?}"),
            }
        }
    }
}

#[test]
fn test_serde() {
    let label: Label = serde_json::from_str("\"batch\"").unwrap();
    assert_eq!(label, Label::from("batch"));
    assert_eq!(serde_json::to_string(&label).unwrap(), "\"batch\"");
    assert!(serde_json::from_str::<Label>("\"\"").is_err());
}

#[test]
fn test_shared() {
    let x = Label::from("x");
    let clone = x.clone();
    assert!(Arc::ptr_eq(&x.0, &clone.0));
    assert_eq!(x, clone);

    let separate = Label::from("x");
    assert!(!Arc::ptr_eq(&x.0, &separate.0));
    assert_eq!(x, separate);
}
