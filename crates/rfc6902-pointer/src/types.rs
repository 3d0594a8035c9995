//! Result types for pointer evaluation.

use serde_json::Value;

use crate::util::parse_index;

/// The container a pointer's last token was looked up in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parent<'a> {
    /// The pointer is the root pointer; there is no container.
    Root,
    /// An intermediate token did not resolve, so the container does not exist.
    Missing,
    /// The container value (which may still be a scalar).
    Found(&'a Value),
}

impl<'a> Parent<'a> {
    fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            Some(v) => Parent::Found(v),
            None => Parent::Missing,
        }
    }

    /// The container, if one was resolved.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Parent::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Parent::Missing)
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Parent::Root)
    }
}

/// Outcome of resolving a pointer against a document.
///
/// Resolution is tolerant: a missing intermediate yields `Parent::Missing`
/// and `value: None` rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    pub parent: Parent<'a>,
    /// The last token, or `""` for the root pointer.
    pub key: String,
    /// The resolved value, `None` when nothing lives at the pointer.
    pub value: Option<&'a Value>,
}

impl<'a> Evaluation<'a> {
    pub(crate) fn root(value: &'a Value) -> Self {
        Self {
            parent: Parent::Root,
            key: String::new(),
            value: Some(value),
        }
    }

    pub(crate) fn descend(&mut self, token: &str, value: Option<&'a Value>) {
        self.parent = Parent::from_value(self.value);
        self.key = token.to_string();
        self.value = value;
    }

    /// Check if the parent is an array.
    pub fn is_array_reference(&self) -> bool {
        matches!(self.parent, Parent::Found(Value::Array(_)))
    }

    /// Check if the parent is an object.
    pub fn is_object_reference(&self) -> bool {
        matches!(self.parent, Parent::Found(Value::Object(_)))
    }

    /// The key as an array index, when the parent is an array.
    pub fn index(&self) -> Option<usize> {
        if self.is_array_reference() {
            parse_index(&self.key)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_reference_index() {
        let doc = json!([1, 2, 3]);
        let eval = Evaluation {
            parent: Parent::Found(&doc),
            key: "1".to_string(),
            value: Some(&doc[1]),
        };
        assert!(eval.is_array_reference());
        assert!(!eval.is_object_reference());
        assert_eq!(eval.index(), Some(1));
    }

    #[test]
    fn object_reference_has_no_index() {
        let doc = json!({"0": "zero"});
        let eval = Evaluation {
            parent: Parent::Found(&doc),
            key: "0".to_string(),
            value: doc.get("0"),
        };
        assert!(eval.is_object_reference());
        assert_eq!(eval.index(), None);
    }

    #[test]
    fn parent_accessors() {
        assert!(Parent::Root.is_root());
        assert!(Parent::Missing.is_missing());
        assert_eq!(Parent::Missing.value(), None);
        let v = json!(1);
        assert_eq!(Parent::Found(&v).value(), Some(&v));
    }
}
