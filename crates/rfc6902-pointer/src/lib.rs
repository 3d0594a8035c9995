//! JSON Pointer (RFC 6901) addressing for JSON Patch.
//!
//! A [`Pointer`] is an immutable list of reference tokens whose first token is
//! always the empty string standing for the document root.
//!
//! # Example
//!
//! ```
//! use rfc6902_pointer::Pointer;
//! use serde_json::json;
//!
//! let ptr = Pointer::from_json("/foo/0").unwrap();
//! assert_eq!(ptr.tokens(), &["", "foo", "0"]);
//! assert_eq!(ptr.to_string(), "/foo/0");
//!
//! let doc = json!({"foo": ["bar"]});
//! assert_eq!(ptr.get(&doc), Some(&json!("bar")));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub mod get;
pub mod types;
pub mod util;

pub use get::{step, step_mut};
pub use types::{Evaluation, Parent};
pub use util::{
    escape_token, is_reserved, is_valid_index, parse_index, unescape_token, APPEND_TOKEN,
    RESERVED_TOKENS,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("Invalid JSON Pointer: {0}")]
    Invalid(String),
}

/// A parsed JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Default for Pointer {
    fn default() -> Self {
        Self::root()
    }
}

impl Pointer {
    /// The pointer to the whole document (`""`).
    pub fn root() -> Self {
        Self {
            tokens: vec![String::new()],
        }
    }

    /// Build a pointer from reference tokens below the root.
    ///
    /// ```
    /// use rfc6902_pointer::Pointer;
    ///
    /// let ptr = Pointer::from_tokens(["a/b~c"]);
    /// assert_eq!(ptr.to_string(), "/a~1b~0c");
    /// ```
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ptr = Self::root();
        ptr.tokens.extend(tokens.into_iter().map(Into::into));
        ptr
    }

    /// Parse a pointer string.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::Invalid`] unless `path` is empty or starts with `/`.
    ///
    /// ```
    /// use rfc6902_pointer::Pointer;
    ///
    /// assert!(Pointer::from_json("").unwrap().is_root());
    /// assert_eq!(Pointer::from_json("/").unwrap().tokens(), &["", ""]);
    /// assert!(Pointer::from_json("foo").is_err());
    /// ```
    pub fn from_json(path: &str) -> Result<Self, PointerError> {
        let tokens: Vec<String> = path.split('/').map(unescape_token).collect();
        if tokens.first().map(String::as_str) != Some("") {
            return Err(PointerError::Invalid(path.to_string()));
        }
        Ok(Self { tokens })
    }

    /// All tokens, starting with the root token `""`.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.len() == 1
    }

    /// The last token, `""` for the root pointer.
    pub fn last_token(&self) -> &str {
        self.tokens.last().map_or("", String::as_str)
    }

    /// Resolve the pointer without failing on missing locations.
    ///
    /// Reserved tokens (`__proto__`, `constructor`, `prototype`) do not move
    /// the cursor: the parent becomes the current value, the key becomes the
    /// reserved token and the value stays where it was.
    pub fn evaluate<'a>(&self, object: &'a Value) -> Evaluation<'a> {
        let mut eval = Evaluation::root(object);
        for token in &self.tokens[1..] {
            if is_reserved(token) {
                let current = eval.value;
                eval.descend(token, current);
                continue;
            }
            let next = eval.value.and_then(|v| step(v, token));
            eval.descend(token, next);
        }
        eval
    }

    /// Shorthand for `evaluate(object).value`.
    pub fn get<'a>(&self, object: &'a Value) -> Option<&'a Value> {
        self.evaluate(object).value
    }

    /// Mutable access to the container of the last token.
    ///
    /// Returns `None` for the root pointer and when an intermediate location
    /// does not exist.
    pub fn parent_mut<'a>(&self, object: &'a mut Value) -> Option<&'a mut Value> {
        let (_, ancestors) = self.tokens.split_last()?;
        let mut current = object;
        for token in ancestors.iter().skip(1) {
            if is_reserved(token) {
                continue;
            }
            current = step_mut(current, token)?;
        }
        if self.is_root() {
            return None;
        }
        Some(current)
    }

    /// Assign `value` at the pointer's location.
    ///
    /// Objects gain or overwrite the key; arrays accept an existing index,
    /// the index equal to their length, or `-`. Assigning at the root replaces
    /// the document. Returns whether an assignment happened.
    pub fn set(&self, object: &mut Value, value: Value) -> bool {
        if self.is_root() {
            *object = value;
            return true;
        }
        let key = self.last_token();
        let Some(parent) = self.parent_mut(object) else {
            return false;
        };
        match parent {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
                true
            }
            Value::Array(arr) => {
                if key == APPEND_TOKEN {
                    arr.push(value);
                    return true;
                }
                match parse_index(key) {
                    Some(i) if i < arr.len() => {
                        arr[i] = value;
                        true
                    }
                    Some(i) if i == arr.len() => {
                        arr.push(value);
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// A new pointer with `token` appended; `self` is unchanged.
    pub fn add(&self, token: impl ToString) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend(self.tokens.iter().cloned());
        tokens.push(token.to_string());
        Self { tokens }
    }

    /// Append `token` in place.
    pub fn push(&mut self, token: impl ToString) {
        self.tokens.push(token.to_string());
    }

    /// Check if `self` is a proper prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Pointer) -> bool {
        self.tokens.len() < other.tokens.len() && other.tokens.starts_with(&self.tokens)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&escape_token(token))?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(de::Error::custom)
    }
}
