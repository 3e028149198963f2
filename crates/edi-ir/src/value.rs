//! Positional values exchanged with the wire layer
#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

/// A positional value: a scalar string or an ordered list of values.
///
/// Leaves parse and serialize `Text`; nodes parse and serialize `List`,
/// recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Scalar string
    Text(String),

    /// Ordered list, one entry per child position
    List(Vec<Value>),
}

impl Value {
    /// Create a scalar value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Create a list value from anything convertible into values
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Borrow the scalar content, if this is `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::List(_) => None,
        }
    }

    /// Borrow the items, if this is `List`
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Text(_) => None,
            Value::List(items) => Some(items),
        }
    }

    /// Short kind label used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_nested_vec() {
        let value = Value::list([Value::from("1"), Value::from(vec!["a", "b"])]);

        assert_eq!(value.as_list().map(<[Value]>::len), Some(2));
        assert_eq!(
            value.as_list().and_then(|items| items[1].as_list()),
            Some(&[Value::from("a"), Value::from("b")][..])
        );
        assert_eq!(value.kind(), "list");
    }

    #[test]
    fn test_value_text_accessors() {
        let value = Value::text("65");

        assert_eq!(value.as_text(), Some("65"));
        assert!(value.as_list().is_none());
    }

    #[test]
    fn test_value_json_is_untagged() {
        let value = Value::from(vec![Value::from("5"), Value::from(vec!["6", "7"])]);
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json, serde_json::json!(["5", ["6", "7"]]));

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
