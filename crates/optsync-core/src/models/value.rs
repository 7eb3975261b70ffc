//! Typed option values

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Values of a panel keyed by option key.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// A client-side typed option value.
///
/// The server only ever sees strings; see [`crate::models::OptionKind`] for
/// how each variant is decoded and encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    /// Short type label used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for empty text and empty lists.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) => false,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
            Self::List(items) => formatter.write_str(&items.join(", ")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_lists() {
        let value = OptionValue::List(vec!["a.com".to_string(), "b.com".to_string()]);
        assert_eq!(value.to_string(), "a.com, b.com");
        assert_eq!(OptionValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn blank_covers_text_and_lists_only() {
        assert!(OptionValue::from("  ").is_blank());
        assert!(OptionValue::List(Vec::new()).is_blank());
        assert!(!OptionValue::Bool(false).is_blank());
        assert!(!OptionValue::Integer(0).is_blank());
    }

    #[test]
    fn serializes_untagged() {
        let rendered = serde_json::to_string(&OptionValue::Integer(3)).unwrap();
        assert_eq!(rendered, "3");
        let rendered = serde_json::to_string(&OptionValue::from("00:01")).unwrap();
        assert_eq!(rendered, "\"00:01\"");
    }
}
