//! Declarative option schemas
//!
//! A schema lists the keys a panel owns, the semantic type of each key and its
//! default. All string <-> value coercion lives here so every panel shares it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::response::OptionEntry;
use super::value::{OptionMap, OptionValue};
use crate::util::{parse_flag_input, parse_truthy, remove_trailing_slash};

static CLOCK_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Invalid regex"));

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("Invalid regex")
});

/// Whether the order of list items is meaningful when detecting changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Reordering counts as a modification (e.g. domain priority lists).
    #[default]
    Significant,
    /// Lists are compared as sorted multisets.
    Ignored,
}

/// Semantic type of an option and its wire coercion rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionKind {
    /// `"true"`/`"false"` on the wire; tolerant on read.
    Toggle,
    /// Base-10 integer; unparsable input decodes to `fallback`.
    Integer { fallback: i64 },
    /// Decimal number; unparsable input decodes to `fallback`.
    Float { fallback: f64 },
    /// Free text, passed through.
    Text,
    /// Free-text JSON document, validated before submission.
    Json { pretty: bool },
    /// JSON array of strings.
    StringList { order: ListOrder },
    /// Comma-separated list of strings.
    CommaList { order: ListOrder },
}

impl OptionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Toggle => "boolean",
            Self::Integer { .. } => "integer",
            Self::Float { .. } => "number",
            Self::Text => "text",
            Self::Json { .. } => "JSON text",
            Self::StringList { .. } | Self::CommaList { .. } => "list",
        }
    }

    pub const fn is_toggle(&self) -> bool {
        matches!(self, Self::Toggle)
    }

    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }

    const fn list_order(&self) -> Option<ListOrder> {
        match self {
            Self::StringList { order } | Self::CommaList { order } => Some(*order),
            _ => None,
        }
    }

    /// Coerce a raw wire string into this kind's value.
    pub fn decode(&self, raw: &str) -> OptionValue {
        match self {
            Self::Toggle => OptionValue::Bool(parse_truthy(raw)),
            Self::Integer { fallback } => {
                OptionValue::Integer(raw.trim().parse().unwrap_or(*fallback))
            }
            Self::Float { fallback } => OptionValue::Float(
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .unwrap_or(*fallback),
            ),
            Self::Text => OptionValue::Text(raw.to_string()),
            Self::Json { pretty } => {
                if *pretty {
                    if let Ok(document) = serde_json::from_str::<serde_json::Value>(raw) {
                        if let Ok(rendered) = serde_json::to_string_pretty(&document) {
                            return OptionValue::Text(rendered);
                        }
                    }
                }
                OptionValue::Text(raw.to_string())
            }
            Self::StringList { .. } => OptionValue::List(decode_json_list(raw).unwrap_or_default()),
            Self::CommaList { .. } => OptionValue::List(split_comma_list(raw)),
        }
    }

    /// Render a value as the string the server stores.
    pub fn encode(&self, value: &OptionValue) -> String {
        match (self, value) {
            (Self::StringList { .. }, OptionValue::List(items)) => {
                serde_json::to_string(items).unwrap_or_default()
            }
            (Self::CommaList { .. }, OptionValue::List(items)) => items.join(","),
            (_, other) => other.to_string(),
        }
    }

    /// Encoding used for change detection.
    pub fn canonical(&self, value: &OptionValue) -> String {
        match (self.list_order(), value) {
            (Some(ListOrder::Ignored), OptionValue::List(items)) => {
                let mut sorted = items.clone();
                sorted.sort();
                self.encode(&OptionValue::List(sorted))
            }
            _ => self.encode(value),
        }
    }

    /// Whether `value` has the variant this kind stores.
    pub const fn accepts(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (Self::Toggle, OptionValue::Bool(_))
                | (Self::Integer { .. }, OptionValue::Integer(_))
                | (Self::Float { .. }, OptionValue::Float(_))
                | (Self::Text | Self::Json { .. }, OptionValue::Text(_))
                | (
                    Self::StringList { .. } | Self::CommaList { .. },
                    OptionValue::List(_)
                )
        )
    }

    /// Parse human input from a form control or command line.
    pub fn parse_input(&self, input: &str) -> Result<OptionValue, String> {
        match self {
            Self::Toggle => parse_flag_input(input)
                .map(OptionValue::Bool)
                .ok_or_else(|| format!("expected true/false, got '{}'", input.trim())),
            Self::Integer { .. } => input
                .trim()
                .parse::<i64>()
                .map(OptionValue::Integer)
                .map_err(|_| format!("expected a base-10 integer, got '{}'", input.trim())),
            Self::Float { .. } => input
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(OptionValue::Float)
                .ok_or_else(|| format!("expected a number, got '{}'", input.trim())),
            Self::Text | Self::Json { .. } => Ok(OptionValue::Text(input.to_string())),
            Self::StringList { .. } | Self::CommaList { .. } => {
                if input.trim_start().starts_with('[') {
                    decode_json_list(input)
                        .map(OptionValue::List)
                        .ok_or_else(|| "expected a JSON array of strings".to_string())
                } else {
                    Ok(OptionValue::List(split_comma_list(input)))
                }
            }
        }
    }
}

/// Extra format check applied when a value is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// `HH:MM`, 24-hour clock.
    ClockTime,
    /// Every list item must be a bare domain name such as `gmail.com`.
    DomainNames,
}

impl FieldCheck {
    fn check(self, value: &OptionValue) -> Result<(), String> {
        match (self, value) {
            (Self::ClockTime, OptionValue::Text(text)) => {
                if CLOCK_TIME_RE.is_match(text.trim()) {
                    Ok(())
                } else {
                    Err(format!("'{text}' is not a HH:MM time"))
                }
            }
            (Self::DomainNames, OptionValue::List(items)) => {
                if let Some(bad) = items.iter().find(|item| !DOMAIN_RE.is_match(item)) {
                    return Err(format!("'{bad}' is not a valid domain name"));
                }
                let mut seen = HashSet::new();
                if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.as_str())) {
                    return Err(format!("'{duplicate}' is listed more than once"));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Why a value was refused for a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueRejection {
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("{0}")]
    Invalid(String),
}

/// One declared option of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    key: String,
    kind: OptionKind,
    default: OptionValue,
    bounds: Option<(i64, i64)>,
    check: Option<FieldCheck>,
    write_only: bool,
    sensitive: bool,
    url: bool,
}

impl FieldSpec {
    fn new(key: impl Into<String>, kind: OptionKind, default: OptionValue) -> Self {
        Self {
            key: key.into(),
            kind,
            default,
            bounds: None,
            check: None,
            write_only: false,
            sensitive: false,
            url: false,
        }
    }

    pub fn toggle(key: impl Into<String>) -> Self {
        Self::new(key, OptionKind::Toggle, OptionValue::Bool(false))
    }

    pub fn integer(key: impl Into<String>, fallback: i64) -> Self {
        Self::new(
            key,
            OptionKind::Integer { fallback },
            OptionValue::Integer(fallback),
        )
    }

    pub fn float(key: impl Into<String>, fallback: f64) -> Self {
        Self::new(
            key,
            OptionKind::Float { fallback },
            OptionValue::Float(fallback),
        )
    }

    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, OptionKind::Text, OptionValue::Text(String::new()))
    }

    pub fn json(key: impl Into<String>) -> Self {
        Self::new(
            key,
            OptionKind::Json { pretty: false },
            OptionValue::Text(String::new()),
        )
    }

    /// JSON document that is re-indented on load.
    pub fn pretty_json(key: impl Into<String>) -> Self {
        Self::new(
            key,
            OptionKind::Json { pretty: true },
            OptionValue::Text(String::new()),
        )
    }

    pub fn string_list(key: impl Into<String>, order: ListOrder) -> Self {
        Self::new(
            key,
            OptionKind::StringList { order },
            OptionValue::List(Vec::new()),
        )
    }

    pub fn comma_list(key: impl Into<String>, order: ListOrder) -> Self {
        Self::new(
            key,
            OptionKind::CommaList { order },
            OptionValue::List(Vec::new()),
        )
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<OptionValue>) -> Self {
        self.default = default.into();
        self
    }

    #[must_use]
    pub const fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    #[must_use]
    pub const fn with_check(mut self, check: FieldCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Credential field: redacted in output and never submitted when empty.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.sensitive = true;
        self.write_only = true;
        self
    }

    /// Never submit this field while it is empty.
    #[must_use]
    pub const fn skip_empty(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// URL field: trailing slashes are stripped before submission.
    #[must_use]
    pub const fn url(mut self) -> Self {
        self.url = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub const fn default_value(&self) -> &OptionValue {
        &self.default
    }

    pub const fn bounds(&self) -> Option<(i64, i64)> {
        self.bounds
    }

    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub const fn is_write_only(&self) -> bool {
        self.write_only
    }

    /// Keys ending in `enabled` (any case) are treated as on/off switches.
    pub fn is_switch(&self) -> bool {
        self.key.to_ascii_lowercase().ends_with("enabled")
    }

    /// Like [`OptionKind::decode`], but a malformed JSON list or an integer
    /// outside the declared bounds loads as the field default.
    pub fn decode(&self, raw: &str) -> OptionValue {
        if matches!(self.kind, OptionKind::StringList { .. }) && decode_json_list(raw).is_none() {
            return self.default.clone();
        }
        match (self.kind.decode(raw), self.bounds) {
            (OptionValue::Integer(number), Some((min, max))) if number < min || number > max => {
                self.default.clone()
            }
            (value, _) => value,
        }
    }

    pub fn encode(&self, value: &OptionValue) -> String {
        let encoded = self.kind.encode(value);
        if self.url {
            remove_trailing_slash(encoded.trim())
        } else {
            encoded
        }
    }

    pub fn canonical(&self, value: &OptionValue) -> String {
        if self.url {
            self.encode(value)
        } else {
            self.kind.canonical(value)
        }
    }

    /// Edit-time checks: type, integer bounds and format.
    pub fn check_value(&self, value: &OptionValue) -> Result<(), ValueRejection> {
        if !self.kind.accepts(value) {
            return Err(ValueRejection::TypeMismatch {
                expected: self.kind.label(),
                found: value.type_name(),
            });
        }
        if let (Some((min, max)), OptionValue::Integer(number)) = (self.bounds, value) {
            if *number < min || *number > max {
                return Err(ValueRejection::OutOfRange {
                    value: *number,
                    min,
                    max,
                });
            }
        }
        if let Some(check) = self.check {
            check.check(value).map_err(ValueRejection::Invalid)?;
        }
        Ok(())
    }

    /// Submit-time checks; currently JSON syntax for JSON fields.
    pub fn check_submission(&self, value: &OptionValue) -> Result<(), String> {
        if !self.kind.is_json() {
            return Ok(());
        }
        match value {
            OptionValue::Text(text) if text.trim().is_empty() => Ok(()),
            OptionValue::Text(text) => serde_json::from_str::<serde_json::Value>(text)
                .map(|_| ())
                .map_err(|error| format!("not valid JSON: {error}")),
            other => Err(format!("expected JSON text, got {}", other.type_name())),
        }
    }
}

/// Problems found while building a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema '{0}' declares no fields")]
    Empty(String),
    #[error("option key must not be empty")]
    EmptyKey,
    #[error("option key '{0}' is declared more than once")]
    DuplicateKey(String),
    #[error("default for '{key}' must be {expected}")]
    DefaultTypeMismatch { key: String, expected: &'static str },
}

/// The fixed key set of one panel, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl PanelSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let name = name.into();
        validate_fields(&name, &fields)?;
        Ok(Self { name, fields })
    }

    /// Built-in schemas are checked by tests rather than at runtime.
    pub(crate) fn builtin(name: &str, fields: Vec<FieldSpec>) -> Self {
        debug_assert!(validate_fields(name, &fields).is_ok());
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::key)
    }

    pub fn defaults(&self) -> OptionMap {
        self.fields
            .iter()
            .map(|field| (field.key.clone(), field.default.clone()))
            .collect()
    }

    /// Merge server entries over the declared defaults.
    ///
    /// Undeclared keys are ignored; declared keys missing from `entries` keep
    /// their default.
    pub fn coerce(&self, entries: &[OptionEntry]) -> OptionMap {
        let mut values = self.defaults();
        for entry in entries {
            if let Some(field) = self.field(&entry.key) {
                values.insert(entry.key.clone(), field.decode(&entry.value));
            }
        }
        values
    }
}

fn validate_fields(name: &str, fields: &[FieldSpec]) -> Result<(), SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::Empty(name.to_string()));
    }
    let mut seen = HashSet::new();
    for field in fields {
        if field.key.trim().is_empty() {
            return Err(SchemaError::EmptyKey);
        }
        if !seen.insert(field.key.as_str()) {
            return Err(SchemaError::DuplicateKey(field.key.clone()));
        }
        if !field.kind.accepts(&field.default) {
            return Err(SchemaError::DefaultTypeMismatch {
                key: field.key.clone(),
                expected: field.kind.label(),
            });
        }
    }
    Ok(())
}

fn decode_json_list(raw: &str) -> Option<Vec<String>> {
    if raw.trim().is_empty() {
        return Some(Vec::new());
    }
    match serde_json::from_str::<serde_json::Value>(raw).ok()? {
        serde_json::Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}
