use thiserror::Error;

use crate::models::{SchemaError, ValueRejection};

/// A field whose value cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

/// Errors surfaced by [`super::OptionPanel`]. None of them leave the panel
/// unusable; the caller can fix the input or retry.
#[derive(Debug, Error)]
pub enum PanelError {
    /// The request never produced a response envelope.
    #[error("Request failed: {0}")]
    Transport(#[from] crate::Error),

    /// The server answered `success: false`.
    #[error("{0}")]
    Server(String),

    /// Structured fields failed client-side validation; nothing was sent.
    #[error("{}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Options have not been loaded yet")]
    NotLoaded,

    #[error("Unknown option key '{0}' for this panel")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {reason}")]
    Rejected {
        key: String,
        #[source]
        reason: ValueRejection,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.key, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}
