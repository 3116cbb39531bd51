//! Error types for settings buffer and field operations.

use thiserror::Error;

use crate::settings::fields::{FieldKind, FieldName};

/// Result type alias using hearth-core's settings error.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    /// The buffer has no title yet; edits are gated until the load completes.
    #[error("Settings are still loading")]
    NotReady,

    #[error("Unknown settings field: {0}")]
    UnknownField(String),

    /// Derived fields are computed from the environment and never written back.
    #[error("Field '{0}' is read-only")]
    ReadOnlyField(FieldName),

    #[error("Field '{field}' is not editable in the {scope} scope")]
    OutOfScope {
        field: FieldName,
        scope: &'static str,
    },

    #[error("Field '{field}' expects a {expected} value")]
    TypeMismatch { field: FieldName, expected: FieldKind },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: FieldName, reason: String },

    /// The backend returned something that is not a settings object.
    #[error("Malformed settings response: {0}")]
    Malformed(String),
}
