//! Error types for span construction.

use thiserror::Error;

/// Errors that prevent a canonical span from being built.
#[derive(Debug, Error)]
pub enum Error {
    /// A field the span cannot exist without was never set.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An identifier is not a usable hex id.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidId {
        /// Name of the identifier field.
        field: &'static str,
        /// The rejected input.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl Error {
    /// Creates an invalid identifier error.
    pub fn invalid_id(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A span kind name outside the known set.
///
/// Returned by `Kind::from_str`; callers decide whether to log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown span kind '{0}'")]
pub struct UnknownKind(pub String);

/// Result type alias for span construction.
pub type Result<T> = std::result::Result<T, Error>;
