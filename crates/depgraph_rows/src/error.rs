//! Error types for row mapping.

use thiserror::Error;

/// Errors that can occur while mapping rows to spans.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is null or absent.
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    /// A column holds a value of the wrong type.
    #[error("column '{column}' is not a {expected}")]
    ColumnType {
        /// The column name.
        column: String,
        /// The type the accessor asked for.
        expected: &'static str,
    },

    /// A serialized row is not an object.
    #[error("row is not a JSON object")]
    NotAnObject,

    /// The canonical span could not be built.
    #[error(transparent)]
    Model(#[from] depgraph_model::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a column type error.
    pub fn column_type(column: &str, expected: &'static str) -> Self {
        Self::ColumnType {
            column: column.to_string(),
            expected,
        }
    }
}

/// Result type alias for row mapping.
pub type Result<T> = std::result::Result<T, Error>;
