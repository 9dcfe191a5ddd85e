//! Row accessor abstraction.
//!
//! A storage driver exposes one span row through typed getters keyed by
//! column name. Getters return `Ok(None)` for null or absent columns and an
//! error when the stored value has a different type.

use crate::error::Result;
use std::collections::HashMap;

/// A nested user-defined value inside a row, such as an endpoint.
pub trait Udt {
    /// Reads a string field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not a string.
    fn string(&self, field: &str) -> Result<Option<String>>;
}

/// One denormalized span row.
pub trait Row {
    /// The nested value type returned by [`Row::udt`].
    type Udt: Udt;

    /// Reads a string column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a string.
    fn string(&self, column: &str) -> Result<Option<String>>;

    /// Reads a 64-bit integer column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not an integer.
    fn long(&self, column: &str) -> Result<Option<i64>>;

    /// Reads a boolean column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a boolean.
    fn boolean(&self, column: &str) -> Result<Option<bool>>;

    /// Reads a string-to-string map column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a map of strings.
    fn string_map(&self, column: &str) -> Result<Option<HashMap<String, String>>>;

    /// Reads a nested user-defined value.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a nested value.
    fn udt(&self, column: &str) -> Result<Option<Self::Udt>>;
}
