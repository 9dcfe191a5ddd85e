//! Row to span mapping.
//!
//! One storage row becomes one canonical span. Optional fields that cannot
//! be read sensibly are left out of the span rather than failing the row;
//! only a span that cannot be built at all is an error.

use crate::endpoint::read_endpoint;
use crate::error::{Error, Result};
use crate::row::Row;
use depgraph_model::{low_64_bits, normalize_trace_id, Kind, Span};
use tracing::debug;

/// Column names of a span row.
pub mod column {
    /// Trace id, 16 or 32 hex characters.
    pub const TRACE_ID: &str = "trace_id";
    /// Parent span id.
    pub const PARENT_ID: &str = "parent_id";
    /// Span id.
    pub const ID: &str = "id";
    /// Start time in epoch microseconds.
    pub const TS: &str = "ts";
    /// Shared span flag.
    pub const SHARED: &str = "shared";
    /// Tag map.
    pub const TAGS: &str = "tags";
    /// Span kind name.
    pub const KIND: &str = "kind";
    /// Local endpoint.
    pub const LOCAL_ENDPOINT: &str = "l_ep";
    /// Remote endpoint.
    pub const REMOTE_ENDPOINT: &str = "r_ep";
}

/// The only tag carried into the span.
pub const ERROR_TAG: &str = "error";

/// Maps span rows to canonical spans.
///
/// Stateless; copy it freely across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowToSpan;

impl RowToSpan {
    /// Maps one row. See [`row_to_span`].
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot become a span.
    pub fn map<R: Row>(self, row: &R) -> Result<Span> {
        row_to_span(row)
    }
}

/// Maps one row to a canonical span.
///
/// 128-bit trace ids are narrowed to their low 64 bits. Only the `error`
/// tag is kept. Unknown kinds are dropped with a debug event. Optional
/// columns the accessor cannot read are left out of the span.
///
/// # Errors
///
/// Returns `Error::MissingColumn` if `trace_id` or `id` is null,
/// `Error::Model` if an id is malformed, and `Error::ColumnType` if an id
/// column is not a string.
pub fn row_to_span<R: Row>(row: &R) -> Result<Span> {
    let trace_id = normalize_trace_id(&required(row, column::TRACE_ID)?)?;
    let trace_id = low_64_bits(&trace_id);
    let span_id = required(row, column::ID)?;

    let mut builder = Span::builder()
        .with_trace_id(trace_id)
        .with_id(&span_id)
        .with_shared(optional(row.boolean(column::SHARED)).unwrap_or_default());

    if let Some(parent_id) = row.string(column::PARENT_ID)? {
        builder = builder.with_parent_id(&parent_id);
    }

    if let Some(ts) = optional(row.long(column::TS)) {
        builder = builder.with_timestamp(ts);
    }

    let error =
        optional(row.string_map(column::TAGS)).and_then(|mut tags| tags.remove(ERROR_TAG));
    if let Some(error) = error {
        builder = builder.with_tag(ERROR_TAG, error);
    }

    if let Some(kind) = optional(row.string(column::KIND)) {
        match kind.parse::<Kind>() {
            Ok(kind) => builder = builder.with_kind(kind),
            Err(unknown) => {
                debug!(
                    kind = %unknown.0,
                    trace_id = %trace_id,
                    span_id = %span_id,
                    "couldn't parse span kind"
                );
            }
        }
    }

    if let Some(endpoint) = read_endpoint(optional(row.udt(column::LOCAL_ENDPOINT)).as_ref()) {
        builder = builder.with_local_endpoint(endpoint);
    }

    if let Some(endpoint) = read_endpoint(optional(row.udt(column::REMOTE_ENDPOINT)).as_ref()) {
        builder = builder.with_remote_endpoint(endpoint);
    }

    Ok(builder.build()?)
}

fn required<R: Row>(row: &R, column: &'static str) -> Result<String> {
    row.string(column)?.ok_or(Error::MissingColumn(column))
}

/// An optional column that cannot be read counts as null.
fn optional<T>(value: Result<Option<T>>) -> Option<T> {
    value.ok().flatten()
}
