//! Storage row to span mapping for dependency linking.
//!
//! This crate provides:
//! - The [`Row`] and [`Udt`] accessor traits a storage driver implements
//! - [`RowToSpan`], turning one denormalized span row into a canonical [`Span`]
//! - [`read_endpoint`], extracting service identity from an endpoint value
//! - A batch driver that feeds mapped spans into a [`SpanSink`]
//!
//! # Example
//!
//! ```rust,ignore
//! use depgraph_rows::{JsonRow, RowToSpan};
//!
//! let row = JsonRow::parse(r#"{"trace_id":"463ac35c9f6413ad","id":"a2fb4a1d1a96d312"}"#)?;
//! let span = RowToSpan.map(&row)?;
//! ```
//!
//! [`Span`]: depgraph_model::Span

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod batch;
pub mod endpoint;
pub mod error;
pub mod json;
pub mod mapper;
pub mod row;

pub use batch::{map_rows, JsonLinesSink, MapOptions, MapStats, SpanSink};
pub use endpoint::read_endpoint;
pub use error::{Error, Result};
pub use json::{read_rows, JsonRow, JsonUdt};
pub use mapper::{row_to_span, RowToSpan};
pub use row::{Row, Udt};
