//! Canonical span model for dependency linking.
//!
//! This crate provides:
//! - The immutable [`Span`] record consumed by dependency aggregation
//! - [`Endpoint`] carrying service identity only
//! - [`SpanBuilder`] with the structural validation a span must pass
//! - Hex identifier normalization, including 128-bit to 64-bit narrowing
//!
//! # Example
//!
//! ```rust,ignore
//! use depgraph_model::{Endpoint, Kind, Span};
//!
//! let span = Span::builder()
//!     .with_trace_id("463ac35c9f6413ad48485a3953bb6124")
//!     .with_id("a2fb4a1d1a96d312")
//!     .with_kind(Kind::Server)
//!     .build()?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod endpoint;
pub mod error;
pub mod id;
pub mod span;

pub use endpoint::Endpoint;
pub use error::{Error, Result, UnknownKind};
pub use id::{low_64_bits, normalize_parent_id, normalize_span_id, normalize_trace_id};
pub use span::{Kind, Span, SpanBuilder};
