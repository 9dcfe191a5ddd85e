//! Batch mapping of rows into a span sink.
//!
//! Rows are independent: a row that cannot be mapped is logged and counted,
//! and the rest of the batch carries on unless `fail_fast` is set. Sink
//! failures always stop the batch.

use crate::error::Result;
use crate::mapper::row_to_span;
use crate::row::Row;
use depgraph_model::Span;
use std::io::Write;
use tracing::warn;

/// A consumer of mapped spans.
pub trait SpanSink {
    /// Accepts one span.
    ///
    /// # Errors
    ///
    /// Returns an error if the span cannot be stored or written.
    fn accept(&mut self, span: Span) -> Result<()>;
}

impl SpanSink for Vec<Span> {
    fn accept(&mut self, span: Span) -> Result<()> {
        self.push(span);
        Ok(())
    }
}

/// Writes each span as one JSON line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> SpanSink for JsonLinesSink<W> {
    fn accept(&mut self, span: Span) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &span)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Options for [`map_rows`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MapOptions {
    /// Stop at the first row that cannot be mapped.
    pub fail_fast: bool,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    /// Rows mapped and accepted by the sink.
    pub mapped: usize,
    /// Rows skipped because they could not be read or mapped.
    pub skipped: usize,
}

/// Maps every row and hands the spans to `sink`.
///
/// Items that are already errors (for example an unparseable input line)
/// are treated like rows that fail to map.
///
/// # Errors
///
/// Returns the sink's error, or the first row error when
/// `options.fail_fast` is set.
pub fn map_rows<R, I, S>(rows: I, sink: &mut S, options: MapOptions) -> Result<MapStats>
where
    R: Row,
    I: IntoIterator<Item = Result<R>>,
    S: SpanSink + ?Sized,
{
    let mut stats = MapStats::default();

    for (index, row) in rows.into_iter().enumerate() {
        match row.and_then(|row| row_to_span(&row)) {
            Ok(span) => {
                sink.accept(span)?;
                stats.mapped += 1;
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                warn!(row = index + 1, error = %e, "skipping row");
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
