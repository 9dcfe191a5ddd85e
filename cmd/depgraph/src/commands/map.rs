//! Map command implementation.

use anyhow::{Context, Result};
use depgraph_rows::{map_rows, read_rows, JsonLinesSink, MapOptions, MapStats};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing::{info, warn};

/// Input path meaning stdin.
const STDIN: &str = "-";

/// Runs the map command.
pub fn run(input: &str, output: Option<&str>, fail_fast: bool) -> Result<()> {
    info!("Mapping rows from: {}", if input == STDIN { "stdin" } else { input });

    let reader: Box<dyn BufRead> = if input == STDIN {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open row export: {input}"))?;
        Box::new(BufReader::new(file))
    };

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {path}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let stats = map_to(reader, writer, fail_fast)?;

    info!("Mapped {} span(s)", stats.mapped);
    if stats.skipped > 0 {
        warn!("Skipped {} row(s) that could not be mapped", stats.skipped);
    }
    if let Some(path) = output {
        info!("Spans written to: {}", path);
    }

    Ok(())
}

/// Maps rows from `reader` into span lines on `writer`.
fn map_to<R: BufRead, W: Write>(reader: R, writer: W, fail_fast: bool) -> Result<MapStats> {
    let mut sink = JsonLinesSink::new(writer);
    let stats = map_rows(read_rows(reader), &mut sink, MapOptions { fail_fast })
        .with_context(|| "Failed to map rows")?;
    sink.into_inner().with_context(|| "Failed to flush output")?;
    Ok(stats)
}
