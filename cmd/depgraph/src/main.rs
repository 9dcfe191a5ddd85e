//! Depgraph CLI - span row mapping for dependency linking.
//!
//! Commands:
//! - `depgraph map` - Map exported span rows (NDJSON) to canonical spans

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(about = "Map exported span rows to canonical spans for dependency linking")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "DEPGRAPH_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Map newline-delimited JSON rows to canonical spans
    Map {
        /// Path to the row export, or `-` for stdin
        #[arg(short, long, default_value = "-", env = "DEPGRAPH_INPUT")]
        input: String,

        /// Output path for span NDJSON (stdout if omitted)
        #[arg(short, long, env = "DEPGRAPH_OUTPUT")]
        output: Option<String>,

        /// Stop at the first row that cannot be mapped
        #[arg(long)]
        fail_fast: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry spans
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    match cli.command {
        Commands::Map {
            input,
            output,
            fail_fast,
        } => commands::map::run(&input, output.as_deref(), fail_fast),
    }
}
