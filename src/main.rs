//! lsp-digest - Entry Point
//!
//! Replays a captured host snapshot through the diagnostics or locations
//! source and prints every item batch as one JSON line on stdout.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lsp_digest::client::ClientName;
use lsp_digest::config::{BufferScope, SourceParams};
use lsp_digest::host::{SnapshotHost, TracingReporter};
use lsp_digest::source::{DiagnosticSource, Item, LocationSource, SeverityIcons, SourceContext};

/// Normalize and list LSP diagnostics and locations.
#[derive(Parser, Debug)]
#[command(name = "lsp-digest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the diagnostics of one client.
    Diagnostics {
        /// Host snapshot to answer queries from.
        #[arg(short, long)]
        snapshot: PathBuf,

        /// JSON file with source parameters.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Client to read diagnostics from (overrides params).
        #[arg(long)]
        client: Option<ClientName>,

        /// Buffers to list; repeatable, 0 means the current buffer (overrides params).
        #[arg(long)]
        buffer: Vec<u32>,

        /// Buffer the request is made from.
        #[arg(long, default_value_t = 1)]
        current: u32,

        /// Prefix items with severity icons.
        #[arg(long)]
        icons: bool,

        /// Emit protocol-conformant diagnostics as item data.
        #[arg(long)]
        protocol: bool,
    },

    /// List the targets of a navigation method.
    Locations {
        /// Host snapshot to answer queries from.
        #[arg(short, long)]
        snapshot: PathBuf,

        /// JSON file with source parameters.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// LSP method, e.g. textDocument/definition (overrides params).
        #[arg(short, long)]
        method: Option<String>,

        /// Buffer the request is made from.
        #[arg(long, default_value_t = 1)]
        current: u32,

        /// Window the request is made from.
        #[arg(long, default_value_t = 1000)]
        window: u32,
    },

    /// Print the JSON schema of the source parameters.
    Schema,
}

impl Args {
    /// Parses the log level string into a tracing Level.
    fn parse_log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => anyhow::bail!("invalid log level: {}", other),
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(level: Level, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lsp_digest={level}")));

    // Logs go to stderr; stdout carries the item batches
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}

fn load_params(path: Option<&Path>) -> Result<SourceParams> {
    match path {
        Some(path) => SourceParams::from_file(path)
            .with_context(|| format!("failed to load params from {}", path.display())),
        None => Ok(SourceParams::default()),
    }
}

fn load_snapshot(path: &Path) -> Result<SnapshotHost> {
    SnapshotHost::from_file(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))
}

fn print_batch<T: Serialize>(batch: &[T]) -> Result<()> {
    let line = serde_json::to_string(batch).context("failed to serialize items")?;
    println!("{line}");
    Ok(())
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.parse_log_level()?;
    init_tracing(log_level, args.log_json)?;

    let reporter = Arc::new(TracingReporter);

    match args.command {
        Command::Diagnostics {
            snapshot,
            params,
            client,
            buffer,
            current,
            icons,
            protocol,
        } => {
            let mut params = load_params(params.as_deref())?;
            if let Some(client) = client {
                params.client_name = client;
            }
            if !buffer.is_empty() {
                params.buffer = Some(BufferScope::Many(buffer));
            }
            let context = SourceContext {
                buf_nr: current,
                win_id: 0,
            };
            info!(client = %params.client_name, buffer = ?params.buffer, "listing diagnostics");

            let host = load_snapshot(&snapshot)?;
            let source = DiagnosticSource::new(host).with_reporter(reporter);
            let batches: Vec<_> = if icons {
                let source = source.with_decorator(SeverityIcons::default());
                source.gather(params, context).collect().await
            } else {
                source.gather(params, context).collect().await
            };

            for batch in batches {
                if protocol {
                    let batch: Vec<_> = batch.into_iter().map(Item::into_protocol).collect();
                    print_batch(&batch)?;
                } else {
                    print_batch(&batch)?;
                }
            }
        }
        Command::Locations {
            snapshot,
            params,
            method,
            current,
            window,
        } => {
            let mut params = load_params(params.as_deref())?;
            if let Some(method) = method {
                params.method = method;
            }
            let context = SourceContext {
                buf_nr: current,
                win_id: window,
            };
            info!(method = %params.method, "listing locations");

            let host = load_snapshot(&snapshot)?;
            let source = LocationSource::new(host).with_reporter(reporter);
            let mut batches = pin!(source.gather(params, context));
            while let Some(batch) = batches.next().await {
                print_batch(&batch)?;
            }
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&SourceParams::json_schema())
                .context("failed to serialize schema")?;
            println!("{schema}");
        }
    }

    Ok(())
}
