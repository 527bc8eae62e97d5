//! braid: inspect execution-branch timeline layouts.
//!
//! Usage:
//!   # Lay out a JSON array of records as an ASCII gutter
//!   braid layout timeline.json --format ascii
//!
//!   # Static subtree lanes, config from a RON file, records on stdin
//!   cat timeline.json | braid layout --strategy subtree --config braid.ron
//!
//!   # Show how a text decomposes into nested group markers
//!   braid split message.txt

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt};

use braid_layout::{LaneStrategy, LayoutConfig, Record, TimelineLayout, decompose};

mod render;

/// Execution-branch timeline layout inspector.
#[derive(Parser, Debug)]
#[command(name = "braid")]
#[command(about = "Compute lane and connector layouts for execution-branch timelines")]
struct Args {
    /// Log at debug level (RUST_LOG still applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a timeline of JSON records
    Layout {
        /// JSON array (or one record per line); stdin when omitted
        file: Option<PathBuf>,

        /// Lane strategy, overriding the config file
        #[arg(long)]
        strategy: Option<LaneStrategy>,

        /// RON layout config
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Decompose text into nested group marker segments
    Split {
        /// Text file; stdin when omitted
        file: Option<PathBuf>,

        /// Nesting ceiling, overriding the default
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Ascii,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the layout; logs go to stderr
    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match args.command {
        Command::Layout {
            file,
            strategy,
            config,
            format,
        } => {
            let mut config = match config {
                Some(path) => LayoutConfig::load(&path)
                    .with_context(|| format!("loading layout config {}", path.display()))?,
                None => LayoutConfig::default(),
            };
            if let Some(strategy) = strategy {
                config = config.with_strategy(strategy);
            }

            let records = parse_records(&read_input(file.as_deref())?)?;
            let layout = TimelineLayout::compute(&records, &config);
            tracing::info!(rows = layout.len(), strategy = %config.strategy, "layout ready");

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
                Format::Ascii => {
                    for line in render::format_layout_lines(&layout, &records) {
                        println!("{line}");
                    }
                }
            }
        }
        Command::Split { file, max_depth } => {
            let text = read_input(file.as_deref())?;
            let max_depth = max_depth.unwrap_or(LayoutConfig::default().max_nesting_depth);
            for line in render::format_segment_lines(&decompose(&text, max_depth)) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

/// Records from a JSON array, or from JSON lines when the input is not an array.
fn parse_records(text: &str) -> Result<Vec<Record>> {
    if text.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(text).context("parsing record array")?;
        return Ok(values.into_iter().map(Record::new).collect());
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<Value>(line)
                .map(Record::new)
                .with_context(|| format!("parsing record on line {}", n + 1))
        })
        .collect()
}
