//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Format`] - Export format choice, converted to
//!   [`OutputFormat`](crate::core::output::OutputFormat)
//!
//! Flags given on the command line override values from the config file;
//! see [`Args::apply_to`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AnalysisConfig;
use crate::core::output::OutputFormat;

/// Default directory scanned when neither the command line nor the config
/// file names one.
pub const DEFAULT_INPUT_DIR: &str = "data-whatsapp";

/// Default export directory.
pub const DEFAULT_OUTPUT_DIR: &str = "chatlens-output";

/// Turn exported WhatsApp seller chats into response-time, funnel and
/// keyword statistics.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlens")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlens data-whatsapp
    chatlens chats/ -o report/ --format both
    chatlens chats/ --operator \"Shop Name\" --top 20
    chatlens -c chatlens.toml --join-continuations -v")]
pub struct Args {
    /// Directory containing one exported .txt file per conversation
    pub input_dir: Option<PathBuf>,

    /// TOML config file (operator, thresholds, keyword lists)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for exported tables
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: Format,

    /// Sender name of the seller account
    #[arg(long, value_name = "NAME")]
    pub operator: Option<String>,

    /// Number of senders in the top-senders table
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Response times at or above this many minutes are treated as outliers
    #[arg(long, value_name = "MIN")]
    pub latency_threshold: Option<f64>,

    /// Attach lines without a timestamp header to the previous message
    #[arg(long)]
    pub join_continuations: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Applies command-line overrides on top of `config`.
    pub fn apply_to(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(ref dir) = self.input_dir {
            config = config.with_input_dir(dir.clone());
        }
        if let Some(ref name) = self.operator {
            config = config.with_operator(name.clone());
        }
        if let Some(n) = self.top {
            config = config.with_top_senders(n);
        }
        if let Some(minutes) = self.latency_threshold {
            config = config.with_latency_threshold(minutes);
        }
        if self.join_continuations {
            config.parser.join_continuations = true;
        }
        config
    }
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum Format {
    /// One CSV file per table (default)
    #[default]
    Csv,

    /// A single report.json
    Json,

    /// CSV tables and report.json
    #[value(alias = "all")]
    Both,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Json => write!(f, "JSON"),
            Format::Both => write!(f, "CSV + JSON"),
        }
    }
}

// Conversion to library format type
impl From<Format> for OutputFormat {
    fn from(format: Format) -> OutputFormat {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
            Format::Both => OutputFormat::Both,
        }
    }
}
