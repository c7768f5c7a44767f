//! # Chatlens
//!
//! A Rust library for turning exported WhatsApp chat logs of a single seller
//! account into customer-support statistics.
//!
//! ## Overview
//!
//! Each exported `.txt` file is one conversation between the seller (the
//! *operator*) and one customer. Chatlens:
//!
//! - **parses** the `DD/MM/YY HH.MM - Sender: body` lines into [`Message`]s,
//!   normalizing sender names and counting the lines it could not use
//! - **groups** messages into time-sorted conversations
//! - **classifies** message text against literal keyword taxonomies
//!   (product types, question types, locations, drop-off reasons)
//! - **measures** sender frequency, activity histograms, response latency,
//!   unanswered conversations and a three-stage engagement funnel
//! - **exports** the results as CSV tables or one JSON report
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlens::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = AnalysisConfig::new().with_operator("My Shop");
//!     let parser = ChatLogParser::with_config(config.parser.clone());
//!     let corpus = load_dir("data-whatsapp".as_ref(), &config.extension, &parser)?;
//!
//!     let report = analyze(&corpus, &config);
//!     println!("{} conversations", report.stats.conversations);
//!     println!("median reply: {:?} min", report.latency.median());
//!
//!     write_csv_report(&corpus, &report, "out".as_ref(), &ExportConfig::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - line parser: [`ChatLogParser`](parser::ChatLogParser), [`parse`](parser::parse)
//! - [`corpus`] - directory loading: [`load_dir`](corpus::load_dir), [`Corpus`](corpus::Corpus)
//! - [`config`] - [`AnalysisConfig`](config::AnalysisConfig), TOML loading, default keyword lists
//! - [`core`] - conversations, classifier, metrics and export writers
//! - [`report`] - [`analyze`](report::analyze) runs every metric into an [`AnalysisReport`](report::AnalysisReport)
//! - [`message`] - [`Message`], [`Operator`](message::Operator)
//! - [`error`] - Unified error types ([`ChatlensError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod parser;
pub mod report;

// Re-export the main types at the crate root for convenience
pub use error::{ChatlensError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    // Core message types
    pub use crate::Message;
    pub use crate::message::{Operator, Role};

    // Error types
    pub use crate::error::{ChatlensError, Result};

    // Parsing and loading
    pub use crate::corpus::{Corpus, SkippedFile, load_dir};
    pub use crate::parser::{ChatLogParser, ParseReport, parse};

    // Configuration
    pub use crate::config::{AnalysisConfig, FunnelConfig, ParserConfig};

    // Analysis
    pub use crate::core::classifier::{Category, MatchPolicy, Taxonomy};
    pub use crate::core::conversation::{Conversation, group};
    pub use crate::core::models::{CountTable, FunnelReport, LatencyReport};
    pub use crate::report::{AnalysisReport, analyze};

    // Output (file writers and string converters)
    pub use crate::core::output::OutputFormat;
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{ExportConfig, table_to_csv, write_csv_report};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{report_to_json, write_json_report};
}
