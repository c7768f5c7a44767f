//! Core analysis logic for chatlens.
//!
//! This module contains:
//! - [`conversation`] - Grouping messages into time-sorted conversations
//! - [`classifier`] - Keyword taxonomies and substring matching
//! - [`metrics`] - Frequency, histogram, latency, drop-off and funnel metrics
//! - [`models`] - Typed metric results ([`CountTable`], [`LatencyReport`], ...)
//! - [`output`] - Export writers (CSV, JSON)
//!
//! # Quick Start
//!
//! ```rust
//! use chatlens::core::{Category, MatchPolicy, Taxonomy, group, keyword_mentions};
//! use chatlens::parser::parse;
//!
//! let messages = parse(["01/02/23 09.00 - Alice: price?"], "alice.txt");
//! let conversations = group(messages.clone());
//! assert_eq!(conversations.len(), 1);
//!
//! let topics = Taxonomy::new(MatchPolicy::FirstMatch, true)
//!     .with_category(Category::new("Price", ["price"]));
//! assert_eq!(keyword_mentions(&messages, &topics).get("Price"), Some(1));
//! ```

pub mod classifier;
pub mod conversation;
pub mod metrics;
pub mod models;
pub mod output;

// Re-export main types for convenience
pub use classifier::{Category, MatchPolicy, Taxonomy};
pub use conversation::{Conversation, group};
pub use models::{
    CountRow, CountTable, FunnelReport, LatencyObservation, LatencyReport, UnansweredConversation,
};

// Re-export Message from the crate root
pub use crate::Message;

pub use metrics::{
    daily_histogram, drop_off_tally, funnel, hourly_histogram, keyword_mentions,
    message_count_per_conversation, response_latency, sender_frequency, unanswered_conversations,
    weekday_histogram,
};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{ExportConfig, table_to_csv, write_csv_report};
#[cfg(feature = "json-output")]
pub use output::{report_to_json, write_json_report};
pub use output::OutputFormat;
