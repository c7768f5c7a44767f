//! The full analysis pipeline over a loaded corpus.
//!
//! [`analyze`] runs every metric with the settings from an
//! [`AnalysisConfig`] and bundles the results into an [`AnalysisReport`],
//! which the CLI prints and the output writers export.
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::AnalysisConfig;
//! use chatlens::corpus::Corpus;
//! use chatlens::parser::parse;
//! use chatlens::report::analyze;
//!
//! let messages = parse(
//!     [
//!         "01/02/23 09.00 - Alice: سعر العود؟",
//!         "01/02/23 09.05 - Shop: 50 ريال",
//!     ],
//!     "alice.txt",
//! );
//! let config = AnalysisConfig::new().with_operator("Shop");
//! let report = analyze(&Corpus::from_messages(messages), &config);
//!
//! assert_eq!(report.stats.conversations, 1);
//! assert_eq!(report.latency.filtered_minutes(), vec![5.0]);
//! assert_eq!(report.unanswered.len(), 1);
//! ```

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::core::metrics;
use crate::core::models::{CountTable, FunnelReport, LatencyReport, UnansweredConversation};
use crate::corpus::{Corpus, SkippedFile};

/// Counts describing the input itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    /// Files parsed successfully.
    pub files_read: usize,
    /// Files that could not be read.
    pub skipped_files: Vec<SkippedFile>,
    /// All accepted messages.
    pub messages: usize,
    /// Messages not sent by the operator.
    pub customer_messages: usize,
    /// Distinct conversations.
    pub conversations: usize,
    /// Lines that did not match the record pattern.
    pub skipped_lines: usize,
    /// Records with an impossible date or time.
    pub invalid_timestamps: usize,
}

/// Latency figures derived from the filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Observations below the threshold.
    pub filtered: usize,
    /// Observations at or above the threshold.
    pub excluded: usize,
    /// Mean of the filtered view in minutes.
    pub mean_minutes: Option<f64>,
    /// Median of the filtered view in minutes.
    pub median_minutes: Option<f64>,
}

impl From<&LatencyReport> for LatencySummary {
    fn from(report: &LatencyReport) -> Self {
        Self {
            filtered: report.raw.len() - report.excluded(),
            excluded: report.excluded(),
            mean_minutes: report.mean(),
            median_minutes: report.median(),
        }
    }
}

/// One funnel stage with its share of stage 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    /// One of [`FunnelReport::STAGES`].
    pub stage: String,
    /// Conversations that reached this stage.
    pub conversations: usize,
    /// `None` when there are no conversations at all.
    pub percent_of_total: Option<f64>,
}

/// Every metric computed for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Operator the report was computed for.
    pub operator: String,
    /// Ingestion and grouping counters.
    pub stats: CorpusStats,

    /// Most active customers.
    pub top_senders: CountTable,
    /// Customer messages per hour of day, all 24 hours.
    pub hourly_activity: CountTable,
    /// Customer messages per calendar date.
    pub daily_activity: CountTable,
    /// Customer messages per weekday, Monday first.
    pub weekday_activity: CountTable,

    /// Customer messages mentioning each product type.
    pub product_mentions: CountTable,
    /// Customer messages per question category.
    pub question_types: CountTable,
    /// Customer messages mentioning each location.
    pub locations: CountTable,

    /// Conversations where the operator spoke last.
    pub unanswered: Vec<UnansweredConversation>,
    /// Unanswered conversations per drop-off reason.
    pub drop_off_reasons: CountTable,

    /// First reply time per conversation.
    pub latency: LatencyReport,
    pub latency_summary: LatencySummary,

    pub funnel: FunnelReport,
    /// The funnel as ordered rows, for tabular export.
    pub funnel_stages: Vec<FunnelStage>,

    /// Message count of every conversation.
    pub messages_per_conversation: CountTable,
}

impl AnalysisReport {
    /// Returns `true` if the corpus had no messages.
    pub fn is_empty(&self) -> bool {
        self.stats.messages == 0
    }
}

/// Runs every metric over `corpus`.
///
/// Sender frequency, the activity histograms and keyword mentions only look
/// at customer messages. Conversation metrics see both parties.
pub fn analyze(corpus: &Corpus, config: &AnalysisConfig) -> AnalysisReport {
    let operator = &config.operator;
    let conversations = corpus.conversations();
    let customers: Vec<_> = corpus.customer_messages(operator).collect();

    let unanswered = metrics::unanswered_conversations(
        conversations.values(),
        operator,
        &config.drop_off_reasons,
        config.drop_off_context,
        &config.drop_off_fallback,
    );
    let drop_off_reasons = metrics::drop_off_tally(
        &unanswered,
        &config.drop_off_reasons,
        &config.drop_off_fallback,
    );

    let latency = metrics::response_latency(
        conversations.values(),
        operator,
        config.latency_threshold_minutes,
    );
    let funnel = metrics::funnel(conversations.values(), operator, &config.funnel);
    let funnel_stages = FunnelReport::STAGES
        .iter()
        .zip(funnel.counts())
        .map(|(stage, count)| FunnelStage {
            stage: (*stage).to_string(),
            conversations: count,
            percent_of_total: funnel.percent_of_total(count),
        })
        .collect();

    let report = AnalysisReport {
        operator: operator.name().to_string(),
        stats: CorpusStats {
            files_read: corpus.files_read,
            skipped_files: corpus.skipped_files.clone(),
            messages: corpus.messages.len(),
            customer_messages: customers.len(),
            conversations: conversations.len(),
            skipped_lines: corpus.skipped_lines,
            invalid_timestamps: corpus.invalid_timestamps,
        },
        top_senders: metrics::sender_frequency(customers.iter().copied(), config.top_senders),
        hourly_activity: metrics::hourly_histogram(customers.iter().copied()),
        daily_activity: metrics::daily_histogram(customers.iter().copied()),
        weekday_activity: metrics::weekday_histogram(customers.iter().copied()),
        product_mentions: metrics::keyword_mentions(
            customers.iter().copied(),
            &config.product_types,
        ),
        question_types: metrics::keyword_mentions(
            customers.iter().copied(),
            &config.question_types,
        ),
        locations: metrics::keyword_mentions(customers.iter().copied(), &config.locations),
        unanswered,
        drop_off_reasons,
        latency_summary: LatencySummary::from(&latency),
        latency,
        funnel,
        funnel_stages,
        messages_per_conversation: metrics::message_count_per_conversation(
            conversations.values(),
        ),
    };

    tracing::debug!(
        conversations = report.stats.conversations,
        unanswered = report.unanswered.len(),
        latency_observations = report.latency.raw.len(),
        "Analysis finished"
    );

    report
}
