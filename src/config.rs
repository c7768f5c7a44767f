//! Configuration types for parsing and analysis.
//!
//! - [`ParserConfig`] - how raw lines become messages
//! - [`AnalysisConfig`] - operator identity, thresholds and keyword taxonomies
//! - [`FunnelConfig`] - keyword sets for funnel stages 2 and 3
//!
//! Everything has a built-in default tuned for the agarwood (gaharu) seller
//! exports this tool was written for, so an empty TOML file is a valid config.
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_toml_str(r#"
//!     operator = "My Shop"
//!     top_senders = 5
//!
//!     [locations]
//!     policy = "first-match"
//!     case_fold = true
//!     categories = [{ label = "Doha", keywords = ["doha", "الدوحة"] }]
//! "#)?;
//!
//! assert_eq!(config.operator.name(), "My Shop");
//! assert_eq!(config.locations.categories.len(), 1);
//! // untouched fields keep their defaults
//! assert_eq!(config.latency_threshold_minutes, 360.0);
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::classifier::{Category, MatchPolicy, Taxonomy};
use crate::error::{ChatlensError, Result};
use crate::message::Operator;

/// Default seller identity.
pub const DEFAULT_OPERATOR: &str = "Nusa Restoria";

/// Default response-time outlier cutoff (6 hours).
pub const DEFAULT_LATENCY_THRESHOLD_MINUTES: f64 = 360.0;

/// Default number of senders in the top-senders table.
pub const DEFAULT_TOP_SENDERS: usize = 10;

/// Default number of trailing messages inspected for drop-off reasons.
pub const DEFAULT_DROP_OFF_CONTEXT: usize = 5;

/// Default label for unanswered conversations no reason matched.
pub const DEFAULT_DROP_OFF_FALLBACK: &str = "Other / low initial interest";

/// Configuration for the line parser.
///
/// # Example
///
/// ```rust
/// use chatlens::config::ParserConfig;
///
/// let config = ParserConfig::new().with_join_continuations(true);
/// assert!(config.join_continuations);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Append lines without a header to the previous message (default: false).
    ///
    /// When off, such lines are dropped and counted as skipped.
    #[serde(default)]
    pub join_continuations: bool,
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables continuation-line joining.
    #[must_use]
    pub fn with_join_continuations(mut self, enabled: bool) -> Self {
        self.join_continuations = enabled;
        self
    }
}

/// Keyword sets for funnel stages 2 and 3.
///
/// Stage 2 is tested against the whole transcript, stage 3 against the
/// operator's messages only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelConfig {
    /// Stage 2: further discussion (price, type, samples, shipping).
    pub discussion: Category,
    /// Stage 3: the operator asks for order or address details.
    pub conversion: Category,
    /// Compare case-insensitively (default: true).
    pub case_fold: bool,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            discussion: Category::new(
                "discussion",
                [
                    "سعر", "كم", "نوع", "تفاصيل", "محسن", "طبيعي", "صناعي", "price", "عينة",
                    "sample", "شحن", "ارسال", "أسعار",
                ],
            ),
            conversion: Category::new(
                "conversion",
                ["لتجهيز طلبك", "الاسم الكامل", "الدولة والمدينة", "عنوان", "بيانات"],
            ),
            case_fold: true,
        }
    }
}

/// Everything the analysis stage needs.
///
/// Missing TOML fields fall back to [`AnalysisConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// The seller's sender name.
    pub operator: Operator,

    /// Directory of exported chats, if not given on the command line.
    pub input_dir: Option<PathBuf>,

    /// File extension of chat exports (without dot).
    pub extension: String,

    /// How many senders to keep in the top-senders table.
    pub top_senders: usize,

    /// Response times at or above this many minutes are treated as outliers.
    pub latency_threshold_minutes: f64,

    /// Trailing messages inspected when assigning a drop-off reason.
    pub drop_off_context: usize,

    /// Reason used when no drop-off category matches.
    pub drop_off_fallback: String,

    /// Product types customers ask about.
    pub product_types: Taxonomy,

    /// Kinds of customer questions.
    pub question_types: Taxonomy,

    /// Why a customer may have stopped replying. Order from specific to general.
    pub drop_off_reasons: Taxonomy,

    /// Places customers mention.
    pub locations: Taxonomy,

    /// Funnel stage keywords.
    pub funnel: FunnelConfig,

    /// Parser options.
    pub parser: ParserConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            operator: Operator::new(DEFAULT_OPERATOR),
            input_dir: None,
            extension: "txt".to_string(),
            top_senders: DEFAULT_TOP_SENDERS,
            latency_threshold_minutes: DEFAULT_LATENCY_THRESHOLD_MINUTES,
            drop_off_context: DEFAULT_DROP_OFF_CONTEXT,
            drop_off_fallback: DEFAULT_DROP_OFF_FALLBACK.to_string(),
            product_types: default_product_types(),
            question_types: default_question_types(),
            drop_off_reasons: default_drop_off_reasons(),
            locations: default_locations(),
            funnel: FunnelConfig::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|source| ChatlensError::ConfigParse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ChatlensError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ChatlensError::ConfigParse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Checks value ranges and taxonomy labels.
    pub fn validate(&self) -> Result<()> {
        if self.operator.name().trim().is_empty() {
            return Err(ChatlensError::invalid_config("operator", "must not be empty"));
        }
        if self.top_senders == 0 {
            return Err(ChatlensError::invalid_config("top_senders", "must be at least 1"));
        }
        if self.latency_threshold_minutes.is_nan() || self.latency_threshold_minutes <= 0.0 {
            return Err(ChatlensError::invalid_config(
                "latency_threshold_minutes",
                format!("must be positive, got {}", self.latency_threshold_minutes),
            ));
        }
        if self.drop_off_context == 0 {
            return Err(ChatlensError::invalid_config("drop_off_context", "must be at least 1"));
        }
        if self.extension.trim().is_empty() {
            return Err(ChatlensError::invalid_config("extension", "must not be empty"));
        }

        // One reason per unanswered conversation.
        if self.drop_off_reasons.policy != MatchPolicy::FirstMatch {
            return Err(ChatlensError::invalid_config(
                "drop_off_reasons.policy",
                "must be \"first-match\"",
            ));
        }
        if self.drop_off_reasons.labels().any(|l| l == self.drop_off_fallback) {
            return Err(ChatlensError::invalid_config(
                "drop_off_fallback",
                format!("'{}' is already a drop-off reason label", self.drop_off_fallback),
            ));
        }

        for (name, taxonomy) in [
            ("product_types", &self.product_types),
            ("question_types", &self.question_types),
            ("drop_off_reasons", &self.drop_off_reasons),
            ("locations", &self.locations),
        ] {
            if taxonomy.categories.is_empty() {
                tracing::warn!(
                    taxonomy = name,
                    "Taxonomy has no categories; its table will be empty"
                );
            }
            if let Some(label) = taxonomy.duplicate_label() {
                return Err(ChatlensError::invalid_config(
                    name,
                    format!("duplicate category label '{label}'"),
                ));
            }
        }
        Ok(())
    }

    /// Sets the operator identity.
    #[must_use]
    pub fn with_operator(mut self, name: impl Into<String>) -> Self {
        self.operator = Operator::new(name);
        self
    }

    /// Sets the input directory.
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    /// Sets the top-senders count.
    #[must_use]
    pub fn with_top_senders(mut self, n: usize) -> Self {
        self.top_senders = n;
        self
    }

    /// Sets the response-time outlier cutoff.
    #[must_use]
    pub fn with_latency_threshold(mut self, minutes: f64) -> Self {
        self.latency_threshold_minutes = minutes;
        self
    }

    /// Sets the parser options.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}

/// Agarwood grades and origins. Every matching type is counted.
pub fn default_product_types() -> Taxonomy {
    Taxonomy::new(MatchPolicy::AllMatches, false)
        .with_category(Category::new("Scented bakhoor (بخور معطر)", ["بخور معطر"]))
        .with_category(Category::new("Natural (طبيعي)", ["طبيعي", "الطبيعي"]))
        .with_category(Category::new("Enhanced (محسن)", ["محسن", "المحسن"]))
        .with_category(Category::new("Artificial (صناعي)", ["صناعي", "الصناعي"]))
        .with_category(Category::new("Sumatra (سومطرة)", ["سومطرة", "sumatra"]))
        .with_category(Category::new("Kalimantan (كاليمانتان)", ["كاليمانتان", "kalimantan"]))
        .with_category(Category::new("Merauke (ميروكي)", ["ميروكي", "merauke"]))
}

/// Customer question kinds, one per message.
pub fn default_question_types() -> Taxonomy {
    Taxonomy::new(MatchPolicy::FirstMatch, true)
        .with_category(Category::new(
            "Price inquiry (كم سعر)",
            ["كم سعر", "كم السعر", "الأسعار", "كم سعره", "كم عر"],
        ))
        .with_category(Category::new(
            "Product details (تفاصيل)",
            ["تفاصيل", "ايش العروض", "ماهي الاعواد", "اي نوع", "ما هو النوع"],
        ))
        .with_category(Category::new(
            "Availability (هل متوفر)",
            ["هل يوجد", "هل عندكم", "متوفر"],
        ))
        .with_category(Category::new(
            "Pictures / catalog (صور)",
            ["صور", "العرض", "كاتلوج"],
        ))
        .with_category(Category::new(
            "Location / shipping (المكان فين)",
            ["المكان فين", "كيف نوصل", "كيف ترسل"],
        ))
}

/// Drop-off reasons, most specific first.
pub fn default_drop_off_reasons() -> Taxonomy {
    Taxonomy::new(MatchPolicy::FirstMatch, true)
        .with_category(Category::new("Follow-up (unanswered)", ["متابعة بسيطة"]))
        .with_category(Category::new(
            "Price discussion",
            ["سعر", "أسعار", "price", "كم جراما", "ريال"],
        ))
        .with_category(Category::new(
            "Meeting / call invitation",
            ["اتصال", "gmeet", "meet.google.com", "اجتماع", "رابط"],
        ))
        .with_category(Category::new(
            "Address / shipping details requested",
            ["الاسم الكامل", "الدولة والمدينة", "عنوان", "شحن", "الرمز البريدي", "بيانات"],
        ))
        .with_category(Category::new("Sample discussion", ["عينة", "sample"]))
        .with_category(Category::new(
            "Product detail discussion",
            ["محسن", "طبيعي", "صناعي", "سومطرة", "كاليمانتان", "ميروكي", "نوع", "تفاصيل"],
        ))
}

/// Cities and countries customers mention, one per message.
pub fn default_locations() -> Taxonomy {
    Taxonomy::new(MatchPolicy::FirstMatch, true)
        .with_category(Category::new("Riyadh (رياض)", ["رياض"]))
        .with_category(Category::new("Jeddah (جدة)", ["جدة", "جده"]))
        .with_category(Category::new("Makkah (مكة)", ["مكة"]))
        .with_category(Category::new("Tabuk (تبوك)", ["تبوك"]))
        .with_category(Category::new("Kuwait (الكويت)", ["الكويت", "kuwait"]))
}
