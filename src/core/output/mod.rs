//! Export writers.
//!
//! - [`write_csv_report`] / [`table_to_csv`] - one CSV file per table - requires `csv-output` feature
//! - [`write_json_report`] / [`report_to_json`] - the whole report as one JSON document - requires `json-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Files | Use Case |
//! |--------|-------|----------|
//! | CSV | 13 tables | spreadsheets, chart tools |
//! | JSON | `report.json` | dashboards, further processing |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatlens::Result<()> {
//! use std::path::Path;
//! use chatlens::config::AnalysisConfig;
//! use chatlens::core::output::{ExportConfig, write_csv_report, write_json_report};
//! use chatlens::corpus::load_dir;
//! use chatlens::parser::ChatLogParser;
//! use chatlens::report::analyze;
//!
//! let config = AnalysisConfig::new();
//! let corpus = load_dir(Path::new("data-whatsapp"), &config.extension, &ChatLogParser::new())?;
//! let report = analyze(&corpus, &config);
//!
//! write_csv_report(&corpus, &report, Path::new("out"), &ExportConfig::new())?;
//! write_json_report(&report, Path::new("out"))?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{ExportConfig, table_to_csv, write_csv_report};
#[cfg(feature = "json-output")]
pub use json_writer::{report_to_json, write_json_report};

/// Which exports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One CSV file per table.
    #[default]
    Csv,
    /// A single `report.json`.
    Json,
    /// Both of the above.
    Both,
}

impl OutputFormat {
    /// Returns `true` if CSV files should be written.
    pub fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    /// Returns `true` if the JSON report should be written.
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_includes() {
        assert!(OutputFormat::Both.includes_csv());
        assert!(OutputFormat::Both.includes_json());
        assert!(!OutputFormat::Csv.includes_json());
        assert!(!OutputFormat::Json.includes_csv());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
        assert_eq!(OutputFormat::Both.to_string(), "both");
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }
}
