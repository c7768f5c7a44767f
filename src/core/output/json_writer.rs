//! JSON output writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::report::AnalysisReport;

/// Serializes the whole report as pretty-printed JSON.
///
/// Same content as [`write_json_report`], but returned as a string.
pub fn report_to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report to `dir/report.json` and returns the path.
pub fn write_json_report(report: &AnalysisReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("report.json");
    let json = report_to_json(report)?;
    let mut file = File::create(&path)?;
    file.write_all(json.as_bytes())?;
    tracing::info!(path = %path.display(), "JSON report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::corpus::Corpus;
    use crate::parser::parse;
    use crate::report::analyze;

    fn sample() -> AnalysisReport {
        let corpus = Corpus::from_messages(parse(
            [
                "01/02/23 09.00 - Alice: hello",
                "01/02/23 09.05 - Shop: hi",
            ],
            "alice.txt",
        ));
        analyze(&corpus, &AnalysisConfig::new().with_operator("Shop"))
    }

    #[test]
    fn test_report_to_json_fields() {
        let json = report_to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["operator"], "Shop");
        assert_eq!(value["stats"]["messages"], 2);
        assert_eq!(value["stats"]["conversations"], 1);
        assert_eq!(value["top_senders"][0]["label"], "Alice");
        assert_eq!(value["latency"]["raw"][0]["minutes"], 5.0);
        assert_eq!(value["latency_summary"]["median_minutes"], 5.0);
        assert_eq!(value["funnel"]["contacted"], 1);
        assert_eq!(value["unanswered"][0]["conversation_id"], "alice.txt");
        assert_eq!(value["hourly_activity"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn test_empty_corpus_report_serializes() {
        let report = analyze(&Corpus::default(), &AnalysisConfig::new());
        let json = report_to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["messages"], 0);
        assert!(value["latency_summary"]["mean_minutes"].is_null());
        assert_eq!(value["hourly_activity"].as_array().unwrap().len(), 24);
        assert_eq!(value["weekday_activity"].as_array().unwrap().len(), 7);
        assert!(value["top_senders"].as_array().unwrap().is_empty());
        assert!(value["funnel_stages"][0]["percent_of_total"].is_null());
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json_report(&sample(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("report.json"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"operator\": \"Shop\""));
    }
}
