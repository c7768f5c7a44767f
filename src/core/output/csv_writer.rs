//! CSV output writer.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::models::CountTable;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::report::AnalysisReport;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// Field delimiter. Default `,`.
    pub delimiter: u8,
    /// Prefix files with a UTF-8 byte-order mark so spreadsheet tools detect
    /// the encoding of Arabic text. Default on.
    pub bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            bom: true,
        }
    }
}

impl ExportConfig {
    /// Comma-delimited with a BOM.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables the byte-order mark.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

#[derive(Serialize)]
struct MessageRow<'a> {
    conversation_id: &'a str,
    timestamp: String,
    sender: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct UnansweredRow<'a> {
    conversation_id: &'a str,
    last_message_at: String,
    reason: &'a str,
}

#[derive(Serialize)]
struct LatencyRow<'a> {
    conversation_id: &'a str,
    minutes: f64,
    within_threshold: bool,
}

#[derive(Serialize)]
struct FunnelRow<'a> {
    stage: &'a str,
    conversations: usize,
    percent_of_total: Option<f64>,
}

// Headers are always written by hand so empty tables still carry them.
fn writer<W: Write>(out: W, config: &ExportConfig) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_writer(out)
}

fn write_table<W: Write>(
    out: W,
    header: [&str; 2],
    table: &CountTable,
    config: &ExportConfig,
) -> Result<()> {
    let mut writer = writer(out, config);
    writer.write_record(header)?;
    for row in table {
        let count = row.count.to_string();
        writer.write_record([row.label.as_str(), count.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_rows<W, T>(
    out: W,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
    config: &ExportConfig,
) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut writer = writer(out, config);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Converts a count table to a CSV string with a `label,count` style header.
///
/// No BOM is added; it only matters for files.
pub fn table_to_csv(
    table: &CountTable,
    header: [&str; 2],
    config: &ExportConfig,
) -> Result<String> {
    let mut buf = Vec::new();
    write_table(&mut buf, header, table, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Creates `dir/name`, writing the BOM first when configured.
fn create(dir: &Path, name: &str, config: &ExportConfig) -> Result<(File, PathBuf)> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    if config.bom {
        file.write_all(UTF8_BOM)?;
    }
    Ok((file, path))
}

/// Writes every table of the report, plus the parsed messages, as CSV files
/// in `dir`. The directory is created if needed.
///
/// Returns the paths written, in a fixed order.
pub fn write_csv_report(
    corpus: &Corpus,
    report: &AnalysisReport,
    dir: &Path,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let (file, path) = create(dir, "messages.csv", config)?;
    write_rows(
        file,
        &["conversation_id", "timestamp", "sender", "body"],
        corpus.messages.iter().map(|m| MessageRow {
            conversation_id: &m.conversation_id,
            timestamp: m.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            sender: &m.sender,
            body: &m.body,
        }),
        config,
    )?;
    written.push(path);

    let tables: [(&str, [&str; 2], &CountTable); 9] = [
        ("top_senders.csv", ["sender", "messages"], &report.top_senders),
        ("hourly_activity.csv", ["hour", "messages"], &report.hourly_activity),
        ("weekday_activity.csv", ["weekday", "messages"], &report.weekday_activity),
        ("date_activity.csv", ["date", "messages"], &report.daily_activity),
        ("product_mentions.csv", ["product_type", "mentions"], &report.product_mentions),
        ("question_types.csv", ["question_type", "messages"], &report.question_types),
        ("locations.csv", ["location", "mentions"], &report.locations),
        ("drop_off_reasons.csv", ["reason", "conversations"], &report.drop_off_reasons),
        (
            "messages_per_conversation.csv",
            ["conversation_id", "messages"],
            &report.messages_per_conversation,
        ),
    ];
    for (name, header, table) in tables {
        let (file, path) = create(dir, name, config)?;
        write_table(file, header, table, config)?;
        written.push(path);
    }

    let (file, path) = create(dir, "unanswered_conversations.csv", config)?;
    write_rows(
        file,
        &["conversation_id", "last_message_at", "reason"],
        report.unanswered.iter().map(|u| UnansweredRow {
            conversation_id: &u.conversation_id,
            last_message_at: u.last_message_at.format(TIMESTAMP_FORMAT).to_string(),
            reason: &u.reason,
        }),
        config,
    )?;
    written.push(path);

    let threshold = report.latency.threshold_minutes;
    let (file, path) = create(dir, "response_times.csv", config)?;
    write_rows(
        file,
        &["conversation_id", "minutes", "within_threshold"],
        report.latency.raw.iter().map(|o| LatencyRow {
            conversation_id: &o.conversation_id,
            minutes: o.minutes,
            within_threshold: o.minutes < threshold,
        }),
        config,
    )?;
    written.push(path);

    let (file, path) = create(dir, "funnel.csv", config)?;
    write_rows(
        file,
        &["stage", "conversations", "percent_of_total"],
        report.funnel_stages.iter().map(|s| FunnelRow {
            stage: &s.stage,
            conversations: s.conversations,
            percent_of_total: s.percent_of_total,
        }),
        config,
    )?;
    written.push(path);

    tracing::info!(dir = %dir.display(), files = written.len(), "CSV export written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::parser::parse;
    use crate::report::analyze;

    fn sample() -> (Corpus, AnalysisReport) {
        let corpus = Corpus::from_messages(parse(
            [
                "01/02/23 09.00 - Alice: عود طبيعي, hello",
                "01/02/23 09.05 - Shop: أرسل لي الاسم الكامل",
            ],
            "alice.txt",
        ));
        let report = analyze(&corpus, &AnalysisConfig::new().with_operator("Shop"));
        (corpus, report)
    }

    #[test]
    fn test_table_to_csv() {
        let table: CountTable = [("Alice", 3), ("Bob", 1)].into_iter().collect();
        let csv = table_to_csv(&table, ["sender", "messages"], &ExportConfig::new()).unwrap();
        assert_eq!(csv, "sender,messages\nAlice,3\nBob,1\n");
    }

    #[test]
    fn test_table_to_csv_custom_delimiter() {
        let table: CountTable = [("a;b", 1)].into_iter().collect();
        let config = ExportConfig::new().with_delimiter(b';');
        let csv = table_to_csv(&table, ["label", "count"], &config).unwrap();
        assert_eq!(csv, "label;count\n\"a;b\";1\n");
    }

    #[test]
    fn test_write_csv_report_files() {
        let (corpus, report) = sample();
        let dir = tempfile::tempdir().unwrap();
        let written = write_csv_report(&corpus, &report, dir.path(), &ExportConfig::new()).unwrap();

        assert_eq!(written.len(), 13);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }

        let bytes = fs::read(dir.path().join("messages.csv")).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("conversation_id,timestamp,sender,body\n"));
        assert!(text.contains("alice.txt,2023-02-01 09:00:00,Alice,\"عود طبيعي, hello\""));

        let latency = fs::read_to_string(dir.path().join("response_times.csv")).unwrap();
        assert!(latency.contains("alice.txt,5.0,true"));

        let unanswered =
            fs::read_to_string(dir.path().join("unanswered_conversations.csv")).unwrap();
        assert!(unanswered.contains("alice.txt,2023-02-01 09:05:00,"));
    }

    #[test]
    fn test_write_without_bom() {
        let (corpus, report) = sample();
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new().with_bom(false);
        write_csv_report(&corpus, &report, dir.path(), &config).unwrap();

        let hourly = fs::read_to_string(dir.path().join("hourly_activity.csv")).unwrap();
        assert!(hourly.starts_with("hour,messages\n0,0\n"));
        assert!(hourly.contains("\n9,1\n"));
    }

    #[test]
    fn test_empty_tables_keep_headers() {
        let corpus = Corpus::from_messages(parse(["01/02/23 09.00 - Alice: hello"], "alice.txt"));
        let report = analyze(&corpus, &AnalysisConfig::new().with_operator("Shop"));
        assert!(report.unanswered.is_empty());
        assert!(report.latency.raw.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::new().with_bom(false);
        write_csv_report(&corpus, &report, dir.path(), &config).unwrap();

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(
            read("unanswered_conversations.csv"),
            "conversation_id,last_message_at,reason\n"
        );
        assert_eq!(
            read("response_times.csv"),
            "conversation_id,minutes,within_threshold\n"
        );
        assert_eq!(read("drop_off_reasons.csv"), "reason,conversations\n");
        assert!(read("messages.csv").starts_with("conversation_id,timestamp,sender,body\n"));
    }
}
