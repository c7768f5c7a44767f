//! Line parser for exported chat logs.
//!
//! Every record starts with a header of the form
//!
//! ```text
//! DD/MM/YY HH.MM - Sender: Body
//! 20/08/25 02.54 - Nama Pengirim: Pesan
//! ```
//!
//! Day, month and hour may be one or two digits; year and minute are always
//! two. Two-digit years are read as `2000 + YY`. The sender runs up to the
//! first `": "`, and the rest of the line is the body.
//!
//! # Lossy by default
//!
//! Lines without a header are dropped and counted in
//! [`ParseReport::skipped_lines`]. This includes the second and later lines
//! of multi-line messages, which are *not* reattached unless
//! [`ParserConfig::join_continuations`] is enabled. Headers whose date or
//! time is out of range (e.g. `31/02/23` or `24.00`) are dropped and counted
//! in [`ParseReport::invalid_timestamps`].
//!
//! # Example
//!
//! ```rust
//! use chatlens::parser::ChatLogParser;
//!
//! let parser = ChatLogParser::new();
//! let report = parser.parse_lines(
//!     ["01/02/23 09.00 - Alice: hello", "system notice", "01/02/23 09.05 - Shop: hi there"],
//!     "alice.txt",
//! );
//!
//! assert_eq!(report.messages.len(), 2);
//! assert_eq!(report.skipped_lines, 1);
//! assert_eq!(report.messages[1].body, "hi there");
//! ```

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::Message;
use crate::config::ParserConfig;
use crate::error::{ChatlensError, Result};

/// `DD/MM/YY HH.MM - Sender: Body`
static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}) (\d{1,2})\.(\d{2}) - (.*?): (.*)$")
        .expect("record pattern is a valid regex")
});

/// Messages parsed from one source, plus what was thrown away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Accepted messages, in file order.
    pub messages: Vec<Message>,
    /// Non-blank lines that did not match the header pattern (and were not
    /// joined to a previous message).
    pub skipped_lines: usize,
    /// Header lines dropped because the date or time does not exist.
    pub invalid_timestamps: usize,
}

impl ParseReport {
    /// Adds another report's messages and counters to this one.
    pub fn merge(&mut self, other: ParseReport) {
        self.messages.extend(other.messages);
        self.skipped_lines += other.skipped_lines;
        self.invalid_timestamps += other.invalid_timestamps;
    }
}

/// Parser for exported chat text.
#[derive(Debug, Clone, Default)]
pub struct ChatLogParser {
    config: ParserConfig,
}

impl ChatLogParser {
    /// Creates a lossy parser (continuation lines are dropped).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses lines belonging to one conversation.
    pub fn parse_lines<I, S>(&self, lines: I, conversation_id: &str) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ParseReport::default();
        // Continuations only attach to a header that was accepted.
        let mut can_continue = false;

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = RECORD_PATTERN.captures(line) {
                match record_from_captures(&caps, conversation_id) {
                    Some(msg) => {
                        report.messages.push(msg);
                        can_continue = true;
                    }
                    None => {
                        report.invalid_timestamps += 1;
                        can_continue = false;
                    }
                }
                continue;
            }

            if self.config.join_continuations && can_continue {
                if let Some(last) = report.messages.last_mut() {
                    last.body.push('\n');
                    last.body.push_str(line.trim_end());
                    continue;
                }
            }
            report.skipped_lines += 1;
        }

        report
    }

    /// Parses a whole file's content.
    pub fn parse_str(&self, content: &str, conversation_id: &str) -> ParseReport {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        self.parse_lines(content.lines(), conversation_id)
    }

    /// Reads and parses a file. The conversation id is the file name.
    pub fn parse_file(&self, path: &Path) -> Result<ParseReport> {
        let content = fs::read_to_string(path).map_err(|source| ChatlensError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let conversation_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let report = self.parse_str(&content, &conversation_id);
        tracing::debug!(
            file = %conversation_id,
            messages = report.messages.len(),
            skipped_lines = report.skipped_lines,
            invalid_timestamps = report.invalid_timestamps,
            "Parsed chat file"
        );
        Ok(report)
    }
}

/// Parses lines with the default lossy parser and returns only the messages.
pub fn parse<I, S>(lines: I, conversation_id: &str) -> Vec<Message>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ChatLogParser::new()
        .parse_lines(lines, conversation_id)
        .messages
}

fn record_from_captures(caps: &Captures<'_>, conversation_id: &str) -> Option<Message> {
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let timestamp = build_timestamp(num(1)?, num(2)?, num(3)?, num(4)?, num(5)?)?;
    let sender = clean_sender(caps.get(6).map_or("", |m| m.as_str()));
    let body = caps.get(7).map_or("", |m| m.as_str()).trim();

    Some(Message::new(timestamp, sender, body, conversation_id))
}

/// Builds a timestamp from day/month/two-digit-year and hour.minute.
fn build_timestamp(day: u32, month: u32, yy: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    let year = 2000 + i32::try_from(yy).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Strips invisible characters (bidi marks, zero-width characters, control
/// characters, non-ASCII spaces) and trims the result.
pub fn clean_sender(raw: &str) -> String {
    let visible: String = raw.chars().filter(|&c| is_printable(c)).collect();
    visible.trim().to_string()
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control() || c.is_whitespace() || is_format_char(c) || is_private_use(c))
}

/// Unicode general category Cf.
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}
