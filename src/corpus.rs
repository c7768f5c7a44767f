//! Loading a directory of chat exports.
//!
//! Each file directly inside the input directory with the configured
//! extension is one conversation. Files are read in file-name order, so
//! output is reproducible. A file that cannot be read is recorded as a
//! [`SkippedFile`] and the remaining files are still processed.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatlens::corpus::load_dir;
//! use chatlens::parser::ChatLogParser;
//!
//! let corpus = load_dir("data-whatsapp".as_ref(), "txt", &ChatLogParser::new())?;
//! for skipped in &corpus.skipped_files {
//!     eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
//! }
//! println!("{} messages", corpus.messages.len());
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::Message;
use crate::core::conversation::{Conversation, group};
use crate::error::Result;
use crate::message::{Operator, Role};
use crate::parser::{ChatLogParser, ParseReport};

/// A file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// All messages parsed from an input directory.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Every accepted message, file by file in file order.
    pub messages: Vec<Message>,
    /// Files that were found but could not be read.
    pub skipped_files: Vec<SkippedFile>,
    /// Number of files read successfully.
    pub files_read: usize,
    /// Lines that did not match the record pattern.
    pub skipped_lines: usize,
    /// Records dropped for an impossible date or time.
    pub invalid_timestamps: usize,
}

impl Corpus {
    /// Builds a corpus from already-parsed messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Returns `true` if no message was parsed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Groups the messages into time-sorted conversations, keyed by id.
    pub fn conversations(&self) -> BTreeMap<String, Conversation> {
        group(self.messages.iter().cloned())
    }

    /// Messages not sent by the operator.
    pub fn customer_messages<'a>(
        &'a self,
        operator: &'a Operator,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages
            .iter()
            .filter(move |m| operator.role_of(m) == Role::Customer)
    }

    fn absorb(&mut self, report: ParseReport) {
        self.files_read += 1;
        self.skipped_lines += report.skipped_lines;
        self.invalid_timestamps += report.invalid_timestamps;
        self.messages.extend(report.messages);
    }
}

/// Parses every `*.{extension}` file directly inside `dir`.
///
/// Fails only if `dir` itself cannot be listed. Individual files that cannot
/// be read (permissions, invalid UTF-8) are logged and collected in
/// [`Corpus::skipped_files`].
pub fn load_dir(dir: &Path, extension: &str, parser: &ChatLogParser) -> Result<Corpus> {
    let extension = extension.trim_start_matches('.');
    let mut corpus = Corpus::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .follow_links(true);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // The root itself failing means there is nothing to analyse.
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                corpus.skipped_files.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        match parser.parse_file(entry.path()) {
            Ok(report) => corpus.absorb(report),
            Err(e) => {
                tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Skipping unreadable file"
                );
                corpus.skipped_files.push(SkippedFile {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        files = corpus.files_read,
        skipped_files = corpus.skipped_files.len(),
        messages = corpus.messages.len(),
        skipped_lines = corpus.skipped_lines,
        invalid_timestamps = corpus.invalid_timestamps,
        "Corpus loaded"
    );

    Ok(corpus)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_dir_reads_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "01/02/23 09.00 - Bob: hi\n").unwrap();
        fs::write(dir.path().join("a.txt"), "01/02/23 09.00 - Alice: hi\njunk\n").unwrap();
        fs::write(dir.path().join("notes.md"), "01/02/23 09.00 - Nope: hi\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "01/02/23 09.00 - Carol: hi\n").unwrap();

        let corpus = load_dir(dir.path(), "txt", &ChatLogParser::new()).unwrap();
        assert_eq!(corpus.files_read, 2);
        assert_eq!(corpus.skipped_lines, 1);
        let ids: Vec<_> = corpus.messages.iter().map(|m| m.conversation_id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_invalid_utf8_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
        fs::write(dir.path().join("good.txt"), "01/02/23 09.00 - Alice: hi\n").unwrap();

        let corpus = load_dir(dir.path(), "txt", &ChatLogParser::new()).unwrap();
        assert_eq!(corpus.files_read, 1);
        assert_eq!(corpus.skipped_files.len(), 1);
        assert!(corpus.skipped_files[0].path.ends_with("bad.txt"));
        assert_eq!(corpus.messages.len(), 1);
    }

    #[test]
    fn test_missing_dir_is_error() {
        let err = load_dir(Path::new("/no/such/chat/dir"), "txt", &ChatLogParser::new());
        assert!(err.is_err());
    }

    #[test]
    fn test_extension_with_dot_and_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.TXT"), "01/02/23 09.00 - Alice: hi\n").unwrap();
        let corpus = load_dir(dir.path(), ".txt", &ChatLogParser::new()).unwrap();
        assert_eq!(corpus.files_read, 1);
    }

    #[test]
    fn test_empty_dir_gives_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = load_dir(dir.path(), "txt", &ChatLogParser::new()).unwrap();
        assert!(corpus.is_empty());
        assert!(corpus.conversations().is_empty());
    }

    #[test]
    fn test_customer_messages_excludes_operator() {
        let parser = ChatLogParser::new();
        let report = parser.parse_lines(
            ["01/02/23 09.00 - Alice: hi", "01/02/23 09.01 - Shop: hello"],
            "a.txt",
        );
        let corpus = Corpus::from_messages(report.messages);
        let op = Operator::new("Shop");
        let senders: Vec<_> = corpus.customer_messages(&op).map(|m| m.sender()).collect();
        assert_eq!(senders, vec!["Alice"]);
    }
}
