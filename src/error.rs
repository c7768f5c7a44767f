//! Unified error types for chatlens.
//!
//! Only a handful of things can go wrong in a batch run: the input directory
//! cannot be walked, the configuration file is unreadable or invalid, an
//! export cannot be written, or nothing at all was parsed. Malformed lines and
//! unreadable chat files are *not* errors; they are counted on the
//! [`Corpus`](crate::corpus::Corpus) and the run continues.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
///
/// # Example
///
/// ```rust
/// use chatlens::error::Result;
/// use chatlens::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// An I/O error occurred (usually while writing exports).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A single chat file could not be read.
    ///
    /// [`load_dir`](crate::corpus::load_dir) turns this into a
    /// [`SkippedFile`](crate::corpus::SkippedFile) instead of aborting.
    #[error("Cannot read {}: {source}", path.display())]
    ReadFile {
        /// The file that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The input directory could not be walked.
    #[error("Cannot walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The TOML configuration file is malformed.
    #[error("Failed to parse config{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    ConfigParse {
        /// The config file path, if loaded from disk
        path: Option<PathBuf>,
        /// The underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value is out of range.
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatlensError {
    /// Creates an invalid config error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        ChatlensError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_) | ChatlensError::ReadFile { .. })
    }

    /// Returns `true` if this is a config error (parse or validation).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChatlensError::ConfigParse { .. } | ChatlensError::InvalidConfig { .. }
        )
    }
}
