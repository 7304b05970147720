use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the scanning pipeline.
///
/// Only configuration and sink errors abort a run; read errors are reported
/// per file and the file is skipped.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Folder not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern for field '{label}': {reason}")]
    InvalidPattern { label: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ScanError {
    /// Configuration errors stop the run before any file is touched.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScanError::Read { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
