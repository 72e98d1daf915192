use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single log line was dropped
#[derive(Debug, Error)]
pub enum LineError {
    #[error("failed to read line: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected shape: `{0}` is not an object")]
    Shape(&'static str),
}

impl LineError {
    /// A read error other than invalid UTF-8 leaves the rest of the file unreadable
    pub fn ends_file(&self) -> bool {
        matches!(self, LineError::Read(e) if e.kind() != ErrorKind::InvalidData)
    }
}

/// Why a whole agent directory or session file contributed nothing
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: LineError,
    },
}
