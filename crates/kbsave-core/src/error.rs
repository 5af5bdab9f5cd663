use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid save container magic: expected \"slcb\", got {0:02X?}")]
    InvalidMagic([u8; 4]),

    #[error("Truncated save container: need {needed} bytes, have {actual}")]
    TruncatedContainer { needed: usize, actual: usize },

    #[error("Size mismatch after decompression: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Failed to decompress save payload: {0}")]
    Decompress(String),

    #[error("Save path not found: {0}")]
    SavePathNotFound(PathBuf),

    #[error("No payload named {names:?} in {path}")]
    PayloadNotFound { path: PathBuf, names: Vec<String> },

    #[error("Invalid save archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("Save archive {path} too large: {size} bytes (max {max})")]
    ArchiveTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("No save matches hero fingerprint {hash} among the {checked} most recent")]
    NoMatchingSave { hash: String, checked: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error means the save or one of its payloads is missing
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::SavePathNotFound(_)
            | Error::PayloadNotFound { .. }
            | Error::NoMatchingSave { .. } => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Errors raised by the container layout itself rather than by I/O
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMagic(_)
                | Error::TruncatedContainer { .. }
                | Error::SizeMismatch { .. }
                | Error::Decompress(_)
        )
    }
}
