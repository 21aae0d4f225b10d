use thiserror::Error;

use crate::quote::DecodeError;

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Root error type for quote operations
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Please fill both quote and category (missing {field})")]
    Validation { field: &'static str },

    #[error("Import failed: {0}")]
    Import(#[from] DecodeError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    pub fn is_validation(&self) -> bool {
        matches!(self, QuoteError::Validation { .. })
    }

    pub fn is_import(&self) -> bool {
        matches!(self, QuoteError::Import(_))
    }
}
