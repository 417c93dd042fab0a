use thiserror::Error;

use crate::model::DocumentId;

/// Errors raised by corpus stores.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corpus serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corpus backend error: {0}")]
    Backend(String),
    #[error("document {0} not found")]
    NotFound(DocumentId),
    #[error("invalid corpus setting: {0}")]
    Invalid(String),
}

impl CorpusError {
    pub fn backend(msg: impl Into<String>) -> Self {
        CorpusError::Backend(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        CorpusError::Invalid(msg.into())
    }
}
