use thiserror::Error;

use crate::ai::dto::PromptKind;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Generation call {kind} failed: {message}")]
    Generation { kind: PromptKind, message: String },
    #[error("Durable store error: {0}")]
    Durable(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Run cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DigestError {
    pub fn generation(kind: PromptKind, message: impl Into<String>) -> Self {
        DigestError::Generation {
            kind,
            message: message.into(),
        }
    }
}

pub type DigestResult<T> = Result<T, DigestError>;
