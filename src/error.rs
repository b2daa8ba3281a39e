use thiserror::Error;

#[derive(Debug, Error)]
pub enum TroikaError {
    #[error("Card text must not be empty")]
    EmptyCardText,

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TroikaError>;
