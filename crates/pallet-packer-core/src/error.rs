use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Nothing to pack: product list is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, PackerError>;
