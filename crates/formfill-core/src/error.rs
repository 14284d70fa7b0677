use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormFillError {
    /// Missing, unreadable or empty template. Fatal for a batch.
    #[error("Template error: {0}")]
    Template(String),

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormFillError>;
