//! Error types for vidscribe.

use thiserror::Error;

/// Library-level error type for vidscribe operations.
#[derive(Error, Debug)]
pub enum VidscribeError {
    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ExternalTool(String),

    #[error("Speech model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Transcription failed: {0}")]
    Inference(String),

    #[error("Could not save Word document: {0}")]
    DocumentSave(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for vidscribe operations.
pub type Result<T> = std::result::Result<T, VidscribeError>;
