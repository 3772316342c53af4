use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] qotd_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quote text provided")]
    EmptyText,
    #[error("Edited quote text cannot be empty")]
    EmptyEditedText,
    #[error("Quote ID cannot be empty")]
    EmptyQuoteId,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
}
