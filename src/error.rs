//! Error types for the transcription engine

use std::fmt;

/// Errors that can occur during audio transcription
#[derive(Debug, Clone)]
pub enum TranscribeError {
    /// Invalid input (empty/silent signal, bad parameters)
    InvalidInput(String),

    /// Processing error during a pipeline stage
    ProcessingError(String),

    /// Numerical error (non-finite values, degenerate math)
    NumericalError(String),
}

impl fmt::Display for TranscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscribeError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TranscribeError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            TranscribeError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for TranscribeError {}
