//! Error types for the emotion-timeline library.
//!
//! Failure kinds are explicit so that callers can tell a recoverable
//! empty result apart from a genuine malfunction.

use thiserror::Error;

/// Errors produced by the emotion-timeline library
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input contained no parsable subtitle cues
    #[error("No subtitles found in content")]
    NoSubtitlesFound,

    /// Subtitle extraction failed
    #[error("Subtitle extraction error: {0}")]
    ExtractionFailed(String),

    /// A timecode string did not match the HH:MM:SS,mmm format
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    /// Classification of one analysis chunk failed
    #[error("Chunk classification error: {0}")]
    ChunkClassificationFailed(String),

    /// The classifier capability returned an unusable response
    #[error("Classifier error: {0}")]
    Classification(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for AnalyzerError {
    fn from(s: &str) -> Self {
        AnalyzerError::Other(s.to_string())
    }
}

impl From<String> for AnalyzerError {
    fn from(s: String) -> Self {
        AnalyzerError::Other(s)
    }
}

/// Result type for the emotion-timeline library
pub type Result<T> = std::result::Result<T, AnalyzerError>;
