//! Library configuration.
//!
//! Token budgets, concurrency limits and the settings of the remote
//! classification endpoint live here.

use serde::{Deserialize, Serialize};

/// Configuration for the emotion timeline analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Soft token budget when grouping subtitles into analysis chunks
    pub target_chunk_tokens: usize,
    /// Hard token limit for a single piece submitted to the classifier
    pub max_piece_tokens: usize,
    /// Maximum number of concurrent classification requests
    pub max_concurrent_requests: usize,
    /// Base URL of the inference endpoint
    pub endpoint: String,
    /// Identifier of the classification model
    pub model: String,
    /// API key for the inference endpoint
    pub api_key: String,
    /// Timeout for a single classification request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            target_chunk_tokens: 200,
            max_piece_tokens: 512,
            max_concurrent_requests: 4,
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "j-hartmann/emotion-english-distilroberta-base".to_string(),
            api_key: String::new(),
            request_timeout_secs: 120,
        }
    }
}
