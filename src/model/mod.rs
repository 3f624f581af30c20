//! External model capabilities.
//!
//! Token counting and emotion classification are injected interfaces, not
//! hard dependencies: the packing and chunking code is testable with a
//! deterministic tokenizer and the classifier can be any backend that
//! returns per-label scores.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod remote;
pub mod tokenizer;

pub use remote::RemoteClassifier;
pub use tokenizer::WordCountTokenizer;

/// A single (label, score) row of a classification result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    /// Emotion label, from the model-defined vocabulary
    pub label: String,
    /// Score in [0, 1]
    pub score: f32,
}

/// Token counting under the classification model's tokenization scheme.
///
/// Counts must be consistent with the token limits configured for the
/// packer and the chunk builder.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens of `text`
    fn count_tokens(&self, text: &str) -> usize;
}

/// Text classification over a fixed emotion label vocabulary.
///
/// Implementations must be safe to call repeatedly and independently for
/// each text piece.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify `text`, returning one score per label
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}
