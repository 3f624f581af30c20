//! The packing and aggregation engine.
//!
//! Dialogue is regrouped into token-bounded analysis chunks, each chunk's
//! text is split into classifier-sized pieces, and per-piece scores are
//! combined into one result per chunk.

pub mod aggregator;
pub mod chunker;
pub mod packer;
pub mod sentence;

pub use aggregator::{analyze_text, EmotionResult};
pub use chunker::{build_chunks, AnalysisChunk};
pub use packer::pack_sentences;
pub use sentence::split_sentences;
