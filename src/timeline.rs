//! Timeline types and the external output contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analysis::aggregator::EmotionResult;
use crate::analysis::chunker::AnalysisChunk;
use crate::subtitle::timecode::Timecode;

/// One analyzed span of the track: a chunk merged with its emotion result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Start of the span
    pub start_time: Timecode,
    /// End of the span
    pub end_time: Timecode,
    /// The analyzed text
    pub text: String,
    /// Mean score per label
    pub label_scores: HashMap<String, f32>,
    /// Label with the highest mean score
    pub dominant_label: String,
    /// Mean score of the dominant label
    pub confidence: f32,
}

impl TimelineEntry {
    /// Merge a chunk with its emotion result
    pub fn new(chunk: AnalysisChunk, result: EmotionResult) -> Self {
        Self {
            start_time: chunk.start_time,
            end_time: chunk.end_time,
            text: chunk.text,
            label_scores: result.label_scores,
            dominant_label: result.dominant_label,
            confidence: result.confidence,
        }
    }
}

/// Counters describing an analysis run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimelineMetadata {
    /// Number of chunks built from the input
    pub total_chunks: usize,
    /// Number of chunks that produced a timeline entry
    pub analyzed_chunks: usize,
    /// Number of chunks whose single subtitle exceeded the token budget
    pub oversized_chunks: usize,
}

/// The ordered sequence of analyzed spans covering the input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Timeline entries in track order
    pub entries: Vec<TimelineEntry>,
    /// Run counters
    pub metadata: TimelineMetadata,
}

/// The single structured document observed by external consumers.
///
/// On success it carries the timeline and metadata; on top-level failure
/// the timeline is empty, the metadata zeroed and `error` describes what
/// went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timeline: Vec<TimelineEntry>,
    pub metadata: TimelineMetadata,
}

impl AnalysisDocument {
    /// Build the success document from a timeline
    pub fn success(timeline: Timeline) -> Self {
        Self {
            error: None,
            timeline: timeline.entries,
            metadata: timeline.metadata,
        }
    }

    /// Build the error document
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            timeline: Vec::new(),
            metadata: TimelineMetadata::default(),
        }
    }

    /// Serialize the document to JSON.
    ///
    /// Serialization of these types cannot realistically fail; if it ever
    /// does, a minimal hand-built error document is returned instead.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                "{{\"error\":\"Failed to serialize analysis document: {}\",\"timeline\":[],\"metadata\":{{\"total_chunks\":0,\"analyzed_chunks\":0,\"oversized_chunks\":0}}}}",
                e
            )
        })
    }
}
