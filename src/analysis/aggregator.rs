//! Per-chunk emotion aggregation.
//!
//! Splits a chunk's text into classifier-sized pieces, classifies each
//! piece and averages the per-label scores into one distribution with a
//! dominant label.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analysis::packer::pack_sentences;
use crate::error::{AnalyzerError, Result};
use crate::model::{EmotionClassifier, TokenCounter};

/// Aggregated emotion scores for one analysis chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResult {
    /// Mean score per label, over the pieces where the label appeared
    pub label_scores: HashMap<String, f32>,
    /// Label with the highest mean score
    pub dominant_label: String,
    /// Mean score of the dominant label
    pub confidence: f32,
}

/// Classify the text of one analysis chunk.
///
/// Returns `Ok(None)` when there is nothing to classify: empty or
/// whitespace-only text, or no piece produced a usable result. A failing
/// classifier call surfaces as [`AnalyzerError::ChunkClassificationFailed`]
/// so the caller can isolate the chunk without aborting the run.
pub async fn analyze_text(
    text: &str,
    limit: usize,
    tokenizer: &dyn TokenCounter,
    classifier: &dyn EmotionClassifier,
) -> Result<Option<EmotionResult>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let pieces = pack_sentences(text, limit, tokenizer);
    let mut collected = Vec::new();

    for piece in &pieces {
        // Pieces that still exceed the limit (single oversized sentence)
        // cannot be processed by the model and are skipped.
        if tokenizer.count_tokens(piece) > limit {
            warn!("Skipping a piece of {} tokens (limit {})", tokenizer.count_tokens(piece), limit);
            continue;
        }

        let scores = classifier
            .classify(piece)
            .await
            .map_err(|e| AnalyzerError::ChunkClassificationFailed(e.to_string()))?;
        if !scores.is_empty() {
            collected.push(scores);
        }
    }

    if collected.is_empty() {
        debug!("No classification results collected for chunk");
        return Ok(None);
    }

    // Gather scores per label in first-seen order; a label absent from a
    // piece's result is not counted into that label's mean.
    let mut observed: Vec<(String, Vec<f32>)> = Vec::new();
    for scores in &collected {
        for entry in scores {
            match observed.iter_mut().find(|(label, _)| *label == entry.label) {
                Some((_, values)) => values.push(entry.score),
                None => observed.push((entry.label.clone(), vec![entry.score])),
            }
        }
    }

    let averaged: Vec<(String, f32)> = observed
        .into_iter()
        .map(|(label, values)| {
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            (label, mean)
        })
        .collect();

    // Argmax with ties going to the first-seen label
    let mut dominant_label = String::new();
    let mut confidence = f32::MIN;
    for (label, score) in &averaged {
        if *score > confidence {
            dominant_label = label.clone();
            confidence = *score;
        }
    }

    Ok(Some(EmotionResult {
        label_scores: averaged.into_iter().collect(),
        dominant_label,
        confidence,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelScore, WordCountTokenizer};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed score sequence, one entry per call
    struct ScriptedClassifier {
        responses: Mutex<Vec<Vec<LabelScore>>>,
    }

    impl ScriptedClassifier {
        fn new(mut responses: Vec<Vec<LabelScore>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl EmotionClassifier for ScriptedClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected classify call"))
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl EmotionClassifier for FailingClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
            Err(AnalyzerError::Classification("model unavailable".to_string()))
        }
    }

    fn score(label: &str, score: f32) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_text_yields_no_result() {
        let classifier = ScriptedClassifier::new(vec![]);
        let result = tokio_test::block_on(analyze_text(
            "   ",
            10,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_averages_scores_across_pieces() {
        let classifier = ScriptedClassifier::new(vec![
            vec![score("joy", 0.8), score("anger", 0.2)],
            vec![score("joy", 0.4), score("anger", 0.6)],
        ]);

        // Two sentences, three words each, limit forces one piece per sentence
        let result = tokio_test::block_on(analyze_text(
            "one two three. four five six.",
            3,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap()
        .unwrap();

        assert!((result.label_scores["joy"] - 0.6).abs() < 1e-6);
        assert!((result.label_scores["anger"] - 0.4).abs() < 1e-6);
        assert_eq!(result.dominant_label, "joy");
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_matches_maximum() {
        let classifier = ScriptedClassifier::new(vec![vec![
            score("neutral", 0.1),
            score("sadness", 0.7),
            score("joy", 0.2),
        ]]);

        let result = tokio_test::block_on(analyze_text(
            "a sad sentence.",
            10,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap()
        .unwrap();

        let max = result
            .label_scores
            .values()
            .cloned()
            .fold(f32::MIN, f32::max);
        assert_eq!(result.label_scores[&result.dominant_label], max);
        assert_eq!(result.dominant_label, "sadness");
    }

    #[test]
    fn test_tie_broken_by_first_seen_label() {
        let classifier =
            ScriptedClassifier::new(vec![vec![score("joy", 0.5), score("anger", 0.5)]]);

        let result = tokio_test::block_on(analyze_text(
            "tied.",
            10,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap()
        .unwrap();

        assert_eq!(result.dominant_label, "joy");
    }

    #[test]
    fn test_label_missing_from_one_piece_not_counted_as_zero() {
        let classifier = ScriptedClassifier::new(vec![
            vec![score("joy", 0.9)],
            vec![score("joy", 0.5), score("fear", 0.4)],
        ]);

        let result = tokio_test::block_on(analyze_text(
            "one two three. four five six.",
            3,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap()
        .unwrap();

        // fear appeared once, so its mean is its single score
        assert!((result.label_scores["fear"] - 0.4).abs() < 1e-6);
        assert!((result.label_scores["joy"] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_oversized_piece_skipped() {
        // Single sentence above the limit: packed as one oversized piece,
        // skipped, so no results are collected at all.
        let classifier = ScriptedClassifier::new(vec![]);
        let result = tokio_test::block_on(analyze_text(
            "one two three four five six seven",
            3,
            &WordCountTokenizer,
            &classifier,
        ))
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_classifier_failure_surfaces_as_chunk_error() {
        let result = tokio_test::block_on(analyze_text(
            "some text.",
            10,
            &WordCountTokenizer,
            &FailingClassifier,
        ));
        assert!(matches!(
            result,
            Err(AnalyzerError::ChunkClassificationFailed(_))
        ));
    }
}
