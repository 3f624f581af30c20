//! Time-span chunk building.
//!
//! Groups sequential subtitle cues into larger analysis windows bounded
//! by a target token count, preserving time order and span.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::TokenCounter;
use crate::subtitle::parser::Subtitle;
use crate::subtitle::timecode::Timecode;

/// A time-spanning group of subtitles analyzed as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisChunk {
    /// Start of the first contained subtitle
    pub start_time: Timecode,
    /// End of the last contained subtitle
    pub end_time: Timecode,
    /// Space-joined text of the contained subtitles, in order
    pub text: String,
    /// The contained subtitles
    pub subtitles: Vec<Subtitle>,
}

impl AnalysisChunk {
    /// Start a chunk from a single subtitle
    fn seed(subtitle: Subtitle) -> Self {
        Self {
            start_time: subtitle.start_time,
            end_time: subtitle.end_time,
            text: subtitle.text.clone(),
            subtitles: vec![subtitle],
        }
    }

    /// Extend the chunk with a subtitle whose merged text was already admitted
    fn extend(&mut self, subtitle: Subtitle, merged_text: String) {
        self.end_time = subtitle.end_time;
        self.text = merged_text;
        self.subtitles.push(subtitle);
    }
}

/// Group subtitles into chunks of at most `target` tokens.
///
/// Every subtitle lands in exactly one chunk and the input order is kept.
/// A subtitle whose own text exceeds the target is placed alone: the
/// policy never splits below a single subtitle, so such a chunk nominally
/// overflows the budget.
pub fn build_chunks(
    subtitles: &[Subtitle],
    target: usize,
    tokenizer: &dyn TokenCounter,
) -> Vec<AnalysisChunk> {
    let mut chunks = Vec::new();
    let mut current: Option<AnalysisChunk> = None;

    for subtitle in subtitles {
        let candidate = match &current {
            Some(chunk) => format!("{} {}", chunk.text, subtitle.text),
            None => subtitle.text.clone(),
        };

        if tokenizer.count_tokens(&candidate) <= target {
            match current.as_mut() {
                Some(chunk) => chunk.extend(subtitle.clone(), candidate),
                None => current = Some(AnalysisChunk::seed(subtitle.clone())),
            }
        } else {
            if let Some(done) = current.take() {
                chunks.push(done);
            }
            if tokenizer.count_tokens(&subtitle.text) > target {
                warn!(
                    "Subtitle at {} exceeds the {}-token chunk target on its own",
                    subtitle.start_time, target
                );
            }
            current = Some(AnalysisChunk::seed(subtitle.clone()));
        }
    }

    if let Some(done) = current.take() {
        chunks.push(done);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordCountTokenizer;

    fn subtitle(start_ms: u64, end_ms: u64, text: &str) -> Subtitle {
        Subtitle::new(
            Timecode::from_millis(start_ms),
            Timecode::from_millis(end_ms),
            text.to_string(),
        )
    }

    #[test]
    fn test_merges_within_budget() {
        let subtitles = vec![
            subtitle(1000, 4000, "Hello world!"),
            subtitle(5000, 8000, "This is a test subtitle."),
        ];

        let chunks = build_chunks(&subtitles, 200, &WordCountTokenizer);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world! This is a test subtitle.");
        assert_eq!(chunks[0].start_time.to_string(), "00:00:01,000");
        assert_eq!(chunks[0].end_time.to_string(), "00:00:08,000");
        assert_eq!(chunks[0].subtitles.len(), 2);
    }

    #[test]
    fn test_splits_when_budget_exceeded() {
        let subtitles = vec![
            subtitle(0, 1000, "one two three"),
            subtitle(1000, 2000, "four five six"),
            subtitle(2000, 3000, "seven eight nine"),
        ];

        let chunks = build_chunks(&subtitles, 6, &WordCountTokenizer);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "one two three four five six");
        assert_eq!(chunks[1].text, "seven eight nine");
        assert_eq!(chunks[0].end_time, Timecode::from_millis(2000));
        assert_eq!(chunks[1].start_time, Timecode::from_millis(2000));
    }

    #[test]
    fn test_every_chunk_within_budget_or_singleton() {
        let subtitles: Vec<Subtitle> = (0..20)
            .map(|i| subtitle(i * 1000, (i + 1) * 1000, "alpha beta gamma delta"))
            .collect();

        let target = 10;
        let tokenizer = WordCountTokenizer;
        let chunks = build_chunks(&subtitles, target, &tokenizer);

        for chunk in &chunks {
            let within = tokenizer.count_tokens(&chunk.text) <= target;
            assert!(within || chunk.subtitles.len() == 1);
        }

        // Coverage: every subtitle exactly once, in order
        let total: usize = chunks.iter().map(|c| c.subtitles.len()).sum();
        assert_eq!(total, subtitles.len());
    }

    #[test]
    fn test_oversized_subtitle_becomes_singleton_chunk() {
        let subtitles = vec![
            subtitle(0, 1000, "short"),
            subtitle(1000, 2000, "this single cue has far too many words to fit the budget"),
            subtitle(2000, 3000, "tail"),
        ];

        let chunks = build_chunks(&subtitles, 4, &WordCountTokenizer);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].subtitles.len(), 1);
        assert_eq!(
            chunks[1].text,
            "this single cue has far too many words to fit the budget"
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_chunks(&[], 10, &WordCountTokenizer).is_empty());
    }
}
