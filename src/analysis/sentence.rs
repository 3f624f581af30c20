//! Sentence splitting.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]+").expect("boundary pattern is valid");
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at one or more consecutive `.`, `!` or `?` characters.
/// The terminators themselves are not kept.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
