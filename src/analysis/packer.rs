//! Token-bounded text packing.
//!
//! Splits arbitrary text into pieces that fit the classifier's hard token
//! limit without breaking sentences apart.

use log::warn;

use crate::analysis::sentence::split_sentences;
use crate::model::TokenCounter;

/// Pack the sentences of `text` into pieces of at most `limit` tokens.
///
/// Sentences are accumulated greedily; a sentence that would push the
/// current piece over the limit starts a new one. A single sentence that
/// exceeds the limit on its own is still emitted as one piece rather than
/// truncated, so the output always covers the whole input.
pub fn pack_sentences(text: &str, limit: usize, tokenizer: &dyn TokenCounter) -> Vec<String> {
    let sentences = split_sentences(text);

    let mut pieces = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        let candidate = if current.is_empty() {
            sentence.clone()
        } else {
            format!("{} {}", current, sentence)
        };

        if tokenizer.count_tokens(&candidate) <= limit {
            current = candidate;
        } else {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            if tokenizer.count_tokens(&sentence) > limit {
                warn!(
                    "Sentence of {} tokens exceeds the {}-token piece limit on its own",
                    tokenizer.count_tokens(&sentence),
                    limit
                );
            }
            current = sentence;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordCountTokenizer;

    #[test]
    fn test_small_text_stays_in_one_piece() {
        let pieces = pack_sentences("One two. Three four.", 10, &WordCountTokenizer);
        assert_eq!(pieces, vec!["One two Three four"]);
    }

    #[test]
    fn test_splits_at_the_limit() {
        let pieces = pack_sentences("a b c. d e f. g h i.", 6, &WordCountTokenizer);
        assert_eq!(pieces, vec!["a b c d e f", "g h i"]);
    }

    #[test]
    fn test_oversized_sentence_becomes_its_own_piece() {
        let pieces = pack_sentences("one two three four five six. tail.", 3, &WordCountTokenizer);
        assert_eq!(pieces, vec!["one two three four five six", "tail"]);
    }

    #[test]
    fn test_no_sentence_dropped_or_duplicated() {
        let text = "The rain stopped. Nobody noticed! Why would they? The town slept on. Morning came.";
        let pieces = pack_sentences(text, 5, &WordCountTokenizer);
        assert!(pieces.len() > 1);

        // Same words in the same order once joining whitespace is ignored
        let sentences = split_sentences(text);
        let original_words: Vec<String> = sentences
            .iter()
            .flat_map(|s| s.split_whitespace().map(String::from))
            .collect();
        let packed_words: Vec<String> = pieces
            .iter()
            .flat_map(|p| p.split_whitespace().map(String::from))
            .collect();
        assert_eq!(packed_words, original_words);
    }

    #[test]
    fn test_empty_input_yields_no_pieces() {
        assert!(pack_sentences("", 10, &WordCountTokenizer).is_empty());
        assert!(pack_sentences("!!!", 10, &WordCountTokenizer).is_empty());
    }
}
