//! SRT subtitle extraction.
//!
//! Extracts (start, end, text) cues from SRT content. Cue index lines are
//! ignored, multi-line cue text is joined with spaces, and cues that are
//! empty after normalization are dropped.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::subtitle::timecode::Timecode;

lazy_static! {
    static ref TIMING_LINE: Regex =
        Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})")
            .expect("timing pattern is valid");
}

/// One subtitle cue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtitle {
    /// Start of the cue
    pub start_time: Timecode,
    /// End of the cue
    pub end_time: Timecode,
    /// Cue text, never empty
    pub text: String,
}

impl Subtitle {
    /// Create a new subtitle cue
    pub fn new(start_time: Timecode, end_time: Timecode, text: String) -> Self {
        Self {
            start_time,
            end_time,
            text,
        }
    }
}

/// Extract subtitle cues from SRT content.
///
/// Malformed blocks are skipped rather than failing the whole track; an
/// input with no parsable cues simply yields an empty list.
pub fn extract_subtitles(content: &str) -> Result<Vec<Subtitle>> {
    // Normalize newlines so block splitting sees plain \n
    let content = content.replace("\r\n", "\n").replace('\r', "\n");

    debug!("Extracting subtitles from {} bytes of content", content.len());

    let mut subtitles = Vec::new();
    let mut current_block: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current_block.is_empty() {
                if let Some(subtitle) = parse_cue_block(&current_block) {
                    subtitles.push(subtitle);
                }
                current_block.clear();
            }
        } else {
            current_block.push(line);
        }
    }

    // Last block has no trailing blank line
    if !current_block.is_empty() {
        if let Some(subtitle) = parse_cue_block(&current_block) {
            subtitles.push(subtitle);
        }
    }

    debug!("Extracted {} subtitle cues", subtitles.len());

    Ok(subtitles)
}

/// Parse one blank-line-delimited cue block
fn parse_cue_block(lines: &[&str]) -> Option<Subtitle> {
    let (timing_index, captures) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| TIMING_LINE.captures(line).map(|c| (i, c)))?;

    let start_time: Timecode = captures[1].parse().ok()?;
    let end_time: Timecode = captures[2].parse().ok()?;

    let text = lines[timing_index + 1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(" ");

    if text.is_empty() {
        debug!("Dropping empty cue at {}", start_time);
        return None;
    }

    Some(Subtitle::new(start_time, end_time, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello world!\n\n2\n00:00:05,000 --> 00:00:08,000\nThis is a test subtitle.";

    #[test]
    fn test_extract_sample_track() {
        let subtitles = extract_subtitles(SAMPLE).unwrap();
        assert_eq!(subtitles.len(), 2);
        assert_eq!(subtitles[0].text, "Hello world!");
        assert_eq!(subtitles[1].text, "This is a test subtitle.");
        assert_eq!(subtitles[0].start_time.to_string(), "00:00:01,000");
        assert_eq!(subtitles[1].end_time.to_string(), "00:00:08,000");
    }

    #[test]
    fn test_multiline_text_joined_with_spaces() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nfirst line\nsecond line\n";
        let subtitles = extract_subtitles(content).unwrap();
        assert_eq!(subtitles.len(), 1);
        assert_eq!(subtitles[0].text, "first line second line");
    }

    #[test]
    fn test_crlf_newlines() {
        let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nwindows line endings\r\n\r\n";
        let subtitles = extract_subtitles(content).unwrap();
        assert_eq!(subtitles.len(), 1);
        assert_eq!(subtitles[0].text, "windows line endings");
    }

    #[test]
    fn test_empty_cue_dropped() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\n   \n\n2\n00:00:03,000 --> 00:00:04,000\nkept\n";
        let subtitles = extract_subtitles(content).unwrap();
        assert_eq!(subtitles.len(), 1);
        assert_eq!(subtitles[0].text, "kept");
    }

    #[test]
    fn test_no_cues_yields_empty_list() {
        assert!(extract_subtitles("").unwrap().is_empty());
        assert!(extract_subtitles("just some prose\nwith no timings").unwrap().is_empty());
    }
}
