//! Subtitle extraction and time handling.

pub mod parser;
pub mod timecode;

pub use parser::{extract_subtitles, Subtitle};
pub use timecode::Timecode;
