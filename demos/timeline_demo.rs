//! Demo of the emotion timeline pipeline.
//!
//! Analyzes an SRT file (or a built-in sample) with the remote
//! classification endpoint and prints the resulting JSON document.
//!
//! Usage: `HF_API_TOKEN=... cargo run --example timeline_demo [track.srt]`

use emotion_timeline::progress::ConsoleProgressObserver;
use emotion_timeline::{AnalyzerConfig, EmotionTimeline};

const SAMPLE_TRACK: &str = "1
00:00:01,000 --> 00:00:04,000
Hello world!

2
00:00:05,000 --> 00:00:08,000
This is a test subtitle.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let api_key = std::env::var("HF_API_TOKEN").expect("HF_API_TOKEN must be set");

    let content = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_TRACK.to_string(),
    };

    let config = AnalyzerConfig {
        api_key,
        ..AnalyzerConfig::default()
    };

    let mut analyzer = EmotionTimeline::remote(config)?;
    analyzer.set_progress_reporter(Box::new(
        emotion_timeline::progress::DefaultProgressReporter::new(),
    ));
    analyzer.add_observer(Box::new(ConsoleProgressObserver::new()));

    let document = analyzer.analyze_to_json(&content).await;
    println!("{}", document);

    Ok(())
}
