//! emotion-timeline: map a subtitle track to a timeline of emotion
//! annotations.
//!
//! The pipeline extracts subtitle cues, regroups them into token-bounded
//! analysis chunks, classifies each chunk with an injected
//! text-classification capability and assembles the aggregated results
//! into an ordered timeline. Failures are isolated per chunk so a single
//! bad span never aborts the whole run.

pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod progress;
pub mod subtitle;
pub mod timeline;

pub use crate::config::AnalyzerConfig;
pub use crate::error::{AnalyzerError, Result};
pub use crate::timeline::{AnalysisDocument, Timeline};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::analysis::aggregator::{analyze_text, EmotionResult};
use crate::analysis::chunker::build_chunks;
use crate::model::{EmotionClassifier, RemoteClassifier, TokenCounter, WordCountTokenizer};
use crate::progress::{ProcessStep, ProgressObserver, ProgressReporter, ProgressTracker};
use crate::timeline::{TimelineEntry, TimelineMetadata};

/// The emotion timeline analyzer
pub struct EmotionTimeline {
    /// Library configuration
    config: AnalyzerConfig,
    /// Token counting capability
    tokenizer: Arc<dyn TokenCounter>,
    /// Classification capability
    classifier: Arc<dyn EmotionClassifier>,
    /// Progress tracker
    progress_tracker: Option<ProgressTracker>,
}

impl EmotionTimeline {
    /// Create an analyzer with injected capabilities
    pub fn new(
        config: AnalyzerConfig,
        tokenizer: Arc<dyn TokenCounter>,
        classifier: Arc<dyn EmotionClassifier>,
    ) -> Self {
        Self {
            config,
            tokenizer,
            classifier,
            progress_tracker: None,
        }
    }

    /// Create an analyzer backed by the remote classification endpoint.
    ///
    /// Token counting uses [`WordCountTokenizer`]; inject a model-accurate
    /// [`TokenCounter`] through [`EmotionTimeline::new`] when the budgets
    /// must match the model tokenizer exactly.
    pub fn remote(config: AnalyzerConfig) -> Result<Self> {
        let classifier = RemoteClassifier::from_config(&config)?;
        Ok(Self::new(
            config,
            Arc::new(WordCountTokenizer),
            Arc::new(classifier),
        ))
    }

    /// Create an analyzer with a progress reporter attached
    pub fn with_progress_reporter(
        config: AnalyzerConfig,
        tokenizer: Arc<dyn TokenCounter>,
        classifier: Arc<dyn EmotionClassifier>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        let mut analyzer = Self::new(config, tokenizer, classifier);
        analyzer.progress_tracker = Some(ProgressTracker::with_reporter(reporter));
        analyzer
    }

    /// Set the progress reporter
    pub fn set_progress_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        match &mut self.progress_tracker {
            Some(tracker) => tracker.set_reporter(reporter),
            None => self.progress_tracker = Some(ProgressTracker::with_reporter(reporter)),
        }
    }

    /// Add a progress observer
    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> Option<usize> {
        self.progress_tracker
            .as_mut()
            .and_then(|tracker| tracker.add_observer(observer))
    }

    /// Analyze a subtitle track and return the typed timeline.
    ///
    /// Chunks whose classification fails are dropped from the timeline but
    /// stay counted in `metadata.total_chunks`. Only conditions that
    /// prevent building any chunk at all surface as errors, with
    /// [`AnalyzerError::NoSubtitlesFound`] marking empty input.
    pub async fn analyze(&self, content: &str) -> Result<Timeline> {
        info!("Starting emotion timeline analysis");
        let tracker = self.progress_tracker.as_ref();

        // 1. Subtitle extraction
        if let Some(t) = tracker {
            t.set_step(ProcessStep::SubtitleExtraction);
            t.update_step_progress(0.0, Some("Extracting subtitles".to_string()));
        }

        let subtitles = subtitle::parser::extract_subtitles(content)?;
        if subtitles.is_empty() {
            warn!("No subtitles found in input");
            return Err(AnalyzerError::NoSubtitlesFound);
        }
        info!("Extracted {} subtitle cues", subtitles.len());

        if let Some(t) = tracker {
            t.update_step_progress(100.0, Some(format!("{} cues", subtitles.len())));
        }

        // 2. Chunk building
        if let Some(t) = tracker {
            t.set_step(ProcessStep::ChunkBuilding);
        }

        let chunks = build_chunks(
            &subtitles,
            self.config.target_chunk_tokens,
            self.tokenizer.as_ref(),
        );
        let oversized_chunks = chunks
            .iter()
            .filter(|c| self.tokenizer.count_tokens(&c.text) > self.config.target_chunk_tokens)
            .count();
        info!(
            "Built {} analysis chunks ({} over budget)",
            chunks.len(),
            oversized_chunks
        );

        if let Some(t) = tracker {
            t.update_step_progress(100.0, Some(format!("{} chunks", chunks.len())));
        }

        // 3. Per-chunk classification, bounded concurrency, failure isolated
        if let Some(t) = tracker {
            t.set_step(ProcessStep::EmotionAnalysis);
            t.update_step_progress(0.0, Some(format!("Classifying {} chunks", chunks.len())));
        }

        let total_chunks = chunks.len();
        let results = self.classify_chunks(&chunks).await;

        if let Some(t) = tracker {
            t.update_step_progress(100.0, None);
        }

        // 4. Assembly in original chunk order
        if let Some(t) = tracker {
            t.set_step(ProcessStep::TimelineAssembly);
        }

        let mut entries = Vec::new();
        for (chunk, result) in chunks.into_iter().zip(results) {
            if let Some(result) = result {
                entries.push(TimelineEntry::new(chunk, result));
            }
        }

        let metadata = TimelineMetadata {
            total_chunks,
            analyzed_chunks: entries.len(),
            oversized_chunks,
        };
        info!(
            "Timeline assembled: {}/{} chunks analyzed",
            metadata.analyzed_chunks, metadata.total_chunks
        );

        if let Some(t) = tracker {
            t.update_step_progress(100.0, None);
            t.complete();
        }

        Ok(Timeline { entries, metadata })
    }

    /// Analyze a subtitle track and return the JSON document of the
    /// external contract. This never fails: every error is converted into
    /// the error-shaped document.
    pub async fn analyze_to_json(&self, content: &str) -> String {
        let document = match self.analyze(content).await {
            Ok(timeline) => AnalysisDocument::success(timeline),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                AnalysisDocument::failure(e.to_string())
            }
        };
        document.to_json()
    }

    /// Classify all chunks concurrently, returning per-chunk results in
    /// the original chunk order.
    async fn classify_chunks(
        &self,
        chunks: &[crate::analysis::chunker::AnalysisChunk],
    ) -> Vec<Option<EmotionResult>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests.max(1)));
        let completed = Arc::new(AtomicUsize::new(0));
        let total = chunks.len();

        let mut tasks = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let semaphore = semaphore.clone();
            let tokenizer = self.tokenizer.clone();
            let classifier = self.classifier.clone();
            let completed = completed.clone();
            let text = chunk.text.clone();
            let limit = self.config.max_piece_tokens;

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();
                let result =
                    analyze_text(&text, limit, tokenizer.as_ref(), classifier.as_ref()).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("Classified chunk {} ({}/{})", i, done, total);
                (i, result)
            }));
        }

        // Merge by index so timeline order never depends on completion order
        let mut results: Vec<Option<EmotionResult>> = Vec::new();
        results.resize_with(total, || None);

        for joined in join_all(tasks).await {
            match joined {
                Ok((i, Ok(result))) => results[i] = result,
                Ok((i, Err(e))) => {
                    warn!("Dropping chunk {} from the timeline: {}", i, e);
                }
                Err(e) => {
                    warn!("Classification task failed: {}", e);
                }
            }
        }

        results
    }
}

/// Analyze a subtitle track with the remote classifier in one call,
/// returning the JSON document of the external contract.
pub async fn analyze_subtitle_track(content: &str, config: AnalyzerConfig) -> String {
    match EmotionTimeline::remote(config) {
        Ok(analyzer) => analyzer.analyze_to_json(content).await,
        Err(e) => AnalysisDocument::failure(e.to_string()).to_json(),
    }
}
