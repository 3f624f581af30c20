//! Progress reporting for long analysis runs.
//!
//! An Observer-pattern implementation: the pipeline drives a
//! [`ProgressTracker`], observers registered on a [`ProgressReporter`]
//! receive weighted per-step and total progress updates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// A single progress update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// Name of the current step
    pub step: String,
    /// Progress of the current step (0.0 - 100.0)
    pub step_progress: f32,
    /// Progress of the whole run (0.0 - 100.0)
    pub total_progress: f32,
    /// Optional detail message
    pub details: Option<String>,
}

impl ProgressInfo {
    pub fn new(
        step: impl Into<String>,
        step_progress: f32,
        total_progress: f32,
        details: Option<String>,
    ) -> Self {
        Self {
            step: step.into(),
            step_progress: step_progress.clamp(0.0, 100.0),
            total_progress: total_progress.clamp(0.0, 100.0),
            details,
        }
    }
}

/// Steps of the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessStep {
    /// Extracting subtitle cues from the input
    SubtitleExtraction,
    /// Grouping subtitles into token-bounded chunks
    ChunkBuilding,
    /// Classifying chunk text and aggregating scores
    EmotionAnalysis,
    /// Assembling the final timeline
    TimelineAssembly,
}

impl ProcessStep {
    /// Step name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubtitleExtraction => "Subtitle extraction",
            Self::ChunkBuilding => "Chunk building",
            Self::EmotionAnalysis => "Emotion analysis",
            Self::TimelineAssembly => "Timeline assembly",
        }
    }

    /// Share of the whole run, in percent
    pub fn weight(&self) -> f32 {
        match self {
            Self::SubtitleExtraction => 10.0,
            Self::ChunkBuilding => 15.0,
            Self::EmotionAnalysis => 60.0,
            Self::TimelineAssembly => 15.0,
        }
    }
}

/// Observer receiving progress updates
pub trait ProgressObserver: Send + Sync {
    /// Called on every progress update
    fn on_progress_update(&self, progress: ProgressInfo);
}

/// Fans progress updates out to registered observers
pub trait ProgressReporter: Send + Sync {
    /// Add an observer, returning an id usable for removal
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize;

    /// Remove an observer by id
    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>>;

    /// Notify all observers
    fn notify_progress(&self, progress: ProgressInfo);
}

/// Default in-memory reporter
pub struct DefaultProgressReporter {
    observers: RwLock<HashMap<usize, Box<dyn ProgressObserver>>>,
    next_id: AtomicUsize,
}

impl DefaultProgressReporter {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl Default for DefaultProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for DefaultProgressReporter {
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut observers = self.observers.write().unwrap();
        observers.insert(id, observer);
        id
    }

    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>> {
        let mut observers = self.observers.write().unwrap();
        observers.remove(&id)
    }

    fn notify_progress(&self, progress: ProgressInfo) {
        let observers = self.observers.read().unwrap();
        for observer in observers.values() {
            observer.on_progress_update(progress.clone());
        }
    }
}

/// Observer printing updates to stdout
pub struct ConsoleProgressObserver {
    prefix: Option<String>,
}

impl ConsoleProgressObserver {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl Default for ConsoleProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        let prefix = self.prefix.as_deref().unwrap_or("");
        let details = progress.details.as_deref().unwrap_or("");

        println!(
            "{}[{}] step {:.1}%, total {:.1}%{}",
            prefix,
            progress.step,
            progress.step_progress,
            progress.total_progress,
            if details.is_empty() {
                String::new()
            } else {
                format!(" ({})", details)
            }
        );
    }
}

/// Tracks weighted progress across pipeline steps
pub struct ProgressTracker {
    reporter: Option<Box<dyn ProgressReporter>>,
    current_step: RwLock<ProcessStep>,
    step_progress: RwLock<f32>,
    total_progress: RwLock<f32>,
    completed_steps: RwLock<HashMap<ProcessStep, f32>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            reporter: None,
            current_step: RwLock::new(ProcessStep::SubtitleExtraction),
            step_progress: RwLock::new(0.0),
            total_progress: RwLock::new(0.0),
            completed_steps: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_reporter(reporter: Box<dyn ProgressReporter>) -> Self {
        let mut tracker = Self::new();
        tracker.reporter = Some(reporter);
        tracker
    }

    /// Set the reporter receiving updates
    pub fn set_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        self.reporter = Some(reporter);
    }

    /// Add an observer to the reporter, if one is set
    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> Option<usize> {
        self.reporter
            .as_mut()
            .map(|reporter| reporter.add_observer(observer))
    }

    /// Switch to a new step, marking the previous one complete
    pub fn set_step(&self, step: ProcessStep) {
        let mut current_step = self.current_step.write().unwrap();
        if *current_step != step {
            let mut completed_steps = self.completed_steps.write().unwrap();
            completed_steps.insert(*current_step, 100.0);
            *current_step = step;
            drop(completed_steps);

            let mut step_progress = self.step_progress.write().unwrap();
            *step_progress = 0.0;
            drop(step_progress);
            drop(current_step);

            self.update_total_progress();
            self.report_progress(None);
        }
    }

    /// Update the progress of the current step
    pub fn update_step_progress(&self, progress: f32, details: Option<String>) {
        let mut step_progress = self.step_progress.write().unwrap();
        *step_progress = progress.clamp(0.0, 100.0);
        drop(step_progress);

        self.update_total_progress();
        self.report_progress(details);
    }

    fn update_total_progress(&self) {
        let mut total = 0.0;
        let mut total_weight = 0.0;

        let completed_steps = self.completed_steps.read().unwrap();
        for (step, progress) in completed_steps.iter() {
            total += step.weight() * progress / 100.0;
            total_weight += step.weight();
        }
        drop(completed_steps);

        let current_step = self.current_step.read().unwrap();
        let step_progress = self.step_progress.read().unwrap();
        total += current_step.weight() * *step_progress / 100.0;
        total_weight += current_step.weight();

        let mut total_progress = self.total_progress.write().unwrap();
        *total_progress = (total / total_weight * 100.0).clamp(0.0, 100.0);
    }

    fn report_progress(&self, details: Option<String>) {
        if let Some(reporter) = &self.reporter {
            let current_step = self.current_step.read().unwrap();
            let step_progress = self.step_progress.read().unwrap();
            let total_progress = self.total_progress.read().unwrap();

            let progress = ProgressInfo::new(
                current_step.as_str(),
                *step_progress,
                *total_progress,
                details,
            );
            reporter.notify_progress(progress);
        }
    }

    /// Mark the whole run as complete
    pub fn complete(&self) {
        let current_step = self.current_step.read().unwrap();
        let mut completed_steps = self.completed_steps.write().unwrap();
        completed_steps.insert(*current_step, 100.0);
        drop(completed_steps);
        drop(current_step);

        let mut total_progress = self.total_progress.write().unwrap();
        *total_progress = 100.0;
        drop(total_progress);

        self.report_progress(Some("Analysis complete".to_string()));
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
