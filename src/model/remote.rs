//! HTTP classification backend.
//!
//! Calls a hosted inference endpoint that exposes text-classification
//! models and returns all per-label scores for each input.

use log::{debug, error};
use reqwest::Client;
use std::time::Duration;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::model::{EmotionClassifier, LabelScore};

/// Emotion classifier backed by an HTTP inference endpoint
pub struct RemoteClassifier {
    client: Client,
    url: String,
    api_key: String,
}

impl RemoteClassifier {
    /// Create a classifier from the library configuration
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            error!("Inference API key is empty");
            return Err(AnalyzerError::Configuration(
                "API key is required for remote classification".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        debug!("Sending classification request ({} bytes)", text.len());

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "inputs": text,
                "options": { "wait_for_model": true }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("Failed to read error response: {}", e),
            };
            error!("Inference API error (status {}): {}", status, error_text);
            return Err(AnalyzerError::Classification(format!(
                "Inference API error (status {}): {}",
                status, error_text
            )));
        }

        // The endpoint wraps single-input results in an outer array
        let rows: Vec<Vec<LabelScore>> = response.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            AnalyzerError::Classification("Inference API returned no scores".to_string())
        })
    }
}
