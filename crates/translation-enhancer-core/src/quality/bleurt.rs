use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ScorerConfig;
use crate::error::{Error, Result};
use super::ScorerService;

/// Client for an HTTP service wrapping a BLEURT checkpoint.
///
/// The service receives parallel `references`/`candidates` lists and answers
/// with one score per pair, either as `{"scores": [...]}` or a bare array.
pub struct BleurtClient {
    client: Client,
    /// Scoring endpoint (e.g., "http://localhost:8000/score")
    pub endpoint: String,
    /// Checkpoint name forwarded to the service
    pub checkpoint: String,
}

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    checkpoint: &'a str,
    references: &'a [String],
    candidates: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoreResponse {
    Wrapped { scores: Vec<f64> },
    Bare(Vec<f64>),
}

impl ScoreResponse {
    fn into_scores(self) -> Vec<f64> {
        match self {
            Self::Wrapped { scores } | Self::Bare(scores) => scores,
        }
    }
}

impl BleurtClient {
    pub fn new(config: &ScorerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("translation-enhancer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            checkpoint: config.checkpoint.clone(),
        })
    }
}

#[async_trait]
impl ScorerService for BleurtClient {
    fn name(&self) -> &'static str {
        "BLEURT"
    }

    async fn score_batch(&self, references: &[String], candidates: &[String]) -> Result<Vec<f64>> {
        if references.len() != candidates.len() {
            return Err(Error::ScoringUnavailable(format!(
                "{} references for {} candidates",
                references.len(),
                candidates.len()
            )));
        }

        let request = ScoreRequest {
            checkpoint: &self.checkpoint,
            references,
            candidates,
        };

        debug!("Scoring {} pair(s) at {}", candidates.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ScoringUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Scorer error: {} - {}", status, body);
            return Err(Error::ScoringUnavailable(format!("HTTP {status}: {body}")));
        }

        let scores = response
            .json::<ScoreResponse>()
            .await
            .map_err(|e| Error::ScoringUnavailable(format!("invalid scorer response: {e}")))?
            .into_scores();

        if scores.len() != candidates.len() {
            return Err(Error::ScoringUnavailable(format!(
                "expected {} scores, got {}",
                candidates.len(),
                scores.len()
            )));
        }

        Ok(scores)
    }
}
