use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ModelStoreConfig;
use crate::error::{Error, LoadError, Result};
use super::resolver::ModelId;
use super::traits::{LoadedModel, ModelStore, ModelStoreInfo};

/// Pipeline tags a hub model may carry and still be usable for translation
const SUPPORTED_TASKS: [&str; 2] = ["translation", "text2text-generation"];

/// Special tokens Marian vocabularies use that must never reach the user
const SPECIAL_TOKENS: [&str; 3] = ["<pad>", "</s>", "<unk>"];

/// Model store backed by a Hugging Face compatible hub.
///
/// Loading checks the model card on the hub; generation goes to the
/// inference endpoint, which runs tokenization, greedy decoding and
/// detokenization server-side.
pub struct HubModelStore {
    client: Client,
    /// Hub base URL (e.g., "https://huggingface.co")
    pub hub_url: String,
    /// Inference base URL (e.g., "https://api-inference.huggingface.co")
    pub inference_url: String,
    /// Optional access token
    pub api_token: Option<String>,
    /// Upper bound on generated sequence length
    pub max_length: u32,
}

#[derive(Debug, Deserialize)]
struct ModelCard {
    id: String,
    #[serde(default)]
    pipeline_tag: Option<String>,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    translation_text: Option<String>,
    #[serde(default)]
    generated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

impl HubModelStore {
    pub fn new(config: &ModelStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("translation-enhancer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            hub_url: config.hub_url.trim_end_matches('/').to_string(),
            inference_url: config.inference_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            max_length: config.max_length,
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl ModelStore for HubModelStore {
    fn info(&self) -> ModelStoreInfo {
        ModelStoreInfo {
            name: "Hugging Face Hub",
        }
    }

    async fn load(&self, id: &ModelId) -> std::result::Result<Arc<dyn LoadedModel>, LoadError> {
        let url = format!("{}/api/models/{}", self.hub_url, id);
        debug!("Looking up model card at {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| LoadError::Unreachable(e.to_string()))?;

        let status = response.status();
        // The hub answers 401 rather than 404 for repositories that do not exist
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNAUTHORIZED {
            return Err(LoadError::NotFound(id.clone()));
        }
        if status.is_server_error() {
            return Err(LoadError::Unreachable(format!("HTTP {status} from {url}")));
        }
        if !status.is_success() {
            return Err(LoadError::Rejected {
                model: id.clone(),
                reason: format!("HTTP {status}"),
            });
        }

        let card: ModelCard = response.json().await.map_err(|e| LoadError::Rejected {
            model: id.clone(),
            reason: format!("unreadable model card: {e}"),
        })?;

        if let Some(ref task) = card.pipeline_tag
            && !SUPPORTED_TASKS.contains(&task.as_str())
        {
            return Err(LoadError::Rejected {
                model: id.clone(),
                reason: format!("model {} is a {task} model", card.id),
            });
        }

        Ok(Arc::new(HubModel {
            id: id.clone(),
            client: self.client.clone(),
            endpoint: format!("{}/models/{}", self.inference_url, id),
            api_token: self.api_token.clone(),
            max_length: self.max_length,
        }))
    }
}

/// A model served by the hub's inference endpoint
pub struct HubModel {
    id: ModelId,
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    max_length: u32,
}

impl HubModel {
    fn failure(&self, reason: impl Into<String>) -> Error {
        Error::InferenceFailure {
            model: self.id.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LoadedModel for HubModel {
    fn id(&self) -> &ModelId {
        &self.id
    }

    async fn generate(&self, text: &str) -> Result<String> {
        let request = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: self.max_length,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut req = self.client.post(&self.endpoint).json(&request);
        if let Some(ref token) = self.api_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                self.failure("inference request timed out")
            } else {
                self.failure(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<InferenceError>(&body)
                .map_or(body, |e| e.error);
            warn!("Inference error from {}: {} - {}", self.endpoint, status, reason);
            return Err(self.failure(format!("HTTP {status}: {reason}")));
        }

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| self.failure(format!("invalid inference response: {e}")))?;

        let raw = generations
            .into_iter()
            .next()
            .and_then(|g| g.translation_text.or(g.generated_text))
            .ok_or_else(|| self.failure("no generation in response"))?;

        Ok(strip_special_tokens(&raw))
    }
}

/// Trim whitespace and special tokens from the ends of decoded output.
///
/// The interior is left as the model produced it.
fn strip_special_tokens(text: &str) -> String {
    let mut cleaned = text.trim();
    while let Some(rest) = SPECIAL_TOKENS
        .iter()
        .find_map(|token| cleaned.strip_prefix(token).or_else(|| cleaned.strip_suffix(token)))
    {
        cleaned = rest.trim();
    }
    cleaned.to_string()
}
