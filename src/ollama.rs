//! Ollama embedding provider using the `/api/embeddings` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, StoreError};

/// Timeout for a single embedding request. Embedding inference is CPU-bound
/// on the provider side and can be slow for long chunks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// An [`EmbeddingProvider`] backed by an Ollama-compatible embeddings API.
///
/// Sends `{ "model": ..., "prompt": ... }` to `{host}/api/embeddings` and
/// accepts either the native Ollama response shape or the OpenAI-style
/// `data` array shape. Makes a single attempt per call with no retries.
///
/// # Example
///
/// ```rust,ignore
/// use rag_store::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new("http://localhost:11434", "nomic-embed-text")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
#[derive(Debug)]
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaEmbeddingProvider {
    /// Create a new provider for the given host and model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `host` or `model` is empty, or if
    /// the HTTP client cannot be constructed.
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let host = host.into().trim_end_matches('/').to_string();
        let model = model.into();
        if host.is_empty() {
            return Err(StoreError::Config("embedding host must not be empty".to_string()));
        }
        if model.is_empty() {
            return Err(StoreError::Config("embedding model must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, host, model })
    }

    /// Return the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// The two embedding response shapes seen in the wild: the native Ollama
/// shape, and the OpenAI-style `data` array. Tried in that order.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Direct { embedding: Vec<f32> },
    OpenAiStyle { data: Vec<EmbeddingData> },
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "embedding text");

        let url = format!("{}/api/embeddings", self.host);
        let request_body = EmbeddingRequest { model: &self.model, prompt: text };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(model = %self.model, error = %e, "embedding request failed");
                StoreError::Provider {
                    status: None,
                    message: format!("request failed: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(model = %self.model, %status, "embedding provider returned an error");
            return Err(StoreError::Provider {
                status: Some(status.as_u16()),
                message: format!("provider returned {status}: {body}"),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "embedding response was not valid JSON");
            StoreError::Provider {
                status: Some(status.as_u16()),
                message: format!("invalid JSON in response: {e}"),
            }
        })?;

        let embedding = match serde_json::from_value::<EmbeddingResponse>(body) {
            Ok(EmbeddingResponse::Direct { embedding }) => Some(embedding),
            Ok(EmbeddingResponse::OpenAiStyle { data }) => {
                data.into_iter().next().map(|d| d.embedding)
            }
            Err(_) => None,
        };

        embedding.filter(|e| !e.is_empty()).ok_or_else(|| {
            error!(model = %self.model, "embedding missing from provider response");
            StoreError::Provider {
                status: Some(status.as_u16()),
                message: "embedding missing from response".to_string(),
            }
        })
    }
}
