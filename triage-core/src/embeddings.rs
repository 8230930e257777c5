//! Embedding client for the knowledge base.
//!
//! Single backend: the OpenAI embeddings API (`text-embedding-ada-002`,
//! 1536-dim). The `EmbeddingBackend` trait is the seam the workflows and the
//! tests inject through. A failed call is surfaced to the caller unchanged —
//! no retry, no fallback vector.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default OpenAI (`text-embedding-ada-002`) embedding dimensions
pub const OPENAI_DIMENSIONS: usize = 1536;

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

// ============================================================================
// EmbeddingBackend trait
// ============================================================================

/// Abstraction over embedding providers.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single text. Called once per submitted question.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Returns the embedding dimension (e.g., 1536).
    fn dimensions(&self) -> usize;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

/// Embedding generation errors
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Invalid response: expected {expected} dimensions, got {actual}")]
    InvalidDimensions { expected: usize, actual: usize },

    #[error("Missing embedding in response")]
    MissingEmbedding,

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// Config types
// ============================================================================

/// OpenAI embedding client configuration
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(api_key: Option<String>, model: String, dimensions: usize) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            model,
            dimensions,
        }
    }
}

// ============================================================================
// OpenAI API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: Option<OpenAiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiEmbeddingClient
// ============================================================================

/// OpenAI embedding client — calls `POST /v1/embeddings`.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
    base_url: String,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        Self::with_base_url(config, "https://api.openai.com".to_string())
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(
        config: EmbeddingConfig,
        base_url: String,
    ) -> Result<Self, EmbeddingError> {
        if config.api_key.is_empty() {
            return Err(EmbeddingError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Generate an embedding for the given text. One attempt per call.
    pub async fn embed_raw(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let request = OpenAiRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(error_body);

            tracing::error!(code = status.as_u16(), message = %message, "OpenAI API error");

            return Err(EmbeddingError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let parsed: OpenAiResponse = response.json().await?;

        let values = parsed
            .data
            .into_iter()
            .next()
            .ok_or(EmbeddingError::MissingEmbedding)?
            .embedding;

        if values.len() != self.config.dimensions {
            return Err(EmbeddingError::InvalidDimensions {
                expected: self.config.dimensions,
                actual: values.len(),
            });
        }

        Ok(values)
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_raw(text).await
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// TESTS
// ============================================================================
