//! Embedding providers. The production implementation wraps Ollama via
//! ollama-rs; tests inject deterministic fakes through the [`Embedder`] trait.

use std::time::Duration;

use async_trait::async_trait;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::Ollama;
use thiserror::Error;

pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default budget for a single embedding call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps text to fixed-length vectors. Ingestion and query time must use the
/// same provider instance (same model) or similarities are meaningless.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embed multiple strings in one call. Returns one vector per input,
    /// in input order.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Ollama-backed embedder. Every request runs under a timeout so a stuck
/// server surfaces as [`EmbedError::Timeout`] instead of hanging the caller.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    inner: Ollama,
    model: String,
    timeout: Duration,
}

impl OllamaEmbedder {
    /// Create from URL string. Default: http://localhost:11434.
    pub fn from_url(url: &str) -> Result<Self, EmbedError> {
        let inner = Ollama::try_new(url).map_err(EmbedError::ParseUrl)?;
        Ok(Self {
            inner,
            model: DEFAULT_EMBED_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the embedding model (e.g. `nomic-embed-text`, `all-minilm`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, input: EmbeddingsInput) -> Result<Vec<Vec<f32>>, EmbedError> {
        let req = GenerateEmbeddingsRequest::new(self.model.clone(), input);
        let res = tokio::time::timeout(self.timeout, self.inner.generate_embeddings(req))
            .await
            .map_err(|_| EmbedError::Timeout(self.timeout))?
            .map_err(EmbedError::Request)?;
        Ok(res.embeddings)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let out = self
            .request(EmbeddingsInput::Single(text.to_string()))
            .await?;
        Ok(out.into_iter().next().unwrap_or_default())
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(EmbeddingsInput::Multiple(texts.to_vec())).await
    }
}

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("invalid Ollama URL: {0}")]
    ParseUrl(#[from] url::ParseError),
    #[error("embedding request failed: {0}")]
    Request(#[from] ollama_rs::error::OllamaError),
    #[error("embedding call exceeded {0:?}")]
    Timeout(Duration),
}
