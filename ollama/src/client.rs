use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::error::OllamaError;
use crate::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, ENV_BASE_URL};

/// Connection and model settings for an [`Ollama`] client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server address, without trailing slash.
    pub base_url: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Vector dimension the model produces.
    pub embedding_dimensions: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimensions: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    pub(crate) fn request_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Client for an Ollama server.
#[derive(Debug, Clone)]
pub struct Ollama {
    config: Arc<Config>,
    http: reqwest::Client,
}

impl Ollama {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    /// Returns [`OllamaError::Http`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, OllamaError> {
        Self::with_config(Config::default())
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    /// Returns [`OllamaError::Http`] if the HTTP client cannot be built.
    pub fn with_config(mut config: Config) -> Result<Self, OllamaError> {
        config.base_url = normalize_base_url(&config.base_url);
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Creates a client, reading the server address from the environment.
    ///
    /// `OLLAMA_URL` is consulted first, then `OLLAMA_BASE_URL`; if neither is
    /// set the default local address is used.
    ///
    /// # Errors
    /// Returns [`OllamaError::Http`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, OllamaError> {
        let mut config = Config::default();
        if let Some(url) = ENV_BASE_URL
            .iter()
            .find_map(|var| env::var(var).ok())
            .filter(|url| !url.trim().is_empty())
        {
            config.base_url = url;
        }
        Self::with_config(config)
    }

    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> OllamaBuilder {
        OllamaBuilder::default()
    }

    pub(crate) fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Builder for an [`Ollama`] client.
#[derive(Debug, Default)]
pub struct OllamaBuilder {
    config: Config,
}

impl OllamaBuilder {
    /// Sets the server address.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the embedding model and its vector dimension.
    #[must_use]
    pub fn embedding_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.config.embedding_model = model.into();
        self.config.embedding_dimensions = dimensions;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    /// Returns [`OllamaError::Http`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<Ollama, OllamaError> {
        Ollama::with_config(self.config)
    }
}
