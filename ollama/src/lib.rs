//! Ollama embedding provider.
//!
//! [`Ollama`] talks to a local or remote Ollama server and implements
//! [`EmbeddingModel`](tendex_core::EmbeddingModel) on top of its
//! `/api/embeddings` endpoint. One request embeds one text; failures surface
//! immediately without retries so callers decide whether to abort or rebuild.
//!
//! ```no_run
//! use tendex_ollama::Ollama;
//!
//! let embedder = Ollama::from_env()?;
//! # Ok::<(), tendex_ollama::OllamaError>(())
//! ```

mod client;
mod embedding;
mod error;

pub use client::{Config, Ollama, OllamaBuilder};
pub use error::OllamaError;

/// Default Ollama server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "snowflake-arctic-embed2";

/// Vector dimension produced by [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Environment variables consulted by [`Ollama::from_env`], in order.
pub const ENV_BASE_URL: [&str; 2] = ["OLLAMA_URL", "OLLAMA_BASE_URL"];
