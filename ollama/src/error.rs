use thiserror::Error;

/// Errors that can arise when calling the Ollama API.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Transport-level failures: connection refused, timeout, bad TLS.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error payload.
    #[error("ollama api error: {0}")]
    Api(String),

    /// The returned vector does not have the configured dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension {
        /// Dimension the provider was configured with.
        expected: usize,
        /// Dimension of the vector the server returned.
        actual: usize,
    },
}
