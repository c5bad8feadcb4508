use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tendex_core::{EmbeddingModel, Result as CoreResult};

use crate::client::{Config, Ollama};
use crate::error::OllamaError;

impl EmbeddingModel for Ollama {
    fn dim(&self) -> usize {
        self.config().embedding_dimensions
    }

    fn embed(&self, text: &str) -> impl Future<Output = CoreResult<Vec<f32>>> + Send {
        let cfg = self.config();
        let http = self.http().clone();
        let prompt = text.to_owned();
        async move {
            let vector = embed_once(&http, &cfg, &prompt).await?;
            Ok(vector)
        }
    }
}

async fn embed_once(
    http: &reqwest::Client,
    cfg: &Arc<Config>,
    prompt: &str,
) -> Result<Vec<f32>, OllamaError> {
    let request = EmbeddingRequest {
        model: &cfg.embedding_model,
        prompt,
    };

    tracing::debug!(model = %cfg.embedding_model, chars = prompt.len(), "embedding request");
    let response = http
        .post(cfg.request_url("/api/embeddings"))
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .map_or_else(|_| status.to_string(), |body| body.error);
        return Err(OllamaError::Api(message));
    }

    let body: EmbeddingResponse = response.json().await?;
    if body.embedding.len() != cfg.embedding_dimensions {
        return Err(OllamaError::Dimension {
            expected: cfg.embedding_dimensions,
            actual: body.embedding.len(),
        });
    }
    Ok(body.embedding)
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}
