//! Text embedding abstractions.
//!
//! An embedding model maps text to a fixed-dimension numeric vector whose
//! geometry reflects semantic similarity. The [`EmbeddingModel`] trait is the
//! seam between the indexing pipeline and whatever backend computes those
//! vectors.
//!
//! Implementations must be internally consistent: vectors produced at index
//! build time are only comparable to query vectors from the *same* model and
//! version. The pipeline records the dimension alongside persisted indexes, but
//! full model identity is a documented caller responsibility.

use core::future::Future;

/// A dense embedding vector of 32-bit floats.
pub type Embedding = Vec<f32>;

/// Converts text to vector representations.
///
/// # Implementation requirements
///
/// - [`embed`](EmbeddingModel::embed) must return vectors whose length equals
///   [`dim`](EmbeddingModel::dim).
/// - Failures (network, malformed output) must surface as errors, never as
///   zeroed or truncated vectors.
///
/// # Example
///
/// ```rust
/// use tendex_core::EmbeddingModel;
///
/// struct ByteBucketEmbedder;
///
/// impl EmbeddingModel for ByteBucketEmbedder {
///     fn dim(&self) -> usize {
///         4
///     }
///
///     async fn embed(&self, text: &str) -> tendex_core::Result<Vec<f32>> {
///         let mut vector = vec![0.0; self.dim()];
///         for (idx, byte) in text.bytes().enumerate() {
///             vector[idx % 4] += f32::from(byte);
///         }
///         Ok(vector)
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let model = ByteBucketEmbedder;
/// let vector = model.embed("tender requirements").await.unwrap();
/// assert_eq!(vector.len(), model.dim());
/// # });
/// ```
pub trait EmbeddingModel: Send + Sync {
    /// Returns the embedding vector dimension.
    fn dim(&self) -> usize;

    /// Converts text to an embedding vector of length [`Self::dim`].
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Vec<f32>>> + Send;
}
