//! # tendex
//!
//! Facade crate for the tendex document indexing pipeline. Pull this crate
//! into your binary to turn a source document into a persistent vector index
//! and run similarity searches over it, with embedding providers and document
//! loaders plugged in behind traits.
//!
//! ## What's inside?
//!
//! - [`EmbeddingModel`]: the provider seam. Implement it once and every
//!   pipeline component works with your embedder.
//! - [`DocumentIndex`] (feature `index`, default): load-or-build indexing
//!   with deterministic chunking, cosine search and atomic persistence.
//! - `PdfLoader` (feature `pdf`): per-page PDF text extraction.
//! - `Ollama` (feature `ollama`): embeddings from a local Ollama server.
//! - `Comparator` (feature `compare`): classify requirements against an
//!   indexed capability catalog.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tendex::{DocumentIndex, EnsureOutcome};
//! # async fn demo(embedder: impl tendex::EmbeddingModel + Send + Sync + 'static) -> tendex::Result<()> {
//! let index = DocumentIndex::builder(embedder)
//!     .index_path("./tender.redb")
//!     .top_k(3)
//!     .build()?;
//!
//! // First run embeds and persists; later runs load the finished index.
//! if let EnsureOutcome::Built { chunks } = index.ensure("./tender.txt").await? {
//!     println!("indexed {chunks} chunks");
//! }
//!
//! for hit in index.search("contract deadline").await? {
//!     println!("{:.3} {}", hit.score, hit.chunk.id);
//! }
//! # Ok(())
//! # }
//! ```

pub use tendex_core::*;

#[cfg(feature = "index")]
pub use tendex_index::{
    BuildProgress, BuildStage, Chunk, Chunker, CosineIndex, Document, DocumentIndex,
    DocumentLoader, EnsureOutcome, IndexConfig, IndexEntry, IndexError, IndexStore, Metadata,
    Persistence, SearchResult, SlidingWindowChunker, VectorIndex,
};

#[cfg(feature = "pdf")]
pub use tendex_pdf::PdfLoader;

#[cfg(feature = "ollama")]
pub use tendex_ollama::Ollama;

#[cfg(feature = "compare")]
pub use tendex_compare::{Comparator, ComparisonRow, MatchLevel, Requirement, Thresholds};
