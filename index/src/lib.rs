//! Document indexing and similarity search.
//!
//! This crate turns one source document into a persistent vector index and
//! answers similarity queries against it. The pipeline is deterministic end to
//! end: fixed-stride chunking, exact cosine scoring and a stable tie-break on
//! chunk position, so the same document and query always produce the same
//! results.
//!
//! The high-level entry point is [`DocumentIndex`]:
//!
//! ```no_run
//! use tendex_index::{DocumentIndex, EnsureOutcome};
//! # use tendex_core::EmbeddingModel;
//! # async fn run(embedder: impl EmbeddingModel + Send + Sync + 'static) -> tendex_index::Result<()> {
//! let index = DocumentIndex::builder(embedder)
//!     .index_path("./tender.redb")
//!     .build()?;
//!
//! // Embeds at most once per persist location.
//! match index.ensure("./tender.txt").await? {
//!     EnsureOutcome::Built { chunks } => println!("built {chunks} chunks"),
//!     EnsureOutcome::Loaded { chunks } => println!("reused {chunks} chunks"),
//! }
//!
//! for hit in index.search("delivery deadline").await? {
//!     println!("{:.3}  {}", hit.score, hit.chunk.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every stage sits behind a trait ([`DocumentLoader`], [`Cleaner`],
//! [`Chunker`], [`VectorIndex`], [`Persistence`]) so formats and backends can
//! be swapped without touching the pipeline.

pub mod chunking;
pub mod cleaning;
mod config;
mod ensure;
mod error;
pub mod index;
pub mod loader;
pub mod persistence;
mod progress;
mod store;
mod types;

pub use chunking::{Chunker, SentenceChunker, SlidingWindowChunker};
pub use cleaning::{BasicCleaner, Cleaner, NoopCleaner};
pub use config::{IndexConfig, IndexConfigBuilder};
pub use ensure::{DocumentIndex, DocumentIndexBuilder, EnsureOutcome};
pub use error::{IndexError, Result};
pub use index::{CosineIndex, VectorIndex};
pub use loader::{DocumentLoader, PlainTextLoader, TextUnit};
pub use persistence::{IndexManifest, Persistence, RedbPersistence, SnapshotPersistence};
pub use progress::{BuildProgress, BuildStage};
pub use store::IndexStore;
pub use types::{Chunk, Document, IndexEntry, Metadata, SearchResult};
