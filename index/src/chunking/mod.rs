//! Text chunking strategies.
//!
//! This module provides the [`Chunker`] trait and implementations for
//! splitting documents into smaller, embeddable chunks.

mod sentence;
mod sliding;

pub use sentence::SentenceChunker;
pub use sliding::SlidingWindowChunker;

use crate::error::Result;
use crate::types::{Chunk, Document};

/// Trait for text chunking strategies.
///
/// Chunkers split a document into spans that are embedded and searched
/// individually:
///
/// - [`SlidingWindowChunker`]: fixed-stride character windows with exact
///   overlap, the default for reproducible index builds
/// - [`SentenceChunker`]: groups whole sentences, trading exact sizes for
///   coherent spans
pub trait Chunker: Send + Sync {
    /// Splits a document into chunks.
    ///
    /// Chunk IDs derive from the document ID and `source_order` numbers the
    /// chunks within this document, starting at zero.
    fn chunk(&self, doc: &Document) -> Result<Vec<Chunk>>;

    /// Returns the name of this chunking strategy.
    fn name(&self) -> &'static str;
}
