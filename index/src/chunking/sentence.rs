//! Sentence-grouping chunking.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{IndexError, Result};
use crate::types::{Chunk, Document};

use super::Chunker;

/// Chunks text by grouping whole sentences.
///
/// Sentences are accumulated until adding another would exceed the maximum
/// chunk size; the last `carry_over` sentences of each chunk are repeated at
/// the start of the next one so context survives the cut. Chunk sizes are
/// therefore approximate, unlike [`super::SlidingWindowChunker`].
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    /// Target maximum chunk length in characters.
    max_chunk_size: usize,
    /// Number of trailing sentences repeated in the next chunk.
    carry_over: usize,
}

impl SentenceChunker {
    /// Creates a new sentence chunker with no carry-over.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] if `max_chunk_size` is zero.
    pub fn new(max_chunk_size: usize) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(IndexError::InvalidParameter(
                "max_chunk_size must be greater than zero".into(),
            ));
        }
        Ok(Self {
            max_chunk_size,
            carry_over: 0,
        })
    }

    /// Sets how many trailing sentences each chunk shares with the next.
    #[must_use]
    pub const fn with_carry_over(mut self, sentences: usize) -> Self {
        self.carry_over = sentences;
        self
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, doc: &Document) -> Result<Vec<Chunk>> {
        let text = doc.text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        if text.chars().count() <= self.max_chunk_size {
            return Ok(vec![Chunk::with_metadata(
                format!("{}#chunk_0", doc.id),
                text,
                &doc.id,
                0,
                doc.metadata.clone(),
            )]);
        }

        let sentences: Vec<&str> = text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;
        let mut order = 0usize;

        for sentence in sentences {
            let sentence_len = sentence.chars().count();
            if !current.is_empty() && current_len + sentence_len + 1 > self.max_chunk_size {
                let joined = current.join(" ");
                let mut metadata = doc.metadata.clone();
                metadata.insert("sentences".into(), current.len().to_string());
                chunks.push(Chunk::with_metadata(
                    format!("{}#chunk_{order}", doc.id),
                    joined,
                    &doc.id,
                    order,
                    metadata,
                ));
                order += 1;

                let keep = self.carry_over.min(current.len());
                current.drain(..current.len() - keep);
                current_len = current
                    .iter()
                    .map(|s| s.chars().count() + 1)
                    .sum::<usize>()
                    .saturating_sub(1);
            }

            if !current.is_empty() {
                current_len += 1;
            }
            current.push(sentence);
            current_len += sentence_len;
        }

        if !current.is_empty() {
            let mut metadata = doc.metadata.clone();
            metadata.insert("sentences".into(), current.len().to_string());
            chunks.push(Chunk::with_metadata(
                format!("{}#chunk_{order}", doc.id),
                current.join(" "),
                &doc.id,
                order,
                metadata,
            ));
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}
