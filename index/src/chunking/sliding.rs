//! Fixed-stride sliding-window chunking.

use crate::error::{IndexError, Result};
use crate::types::{Chunk, Document};

use super::Chunker;

/// Chunks text into fixed-stride character windows with exact overlap.
///
/// Chunk starts are laid out deterministically at `0, s, 2s, …` where
/// `s = chunk_size - overlap`; each chunk spans at most `chunk_size`
/// characters from its start. When the hard cut would fall mid-text, the cut
/// prefers a nearby line break, sentence end, or whitespace inside a bounded
/// tolerance window. The adjusted cut never moves before the next chunk's
/// start, so concatenating each chunk's leading `s` characters (plus the final
/// chunk) always reconstructs the input. The final chunk may be shorter than
/// `chunk_size`.
///
/// # Example
///
/// ```rust
/// use tendex_index::chunking::{Chunker, SlidingWindowChunker};
/// use tendex_index::Document;
///
/// let chunker = SlidingWindowChunker::new(4, 2).unwrap();
/// let doc = Document::new("doc1", "abcdefghij");
/// let chunks = chunker.chunk(&doc).unwrap();
/// let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, ["abcd", "cdef", "efgh", "ghij"]);
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindowChunker {
    /// Maximum chunk length in characters.
    chunk_size: usize,
    /// Characters shared between consecutive chunks.
    overlap: usize,
    /// How far before the hard cut a boundary may be preferred.
    boundary_tolerance: usize,
}

impl SlidingWindowChunker {
    /// Creates a new sliding-window chunker.
    ///
    /// The boundary tolerance defaults to a tenth of `chunk_size`.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] if `chunk_size` is zero or
    /// `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IndexError::InvalidParameter(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if overlap >= chunk_size {
            return Err(IndexError::InvalidParameter(format!(
                "chunk_overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
            boundary_tolerance: chunk_size / 10,
        })
    }

    /// Overrides the boundary preference window (0 disables it).
    #[must_use]
    pub const fn with_boundary_tolerance(mut self, tolerance: usize) -> Self {
        self.boundary_tolerance = tolerance;
        self
    }

    /// Creates a chunker sized for typical requirement documents
    /// (1200 characters, 100 overlap).
    #[must_use]
    pub const fn default_settings() -> Self {
        Self {
            chunk_size: 1200,
            overlap: 100,
            boundary_tolerance: 120,
        }
    }

    /// Returns the configured chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the configured overlap.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Picks the cut point for a chunk starting at `start` whose hard cut is
    /// `hard_end` (both char offsets, `hard_end` strictly inside the text).
    ///
    /// Boundary priority: line break, then sentence terminator followed by
    /// whitespace, then any whitespace. The window is clamped so the cut never
    /// lands before `start + stride`, keeping coverage gap-free.
    fn preferred_end(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let stride = self.chunk_size - self.overlap;
        let window_lo = hard_end
            .saturating_sub(self.boundary_tolerance)
            .max(start + stride);
        if window_lo >= hard_end {
            return hard_end;
        }

        for pos in (window_lo..hard_end).rev() {
            if chars[pos] == '\n' {
                return pos + 1;
            }
        }
        for pos in (window_lo..hard_end).rev() {
            if matches!(chars[pos], '.' | '!' | '?') && chars[pos + 1].is_whitespace() {
                return pos + 1;
            }
        }
        for pos in (window_lo..hard_end).rev() {
            if chars[pos].is_whitespace() {
                return pos + 1;
            }
        }
        hard_end
    }
}

impl Default for SlidingWindowChunker {
    fn default() -> Self {
        Self::default_settings()
    }
}

impl Chunker for SlidingWindowChunker {
    fn chunk(&self, doc: &Document) -> Result<Vec<Chunk>> {
        let chars: Vec<char> = doc.text.chars().collect();
        let total = chars.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        if total <= self.chunk_size {
            return Ok(vec![Chunk::with_metadata(
                format!("{}#chunk_0", doc.id),
                doc.text.clone(),
                &doc.id,
                0,
                doc.metadata.clone(),
            )]);
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::with_capacity(total.div_ceil(stride));
        let mut start = 0usize;
        let mut order = 0usize;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let end = if hard_end < total {
                self.preferred_end(&chars, start, hard_end)
            } else {
                hard_end
            };

            let text: String = chars[start..end].iter().collect();
            let mut metadata = doc.metadata.clone();
            metadata.insert("chunk_start".into(), start.to_string());
            metadata.insert("chunk_end".into(), end.to_string());
            chunks.push(Chunk::with_metadata(
                format!("{}#chunk_{order}", doc.id),
                text,
                &doc.id,
                order,
                metadata,
            ));
            order += 1;

            // Once a window reaches the end of the text, later windows would
            // only repeat its tail.
            if hard_end == total {
                break;
            }
            start += stride;
            if start >= total {
                break;
            }
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "sliding_window"
    }
}
