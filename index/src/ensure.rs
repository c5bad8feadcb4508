//! Load-or-build index orchestration.
//!
//! [`DocumentIndex`] ties the whole pipeline together: it reuses a completed
//! persisted build when one exists, and otherwise loads the document, cleans
//! and chunks it, embeds every chunk exactly once, and commits the result
//! before reporting success.

use std::path::Path;

use tendex_core::EmbeddingModel;

use crate::chunking::{Chunker, SlidingWindowChunker};
use crate::cleaning::{BasicCleaner, Cleaner};
use crate::config::{IndexConfig, IndexConfigBuilder};
use crate::error::Result;
use crate::index::VectorIndex;
use crate::loader::{DocumentLoader, PlainTextLoader};
use crate::persistence::{Persistence, RedbPersistence};
use crate::progress::{BuildProgress, BuildStage};
use crate::store::IndexStore;
use crate::types::{Chunk, Document, SearchResult};

/// Result of [`DocumentIndex::ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The index was built from the source document and persisted.
    Built {
        /// Number of chunks embedded and stored.
        chunks: usize,
    },
    /// A completed persisted build was loaded without any embedding calls.
    Loaded {
        /// Number of chunks restored from persistence.
        chunks: usize,
    },
}

impl EnsureOutcome {
    /// Returns the number of chunks in the index either way.
    #[must_use]
    pub const fn chunks(&self) -> usize {
        match self {
            Self::Built { chunks } | Self::Loaded { chunks } => *chunks,
        }
    }
}

/// High-level document index with load-or-build semantics.
pub struct DocumentIndex<
    M: EmbeddingModel,
    C: Chunker = SlidingWindowChunker,
    L: Cleaner = BasicCleaner,
    P: Persistence = RedbPersistence,
    D: DocumentLoader = PlainTextLoader,
> {
    store: IndexStore<M>,
    chunker: C,
    cleaner: L,
    persistence: P,
    loader: D,
    config: IndexConfig,
}

impl<M: EmbeddingModel, C: Chunker, L: Cleaner, P: Persistence, D: DocumentLoader> std::fmt::Debug
    for DocumentIndex<M, C, L, P, D>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("chunker", &self.chunker.name())
            .field("cleaner", &self.cleaner.name())
            .field("loader", &self.loader.name())
            .field("persistence_path", &self.persistence.path())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M> DocumentIndex<M>
where
    M: EmbeddingModel + Send + Sync + 'static,
{
    /// Creates an index with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default persist location cannot be opened.
    pub fn new(embedder: M) -> Result<Self> {
        Self::builder(embedder).build()
    }

    /// Creates a builder for custom configuration.
    pub fn builder(embedder: M) -> DocumentIndexBuilder<M> {
        DocumentIndexBuilder::new(embedder)
    }
}

impl<M, C, L, P, D> DocumentIndex<M, C, L, P, D>
where
    M: EmbeddingModel + Send + Sync + 'static,
    C: Chunker,
    L: Cleaner,
    P: Persistence,
    D: DocumentLoader,
{
    /// Makes the index for `document` available, embedding at most once.
    ///
    /// If a completed build exists at the persist location it is loaded and
    /// no embedding calls are made. Otherwise the document is read, chunked,
    /// embedded and persisted; on any failure nothing is persisted and a
    /// previously completed build at the same location is left untouched.
    pub async fn ensure(&self, document: impl AsRef<Path>) -> Result<EnsureOutcome> {
        self.ensure_with_progress(document, |_| {}).await
    }

    /// Same as [`ensure`](Self::ensure), reporting build progress.
    pub async fn ensure_with_progress<F>(
        &self,
        document: impl AsRef<Path>,
        mut on_progress: F,
    ) -> Result<EnsureOutcome>
    where
        F: FnMut(BuildProgress),
    {
        let document = document.as_ref();

        if self.persistence.is_complete() {
            let entries = self.persistence.load()?;
            let count = entries.len();
            self.store.index().load(entries)?;
            tracing::info!(
                path = %self.persistence.path().display(),
                chunks = count,
                "reusing completed index"
            );
            on_progress(BuildProgress::new(0, count, document, BuildStage::Reused));
            return Ok(EnsureOutcome::Loaded { chunks: count });
        }

        // A prior failed build may have left partial entries in memory;
        // start every build from an empty index so a retry cannot persist
        // duplicates.
        self.store.index().load(Vec::new())?;

        on_progress(BuildProgress::new(0, 0, document, BuildStage::Loading));
        let units = self.loader.load(document)?;

        let doc_id = document
            .file_stem()
            .map_or_else(|| document.display().to_string(), |s| s.to_string_lossy().into_owned());

        on_progress(BuildProgress::new(0, 0, document, BuildStage::Chunking));
        let chunks = self.chunk_units(&doc_id, &units)?;
        let total = chunks.len();
        tracing::debug!(doc = %doc_id, units = units.len(), chunks = total, "document chunked");

        for (done, chunk) in chunks.into_iter().enumerate() {
            on_progress(BuildProgress::new(
                done,
                total,
                document,
                BuildStage::Embedding,
            ));
            self.store.embed_and_insert(chunk).await?;
        }

        on_progress(BuildProgress::new(
            total,
            total,
            document,
            BuildStage::Persisting,
        ));
        let entries = self.store.index().entries();
        self.persistence
            .save(&entries, self.store.index().dimension())?;

        tracing::info!(
            path = %self.persistence.path().display(),
            chunks = total,
            "index built and persisted"
        );
        on_progress(BuildProgress::new(total, total, document, BuildStage::Done));
        Ok(EnsureOutcome::Built { chunks: total })
    }

    /// Cleans and chunks every unit, renumbering chunks across the document.
    ///
    /// `source_order` becomes the global chunk position so search tie-breaks
    /// stay deterministic even for multi-unit documents.
    fn chunk_units(&self, doc_id: &str, units: &[crate::loader::TextUnit]) -> Result<Vec<Chunk>> {
        let mut out = Vec::new();
        for unit in units {
            let text = self.cleaner.clean(&unit.text);
            if text.is_empty() {
                continue;
            }

            let mut metadata = crate::types::Metadata::new();
            metadata.insert("unit".into(), unit.order.to_string());
            let doc = Document::with_metadata(doc_id, text, metadata);

            for mut chunk in self.chunker.chunk(&doc)? {
                let order = out.len();
                chunk.source_order = order;
                chunk.id = format!("{doc_id}#chunk_{order}");
                out.push(chunk);
            }
        }
        Ok(out)
    }

    /// Searches with the configured default result count.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.store.search(query).await
    }

    /// Searches for the `top_k` most similar chunks.
    pub async fn search_with_k(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        self.store.search_with_k(query, top_k).await
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &IndexStore<M> {
        &self.store
    }

    /// Returns the number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }
}

/// Builder for a [`DocumentIndex`].
pub struct DocumentIndexBuilder<
    M: EmbeddingModel,
    C: Chunker = SlidingWindowChunker,
    L: Cleaner = BasicCleaner,
    P: Persistence = RedbPersistence,
    D: DocumentLoader = PlainTextLoader,
> {
    embedder: M,
    config_builder: IndexConfigBuilder,
    chunker: C,
    cleaner: L,
    persistence: Option<P>,
    loader: D,
}

impl<M: EmbeddingModel, C: Chunker, L: Cleaner, P: Persistence, D: DocumentLoader> std::fmt::Debug
    for DocumentIndexBuilder<M, C, L, P, D>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndexBuilder")
            .field("config_builder", &self.config_builder)
            .field("chunker", &self.chunker.name())
            .field("cleaner", &self.cleaner.name())
            .field("loader", &self.loader.name())
            .finish_non_exhaustive()
    }
}

impl<M> DocumentIndexBuilder<M>
where
    M: EmbeddingModel + Send + Sync + 'static,
{
    fn new(embedder: M) -> Self {
        Self {
            embedder,
            config_builder: IndexConfig::builder(),
            chunker: SlidingWindowChunker::default(),
            cleaner: BasicCleaner,
            persistence: None,
            loader: PlainTextLoader,
        }
    }
}

impl<M, C, L, D> DocumentIndexBuilder<M, C, L, RedbPersistence, D>
where
    M: EmbeddingModel + Send + Sync + 'static,
    C: Chunker,
    L: Cleaner,
    D: DocumentLoader,
{
    /// Validates the configuration and builds the index.
    ///
    /// # Errors
    /// Returns [`crate::IndexError::InvalidParameter`] for out-of-range
    /// configuration and [`crate::IndexError::PersistenceFailure`] if the
    /// persist location cannot be opened.
    pub fn build(self) -> Result<DocumentIndex<M, C, L, RedbPersistence, D>> {
        let config = self.config_builder.build()?;
        let persistence = match self.persistence {
            Some(p) => p,
            None => RedbPersistence::new(&config.index_path)?,
        };
        Ok(DocumentIndex {
            store: IndexStore::with_config(self.embedder, config.clone()),
            chunker: self.chunker,
            cleaner: self.cleaner,
            persistence,
            loader: self.loader,
            config,
        })
    }
}

impl<M, C, L, P, D> DocumentIndexBuilder<M, C, L, P, D>
where
    M: EmbeddingModel + Send + Sync + 'static,
    C: Chunker,
    L: Cleaner,
    P: Persistence,
    D: DocumentLoader,
{
    /// Sets the persist location for the built index.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config_builder = self.config_builder.index_path(path);
        self
    }

    /// Sets the minimum similarity score for search results.
    #[must_use]
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config_builder = self.config_builder.similarity_threshold(threshold);
        self
    }

    /// Sets the default number of search results.
    #[must_use]
    pub fn top_k(mut self, k: usize) -> Self {
        self.config_builder = self.config_builder.default_top_k(k);
        self
    }

    /// Uses sliding-window chunking with custom parameters.
    ///
    /// # Errors
    /// Returns [`crate::IndexError::InvalidParameter`] if `overlap` is not
    /// smaller than `chunk_size`.
    pub fn sliding_chunking(
        self,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<DocumentIndexBuilder<M, SlidingWindowChunker, L, P, D>> {
        let chunker = SlidingWindowChunker::new(chunk_size, overlap)?;
        let mut builder = self.chunker(chunker);
        builder.config_builder = builder
            .config_builder
            .chunk_size(chunk_size)
            .chunk_overlap(overlap);
        Ok(builder)
    }

    /// Uses a custom chunker.
    #[must_use]
    pub fn chunker<C2: Chunker>(self, chunker: C2) -> DocumentIndexBuilder<M, C2, L, P, D> {
        DocumentIndexBuilder {
            embedder: self.embedder,
            config_builder: self.config_builder,
            chunker,
            cleaner: self.cleaner,
            persistence: self.persistence,
            loader: self.loader,
        }
    }

    /// Uses a custom cleaner.
    #[must_use]
    pub fn cleaner<L2: Cleaner>(self, cleaner: L2) -> DocumentIndexBuilder<M, C, L2, P, D> {
        DocumentIndexBuilder {
            embedder: self.embedder,
            config_builder: self.config_builder,
            chunker: self.chunker,
            cleaner,
            persistence: self.persistence,
            loader: self.loader,
        }
    }

    /// Uses a custom document loader.
    #[must_use]
    pub fn loader<D2: DocumentLoader>(self, loader: D2) -> DocumentIndexBuilder<M, C, L, P, D2> {
        DocumentIndexBuilder {
            embedder: self.embedder,
            config_builder: self.config_builder,
            chunker: self.chunker,
            cleaner: self.cleaner,
            persistence: self.persistence,
            loader,
        }
    }

    /// Uses a custom persistence backend.
    ///
    /// The backend's own path takes precedence over
    /// [`index_path`](Self::index_path).
    #[must_use]
    pub fn persistence<P2: Persistence>(
        self,
        persistence: P2,
    ) -> DocumentIndexBuilder<M, C, L, P2, D> {
        DocumentIndexBuilder {
            embedder: self.embedder,
            config_builder: self.config_builder,
            chunker: self.chunker,
            cleaner: self.cleaner,
            persistence: Some(persistence),
            loader: self.loader,
        }
    }
}

impl<M, C, L, P, D> DocumentIndexBuilder<M, C, L, P, D>
where
    M: EmbeddingModel + Send + Sync + 'static,
    C: Chunker,
    L: Cleaner,
    P: Persistence,
    D: DocumentLoader,
{
    /// Builds the index with the supplied persistence backend.
    ///
    /// # Errors
    /// Returns [`crate::IndexError::InvalidParameter`] for out-of-range
    /// configuration.
    pub fn build_with_persistence(self) -> Result<DocumentIndex<M, C, L, P, D>> {
        let config = self.config_builder.build()?;
        let persistence = self.persistence.ok_or_else(|| {
            crate::IndexError::InvalidParameter(
                "a persistence backend must be supplied first".into(),
            )
        })?;
        Ok(DocumentIndex {
            store: IndexStore::with_config(self.embedder, config.clone()),
            chunker: self.chunker,
            cleaner: self.cleaner,
            persistence,
            loader: self.loader,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Clone)]
    struct CountingEmbedder {
        calls: Arc<AtomicUsize>,
        fail_on_call: Option<usize>,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail_on_call: Some(call),
            }
        }
    }

    impl EmbeddingModel for CountingEmbedder {
        fn dim(&self) -> usize {
            4
        }

        async fn embed(&self, text: &str) -> tendex_core::Result<Vec<f32>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                anyhow::bail!("embedding backend offline");
            }
            let mut vector = vec![0.0f32; 4];
            for (idx, byte) in text.bytes().enumerate() {
                vector[idx % 4] += f32::from(byte);
            }
            Ok(vector)
        }
    }

    fn write_doc(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn builds_then_reuses_without_reembedding() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let index_path = dir.path().join("index.redb");

        let embedder = CountingEmbedder::new();
        let calls = Arc::clone(&embedder.calls);
        let index = DocumentIndex::builder(embedder)
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();

        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Built { chunks: 4 });
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        // Fresh instance at the same location loads instead of building.
        drop(index);
        let embedder = CountingEmbedder::new();
        let calls = Arc::clone(&embedder.calls);
        let index = DocumentIndex::builder(embedder)
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();

        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Loaded { chunks: 4 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let results = index.search_with_k("cdef", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn failed_build_persists_nothing() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let index_path = dir.path().join("index.redb");

        let index = DocumentIndex::builder(CountingEmbedder::failing_on(3))
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();

        let err = index.ensure(&doc).await.unwrap_err();
        assert!(matches!(err, crate::IndexError::EmbeddingUnavailable(_)));

        // The interrupted build must not look complete; a healthy embedder
        // rebuilds from scratch.
        drop(index);
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();
        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Built { chunks: 4 });
    }

    #[tokio::test]
    async fn retry_after_failed_build_starts_clean() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let index_path = dir.path().join("index.redb");

        // Fails on the third chunk only, so the retry on the same
        // instance succeeds.
        let index = DocumentIndex::builder(CountingEmbedder::failing_on(3))
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();

        let err = index.ensure(&doc).await.unwrap_err();
        assert!(matches!(err, crate::IndexError::EmbeddingUnavailable(_)));

        // The partial entries from the failed attempt must not leak into
        // the retry.
        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Built { chunks: 4 });
        assert_eq!(index.len(), 4);

        // What was persisted must reload on a fresh instance.
        drop(index);
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(&index_path)
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();
        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Loaded { chunks: 4 });
    }

    #[tokio::test]
    async fn missing_document_is_unreadable() {
        let dir = tempdir().unwrap();
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(dir.path().join("index.redb"))
            .build()
            .unwrap();

        let err = index.ensure(dir.path().join("absent.txt")).await.unwrap_err();
        assert!(matches!(err, crate::IndexError::DocumentUnreadable { .. }));
    }

    #[tokio::test]
    async fn empty_document_yields_empty_index() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "empty.txt", "");
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(dir.path().join("index.redb"))
            .build()
            .unwrap();

        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Built { chunks: 0 });
        assert!(index.is_empty());
        assert!(index.search("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn progress_stages_in_order() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(dir.path().join("index.redb"))
            .sliding_chunking(4, 2)
            .unwrap()
            .build()
            .unwrap();

        let mut stages = Vec::new();
        index
            .ensure_with_progress(&doc, |p| stages.push(p.stage))
            .await
            .unwrap();

        assert_eq!(stages.first(), Some(&BuildStage::Loading));
        assert_eq!(stages.last(), Some(&BuildStage::Done));
        assert_eq!(
            stages
                .iter()
                .filter(|s| **s == BuildStage::Embedding)
                .count(),
            4
        );
        assert!(stages.contains(&BuildStage::Persisting));
        assert!(!stages.contains(&BuildStage::Reused));
    }

    #[tokio::test]
    async fn reuse_reports_reused_stage() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let index_path = dir.path().join("index.redb");

        DocumentIndex::builder(CountingEmbedder::new())
            .index_path(&index_path)
            .build()
            .unwrap()
            .ensure(&doc)
            .await
            .unwrap();

        let index = DocumentIndex::builder(CountingEmbedder::new())
            .index_path(&index_path)
            .build()
            .unwrap();
        let mut stages = Vec::new();
        index
            .ensure_with_progress(&doc, |p| stages.push(p.stage))
            .await
            .unwrap();
        assert_eq!(stages, vec![BuildStage::Reused]);
    }

    #[tokio::test]
    async fn snapshot_backend_via_builder() {
        let dir = tempdir().unwrap();
        let doc = write_doc(dir.path(), "tender.txt", "abcdefghij");
        let snapshot = crate::persistence::SnapshotPersistence::new(dir.path().join("index.json"));

        let index = DocumentIndex::builder(CountingEmbedder::new())
            .persistence(snapshot)
            .sliding_chunking(4, 2)
            .unwrap()
            .build_with_persistence()
            .unwrap();

        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Built { chunks: 4 });

        let snapshot = crate::persistence::SnapshotPersistence::new(dir.path().join("index.json"));
        let index = DocumentIndex::builder(CountingEmbedder::new())
            .persistence(snapshot)
            .build_with_persistence()
            .unwrap();
        let outcome = index.ensure(&doc).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::Loaded { chunks: 4 });
    }
}
