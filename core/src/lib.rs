//! # tendex-core
//!
//! Provider-neutral trait surface for the tendex workspace. The pipeline crates
//! depend on these abstractions rather than on a concrete embedding backend, so
//! the backend can be swapped for a local model, a remote API, or a test stub
//! without touching the indexing code.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  tendex-index   │───▶│   tendex-core    │◀───│   Providers     │
//! │                 │    │   (this crate)   │    │                 │
//! │ - chunking      │    │                  │    │ - ollama        │
//! │ - vector index  │    │ - EmbeddingModel │    │ - test mocks    │
//! │ - persistence   │    │ - Result         │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```

pub mod embedding;

pub use embedding::EmbeddingModel;

/// Type alias for [`anyhow::Result<T>`](anyhow::Result) used across the workspace.
pub type Result<T = ()> = anyhow::Result<T>;

pub use anyhow::Error;
