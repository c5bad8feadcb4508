//! Build (or reuse) an index over a text file and query it.
//!
//! Run with: `cargo run --example ensure_and_search -- <document> <query>`

use tendex_core::EmbeddingModel;
use tendex_index::{DocumentIndex, EnsureOutcome};

/// Hashing embedder so the example runs without any embedding server.
struct HashEmbedder;

impl EmbeddingModel for HashEmbedder {
    fn dim(&self) -> usize {
        64
    }

    async fn embed(&self, text: &str) -> tendex_core::Result<Vec<f32>> {
        let mut vector = vec![0.0f32; 64];
        for word in text.split_whitespace() {
            let mut hash = 0usize;
            for byte in word.bytes() {
                hash = hash.wrapping_mul(31).wrapping_add(byte as usize);
            }
            vector[hash % 64] += 1.0;
        }
        Ok(vector)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let document = args.next().unwrap_or_else(|| "README.md".into());
    let query = args.next().unwrap_or_else(|| "similarity search".into());

    let index = DocumentIndex::builder(HashEmbedder)
        .index_path("./ensure_and_search.redb")
        .sliding_chunking(400, 50)?
        .build()?;

    match index.ensure(&document).await? {
        EnsureOutcome::Built { chunks } => println!("built index with {chunks} chunks"),
        EnsureOutcome::Loaded { chunks } => println!("reused index with {chunks} chunks"),
    }

    for hit in index.search(&query).await? {
        println!("{:.3}  [{}]", hit.score, hit.chunk.id);
        let preview: String = hit.chunk.text.chars().take(120).collect();
        println!("      {preview}");
    }
    Ok(())
}
