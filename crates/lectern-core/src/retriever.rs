//! Retrieval pipeline: scan → chunk → embed → store at ingest time;
//! embed → rank → assemble at query time.
//!
//! The embedder and the store are injected at construction, so front ends
//! and tests decide the backends; nothing in here is process-global.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::chunks::{chunk_documents, ChunkPolicy};
use crate::config::Config;
use crate::context::assemble;
use crate::corpus::{scan_corpus, ScanError};
use crate::embedder::{EmbedError, Embedder, OllamaEmbedder};
use crate::rank::rank;
use crate::sqlite::SqliteStore;
use crate::store::{MemoryStore, StorageBackend, StoreError, StoredPassage, VectorStore};

/// Summary of one ingest run.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub documents: usize,
    pub passages: usize,
}

/// The retrieval subsystem. Owns an embedder and a vector store; exposes
/// `ingest` to (re)build the store and `retrieve` for queries.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Box<dyn VectorStore>,
    chunk_policy: ChunkPolicy,
    max_context_chars: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Box<dyn VectorStore>,
        chunk_policy: ChunkPolicy,
        max_context_chars: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            chunk_policy,
            max_context_chars,
        }
    }

    /// Build a retriever from persisted config: Ollama embedder plus the
    /// configured store backend.
    pub fn from_config(config: &Config) -> Result<Self, RetrieveError> {
        let embedder = OllamaEmbedder::from_url(&config.ollama_url)?
            .with_model(config.embed_model.clone())
            .with_timeout(std::time::Duration::from_secs(config.embed_timeout_secs));
        let store: Box<dyn VectorStore> = match config.storage {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let path = config
                    .resolved_db_path()
                    .ok_or(RetrieveError::NoStorePath)?;
                Box::new(SqliteStore::open(&path)?)
            }
        };
        Ok(Self::new(
            Arc::new(embedder),
            store,
            config.chunk_policy,
            config.max_context_chars,
        ))
    }

    /// Scan `root`, chunk every document, embed all passages, and replace the
    /// store contents. Undecodable files are skipped inside the scan; an
    /// embedding failure aborts the whole ingest and leaves the previous
    /// store intact.
    pub async fn ingest(&mut self, root: &Path) -> Result<IngestReport, RetrieveError> {
        let docs = scan_corpus(root)?;
        let passages = chunk_documents(&docs, self.chunk_policy);
        info!(
            documents = docs.len(),
            passages = passages.len(),
            "ingesting corpus from {}",
            root.display()
        );
        if passages.is_empty() {
            self.store.put_all(Vec::new())?;
            return Ok(IngestReport {
                documents: docs.len(),
                passages: 0,
            });
        }

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = self.embedder.embed_many(&texts).await?;
        let records: Vec<StoredPassage> = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| StoredPassage { passage, embedding })
            .collect();
        let count = records.len();
        self.store.put_all(records)?;
        Ok(IngestReport {
            documents: docs.len(),
            passages: count,
        })
    }

    /// The top-k passage texts for `query`, best first. An empty store is not
    /// an error: "no relevant context" is a valid answer, so it returns an
    /// empty Vec.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, RetrieveError> {
        let started = Instant::now();
        let records = self.store.get_all()?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed(query).await?;
        let live_dim = query_vec.len();
        for r in &records {
            if r.embedding.len() != live_dim {
                return Err(RetrieveError::DimensionMismatch {
                    stored: r.embedding.len(),
                    live: live_dim,
                });
            }
        }

        let candidates: Vec<Vec<f32>> = records.iter().map(|r| r.embedding.clone()).collect();
        let ranked = rank(&query_vec, &candidates, k);
        debug!(
            candidates = records.len(),
            returned = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranked query"
        );
        Ok(ranked
            .into_iter()
            .map(|(i, _)| records[i].passage.text.clone())
            .collect())
    }

    /// Top-k passages joined into one bounded context block (see
    /// [`crate::context::assemble`] for the truncation policy).
    pub async fn retrieve_context(&self, query: &str, k: usize) -> Result<String, RetrieveError> {
        let passages = self.retrieve(query, k).await?;
        Ok(assemble(&passages, self.max_context_chars))
    }

    /// Number of passages currently stored.
    pub fn stored_passages(&self) -> Result<usize, RetrieveError> {
        Ok(self.store.len()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("corpus scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),
    #[error("store access failed: {0}")]
    Store(#[from] StoreError),
    #[error("stored embeddings have dimension {stored} but the embedding model produces {live}; re-ingest the corpus with the current model")]
    DimensionMismatch { stored: usize, live: usize },
    #[error("could not determine a path for the corpus database")]
    NoStorePath,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use async_trait::async_trait;

    use super::*;
    use crate::chunks::Passage;

    /// Deterministic embedder: one axis per topic keyword, counted per text.
    /// Good enough to make "what is variance" land on the variance passage.
    struct KeywordEmbedder;

    fn axis_count(text: &str, words: &[&str]) -> f32 {
        text.split_whitespace()
            .filter(|w| {
                let w = w
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                words.contains(&w.as_str())
            })
            .count() as f32
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            Ok(vec![
                axis_count(text, &["mean", "average"]),
                axis_count(text, &["variance", "spread"]),
                axis_count(text, &["median"]),
            ])
        }

        async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }
    }

    fn retriever_with_memory_store() -> Retriever {
        Retriever::new(
            Arc::new(KeywordEmbedder),
            Box::new(MemoryStore::new()),
            ChunkPolicy::Paragraphs,
            2000,
        )
    }

    async fn ingest_two_passages(r: &mut Retriever) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("stats.txt"),
            "mean is the average\n\nvariance measures spread",
        )
        .unwrap();
        let report = r.ingest(dir.path()).await.unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.passages, 2);
    }

    #[tokio::test]
    async fn variance_query_finds_variance_passage() {
        let mut r = retriever_with_memory_store();
        ingest_two_passages(&mut r).await;

        let results = r.retrieve("what is variance", 1).await.unwrap();
        assert_eq!(results, vec!["variance measures spread".to_string()]);
    }

    #[tokio::test]
    async fn empty_store_returns_empty_not_error() {
        let r = retriever_with_memory_store();
        let results = r.retrieve("anything at all", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn k_zero_returns_empty_on_populated_store() {
        let mut r = retriever_with_memory_store();
        ingest_two_passages(&mut r).await;
        assert!(r.retrieve("variance", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn k_beyond_corpus_returns_everything_ranked() {
        let mut r = retriever_with_memory_store();
        ingest_two_passages(&mut r).await;

        let results = r.retrieve("what is variance", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "variance measures spread");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_fatal_for_the_query() {
        let mut store = MemoryStore::new();
        store
            .put_all(vec![StoredPassage {
                passage: Passage {
                    text: "stale two-dim record".to_string(),
                    source_id: None,
                    sequence_index: 0,
                },
                embedding: vec![1.0, 0.0],
            }])
            .unwrap();
        let r = Retriever::new(
            Arc::new(KeywordEmbedder),
            Box::new(store),
            ChunkPolicy::Paragraphs,
            2000,
        );

        let err = r.retrieve("variance", 1).await.unwrap_err();
        assert!(matches!(
            err,
            RetrieveError::DimensionMismatch { stored: 2, live: 3 }
        ));
    }

    #[tokio::test]
    async fn re_ingest_replaces_previous_corpus() {
        let mut r = retriever_with_memory_store();
        ingest_two_passages(&mut r).await;
        ingest_two_passages(&mut r).await;
        assert_eq!(r.stored_passages().unwrap(), 2);
    }

    #[tokio::test]
    async fn context_is_bounded_and_keeps_top_passage() {
        let mut r = Retriever::new(
            Arc::new(KeywordEmbedder),
            Box::new(MemoryStore::new()),
            ChunkPolicy::Paragraphs,
            30,
        );
        ingest_two_passages(&mut r).await;

        let ctx = r.retrieve_context("what is variance", 2).await.unwrap();
        assert!(ctx.len() <= 30);
        assert!(ctx.contains("variance measures spread"));
    }

    #[tokio::test]
    async fn sqlite_backend_round_trips_through_ingest() {
        let mut r = Retriever::new(
            Arc::new(KeywordEmbedder),
            Box::new(SqliteStore::open_in_memory().unwrap()),
            ChunkPolicy::Paragraphs,
            2000,
        );
        ingest_two_passages(&mut r).await;

        let results = r.retrieve("what is the mean", 1).await.unwrap();
        assert_eq!(results, vec!["mean is the average".to_string()]);
    }
}
