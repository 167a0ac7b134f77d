//! Retrieval backend for question answering over a lecture corpus,
//! independent of how the app is run (CLI or server).
//!
//! Pipeline: scan a corpus directory, chunk documents into passages, embed
//! them with Ollama, persist (passage, embedding) pairs in a vector store,
//! and rank by cosine similarity at query time. Answer generation sits
//! outside this crate; front ends consume [`Retriever::retrieve`] and
//! [`Retriever::retrieve_context`].

pub mod app_data;
pub mod chunks;
pub mod config;
pub mod context;
pub mod corpus;
pub mod embedder;
pub mod rank;
pub mod retriever;
pub mod sqlite;
pub mod store;

pub use app_data::app_data_dir;
pub use chunks::{chunk_document, chunk_documents, ChunkPolicy, Passage, DEFAULT_MAX_WORDS};
pub use config::{load_config, save_config, set_corpus_root, Config, ConfigError};
pub use context::{assemble, DEFAULT_MAX_CONTEXT_CHARS};
pub use corpus::{scan_corpus, Document, ScanError};
pub use embedder::{EmbedError, Embedder, OllamaEmbedder};
pub use rank::{cosine_similarity, rank};
pub use retriever::{IngestReport, RetrieveError, Retriever};
pub use sqlite::SqliteStore;
pub use store::{MemoryStore, StorageBackend, StoreError, StoredPassage, VectorStore};

/// Returns a short status string. Used to verify the backend is wired up.
pub fn status() -> &'static str {
    "lectern-core ready"
}
