//! Vector store: persisted (passage, embedding) pairs.
//!
//! Backends implement [`VectorStore`]; ranking happens outside the store so
//! every backend shares one retrieval contract. Re-ingestion replaces the
//! whole store, never appends to it.

use serde::{Deserialize, Serialize};

use crate::chunks::Passage;

/// A passage with its embedding, as persisted by a store.
#[derive(Debug, Clone)]
pub struct StoredPassage {
    pub passage: Passage,
    pub embedding: Vec<f32>,
}

/// Which store backend to use, selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-lifetime only; discarded on exit.
    Memory,
    /// File-backed SQLite database (see [`crate::sqlite::SqliteStore`]).
    #[default]
    Sqlite,
}

/// A corpus store. Reads may happen concurrently; writes replace the full
/// contents atomically so readers never observe a half-written corpus.
pub trait VectorStore: Send + Sync {
    /// Replace the store contents with `records`. Atomic: on error the
    /// previous contents remain intact.
    fn put_all(&mut self, records: Vec<StoredPassage>) -> Result<(), StoreError>;

    /// Every stored record, in insertion order. Empty if nothing was ever
    /// written.
    fn get_all(&self) -> Result<Vec<StoredPassage>, StoreError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// In-memory store. No persistence; contents are dropped with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<StoredPassage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for MemoryStore {
    fn put_all(&mut self, records: Vec<StoredPassage>) -> Result<(), StoreError> {
        self.items = records;
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<StoredPassage>, StoreError> {
        Ok(self.items.clone())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.items.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored embedding blob has invalid length {0} (not a multiple of 4)")]
    CorruptEmbedding(usize),
}
