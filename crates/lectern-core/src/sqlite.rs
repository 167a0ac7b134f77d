//! SQLite-backed vector store. One row per passage; embeddings are stored as
//! little-endian f32 blobs, so the float round trip is exact.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection};

use crate::chunks::Passage;
use crate::store::{StoreError, StoredPassage, VectorStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS passages (
    id        INTEGER PRIMARY KEY,
    source    TEXT,
    seq       INTEGER NOT NULL,
    text      TEXT NOT NULL,
    embedding BLOB NOT NULL
)";

/// File-backed store. Rebuilds run as a single transaction (delete + insert),
/// so a concurrent reader sees either the old corpus or the new one, never a
/// partial write. The mutex serializes connection access across threads.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory SQLite database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VectorStore for SqliteStore {
    fn put_all(&mut self, records: Vec<StoredPassage>) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM passages", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO passages (source, seq, text, embedding) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for r in &records {
                stmt.execute(params![
                    r.passage.source_id,
                    r.passage.sequence_index as i64,
                    r.passage.text,
                    encode_embedding(&r.embedding),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<StoredPassage>, StoreError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT source, seq, text, embedding FROM passages ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let source_id: Option<String> = row.get(0)?;
            let seq: i64 = row.get(1)?;
            let text: String = row.get(2)?;
            let blob: Vec<u8> = row.get(3)?;
            Ok((source_id, seq, text, blob))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (source_id, seq, text, blob) = row?;
            records.push(StoredPassage {
                passage: Passage {
                    text,
                    source_id,
                    sequence_index: seq as usize,
                },
                embedding: decode_embedding(&blob)?,
            });
        }
        Ok(records)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM passages", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn encode_embedding(v: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(v.len() * 4);
    for x in v {
        blob.extend_from_slice(&x.to_le_bytes());
    }
    blob
}

fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>, StoreError> {
    if blob.len() % 4 != 0 {
        return Err(StoreError::CorruptEmbedding(blob.len()));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
