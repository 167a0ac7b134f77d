//! Persisted config (chunking, retrieval knobs, embedding model, storage
//! backend) in the app data directory. Every knob has a default so a missing
//! or partial file still yields a working setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;
use crate::chunks::ChunkPolicy;
use crate::context::DEFAULT_MAX_CONTEXT_CHARS;
use crate::embedder::{DEFAULT_BASE_URL, DEFAULT_EMBED_MODEL};
use crate::store::StorageBackend;

const CONFIG_FILENAME: &str = "config.toml";
const DB_FILENAME: &str = "corpus.sqlite";

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the corpus directory (chosen by the user).
    pub corpus_root: Option<String>,
    /// How documents are cut into passages.
    pub chunk_policy: ChunkPolicy,
    /// How many passages a query returns by default.
    pub top_k: usize,
    /// Character budget for the assembled context block.
    pub max_context_chars: usize,
    /// Embedding model name; must match between ingest and query.
    pub embed_model: String,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Per-request embedding timeout, in seconds.
    pub embed_timeout_secs: u64,
    /// Which vector store backend to use.
    pub storage: StorageBackend,
    /// SQLite database path; defaults to the app data directory.
    pub db_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_root: None,
            chunk_policy: ChunkPolicy::default(),
            top_k: DEFAULT_TOP_K,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            ollama_url: DEFAULT_BASE_URL.to_string(),
            embed_timeout_secs: 30,
            storage: StorageBackend::default(),
            db_path: None,
        }
    }
}

impl Config {
    /// Resolved SQLite path: explicit `db_path`, else the app data directory.
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        match &self.db_path {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => app_data::app_data_dir().map(|d| d.join(DB_FILENAME)),
        }
    }
}

/// Load config from the app data directory. Returns default config if missing
/// or invalid.
pub fn load_config() -> Config {
    let Some(data_dir) = app_data::app_data_dir() else {
        return Config::default();
    };
    let path = data_dir.join(CONFIG_FILENAME);
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    toml::from_str(&s).unwrap_or_default()
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let data_dir = app_data::app_data_dir().ok_or(ConfigError::NoDataDir)?;
    let path = data_dir.join(CONFIG_FILENAME);
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(&path, s).map_err(ConfigError::Write)
}

/// Set and persist the corpus root.
pub fn set_corpus_root(path: &Path) -> Result<(), ConfigError> {
    let path = path.canonicalize().map_err(ConfigError::Canonicalize)?;
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }
    let mut config = load_config();
    config.corpus_root = Some(path.to_string_lossy().into_owned());
    save_config(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
    #[error("failed to resolve path: {0}")]
    Canonicalize(std::io::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}
