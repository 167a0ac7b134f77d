//! Discovering and reading plain-text corpus documents from a user-chosen directory.
//!
//! Each `.txt` file is one ingestable unit. Files that are not valid UTF-8 are
//! skipped with a warning; the rest of the corpus still ingests.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// A corpus document: identifier (path relative to the corpus root where
/// possible) and its full text.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// Scans `root` for all `.txt` files and returns their contents.
/// Does not follow symlinks into directories (walkdir default).
///
/// A file whose bytes do not decode as UTF-8 is logged and skipped rather
/// than aborting the scan.
pub fn scan_corpus(root: &Path) -> Result<Vec<Document>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let mut docs = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| ScanError::Walk(e.to_string()))?;
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "txt") && path.is_file() {
            match read_document(root, path) {
                Ok(doc) => docs.push(doc),
                Err(e @ ScanError::Decode(_)) => {
                    warn!(path = %path.display(), "skipping corpus file: {e}");
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(docs)
}

fn read_document(root: &Path, path: &Path) -> Result<Document, ScanError> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::Read(path.to_path_buf(), e))?;
    let text =
        String::from_utf8(bytes).map_err(|_| ScanError::Decode(path.to_path_buf()))?;
    let id = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();
    Ok(Document { id, text })
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("walk error: {0}")]
    Walk(String),
    #[error("read error for {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("not valid UTF-8 text: {0}")]
    Decode(PathBuf),
}
