//! Where lectern stores its own data (config, the SQLite corpus store).
//!
//! The corpus itself stays in the directory the user points us at; only
//! derived state lives here.

use std::path::PathBuf;

/// Returns the directory where lectern stores config and the default corpus
/// database. On macOS: `~/Library/Application Support/Lectern/`.
/// Creates the directory if it doesn't exist; returns `None` if we can't
/// determine the path.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "Lectern", "Lectern")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_is_some() {
        assert!(app_data_dir().is_some());
    }
}
