//! Centralized initialization for directory commands.
//!
//! Every subcommand needs the same setup: a valid data root, the effective
//! configuration, a cache directory private to that data root, and a
//! [`Directory`] wired to the filesystem backend and file-backed local store.
//!
//! # Initialization Steps
//! 1. **Data root validation**: the `--data` directory must exist
//! 2. **Config loading**: explicit `--config` file, else the user config, else defaults
//! 3. **Cache location**: `<cache dir>/food-directory/<md5 of data root>/`
//! 4. **Directory assembly**: [`FsBackend`] for documents and URLs, [`FileStore`] for the snapshot

use crate::core::{
    config::DirectoryConfig,
    directory::Directory,
    dirs::get_data_cache_directory,
    error::{DirectoryError, Result},
    fs_backend::FsBackend,
    local::FileStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Initialized context shared by all subcommands
pub struct DirectoryCommandContext {
    pub directory: Directory,
    pub data_root: PathBuf,
    pub cache_dir: PathBuf,
}

pub struct DirectoryCommandInit;

impl DirectoryCommandInit {
    pub fn initialize(data_root: &Path, config_path: Option<&Path>) -> Result<DirectoryCommandContext> {
        if !data_root.is_dir() {
            return Err(DirectoryError::data_root_not_found(data_root));
        }
        let data_root = std::path::absolute(data_root)?;

        let config = DirectoryConfig::load(config_path)?;
        let cache_dir = get_data_cache_directory(&data_root);
        log::debug!(
            "Initializing directory for {} with cache in {}",
            data_root.display(),
            cache_dir.display()
        );

        let backend = Arc::new(FsBackend::new(&data_root, &config.storage_prefix));
        let local = Arc::new(FileStore::new(&cache_dir));
        let directory = Directory::new(config, backend.clone(), backend, local)?;

        Ok(DirectoryCommandContext {
            directory,
            data_root,
            cache_dir,
        })
    }
}

impl DirectoryCommandContext {
    /// Parse a letter argument and check it belongs to the directory
    pub fn parse_letter(&self, raw: &str) -> Result<char> {
        let mut chars = raw.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => {
                return Err(DirectoryError::invalid_config(format!(
                    "'{raw}' is not a single letter"
                )))
            }
        };

        if self.directory.config().letter_index(letter).is_none() {
            return Err(DirectoryError::unknown_letter(letter));
        }
        Ok(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_data_root_is_rejected() {
        let result = DirectoryCommandInit::initialize(Path::new("/non/existent/data"), None);
        assert!(matches!(result, Err(DirectoryError::DataRootNotFound { .. })));
    }

    #[test]
    fn test_parse_letter() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{}")?;
        let context = DirectoryCommandInit::initialize(temp_dir.path(), Some(&config_path))?;

        assert_eq!(context.parse_letter("b")?, 'B');
        assert!(matches!(
            context.parse_letter("I"),
            Err(DirectoryError::UnknownLetter { letter: 'I' })
        ));
        assert!(context.parse_letter("AB").is_err());
        Ok(())
    }
}
