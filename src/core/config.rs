//! Tunables for loading, caching and prefetching.
//!
//! Every field has a default, so a partial JSON file only overrides what it names.

use crate::core::dirs::get_config_directory;
use crate::core::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CACHE_KEY: &str = "cachedFoodGroupsWithImageUrls";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";
pub const DEFAULT_FALLBACK_IMAGE: &str = "/images/default_food.png";

const DAY_MS: u64 = 24 * 60 * 60 * 1000;
const HOUR_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Letters shown in the directory navigation, in display order
    pub letters: Vec<char>,
    /// Letters whose images ship as bundled assets
    pub local_letters: Vec<char>,
    /// Letters loaded on a cold start
    pub initial_letters: usize,
    pub storage_prefix: String,
    pub local_asset_root: String,
    pub placeholder_image: String,
    pub default_image: String,
    pub cache_key: String,
    pub cache_ttl_ms: u64,
    /// Freshness window for nutrition data reused from the directory cache
    pub detail_ttl_ms: u64,
    pub max_concurrent_requests: usize,
    pub url_chunk_size: usize,
    pub first_paint_batch: usize,
    pub prefetch_radius: usize,
    pub active_letter_cap: usize,
    pub neighbor_letter_cap: usize,
    pub prefetch_throttle_ms: u64,
    pub batch_delay_ms: u64,
    pub letter_load_backoff_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            letters: "ABCDEFGHJKLMNOPQRSTWXYZ".chars().collect(),
            local_letters: Vec::new(),
            initial_letters: 2,
            storage_prefix: "cloud://food-directory".to_string(),
            local_asset_root: "/images/foods".to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            default_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_ttl_ms: 7 * DAY_MS,
            detail_ttl_ms: HOUR_MS,
            max_concurrent_requests: 5,
            url_chunk_size: 50,
            first_paint_batch: 20,
            prefetch_radius: 1,
            active_letter_cap: 12,
            neighbor_letter_cap: 6,
            prefetch_throttle_ms: 200,
            batch_delay_ms: 300,
            letter_load_backoff_ms: 100,
        }
    }
}

impl DirectoryConfig {
    /// Load from an explicit file, else from the user config directory, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let default_path = get_config_directory().join("config.json");
                if default_path.exists() {
                    log::debug!("Loading config from {}", default_path.display());
                    Self::read_file(&default_path)?
                } else {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::config_read_failed(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.letters.is_empty() {
            return Err(DirectoryError::invalid_config("letters must not be empty"));
        }
        if let Some(bad) = self.letters.iter().find(|c| !c.is_ascii_uppercase()) {
            return Err(DirectoryError::invalid_config(format!(
                "letter '{bad}' is not an uppercase ASCII letter"
            )));
        }
        if let Some(bad) = self.local_letters.iter().find(|c| !self.letters.contains(c)) {
            return Err(DirectoryError::invalid_config(format!(
                "local letter '{bad}' is not in the letters list"
            )));
        }
        if self.max_concurrent_requests == 0 {
            return Err(DirectoryError::invalid_config(
                "max_concurrent_requests must be at least 1",
            ));
        }
        if self.url_chunk_size == 0 {
            return Err(DirectoryError::invalid_config("url_chunk_size must be at least 1"));
        }
        Ok(())
    }

    pub fn is_local_letter(&self, letter: char) -> bool {
        self.local_letters.contains(&letter)
    }

    pub fn letter_index(&self, letter: char) -> Option<usize> {
        self.letters.iter().position(|&c| c == letter)
    }

    pub fn storage_object_id(&self, letter: char, name: &str) -> String {
        format!("{}/result/{letter}/{name}.webp", self.storage_prefix)
    }

    pub fn local_asset_path(&self, letter: char, name: &str) -> String {
        format!("{}/{letter}/{name}.webp", self.local_asset_root)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn detail_ttl(&self) -> Duration {
        Duration::from_millis(self.detail_ttl_ms)
    }

    pub fn prefetch_throttle(&self) -> Duration {
        Duration::from_millis(self.prefetch_throttle_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn letter_load_backoff(&self) -> Duration {
        Duration::from_millis(self.letter_load_backoff_ms)
    }
}
