//! Nutrition detail lookup for a single food.
//!
//! The directory cache is consulted first; a cached entry with nutrition that is
//! younger than the detail TTL is returned as is. Otherwise the detail document is
//! fetched, an image is reused from the cache or signed once, and the result is
//! patched back into the cache.

use crate::core::backend::DocumentStore;
use crate::core::cache::{now_millis, IncrementalCache};
use crate::core::config::DirectoryConfig;
use crate::core::error::{DirectoryError, Result};
use crate::core::signer::SignedUrlFetcher;
use crate::core::state::{item_id, FoodItem};
use std::sync::Arc;

pub struct FoodDetails {
    config: Arc<DirectoryConfig>,
    store: Arc<dyn DocumentStore>,
    fetcher: SignedUrlFetcher,
    cache: Arc<IncrementalCache>,
}

impl FoodDetails {
    pub fn new(
        config: Arc<DirectoryConfig>,
        store: Arc<dyn DocumentStore>,
        fetcher: SignedUrlFetcher,
        cache: Arc<IncrementalCache>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            cache,
        }
    }

    pub async fn lookup(&self, name: &str) -> Result<FoodItem> {
        let cached = self.cache.find_by_name(name);

        if let Some(item) = cached.as_ref().filter(|item| self.is_fresh(item, now_millis())) {
            log::debug!("Details for {name} served from the directory cache");
            return Ok(item.clone());
        }

        log::debug!("Fetching details for {name}");
        let document = self
            .store
            .find_food_by_name(name)
            .await?
            .ok_or_else(|| DirectoryError::food_not_found(name))?;

        let letter = document
            .category_letter
            .chars()
            .next()
            .or_else(|| cached.as_ref().and_then(FoodItem::letter))
            .or_else(|| name.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| DirectoryError::food_not_found(name))?;

        let mut item = if self.config.is_local_letter(letter) {
            FoodItem::local(letter, name, self.config.local_asset_path(letter, name))
        } else {
            let object_id = cached
                .as_ref()
                .map(|c| c.storage_object_id.clone())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| self.config.storage_object_id(letter, name));
            let image_url = self.image_for(name, cached.as_ref(), &object_id).await;
            FoodItem {
                name: name.to_string(),
                id: item_id(letter, name),
                nutrition: Default::default(),
                details_fetched_at: 0,
                image_url,
                storage_object_id: object_id,
                is_local_asset: false,
                is_selected: false,
            }
        };
        item.nutrition = document.nutrition;
        item.details_fetched_at = now_millis();
        item.is_selected = cached.as_ref().is_some_and(|c| c.is_selected);

        self.cache.patch_details(&item);
        Ok(item)
    }

    /// Nutrition is reusable while younger than the detail TTL, whatever the listing's age
    fn is_fresh(&self, item: &FoodItem, now: i64) -> bool {
        if item.nutrition.is_empty() || item.details_fetched_at <= 0 {
            return false;
        }
        let age = now.saturating_sub(item.details_fetched_at);
        age >= 0 && (age as u128) < self.config.detail_ttl().as_millis()
    }

    async fn image_for(&self, name: &str, cached: Option<&FoodItem>, object_id: &str) -> Option<String> {
        let reusable = cached
            .and_then(|c| c.image_url.as_deref())
            .filter(|url| !url.is_empty() && !self.cache.is_placeholder(url));
        if let Some(url) = reusable {
            log::debug!("Reusing cached image for {name}");
            return Some(url.to_string());
        }

        match self.fetcher.resolve_one(object_id).await {
            Ok(url) => Some(url),
            Err(reason) => {
                log::warn!("No image for {name}: {reason}");
                None
            }
        }
    }
}
