//! Incremental, time-expiring directory cache.
//!
//! [`IncrementalCache`] keeps the process-wide [`DirectorySnapshot`] in memory and
//! mirrors it to a [`LocalStore`] under one fixed key. Newly loaded letters are
//! merged in without discarding letters loaded earlier, and resolved images and
//! fetched nutrition are patched in as they arrive.
//!
//! # Consistency
//! Every read-modify-write (merge, patch, write, clear) runs inside one mutex,
//! persistence included, so concurrent merges never interleave.
//!
//! # Failure Policy
//! Storage failures are logged and reported as [`PersistOutcome::MemoryOnly`];
//! the in-memory update always succeeds. An unreadable or expired persisted value
//! is a miss, never an error.

use crate::core::backend::LocalStore;
use crate::core::error::{DirectoryError, Result};
use crate::core::state::{DirectorySnapshot, FoodItem, ItemKey, LetterBucket, PersistedSnapshot};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted,
    MemoryOnly,
}

pub struct IncrementalCache {
    store: Arc<dyn LocalStore>,
    key: String,
    ttl: Duration,
    placeholder: String,
    snapshot: Mutex<DirectorySnapshot>,
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl IncrementalCache {
    pub fn new(
        store: Arc<dyn LocalStore>,
        key: impl Into<String>,
        ttl: Duration,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
            placeholder: placeholder.into(),
            snapshot: Mutex::new(DirectorySnapshot::default()),
        }
    }

    /// Persisted snapshot if one exists and is younger than the TTL
    pub fn read(&self) -> Option<DirectorySnapshot> {
        self.read_at(now_millis())
    }

    pub fn read_at(&self, now: i64) -> Option<DirectorySnapshot> {
        let persisted = match self.load_persisted() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                log::debug!("Directory cache miss: nothing stored under '{}'", self.key);
                return None;
            }
            Err(e) => {
                log::warn!("Directory cache unreadable, treating as miss: {e}");
                return None;
            }
        };

        let age = now.saturating_sub(persisted.timestamp);
        if age < 0 || age as u128 >= self.ttl.as_millis() {
            log::debug!("Directory cache expired ({age}ms old, ttl {:?})", self.ttl);
            return None;
        }

        log::debug!(
            "Directory cache hit: {} buckets, {age}ms old",
            persisted.data.len()
        );
        Some(persisted.into())
    }

    fn load_persisted(&self) -> Result<Option<PersistedSnapshot>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DirectoryError::cache_parse_failed(&self.key, e))
    }

    fn persist(&self, snapshot: &DirectorySnapshot) -> PersistOutcome {
        let json = match serde_json::to_string(&PersistedSnapshot::from(snapshot)) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("{}", DirectoryError::cache_serialization_failed(e));
                return PersistOutcome::MemoryOnly;
            }
        };

        match self.store.set(&self.key, &json) {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                log::warn!("Directory cache persisted in memory only: {e}");
                PersistOutcome::MemoryOnly
            }
        }
    }

    /// Replace the snapshot wholesale and persist it
    pub fn write(&self, snapshot: DirectorySnapshot) -> PersistOutcome {
        let mut current = self.snapshot.lock();
        *current = snapshot;
        self.persist(&current)
    }

    /// Adopt a snapshot read from storage without writing it back
    pub fn hydrate(&self, snapshot: DirectorySnapshot) {
        *self.snapshot.lock() = snapshot;
    }

    pub fn merge(&self, new_buckets: BTreeMap<char, LetterBucket>) -> PersistOutcome {
        self.merge_at(new_buckets, now_millis())
    }

    pub fn merge_at(&self, new_buckets: BTreeMap<char, LetterBucket>, now: i64) -> PersistOutcome {
        let mut snapshot = self.snapshot.lock();

        for (letter, incoming) in new_buckets {
            match snapshot.buckets.iter_mut().find(|b| b.letter == letter) {
                Some(existing) => {
                    let merged = self.merge_bucket(existing, incoming);
                    *existing = merged;
                }
                None => snapshot.buckets.push(incoming),
            }
        }
        snapshot.buckets.sort_by_key(|bucket| bucket.letter);
        snapshot.captured_at = now;

        log::debug!(
            "Merged directory snapshot now holds letters {:?}",
            snapshot.letters()
        );
        self.persist(&snapshot)
    }

    /// Fresh listing wins, but keep what the old items already learned
    fn merge_bucket(&self, existing: &LetterBucket, mut incoming: LetterBucket) -> LetterBucket {
        for item in &mut incoming.foods {
            let Some(previous) = existing.find(&item.id) else {
                continue;
            };
            if self.is_unresolved(item) && !self.is_unresolved(previous) {
                item.image_url = previous.image_url.clone();
            }
            if item.nutrition.is_empty() && !previous.nutrition.is_empty() {
                item.nutrition = previous.nutrition.clone();
                item.details_fetched_at = previous.details_fetched_at;
            }
        }
        incoming
    }

    fn is_unresolved(&self, item: &FoodItem) -> bool {
        match item.image_url.as_deref() {
            None => true,
            Some(url) => url.is_empty() || url == self.placeholder,
        }
    }

    /// Apply committed image updates; keeps the capture time so the TTL is not extended
    pub fn patch_images(&self, updates: &[(ItemKey, String)]) -> PersistOutcome {
        let mut snapshot = self.snapshot.lock();
        let mut changed = 0;
        for (key, url) in updates {
            if let Some(item) = snapshot.item_mut(key) {
                if item.image_url.as_deref() != Some(url.as_str()) {
                    item.image_url = Some(url.clone());
                    changed += 1;
                }
            }
        }

        if changed == 0 {
            return PersistOutcome::Persisted;
        }
        log::debug!("Patched {changed} cached image URLs");
        self.persist(&snapshot)
    }

    /// Store a fully fetched item (nutrition, image, object id) in place of its entry
    pub fn patch_details(&self, details: &FoodItem) -> PersistOutcome {
        let mut snapshot = self.snapshot.lock();
        let Some(key) = ItemKey::for_item(details) else {
            return PersistOutcome::MemoryOnly;
        };
        let Some(item) = snapshot.item_mut(&key) else {
            log::debug!("{} is not in a loaded bucket; details not cached", details.name);
            return PersistOutcome::MemoryOnly;
        };

        item.nutrition = details.nutrition.clone();
        item.details_fetched_at = details.details_fetched_at;
        if !self.is_unresolved(details) {
            item.image_url = details.image_url.clone();
        }
        if !details.storage_object_id.is_empty() {
            item.storage_object_id = details.storage_object_id.clone();
        }
        self.persist(&snapshot)
    }

    pub fn clear(&self) -> Result<()> {
        let mut snapshot = self.snapshot.lock();
        *snapshot = DirectorySnapshot::default();
        self.store.remove(&self.key)
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.snapshot.lock().clone()
    }

    pub fn captured_at(&self) -> i64 {
        self.snapshot.lock().captured_at
    }

    pub fn bucket(&self, letter: char) -> Option<LetterBucket> {
        self.snapshot.lock().bucket(letter).cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<FoodItem> {
        self.snapshot.lock().find_by_name(name).cloned()
    }

    pub fn find_by_id(&self, item_id: &str) -> Option<FoodItem> {
        self.snapshot.lock().find_by_id(item_id).cloned()
    }

    pub fn is_placeholder(&self, url: &str) -> bool {
        url == self.placeholder
    }
}
