//! Directory data structures and the persisted snapshot format.
//!
//! This module defines the entities the directory loads, caches and displays. The
//! persisted form round-trips through JSON exactly: plain nested records of strings,
//! numbers and booleans.
//!
//! # Public API
//! - [`FoodItem`]: One directory entry with its image resolution state
//! - [`Nutrition`]: Nutrient tables filled in by a detail lookup
//! - [`LetterBucket`]: All foods whose name starts with one letter
//! - [`DirectorySnapshot`]: The unit of persistence, with its capture time
//! - [`PersistedSnapshot`]: The exact value shape written to local storage
//! - [`ItemKey`]: Stable `(letter, item id)` reference used for targeted updates
//!
//! # Cache Strategy
//! - **JSON serialization**: camelCase keys, one-character letter strings
//! - **Timestamping**: milliseconds since the Unix epoch
//! - **Ordering**: buckets sorted by letter, foods in backend listing order

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub main: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamins: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerals: Option<BTreeMap<String, String>>,
}

impl Nutrition {
    /// True until a detail fetch has populated the main table
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// When `nutrition` was fetched, in ms since the epoch; 0 until a detail lookup
    #[serde(default)]
    pub details_fetched_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub storage_object_id: String,
    #[serde(default)]
    pub is_local_asset: bool,
    #[serde(default)]
    pub is_selected: bool,
}

impl FoodItem {
    /// Item whose image is served from a bundled asset path
    pub fn local(letter: char, name: impl Into<String>, asset_path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: item_id(letter, &name),
            name,
            nutrition: Nutrition::default(),
            details_fetched_at: 0,
            image_url: Some(asset_path.into()),
            storage_object_id: String::new(),
            is_local_asset: true,
            is_selected: false,
        }
    }

    /// Item whose image has to be resolved into a signed URL
    pub fn remote(
        letter: char,
        name: impl Into<String>,
        storage_object_id: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: item_id(letter, &name),
            name,
            nutrition: Nutrition::default(),
            details_fetched_at: 0,
            image_url: Some(placeholder.into()),
            storage_object_id: storage_object_id.into(),
            is_local_asset: false,
            is_selected: false,
        }
    }

    /// An item is displayable when exactly one image source is configured
    pub fn has_image_source(&self) -> bool {
        self.is_local_asset != !self.storage_object_id.is_empty()
    }

    pub fn letter(&self) -> Option<char> {
        self.id.chars().next()
    }
}

/// Deterministic item id: `<letter>-<name>`
pub fn item_id(letter: char, name: &str) -> String {
    format!("{letter}-{name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterBucket {
    pub letter: char,
    pub foods: Vec<FoodItem>,
}

impl LetterBucket {
    pub fn new(letter: char, foods: Vec<FoodItem>) -> Self {
        Self { letter, foods }
    }

    pub fn find(&self, item_id: &str) -> Option<&FoodItem> {
        self.foods.iter().find(|food| food.id == item_id)
    }

    pub fn find_mut(&mut self, item_id: &str) -> Option<&mut FoodItem> {
        self.foods.iter_mut().find(|food| food.id == item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorySnapshot {
    pub buckets: Vec<LetterBucket>,
    pub captured_at: i64,
}

impl DirectorySnapshot {
    pub fn new(buckets: Vec<LetterBucket>, captured_at: i64) -> Self {
        Self {
            buckets,
            captured_at,
        }
    }

    pub fn letters(&self) -> Vec<char> {
        self.buckets.iter().map(|bucket| bucket.letter).collect()
    }

    pub fn bucket(&self, letter: char) -> Option<&LetterBucket> {
        self.buckets.iter().find(|bucket| bucket.letter == letter)
    }

    pub fn item_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.foods.len()).sum()
    }

    pub fn find_by_id(&self, item_id: &str) -> Option<&FoodItem> {
        self.buckets.iter().find_map(|bucket| bucket.find(item_id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&FoodItem> {
        self.buckets
            .iter()
            .find_map(|bucket| bucket.foods.iter().find(|food| food.name == name))
    }

    pub fn item_mut(&mut self, key: &ItemKey) -> Option<&mut FoodItem> {
        self.buckets
            .iter_mut()
            .find(|bucket| bucket.letter == key.letter)
            .and_then(|bucket| bucket.find_mut(&key.item_id))
    }
}

/// Value shape written under the cache key: `{ data, timestamp }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub data: Vec<LetterBucket>,
    pub timestamp: i64,
}

impl From<&DirectorySnapshot> for PersistedSnapshot {
    fn from(snapshot: &DirectorySnapshot) -> Self {
        Self {
            data: snapshot.buckets.clone(),
            timestamp: snapshot.captured_at,
        }
    }
}

impl From<PersistedSnapshot> for DirectorySnapshot {
    fn from(persisted: PersistedSnapshot) -> Self {
        Self {
            buckets: persisted.data,
            captured_at: persisted.timestamp,
        }
    }
}

/// Stable reference to one item, used instead of positional view paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub letter: char,
    pub item_id: String,
}

impl ItemKey {
    pub fn new(letter: char, item_id: impl Into<String>) -> Self {
        Self {
            letter,
            item_id: item_id.into(),
        }
    }

    pub fn for_item(item: &FoodItem) -> Option<Self> {
        item.letter().map(|letter| Self::new(letter, item.id.clone()))
    }
}
