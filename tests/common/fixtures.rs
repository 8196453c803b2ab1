//! Test data generation utilities and predefined scenarios

#![allow(dead_code)]

use super::backend::MockBackend;
use food_directory::core::backend::LocalStore;
use food_directory::core::config::DirectoryConfig;
use food_directory::core::directory::Directory;
use food_directory::core::error::Result;
use food_directory::core::local::MemoryStore;
use food_directory::core::state::{FoodItem, LetterBucket, PersistedSnapshot};
use std::sync::Arc;

pub const TEST_PREFIX: &str = "cloud://test";

pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        storage_prefix: TEST_PREFIX.to_string(),
        ..Default::default()
    }
}

pub fn object_id(letter: char, name: &str) -> String {
    test_config().storage_object_id(letter, name)
}

pub fn directory_with(
    backend: &Arc<MockBackend>,
    store: &Arc<MemoryStore>,
    config: DirectoryConfig,
) -> Result<Directory> {
    Directory::new(config, backend.clone(), backend.clone(), store.clone())
}

/// Scenario: a small directory with real names and nutrition for Apple and Banana
pub fn fruit_backend() -> MockBackend {
    MockBackend::new()
        .with_letter('A', &["Apple", "Apricot", "Avocado"])
        .with_letter('B', &["Banana", "Blueberry", "Broccoli"])
        .with_letter('C', &["Cherry", "Carrot"])
        .with_letter('D', &["Date"])
        .with_food("Apple", 'A', &[("Energy", "218kJ(52kcal)"), ("Fat", "0.2g"), ("Fiber", "2.4g")])
        .with_food("Banana", 'B', &[("Energy", "371kJ(89kcal)"), ("Fat", "0.3g"), ("Protein", "1.1g")])
}

/// Scenario: letters with `per_letter` generated foods each
pub fn generated_backend(letters: &[char], per_letter: usize) -> MockBackend {
    letters
        .iter()
        .fold(MockBackend::new(), |backend, &letter| {
            backend.with_generated_letter(letter, per_letter)
        })
}

/// A bucket of `per_letter` unresolved foods named `<L>food<i>`
pub fn generated_bucket(letter: char, per_letter: usize) -> LetterBucket {
    let config = test_config();
    let foods = (0..per_letter)
        .map(|i| {
            let name = format!("{letter}food{i}");
            let id = config.storage_object_id(letter, &name);
            FoodItem::remote(letter, name, id, &config.placeholder_image)
        })
        .collect();
    LetterBucket::new(letter, foods)
}

/// Persist the given buckets as a snapshot captured at `captured_at`
pub fn seed_buckets(store: &MemoryStore, data: Vec<LetterBucket>, captured_at: i64) -> Result<()> {
    let persisted = PersistedSnapshot {
        data,
        timestamp: captured_at,
    };
    store.set(&test_config().cache_key, &serde_json::to_string(&persisted)?)
}

/// Persist a snapshot of generated, unresolved buckets captured at `captured_at`
pub fn seed_snapshot(
    store: &MemoryStore,
    letters: &[char],
    per_letter: usize,
    captured_at: i64,
) -> Result<()> {
    let data = letters
        .iter()
        .map(|&letter| generated_bucket(letter, per_letter))
        .collect();
    seed_buckets(store, data, captured_at)
}
