//! Process-lifetime bookkeeping shared by the loader, resolver and prefetcher.
//!
//! One [`DirectorySession`] is owned per directory instance and handed to each
//! component by `Arc`, so two directories (for example in tests) never share state.

use parking_lot::Mutex;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Default)]
pub struct DirectorySession {
    loaded_letters: Mutex<BTreeSet<char>>,
    resolved_objects: Mutex<HashSet<String>>,
}

impl DirectorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, letter: char) -> bool {
        self.loaded_letters.lock().contains(&letter)
    }

    /// Claim letters for loading; returns the ones that were not already claimed
    pub fn claim_letters(&self, letters: &[char], force: bool) -> Vec<char> {
        let mut loaded = self.loaded_letters.lock();
        letters
            .iter()
            .copied()
            .filter(|&letter| loaded.insert(letter) || force)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn mark_loaded(&self, letters: impl IntoIterator<Item = char>) {
        self.loaded_letters.lock().extend(letters);
    }

    /// Release letters after a failed load so a retry can claim them again
    pub fn release_letters(&self, letters: &[char]) {
        let mut loaded = self.loaded_letters.lock();
        for letter in letters {
            loaded.remove(letter);
        }
    }

    pub fn loaded_letters(&self) -> Vec<char> {
        self.loaded_letters.lock().iter().copied().collect()
    }

    pub fn is_resolved(&self, object_id: &str) -> bool {
        self.resolved_objects.lock().contains(object_id)
    }

    pub fn mark_resolved(&self, object_id: impl Into<String>) {
        self.resolved_objects.lock().insert(object_id.into());
    }

    /// Forget a resolution so the next request mints a fresh URL
    pub fn invalidate(&self, object_id: &str) -> bool {
        self.resolved_objects.lock().remove(object_id)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_objects.lock().len()
    }

    pub fn reset(&self) {
        self.loaded_letters.lock().clear();
        self.resolved_objects.lock().clear();
    }
}
