//! View state of the directory page.
//!
//! Holds every loaded bucket, the filtered projection shown to the user, the
//! search key, the active letter and the comparison selection. Batched image
//! commits are applied by [`ItemKey`] to both projections.

use crate::core::state::{ItemKey, LetterBucket};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// At most this many foods can be compared at once
pub const MAX_SELECTED: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected,
    Deselected,
    LimitReached,
    UnknownItem,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub all: Vec<LetterBucket>,
    pub filtered: Vec<LetterBucket>,
    pub search_key: String,
    pub active_letter: Option<char>,
    pub compare_mode: bool,
    pub selected: Vec<String>,
}

impl ViewState {
    fn refilter(&mut self) {
        self.filtered = filter_buckets(&self.all, &self.search_key);
    }

    fn sync_selection_flags(&mut self) {
        let selected = &self.selected;
        for food in self
            .all
            .iter_mut()
            .chain(self.filtered.iter_mut())
            .flat_map(|bucket| bucket.foods.iter_mut())
        {
            food.is_selected = selected.contains(&food.id);
        }
    }
}

/// Case-insensitive substring match on names; buckets without a match are dropped
pub fn filter_buckets(buckets: &[LetterBucket], key: &str) -> Vec<LetterBucket> {
    let needle = key.trim().to_lowercase();
    if needle.is_empty() {
        return buckets.to_vec();
    }

    buckets
        .iter()
        .filter_map(|bucket| {
            let foods: Vec<_> = bucket
                .foods
                .iter()
                .filter(|food| food.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            (!foods.is_empty()).then(|| LetterBucket::new(bucket.letter, foods))
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct DirectoryView {
    state: Mutex<ViewState>,
    commits: AtomicUsize,
}

impl DirectoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every bucket, keeping the current filter and selection
    pub fn set_all(&self, buckets: Vec<LetterBucket>) {
        let mut state = self.state.lock();
        state.all = buckets;
        state.refilter();
        state.sync_selection_flags();
    }

    /// Insert or replace buckets by letter
    pub fn merge_buckets(&self, buckets: BTreeMap<char, LetterBucket>) {
        let mut state = self.state.lock();
        for (letter, bucket) in buckets {
            match state.all.iter_mut().find(|b| b.letter == letter) {
                Some(existing) => *existing = bucket,
                None => state.all.push(bucket),
            }
        }
        state.all.sort_by_key(|bucket| bucket.letter);
        state.refilter();
        state.sync_selection_flags();
    }

    /// Apply one committed batch of image updates
    pub fn apply_updates(&self, updates: &[(ItemKey, String)]) {
        let mut state = self.state.lock();
        let ViewState { all, filtered, .. } = &mut *state;
        for (key, url) in updates {
            for buckets in [&mut *all, &mut *filtered] {
                if let Some(food) = buckets
                    .iter_mut()
                    .find(|bucket| bucket.letter == key.letter)
                    .and_then(|bucket| bucket.find_mut(&key.item_id))
                {
                    food.image_url = Some(url.clone());
                }
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
    }

    pub fn apply_filter(&self, key: &str) -> Vec<LetterBucket> {
        let mut state = self.state.lock();
        state.search_key = key.to_string();
        state.refilter();
        state.filtered.clone()
    }

    pub fn set_active_letter(&self, letter: char) {
        self.state.lock().active_letter = Some(letter);
    }

    pub fn active_letter(&self) -> Option<char> {
        self.state.lock().active_letter
    }

    pub fn is_filtered(&self, letter: char) -> bool {
        self.state.lock().filtered.iter().any(|bucket| bucket.letter == letter)
    }

    pub fn first_filtered_letter(&self) -> Option<char> {
        self.state.lock().filtered.first().map(|bucket| bucket.letter)
    }

    pub fn toggle_selection(&self, item_id: &str) -> SelectionOutcome {
        let mut state = self.state.lock();
        let exists = state
            .all
            .iter()
            .any(|bucket| bucket.find(item_id).is_some());
        if !exists {
            return SelectionOutcome::UnknownItem;
        }

        let outcome = if let Some(pos) = state.selected.iter().position(|id| id == item_id) {
            state.selected.remove(pos);
            SelectionOutcome::Deselected
        } else if state.selected.len() >= MAX_SELECTED {
            return SelectionOutcome::LimitReached;
        } else {
            state.selected.push(item_id.to_string());
            SelectionOutcome::Selected
        };
        state.sync_selection_flags();
        outcome
    }

    /// Flip compare mode; any selection is cleared either way
    pub fn toggle_compare_mode(&self) -> bool {
        let mut state = self.state.lock();
        state.compare_mode = !state.compare_mode;
        state.selected.clear();
        state.sync_selection_flags();
        state.compare_mode
    }

    pub fn selected(&self) -> Vec<String> {
        self.state.lock().selected.clone()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        *self.state.lock() = ViewState::default();
    }
}
