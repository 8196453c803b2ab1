//! Warms the letters around the one the user is looking at.
//!
//! A pass either loads one unloaded letter of the window and stops, or, when the
//! whole window is loaded, resolves a capped number of images per letter. The
//! active letter gets the larger cap. [`NeighborPrefetcher::run`] chains passes with
//! a short backoff until a resolve pass happens.

use crate::core::cache::IncrementalCache;
use crate::core::config::DirectoryConfig;
use crate::core::loader::BucketLoader;
use crate::core::resolver::LazyImageResolver;
use crate::core::session::DirectorySession;
use crate::core::state::FoodItem;
use crate::core::view::DirectoryView;
use futures::future::join_all;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchOutcome {
    UnknownLetter(char),
    /// One window letter was loaded; images wait for the next pass
    Loaded(char),
    LoadFailed(char),
    Resolved { attempted: usize },
}

pub struct NeighborPrefetcher {
    config: Arc<DirectoryConfig>,
    session: Arc<DirectorySession>,
    loader: Arc<BucketLoader>,
    resolver: Arc<LazyImageResolver>,
    cache: Arc<IncrementalCache>,
    view: Arc<DirectoryView>,
}

impl NeighborPrefetcher {
    pub fn new(
        config: Arc<DirectoryConfig>,
        session: Arc<DirectorySession>,
        loader: Arc<BucketLoader>,
        resolver: Arc<LazyImageResolver>,
        cache: Arc<IncrementalCache>,
        view: Arc<DirectoryView>,
    ) -> Self {
        Self {
            config,
            session,
            loader,
            resolver,
            cache,
            view,
        }
    }

    /// Window letters ordered by distance from `letter`, the active letter first
    pub fn window(&self, letter: char) -> Vec<char> {
        let Some(index) = self.config.letter_index(letter) else {
            return Vec::new();
        };
        let letters = &self.config.letters;
        let mut window = vec![letter];
        for distance in 1..=self.config.prefetch_radius {
            if let Some(before) = index.checked_sub(distance) {
                window.push(letters[before]);
            }
            if let Some(&after) = letters.get(index + distance) {
                window.push(after);
            }
        }
        window
    }

    pub async fn on_active_letter_changed(&self, letter: char) -> PrefetchOutcome {
        let window = self.window(letter);
        if window.is_empty() {
            log::debug!("Ignoring prefetch for unknown letter '{letter}'");
            return PrefetchOutcome::UnknownLetter(letter);
        }

        if let Some(&unloaded) = window.iter().find(|&&l| !self.session.is_loaded(l)) {
            return self.load_one(unloaded).await;
        }

        let mut candidates: Vec<FoodItem> = Vec::new();
        for &window_letter in &window {
            let cap = if window_letter == letter {
                self.config.active_letter_cap
            } else {
                self.config.neighbor_letter_cap
            };
            let Some(bucket) = self.cache.bucket(window_letter) else {
                continue;
            };
            candidates.extend(
                bucket
                    .foods
                    .into_iter()
                    .filter(|food| {
                        !food.is_local_asset
                            && !food.storage_object_id.is_empty()
                            && !self.session.is_resolved(&food.storage_object_id)
                    })
                    .take(cap),
            );
        }

        let attempted = candidates.len();
        if attempted > 0 {
            log::debug!("Prefetching {attempted} images around '{letter}'");
            join_all(candidates.iter().map(|food| self.resolver.resolve(food))).await;
        }
        PrefetchOutcome::Resolved { attempted }
    }

    async fn load_one(&self, letter: char) -> PrefetchOutcome {
        match self.loader.load_letters(&[letter], false).await {
            Ok(buckets) => {
                if !buckets.is_empty() {
                    self.cache.merge(buckets.clone());
                    self.view.merge_buckets(buckets);
                }
                PrefetchOutcome::Loaded(letter)
            }
            Err(e) => {
                log::warn!("Prefetch could not load letter '{letter}': {e}");
                PrefetchOutcome::LoadFailed(letter)
            }
        }
    }

    /// Run passes until the window is loaded and one resolve pass has happened
    pub async fn run(&self, letter: char) -> PrefetchOutcome {
        let max_passes = self.window(letter).len() + 1;
        let mut outcome = self.on_active_letter_changed(letter).await;
        for _ in 1..max_passes {
            if !matches!(outcome, PrefetchOutcome::Loaded(_)) {
                break;
            }
            tokio::time::sleep(self.config.letter_load_backoff()).await;
            outcome = self.on_active_letter_changed(letter).await;
        }
        outcome
    }
}
