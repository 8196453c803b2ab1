//! Page-level orchestration of the food directory.
//!
//! [`Directory`] owns one instance of every component and wires them together:
//! the cache and the view receive every batched commit, scroll events reach the
//! prefetcher through a single throttle, and one-shot triggers (open, search,
//! explicit prefetch) call it directly.
//!
//! # Error Policy
//! Foreground operations (`open`, `food_details`, `compare`) return errors.
//! Background work (prefetch, lazy resolution, persistence) logs and falls back.

use crate::core::backend::{DocumentStore, LocalStore, UrlSigner};
use crate::core::cache::IncrementalCache;
use crate::core::compare::{compare_nutrition, NutritionComparison};
use crate::core::config::DirectoryConfig;
use crate::core::details::FoodDetails;
use crate::core::error::Result;
use crate::core::limiter::{LimiterStats, RequestLimiter};
use crate::core::loader::BucketLoader;
use crate::core::prefetch::{NeighborPrefetcher, PrefetchOutcome};
use crate::core::resolver::{ImageOutcome, LazyImageResolver};
use crate::core::session::DirectorySession;
use crate::core::signer::SignedUrlFetcher;
use crate::core::state::{DirectorySnapshot, FoodItem, ItemKey, LetterBucket};
use crate::core::throttle::{Invocation, Throttle};
use crate::core::updater::{BatchedUpdater, ViewSink};
use crate::core::view::{DirectoryView, SelectionOutcome, ViewState};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Backend,
}

/// Applies each committed batch to the view and patches it into the cache
struct CommitSink {
    view: Arc<DirectoryView>,
    cache: Arc<IncrementalCache>,
}

impl ViewSink for CommitSink {
    fn commit(&self, updates: Vec<(ItemKey, String)>) {
        self.view.apply_updates(&updates);
        self.cache.patch_images(&updates);
    }
}

pub struct Directory {
    config: Arc<DirectoryConfig>,
    session: Arc<DirectorySession>,
    limiter: RequestLimiter,
    cache: Arc<IncrementalCache>,
    view: Arc<DirectoryView>,
    updater: BatchedUpdater,
    resolver: Arc<LazyImageResolver>,
    loader: Arc<BucketLoader>,
    prefetcher: Arc<NeighborPrefetcher>,
    details: FoodDetails,
    scroll_throttle: Throttle<char>,
}

impl Directory {
    pub fn new(
        config: DirectoryConfig,
        store: Arc<dyn DocumentStore>,
        signer: Arc<dyn UrlSigner>,
        local: Arc<dyn LocalStore>,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let session = Arc::new(DirectorySession::new());
        let limiter = RequestLimiter::new(config.max_concurrent_requests);
        let fetcher = SignedUrlFetcher::new(signer, limiter.clone(), config.url_chunk_size);
        let cache = Arc::new(IncrementalCache::new(
            local,
            &config.cache_key,
            config.cache_ttl(),
            &config.placeholder_image,
        ));
        let view = Arc::new(DirectoryView::new());

        let sink = Arc::new(CommitSink {
            view: Arc::clone(&view),
            cache: Arc::clone(&cache),
        });
        let updater = BatchedUpdater::new(sink, config.batch_delay());
        let resolver = Arc::new(LazyImageResolver::new(
            fetcher.clone(),
            Arc::clone(&session),
            updater.clone(),
            &config.default_image,
        ));
        let loader = Arc::new(BucketLoader::new(
            Arc::clone(&config),
            Arc::clone(&store),
            fetcher.clone(),
            Arc::clone(&session),
        ));
        let prefetcher = Arc::new(NeighborPrefetcher::new(
            Arc::clone(&config),
            Arc::clone(&session),
            Arc::clone(&loader),
            Arc::clone(&resolver),
            Arc::clone(&cache),
            Arc::clone(&view),
        ));
        let details = FoodDetails::new(Arc::clone(&config), store, fetcher, Arc::clone(&cache));

        let throttled = Arc::clone(&prefetcher);
        let scroll_throttle = Throttle::new(config.prefetch_throttle(), move |letter: char| {
            let prefetcher = Arc::clone(&throttled);
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        prefetcher.run(letter).await;
                    });
                }
                Err(_) => log::warn!("Dropping prefetch for '{letter}': no async runtime"),
            }
        });

        Ok(Self {
            config,
            session,
            limiter,
            cache,
            view,
            updater,
            resolver,
            loader,
            prefetcher,
            details,
            scroll_throttle,
        })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Page-load flow: trust a fresh snapshot, otherwise load the first letters
    pub async fn open(&self) -> Result<LoadSource> {
        let source = if self.restore() {
            LoadSource::Cache
        } else {
            let initial: Vec<char> = self
                .config
                .letters
                .iter()
                .copied()
                .take(self.config.initial_letters)
                .collect();
            let buckets = self
                .loader
                .load_letters(&initial, false)
                .await
                .inspect_err(|e| log::error!("Loading the directory failed: {e}"))?;
            self.cache.merge(buckets.clone());
            self.view.merge_buckets(buckets);
            LoadSource::Backend
        };

        if let Some(letter) = self.prefetch_target() {
            self.view.set_active_letter(letter);
            self.prefetcher.run(letter).await;
        }
        Ok(source)
    }

    /// Adopt a fresh persisted snapshot without touching the backend
    pub fn restore(&self) -> bool {
        let Some(snapshot) = self.cache.read() else {
            return false;
        };
        log::debug!("Restoring cached snapshot with letters {:?}", snapshot.letters());
        self.session.mark_loaded(snapshot.letters());
        self.view.set_all(snapshot.buckets.clone());
        self.cache.hydrate(snapshot);
        true
    }

    fn prefetch_target(&self) -> Option<char> {
        self.view
            .active_letter()
            .filter(|&letter| self.view.is_filtered(letter))
            .or_else(|| self.view.first_filtered_letter())
            .or_else(|| self.config.letters.first().copied())
    }

    /// Scroll or navigation event; prefetching is throttled
    pub fn on_scroll(&self, letter: char) -> Invocation {
        self.view.set_active_letter(letter);
        self.scroll_throttle.call(letter)
    }

    /// One-shot, unthrottled prefetch
    pub async fn prefetch_now(&self, letter: char) -> PrefetchOutcome {
        self.view.set_active_letter(letter);
        self.prefetcher.run(letter).await
    }

    pub fn prefetch_window(&self, letter: char) -> Vec<char> {
        self.prefetcher.window(letter)
    }

    pub async fn search(&self, key: &str) -> Vec<LetterBucket> {
        let filtered = self.view.apply_filter(key);
        if let Some(letter) = self.prefetch_target() {
            if filtered.iter().any(|b| b.letter == letter) {
                self.prefetcher.run(letter).await;
            }
        }
        self.view.snapshot().filtered
    }

    pub async fn clear_search(&self) -> Vec<LetterBucket> {
        self.search("").await
    }

    /// The view could not display an item's image; mint a fresh URL or fall back
    pub async fn on_image_error(&self, item_id: &str) -> Option<ImageOutcome> {
        let Some(item) = self.find_item(item_id) else {
            log::warn!("Image error reported for unknown item {item_id}");
            return None;
        };
        let key = ItemKey::for_item(&item)?;

        if item.is_local_asset || item.storage_object_id.is_empty() {
            let url = self.resolver.default_image().to_string();
            self.updater.enqueue(key, url.clone());
            return Some(ImageOutcome::Fallback {
                url,
                reason: "no storage object to re-sign".to_string(),
            });
        }

        self.resolver.invalidate(&item.storage_object_id);
        Some(self.resolver.resolve(&item).await)
    }

    fn find_item(&self, item_id: &str) -> Option<FoodItem> {
        self.cache.find_by_id(item_id).or_else(|| {
            self.view
                .snapshot()
                .all
                .iter()
                .find_map(|bucket| bucket.find(item_id).cloned())
        })
    }

    pub async fn food_details(&self, name: &str) -> Result<FoodItem> {
        self.details.lookup(name).await.inspect_err(|e| {
            log::error!("Loading details for {name} failed: {e}");
        })
    }

    pub async fn compare(&self, first: &str, second: &str) -> Result<NutritionComparison> {
        let first = self.food_details(first).await?;
        let second = self.food_details(second).await?;
        Ok(compare_nutrition(first, second))
    }

    pub fn toggle_selection(&self, item_id: &str) -> SelectionOutcome {
        self.view.toggle_selection(item_id)
    }

    pub fn toggle_compare_mode(&self) -> bool {
        self.view.toggle_compare_mode()
    }

    /// Commit pending batched updates now
    pub fn flush_updates(&self) -> usize {
        self.updater.flush()
    }

    /// Explicit cache clear: forget persisted data, loaded letters and resolutions
    pub fn clear_cache(&self) -> Result<()> {
        self.updater.flush();
        self.cache.clear()?;
        self.session.reset();
        self.view.clear();
        log::debug!("Directory cache cleared");
        Ok(())
    }

    pub fn view(&self) -> ViewState {
        self.view.snapshot()
    }

    pub fn bucket(&self, letter: char) -> Option<LetterBucket> {
        self.view
            .snapshot()
            .all
            .into_iter()
            .find(|bucket| bucket.letter == letter)
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.cache.snapshot()
    }

    /// Persisted snapshot, if still within its TTL
    pub fn cached_snapshot(&self) -> Option<DirectorySnapshot> {
        self.cache.read()
    }

    pub fn loaded_letters(&self) -> Vec<char> {
        self.session.loaded_letters()
    }

    pub fn is_resolved(&self, object_id: &str) -> bool {
        self.session.is_resolved(object_id)
    }

    pub fn limiter_stats(&self) -> LimiterStats {
        self.limiter.stats()
    }

    pub fn view_commits(&self) -> usize {
        self.view.commit_count()
    }
}
