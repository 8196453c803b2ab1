//! On-demand signed-URL resolution for single directory items.
//!
//! Concurrent requests for the same item share one in-flight future, and object ids
//! that resolved once are skipped until the view reports the image as broken. Every
//! outcome reaches the view through the [`BatchedUpdater`], never synchronously.

use crate::core::session::DirectorySession;
use crate::core::signer::SignedUrlFetcher;
use crate::core::state::{FoodItem, ItemKey};
use crate::core::updater::BatchedUpdater;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    LocalAsset,
    AlreadyResolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Resolved(String),
    /// Resolution failed and the default image was scheduled instead
    Fallback { url: String, reason: String },
    Skipped(SkipReason),
}

impl ImageOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageOutcome::Resolved(url) | ImageOutcome::Fallback { url, .. } => Some(url),
            ImageOutcome::Skipped(_) => None,
        }
    }
}

type InFlight = Shared<BoxFuture<'static, ImageOutcome>>;

pub struct LazyImageResolver {
    fetcher: SignedUrlFetcher,
    session: Arc<DirectorySession>,
    updater: BatchedUpdater,
    default_image: String,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
}

impl LazyImageResolver {
    pub fn new(
        fetcher: SignedUrlFetcher,
        session: Arc<DirectorySession>,
        updater: BatchedUpdater,
        default_image: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            session,
            updater,
            default_image: default_image.into(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn resolve(&self, item: &FoodItem) -> ImageOutcome {
        if item.is_local_asset {
            return ImageOutcome::Skipped(SkipReason::LocalAsset);
        }
        if !item.storage_object_id.is_empty() && self.session.is_resolved(&item.storage_object_id) {
            return ImageOutcome::Skipped(SkipReason::AlreadyResolved);
        }

        let shared = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(&item.id) {
                Some(existing) => {
                    log::debug!("Joining in-flight resolution for {}", item.id);
                    existing.clone()
                }
                None => {
                    let shared = self.resolution(item).boxed().shared();
                    in_flight.insert(item.id.clone(), shared.clone());
                    shared
                }
            }
        };

        shared.await
    }

    fn resolution(&self, item: &FoodItem) -> impl std::future::Future<Output = ImageOutcome> + Send + 'static {
        let fetcher = self.fetcher.clone();
        let session = Arc::clone(&self.session);
        let updater = self.updater.clone();
        let default_image = self.default_image.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let item_id = item.id.clone();
        let object_id = item.storage_object_id.clone();
        let key = ItemKey::for_item(item);

        async move {
            let outcome = if object_id.is_empty() {
                Err("item has no storage object id".to_string())
            } else {
                fetcher.resolve_one(&object_id).await
            };

            let outcome = match outcome {
                Ok(url) => {
                    session.mark_resolved(object_id);
                    ImageOutcome::Resolved(url)
                }
                Err(reason) => {
                    log::warn!("Image for {item_id} falls back to the default: {reason}");
                    ImageOutcome::Fallback {
                        url: default_image,
                        reason,
                    }
                }
            };

            if let (Some(key), Some(url)) = (key, outcome.url()) {
                updater.enqueue(key, url);
            }
            in_flight.lock().remove(&item_id);
            outcome
        }
    }

    /// Forget a resolved object id so the next `resolve` mints a fresh URL
    pub fn invalidate(&self, object_id: &str) -> bool {
        self.session.invalidate(object_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }
}
