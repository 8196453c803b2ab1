//! Loads letter buckets from the document store.
//!
//! One batched query covers every requested letter. Items of local letters get
//! their bundled asset path; everything else gets a storage object id and the
//! placeholder image, except the first `first_paint_batch` remote items of the
//! batch, whose signed URLs are resolved before returning.

use crate::core::backend::{DocumentStore, LetterDocument};
use crate::core::config::DirectoryConfig;
use crate::core::error::Result;
use crate::core::session::DirectorySession;
use crate::core::signer::SignedUrlFetcher;
use crate::core::state::{FoodItem, LetterBucket};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct BucketLoader {
    config: Arc<DirectoryConfig>,
    store: Arc<dyn DocumentStore>,
    fetcher: SignedUrlFetcher,
    session: Arc<DirectorySession>,
}

impl BucketLoader {
    pub fn new(
        config: Arc<DirectoryConfig>,
        store: Arc<dyn DocumentStore>,
        fetcher: SignedUrlFetcher,
        session: Arc<DirectorySession>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            session,
        }
    }

    /// Load the given letters, skipping ones already loaded unless `force` is set.
    ///
    /// Letters whose document is missing or lists no foods count as loaded but
    /// produce no bucket. A failed query releases the letters so a later call can
    /// retry them.
    pub async fn load_letters(
        &self,
        letters: &[char],
        force: bool,
    ) -> Result<BTreeMap<char, LetterBucket>> {
        let claimed = self.session.claim_letters(letters, force);
        if claimed.is_empty() {
            log::debug!("Letters {letters:?} already loaded");
            return Ok(BTreeMap::new());
        }

        log::debug!("Loading letters {claimed:?}");
        let documents = match self.store.find_letters(&claimed).await {
            Ok(documents) => documents,
            Err(e) => {
                self.session.release_letters(&claimed);
                log::warn!("Loading letters {claimed:?} failed: {e}");
                return Err(e);
            }
        };

        let mut buckets = self.build_buckets(&claimed, &documents);
        self.resolve_first_paint(&mut buckets).await;

        log::debug!(
            "Loaded {} of {} letters with {} items",
            buckets.len(),
            claimed.len(),
            buckets.values().map(|b| b.foods.len()).sum::<usize>()
        );
        Ok(buckets)
    }

    fn build_buckets(
        &self,
        claimed: &[char],
        documents: &[LetterDocument],
    ) -> BTreeMap<char, LetterBucket> {
        let mut buckets = BTreeMap::new();

        for document in documents {
            let Some(letter) = document_letter(document) else {
                log::warn!("Skipping letter document with id '{}'", document.id);
                continue;
            };
            if !claimed.contains(&letter) || buckets.contains_key(&letter) {
                continue;
            }

            let names = document.food_names();
            if names.is_empty() {
                log::debug!("Letter {letter} has no items");
                continue;
            }

            let local = self.config.is_local_letter(letter);
            let foods = names
                .into_iter()
                .map(|name| {
                    if local {
                        let path = self.config.local_asset_path(letter, &name);
                        FoodItem::local(letter, name, path)
                    } else {
                        let object_id = self.config.storage_object_id(letter, &name);
                        FoodItem::remote(letter, name, object_id, &self.config.placeholder_image)
                    }
                })
                .collect();
            buckets.insert(letter, LetterBucket::new(letter, foods));
        }

        buckets
    }

    async fn resolve_first_paint(&self, buckets: &mut BTreeMap<char, LetterBucket>) {
        let first: Vec<String> = buckets
            .values()
            .flat_map(|bucket| bucket.foods.iter())
            .filter(|food| !food.is_local_asset && !food.storage_object_id.is_empty())
            .take(self.config.first_paint_batch)
            .map(|food| food.storage_object_id.clone())
            .collect();

        if first.is_empty() {
            return;
        }

        let outcomes = self.fetcher.resolve_urls(&first).await;
        let mut resolved = 0;
        for food in buckets.values_mut().flat_map(|bucket| bucket.foods.iter_mut()) {
            if let Some(Ok(url)) = outcomes.get(&food.storage_object_id) {
                food.image_url = Some(url.clone());
                self.session.mark_resolved(food.storage_object_id.clone());
                resolved += 1;
            }
        }
        log::debug!("First paint resolved {resolved} of {} images", first.len());
    }
}

fn document_letter(document: &LetterDocument) -> Option<char> {
    let mut chars = document.id.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}
