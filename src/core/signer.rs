//! Batched signed-URL resolution.
//!
//! [`SignedUrlFetcher::resolve_urls`] splits its input into fixed-size chunks, issues
//! one limiter-gated signer call per chunk and merges the answers. Every requested id
//! gets an entry: either the URL or the reason it could not be minted. No retries
//! happen here; callers pick their own fallback.

use crate::core::backend::UrlSigner;
use crate::core::limiter::RequestLimiter;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Signed URL on success, failure reason otherwise
pub type UrlOutcome = std::result::Result<String, String>;

#[derive(Clone)]
pub struct SignedUrlFetcher {
    signer: Arc<dyn UrlSigner>,
    limiter: RequestLimiter,
    chunk_size: usize,
}

impl SignedUrlFetcher {
    pub fn new(signer: Arc<dyn UrlSigner>, limiter: RequestLimiter, chunk_size: usize) -> Self {
        Self {
            signer,
            limiter,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }

    pub async fn resolve_urls(&self, object_ids: &[String]) -> HashMap<String, UrlOutcome> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = object_ids
            .iter()
            .filter(|id| !id.is_empty() && seen.insert(id.as_str()))
            .cloned()
            .collect();

        if unique.is_empty() {
            return HashMap::new();
        }

        log::debug!(
            "Resolving {} signed URLs in chunks of {}",
            unique.len(),
            self.chunk_size
        );

        let calls = unique.chunks(self.chunk_size).map(|chunk| async move {
            let response = self
                .limiter
                .submit(self.signer.get_temporary_urls(chunk))
                .await;
            (chunk, response)
        });

        let mut outcomes = HashMap::with_capacity(unique.len());
        for (chunk, response) in join_all(calls).await {
            match response {
                Ok(entries) => {
                    for entry in entries {
                        let outcome = match (entry.url, entry.error) {
                            (Some(url), _) if !url.is_empty() => Ok(url),
                            (_, Some(error)) => Err(error),
                            _ => Err("empty signed URL".to_string()),
                        };
                        if let Err(reason) = &outcome {
                            log::warn!("Signed URL failed for {}: {reason}", entry.object_id);
                        }
                        outcomes.insert(entry.object_id, outcome);
                    }
                }
                Err(e) => {
                    log::warn!("Signed URL call failed for {} ids: {e}", chunk.len());
                    for id in chunk {
                        outcomes.insert(id.clone(), Err(e.to_string()));
                    }
                }
            }

            for id in chunk {
                outcomes
                    .entry(id.clone())
                    .or_insert_with(|| Err("missing from signer response".to_string()));
            }
        }

        // Signers may echo ids that were never asked for
        outcomes.retain(|id, _| seen.contains(id.as_str()));
        outcomes
    }

    /// Single-id convenience wrapper around [`Self::resolve_urls`]
    pub async fn resolve_one(&self, object_id: &str) -> UrlOutcome {
        let ids = [object_id.to_string()];
        self.resolve_urls(&ids)
            .await
            .remove(object_id)
            .unwrap_or_else(|| Err("missing from signer response".to_string()))
    }
}
