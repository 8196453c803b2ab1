//! Coalesces per-item image updates into one view commit per batch window.
//!
//! Updates are keyed by [`ItemKey`], so a later write to the same item inside the
//! window replaces the earlier one. The first enqueue of a window arms a timer; when
//! it fires every pending update is handed to the [`ViewSink`] in a single commit.

use crate::core::state::ItemKey;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Receiver of committed batches
pub trait ViewSink: Send + Sync {
    fn commit(&self, updates: Vec<(ItemKey, String)>);
}

#[derive(Default)]
struct Pending {
    updates: BTreeMap<ItemKey, String>,
    armed: bool,
    /// Bumped on every flush so a stale timer never commits a later window early
    generation: u64,
}

struct Inner {
    sink: Arc<dyn ViewSink>,
    delay: Duration,
    pending: Mutex<Pending>,
    commits: AtomicUsize,
}

#[derive(Clone)]
pub struct BatchedUpdater {
    inner: Arc<Inner>,
}

impl BatchedUpdater {
    pub fn new(sink: Arc<dyn ViewSink>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink,
                delay,
                pending: Mutex::new(Pending::default()),
                commits: AtomicUsize::new(0),
            }),
        }
    }

    pub fn enqueue(&self, key: ItemKey, url: impl Into<String>) {
        let generation = {
            let mut pending = self.inner.pending.lock();
            pending.updates.insert(key, url.into());
            if pending.armed {
                return;
            }
            pending.armed = true;
            pending.generation
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(inner.delay).await;
                    inner.flush(Some(generation));
                });
            }
            Err(_) => {
                log::debug!("No async runtime for the batch timer; committing immediately");
                self.inner.flush(None);
            }
        }
    }

    /// Commit whatever is pending right now; returns the number of updates committed
    pub fn flush(&self) -> usize {
        self.inner.flush(None)
    }

    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().updates.len()
    }

    /// Number of non-empty commits issued so far
    pub fn commit_count(&self) -> usize {
        self.inner.commits.load(Ordering::SeqCst)
    }
}

impl Inner {
    fn flush(&self, timer_generation: Option<u64>) -> usize {
        let updates = {
            let mut pending = self.pending.lock();
            if timer_generation.is_some_and(|g| g != pending.generation) {
                return 0;
            }
            pending.armed = false;
            pending.generation += 1;
            std::mem::take(&mut pending.updates)
        };

        if updates.is_empty() {
            return 0;
        }

        let count = updates.len();
        log::debug!("Committing {count} batched image updates");
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.sink.commit(updates.into_iter().collect());
        count
    }
}
