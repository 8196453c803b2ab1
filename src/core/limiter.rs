//! Concurrency ceiling for outbound network calls.
//!
//! [`RequestLimiter`] admits at most `ceiling` tasks at once. Excess tasks wait in a
//! FIFO queue (tokio's semaphore is fair), and each task's result is returned to its
//! own caller, so one failure never blocks or cancels the rest of the queue.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimiterStats {
    pub in_flight: usize,
    pub queued: usize,
    pub peak_in_flight: usize,
    pub completed: usize,
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    queued: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct RequestLimiter {
    permits: Arc<Semaphore>,
    ceiling: usize,
    counters: Arc<Counters>,
}

/// Releases the in-flight slot even when the task future is dropped midway
struct InFlightGuard<'a>(&'a Counters);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.0.completed.fetch_add(1, Ordering::SeqCst);
    }
}

struct QueuedGuard<'a>(&'a Counters);

impl Drop for QueuedGuard<'_> {
    fn drop(&mut self) {
        self.0.queued.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RequestLimiter {
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            permits: Arc::new(Semaphore::new(ceiling)),
            ceiling,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Run `task` once a slot is free and hand back its output
    pub async fn submit<F, T>(&self, task: F) -> T
    where
        F: Future<Output = T>,
    {
        let counters = &*self.counters;
        counters.queued.fetch_add(1, Ordering::SeqCst);
        let queued = QueuedGuard(counters);

        // The semaphore is never closed, so acquire only fails if that invariant breaks
        let _permit = match self.permits.acquire().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                log::error!("Request limiter semaphore closed; running task unbounded");
                None
            }
        };
        drop(queued);

        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(now, Ordering::SeqCst);
        let _slot = InFlightGuard(counters);

        task.await
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            in_flight: self.counters.in_flight.load(Ordering::SeqCst),
            queued: self.counters.queued.load(Ordering::SeqCst),
            peak_in_flight: self.counters.peak.load(Ordering::SeqCst),
            completed: self.counters.completed.load(Ordering::SeqCst),
        }
    }
}
