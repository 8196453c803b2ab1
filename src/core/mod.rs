//! Core functionality for the food directory.
//!
//! This module provides the building blocks for incremental directory loading,
//! signed image URL resolution, snapshot caching and CLI presentation.

pub mod backend;
pub mod cache;
pub mod command_init;
pub mod compare;
pub mod config;
pub mod details;
pub mod directory;
pub mod dirs;
pub mod error;
pub mod fs_backend;
pub mod limiter;
pub mod loader;
pub mod local;
pub mod output;
pub mod prefetch;
pub mod resolver;
pub mod session;
pub mod signer;
pub mod state;
pub mod throttle;
pub mod updater;
pub mod view;

// === Error handling ===
// Core error types and result type used throughout the crate
pub use error::{DirectoryError, Result};

// === Collaborators ===
// Document store, URL signer and local storage seams plus shipped implementations
pub use backend::{DocumentStore, FoodDocument, LetterDocument, LocalStore, SignedUrl, UrlSigner};
pub use fs_backend::FsBackend;
pub use local::{FileStore, MemoryStore};

// === Data model ===
// Directory entries, buckets and the persisted snapshot
pub use state::{DirectorySnapshot, FoodItem, ItemKey, LetterBucket, Nutrition, PersistedSnapshot};

// === Components ===
// Leaf-first: limiter, fetcher, loader, cache, resolver, prefetcher, updater
pub use cache::{IncrementalCache, PersistOutcome};
pub use limiter::{LimiterStats, RequestLimiter};
pub use loader::BucketLoader;
pub use prefetch::{NeighborPrefetcher, PrefetchOutcome};
pub use resolver::{ImageOutcome, LazyImageResolver, SkipReason};
pub use signer::{SignedUrlFetcher, UrlOutcome};
pub use updater::{BatchedUpdater, ViewSink};

// === Orchestration ===
// Page-level directory, view state, details and comparison
pub use compare::{compare_nutrition, parse_nutrient_value, NutrientRow, NutritionComparison};
pub use config::DirectoryConfig;
pub use details::FoodDetails;
pub use directory::{Directory, LoadSource};
pub use view::{DirectoryView, SelectionOutcome, ViewState};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{print_error, print_info, print_section_header, print_success};
