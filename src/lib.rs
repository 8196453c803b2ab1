//! Food Directory - incremental loading and signed image URL caching for an
//! alphabetical food-nutrition directory.
//!
//! Letter buckets are loaded lazily from a document store, image URLs are minted in
//! bounded batches, neighboring letters are prefetched as the user scrolls, and the
//! whole directory is persisted to an expiring local snapshot.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The [`Directory`] orchestrator and its view state
//! - The individual components (limiter, fetcher, loader, cache, resolver, prefetcher)
//! - Collaborator traits and the filesystem-backed implementations
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Orchestration
    Directory,
    DirectoryConfig,
    // Error handling
    DirectoryError,
    DirectorySnapshot,
    DocumentStore,
    // Data model
    FoodItem,
    FsBackend,
    LetterBucket,
    LoadSource,
    LocalStore,
    Result,
    UrlSigner,
};
