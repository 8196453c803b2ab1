//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`DirectoryError`] which covers every failure the food directory
//! can surface. It uses `thiserror` for ergonomic error definitions and includes
//! constructors for the common failure scenarios.
//!
//! # Public API
//! - [`DirectoryError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, DirectoryError>`
//!
//! # Error Categories
//! - **Collaborators**: document store, URL signer and local storage failures
//! - **Cache**: serialization and parse failures of the persisted snapshot
//! - **Lookup**: unknown foods and letters
//! - **Configuration**: invalid tunables

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for the food directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    // Collaborator errors
    #[error("Document store query failed: {message}")]
    Backend { message: String },

    #[error("Signed URL request failed: {message}")]
    Signer { message: String },

    #[error("Local storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("Local storage quota exceeded writing '{key}' ({size} bytes, limit {limit})")]
    StorageQuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    // Cache errors
    #[error("Failed to serialize directory snapshot: {source}")]
    CacheSerializationFailed { source: serde_json::Error },

    #[error("Failed to parse cached snapshot '{key}': {source}")]
    CacheParseFailed {
        key: String,
        source: serde_json::Error,
    },

    #[error("Data directory not found: {path}")]
    DataRootNotFound { path: PathBuf },

    // Lookup errors
    #[error("Food not found: {name}")]
    FoodNotFound { name: String },

    #[error("Letter '{letter}' is not part of the directory")]
    UnknownLetter { letter: char },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using DirectoryError
pub type Result<T> = std::result::Result<T, DirectoryError>;

impl DirectoryError {
    /// Create a document store error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a URL signer error
    pub fn signer(message: impl Into<String>) -> Self {
        Self::Signer {
            message: message.into(),
        }
    }

    /// Create a local storage error
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn storage_quota_exceeded(key: impl Into<String>, size: usize, limit: usize) -> Self {
        Self::StorageQuotaExceeded {
            key: key.into(),
            size,
            limit,
        }
    }

    /// Create a cache serialization failed error
    pub fn cache_serialization_failed(source: serde_json::Error) -> Self {
        Self::CacheSerializationFailed { source }
    }

    /// Create a cache parse failed error
    pub fn cache_parse_failed(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CacheParseFailed {
            key: key.into(),
            source,
        }
    }

    pub fn data_root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DataRootNotFound { path: path.into() }
    }

    /// Create a food not found error
    pub fn food_not_found(name: impl Into<String>) -> Self {
        Self::FoodNotFound { name: name.into() }
    }

    pub fn unknown_letter(letter: char) -> Self {
        Self::UnknownLetter { letter }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn config_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_not_found_error() {
        let err = DirectoryError::food_not_found("Apple");
        assert_eq!(err.to_string(), "Food not found: Apple");
    }

    #[test]
    fn test_unknown_letter_error() {
        let err = DirectoryError::unknown_letter('I');
        assert_eq!(err.to_string(), "Letter 'I' is not part of the directory");
    }

    #[test]
    fn test_backend_error() {
        let err = DirectoryError::backend("timeout");
        assert!(err.to_string().contains("Document store query failed"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_storage_quota_exceeded() {
        let err = DirectoryError::storage_quota_exceeded("cachedFoodGroups", 2048, 1024);
        assert!(err.to_string().contains("cachedFoodGroups"));
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn test_cache_parse_failed() {
        // Create a JSON parse error by trying to parse invalid JSON
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json").unwrap_err();
        let err = DirectoryError::cache_parse_failed("cachedFoodGroups", json_err);
        assert!(err.to_string().contains("cachedFoodGroups"));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_config_read_failed() {
        let path = std::path::PathBuf::from("/test/config.json");
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = DirectoryError::config_read_failed(&path, io_err);
        assert!(err.to_string().contains("/test/config.json"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DirectoryError = io_err.into();
        assert!(matches!(err, DirectoryError::Io(_)));
    }
}
