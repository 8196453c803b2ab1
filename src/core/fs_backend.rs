//! Filesystem-backed document store and URL signer.
//!
//! Serves a data directory laid out like the cloud collections:
//!
//! ```text
//! <root>/data/<L>.json          letter listing: { "_id": "A", "foodItems": ["Apple.json"] }
//! <root>/food/<name>.json       detail: { "name", "categoryLetter", "nutrition" }
//! <root>/storage/result/<L>/<name>.webp
//! ```
//!
//! Signed URLs are `file://` URLs carrying an `expires` query parameter.

use crate::core::backend::{DocumentStore, FoodDocument, LetterDocument, SignedUrl, UrlSigner};
use crate::core::error::{DirectoryError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SIGNED_URL_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
    storage_prefix: String,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>, storage_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            storage_prefix: storage_prefix.into(),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DirectoryError::backend(format!(
                "reading '{}': {e}",
                path.display()
            ))),
        }
    }

    fn storage_path(&self, object_id: &str) -> Option<PathBuf> {
        let relative = object_id
            .strip_prefix(self.storage_prefix.as_str())?
            .trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|part| part == "..") {
            return None;
        }
        Some(self.root.join("storage").join(relative))
    }

    async fn sign_one(&self, object_id: &str, expires: i64) -> SignedUrl {
        let Some(path) = self.storage_path(object_id) else {
            return SignedUrl::failed(object_id, "INVALID_FILE_ID");
        };

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                let absolute = std::path::absolute(&path).unwrap_or(path);
                SignedUrl::ok(
                    object_id,
                    format!("file://{}?expires={expires}", absolute.display()),
                )
            }
            Ok(false) => SignedUrl::failed(object_id, "STORAGE_FILE_NONEXIST"),
            Err(e) => SignedUrl::failed(object_id, e.to_string()),
        }
    }
}

#[async_trait]
impl DocumentStore for FsBackend {
    async fn find_letters(&self, letters: &[char]) -> Result<Vec<LetterDocument>> {
        let data_dir = self.root.join("data");
        if !tokio::fs::try_exists(&data_dir).await? {
            return Err(DirectoryError::backend(format!(
                "collection directory '{}' does not exist",
                data_dir.display()
            )));
        }

        let mut documents = Vec::new();
        for letter in letters {
            let path = data_dir.join(format!("{letter}.json"));
            if let Some(doc) = Self::read_json::<LetterDocument>(&path).await? {
                documents.push(doc);
            }
        }

        log::debug!(
            "FsBackend: {} of {} letter documents found",
            documents.len(),
            letters.len()
        );
        Ok(documents)
    }

    async fn find_food_by_name(&self, name: &str) -> Result<Option<FoodDocument>> {
        if name.contains('/') || name.contains("..") {
            return Ok(None);
        }
        let path = self.root.join("food").join(format!("{name}.json"));
        Self::read_json(&path).await
    }
}

#[async_trait]
impl UrlSigner for FsBackend {
    async fn get_temporary_urls(&self, object_ids: &[String]) -> Result<Vec<SignedUrl>> {
        let expires = chrono::Utc::now().timestamp_millis() + SIGNED_URL_LIFETIME.as_millis() as i64;

        let mut results = Vec::with_capacity(object_ids.len());
        for object_id in object_ids {
            results.push(self.sign_one(object_id, expires).await);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_data_root() -> Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("data"))?;
        fs::create_dir_all(root.join("food"))?;
        fs::create_dir_all(root.join("storage/result/A"))?;
        fs::write(
            root.join("data/A.json"),
            r#"{ "_id": "A", "foodItems": ["index.json", "Apple.json", "Avocado.json"] }"#,
        )?;
        fs::write(
            root.join("food/Apple.json"),
            r#"{ "name": "Apple", "categoryLetter": "A", "nutrition": { "main": { "Fat": "0.2g" } } }"#,
        )?;
        fs::write(root.join("storage/result/A/Apple.webp"), b"webp")?;
        Ok(temp_dir)
    }

    #[tokio::test]
    async fn test_find_letters_skips_missing_documents() -> Result<()> {
        let temp_dir = setup_data_root()?;
        let backend = FsBackend::new(temp_dir.path(), "cloud://test");

        let docs = backend.find_letters(&['A', 'B']).await?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].food_names(), vec!["Apple", "Avocado"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_collection_is_an_error() {
        let backend = FsBackend::new("/non/existent/root", "cloud://test");
        assert!(backend.find_letters(&['A']).await.is_err());
    }

    #[tokio::test]
    async fn test_find_food_by_name() -> Result<()> {
        let temp_dir = setup_data_root()?;
        let backend = FsBackend::new(temp_dir.path(), "cloud://test");

        let apple = backend.find_food_by_name("Apple").await?;
        assert_eq!(apple.map(|doc| doc.category_letter), Some("A".to_string()));
        assert!(backend.find_food_by_name("Banana").await?.is_none());
        assert!(backend.find_food_by_name("../food/Apple").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_signed_urls_report_per_id_failures() -> Result<()> {
        let temp_dir = setup_data_root()?;
        let backend = FsBackend::new(temp_dir.path(), "cloud://test");

        let ids = vec![
            "cloud://test/result/A/Apple.webp".to_string(),
            "cloud://test/result/A/Avocado.webp".to_string(),
            "elsewhere://A/Apple.webp".to_string(),
        ];
        let urls = backend.get_temporary_urls(&ids).await?;

        assert_eq!(urls.len(), 3);
        let first = urls[0].url.as_deref().unwrap_or_default();
        assert!(first.starts_with("file://"));
        assert!(first.contains("expires="));
        assert_eq!(urls[1].error.as_deref(), Some("STORAGE_FILE_NONEXIST"));
        assert_eq!(urls[2].error.as_deref(), Some("INVALID_FILE_ID"));
        Ok(())
    }
}
