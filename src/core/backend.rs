//! Collaborator seams: the document store, the signed-URL service and local storage.
//!
//! The directory only consumes these interfaces. Implementations are swappable:
//! [`crate::core::fs_backend::FsBackend`] serves a data directory from disk, the
//! stores in [`crate::core::local`] back the persisted snapshot, and tests plug in
//! counting mocks.

use crate::core::error::Result;
use crate::core::state::Nutrition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-letter listing document, keyed by the letter itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing file names such as `"Apple.json"`; absent on malformed documents
    #[serde(rename = "foodItems", default)]
    pub food_items: Option<Vec<String>>,
}

impl LetterDocument {
    /// Food names in listing order, skipping the `index.json` entry
    pub fn food_names(&self) -> Vec<String> {
        self.food_items
            .iter()
            .flatten()
            .filter(|file| !file.eq_ignore_ascii_case("index.json"))
            .map(|file| file.strip_suffix(".json").unwrap_or(file).to_string())
            .collect()
    }
}

/// Detail document holding one food's nutrition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDocument {
    pub name: String,
    pub category_letter: String,
    #[serde(default)]
    pub nutrition: Nutrition,
}

/// One entry of a batched signed-URL response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub object_id: String,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl SignedUrl {
    pub fn ok(object_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            url: Some(url.into()),
            error: None,
        }
    }

    pub fn failed(object_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            url: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the listing documents for all given letters in one query
    async fn find_letters(&self, letters: &[char]) -> Result<Vec<LetterDocument>>;

    /// Look up a food's detail document by name
    async fn find_food_by_name(&self, name: &str) -> Result<Option<FoodDocument>>;
}

#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Mint time-limited URLs for a batch of storage object ids
    async fn get_temporary_urls(&self, object_ids: &[String]) -> Result<Vec<SignedUrl>>;
}

/// Synchronous key-value storage used for the persisted snapshot
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_names_skip_index_and_strip_suffix() {
        let doc = LetterDocument {
            id: "A".to_string(),
            food_items: Some(vec![
                "index.json".to_string(),
                "Apple.json".to_string(),
                "INDEX.JSON".to_string(),
                "Apricot.json".to_string(),
            ]),
        };
        assert_eq!(doc.food_names(), vec!["Apple", "Apricot"]);
    }

    #[test]
    fn test_missing_food_items_means_no_names() -> std::result::Result<(), serde_json::Error> {
        let doc: LetterDocument = serde_json::from_str(r#"{ "_id": "Q" }"#)?;
        assert!(doc.food_items.is_none());
        assert!(doc.food_names().is_empty());
        Ok(())
    }

    #[test]
    fn test_food_document_shape() -> std::result::Result<(), serde_json::Error> {
        let doc: FoodDocument = serde_json::from_str(
            r#"{ "name": "Apple", "categoryLetter": "A",
                 "nutrition": { "main": { "Energy": "218kJ(52kcal)" } } }"#,
        )?;
        assert_eq!(doc.category_letter, "A");
        assert_eq!(doc.nutrition.main.get("Energy").map(String::as_str), Some("218kJ(52kcal)"));
        assert!(doc.nutrition.vitamins.is_none());
        Ok(())
    }
}
