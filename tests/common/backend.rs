//! Counting in-memory backend
//!
//! Implements both collaborator traits and records every call so tests can assert
//! on query counts, signed object ids and failure handling.

#![allow(dead_code)]

use async_trait::async_trait;
use food_directory::core::backend::{
    DocumentStore, FoodDocument, LetterDocument, SignedUrl, UrlSigner,
};
use food_directory::core::error::{DirectoryError, Result};
use food_directory::core::state::Nutrition;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct MockBackend {
    letters: BTreeMap<char, Vec<String>>,
    foods: HashMap<String, FoodDocument>,
    sign_delay: Option<Duration>,
    failing_objects: Mutex<HashSet<String>>,
    fail_letter_queries: AtomicBool,
    pub letter_queries: Mutex<Vec<Vec<char>>>,
    pub food_queries: Mutex<Vec<String>>,
    pub sign_calls: Mutex<Vec<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_letter(mut self, letter: char, names: &[&str]) -> Self {
        self.letters
            .insert(letter, names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// `count` generated foods named `<L>food<i>`
    pub fn with_generated_letter(mut self, letter: char, count: usize) -> Self {
        self.letters.insert(
            letter,
            (0..count).map(|i| format!("{letter}food{i}")).collect(),
        );
        self
    }

    pub fn with_food(mut self, name: &str, letter: char, main: &[(&str, &str)]) -> Self {
        let nutrition = Nutrition {
            main: main
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            vitamins: None,
            minerals: None,
        };
        self.foods.insert(
            name.to_string(),
            FoodDocument {
                name: name.to_string(),
                category_letter: letter.to_string(),
                nutrition,
            },
        );
        self
    }

    pub fn with_sign_delay(mut self, delay: Duration) -> Self {
        self.sign_delay = Some(delay);
        self
    }

    pub fn fail_object(&self, object_id: &str) {
        self.failing_objects.lock().insert(object_id.to_string());
    }

    pub fn set_letter_failure(&self, fail: bool) {
        self.fail_letter_queries.store(fail, Ordering::SeqCst);
    }

    pub fn letter_query_count(&self) -> usize {
        self.letter_queries.lock().len()
    }

    pub fn sign_call_count(&self) -> usize {
        self.sign_calls.lock().len()
    }

    pub fn signed_ids(&self) -> Vec<String> {
        self.sign_calls.lock().iter().flatten().cloned().collect()
    }

    /// Number of object ids under `result/<letter>/` sent to the signer
    pub fn signed_for_letter(&self, letter: char) -> usize {
        let marker = format!("/result/{letter}/");
        self.signed_ids()
            .iter()
            .filter(|id| id.contains(&marker))
            .count()
    }
}

#[async_trait]
impl DocumentStore for MockBackend {
    async fn find_letters(&self, letters: &[char]) -> Result<Vec<LetterDocument>> {
        self.letter_queries.lock().push(letters.to_vec());
        if self.fail_letter_queries.load(Ordering::SeqCst) {
            return Err(DirectoryError::backend("simulated outage"));
        }

        Ok(letters
            .iter()
            .filter_map(|letter| {
                self.letters.get(letter).map(|names| LetterDocument {
                    id: letter.to_string(),
                    food_items: Some(
                        std::iter::once("index.json".to_string())
                            .chain(names.iter().map(|n| format!("{n}.json")))
                            .collect(),
                    ),
                })
            })
            .collect())
    }

    async fn find_food_by_name(&self, name: &str) -> Result<Option<FoodDocument>> {
        self.food_queries.lock().push(name.to_string());
        Ok(self.foods.get(name).cloned())
    }
}

#[async_trait]
impl UrlSigner for MockBackend {
    async fn get_temporary_urls(&self, object_ids: &[String]) -> Result<Vec<SignedUrl>> {
        self.sign_calls.lock().push(object_ids.to_vec());
        if let Some(delay) = self.sign_delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self.failing_objects.lock().clone();
        Ok(object_ids
            .iter()
            .map(|id| {
                if failing.contains(id) {
                    SignedUrl::failed(id.clone(), "STORAGE_FILE_NONEXIST")
                } else {
                    SignedUrl::ok(id.clone(), signed_url(id))
                }
            })
            .collect())
    }
}

pub fn signed_url(object_id: &str) -> String {
    format!("https://signed.example/{object_id}")
}
