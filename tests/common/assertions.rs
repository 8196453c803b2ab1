//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating food-directory command output and error
//! messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for the styled error prefix and message
pub fn error_message(message: &str) -> impl Predicate<str> {
    predicates::str::contains("Error:").and(predicates::str::contains(message.to_string()))
}

/// Creates a predicate that checks a `[L] <n> items` line
pub fn has_letter_count(letter: char, count: usize) -> impl Predicate<str> {
    predicates::str::contains(format!("[{letter}] {count} items"))
}

/// Creates a predicate that checks a food line under its letter
pub fn has_food(letter: char, name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[{letter}] {name}"))
}

pub fn loaded_from_backend() -> impl Predicate<str> {
    predicates::str::contains("Directory loaded from data directory")
}

pub fn loaded_from_cache() -> impl Predicate<str> {
    predicates::str::contains("Directory loaded from cached snapshot")
}
