//! Unified output formatting utilities for consistent CLI presentation.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, blue for names, bright_black for muted details
//! - **Standardized spacing**: Newline before and after all command outputs
//! - **Bracketed markers**: `[L]` letters, `[*]` selections and higher values

use crate::core::compare::NutrientRow;
use crate::core::state::{FoodItem, LetterBucket};
use colored::*;
use std::collections::BTreeMap;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Short label describing where an item's image currently comes from
pub fn image_label(food: &FoodItem, placeholder: &str) -> String {
    match food.image_url.as_deref() {
        _ if food.is_local_asset => "local".to_string(),
        None | Some("") => "none".to_string(),
        Some(url) if url == placeholder => "pending".to_string(),
        Some(url) => url.to_string(),
    }
}

/// Prints one bucket as `[L] name  image` lines
pub fn print_bucket(bucket: &LetterBucket, placeholder: &str) {
    for food in &bucket.foods {
        println!(
            "{}{}{} {}  {}",
            "[".bright_black(),
            bucket.letter.to_string().white(),
            "]".bright_black(),
            food.name.blue(),
            image_label(food, placeholder).bright_black()
        );
    }
}

/// Prints a nutrient table, skipping it when absent or empty
pub fn print_nutrient_table(title: &str, table: Option<&BTreeMap<String, String>>) {
    let Some(table) = table.filter(|t| !t.is_empty()) else {
        return;
    };

    print_section_header(title);
    let width = table.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, value) in table {
        println!("  {:<width$}  {}", key.white(), value.blue());
    }
}

/// Prints comparison rows, marking the higher side with `[*]`
pub fn print_comparison_rows(title: &str, rows: &[NutrientRow]) {
    if rows.is_empty() {
        return;
    }

    print_section_header(title);
    let width = rows.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|r| r.first_value.chars().count() + 4)
        .max()
        .unwrap_or(0);
    for row in rows {
        let first = marked(&row.first_value, row.first_higher);
        let second = marked(&row.second_value, row.second_higher);
        println!("  {:<width$}  {:<value_width$}  {}", row.key.white(), first, second);
    }
}

fn marked(value: &str, higher: bool) -> String {
    if higher {
        format!("{} {}", value, "[*]".green())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_functions_do_not_panic() {
        print_error("Test error message");
        print_success("Operation completed");
        print_info("Information message");
        print_section_header("Letters");
    }

    #[test]
    fn test_image_label() {
        let placeholder = "/images/placeholder.png";
        let mut food = FoodItem::remote('A', "Apple", "obj", placeholder);
        assert_eq!(image_label(&food, placeholder), "pending");

        food.image_url = Some("file:///tmp/Apple.webp".to_string());
        assert_eq!(image_label(&food, placeholder), "file:///tmp/Apple.webp");

        food.image_url = None;
        assert_eq!(image_label(&food, placeholder), "none");

        let local = FoodItem::local('B', "Bean", "/images/foods/B/Bean.webp");
        assert_eq!(image_label(&local, placeholder), "local");
    }

    #[test]
    fn test_marked_value() {
        colored::control::set_override(false);
        assert_eq!(marked("5g", true), "5g [*]");
        assert_eq!(marked("5g", false), "5g");
    }
}
