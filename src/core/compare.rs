//! Side-by-side nutrient comparison of two foods.
//!
//! Values are display strings such as `"218kJ(52kcal)"` or `"1.2g"`; the first
//! decimal number in the string is what gets compared.

use crate::core::state::FoodItem;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// One side is "higher" only when it exceeds the other by this factor
pub const HIGHER_FACTOR: f64 = 1.2;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("number pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRow {
    pub key: String,
    pub first_value: String,
    pub second_value: String,
    pub first_higher: bool,
    pub second_higher: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionComparison {
    pub first: FoodItem,
    pub second: FoodItem,
    pub main: Vec<NutrientRow>,
    pub vitamins: Vec<NutrientRow>,
    pub minerals: Vec<NutrientRow>,
}

pub fn parse_nutrient_value(value: &str) -> Option<f64> {
    NUMBER.find(value)?.as_str().parse().ok()
}

pub fn compare_nutrition(first: FoodItem, second: FoodItem) -> NutritionComparison {
    let (a, b) = (&first.nutrition, &second.nutrition);
    let main = compare_category(Some(&a.main), Some(&b.main));
    let vitamins = compare_category(a.vitamins.as_ref(), b.vitamins.as_ref());
    let minerals = compare_category(a.minerals.as_ref(), b.minerals.as_ref());

    NutritionComparison {
        first,
        second,
        main,
        vitamins,
        minerals,
    }
}

fn compare_category(
    first: Option<&BTreeMap<String, String>>,
    second: Option<&BTreeMap<String, String>>,
) -> Vec<NutrientRow> {
    let keys: BTreeSet<&String> = first
        .into_iter()
        .chain(second)
        .flat_map(|table| table.keys())
        .collect();

    keys.into_iter()
        .map(|key| {
            let first_value = value_or_zero(first, key);
            let second_value = value_or_zero(second, key);
            let (first_higher, second_higher) = higher_side(
                parse_nutrient_value(&first_value),
                parse_nutrient_value(&second_value),
            );
            NutrientRow {
                key: key.clone(),
                first_value,
                second_value,
                first_higher,
                second_higher,
            }
        })
        .collect()
}

fn value_or_zero(table: Option<&BTreeMap<String, String>>, key: &str) -> String {
    table
        .and_then(|t| t.get(key))
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| "0".to_string())
}

fn higher_side(first: Option<f64>, second: Option<f64>) -> (bool, bool) {
    match (first, second) {
        (Some(a), Some(b)) if a > b * HIGHER_FACTOR => (true, false),
        (Some(a), Some(b)) if b > a * HIGHER_FACTOR => (false, true),
        (Some(_), Some(_)) => (false, false),
        (Some(a), None) => (a > 0.0, false),
        (None, Some(b)) => (false, b > 0.0),
        (None, None) => (false, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Nutrition;

    fn food(name: &str, main: &[(&str, &str)], vitamins: Option<&[(&str, &str)]>) -> FoodItem {
        let table = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        let mut item = FoodItem::remote('A', name, "obj", "/p.png");
        item.nutrition = Nutrition {
            main: table(main),
            vitamins: vitamins.map(table),
            minerals: None,
        };
        item
    }

    #[test]
    fn test_parse_takes_first_number() {
        assert_eq!(parse_nutrient_value("218kJ(52kcal)"), Some(218.0));
        assert_eq!(parse_nutrient_value("1.25g"), Some(1.25));
        assert_eq!(parse_nutrient_value("trace"), None);
        assert_eq!(parse_nutrient_value(""), None);
    }

    #[test]
    fn test_threshold_is_twenty_percent() {
        let a = food("Apple", &[("Fat", "1.2g"), ("Fiber", "2.5g"), ("Sugar", "10g")], None);
        let b = food("Banana", &[("Fat", "1g"), ("Fiber", "2.0g"), ("Sugar", "13g")], None);

        let result = compare_nutrition(a, b);
        let rows: Vec<(&str, bool, bool)> = result
            .main
            .iter()
            .map(|r| (r.key.as_str(), r.first_higher, r.second_higher))
            .collect();
        // 1.2 is not above 1.0 * 1.2; 2.5 is above 2.4; 13 is above 12
        assert_eq!(
            rows,
            vec![("Fat", false, false), ("Fiber", true, false), ("Sugar", false, true)]
        );
    }

    #[test]
    fn test_missing_keys_read_as_zero() {
        let a = food("Apple", &[("Fat", "0.2g")], Some(&[("C", "4mg")]));
        let b = food("Beef", &[("Protein", "26g")], None);

        let result = compare_nutrition(a, b);
        assert_eq!(result.main.len(), 2);
        let protein = &result.main[1];
        assert_eq!(protein.key, "Protein");
        assert_eq!(protein.first_value, "0");
        assert!(protein.second_higher);

        assert_eq!(result.vitamins.len(), 1);
        assert_eq!(result.vitamins[0].second_value, "0");
        assert!(result.vitamins[0].first_higher);
        assert!(result.minerals.is_empty());
    }

    #[test]
    fn test_one_sided_parse() {
        assert_eq!(higher_side(Some(3.0), None), (true, false));
        assert_eq!(higher_side(Some(0.0), None), (false, false));
        assert_eq!(higher_side(None, Some(1.0)), (false, true));
        assert_eq!(higher_side(None, None), (false, false));
    }
}
