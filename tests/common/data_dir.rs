//! On-disk data directories for CLI tests
//!
//! Lays out `data/`, `food/` and `storage/` the way the filesystem backend reads
//! them, plus isolated cache and config homes.

#![allow(dead_code)]

use food_directory::core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The TempDir must be kept alive for the duration of the test
pub struct TestDataDir {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub cache_home: PathBuf,
    pub config_home: PathBuf,
}

impl TestDataDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_letter(&self, letter: char, names: &[&str]) -> Result<()> {
        let items: Vec<String> = std::iter::once("index.json".to_string())
            .chain(names.iter().map(|n| format!("{n}.json")))
            .collect();
        let document = serde_json::json!({ "_id": letter.to_string(), "foodItems": items });
        fs::write(
            self.path.join("data").join(format!("{letter}.json")),
            serde_json::to_string_pretty(&document)?,
        )?;
        Ok(())
    }

    pub fn write_food(&self, name: &str, letter: char, main: &[(&str, &str)]) -> Result<()> {
        let main: serde_json::Map<String, serde_json::Value> = main
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        let document = serde_json::json!({
            "name": name,
            "categoryLetter": letter.to_string(),
            "nutrition": { "main": main },
        });
        fs::write(
            self.path.join("food").join(format!("{name}.json")),
            serde_json::to_string_pretty(&document)?,
        )?;
        Ok(())
    }

    pub fn write_image(&self, letter: char, name: &str) -> Result<()> {
        let dir = self.path.join("storage/result").join(letter.to_string());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.webp")), b"RIFF")?;
        Ok(())
    }
}

pub fn setup_data_dir() -> Result<TestDataDir> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("root");
    let cache_home = temp_dir.path().join("cache");
    let config_home = temp_dir.path().join("config");

    for dir in [path.join("data"), path.join("food"), cache_home.clone(), config_home.clone()] {
        fs::create_dir_all(dir)?;
    }

    Ok(TestDataDir {
        temp_dir,
        path,
        cache_home,
        config_home,
    })
}

/// Scenario: four letters of fruit, two detail documents and a few stored images
pub fn setup_fruit_data_dir() -> Result<TestDataDir> {
    let dir = setup_data_dir()?;
    dir.write_letter('A', &["Apple", "Apricot", "Avocado"])?;
    dir.write_letter('B', &["Banana", "Blueberry"])?;
    dir.write_letter('C', &["Cherry", "Carrot"])?;
    dir.write_letter('D', &["Date"])?;
    dir.write_food("Apple", 'A', &[("Energy", "218kJ(52kcal)"), ("Fat", "0.2g")])?;
    dir.write_food("Banana", 'B', &[("Energy", "371kJ(89kcal)"), ("Fat", "0.3g")])?;
    for (letter, name) in [('A', "Apple"), ('A', "Avocado"), ('B', "Banana"), ('C', "Cherry")] {
        dir.write_image(letter, name)?;
    }
    Ok(dir)
}
