use crate::core::{
    command_init::DirectoryCommandContext, error::Result, print_info, print_section_header,
    print_success,
};
use chrono::{DateTime, Utc};
use colored::*;

pub fn execute_cache_info(context: &DirectoryCommandContext) -> Result<()> {
    let Some(snapshot) = context.directory.cached_snapshot() else {
        print_info("No fresh cached snapshot.");
        return Ok(());
    };

    let captured = DateTime::<Utc>::from_timestamp_millis(snapshot.captured_at)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| snapshot.captured_at.to_string());
    let letters: String = snapshot.letters().into_iter().collect();

    print_section_header("Cached snapshot");
    println!("  {}  {}", "Location".white(), context.cache_dir.display().to_string().bright_black());
    println!("  {}  {}", "Captured".white(), captured.blue());
    println!("  {}   {}", "Letters".white(), letters.blue());
    println!("  {}     {}", "Items".white(), snapshot.item_count().to_string().blue());
    println!();
    Ok(())
}

pub fn execute_cache_clear(context: &DirectoryCommandContext) -> Result<()> {
    context.directory.clear_cache()?;
    print_success("Cache cleared");
    println!();
    Ok(())
}
