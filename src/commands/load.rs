use crate::core::{
    command_init::DirectoryCommandContext, directory::LoadSource, error::Result, print_info,
    print_section_header, print_success,
};
use colored::*;

pub async fn execute_load(context: &DirectoryCommandContext) -> Result<()> {
    let directory = &context.directory;
    let source = directory.open().await?;
    directory.flush_updates();

    let origin = match source {
        LoadSource::Cache => "cached snapshot",
        LoadSource::Backend => "data directory",
    };
    print_success(&format!("Directory loaded from {origin}"));

    let view = directory.view();
    if view.all.is_empty() {
        print_info("No foods found in the loaded letters.");
        return Ok(());
    }

    print_section_header("Letters");
    for bucket in &view.all {
        println!(
            "{}{}{} {} {}",
            "[".bright_black(),
            bucket.letter.to_string().white(),
            "]".bright_black(),
            bucket.foods.len().to_string().blue(),
            "items".bright_black()
        );
    }
    println!();

    let stats = directory.limiter_stats();
    log::debug!(
        "Limiter: {} requests completed, peak concurrency {}",
        stats.completed,
        stats.peak_in_flight
    );
    Ok(())
}
