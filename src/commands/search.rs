use crate::core::{
    command_init::DirectoryCommandContext, error::Result, output::print_bucket, print_info,
    print_section_header,
};

/// Filters the loaded letters by name; letters are loaded by `open` and prefetching
pub async fn execute_search(context: &DirectoryCommandContext, key: &str) -> Result<()> {
    let directory = &context.directory;
    directory.open().await?;

    let results = directory.search(key).await;
    directory.flush_updates();

    if results.is_empty() {
        print_info(&format!("No foods match '{key}'."));
        return Ok(());
    }

    let matches: usize = results.iter().map(|bucket| bucket.foods.len()).sum();
    print_section_header(&format!("{matches} matches for '{key}'"));
    let placeholder = &directory.config().placeholder_image;
    for bucket in directory.view().filtered {
        print_bucket(&bucket, placeholder);
    }
    println!();
    Ok(())
}
