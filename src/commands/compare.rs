use crate::core::{
    command_init::DirectoryCommandContext, error::Result, output::print_comparison_rows,
    print_section_header,
};
use colored::*;

pub async fn execute_compare(
    context: &DirectoryCommandContext,
    first: &str,
    second: &str,
) -> Result<()> {
    let directory = &context.directory;
    directory.restore();

    let comparison = directory.compare(first, second).await?;

    print_section_header(&format!(
        "{} {} {}",
        comparison.first.name.blue(),
        "vs".bright_black(),
        comparison.second.name.blue()
    ));
    print_comparison_rows("Main", &comparison.main);
    print_comparison_rows("Vitamins", &comparison.vitamins);
    print_comparison_rows("Minerals", &comparison.minerals);
    println!();
    Ok(())
}
