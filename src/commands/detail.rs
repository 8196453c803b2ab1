use crate::core::{
    command_init::DirectoryCommandContext, error::Result, output::print_nutrient_table,
    print_info, print_section_header,
};
use colored::*;

pub async fn execute_detail(context: &DirectoryCommandContext, name: &str) -> Result<()> {
    let directory = &context.directory;
    directory.restore();

    let food = directory.food_details(name).await?;

    print_section_header(&food.name);
    let image = food.image_url.as_deref().filter(|url| !url.is_empty());
    println!(
        "  {}  {}",
        "Image".white(),
        image.unwrap_or(directory.config().default_image.as_str()).bright_black()
    );

    if food.nutrition.is_empty() {
        print_info("No nutrition data recorded.");
        return Ok(());
    }
    print_nutrient_table("Main", Some(&food.nutrition.main));
    print_nutrient_table("Vitamins", food.nutrition.vitamins.as_ref());
    print_nutrient_table("Minerals", food.nutrition.minerals.as_ref());
    println!();
    Ok(())
}
