use crate::core::{
    command_init::DirectoryCommandContext,
    error::{DirectoryError, Result},
    output::print_bucket,
    prefetch::PrefetchOutcome,
    print_info, print_section_header,
};

pub async fn execute_letter(context: &DirectoryCommandContext, raw_letter: &str) -> Result<()> {
    let letter = context.parse_letter(raw_letter)?;
    let directory = &context.directory;

    directory.open().await?;
    match directory.prefetch_now(letter).await {
        PrefetchOutcome::UnknownLetter(letter) => return Err(DirectoryError::unknown_letter(letter)),
        PrefetchOutcome::LoadFailed(letter) => {
            return Err(DirectoryError::backend(format!("letter '{letter}' could not be loaded")))
        }
        PrefetchOutcome::Loaded(_) | PrefetchOutcome::Resolved { .. } => {}
    }
    directory.flush_updates();

    match directory.bucket(letter) {
        Some(bucket) => {
            print_section_header(&format!("Foods under {letter}"));
            print_bucket(&bucket, &directory.config().placeholder_image);
            println!();
        }
        None => print_info(&format!("No foods under letter {letter}.")),
    }
    Ok(())
}
