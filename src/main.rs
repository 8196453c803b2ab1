use clap::{Parser, Subcommand};
use food_directory::commands::*;
use food_directory::core::{command_init::DirectoryCommandInit, print_error};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-directory")]
#[command(about = "Browse an alphabetical food-nutrition directory with cached images")]
#[command(version = "0.1.0")]
struct Cli {
    /// Data directory holding data/, food/ and storage/
    #[arg(long, value_name = "DIR")]
    data: PathBuf,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the directory and list loaded letters
    Load,
    /// Prefetch one letter and list its foods
    Letter {
        /// Directory letter (e.g., "B")
        letter: String,
    },
    /// Filter loaded foods by name
    Search {
        /// Case-insensitive name fragment
        key: String,
    },
    /// Show the nutrition tables of one food
    Detail {
        /// Food name
        name: String,
    },
    /// Compare the nutrition of two foods
    Compare {
        /// First food name
        first: String,
        /// Second food name
        second: String,
    },
    /// Inspect or clear the cached snapshot
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached snapshot
    Info,
    /// Remove the cached snapshot
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let context = match DirectoryCommandInit::initialize(&cli.data, cli.config.as_deref()) {
        Ok(context) => context,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Load => execute_load(&context).await,
        Commands::Letter { letter } => execute_letter(&context, &letter).await,
        Commands::Search { key } => execute_search(&context, &key).await,
        Commands::Detail { name } => execute_detail(&context, &name).await,
        Commands::Compare { first, second } => execute_compare(&context, &first, &second).await,
        Commands::Cache { action } => match action {
            CacheAction::Info => execute_cache_info(&context),
            CacheAction::Clear => execute_cache_clear(&context),
        },
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
