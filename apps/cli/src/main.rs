//! Command line tools for converting Taiwan driver's-license exam
//! question banks into YAML records and spaced-repetition decks.
//!
//! ```bash
//! # PDF → YAML (carrying ratings over from the previous revision)
//! thb-flashcards extract --input-pdf 機車法規是非題-中文.pdf \
//!     --existing-yaml old/chinese-moto-rules-true.yaml \
//!     --output-yaml chinese-moto-rules-true.yaml
//!
//! # YAML files → one Anki package
//! thb-flashcards build-deck --input-yaml chinese-moto-rules-true.yaml \
//!     --input-yaml chinese-moto-rules-choice.yaml --output-apkg taiwan.apkg
//!
//! # Merge difficulty ratings exported from the study app
//! thb-flashcards import-difficulty --input "All Decks.txt" \
//!     --yamls english-moto-signs-true.yaml
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "thb-flashcards")]
#[command(version, about = "Convert thb.gov.tw question-bank PDFs into YAML and flashcard decks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a question-bank PDF into a YAML question list
    Extract(commands::extract::ExtractArgs),
    /// Build a flashcard package from one or more YAML question lists
    BuildDeck(commands::build_deck::BuildDeckArgs),
    /// Copy difficulty ratings from an exported deck listing into YAML files, in place
    ImportDifficulty(commands::import_difficulty::ImportDifficultyArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::BuildDeck(args) => commands::build_deck::run(args),
        Commands::ImportDifficulty(args) => commands::import_difficulty::run(args),
    }
}
