//! CLI subcommands.

pub mod build_deck;
pub mod extract;
pub mod import_difficulty;
