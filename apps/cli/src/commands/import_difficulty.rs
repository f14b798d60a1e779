//! Difficulty import: join an exported deck listing onto YAML files.
//!
//! The listing is tab-separated with the question identifier
//! (`<document-id>-<zero-padded-number>`) in the first column and the
//! difficulty label in the last; an empty label means unrated. Only
//! entries still marked unknown are touched, and a missing identifier
//! aborts the run before anything is rewritten.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use exam_core::error::PipelineError;
use exam_core::types::{Difficulty, Question};

#[derive(Args, Debug)]
pub struct ImportDifficultyArgs {
    /// Tab-separated listing exported from the study app
    #[arg(long)]
    pub input: PathBuf,

    /// YAML files to update in place
    #[arg(long = "yamls", required = true)]
    pub yamls: Vec<PathBuf>,
}

pub fn run(args: ImportDifficultyArgs) -> anyhow::Result<()> {
    let listing = fs::read_to_string(&args.input)?;
    let ratings = parse_listing(&listing)?;

    for path in &args.yamls {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?;
        let mut questions = Question::load_list(path)?;
        let mut updated = 0usize;
        for question in &mut questions {
            if question.difficulty != Difficulty::Unknown {
                continue;
            }
            let id = format!("{}-{:03}", stem, question.number);
            let rating = ratings
                .get(&id)
                .copied()
                .ok_or(PipelineError::MissingDifficulty(id))?;
            question.difficulty = rating;
            updated += 1;
        }
        Question::save_list(&questions, path)?;
        info!(file = %path.display(), updated, "updated difficulty ratings");
    }
    Ok(())
}

fn parse_listing(listing: &str) -> anyhow::Result<HashMap<String, Difficulty>> {
    let mut ratings = HashMap::new();
    for line in listing.lines() {
        let id = line.split('\t').next().unwrap_or_default();
        if id.is_empty() {
            continue;
        }
        let label = line.split('\t').next_back().unwrap_or_default();
        let difficulty = if label.is_empty() {
            Difficulty::Unknown
        } else {
            Difficulty::from_label(label)
                .ok_or_else(|| PipelineError::UnknownDifficultyLabel(label.to_string()))?
        };
        ratings.insert(id.to_string(), difficulty);
    }
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_keeps_first_column_id_and_last_column_label() {
        let listing = "english-moto-signs-true-001\tfront text\teasy\n\
                       english-moto-signs-true-002\tfront text\t\n";
        let ratings = parse_listing(listing).unwrap();
        assert_eq!(
            ratings.get("english-moto-signs-true-001"),
            Some(&Difficulty::Easy)
        );
        assert_eq!(
            ratings.get("english-moto-signs-true-002"),
            Some(&Difficulty::Unknown)
        );
    }

    #[test]
    fn unrecognized_labels_are_fatal() {
        assert!(parse_listing("id-001\twhatever\ttricky\n").is_err());
    }

    #[test]
    fn already_rated_entries_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("english-moto-signs-true.yaml");
        let questions = vec![
            Question {
                question: "rated".to_string(),
                number: 1,
                difficulty: Difficulty::Hard,
                ..Question::default()
            },
            Question {
                question: "unrated".to_string(),
                number: 2,
                ..Question::default()
            },
        ];
        Question::save_list(&questions, &yaml).unwrap();

        let listing = dir.path().join("All Decks.txt");
        fs::write(&listing, "english-moto-signs-true-002\tx\tmedium\n").unwrap();

        run(ImportDifficultyArgs {
            input: listing,
            yamls: vec![yaml.clone()],
        })
        .unwrap();

        let back = Question::load_list(&yaml).unwrap();
        assert_eq!(back[0].difficulty, Difficulty::Hard);
        assert_eq!(back[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn missing_identifiers_abort_the_update() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("english-moto-signs-true.yaml");
        let questions = vec![Question {
            question: "unrated".to_string(),
            number: 7,
            ..Question::default()
        }];
        Question::save_list(&questions, &yaml).unwrap();

        let listing = dir.path().join("All Decks.txt");
        fs::write(&listing, "some-other-id-001\tx\teasy\n").unwrap();

        let err = run(ImportDifficultyArgs {
            input: listing,
            yamls: vec![yaml.clone()],
        })
        .unwrap_err();
        assert!(err.to_string().contains("english-moto-signs-true-007"));

        // nothing was rewritten
        let back = Question::load_list(&yaml).unwrap();
        assert_eq!(back[0].difficulty, Difficulty::Unknown);
    }
}
