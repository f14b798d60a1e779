//! YAML → flashcard package assembly.
//!
//! Loads one or more YAML question lists, tags each by its file name's
//! classification, renders and deduplicates the notes, and writes one
//! package through the deck/note/package API.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use genanki_rs::{Deck, Field, Model, Note, Package, Template};
use tracing::info;

use exam_core::deck::{self, DeckBuilder};
use exam_core::source::SourceMap;
use exam_core::types::Question;

#[derive(Args, Debug)]
pub struct BuildDeckArgs {
    /// YAML question list to include (repeatable)
    #[arg(long = "input-yaml", required = true)]
    pub input_yaml: Vec<PathBuf>,

    /// Directory containing the content-addressed question images
    #[arg(long)]
    pub input_image_dir: Option<PathBuf>,

    /// Path to write the flashcard package to
    #[arg(long)]
    pub output_apkg: PathBuf,
}

pub fn run(args: BuildDeckArgs) -> anyhow::Result<()> {
    let sources = SourceMap::default();
    let mut builder = DeckBuilder::new();

    for path in &args.input_yaml {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?;
        let tags = sources.lookup(stem)?.tags();
        let questions = Question::load_list(path)?;
        info!(file = %path.display(), count = questions.len(), "loaded questions");
        for question in &questions {
            builder.insert(deck::render(question, &tags)?);
        }
    }

    let media = builder.media();
    let mut media_files: Vec<String> = Vec::with_capacity(media.len());
    if !media.is_empty() {
        let image_dir = args
            .input_image_dir
            .as_ref()
            .context("--input-image-dir is required when questions reference images")?;
        for name in &media {
            let path = image_dir.join(name);
            media_files.push(
                path.to_str()
                    .with_context(|| format!("image path {} is not valid UTF-8", path.display()))?
                    .to_string(),
            );
        }
    }

    let model = note_model();
    let mut anki_deck = Deck::new(deck::DECK_ID, deck::DECK_NAME, "");
    let notes = builder.into_notes();
    info!(notes = notes.len(), media = media_files.len(), "assembling package");
    for card in &notes {
        let tags: Vec<&str> = card.tags.iter().map(String::as_str).collect();
        let note = Note::new_with_options(
            model.clone(),
            vec![card.question.as_str(), card.image.as_str(), card.answer.as_str()],
            None,
            Some(tags),
            Some(&card.guid),
        )?;
        anki_deck.add_note(note);
    }

    let mut package = Package::new(
        vec![anki_deck],
        media_files.iter().map(String::as_str).collect(),
    )?;
    let output = args
        .output_apkg
        .to_str()
        .context("output path is not valid UTF-8")?;
    package.write_to_file(output)?;
    info!(apkg = %args.output_apkg.display(), "wrote package");
    Ok(())
}

fn note_model() -> Model {
    Model::new(
        deck::MODEL_ID,
        deck::MODEL_NAME,
        vec![
            Field::new("Question"),
            Field::new("Question Image"),
            Field::new("Answer"),
        ],
        vec![Template::new("Card 1")
            .qfmt(deck::CARD_FRONT)
            .afmt(deck::CARD_BACK)],
    )
    .css(deck::CARD_CSS)
}
