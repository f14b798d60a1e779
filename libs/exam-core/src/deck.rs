//! Flashcard rendering and deck assembly.
//!
//! Question records become rendered notes: the body is HTML-escaped,
//! multiple-choice bodies are split into answer-revealing spans, and
//! each note gets a deterministic content-based guid. Notes sharing a
//! guid across input files merge into one, unioning their tags.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::types::Question;

/// Stable model identifier. Never change it: scheduling history in the
/// study app is keyed to it.
pub const MODEL_ID: i64 = 1670705034;
/// Stable deck identifier.
pub const DECK_ID: i64 = 1395868281;

pub const MODEL_NAME: &str = "Taiwan Driver's License";
pub const DECK_NAME: &str = "Taiwan Driver's License Written Test";

/// Card front: the optional image, then the question body.
pub const CARD_FRONT: &str = "\
{{#Question Image}}
  {{Question Image}}
  <br>
{{/Question Image}}
{{Question}}";

/// Card back: the front plus answer blocks whose visibility is gated by
/// the `reveal-answer-*` class derived from the Answer field.
pub const CARD_BACK: &str = "\
<span class=\"reveal-answer-{{Answer}}\">
  {{FrontSide}}
  <span class='answer-O'>
    <hr id=answer>
    <div style=\"font-weight: bold\">O (True)</div>
  </span>
  <span class='answer-X'>
    <hr id=answer>
    <div style=\"font-weight: bold\">X (False)</div>
  </span>
</span>";

pub const CARD_CSS: &str = "\
.card {
  font-family: arial;
  font-size: 20px;
  text-align: center;
  color: black;
  background-color: white;
}

.reveal-answer-1 .answer-1, .reveal-answer-2 .answer-2, .reveal-answer-3 .answer-3 {
  font-weight: bold;
  color: blue;
}

.nightMode .reveal-answer-1 .answer-1, .nightMode .reveal-answer-2 .answer-2, .nightMode .reveal-answer-3 .answer-3 {
  color: lightblue;
}

.answer-O, .answer-X {
  display: none;
}

.reveal-answer-O .answer-O, .reveal-answer-X .answer-X {
  display: block;
}";

lazy_static! {
    static ref CHOICE_SPLIT: Regex = Regex::new(r"\([1-3]\)").unwrap();
}

/// A rendered flashcard record: the three model fields plus identity and
/// tags. Never mutated after rendering, except for tag accumulation
/// during deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub guid: String,
    pub question: String,
    pub image: String,
    pub answer: String,
    pub tags: Vec<String>,
    /// Media file referenced by the image field, if any.
    pub image_file: Option<String>,
}

/// Render one question record into a flashcard.
///
/// Multiple-choice bodies split on their `(1)`/`(2)`/`(3)` markers;
/// anything other than exactly three beyond the leading segment is a
/// fatal formatting error for the run. True/false bodies pass through
/// escaped. `tags` are the per-file classification tags; the difficulty
/// tag always comes first.
pub fn render(question: &Question, tags: &[String]) -> Result<Flashcard> {
    let escaped = escape_html(&question.question);
    let body = match question.answer {
        Some(answer) if answer.is_choice() => render_choices(&escaped, &question.question)?,
        Some(_) => escaped,
        None => {
            warn!(
                number = question.number,
                "question has no answer; its card will never reveal one"
            );
            escaped
        }
    };
    let image = match &question.question_image {
        Some(name) => format!(r#"<img src="{name}">"#),
        None => String::new(),
    };
    let answer = question
        .answer
        .map(|a| a.as_str().to_string())
        .unwrap_or_default();

    let mut all_tags = vec![question.difficulty.as_str().to_string()];
    for tag in tags {
        if !all_tags.contains(tag) {
            all_tags.push(tag.clone());
        }
    }

    Ok(Flashcard {
        guid: note_guid(&body, &image, &answer),
        question: body,
        image,
        answer,
        tags: all_tags,
        image_file: question.question_image.clone(),
    })
}

fn render_choices(escaped: &str, original: &str) -> Result<String> {
    let mut pieces: Vec<String> = CHOICE_SPLIT.split(escaped).map(str::to_string).collect();
    if pieces.len() != 4 {
        return Err(PipelineError::MalformedChoices(original.to_string()));
    }
    for choice in 1..=3 {
        let wrapped = format!(
            r#"<span class="answer-{}">({}){}</span>"#,
            choice, choice, pieces[choice]
        );
        pieces[choice] = wrapped;
    }
    if pieces[0].trim().is_empty() {
        pieces.remove(0);
    }
    Ok(pieces.join("<br>"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Deterministic note identity: SHA-256 over the model id and the three
/// rendered field values, truncated to 16 hex digits.
pub fn note_guid(question: &str, image: &str, answer: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(MODEL_ID.to_string());
    for field in [question, image, answer] {
        hasher.update([0x1f]);
        hasher.update(field.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Accumulates rendered flashcards, merging records that share a guid:
/// the first occurrence is stored, later ones contribute only new tags.
#[derive(Debug, Default)]
pub struct DeckBuilder {
    order: Vec<String>,
    notes: HashMap<String, Flashcard>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: Flashcard) {
        match self.notes.get_mut(&card.guid) {
            Some(existing) => {
                for tag in card.tags {
                    if !existing.tags.contains(&tag) {
                        existing.tags.push(tag);
                    }
                }
            }
            None => {
                self.order.push(card.guid.clone());
                self.notes.insert(card.guid.clone(), card);
            }
        }
    }

    /// Number of distinct notes collected so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Deduplicated media file names referenced by the collected notes,
    /// in first-seen order.
    pub fn media(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for guid in &self.order {
            if let Some(name) = self.notes.get(guid).and_then(|n| n.image_file.as_deref()) {
                if !seen.iter().any(|s| s == name) {
                    seen.push(name.to_string());
                }
            }
        }
        seen
    }

    /// The merged notes, in first-seen order.
    pub fn into_notes(mut self) -> Vec<Flashcard> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|guid| self.notes.remove(&guid))
            .collect()
    }
}
