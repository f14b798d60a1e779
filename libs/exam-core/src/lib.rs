//! Core library for turning published exam question banks into
//! spaced-repetition decks.
//!
//! Provides:
//! - Reader for the layout-extraction tool's positioned-text dumps
//! - The layout-to-question state machine
//! - The shared question record model and its YAML form
//! - Fingerprint-based difficulty carry-over between document revisions
//! - Content-addressed question-image storage
//! - Flashcard rendering with guid-based deduplication

pub mod deck;
pub mod error;
pub mod images;
pub mod layout;
pub mod matching;
pub mod parser;
pub mod source;
pub mod types;

pub use deck::{DeckBuilder, Flashcard};
pub use error::{PipelineError, Result};
pub use layout::{parse_layout, Page, TextRun};
pub use matching::{fingerprint, DifficultyIndex};
pub use parser::{normalize_question_text, LayoutParser, ParserConfig};
pub use source::{SourceKind, SourceMap};
pub use types::{Answer, Difficulty, Question};
