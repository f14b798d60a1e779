//! Error types for the extraction and deck-building pipeline.

use thiserror::Error;

/// Result type alias using PipelineError.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a conversion run.
///
/// Every variant is fatal: either a complete, consistent output file is
/// produced, or none is. Recoverable parse problems (a question whose
/// answer token never appeared) are logged instead and leave the
/// affected field unset.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown source document {0:?}")]
    UnknownSource(String),

    #[error("different number of questions and images: {questions} questions and {images} images")]
    ImageCountMismatch { questions: usize, images: usize },

    #[error("could not split multiple-choice question {0:?}")]
    MalformedChoices(String),

    #[error("no difficulty entry for {0}")]
    MissingDifficulty(String),

    #[error("unrecognized difficulty label {0:?}")]
    UnknownDifficultyLabel(String),

    #[error("malformed layout dump: {0}")]
    Layout(String),

    #[error("invalid denylist pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
