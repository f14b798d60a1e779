//! Classification of published question-bank documents.
//!
//! The licensing authority publishes one PDF per combination of vehicle
//! class, subject, question style, and language, named with a Chinese
//! (or mixed) label. Everything downstream keys off the canonical
//! 4-tuple, so unknown names fail fatally rather than guessing.

use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Vehicle class a document applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vehicle {
    Car,
    Moto,
}

impl Vehicle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Moto => "moto",
        }
    }
}

/// Whether a document covers road rules or sign recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Rules,
    Signs,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Signs => "signs",
        }
    }
}

/// Question style used throughout a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    TrueFalse,
    Choice,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrueFalse => "true",
            Self::Choice => "choice",
        }
    }
}

/// Language the document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Chinese,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chinese => "chinese",
            Self::English => "english",
        }
    }
}

/// Canonical classification of one published document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceKind {
    pub vehicle: Vehicle,
    pub subject: Subject,
    pub kind: QuestionKind,
    pub language: Language,
}

impl SourceKind {
    const fn new(vehicle: Vehicle, subject: Subject, kind: QuestionKind, language: Language) -> Self {
        Self {
            vehicle,
            subject,
            kind,
            language,
        }
    }

    /// Stable identifier used for work directories and image names.
    pub fn file_id(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.language.as_str(),
            self.vehicle.as_str(),
            self.subject.as_str(),
            self.kind.as_str()
        )
    }

    /// Classification tags attached to every note built from this document.
    pub fn tags(&self) -> Vec<String> {
        vec![
            self.vehicle.as_str().to_string(),
            self.subject.as_str().to_string(),
            self.kind.as_str().to_string(),
        ]
    }
}

/// The published document names and their classifications.
const PUBLISHED: &[(&str, SourceKind)] = &[
    (
        "機車法規是非題-中文",
        SourceKind::new(Vehicle::Moto, Subject::Rules, QuestionKind::TrueFalse, Language::Chinese),
    ),
    (
        "機車法規選擇題-中文",
        SourceKind::new(Vehicle::Moto, Subject::Rules, QuestionKind::Choice, Language::Chinese),
    ),
    (
        "機車標誌是非題-中文",
        SourceKind::new(Vehicle::Moto, Subject::Signs, QuestionKind::TrueFalse, Language::Chinese),
    ),
    (
        "機車標誌選擇題-中文",
        SourceKind::new(Vehicle::Moto, Subject::Signs, QuestionKind::Choice, Language::Chinese),
    ),
    (
        "汽車標誌是非題-中文",
        SourceKind::new(Vehicle::Car, Subject::Signs, QuestionKind::TrueFalse, Language::Chinese),
    ),
    (
        "汽車標誌選擇題-中文",
        SourceKind::new(Vehicle::Car, Subject::Signs, QuestionKind::Choice, Language::Chinese),
    ),
    (
        "汽車法規是非題-中文",
        SourceKind::new(Vehicle::Car, Subject::Rules, QuestionKind::TrueFalse, Language::Chinese),
    ),
    (
        "汽車法規選擇題-中文",
        SourceKind::new(Vehicle::Car, Subject::Rules, QuestionKind::Choice, Language::Chinese),
    ),
    (
        "機車法規是非題-英文1090116",
        SourceKind::new(Vehicle::Moto, Subject::Rules, QuestionKind::TrueFalse, Language::English),
    ),
    (
        "機車法規選擇題-英文1090116",
        SourceKind::new(Vehicle::Moto, Subject::Rules, QuestionKind::Choice, Language::English),
    ),
    (
        "Signs-True or False／English〈機車標誌是非題-英文〉",
        SourceKind::new(Vehicle::Moto, Subject::Signs, QuestionKind::TrueFalse, Language::English),
    ),
    (
        "Signs-Choice／English〈機車標誌選擇題-英文〉",
        SourceKind::new(Vehicle::Moto, Subject::Signs, QuestionKind::Choice, Language::English),
    ),
    (
        "汽車法規選擇題-英文1090116",
        SourceKind::new(Vehicle::Car, Subject::Rules, QuestionKind::Choice, Language::English),
    ),
    (
        "汽車法規是非題-英文1090116",
        SourceKind::new(Vehicle::Car, Subject::Rules, QuestionKind::TrueFalse, Language::English),
    ),
    (
        "Signs-Choice／English(汽車標誌選擇題-英文)",
        SourceKind::new(Vehicle::Car, Subject::Signs, QuestionKind::Choice, Language::English),
    ),
    (
        "Signs-True or False／English(汽車標誌是非題-英文)",
        SourceKind::new(Vehicle::Car, Subject::Signs, QuestionKind::TrueFalse, Language::English),
    ),
];

/// Lookup from document base-names to their classification.
///
/// Both the published names and the canonical file-ids resolve, so
/// re-derived files (`english-moto-signs-choice.yaml`) classify the same
/// way as the PDFs they came from. Passed into the commands as
/// configuration so tests can substitute fixtures.
#[derive(Debug, Clone)]
pub struct SourceMap {
    entries: HashMap<String, SourceKind>,
}

impl Default for SourceMap {
    fn default() -> Self {
        let mut entries = HashMap::new();
        for (name, kind) in PUBLISHED {
            entries.insert((*name).to_string(), *kind);
            entries.insert(kind.file_id(), *kind);
        }
        Self { entries }
    }
}

impl SourceMap {
    /// Classify a document by its base-name; unknown names are fatal.
    pub fn lookup(&self, base: &str) -> Result<SourceKind> {
        self.entries
            .get(base)
            .copied()
            .ok_or_else(|| PipelineError::UnknownSource(base.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_names_resolve() {
        let map = SourceMap::default();
        let kind = map.lookup("機車標誌選擇題-中文").unwrap();
        assert_eq!(kind.vehicle, Vehicle::Moto);
        assert_eq!(kind.subject, Subject::Signs);
        assert_eq!(kind.kind, QuestionKind::Choice);
        assert_eq!(kind.language, Language::Chinese);
    }

    #[test]
    fn file_ids_resolve_as_aliases() {
        let map = SourceMap::default();
        let kind = map.lookup("english-moto-signs-choice").unwrap();
        assert_eq!(kind.file_id(), "english-moto-signs-choice");
        assert_eq!(kind.language, Language::English);
    }

    #[test]
    fn unknown_names_are_fatal() {
        let map = SourceMap::default();
        let err = map.lookup("mystery-document").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownSource(name) if name == "mystery-document"));
    }

    #[test]
    fn tags_cover_vehicle_subject_and_kind() {
        let kind = SourceMap::default().lookup("汽車法規是非題-中文").unwrap();
        assert_eq!(kind.tags(), vec!["car", "rules", "true"]);
    }
}
