//! Core types for exam question records.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Difficulty rating of a question, carried across document revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
    /// Sentinel for questions that have not been rated yet.
    #[serde(rename = "unknown_difficulty")]
    Unknown,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Difficulty {
    /// Get the wire label as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Impossible => "impossible",
            Self::Unknown => "unknown_difficulty",
        }
    }

    /// Parse a wire label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "impossible" => Some(Self::Impossible),
            "unknown_difficulty" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Answer token for a question: true/false style or a choice number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "O")]
    True,
    #[serde(rename = "X")]
    False,
    #[serde(rename = "1")]
    Choice1,
    #[serde(rename = "2")]
    Choice2,
    #[serde(rename = "3")]
    Choice3,
}

impl Answer {
    /// Parse a raw token from the layout dump, normalizing the
    /// full-width forms of O and X to ASCII.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "O" | "Ｏ" => Some(Self::True),
            "X" | "Ｘ" => Some(Self::False),
            "1" => Some(Self::Choice1),
            "2" => Some(Self::Choice2),
            "3" => Some(Self::Choice3),
            _ => None,
        }
    }

    /// Get the answer token as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "O",
            Self::False => "X",
            Self::Choice1 => "1",
            Self::Choice2 => "2",
            Self::Choice3 => "3",
        }
    }

    /// Whether this is a multiple-choice answer.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice1 | Self::Choice2 | Self::Choice3)
    }
}

/// One exam question as stored in the intermediate YAML format.
///
/// The all-default record is the parser's "no question yet" sentinel and
/// is never written to output; everything downstream of parsing treats
/// records as immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    #[serde(default)]
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl Question {
    /// `false` only for the all-default sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Read a question list from a YAML file.
    pub fn load_list(path: &Path) -> Result<Vec<Question>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Write a question list to a YAML file, keys in declaration order,
    /// absent optional fields omitted entirely.
    pub fn save_list(questions: &[Question], path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(questions)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Question {
        Question {
            question: "騎機車行經行人穿越道時應減速慢行".to_string(),
            question_image: Some("6f53d394460c8214.png".to_string()),
            answer: Some(Answer::True),
            number: 105,
            category: Some("12".to_string()),
            difficulty: Difficulty::Hard,
            note: "revised in 2020".to_string(),
        }
    }

    #[test]
    fn default_record_is_the_empty_sentinel() {
        assert!(Question::default().is_empty());
    }

    #[test]
    fn any_populated_field_makes_the_record_non_empty() {
        let number_only = Question {
            number: 105,
            ..Question::default()
        };
        assert!(!number_only.is_empty());

        let text_only = Question {
            question: "x".to_string(),
            ..Question::default()
        };
        assert!(!text_only.is_empty());
    }

    #[test]
    fn yaml_round_trip_preserves_every_field() {
        let questions = vec![
            sample(),
            Question {
                question: "紅燈可以右轉".to_string(),
                answer: Some(Answer::False),
                number: 106,
                ..Question::default()
            },
        ];
        let text = serde_yaml::to_string(&questions).unwrap();
        let back: Vec<Question> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, questions);
    }

    #[test]
    fn absent_optional_fields_restore_documented_defaults() {
        let text = "- question: 紅燈可以右轉\n  number: 7\n";
        let back: Vec<Question> = serde_yaml::from_str(text).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].question_image, None);
        assert_eq!(back[0].answer, None);
        assert_eq!(back[0].category, None);
        assert_eq!(back[0].difficulty, Difficulty::Unknown);
        assert_eq!(back[0].note, "");
    }

    #[test]
    fn empty_optional_fields_are_omitted_from_output() {
        let minimal = Question {
            question: "q".to_string(),
            number: 1,
            ..Question::default()
        };
        let text = serde_yaml::to_string(&[minimal]).unwrap();
        assert!(!text.contains("question_image"));
        assert!(!text.contains("answer"));
        assert!(!text.contains("category"));
        assert!(!text.contains("note"));
        assert!(text.contains("difficulty: unknown_difficulty"));
    }

    #[test]
    fn answer_tokens_normalize_full_width_forms() {
        assert_eq!(Answer::from_token("Ｏ"), Some(Answer::True));
        assert_eq!(Answer::from_token("Ｘ"), Some(Answer::False));
        assert_eq!(Answer::from_token("2"), Some(Answer::Choice2));
        assert_eq!(Answer::from_token("4"), None);
        assert_eq!(Answer::from_token("OX"), None);
    }

    #[test]
    fn choice_answers_are_flagged_as_choices() {
        assert!(Answer::Choice1.is_choice());
        assert!(Answer::Choice3.is_choice());
        assert!(!Answer::True.is_choice());
        assert!(!Answer::False.is_choice());
    }

    #[test]
    fn difficulty_labels_round_trip() {
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Impossible,
            Difficulty::Unknown,
        ] {
            assert_eq!(Difficulty::from_label(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_label("tricky"), None);
    }
}
