//! Layout-to-question state machine.
//!
//! Consumes the positioned text runs of a question-bank document and
//! reconstructs the ordered question records. A three-digit run opens a
//! question, the next token is its answer, and subsequent prose
//! accumulates into the body until the next question number. Numeric
//! runs inside a body are either a right-aligned category code or
//! tabular noise.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::Result;
use crate::layout::{Page, TextRun};
use crate::types::{Answer, Question};

/// Boilerplate runs discarded before the state machine sees them: table
/// headers, column labels, and page-number footers of the published
/// documents. Matched against the run text with all whitespace removed.
const DENYLIST: &[&str] = &[
    r"^題號$",
    r"^答案$",
    r"^題目圖示$",
    r"^題\s*目$",
    r"^第\d+頁/共\d+頁$",
    r"^機車標誌、標線、號誌..題$",
    r"^分類$",
    r"^編號$",
    r"^機車法規選擇題$",
    r"^機車法規是非題$",
    r"^汽車法規選擇題$",
    r"^【英文】$",
    r"^汽車法規是非題$",
    r"^汽車標誌、標線、號誌.含汽車儀表警示、指示燈...題$",
    r"^分類編號$",
    r"^分類編$",
    r"^號$",
    r"^題號答案$",
];

/// Category codes sit in the rightmost quarter of the page.
const CATEGORY_LEFT_MIN: f64 = 0.75;

/// Mis-rendered glyph sequence standing in for a missing "(3)" choice
/// marker in one published document.
const GLYPH_ARTIFACT: &str = "¬#¦";

lazy_static! {
    static ref QUESTION_NUMBER: Regex = Regex::new(r"^[0-9]{3}$").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref CATEGORY_CODE: Regex = Regex::new(r"^[0-9]{1,2}$").unwrap();
    static ref CHOICE_MARKER: Regex = Regex::new(r"\( *([123]) *\)").unwrap();
    static ref SPACE_RUN: Regex = Regex::new(r" +").unwrap();
}

/// Denylist configuration for the state machine, injectable so tests can
/// substitute fixtures.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    denylist: Vec<Regex>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DENYLIST).expect("built-in denylist compiles")
    }
}

impl ParserConfig {
    /// Build a config from explicit denylist patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let denylist = patterns
            .iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { denylist })
    }

    fn is_noise(&self, squeezed: &str) -> bool {
        self.denylist.iter().any(|re| re.is_match(squeezed))
    }
}

/// What the machine expects from the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No open question, or the previous one just closed.
    Seeking,
    /// A question number was read; its answer token should follow.
    NumberFound,
    /// Answer consumed; prose accumulates into the body.
    AnswerFound,
}

/// Classification of one text run, independent of parse state.
#[derive(Debug, Clone, PartialEq)]
enum RunClass {
    /// Blank or denylisted; dropped in every state.
    Noise,
    /// Three-digit question number.
    Number(u32),
    /// Other purely numeric run; a category code when it is short and
    /// right-aligned.
    Numeric { digits: String, category: bool },
    /// Anything else: candidate answer token or body text.
    Prose { raw: String, answer: Option<Answer> },
}

fn classify(config: &ParserConfig, run: &TextRun) -> RunClass {
    let stripped = run.text.trim();
    if stripped.is_empty() {
        return RunClass::Noise;
    }
    let squeezed: String = run.text.split_whitespace().collect();
    if config.is_noise(&squeezed) {
        return RunClass::Noise;
    }
    if QUESTION_NUMBER.is_match(stripped) {
        if let Ok(number) = stripped.parse() {
            return RunClass::Number(number);
        }
    }
    if NUMERIC.is_match(stripped) {
        return RunClass::Numeric {
            digits: stripped.to_string(),
            category: CATEGORY_CODE.is_match(stripped) && run.left > CATEGORY_LEFT_MIN,
        };
    }
    RunClass::Prose {
        raw: run.text.clone(),
        answer: Answer::from_token(stripped),
    }
}

/// The layout-to-question parser.
#[derive(Debug, Clone, Default)]
pub struct LayoutParser {
    config: ParserConfig,
}

impl LayoutParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Reconstruct the question sequence from positioned pages.
    ///
    /// Malformed spots (an answer token that never appears after a
    /// question number) are logged and leave the field unset; they never
    /// abort the whole conversion.
    pub fn parse(&self, pages: &[Page]) -> Vec<Question> {
        let mut machine = Machine::new();
        for page in pages {
            for run in &page.runs {
                machine.feed(classify(&self.config, run));
            }
        }
        machine.finish()
    }
}

struct Machine {
    state: State,
    current: Question,
    questions: Vec<Question>,
}

impl Machine {
    fn new() -> Self {
        Self {
            state: State::Seeking,
            current: Question::default(),
            questions: Vec::new(),
        }
    }

    /// The transition function: one classified run against the current
    /// state.
    fn feed(&mut self, class: RunClass) {
        match (self.state, class) {
            (_, RunClass::Noise) => {}
            (_, RunClass::Number(number)) => {
                self.close_current();
                self.current.number = number;
                self.state = State::NumberFound;
            }
            (State::NumberFound, RunClass::Prose { answer: Some(answer), .. }) => {
                self.current.answer = Some(answer);
                self.state = State::AnswerFound;
            }
            (State::NumberFound, RunClass::Numeric { digits, .. }) => {
                match Answer::from_token(&digits) {
                    Some(answer) => {
                        self.current.answer = Some(answer);
                        self.state = State::AnswerFound;
                    }
                    None => self.missing_answer(),
                }
            }
            (State::NumberFound, RunClass::Prose { answer: None, .. }) => self.missing_answer(),
            (State::AnswerFound, RunClass::Prose { raw, .. }) => {
                // verbatim, no delimiter; normalization happens on close
                self.current.question.push_str(&raw);
            }
            (State::AnswerFound, RunClass::Numeric { digits, category: true }) => {
                self.current.category = Some(digits);
            }
            (State::AnswerFound, RunClass::Numeric { category: false, .. }) => {}
            (State::Seeking, _) => {}
        }
    }

    fn missing_answer(&mut self) {
        warn!(
            number = self.current.number,
            "answer token not found after question number"
        );
    }

    fn close_current(&mut self) {
        let mut question = std::mem::take(&mut self.current);
        if !question.is_empty() {
            question.question = question.question.replace('\n', "");
            self.questions.push(question);
        }
    }

    fn finish(mut self) -> Vec<Question> {
        self.close_current();
        for question in &mut self.questions {
            question.question =
                normalize_question_text(&question.question).replace(GLYPH_ARTIFACT, "(3) ");
        }
        self.questions
    }
}

/// Canonicalize a question body: uniform ` (n) ` spacing around choice
/// markers, embedded line-break markup removed, space runs collapsed,
/// ends trimmed.
///
/// Idempotent, and applied both when finalizing extracted text and when
/// fingerprinting, so formatting differences never split question
/// identities.
pub fn normalize_question_text(text: &str) -> String {
    let text = CHOICE_MARKER.replace_all(text, " ($1) ");
    let text = text.replace("<br/>", " ");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
