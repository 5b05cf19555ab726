//! Core data model types for quizbook.
//!
//! Questions, quizzes, students and the score records that connect them.
//! Every type that carries an invariant checks it on construction and again
//! when it is deserialized, so stored data gets no more trust than user input.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::report::StudentSummary;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    text: String,
    options: Vec<String>,
    /// 0-based index into `options`.
    correct_answer: usize,
}

/// On-disk shape of a question. The index is signed so that negative values
/// in hand-edited files are reported as an invalid index, not a parse error.
#[derive(Debug, Serialize, Deserialize)]
struct QuestionRecord {
    text: String,
    options: Vec<String>,
    correct_answer: i64,
}

impl Question {
    /// Create a question, checking that `correct_answer` indexes `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self> {
        if correct_answer >= options.len() {
            return Err(QuizError::InvalidAnswerIndex {
                index: correct_answer as i64,
                option_count: options.len(),
            });
        }
        if options.len() < 2 {
            return Err(QuizError::TooFewOptions(options.len()));
        }
        Ok(Self {
            text: text.into(),
            options,
            correct_answer,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The 0-based index of the correct option.
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Check a 1-based answer. Range checking is the caller's job.
    pub fn is_correct(&self, one_based: usize) -> bool {
        one_based.checked_sub(1) == Some(self.correct_answer)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q: {}", self.text)?;
        for (i, option) in self.options.iter().enumerate() {
            write!(f, "\n   {}. {}", i + 1, option)?;
        }
        Ok(())
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    fn try_from(record: QuestionRecord) -> Result<Self> {
        let index =
            usize::try_from(record.correct_answer).map_err(|_| QuizError::InvalidAnswerIndex {
                index: record.correct_answer,
                option_count: record.options.len(),
            })?;
        Question::new(record.text, record.options, index)
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        Self {
            text: q.text,
            options: q.options,
            correct_answer: q.correct_answer as i64,
        }
    }
}

/// A titled, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    title: String,
    #[serde(default)]
    questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            questions: Vec::new(),
        }
    }

    /// Builder-style variant of [`Quiz::add_question`].
    pub fn with_question(mut self, question: Question) -> Self {
        self.add_question(question);
        self
    }

    /// Append a question; display order is insertion order.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// The result of one attempt: correct answers out of questions asked.
///
/// Stored as a two-element array `[score, total]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct ScoreRecord {
    pub score: usize,
    pub total: usize,
}

impl ScoreRecord {
    pub fn new(score: usize, total: usize) -> Result<Self> {
        if score > total {
            return Err(QuizError::InvalidScore { score, total });
        }
        Ok(Self { score, total })
    }

    /// Percentage of correct answers, or `None` for a quiz without questions.
    pub fn percentage(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.score as f64 / self.total as f64 * 100.0)
        }
    }

    /// `"66.67%"`, or `"N/A"` when there is nothing to divide by.
    pub fn percentage_display(&self) -> String {
        match self.percentage() {
            Some(p) => format!("{p:.2}%"),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

impl TryFrom<(usize, usize)> for ScoreRecord {
    type Error = QuizError;

    fn try_from((score, total): (usize, usize)) -> Result<Self> {
        ScoreRecord::new(score, total)
    }
}

impl From<ScoreRecord> for (usize, usize) {
    fn from(r: ScoreRecord) -> Self {
        (r.score, r.total)
    }
}

/// A student and their latest result per quiz title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    id: u64,
    name: String,
    #[serde(default)]
    scores: BTreeMap<String, ScoreRecord>,
}

impl Student {
    /// Create a student with a known id. Fresh ids come from
    /// [`StudentIds::allocate`](crate::system::StudentIds::allocate).
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &BTreeMap<String, ScoreRecord> {
        &self.scores
    }

    pub fn score_for(&self, quiz_title: &str) -> Option<ScoreRecord> {
        self.scores.get(quiz_title).copied()
    }

    /// Record a result, replacing any earlier one for the same quiz.
    pub fn record_score(
        &mut self,
        quiz_title: impl Into<String>,
        score: usize,
        total: usize,
    ) -> Result<()> {
        let record = ScoreRecord::new(score, total)?;
        self.scores.insert(quiz_title.into(), record);
        Ok(())
    }

    pub fn summary(&self) -> StudentSummary {
        StudentSummary {
            id: self.id,
            name: self.name.clone(),
            total_attempted: self.scores.len(),
            details: self.scores.clone(),
        }
    }
}
