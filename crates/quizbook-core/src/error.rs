//! Error types for quizbook.
//!
//! `QuizError` covers everything the core can report to a caller: objects that
//! fail their construction checks, lookups that miss, and storage faults.
//! Interactive answer problems live in [`AnswerError`] because they never
//! leave the retry loop that produced them.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors produced by the quiz model, the quiz system, and its stores.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A question's correct-answer index does not point at one of its options.
    #[error("correct answer index {index} is invalid for a question with {option_count} options")]
    InvalidAnswerIndex { index: i64, option_count: usize },

    /// A question was given fewer than two options.
    #[error("a question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    /// A score record claims more correct answers than questions.
    #[error("score {score} exceeds total {total}")]
    InvalidScore { score: usize, total: usize },

    /// No student is registered under this id.
    #[error("no student found with ID: {0}")]
    StudentNotFound(u64),

    /// No quiz is stored under this title.
    #[error("quiz titled '{0}' does not exist")]
    QuizNotFound(String),

    /// A persisted collection could not be parsed.
    #[error("malformed store {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted collection exists but could not be read.
    #[error("failed to read {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a persisted collection failed.
    #[error("failed to write {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every id after this one is out of range.
    #[error("no student IDs left after {0}")]
    IdsExhausted(u64),

    /// Input ran out before every question was answered.
    #[error("input ended before the quiz was finished")]
    AttemptAborted,

    /// Console IO failed.
    #[error("console I/O failed")]
    Io(#[from] std::io::Error),
}

/// Why a typed answer was rejected. The attempt loop re-prompts on all of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("Answer cannot be empty.")]
    Empty,

    #[error("'{0}' is not a number.")]
    NotANumber(String),

    #[error("Invalid option number selected: {answer} is not between 1 and {option_count}.")]
    OutOfRange { answer: i64, option_count: usize },
}
