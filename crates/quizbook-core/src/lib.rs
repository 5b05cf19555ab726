//! quizbook-core: quiz model, scoring, and persistence.
//!
//! This crate holds the multiple-choice quiz model, the interactive attempt
//! loop, and the `QuizSystem` that keeps students and quizzes on disk.

pub mod attempt;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod seed;
pub mod storage;
pub mod system;

pub use error::{AnswerError, QuizError, Result};
