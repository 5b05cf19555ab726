//! The `quizbook import` command.

use std::path::PathBuf;

use anyhow::Result;

use quizbook_core::parser::{load_quiz_path, validate_quizzes};

use crate::Settings;

pub fn execute(settings: &Settings, path: PathBuf) -> Result<()> {
    let quizzes = load_quiz_path(&path)?;
    anyhow::ensure!(!quizzes.is_empty(), "no quizzes found in {}", path.display());

    for w in validate_quizzes(&quizzes) {
        let prefix = w
            .quiz
            .as_ref()
            .map(|title| format!("[{title}] "))
            .unwrap_or_default();
        println!("{prefix}WARNING: {}", w.message);
    }

    let mut system = super::open_system(settings)?;
    for quiz in quizzes {
        let title = quiz.title().to_string();
        let count = quiz.len();
        match system.add_quiz(quiz)? {
            Some(_) => println!("Replaced quiz '{title}' ({count} questions)"),
            None => println!("Imported quiz '{title}' ({count} questions)"),
        }
    }

    Ok(())
}
