//! The `quizbook validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(path: PathBuf) -> Result<()> {
    let quizzes = quizbook_core::parser::load_quiz_path(&path)?;

    for quiz in &quizzes {
        println!("Quiz: {} ({} questions)", quiz.title(), quiz.len());
    }

    let warnings = quizbook_core::parser::validate_quizzes(&quizzes);
    for w in &warnings {
        let prefix = w
            .quiz
            .as_ref()
            .map(|title| format!("  [{title}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All quizzes valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
