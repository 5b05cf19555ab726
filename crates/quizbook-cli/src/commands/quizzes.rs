//! The `quizbook quizzes` command.

use anyhow::Result;

use crate::Settings;

pub fn execute(settings: &Settings) -> Result<()> {
    let system = super::open_system(settings)?;

    if !system.has_quizzes() {
        println!("No quizzes available. Run `quizbook import --file <path>` to add some.");
        return Ok(());
    }

    println!("Available Quizzes:");
    for quiz in system.quizzes() {
        println!("- {} ({} questions)", quiz.title(), quiz.len());
    }

    Ok(())
}
