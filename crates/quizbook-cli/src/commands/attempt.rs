//! The `quizbook attempt` command.

use anyhow::Result;

use quizbook_core::attempt::ConsoleIo;

use crate::Settings;

pub fn execute(settings: &Settings, student_id: u64, quiz_title: String) -> Result<()> {
    let mut system = super::open_system(settings)?;

    let stdin = std::io::stdin();
    let mut console = ConsoleIo::new(stdin.lock(), std::io::stdout().lock());

    let outcome = system.attempt_quiz(student_id, quiz_title.trim(), &mut console)?;
    super::menu::print_outcome(&mut console, &outcome)?;

    Ok(())
}
