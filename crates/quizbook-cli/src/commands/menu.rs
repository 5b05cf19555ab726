//! The interactive menu, run when no subcommand is given.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizbook_core::attempt::ConsoleIo;
use quizbook_core::system::{AttemptOutcome, QuizSystem};

use crate::Settings;

const MENU: &str = "\n------------------------------
ONLINE QUIZ SYSTEM MENU
------------------------------
1. Attempt Quiz
2. Generate Student Report
3. View Available Quizzes
4. Register New Student
5. Exit";

pub fn execute(settings: &Settings) -> Result<()> {
    let mut system = super::open_system(settings)?;
    let stdin = std::io::stdin();
    let mut console = ConsoleIo::new(stdin.lock(), std::io::stdout().lock());
    run(&mut system, &mut console)
}

/// Run the menu loop until the user exits or input ends, then save.
pub fn run<R: BufRead, W: Write>(
    system: &mut QuizSystem,
    console: &mut ConsoleIo<R, W>,
) -> Result<()> {
    console.say("\n--- System Ready. Data persistence enabled. ---")?;

    loop {
        console.say(MENU)?;
        let Some(choice) = console.prompt("Enter your choice (1-5): ")? else {
            break;
        };

        match choice.trim() {
            "1" => attempt(system, console)?,
            "2" => console.say(super::report::render_text(&system.report()))?,
            "3" => list_quizzes(system, console)?,
            "4" => register(system, console)?,
            "5" => break,
            _ => console.say("Invalid choice. Please enter a number between 1 and 5.")?,
        }
    }

    console.say("Saving all data...")?;
    system.save()?;
    console.say("Thank you for using the Online Quiz System. Goodbye!")?;
    Ok(())
}

fn attempt<R: BufRead, W: Write>(
    system: &mut QuizSystem,
    console: &mut ConsoleIo<R, W>,
) -> Result<()> {
    let Some(raw_id) = console.prompt("Enter your Student ID: ")? else {
        return Ok(());
    };
    let student_id: u64 = match raw_id.trim().parse() {
        Ok(id) => id,
        Err(e) => {
            console.say(format_args!(
                "Invalid Input: {e}. Please enter a valid number for the ID."
            ))?;
            return Ok(());
        }
    };

    let titles: Vec<&str> = system.quiz_titles().collect();
    console.say(format_args!("\nAvailable Quizzes: {}", titles.join(", ")))?;
    let Some(title) = console.prompt("Enter the title of the quiz to attempt: ")? else {
        return Ok(());
    };

    match system.attempt_quiz(student_id, title.trim(), console) {
        Ok(outcome) => print_outcome(console, &outcome)?,
        Err(e) => console.say(format_args!("Quiz Attempt Failed: {:#}", anyhow::Error::new(e)))?,
    }
    Ok(())
}

pub fn print_outcome<R: BufRead, W: Write>(
    console: &mut ConsoleIo<R, W>,
    outcome: &AttemptOutcome,
) -> Result<()> {
    console.say(format_args!(
        "\n*** {}'s Result for {} ***",
        outcome.student_name, outcome.quiz_title
    ))?;
    console.say(format_args!(
        "Score: {} out of {}",
        outcome.record.score, outcome.record.total
    ))?;
    console.say(format_args!(
        "Percentage: {}",
        outcome.record.percentage_display()
    ))?;
    Ok(())
}

fn list_quizzes<R: BufRead, W: Write>(
    system: &QuizSystem,
    console: &mut ConsoleIo<R, W>,
) -> Result<()> {
    console.say("\nAvailable Quizzes:")?;
    if !system.has_quizzes() {
        console.say("No quizzes available.")?;
    }
    for quiz in system.quizzes() {
        console.say(format_args!("- {}", quiz.title()))?;
    }
    Ok(())
}

fn register<R: BufRead, W: Write>(
    system: &mut QuizSystem,
    console: &mut ConsoleIo<R, W>,
) -> Result<()> {
    let Some(name) = console.prompt("Enter new student's name: ")? else {
        return Ok(());
    };
    let name = name.trim();
    if name.is_empty() {
        console.say("Student name cannot be empty.")?;
        return Ok(());
    }

    match system.create_student(name) {
        Ok(student) => {
            let line = format!("Student created: {} with ID: {}", student.name(), student.id());
            console.say(line)?;
        }
        Err(e) => console.say(format_args!(
            "Could not register the student: {:#}",
            anyhow::Error::new(e)
        ))?,
    }
    Ok(())
}
