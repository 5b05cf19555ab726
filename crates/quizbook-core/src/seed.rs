//! Demo content for a brand-new system.

use std::path::Path;

use anyhow::Result;

use crate::model::Quiz;
use crate::parser::parse_quiz_str;
use crate::system::QuizSystem;

/// The quizzes an empty system starts with, in quiz-file format.
pub const DEFAULT_QUIZZES_TOML: &str = r#"[[quizzes]]
title = "OOP Fundamentals"

[[quizzes.questions]]
text = "What does OOP stand for?"
options = ["Object Oriented Protocols", "Object Oriented Programming", "Optimal Operating Plan"]
correct_answer = 1

[[quizzes.questions]]
text = "A blueprint for creating objects is called a:"
options = ["Instance", "Method", "Class"]
correct_answer = 2

[[quizzes]]
title = "Basic Python"

[[quizzes.questions]]
text = "What is Python primarily known for?"
options = ["Web Browsing", "Data Analysis", "Game Console Design"]
correct_answer = 1

[[quizzes.questions]]
text = "Which keyword is used for a function in Python?"
options = ["def", "func", "function"]
correct_answer = 0

[[quizzes.questions]]
text = "Which data structure is ordered and mutable?"
options = ["tuple", "list", "set"]
correct_answer = 1
"#;

/// Students an empty system starts with.
pub const DEFAULT_STUDENTS: [&str; 2] = ["Alice", "Bob"];

pub fn default_quizzes() -> Result<Vec<Quiz>> {
    parse_quiz_str(DEFAULT_QUIZZES_TOML, Path::new("<default quizzes>"))
}

/// What [`seed_defaults`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seeded {
    pub quizzes: usize,
    pub students: usize,
}

/// Fill whichever collections are empty with the demo content.
pub fn seed_defaults(system: &mut QuizSystem) -> Result<Seeded> {
    let mut seeded = Seeded::default();

    if !system.has_quizzes() {
        for quiz in default_quizzes()? {
            system.add_quiz(quiz)?;
            seeded.quizzes += 1;
        }
    }

    if !system.has_students() {
        for name in DEFAULT_STUDENTS {
            system.create_student(name)?;
            seeded.students += 1;
        }
    }

    if seeded != Seeded::default() {
        tracing::info!(
            quizzes = seeded.quizzes,
            students = seeded.students,
            "seeded default data"
        );
    }
    Ok(seeded)
}
