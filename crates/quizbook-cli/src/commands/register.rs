//! The `quizbook register` command.

use anyhow::Result;

use crate::Settings;

pub fn execute(settings: &Settings, name: String) -> Result<()> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "student name cannot be empty");

    let mut system = super::open_system(settings)?;
    let student = system.create_student(name)?;
    println!("Student created: {} with ID: {}", student.name(), student.id());

    Ok(())
}
