//! The `quizbook init` command.

use anyhow::Result;

use quizbook_core::seed::DEFAULT_QUIZZES_TOML;

pub fn execute() -> Result<()> {
    // Create quizbook.toml
    if std::path::Path::new("quizbook.toml").exists() {
        println!("quizbook.toml already exists, skipping.");
    } else {
        std::fs::write("quizbook.toml", SAMPLE_CONFIG)?;
        println!("Created quizbook.toml");
    }

    // Create example quiz file
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, DEFAULT_QUIZZES_TOML)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizzes/example.toml or add your own quiz files");
    println!("  2. Run: quizbook validate --file quizzes");
    println!("  3. Run: quizbook --no-seed import --file quizzes");
    println!("  4. Run: quizbook");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbook configuration

# Where students.json and quizzes.json are kept.
data_dir = "data"

# Id given to the first registered student.
first_student_id = 1001

# Add the demo quizzes and students when the data directory is empty.
seed_defaults = true
"#;
