//! TOML quiz file parser.
//!
//! Loads quizzes from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Quiz;

/// Top-level structure of a quiz file. Questions go through the same
/// validating deserializer as the JSON store.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    #[serde(default)]
    quizzes: Vec<Quiz>,
}

/// Parse a single TOML file into its quizzes.
pub fn parse_quiz_file(path: &Path) -> Result<Vec<Quiz>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into quizzes (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Vec<Quiz>> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(parsed.quizzes)
}

/// Load a file, or every `.toml` file under a directory.
pub fn load_quiz_path(path: &Path) -> Result<Vec<Quiz>> {
    if path.is_dir() {
        load_quiz_directory(path)
    } else {
        parse_quiz_file(path)
    }
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz_file(&path) {
                Ok(found) => quizzes.extend(found),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The quiz title (if applicable).
    pub quiz: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check quizzes for problems the constructors allow but users rarely mean.
pub fn validate_quizzes(quizzes: &[Quiz]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_titles = HashSet::new();
    for quiz in quizzes {
        if !seen_titles.insert(quiz.title()) {
            warnings.push(ValidationWarning {
                quiz: Some(quiz.title().to_string()),
                message: format!(
                    "duplicate quiz title: {} (the later one wins on import)",
                    quiz.title()
                ),
            });
        }
    }

    for quiz in quizzes {
        if quiz.title().trim().is_empty() {
            warnings.push(ValidationWarning {
                quiz: None,
                message: "quiz title is empty".into(),
            });
        }

        if quiz.is_empty() {
            warnings.push(ValidationWarning {
                quiz: Some(quiz.title().to_string()),
                message: "quiz has no questions".into(),
            });
        }

        for (i, question) in quiz.questions().iter().enumerate() {
            if question.text().trim().is_empty() {
                warnings.push(ValidationWarning {
                    quiz: Some(quiz.title().to_string()),
                    message: format!("question {} has empty text", i + 1),
                });
            }

            let mut seen_options = HashSet::new();
            for option in question.options() {
                if !seen_options.insert(option.trim()) {
                    warnings.push(ValidationWarning {
                        quiz: Some(quiz.title().to_string()),
                        message: format!("question {} repeats option '{}'", i + 1, option),
                    });
                }
            }
        }
    }

    warnings
}
