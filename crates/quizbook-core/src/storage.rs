//! JSON persistence for the student and quiz collections.
//!
//! Each collection lives in its own file inside a data directory. Loading is
//! forgiving: a missing file is an empty collection, and an unreadable one is
//! copied aside and replaced by an empty collection. Saving writes a temp file
//! next to the target and renames it into place, so a failed write leaves the
//! last committed file untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{QuizError, Result};
use crate::model::{Quiz, Student};

pub const STUDENTS_FILE: &str = "students.json";
pub const QUIZZES_FILE: &str = "quizzes.json";

/// How a collection came back from disk.
#[derive(Debug)]
pub enum Loaded<T> {
    /// The file does not exist yet.
    Missing,
    /// The file parsed cleanly.
    Items(Vec<T>),
    /// The file could not be used. `backup` is where its bytes were copied.
    Malformed {
        error: QuizError,
        backup: Option<PathBuf>,
    },
}

impl<T> Loaded<T> {
    /// The loaded items, or an empty collection for the fallback cases.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Loaded::Items(items) => items,
            Loaded::Missing | Loaded::Malformed { .. } => Vec::new(),
        }
    }
}

/// The two JSON files that make up durable storage.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn students_path(&self) -> PathBuf {
        self.dir.join(STUDENTS_FILE)
    }

    pub fn quizzes_path(&self) -> PathBuf {
        self.dir.join(QUIZZES_FILE)
    }

    pub fn load_students(&self) -> Loaded<Student> {
        load_collection(&self.students_path())
    }

    pub fn load_quizzes(&self) -> Loaded<Quiz> {
        load_collection(&self.quizzes_path())
    }

    /// Give up on a students file that parsed but cannot be used, backing it
    /// up the same way as a malformed one.
    pub fn set_aside_students(&self, error: QuizError) -> Loaded<Student> {
        set_aside(&self.students_path(), error)
    }

    pub fn save_students<'a>(&self, students: impl IntoIterator<Item = &'a Student>) -> Result<()> {
        save_collection(&self.students_path(), students)
    }

    pub fn save_quizzes<'a>(&self, quizzes: impl IntoIterator<Item = &'a Quiz>) -> Result<()> {
        save_collection(&self.quizzes_path(), quizzes)
    }
}

/// Read and parse one collection file without any fallback.
///
/// `Ok(None)` means the file does not exist.
pub fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(QuizError::Unreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let items = serde_json::from_str(&content).map_err(|source| QuizError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(items))
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Loaded<T> {
    match read_collection(path) {
        Ok(Some(items)) => Loaded::Items(items),
        Ok(None) => {
            tracing::info!("{} not found, starting empty", path.display());
            Loaded::Missing
        }
        Err(error) => set_aside(path, error),
    }
}

fn set_aside<T>(path: &Path, error: QuizError) -> Loaded<T> {
    let reason = match std::error::Error::source(&error) {
        Some(cause) => format!("{error}: {cause}"),
        None => error.to_string(),
    };
    let backup = back_up_corrupt(path);
    match &backup {
        Some(b) => tracing::warn!("{reason}; copied to {} and starting empty", b.display()),
        None => tracing::warn!("{reason}; starting empty"),
    }
    Loaded::Malformed { error, backup }
}

/// Copy an unusable store aside so the next save cannot destroy it.
fn back_up_corrupt(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_string_lossy();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let backup = path.with_file_name(format!("{file_name}.corrupt-{stamp}"));
    match std::fs::copy(path, &backup) {
        Ok(_) => Some(backup),
        Err(e) => {
            tracing::warn!("could not back up {}: {e}", path.display());
            None
        }
    }
}

fn save_collection<'a, T>(path: &Path, items: impl IntoIterator<Item = &'a T>) -> Result<()>
where
    T: Serialize + 'a,
{
    let items: Vec<&T> = items.into_iter().collect();
    let json = serde_json::to_string_pretty(&items).map_err(|e| QuizError::Storage {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    write_atomic(path, json.as_bytes()).map_err(|source| QuizError::Storage {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("saved {} records to {}", items.len(), path.display());
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
