//! quizbook configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::system::DEFAULT_FIRST_STUDENT_ID;

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "QUIZBOOK_DATA_DIR";

/// Top-level quizbook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizbookConfig {
    /// Directory holding `students.json` and `quizzes.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Id given to the first student of an empty system.
    #[serde(default = "default_first_student_id")]
    pub first_student_id: u64,
    /// Seed the demo quizzes and students into an empty system.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_first_student_id() -> u64 {
    DEFAULT_FIRST_STUDENT_ID
}
fn default_true() -> bool {
    true
}

impl Default for QuizbookConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            first_student_id: default_first_student_id(),
            seed_defaults: true,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `quizbook.toml` in the current directory
/// 2. `~/.config/quizbook/config.toml`
///
/// `QUIZBOOK_DATA_DIR` overrides the data directory.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizbook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbookConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

/// Parse a TOML config document.
pub fn parse_config(content: &str) -> Result<QuizbookConfig> {
    let config: QuizbookConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.first_student_id > 0,
        "first_student_id must be greater than 0"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbook"))
}
