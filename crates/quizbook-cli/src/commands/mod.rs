pub mod attempt;
pub mod import;
pub mod init;
pub mod menu;
pub mod quizzes;
pub mod register;
pub mod report;
pub mod validate;

use anyhow::Result;

use quizbook_core::config::load_config_from;
use quizbook_core::seed::seed_defaults;
use quizbook_core::storage::JsonStore;
use quizbook_core::system::QuizSystem;

use crate::Settings;

/// Load config and data, seeding an empty system unless told not to.
pub fn open_system(settings: &Settings) -> Result<QuizSystem> {
    let config = load_config_from(settings.config.as_deref())?;
    let data_dir = settings
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir.clone());

    tracing::debug!("using data directory {}", data_dir.display());
    let mut system = QuizSystem::load(JsonStore::new(data_dir), config.first_student_id);

    if config.seed_defaults && !settings.no_seed {
        seed_defaults(&mut system)?;
    }

    Ok(system)
}
