pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;

use crate::commands::AppState;
use crate::error::AppResult;

pub const DATABASE_FILE: &str = "liftcast.sqlite";

/// Sets up logging and storage under `data_dir` and returns wired state with
/// the daily leaderboard job running.
pub fn bootstrap(data_dir: &Path) -> AppResult<AppState> {
    crate::utils::logger::init_logging(&data_dir.join("logs"))?;

    std::fs::create_dir_all(data_dir)?;
    let pool = crate::db::DbPool::new(data_dir.join(DATABASE_FILE))?;

    let state = AppState::new(pool)?;
    state.start_background_jobs()?;
    Ok(state)
}
