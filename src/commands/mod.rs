pub mod forecast;
pub mod goal;
pub mod leaderboard;
pub mod settings;
pub mod workout;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{error, warn};

use crate::db::observation_store::{ObservationStore, SqliteObservationStore};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::forecast_service::ForecastService;
use crate::services::goal_service::GoalService;
use crate::services::leaderboard_service::LeaderboardService;
use crate::services::settings_service::SettingsService;
use crate::services::workout_service::WorkoutService;

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    workout_service: Arc<WorkoutService>,
    forecast_service: Arc<ForecastService>,
    leaderboard_service: Arc<LeaderboardService>,
    goal_service: Arc<GoalService>,
    settings_service: Arc<SettingsService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> AppResult<Self> {
        let store: Arc<dyn ObservationStore> = Arc::new(SqliteObservationStore::new(db_pool.clone()));
        Self::with_store(db_pool, store)
    }

    /// Wires the services over a caller-supplied history store. Writes still
    /// go through `db_pool`.
    pub fn with_store(db_pool: DbPool, store: Arc<dyn ObservationStore>) -> AppResult<Self> {
        let settings_service = Arc::new(SettingsService::new(db_pool.clone())?);
        let workout_service = Arc::new(WorkoutService::new(db_pool.clone()));
        let goal_service = Arc::new(GoalService::new(db_pool.clone()));
        let forecast_service = Arc::new(ForecastService::new(
            Arc::clone(&store),
            Arc::clone(&settings_service),
        ));
        let leaderboard_service = Arc::new(LeaderboardService::new(
            store,
            Arc::clone(&settings_service),
        ));

        Ok(Self {
            db_pool,
            workout_service,
            forecast_service,
            leaderboard_service,
            goal_service,
            settings_service,
        })
    }

    pub fn start_background_jobs(&self) -> AppResult<()> {
        self.leaderboard_service.ensure_daily_job()
    }

    pub fn workouts(&self) -> Arc<WorkoutService> {
        Arc::clone(&self.workout_service)
    }

    pub fn forecasts(&self) -> Arc<ForecastService> {
        Arc::clone(&self.forecast_service)
    }

    pub fn leaderboards(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard_service)
    }

    pub fn goals(&self) -> Arc<GoalService> {
        Arc::clone(&self.goal_service)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        let message = error.to_string();
        match error {
            AppError::Validation { details, .. } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::NotFound => CommandError::new("NOT_FOUND", "requested record does not exist", None),
            AppError::Conflict { .. } => CommandError::new("CONFLICT", message, None),
            AppError::InsufficientData { required, actual } => CommandError::new(
                "INSUFFICIENT_DATA",
                "log more workouts to get a forecast",
                Some(json!({ "required": required, "actual": actual })),
            ),
            AppError::UnderdeterminedFit { degree, samples } => CommandError::new(
                "UNDERDETERMINED_FIT",
                message,
                Some(json!({ "degree": degree, "samples": samples })),
            ),
            AppError::MalformedTimestamp { value } => CommandError::new(
                "MALFORMED_TIMESTAMP",
                message,
                Some(json!({ "value": value })),
            ),
            AppError::NumericalFailure { .. } => {
                warn!(target: "liftcast::command", %message, "numerical failure in command");
                CommandError::new("NUMERICAL_FAILURE", message, None)
            }
            AppError::Config { .. } => CommandError::new("CONFIG_ERROR", message, None),
            AppError::Database { .. } => {
                error!(target: "liftcast::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "liftcast::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "liftcast::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(_) => {
                error!(target: "liftcast::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}
