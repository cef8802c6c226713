use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::{debug, info};

use crate::db::repositories::user_repository::UserRepository;
use crate::db::repositories::workout_repository::{WorkoutRepository, WorkoutRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::workout::{UserProfile, WorkoutCreateInput, WorkoutRecord, WorkoutUpdateInput};
use crate::utils::timestamp::{format_timestamp, now_timestamp, parse_timestamp};

pub const MIN_USER_ID: i64 = 1000;
pub const MAX_USER_ID: i64 = 999_999;
const MAX_DISPLAY_NAME_CHARS: usize = 64;

static EXERCISE_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9 _-]{0,63}$").ok());

#[derive(Clone)]
pub struct WorkoutService {
    db: DbPool,
}

impl WorkoutService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn register_profile(&self, user_id: i64, display_name: &str) -> AppResult<UserProfile> {
        ensure_user_id(user_id)?;
        let display_name = normalize_display_name(display_name)?;
        let profile = UserProfile {
            user_id,
            display_name,
        };

        self.db
            .with_connection(|conn| UserRepository::upsert(conn, &profile))?;
        info!(target: "liftcast::workout", user_id, "profile registered");
        Ok(profile)
    }

    pub fn profile(&self, user_id: i64) -> AppResult<UserProfile> {
        self.db
            .with_connection(|conn| UserRepository::find(conn, user_id))?
            .ok_or_else(AppError::not_found)
    }

    pub fn log_workout(&self, input: WorkoutCreateInput) -> AppResult<WorkoutRecord> {
        ensure_user_id(input.user_id)?;
        let exercise = normalize_exercise_name(&input.exercise)?;
        ensure_reps(input.reps)?;
        ensure_weight(input.weight)?;

        let recorded_at = match input.recorded_at.as_deref() {
            Some(value) => format_timestamp(&parse_timestamp(value)?),
            None => now_timestamp(),
        };

        let mut record = WorkoutRecord {
            id: 0,
            user_id: input.user_id,
            exercise,
            reps: input.reps,
            weight: input.weight,
            is_bodyweight: input.is_bodyweight.unwrap_or(input.weight == 0.0),
            recorded_at,
        };

        let row = WorkoutRow::from_record(&record);
        record.id = self.db.with_connection(|conn| {
            if !UserRepository::exists(conn, row.user_id)? {
                return Err(AppError::validation_with_details(
                    "register a profile before logging workouts",
                    json!({ "userId": row.user_id }),
                ));
            }
            WorkoutRepository::insert(conn, &row)
        })?;

        info!(
            target: "liftcast::workout",
            workout_id = record.id,
            user_id = record.user_id,
            exercise = %record.exercise,
            "workout logged"
        );
        Ok(record)
    }

    pub fn update_workout(&self, id: i64, update: WorkoutUpdateInput) -> AppResult<WorkoutRecord> {
        let mut existing = self.get_workout(id)?;

        if let Some(reps) = update.reps {
            ensure_reps(reps)?;
            existing.reps = reps;
        }
        if let Some(weight) = update.weight {
            ensure_weight(weight)?;
            existing.weight = weight;
        }

        self.db.with_connection(|conn| {
            WorkoutRepository::update_performance(conn, id, existing.reps, existing.weight)
        })?;
        info!(target: "liftcast::workout", workout_id = id, "workout updated");
        Ok(existing)
    }

    pub fn delete_workout(&self, id: i64) -> AppResult<()> {
        self.db
            .with_connection(|conn| WorkoutRepository::delete(conn, id))?;
        info!(target: "liftcast::workout", workout_id = id, "workout deleted");
        Ok(())
    }

    pub fn get_workout(&self, id: i64) -> AppResult<WorkoutRecord> {
        let row = self
            .db
            .with_connection(|conn| WorkoutRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        Ok(row.into_record())
    }

    /// Every set the user logged, newest first.
    pub fn history(&self, user_id: i64) -> AppResult<Vec<WorkoutRecord>> {
        let rows = self
            .db
            .with_connection(|conn| WorkoutRepository::list_history(conn, user_id))?;
        let records: Vec<WorkoutRecord> = rows.into_iter().map(WorkoutRow::into_record).collect();
        debug!(target: "liftcast::workout", user_id, count = records.len(), "history listed");
        Ok(records)
    }

    pub fn list_exercises(&self, user_id: i64) -> AppResult<Vec<String>> {
        self.db
            .with_connection(|conn| WorkoutRepository::list_exercises(conn, user_id))
    }

    pub fn pool(&self) -> &DbPool {
        &self.db
    }
}

pub fn ensure_user_id(user_id: i64) -> AppResult<()> {
    if (MIN_USER_ID..=MAX_USER_ID).contains(&user_id) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "user id must be between {MIN_USER_ID} and {MAX_USER_ID}"
        )))
    }
}

/// Lowercases and trims, then checks the allowed character set.
pub fn normalize_exercise_name(value: &str) -> AppResult<String> {
    let normalized = value.trim().to_lowercase();
    let pattern = EXERCISE_NAME
        .as_ref()
        .ok_or_else(|| AppError::other("exercise name pattern failed to compile"))?;

    if pattern.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(AppError::validation_with_details(
            "exercise name must be 1-64 letters, digits, spaces, '-' or '_'",
            json!({ "exercise": value }),
        ))
    }
}

fn normalize_display_name(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("display name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(AppError::validation(format!(
            "display name must be at most {MAX_DISPLAY_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_reps(reps: i64) -> AppResult<()> {
    if reps > 0 {
        Ok(())
    } else {
        Err(AppError::validation("reps must be greater than zero"))
    }
}

fn ensure_weight(weight: f64) -> AppResult<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation("weight must be zero or positive"))
    }
}
