use chrono::{Duration, Local, NaiveDate};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repositories::goal_repository::GoalRepository;
use crate::db::repositories::user_repository::UserRepository;
use crate::db::repositories::workout_repository::WorkoutRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::goal::{GoalCreateInput, GoalRecord, PlanWeek, ProgressionPlan};
use crate::services::workout_service::{ensure_user_id, normalize_exercise_name};
use crate::utils::timestamp::{now_timestamp, parse_date, DATE_FORMAT};

const DAYS_PER_WEEK: i64 = 7;
/// Three years of weekly steps.
pub const MAX_PLAN_WEEKS: i64 = 156;

#[derive(Clone)]
pub struct GoalService {
    db: DbPool,
}

impl GoalService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn set_goal(&self, input: GoalCreateInput) -> AppResult<GoalRecord> {
        ensure_user_id(input.user_id)?;
        let exercise = normalize_exercise_name(&input.exercise)?;
        if input.target_reps <= 0 {
            return Err(AppError::validation("target reps must be greater than zero"));
        }
        if !(input.target_weight.is_finite() && input.target_weight >= 0.0) {
            return Err(AppError::validation("target weight must be zero or positive"));
        }
        let deadline = parse_date(&input.deadline)?;
        ensure_deadline_in_range(Local::now().date_naive(), deadline)?;

        let goal = GoalRecord {
            id: Uuid::new_v4().to_string(),
            user_id: input.user_id,
            exercise,
            target_reps: input.target_reps,
            target_weight: input.target_weight,
            deadline: deadline.format(DATE_FORMAT).to_string(),
            created_at: now_timestamp(),
        };

        self.db.with_connection(|conn| {
            if !UserRepository::exists(conn, goal.user_id)? {
                return Err(AppError::validation_with_details(
                    "register a profile before setting goals",
                    json!({ "userId": goal.user_id }),
                ));
            }
            GoalRepository::insert(conn, &goal)
        })?;

        info!(
            target: "liftcast::goal",
            goal_id = %goal.id,
            user_id = goal.user_id,
            exercise = %goal.exercise,
            "goal set"
        );
        Ok(goal)
    }

    pub fn list_goals(&self, user_id: i64) -> AppResult<Vec<GoalRecord>> {
        self.db
            .with_connection(|conn| GoalRepository::list_for_user(conn, user_id))
    }

    /// Week-by-week steps from the latest logged set toward the latest goal.
    pub fn progression_plan(
        &self,
        user_id: i64,
        exercise: &str,
        today: NaiveDate,
    ) -> AppResult<ProgressionPlan> {
        let exercise = normalize_exercise_name(exercise)?;

        let (goal, latest) = self.db.with_connection(|conn| {
            let goal = GoalRepository::latest_for_exercise(conn, user_id, &exercise)?;
            let latest = WorkoutRepository::latest_for_exercise(conn, user_id, &exercise)?;
            Ok((goal, latest))
        })?;

        let goal = goal.ok_or_else(AppError::not_found)?;
        let latest = latest
            .ok_or_else(|| AppError::insufficient_data(1, 0))?
            .into_record();

        let deadline = parse_date(&goal.deadline)?;
        let weeks = build_weeks(
            &goal,
            latest.reps,
            latest.weight,
            latest.is_bodyweight,
            weeks_until(today, deadline),
        );

        debug!(
            target: "liftcast::goal",
            user_id,
            exercise = %exercise,
            weeks = weeks.len(),
            "progression plan built"
        );

        Ok(ProgressionPlan {
            goal,
            current_reps: latest.reps,
            current_weight: latest.weight,
            is_bodyweight: latest.is_bodyweight,
            weeks,
        })
    }
}

fn ensure_deadline_in_range(today: NaiveDate, deadline: NaiveDate) -> AppResult<()> {
    let latest = today + Duration::days(MAX_PLAN_WEEKS * DAYS_PER_WEEK);
    if deadline > latest {
        return Err(AppError::validation_with_details(
            format!("deadline must be within {MAX_PLAN_WEEKS} weeks"),
            json!({ "deadline": deadline.format(DATE_FORMAT).to_string() }),
        ));
    }
    Ok(())
}

fn weeks_until(today: NaiveDate, deadline: NaiveDate) -> i64 {
    ((deadline - today).num_days() / DAYS_PER_WEEK).clamp(1, MAX_PLAN_WEEKS)
}

fn build_weeks(
    goal: &GoalRecord,
    current_reps: i64,
    current_weight: f64,
    is_bodyweight: bool,
    total_weeks: i64,
) -> Vec<PlanWeek> {
    let rep_step = ((goal.target_reps - current_reps) / total_weeks).max(1);
    let weighted = goal.target_weight > 0.0 && !is_bodyweight;
    let weight_step = if weighted {
        (goal.target_weight - current_weight) / total_weeks as f64
    } else {
        0.0
    };

    (1..=total_weeks)
        .map(|week| PlanWeek {
            week: week as u32,
            reps: current_reps + rep_step * week,
            weight: if weighted {
                round2(current_weight + weight_step * week as f64)
            } else {
                0.0
            },
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
