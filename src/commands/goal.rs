use chrono::Local;

use crate::models::goal::{GoalCreateInput, GoalRecord, ProgressionPlan};
use crate::utils::timestamp::parse_date;

use super::{AppState, CommandResult};

pub fn goals_set(state: &AppState, input: GoalCreateInput) -> CommandResult<GoalRecord> {
    state.goals().set_goal(input).map_err(Into::into)
}

pub fn goals_list(state: &AppState, user_id: i64) -> CommandResult<Vec<GoalRecord>> {
    state.goals().list_goals(user_id).map_err(Into::into)
}

/// `today` defaults to the local date.
pub fn goals_plan(
    state: &AppState,
    user_id: i64,
    exercise: String,
    today: Option<String>,
) -> CommandResult<ProgressionPlan> {
    let today = match today.as_deref() {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };
    state
        .goals()
        .progression_plan(user_id, &exercise, today)
        .map_err(Into::into)
}
