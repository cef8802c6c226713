use crate::models::workout::{UserProfile, WorkoutCreateInput, WorkoutRecord, WorkoutUpdateInput};

use super::{AppState, CommandResult};

pub fn profile_register(
    state: &AppState,
    user_id: i64,
    display_name: String,
) -> CommandResult<UserProfile> {
    state
        .workouts()
        .register_profile(user_id, &display_name)
        .map_err(Into::into)
}

pub fn workouts_log(state: &AppState, input: WorkoutCreateInput) -> CommandResult<WorkoutRecord> {
    state.workouts().log_workout(input).map_err(Into::into)
}

pub fn workouts_update(
    state: &AppState,
    id: i64,
    update: WorkoutUpdateInput,
) -> CommandResult<WorkoutRecord> {
    state.workouts().update_workout(id, update).map_err(Into::into)
}

pub fn workouts_delete(state: &AppState, id: i64) -> CommandResult<()> {
    state.workouts().delete_workout(id).map_err(Into::into)
}

pub fn workouts_history(state: &AppState, user_id: i64) -> CommandResult<Vec<WorkoutRecord>> {
    state.workouts().history(user_id).map_err(Into::into)
}

pub fn workouts_exercises(state: &AppState, user_id: i64) -> CommandResult<Vec<String>> {
    state.workouts().list_exercises(user_id).map_err(Into::into)
}
