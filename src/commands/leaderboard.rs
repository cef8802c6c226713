use crate::models::leaderboard::{Leaderboard, LeaderboardFilter, LeaderboardSnapshot};

use super::{AppState, CommandResult};

pub fn leaderboard_fetch(state: &AppState, filter: LeaderboardFilter) -> CommandResult<Leaderboard> {
    state.leaderboards().leaderboard(&filter).map_err(Into::into)
}

/// 1-based rank of the user for highlighting, `None` when off the board.
pub fn leaderboard_user_rank(
    state: &AppState,
    user_id: i64,
    exercise: Option<String>,
) -> CommandResult<Option<usize>> {
    state
        .leaderboards()
        .rank_of_user(user_id, exercise.as_deref())
        .map_err(Into::into)
}

pub fn leaderboard_snapshot(state: &AppState) -> CommandResult<LeaderboardSnapshot> {
    state.leaderboards().snapshot().map_err(Into::into)
}
