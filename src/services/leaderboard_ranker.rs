use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::models::leaderboard::{Leaderboard, LeaderboardEntry, LEADERBOARD_LIMIT};
use crate::models::workout::WorkoutGroup;
use crate::utils::timestamp::{parse_timestamp, whole_days_between};

/// Ranks `(user, exercise)` groups by reps gained per elapsed day.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardRanker {
    limit: usize,
}

impl Default for LeaderboardRanker {
    fn default() -> Self {
        Self {
            limit: LEADERBOARD_LIMIT,
        }
    }
}

impl LeaderboardRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(
        &self,
        groups: &[WorkoutGroup],
        filter_user: Option<i64>,
        filter_exercise: Option<&str>,
    ) -> Leaderboard {
        let exercise_filter = filter_exercise
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        let mut scored: Vec<(f64, &WorkoutGroup)> = groups
            .iter()
            .filter(|group| filter_user.map_or(true, |user_id| group.user_id == user_id))
            .filter(|group| {
                exercise_filter
                    .as_deref()
                    .map_or(true, |exercise| group.exercise.trim().to_lowercase() == exercise)
            })
            .filter_map(|group| improvement_rate(group).map(|rate| (rate, group)))
            .collect();

        // Vec::sort_by is stable, so equal rates keep group order.
        scored.sort_by(|left, right| right.0.total_cmp(&left.0));
        scored.truncate(self.limit);

        let entries: Vec<LeaderboardEntry> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (rate, group))| LeaderboardEntry {
                rank: index + 1,
                user_id: group.user_id,
                display_name: group.display_name.clone(),
                exercise: group.exercise.clone(),
                improvement_rate: rate,
            })
            .collect();

        debug!(
            target: "liftcast::leaderboard",
            groups = groups.len(),
            ranked = entries.len(),
            "leaderboard ranked"
        );

        Leaderboard { entries }
    }
}

/// `None` when no entry in the group has a parseable timestamp.
fn improvement_rate(group: &WorkoutGroup) -> Option<f64> {
    let mut span: Option<(NaiveDateTime, NaiveDateTime)> = None;
    let mut reps_range: Option<(i64, i64)> = None;

    for entry in &group.entries {
        let timestamp = match parse_timestamp(&entry.recorded_at) {
            Ok(timestamp) => timestamp,
            Err(_) => {
                warn!(
                    target: "liftcast::leaderboard",
                    user_id = group.user_id,
                    exercise = %group.exercise,
                    value = %entry.recorded_at,
                    "skipping row with unparseable timestamp"
                );
                continue;
            }
        };

        span = Some(match span {
            Some((first, last)) => (first.min(timestamp), last.max(timestamp)),
            None => (timestamp, timestamp),
        });
        reps_range = Some(match reps_range {
            Some((low, high)) => (low.min(entry.reps), high.max(entry.reps)),
            None => (entry.reps, entry.reps),
        });
    }

    let (first, last) = span?;
    let (low, high) = reps_range?;
    let days = whole_days_between(&first, &last).max(1);
    Some((high - low) as f64 / days as f64)
}
