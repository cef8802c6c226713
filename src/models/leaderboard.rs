use serde::{Deserialize, Serialize};

pub const LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: i64,
    pub display_name: String,
    pub exercise: String,
    /// Reps gained per elapsed day between the first and last logged set.
    pub improvement_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best 1-based rank held by `user_id`, if the user made the board.
    pub fn rank_of(&self, user_id: i64) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| entry.rank)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardFilter {
    pub user_id: Option<i64>,
    pub exercise: Option<String>,
}

impl LeaderboardFilter {
    pub fn for_exercise(exercise: impl Into<String>) -> Self {
        Self {
            user_id: None,
            exercise: Some(exercise.into()),
        }
    }

    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            exercise: None,
        }
    }

    pub fn normalized_exercise(&self) -> Option<String> {
        self.exercise
            .as_ref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLeaderboard {
    pub exercise: String,
    pub leaderboard: Leaderboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub generated_at: String,
    pub overall: Leaderboard,
    pub by_exercise: Vec<ExerciseLeaderboard>,
}
