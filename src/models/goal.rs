use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: String,
    pub user_id: i64,
    pub exercise: String,
    pub target_reps: i64,
    pub target_weight: f64,
    /// `YYYY-MM-DD`
    pub deadline: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreateInput {
    pub user_id: i64,
    pub exercise: String,
    pub target_reps: i64,
    pub target_weight: f64,
    pub deadline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWeek {
    pub week: u32,
    pub reps: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionPlan {
    pub goal: GoalRecord,
    pub current_reps: i64,
    pub current_weight: f64,
    pub is_bodyweight: bool,
    pub weeks: Vec<PlanWeek>,
}
