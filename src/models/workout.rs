use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::observation::Observation;
use crate::utils::timestamp::parse_timestamp;

/// A persisted workout row. `recorded_at` keeps the stored text form so that
/// aggregation can decide per row what to do with values that fail to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: i64,
    pub user_id: i64,
    pub exercise: String,
    pub reps: i64,
    pub weight: f64,
    pub is_bodyweight: bool,
    pub recorded_at: String,
}

impl TryFrom<&WorkoutRecord> for Observation {
    type Error = AppError;

    fn try_from(record: &WorkoutRecord) -> Result<Self, Self::Error> {
        Ok(Observation {
            timestamp: parse_timestamp(&record.recorded_at)?,
            reps: record.reps,
            weight: record.weight,
            is_bodyweight: record.is_bodyweight,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCreateInput {
    pub user_id: i64,
    pub exercise: String,
    pub reps: i64,
    pub weight: f64,
    /// Defaults to `weight == 0` when omitted.
    pub is_bodyweight: Option<bool>,
    /// Defaults to the current local time.
    pub recorded_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutUpdateInput {
    pub reps: Option<i64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub display_name: String,
}

/// One raw row inside a [`WorkoutGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntry {
    pub recorded_at: String,
    pub reps: i64,
}

/// All logged sets of one user for one exercise, in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutGroup {
    pub user_id: i64,
    pub display_name: String,
    pub exercise: String,
    pub entries: Vec<GroupEntry>,
}
