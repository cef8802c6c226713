use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::observation::SeriesPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Intermediate,
    Expert,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Intermediate => "intermediate",
            Tier::Expert => "expert",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Tier {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "intermediate" => Ok(Tier::Intermediate),
            "expert" => Ok(Tier::Expert),
            other => Err(format!("unsupported tier: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMetric {
    Reps,
    Weight,
}

impl ForecastMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMetric::Reps => "reps",
            ForecastMetric::Weight => "weight",
        }
    }
}

impl fmt::Display for ForecastMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub future_day: i64,
    pub projected_value: f64,
    pub confidence_radius: f64,
    pub tier: Tier,
    pub metric: ForecastMetric,
}

impl Forecast {
    pub fn lower_bound(&self) -> f64 {
        self.projected_value - self.confidence_radius
    }

    pub fn upper_bound(&self) -> f64 {
        self.projected_value + self.confidence_radius
    }
}

/// Everything the presentation layer needs to draw one exercise's projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub user_id: i64,
    pub exercise: String,
    pub tier: Tier,
    pub reps: Vec<Forecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Vec<Forecast>>,
    pub history: Vec<SeriesPoint>,
    pub latest_strength: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    pub user_id: i64,
    pub exercise: String,
    pub horizon_days: Option<usize>,
    pub degree: Option<usize>,
    pub initial_tier: Option<Tier>,
}
