use serde::{Deserialize, Serialize};

use crate::models::forecast::Tier;

pub const DEFAULT_Z_SCORE: f64 = 1.96;
pub const DEFAULT_HORIZON_DAYS: usize = 5;
pub const DEFAULT_DEGREE: usize = 2;
pub const DEFAULT_SNAPSHOT_TIME: &str = "08:00";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ceiling {
    pub max_reps: f64,
    pub max_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TierCeilings {
    pub intermediate: Ceiling,
    pub expert: Ceiling,
}

impl Default for TierCeilings {
    fn default() -> Self {
        Self {
            intermediate: Ceiling {
                max_reps: 150.0,
                max_weight: 70.0,
            },
            expert: Ceiling {
                max_reps: 200.0,
                max_weight: 90.0,
            },
        }
    }
}

impl TierCeilings {
    pub fn for_tier(&self, tier: Tier) -> Ceiling {
        match tier {
            Tier::Intermediate => self.intermediate,
            Tier::Expert => self.expert,
        }
    }
}

/// Heuristics that keep a raw curve projection plausible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernorPolicy {
    pub weight_growth_rate: f64,
    pub reps_growth_rate: f64,
    /// Share of the weight ceiling above which load is traded for reps.
    pub high_load_ratio: f64,
    /// Share of the weight ceiling below which reps are traded for load.
    pub low_load_ratio: f64,
    pub high_load_damping: f64,
    pub high_load_reps_boost: f64,
    pub low_load_weight_push: f64,
    pub low_load_reps_damping: f64,
    /// Largest weight gain allowed per projected step.
    pub max_growth_step: f64,
    pub allow_downward_drift: bool,
}

impl Default for GovernorPolicy {
    fn default() -> Self {
        Self {
            weight_growth_rate: 0.02,
            reps_growth_rate: 0.01,
            high_load_ratio: 0.9,
            low_load_ratio: 0.5,
            high_load_damping: 0.5,
            high_load_reps_boost: 0.05,
            low_load_weight_push: 0.02,
            low_load_reps_damping: 0.02,
            max_growth_step: 2.5,
            allow_downward_drift: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ConfidenceMethod {
    #[default]
    StandardError,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfidencePolicy {
    pub method: ConfidenceMethod,
    pub z_score: f64,
    /// Histories shorter than this get `small_sample_factor` applied. This is a
    /// product decision to show less certainty for new series, not statistics.
    pub small_sample_threshold: usize,
    pub small_sample_factor: f64,
    pub floor: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            method: ConfidenceMethod::StandardError,
            z_score: DEFAULT_Z_SCORE,
            small_sample_threshold: 5,
            small_sample_factor: 0.5,
            floor: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastPolicy {
    pub ceilings: TierCeilings,
    pub governor: GovernorPolicy,
    pub confidence: ConfidencePolicy,
    /// Share of a tier ceiling at which a user is promoted.
    pub promotion_ratio: f64,
    /// Lower the fit degree when there are too few distinct days for it.
    pub adapt_degree: bool,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            ceilings: TierCeilings::default(),
            governor: GovernorPolicy::default(),
            confidence: ConfidencePolicy::default(),
            promotion_ratio: 0.9,
            adapt_degree: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub policy: ForecastPolicy,
    pub default_horizon_days: usize,
    pub default_degree: usize,
    /// Local `HH:MM` at which the daily leaderboard snapshot runs.
    pub leaderboard_snapshot_time: String,
    pub updated_at: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            policy: ForecastPolicy::default(),
            default_horizon_days: DEFAULT_HORIZON_DAYS,
            default_degree: DEFAULT_DEGREE,
            leaderboard_snapshot_time: DEFAULT_SNAPSHOT_TIME.to_string(),
            updated_at: None,
        }
    }
}
