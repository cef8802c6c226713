use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Divisor of the Epley estimated-one-rep-max formula `weight × (1 + reps / 30)`.
pub const EPLEY_REPS_DIVISOR: f64 = 30.0;

/// One logged set, as seen by the forecasting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub reps: i64,
    pub weight: f64,
    pub is_bodyweight: bool,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, reps: i64, weight: f64, is_bodyweight: bool) -> Self {
        Self {
            timestamp,
            reps,
            weight,
            is_bodyweight,
        }
    }

    /// Estimated max-effort proxy. Bodyweight sets score their reps.
    pub fn strength_score(&self) -> f64 {
        if self.is_bodyweight {
            self.reps as f64
        } else {
            self.weight * (1.0 + self.reps as f64 / EPLEY_REPS_DIVISOR)
        }
    }
}

/// A historical point on the days-since-first-observation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub day: i64,
    pub reps: i64,
    pub weight: f64,
    pub strength: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn bodyweight_strength_is_reps() {
        let obs = Observation::new(at(1), 25, 0.0, true);
        assert_eq!(obs.strength_score(), 25.0);
    }

    #[test]
    fn weighted_strength_uses_epley() {
        let obs = Observation::new(at(1), 30, 50.0, false);
        assert!((obs.strength_score() - 100.0).abs() < 1e-9);

        let single = Observation::new(at(2), 1, 60.0, false);
        assert!((single.strength_score() - 62.0).abs() < 1e-9);
    }
}
