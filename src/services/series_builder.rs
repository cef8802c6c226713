use crate::models::observation::{Observation, SeriesPoint};
use crate::utils::timestamp::whole_days_between;

/// Numeric view of one exercise history on a days-since-first-set axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSeries {
    pub days: Vec<i64>,
    pub reps: Vec<i64>,
    pub weights: Vec<f64>,
    pub strength: Vec<f64>,
    /// True when any set carried external load.
    pub weighted: bool,
}

impl BuiltSeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn last_day(&self) -> Option<i64> {
        self.days.last().copied()
    }

    pub fn last_reps(&self) -> Option<i64> {
        self.reps.last().copied()
    }

    pub fn last_weight(&self) -> Option<f64> {
        self.weights.last().copied()
    }

    pub fn day_axis(&self) -> Vec<f64> {
        self.days.iter().map(|day| *day as f64).collect()
    }

    pub fn reps_axis(&self) -> Vec<f64> {
        self.reps.iter().map(|reps| *reps as f64).collect()
    }

    pub fn distinct_days(&self) -> usize {
        let mut count = 0;
        let mut previous = None;
        for day in &self.days {
            if previous != Some(*day) {
                count += 1;
                previous = Some(*day);
            }
        }
        count
    }

    pub fn points(&self) -> Vec<SeriesPoint> {
        (0..self.len())
            .map(|index| SeriesPoint {
                day: self.days[index],
                reps: self.reps[index],
                weight: self.weights[index],
                strength: self.strength[index],
            })
            .collect()
    }
}

/// Builds the day axis and derived metrics. Never fails; empty input yields an
/// empty series. Rows are stable-sorted by timestamp first, so `days` starts at
/// zero and never decreases.
pub fn build_series(observations: &[Observation]) -> BuiltSeries {
    let mut ordered: Vec<&Observation> = observations.iter().collect();
    ordered.sort_by_key(|observation| observation.timestamp);

    let Some(first) = ordered.first() else {
        return BuiltSeries::default();
    };
    let origin = first.timestamp;

    let mut series = BuiltSeries {
        days: Vec::with_capacity(ordered.len()),
        reps: Vec::with_capacity(ordered.len()),
        weights: Vec::with_capacity(ordered.len()),
        strength: Vec::with_capacity(ordered.len()),
        weighted: false,
    };

    for observation in ordered {
        series
            .days
            .push(whole_days_between(&origin, &observation.timestamp));
        series.reps.push(observation.reps);
        series.weights.push(observation.weight);
        series.strength.push(observation.strength_score());
        series.weighted |= !observation.is_bodyweight;
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = build_series(&[]);
        assert!(series.is_empty());
        assert_eq!(series.last_day(), None);
        assert_eq!(series.distinct_days(), 0);
    }

    #[test]
    fn day_axis_starts_at_zero_and_counts_whole_days() {
        let series = build_series(&[
            Observation::new(at(1, 18), 5, 0.0, true),
            Observation::new(at(2, 8), 6, 0.0, true),
            Observation::new(at(11, 18), 10, 0.0, true),
        ]);

        assert_eq!(series.days, vec![0, 0, 10]);
        assert_eq!(series.reps, vec![5, 6, 10]);
        assert_eq!(series.distinct_days(), 2);
        assert!(!series.weighted);
    }

    #[test]
    fn out_of_order_rows_are_sorted_and_duplicates_kept() {
        let series = build_series(&[
            Observation::new(at(5, 9), 8, 40.0, false),
            Observation::new(at(1, 9), 5, 30.0, false),
            Observation::new(at(5, 9), 9, 40.0, false),
        ]);

        assert_eq!(series.days, vec![0, 4, 4]);
        assert_eq!(series.reps, vec![5, 8, 9]);
        assert!(series.weighted);
        assert_eq!(series.points().len(), 3);
        assert!((series.strength[0] - 35.0).abs() < 1e-9);
    }
}
