use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::forecast::{Forecast, ForecastMetric, ForecastReport, Tier};
use crate::models::observation::Observation;
use crate::models::settings::ForecastPolicy;
use crate::services::confidence_estimator::confidence_radius;
use crate::services::curve_fitter::fit_polynomial;
use crate::services::growth_governor::{GrowthGovernor, RawProjection};
use crate::services::series_builder::{build_series, BuiltSeries};
use crate::services::tier_classifier::TierClassifier;

pub const MIN_OBSERVATIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    pub horizon_days: usize,
    pub degree: usize,
    pub initial_tier: Tier,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            horizon_days: crate::models::settings::DEFAULT_HORIZON_DAYS,
            degree: crate::models::settings::DEFAULT_DEGREE,
            initial_tier: Tier::Intermediate,
        }
    }
}

#[derive(Debug, Clone)]
struct Projection {
    tier: Tier,
    reps: Vec<Forecast>,
    weight: Option<Vec<Forecast>>,
    series: BuiltSeries,
}

/// Fits, governs and bands a single exercise history. Holds no state besides
/// its policy, so one engine can serve any number of series.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    policy: ForecastPolicy,
}

impl ForecastEngine {
    pub fn new(policy: ForecastPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    /// Projects reps for `last_day + 1 ..= last_day + horizon_days`.
    pub fn forecast(
        &self,
        series: &[Observation],
        horizon_days: usize,
        degree: usize,
    ) -> AppResult<Vec<Forecast>> {
        let request = ForecastRequest {
            horizon_days,
            degree,
            initial_tier: Tier::Intermediate,
        };
        Ok(self.project(series, &request)?.reps)
    }

    pub fn forecast_report(
        &self,
        user_id: i64,
        exercise: &str,
        series: &[Observation],
        request: &ForecastRequest,
    ) -> AppResult<ForecastReport> {
        let projection = self.project(series, request)?;
        let latest_strength = projection.series.strength.last().copied().unwrap_or(0.0);

        Ok(ForecastReport {
            user_id,
            exercise: exercise.to_string(),
            tier: projection.tier,
            reps: projection.reps,
            weight: projection.weight,
            history: projection.series.points(),
            latest_strength,
        })
    }

    fn project(&self, observations: &[Observation], request: &ForecastRequest) -> AppResult<Projection> {
        if observations.len() < MIN_OBSERVATIONS {
            return Err(AppError::insufficient_data(
                MIN_OBSERVATIONS,
                observations.len(),
            ));
        }
        if request.horizon_days == 0 {
            return Err(AppError::validation("forecast horizon must be at least one day"));
        }
        if request.degree == 0 {
            return Err(AppError::underdetermined_fit(0, observations.len()));
        }

        let series = build_series(observations);
        let (Some(last_day), Some(last_reps), Some(last_weight)) =
            (series.last_day(), series.last_reps(), series.last_weight())
        else {
            return Err(AppError::insufficient_data(MIN_OBSERVATIONS, 0));
        };
        let last_reps = last_reps as f64;

        let classifier = TierClassifier::new(self.policy.ceilings, self.policy.promotion_ratio);
        let tier = classifier.classify(request.initial_tier, last_reps, last_weight);
        let ceiling = classifier.ceiling_for(tier);

        let degree = self.effective_degree(&series, request.degree);
        debug!(
            target: "liftcast::forecast",
            samples = series.len(),
            requested_degree = request.degree,
            degree,
            tier = %tier,
            "projecting series"
        );

        let days = series.day_axis();
        let future_days: Vec<i64> = (1..=request.horizon_days as i64)
            .map(|offset| last_day + offset)
            .collect();
        let future_axis: Vec<f64> = future_days.iter().map(|day| *day as f64).collect();

        let reps_history = series.reps_axis();
        let raw = RawProjection {
            reps: raw_projection(&days, &reps_history, degree, &future_axis, last_reps)?,
            weight: if series.weighted {
                Some(raw_projection(
                    &days,
                    &series.weights,
                    degree,
                    &future_axis,
                    last_weight,
                )?)
            } else {
                None
            },
        };

        let governed = GrowthGovernor::new(self.policy.governor, ceiling).govern(
            last_reps,
            last_weight,
            &raw,
        );

        let reps_radius = confidence_radius(&reps_history, &self.policy.confidence);
        let reps = build_records(&future_days, &governed.reps, reps_radius, tier, ForecastMetric::Reps);

        let weight = governed.weight.map(|values| {
            let radius = confidence_radius(&series.weights, &self.policy.confidence);
            build_records(&future_days, &values, radius, tier, ForecastMetric::Weight)
        });

        Ok(Projection {
            tier,
            reps,
            weight,
            series,
        })
    }

    /// With `adapt_degree`, the degree drops to what the distinct days can
    /// support; zero means a flat projection.
    fn effective_degree(&self, series: &BuiltSeries, requested: usize) -> usize {
        if !self.policy.adapt_degree {
            return requested;
        }
        requested.min(series.distinct_days().saturating_sub(1))
    }
}

fn raw_projection(
    days: &[f64],
    values: &[f64],
    degree: usize,
    future_axis: &[f64],
    last_value: f64,
) -> AppResult<Vec<f64>> {
    if degree == 0 {
        return Ok(vec![last_value; future_axis.len()]);
    }
    let curve = fit_polynomial(days, values, degree)?;
    Ok(future_axis.iter().map(|day| curve.evaluate(*day)).collect())
}

fn build_records(
    future_days: &[i64],
    values: &[f64],
    radius: f64,
    tier: Tier,
    metric: ForecastMetric,
) -> Vec<Forecast> {
    future_days
        .iter()
        .zip(values)
        .map(|(day, value)| Forecast {
            future_day: *day,
            projected_value: *value,
            confidence_radius: radius,
            tier,
            metric,
        })
        .collect()
}
