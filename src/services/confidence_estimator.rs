use crate::models::settings::{ConfidenceMethod, ConfidencePolicy};

/// Dispersion measure behind a symmetric confidence radius.
pub trait ConfidenceEstimator {
    /// Unscaled radius for `history`; the caller applies sample-size policy
    /// and the floor.
    fn raw_radius(&self, history: &[f64], z_score: f64) -> f64;
}

/// `z × σ / √n` with the population standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardErrorEstimator;

impl ConfidenceEstimator for StandardErrorEstimator {
    fn raw_radius(&self, history: &[f64], z_score: f64) -> f64 {
        if history.is_empty() {
            return 0.0;
        }
        let n = history.len() as f64;
        z_score * population_std_dev(history) / n.sqrt()
    }
}

/// `z × (max − min) / n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeEstimator;

impl ConfidenceEstimator for RangeEstimator {
    fn raw_radius(&self, history: &[f64], z_score: f64) -> f64 {
        if history.is_empty() {
            return 0.0;
        }
        let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = history.iter().copied().fold(f64::INFINITY, f64::min);
        z_score * (max - min) / history.len() as f64
    }
}

pub fn estimator_for(method: ConfidenceMethod) -> &'static dyn ConfidenceEstimator {
    match method {
        ConfidenceMethod::StandardError => &StandardErrorEstimator,
        ConfidenceMethod::Range => &RangeEstimator,
    }
}

/// Radius for one metric history under `policy`.
///
/// Short histories are scaled by `small_sample_factor`, then the result is
/// raised to `floor` so a band never collapses to zero width.
pub fn confidence_radius(history: &[f64], policy: &ConfidencePolicy) -> f64 {
    let mut radius = estimator_for(policy.method).raw_radius(history, policy.z_score);

    if history.len() < policy.small_sample_threshold {
        radius *= policy.small_sample_factor;
    }

    if !radius.is_finite() {
        return policy.floor;
    }
    radius.max(policy.floor)
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
