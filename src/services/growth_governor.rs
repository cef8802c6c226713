use crate::models::settings::{Ceiling, GovernorPolicy};

/// Raw curve projections for the future steps, one value per step.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProjection {
    pub reps: Vec<f64>,
    pub weight: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GovernedProjection {
    pub reps: Vec<f64>,
    pub weight: Option<Vec<f64>>,
}

/// Clamps raw projections so that they grow plausibly from the last set.
#[derive(Debug, Clone, Copy)]
pub struct GrowthGovernor {
    policy: GovernorPolicy,
    ceiling: Ceiling,
}

impl GrowthGovernor {
    pub fn new(policy: GovernorPolicy, ceiling: Ceiling) -> Self {
        Self { policy, ceiling }
    }

    pub fn ceiling(&self) -> Ceiling {
        self.ceiling
    }

    pub fn govern(&self, last_reps: f64, last_weight: f64, raw: &RawProjection) -> GovernedProjection {
        let mut reps = Vec::with_capacity(raw.reps.len());
        let mut weight = raw.weight.as_ref().map(|values| Vec::with_capacity(values.len()));

        for (index, raw_reps) in raw.reps.iter().enumerate() {
            let step = (index + 1) as f64;
            let raw_weight = raw
                .weight
                .as_ref()
                .and_then(|values| values.get(index).copied());

            let (next_reps, next_weight) =
                self.govern_step(step, last_reps, last_weight, *raw_reps, raw_weight);

            reps.push(next_reps);
            if let (Some(values), Some(value)) = (weight.as_mut(), next_weight) {
                values.push(value);
            }
        }

        GovernedProjection { reps, weight }
    }

    fn govern_step(
        &self,
        step: f64,
        last_reps: f64,
        last_weight: f64,
        raw_reps: f64,
        raw_weight: Option<f64>,
    ) -> (f64, Option<f64>) {
        let policy = &self.policy;
        let mut reps = raw_reps * (1.0 + policy.reps_growth_rate);
        let mut weight = raw_weight.map(|value| value * (1.0 + policy.weight_growth_rate));

        if let Some(load) = weight.as_mut() {
            if *load > policy.high_load_ratio * self.ceiling.max_weight {
                *load = last_weight + (*load - last_weight) * policy.high_load_damping;
                reps *= 1.0 + policy.high_load_reps_boost;
            } else if *load < policy.low_load_ratio * self.ceiling.max_weight {
                *load *= 1.0 + policy.low_load_weight_push;
                reps *= 1.0 - policy.low_load_reps_damping;
            }

            *load = load.min(last_weight + policy.max_growth_step * step);
            *load = load.min(self.ceiling.max_weight);
        }

        reps = reps.min(self.ceiling.max_reps);

        if policy.allow_downward_drift {
            reps = reps.max(0.0);
            weight = weight.map(|load| load.max(0.0));
        } else {
            reps = reps.max(last_reps);
            weight = weight.map(|load| load.max(last_weight));
        }

        (reps, weight)
    }
}
