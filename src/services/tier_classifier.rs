use crate::models::forecast::Tier;
use crate::models::settings::{Ceiling, TierCeilings};

/// Promotes users toward `Expert` once they approach their tier's ceiling.
/// There is no demotion.
#[derive(Debug, Clone, Copy)]
pub struct TierClassifier {
    ceilings: TierCeilings,
    promotion_ratio: f64,
}

impl TierClassifier {
    pub fn new(ceilings: TierCeilings, promotion_ratio: f64) -> Self {
        Self {
            ceilings,
            promotion_ratio,
        }
    }

    /// Resolves the tier from the most recent set. Called once per forecast,
    /// before any projection is governed.
    pub fn classify(&self, current: Tier, last_reps: f64, last_weight: f64) -> Tier {
        match current {
            Tier::Expert => Tier::Expert,
            Tier::Intermediate => {
                let ceiling = self.ceilings.for_tier(current);
                if last_reps >= self.promotion_ratio * ceiling.max_reps
                    || last_weight >= self.promotion_ratio * ceiling.max_weight
                {
                    Tier::Expert
                } else {
                    Tier::Intermediate
                }
            }
        }
    }

    pub fn ceiling_for(&self, tier: Tier) -> Ceiling {
        self.ceilings.for_tier(tier)
    }
}
