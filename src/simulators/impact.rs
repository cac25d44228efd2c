// src/simulators/impact.rs

use super::config::{DEPTH_EPSILON, IMPACT_DECAY};
use crate::error::{ConfigResult, ensure_positive};
use serde::{Deserialize, Serialize};

/// Maps one tick's aggregate flow to a relative price move (before sensitivity scaling).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum ImpactLaw {
    /// `Δ / sqrt(buy + sell + depth) · exp(-decay · (|Δ| / depth)²)`.
    /// Impact grows sub-linearly in volume and fades when the imbalance swamps depth.
    SquareRootGaussian { decay: f64 },
    /// `Δ / depth`.
    Linear,
}

impl Default for ImpactLaw {
    fn default() -> Self {
        ImpactLaw::SquareRootGaussian {
            decay: IMPACT_DECAY,
        }
    }
}

impl ImpactLaw {
    pub fn price_delta(&self, buy: f64, sell: f64, depth: f64) -> f64 {
        if depth <= DEPTH_EPSILON {
            return 0.0;
        }
        let net = buy - sell;
        match *self {
            ImpactLaw::SquareRootGaussian { decay } => {
                let scale = buy + sell + depth;
                if scale <= DEPTH_EPSILON {
                    return 0.0;
                }
                let imbalance = net.abs() / depth;
                net / scale.sqrt() * (-decay * imbalance * imbalance).exp()
            }
            ImpactLaw::Linear => net / depth,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            ImpactLaw::SquareRootGaussian { decay } => ensure_positive("impact.decay", decay),
            ImpactLaw::Linear => Ok(()),
        }
    }
}
