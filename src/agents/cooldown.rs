// src/agents/cooldown.rs

//! Tick-count draws for trader waits and trade sizes.

use crate::error::{ConfigError, ConfigResult};
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// `floor(Exponential(mean))` as a non-negative integer count.
#[derive(Debug, Clone, Copy)]
pub struct FlooredExp {
    dist: Exp<f64>,
}

impl FlooredExp {
    pub fn with_mean(field: &'static str, mean: f64) -> ConfigResult<Self> {
        if !(mean > 0.0 && mean.is_finite()) {
            return Err(ConfigError::NonPositive { field, value: mean });
        }
        let dist = Exp::new(1.0 / mean).map_err(|_| ConfigError::NonPositive { field, value: mean })?;
        Ok(Self { dist })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let x: f64 = self.dist.sample(rng);
        x.floor().clamp(0.0, i32::MAX as f64) as i32
    }
}

/// Uniform cooldown in `[horizon·lo, horizon·hi)` ticks.
pub fn horizon_cooldown<R: Rng + ?Sized>(rng: &mut R, horizon: usize, (lo, hi): (usize, usize)) -> i32 {
    let (start, end) = (horizon * lo, horizon * hi);
    if start >= end {
        return start.min(i32::MAX as usize) as i32;
    }
    rng.gen_range(start..end).min(i32::MAX as usize) as i32
}
