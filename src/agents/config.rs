// src/agents/config.rs

//! A centralized place for tuning trader-pool behavior parameters.

use crate::error::{ConfigError, ConfigResult, ensure_positive, ensure_probability, ensure_range};
use crate::simulators::clearing::{ClearingPolicy, ShortSelling};
use crate::stats::WINDOW_CAPACITY;
use rand::Rng;
use serde::{Deserialize, Serialize};

// --- General ---
/// Forced-sale size multiplier on the cash shortfall below the bankruptcy floor.
pub const BANKRUPTCY_RECOVERY_FACTOR: f64 = 2.0;
pub const DEFAULT_COVER_TRIGGER: f64 = 0.25;
pub const DAILY_INCOME_MIN: f64 = 200.0;
pub const DAILY_INCOME_MAX: f64 = 400.0;

// --- Noise pool ---
pub const NOISE_POPULATION: usize = 500;
pub const NOISE_START_CASH_MIN: f64 = 10_000.0;
pub const NOISE_START_CASH_MAX: f64 = 30_000.0;
pub const NOISE_START_POSITIONS_MIN: i32 = 100;
pub const NOISE_START_POSITIONS_MAX: i32 = 300;
pub const NOISE_AVERAGE_TRADE_AMOUNT: f64 = 15.0;
pub const NOISE_AVERAGE_WAIT_TIME: f64 = 1.0;
pub const NOISE_BANKRUPTCY_CASH: f64 = 1_000.0;
pub const NOISE_BUY_PROB: f64 = 0.4;
pub const NOISE_SELL_PROB: f64 = 0.4;

// --- Momentum pool ---
pub const MOMENTUM_POPULATION: usize = 200;
pub const MOMENTUM_START_CASH_MIN: f64 = 10_000.0;
pub const MOMENTUM_START_CASH_MAX: f64 = 30_000.0;
pub const MOMENTUM_START_POSITIONS_MIN: i32 = 100;
pub const MOMENTUM_START_POSITIONS_MAX: i32 = 300;
pub const MOMENTUM_BANKRUPTCY_CASH: f64 = 1_000.0;
pub const MOMENTUM_JUDGE_COEF_MIN: f64 = 1.0;
pub const MOMENTUM_JUDGE_COEF_MAX: f64 = 1.5;
pub const MOMENTUM_RISK_COEF_MIN: f64 = 1.05;
pub const MOMENTUM_RISK_COEF_MAX: f64 = 1.15;
/// Long-horizon volatility is measured over this many decision horizons.
pub const MOMENTUM_LONG_HORIZON_MULT: usize = 3;
/// Initial cooldown is drawn from `[3t, 4t)`, later ones from `[t, 2t)`.
pub const MOMENTUM_WARMUP_COOLDOWN_MULT: (usize, usize) = (3, 4);
pub const MOMENTUM_ACTIVE_COOLDOWN_MULT: (usize, usize) = (1, 2);

// --- Value investor pool ---
pub const VALUE_POPULATION: usize = 300;
pub const VALUE_START_CASH_MIN: f64 = 40_000.0;
pub const VALUE_START_CASH_MAX: f64 = 80_000.0;
pub const VALUE_START_POSITIONS_MIN: i32 = 600;
pub const VALUE_START_POSITIONS_MAX: i32 = 1_000;
pub const VALUE_DECISION_DEVIATION: f64 = 0.015;
pub const VALUE_AVERAGE_WAIT_TIME: f64 = 240.0;
pub const VALUE_BANKRUPTCY_CASH: f64 = 2_500.0;
pub const VALUE_BIAS_MIN: f64 = -0.05;
pub const VALUE_BIAS_MAX: f64 = 0.05;
pub const VALUE_BUY_BAND: f64 = 0.9;
pub const VALUE_SELL_BAND: f64 = 1.1;

// --- Shared trade sizing (momentum & value) ---
pub const BUY_PROPORTION_MIN: f64 = 0.1;
pub const BUY_PROPORTION_MAX: f64 = 0.2;
pub const SELL_PROPORTION_MIN: f64 = 0.2;
pub const SELL_PROPORTION_MAX: f64 = 0.3;

/// Half-open real interval `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..self.max)
    }

    pub fn validate(&self, field: &'static str) -> ConfigResult<()> {
        ensure_range(field, self.min, self.max)
    }
}

/// Half-open integer interval `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntSpan {
    pub min: i32,
    pub max: i32,
}

impl IntSpan {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min..self.max)
    }

    pub fn validate(&self, field: &'static str) -> ConfigResult<()> {
        if self.min >= 0 && self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min as f64,
                max: self.max as f64,
            })
        }
    }
}

/// Everything the shared pool skeleton needs, independent of strategy.
#[derive(Debug, Clone, Copy)]
pub struct PoolSetup {
    pub population: usize,
    pub start_cash: Span,
    pub start_positions: IntSpan,
    pub bankruptcy_cash: f64,
    pub clearing: ClearingPolicy,
    pub daily_income: Option<Span>,
}

impl PoolSetup {
    fn validate(&self, pool: &'static str) -> ConfigResult<()> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation { pool });
        }
        self.start_cash.validate("start_cash")?;
        self.start_positions.validate("start_positions")?;
        ensure_positive("bankruptcy_cash", self.bankruptcy_cash)?;
        if let ShortSelling::Enabled { cover_trigger } = self.clearing.short_selling {
            ensure_positive("clearing.cover_trigger", cover_trigger)?;
        }
        if let Some(income) = self.daily_income {
            income.validate("daily_income")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
//  Noise
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoisePoolConfig {
    pub population: usize,
    pub start_cash: Span,
    pub start_positions: IntSpan,
    /// Mean of the exponential trade-size draw, in units.
    pub average_trade_amount: f64,
    /// Mean of the exponential cooldown draw, in ticks.
    pub average_wait_time: f64,
    pub bankruptcy_cash: f64,
    pub buy_prob: f64,
    pub sell_prob: f64,
    pub clearing: ClearingPolicy,
    pub daily_income: Option<Span>,
}

impl Default for NoisePoolConfig {
    fn default() -> Self {
        Self {
            population: NOISE_POPULATION,
            start_cash: Span::new(NOISE_START_CASH_MIN, NOISE_START_CASH_MAX),
            start_positions: IntSpan::new(NOISE_START_POSITIONS_MIN, NOISE_START_POSITIONS_MAX),
            average_trade_amount: NOISE_AVERAGE_TRADE_AMOUNT,
            average_wait_time: NOISE_AVERAGE_WAIT_TIME,
            bankruptcy_cash: NOISE_BANKRUPTCY_CASH,
            buy_prob: NOISE_BUY_PROB,
            sell_prob: NOISE_SELL_PROB,
            clearing: ClearingPolicy::default(),
            daily_income: None,
        }
    }
}

impl NoisePoolConfig {
    pub fn setup(&self) -> PoolSetup {
        PoolSetup {
            population: self.population,
            start_cash: self.start_cash,
            start_positions: self.start_positions,
            bankruptcy_cash: self.bankruptcy_cash,
            clearing: self.clearing,
            daily_income: self.daily_income,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.setup().validate("noise")?;
        ensure_positive("noise.average_trade_amount", self.average_trade_amount)?;
        ensure_positive("noise.average_wait_time", self.average_wait_time)?;
        ensure_probability("noise.buy_prob", self.buy_prob)?;
        ensure_probability("noise.sell_prob", self.sell_prob)?;
        ensure_probability("noise.buy_prob + noise.sell_prob", self.buy_prob + self.sell_prob)
    }
}

// -----------------------------------------------------------------------------
//  Momentum
// -----------------------------------------------------------------------------

/// One bucket of the decision-horizon mixture: `t ~ U[min, max)` with probability ∝ `weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonBand {
    pub min: usize,
    pub max: usize,
    pub weight: f64,
}

pub fn default_horizons() -> Vec<HorizonBand> {
    vec![
        HorizonBand { min: 30, max: 60, weight: 0.5 },
        HorizonBand { min: 120, max: 180, weight: 0.3 },
        HorizonBand { min: 240, max: 360, weight: 0.2 },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumPoolConfig {
    pub population: usize,
    pub start_cash: Span,
    pub start_positions: IntSpan,
    pub buy_proportion: Span,
    pub sell_proportion: Span,
    pub bankruptcy_cash: f64,
    pub horizons: Vec<HorizonBand>,
    pub judge_coef: Span,
    pub risk_coef: Span,
    pub clearing: ClearingPolicy,
    pub daily_income: Option<Span>,
}

impl Default for MomentumPoolConfig {
    fn default() -> Self {
        Self {
            population: MOMENTUM_POPULATION,
            start_cash: Span::new(MOMENTUM_START_CASH_MIN, MOMENTUM_START_CASH_MAX),
            start_positions: IntSpan::new(MOMENTUM_START_POSITIONS_MIN, MOMENTUM_START_POSITIONS_MAX),
            buy_proportion: Span::new(BUY_PROPORTION_MIN, BUY_PROPORTION_MAX),
            sell_proportion: Span::new(SELL_PROPORTION_MIN, SELL_PROPORTION_MAX),
            bankruptcy_cash: MOMENTUM_BANKRUPTCY_CASH,
            horizons: default_horizons(),
            judge_coef: Span::new(MOMENTUM_JUDGE_COEF_MIN, MOMENTUM_JUDGE_COEF_MAX),
            risk_coef: Span::new(MOMENTUM_RISK_COEF_MIN, MOMENTUM_RISK_COEF_MAX),
            clearing: ClearingPolicy::default(),
            daily_income: None,
        }
    }
}

impl MomentumPoolConfig {
    pub fn setup(&self) -> PoolSetup {
        PoolSetup {
            population: self.population,
            start_cash: self.start_cash,
            start_positions: self.start_positions,
            bankruptcy_cash: self.bankruptcy_cash,
            clearing: self.clearing,
            daily_income: self.daily_income,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.setup().validate("momentum")?;
        self.buy_proportion.validate("momentum.buy_proportion")?;
        self.sell_proportion.validate("momentum.sell_proportion")?;
        self.judge_coef.validate("momentum.judge_coef")?;
        self.risk_coef.validate("momentum.risk_coef")?;
        if self.horizons.is_empty() {
            return Err(ConfigError::InvalidRange {
                field: "momentum.horizons",
                min: 0.0,
                max: 0.0,
            });
        }
        for band in &self.horizons {
            if band.min == 0 || band.min >= band.max {
                return Err(ConfigError::InvalidRange {
                    field: "momentum.horizons",
                    min: band.min as f64,
                    max: band.max as f64,
                });
            }
            ensure_positive("momentum.horizons.weight", band.weight)?;
            // band.max is exclusive, so the longest drawable horizon is max - 1
            let lookback = (band.max - 1) * MOMENTUM_LONG_HORIZON_MULT;
            if lookback > WINDOW_CAPACITY {
                return Err(ConfigError::LookbackExceedsWindow {
                    lookback,
                    capacity: WINDOW_CAPACITY,
                });
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
//  Value investors
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuePoolConfig {
    pub population: usize,
    pub start_cash: Span,
    pub start_positions: IntSpan,
    pub buy_proportion: Span,
    pub sell_proportion: Span,
    /// Relative std-dev of each trader's intrinsic-value estimate.
    pub decision_deviation: f64,
    pub average_wait_time: f64,
    pub bankruptcy_cash: f64,
    /// Per-trader valuation bias range.
    pub bias: Span,
    pub buy_band: f64,
    pub sell_band: f64,
    pub clearing: ClearingPolicy,
    pub daily_income: Option<Span>,
}

impl Default for ValuePoolConfig {
    fn default() -> Self {
        Self {
            population: VALUE_POPULATION,
            start_cash: Span::new(VALUE_START_CASH_MIN, VALUE_START_CASH_MAX),
            start_positions: IntSpan::new(VALUE_START_POSITIONS_MIN, VALUE_START_POSITIONS_MAX),
            buy_proportion: Span::new(BUY_PROPORTION_MIN, BUY_PROPORTION_MAX),
            sell_proportion: Span::new(SELL_PROPORTION_MIN, SELL_PROPORTION_MAX),
            decision_deviation: VALUE_DECISION_DEVIATION,
            average_wait_time: VALUE_AVERAGE_WAIT_TIME,
            bankruptcy_cash: VALUE_BANKRUPTCY_CASH,
            bias: Span::new(VALUE_BIAS_MIN, VALUE_BIAS_MAX),
            buy_band: VALUE_BUY_BAND,
            sell_band: VALUE_SELL_BAND,
            clearing: ClearingPolicy::default(),
            daily_income: None,
        }
    }
}

impl ValuePoolConfig {
    pub fn setup(&self) -> PoolSetup {
        PoolSetup {
            population: self.population,
            start_cash: self.start_cash,
            start_positions: self.start_positions,
            bankruptcy_cash: self.bankruptcy_cash,
            clearing: self.clearing,
            daily_income: self.daily_income,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.setup().validate("value")?;
        self.buy_proportion.validate("value.buy_proportion")?;
        self.sell_proportion.validate("value.sell_proportion")?;
        ensure_positive("value.decision_deviation", self.decision_deviation)?;
        ensure_positive("value.average_wait_time", self.average_wait_time)?;
        self.bias.validate("value.bias")?;
        ensure_positive("value.buy_band", self.buy_band)?;
        ensure_range("value.bands", self.buy_band, self.sell_band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_validate() {
        assert!(NoisePoolConfig::default().validate().is_ok());
        assert!(MomentumPoolConfig::default().validate().is_ok());
        assert!(ValuePoolConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_population_is_rejected() {
        let cfg = NoisePoolConfig {
            population: 0,
            ..NoisePoolConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyPopulation { pool: "noise" })
        ));
    }

    #[test]
    fn horizon_beyond_window_is_rejected() {
        let cfg = MomentumPoolConfig {
            horizons: vec![HorizonBand { min: 300, max: 400, weight: 1.0 }],
            ..MomentumPoolConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::LookbackExceedsWindow { lookback: 1197, capacity: 1080 })
        ));
    }

    #[test]
    fn overlapping_noise_probabilities_are_rejected() {
        let cfg = NoisePoolConfig {
            buy_prob: 0.7,
            sell_prob: 0.5,
            ..NoisePoolConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidProbability { .. })));
    }

    #[test]
    fn inverted_value_bands_are_rejected() {
        let cfg = ValuePoolConfig {
            buy_band: 1.2,
            sell_band: 1.1,
            ..ValuePoolConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn spans_sample_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let span = Span::new(1.05, 1.15);
        let ints = IntSpan::new(100, 300);
        for _ in 0..1_000 {
            let x = span.sample(&mut rng);
            assert!((1.05..1.15).contains(&x));
            let n = ints.sample(&mut rng);
            assert!((100..300).contains(&n));
        }
    }
}
