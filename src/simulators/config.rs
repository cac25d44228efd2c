// src/simulators/config.rs

//! A centralized place for tuning the price-formation process.

use super::impact::ImpactLaw;
use crate::error::{ConfigResult, ensure_positive, ensure_probability, ensure_range};
use serde::{Deserialize, Serialize};

// --- Seed state ---
pub const INITIAL_PRICE: f64 = 27.0;
pub const INITIAL_BASIC_VALUE: f64 = 30.0;
pub const INITIAL_DEPTH: f64 = 1_000.0;

// --- Liquidity ---
pub const DEPTH_MIN: f64 = 500.0;
pub const DEPTH_MAX: f64 = 5_000.0;
/// Weight of the previous depth in the per-tick exponential smoothing.
pub const DEPTH_SMOOTHING: f64 = 0.9;
/// Below this, depth-normalised quantities are treated as a zero signal.
pub const DEPTH_EPSILON: f64 = 1e-9;

// --- Price impact ---
pub const PRICE_SENSITIVITY: f64 = 0.0004;
pub const IMPACT_DECAY: f64 = 0.1;
pub const TICK_NOISE_STD: f64 = 0.0001;
pub const PRICE_DECIMALS: i32 = 4;
pub const MIN_PRICE: f64 = 0.0001;
/// Max intraday rise relative to the day's opening tick.
pub const DAY_LIMIT: f64 = 0.07;

// --- Sentiment ---
pub const SENTIMENT_GAIN: f64 = 5.0;

// --- Night trade ---
pub const BASIC_VALUE_DRIFT: f64 = 0.02;
/// Downward fundamental moves are scaled by this factor.
pub const CRASH_WEIGHT: f64 = 2.0;
pub const OVERNIGHT_DEPTH_RETENTION: f64 = 0.6;
pub const GAP_NORMAL_STD: f64 = 0.02;
pub const GAP_LAPLACE_SCALE: f64 = 0.005;

// --- Calendar ---
/// Ticks per trading day (one per second over a four-hour session).
pub const DAY_TICKS: u64 = 14_400;

/// Overnight regime shift parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightTradeConfig {
    pub basic_value_drift: f64,
    pub crash_weight: f64,
    pub depth_retention: f64,
    pub gap_normal_std: f64,
    pub gap_laplace_scale: f64,
}

impl Default for NightTradeConfig {
    fn default() -> Self {
        Self {
            basic_value_drift: BASIC_VALUE_DRIFT,
            crash_weight: CRASH_WEIGHT,
            depth_retention: OVERNIGHT_DEPTH_RETENTION,
            gap_normal_std: GAP_NORMAL_STD,
            gap_laplace_scale: GAP_LAPLACE_SCALE,
        }
    }
}

impl NightTradeConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("night.basic_value_drift", self.basic_value_drift)?;
        ensure_positive("night.crash_weight", self.crash_weight)?;
        ensure_probability("night.depth_retention", self.depth_retention)?;
        ensure_positive("night.gap_normal_std", self.gap_normal_std)?;
        ensure_positive("night.gap_laplace_scale", self.gap_laplace_scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub initial_price: f64,
    pub initial_basic_value: f64,
    pub initial_depth: f64,
    pub depth_min: f64,
    pub depth_max: f64,
    pub depth_smoothing: f64,
    pub price_sensitivity: f64,
    pub impact: ImpactLaw,
    /// Std-dev of the additive per-tick price noise; 0 disables it.
    pub tick_noise_std: f64,
    pub day_limit: f64,
    /// Optional mirror of `day_limit` for intraday falls.
    pub day_limit_down: Option<f64>,
    pub sentiment_gain: f64,
    pub night: NightTradeConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            initial_price: INITIAL_PRICE,
            initial_basic_value: INITIAL_BASIC_VALUE,
            initial_depth: INITIAL_DEPTH,
            depth_min: DEPTH_MIN,
            depth_max: DEPTH_MAX,
            depth_smoothing: DEPTH_SMOOTHING,
            price_sensitivity: PRICE_SENSITIVITY,
            impact: ImpactLaw::default(),
            tick_noise_std: TICK_NOISE_STD,
            day_limit: DAY_LIMIT,
            day_limit_down: None,
            sentiment_gain: SENTIMENT_GAIN,
            night: NightTradeConfig::default(),
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("market.initial_price", self.initial_price)?;
        ensure_positive("market.initial_basic_value", self.initial_basic_value)?;
        ensure_positive("market.depth_min", self.depth_min)?;
        ensure_range("market.depth", self.depth_min, self.depth_max)?;
        ensure_positive("market.initial_depth", self.initial_depth)?;
        ensure_probability("market.depth_smoothing", self.depth_smoothing)?;
        ensure_positive("market.price_sensitivity", self.price_sensitivity)?;
        if self.tick_noise_std != 0.0 {
            ensure_positive("market.tick_noise_std", self.tick_noise_std)?;
        }
        ensure_positive("market.day_limit", self.day_limit)?;
        if let Some(down) = self.day_limit_down {
            ensure_probability("market.day_limit_down", down)?;
        }
        ensure_positive("market.sentiment_gain", self.sentiment_gain)?;
        self.impact.validate()?;
        self.night.validate()
    }
}
