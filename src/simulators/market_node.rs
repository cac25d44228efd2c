// src/simulators/market_node.rs

use super::config::{MIN_PRICE, MarketConfig, PRICE_DECIMALS};
use crate::error::{ConfigError, ConfigResult};
use crate::sentiment::sentiment_index;
use crate::stats::WINDOW_CAPACITY;
use crate::types::{Candle, DayBars, Side};
use rand::Rng;
use rand::distributions::Distribution;
use rand_distr::Normal;
use statrs::distribution::Laplace;

/// The single traded asset: price, liquidity, sentiment, fundamental value and
/// the price history the pools and the charting layer read.
///
/// Flow arrives through [`MarketNode::clinch`] during a tick and is folded into
/// the price once by [`MarketNode::tick_update`]. [`MarketNode::day_update`]
/// closes the day's bar and applies the overnight regime shift.
#[derive(Debug, Clone)]
pub struct MarketNode {
    config: MarketConfig,
    current_price: f64,
    depth: f64,
    basic_value: f64,
    sentiment_index: f64,
    buy_per_tick: u64,
    sell_per_tick: u64,
    tick_price_history: Vec<f64>,
    day_price_history: DayBars,
    last_tick: u64,
    tick_noise: Option<Normal<f64>>,
    gap_normal: Normal<f64>,
    gap_laplace: Laplace,
}

impl MarketNode {
    pub fn new(config: MarketConfig) -> ConfigResult<Self> {
        config.validate()?;

        let tick_noise = if config.tick_noise_std > 0.0 {
            Some(normal(0.0, config.tick_noise_std, "market.tick_noise_std")?)
        } else {
            None
        };
        let gap_normal = normal(0.0, config.night.gap_normal_std, "night.gap_normal_std")?;
        let gap_laplace = Laplace::new(0.0, config.night.gap_laplace_scale).map_err(|_| {
            ConfigError::NonPositive {
                field: "night.gap_laplace_scale",
                value: config.night.gap_laplace_scale,
            }
        })?;

        Ok(Self {
            current_price: config.initial_price,
            depth: config.initial_depth.clamp(config.depth_min, config.depth_max),
            basic_value: config.initial_basic_value,
            sentiment_index: 0.0,
            buy_per_tick: 0,
            sell_per_tick: 0,
            tick_price_history: Vec::new(),
            day_price_history: DayBars::default(),
            last_tick: 0,
            tick_noise,
            gap_normal,
            gap_laplace,
            config,
        })
    }

    // === Flow ===

    /// Books a signed executed volume into this tick's buy or sell bucket.
    pub fn clinch(&mut self, signed_volume: i64) {
        match Side::of(signed_volume) {
            Some(Side::Buy) => self.buy_per_tick += signed_volume.unsigned_abs(),
            Some(Side::Sell) => self.sell_per_tick += signed_volume.unsigned_abs(),
            None => {}
        }
    }

    /// Advances the market one tick using the flow booked since the last tick.
    pub fn tick_update<R: Rng + ?Sized>(&mut self, tick: u64, rng: &mut R) {
        self.tick_price_history.push(self.current_price);
        self.last_tick = tick;

        let buy = self.buy_per_tick as f64;
        let sell = self.sell_per_tick as f64;
        self.update_depth(buy + sell);
        self.update_price(buy, sell, rng);
        self.sentiment_index = sentiment_index(buy - sell, self.depth, self.config.sentiment_gain);

        self.buy_per_tick = 0;
        self.sell_per_tick = 0;
    }

    fn update_depth(&mut self, volume: f64) {
        let alpha = self.config.depth_smoothing;
        self.depth = (alpha * self.depth + (1.0 - alpha) * volume)
            .clamp(self.config.depth_min, self.config.depth_max);
    }

    fn update_price<R: Rng + ?Sized>(&mut self, buy: f64, sell: f64, rng: &mut R) {
        let delta = self.config.impact.price_delta(buy, sell, self.depth);
        let mut price = self.current_price * (1.0 + delta * self.config.price_sensitivity);
        if let Some(noise) = &self.tick_noise {
            price += noise.sample(rng);
        }
        price = round_price(price);

        // tick history is never empty here: tick_update pushed before calling us
        let open = self.tick_price_history[0];
        let limit = self.config.day_limit;
        if (price - open) / open >= limit {
            log::debug!(
                "tick {}: upper day limit hit, {:.4} clamped to {:.4}",
                self.last_tick,
                price,
                open * (1.0 + limit)
            );
            price = open * (1.0 + limit);
        } else if let Some(down) = self.config.day_limit_down {
            if (open - price) / open >= down {
                log::debug!(
                    "tick {}: lower day limit hit, {:.4} clamped to {:.4}",
                    self.last_tick,
                    price,
                    open * (1.0 - down)
                );
                price = open * (1.0 - down);
            }
        }

        self.current_price = price.max(MIN_PRICE);
    }

    // === Day boundary ===

    /// Archives today's OHLC bar, runs the night trade and starts a fresh intraday history.
    pub fn day_update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let bar = Candle::from_ticks(&self.tick_price_history).unwrap_or(Candle {
            open: self.current_price,
            high: self.current_price,
            low: self.current_price,
            close: self.current_price,
        });
        self.day_price_history.push(bar);
        log::info!(
            "day {} closed: O {:.4} H {:.4} L {:.4} C {:.4}",
            self.day_price_history.len(),
            bar.open,
            bar.high,
            bar.low,
            bar.close
        );

        self.night_trade(rng);
        self.tick_price_history = vec![self.current_price];
    }

    /// Overnight regime shift: fundamental drift (crash-weighted), liquidity
    /// withdrawal and a fat-tailed opening gap.
    fn night_trade<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let night = self.config.night;

        let mut drift = rng.gen_range(-night.basic_value_drift..night.basic_value_drift);
        if drift < 0.0 {
            drift *= night.crash_weight;
        }
        self.basic_value *= 1.0 + drift;

        self.depth = (self.depth * night.depth_retention)
            .clamp(self.config.depth_min, self.config.depth_max);

        let gap = self.gap_normal.sample(rng) + self.gap_laplace.sample(rng);
        self.current_price = round_price(self.current_price * (1.0 + gap)).max(MIN_PRICE);

        log::info!(
            "night trade: gap {:+.4}, basic value {:.4}, depth {:.1}, open {:.4}",
            gap,
            self.basic_value,
            self.depth,
            self.current_price
        );
    }

    // === Observers ===

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn basic_value(&self) -> f64 {
        self.basic_value
    }

    pub fn market_depth(&self) -> f64 {
        self.depth
    }

    pub fn sentiment_index(&self) -> f64 {
        self.sentiment_index
    }

    /// Flow booked since the last `tick_update`, as (buy, sell).
    pub fn pending_volume(&self) -> (u64, u64) {
        (self.buy_per_tick, self.sell_per_tick)
    }

    pub fn tick_price_history(&self) -> &[f64] {
        &self.tick_price_history
    }

    /// At most the `n` most recent intraday tick prices.
    pub fn recent_ticks(&self, n: usize) -> &[f64] {
        let len = self.tick_price_history.len();
        &self.tick_price_history[len.saturating_sub(n)..]
    }

    pub fn ticks_1080(&self) -> &[f64] {
        self.recent_ticks(WINDOW_CAPACITY)
    }

    pub fn day_price_history(&self) -> &DayBars {
        &self.day_price_history
    }

    /// Number of completed trading days.
    pub fn day(&self) -> usize {
        self.day_price_history.len()
    }

    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }
}

fn normal(mean: f64, std_dev: f64, field: &'static str) -> ConfigResult<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|_| ConfigError::NonPositive {
        field,
        value: std_dev,
    })
}

fn round_price(price: f64) -> f64 {
    let scale = 10f64.powi(PRICE_DECIMALS);
    (price * scale).round() / scale
}
