// src/agents/momentum_pool.rs

use super::config::{
    MOMENTUM_ACTIVE_COOLDOWN_MULT, MOMENTUM_LONG_HORIZON_MULT, MOMENTUM_WARMUP_COOLDOWN_MULT,
    MomentumPoolConfig,
};
use super::cooldown::horizon_cooldown;
use super::pool::{PoolCore, may_decide, units};
use super::pool_trait::{MarketContext, TraderPool};
use super::pool_type::PoolKind;
use crate::error::{ConfigError, ConfigResult};
use crate::stats::RollingWindowStats;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

/// Per-trader strategy coefficients, parallel to the trader table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumCoefs {
    /// Short horizon `t` in ticks; volatility is judged over `3t`.
    pub decision_time: usize,
    pub judge_coef: f64,
    pub risk_coef: f64,
}

/// Trend followers. A trader buys when price sits well above its `t`-tick moving
/// average relative to the longer-horizon volatility, sells on the mirror signal,
/// and dumps everything once price runs `risk_coef` above the average.
#[derive(Debug, Clone)]
pub struct MomentumPool {
    config: MomentumPoolConfig,
    core: PoolCore,
    coefs: Vec<MomentumCoefs>,
    window: RollingWindowStats,
}

impl MomentumPool {
    pub fn new<R: Rng + ?Sized>(config: MomentumPoolConfig, rng: &mut R) -> ConfigResult<Self> {
        config.validate()?;
        let pick = WeightedIndex::new(config.horizons.iter().map(|b| b.weight)).map_err(|_| {
            ConfigError::InvalidRange {
                field: "momentum.horizons",
                min: 0.0,
                max: 0.0,
            }
        })?;

        let coefs: Vec<MomentumCoefs> = (0..config.population)
            .map(|_| {
                let band = config.horizons[pick.sample(rng)];
                MomentumCoefs {
                    decision_time: rng.gen_range(band.min..band.max),
                    judge_coef: config.judge_coef.sample(rng),
                    risk_coef: config.risk_coef.sample(rng),
                }
            })
            .collect();

        let core = PoolCore::new(&config.setup(), rng, |i, r| {
            horizon_cooldown(r, coefs[i].decision_time, MOMENTUM_WARMUP_COOLDOWN_MULT)
        });

        Ok(Self {
            config,
            core,
            coefs,
            window: RollingWindowStats::default(),
        })
    }

    pub fn coefs(&self) -> &[MomentumCoefs] {
        &self.coefs
    }

    pub fn window(&self) -> &RollingWindowStats {
        &self.window
    }

    pub fn config(&self) -> &MomentumPoolConfig {
        &self.config
    }
}

impl TraderPool for MomentumPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Momentum
    }

    fn core(&self) -> &PoolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PoolCore {
        &mut self.core
    }

    fn decide(&mut self, ctx: &MarketContext, rng: &mut dyn RngCore) {
        let price = ctx.current_price;
        self.window.append(price);
        self.core.margin_calls(price);
        self.core.queue_bankruptcies(price, rng, |_| 0);

        let floor = self.core.bankruptcy_cash();
        let window = &self.window;
        let (buy_prop, sell_prop) = (self.config.buy_proportion, self.config.sell_proportion);

        for (trader, coef) in self.core.traders_mut().iter_mut().zip(&self.coefs) {
            if !may_decide(trader, floor) {
                continue;
            }
            let t = coef.decision_time;
            if window.len() < t * MOMENTUM_LONG_HORIZON_MULT {
                continue;
            }
            let (Some(ma), Some(sigma), Some(sigma_long)) = (
                window.moving_average(t),
                window.moving_std(t),
                window.moving_std(t * MOMENTUM_LONG_HORIZON_MULT),
            ) else {
                continue;
            };

            // Take profit first.
            if price > ma * coef.risk_coef {
                if trader.positions > 0 {
                    trader.order_positions = -trader.positions;
                }
                continue;
            }

            let signal = if sigma > 0.0 { (price - ma) / sigma } else { 0.0 };
            let judge = coef.judge_coef * sigma_long;
            if signal > judge {
                trader.order_positions = units(trader.cash / price * buy_prop.sample(rng));
            } else if signal < -judge && trader.positions > 0 {
                trader.order_positions = -units(trader.positions as f64 * sell_prop.sample(rng));
            }
        }

        let coefs = &self.coefs;
        self.core.tick_cooldowns(rng, |i, r| {
            horizon_cooldown(r, coefs[i].decision_time, MOMENTUM_ACTIVE_COOLDOWN_MULT)
        });
    }
}

// ---- Unit Tests ----
#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::config::{HorizonBand, Span};
    use crate::types::TraderRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn context(price: f64) -> MarketContext {
        MarketContext {
            current_price: price,
            basic_value: 30.0,
            depth: 1_000.0,
            sentiment: 0.0,
        }
    }

    /// One trader with a fixed 30-tick horizon, woken on demand.
    fn single_trader_pool(rng: &mut StdRng) -> MomentumPool {
        let config = MomentumPoolConfig {
            population: 1,
            horizons: vec![HorizonBand { min: 30, max: 31, weight: 1.0 }],
            judge_coef: Span::new(1.0, 1.0 + 1e-9),
            risk_coef: Span::new(1.5, 1.5 + 1e-9),
            ..MomentumPoolConfig::default()
        };
        let mut pool = MomentumPool::new(config, rng).unwrap();
        pool.core_mut().traders_mut()[0] = TraderRecord::new(20_000.0, 200, 1_000);
        pool
    }

    /// Feeds `prices` through the pool while the trader is still cooling down.
    fn warm_up(pool: &mut MomentumPool, prices: &[f64], rng: &mut StdRng) {
        for &p in prices {
            pool.core_mut().traders_mut()[0].cooldown = 1_000;
            pool.decide(&context(p), rng);
        }
    }

    #[test]
    fn coefficients_are_drawn_from_configured_bands() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = MomentumPool::new(MomentumPoolConfig::default(), &mut rng).unwrap();

        for (c, t) in pool.coefs().iter().zip(pool.traders()) {
            let in_band = (30..60).contains(&c.decision_time)
                || (120..180).contains(&c.decision_time)
                || (240..360).contains(&c.decision_time);
            assert!(in_band, "decision_time {}", c.decision_time);
            assert!((1.0..1.5).contains(&c.judge_coef));
            assert!((1.05..1.15).contains(&c.risk_coef));
            let h = c.decision_time as i32;
            assert!(t.cooldown >= 3 * h && t.cooldown < 4 * h);
        }
    }

    #[test]
    fn no_trading_before_enough_history() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = single_trader_pool(&mut rng);
        warm_up(&mut pool, &[27.0; 50], &mut rng);

        // Act: strong uptrend tick, but only 51 < 90 prices are known
        pool.core_mut().traders_mut()[0].cooldown = 0;
        pool.decide(&context(30.0), &mut rng);

        // Assert
        assert_eq!(pool.traders()[0].order_positions, 0);
    }

    #[test]
    fn breakout_above_the_average_buys() {
        // Arrange: a quiet oscillation, then a jump within the risk band
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = single_trader_pool(&mut rng);
        let prices: Vec<f64> = (0..120).map(|i| 27.0 + if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        warm_up(&mut pool, &prices, &mut rng);

        // Act
        pool.core_mut().traders_mut()[0].cooldown = 0;
        pool.decide(&context(27.5), &mut rng);

        // Assert: between 10% and 20% of cash worth of units
        let order = pool.traders()[0].order_positions;
        let max_units = (20_000.0_f64 / 27.5 * 0.2).floor() as i32;
        let min_units = (20_000.0_f64 / 27.5 * 0.1).floor() as i32;
        assert!(order >= min_units && order <= max_units, "order {}", order);
    }

    #[test]
    fn breakdown_below_the_average_sells_a_fraction() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = single_trader_pool(&mut rng);
        let prices: Vec<f64> = (0..120).map(|i| 27.0 + if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        warm_up(&mut pool, &prices, &mut rng);

        pool.core_mut().traders_mut()[0].cooldown = 0;
        pool.decide(&context(26.5), &mut rng);

        let order = pool.traders()[0].order_positions;
        assert!((-60..=-40).contains(&order), "order {}", order);
    }

    #[test]
    fn runaway_price_triggers_full_exit() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = single_trader_pool(&mut rng);
        warm_up(&mut pool, &[20.0; 100], &mut rng);

        // MA_30 = (29·20 + 31) / 30 ≈ 20.37, and 31 is past 1.5× that
        pool.core_mut().traders_mut()[0].cooldown = 0;
        pool.decide(&context(31.0), &mut rng);

        assert_eq!(pool.traders()[0].order_positions, -200);
    }

    #[test]
    fn flat_history_gives_no_signal() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut pool = single_trader_pool(&mut rng);
        warm_up(&mut pool, &[27.0; 100], &mut rng);

        pool.core_mut().traders_mut()[0].cooldown = 0;
        pool.decide(&context(27.0), &mut rng);

        assert_eq!(pool.traders()[0].order_positions, 0);
    }

    #[test]
    fn active_trader_cooldown_is_resampled_from_one_to_two_horizons() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = single_trader_pool(&mut rng);
        pool.core_mut().traders_mut()[0].cooldown = 0;

        pool.decide(&context(27.0), &mut rng);

        let c = pool.traders()[0].cooldown;
        assert!((30..60).contains(&c), "cooldown {}", c);
    }

    #[test]
    fn window_tracks_one_price_per_tick() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = single_trader_pool(&mut rng);
        for _ in 0..10 {
            pool.tick_decision(&context(27.0), &mut rng);
        }
        assert_eq!(pool.window().len(), 10);
    }
}
