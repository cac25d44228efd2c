// src/agents/value_pool.rs

use super::config::ValuePoolConfig;
use super::cooldown::FlooredExp;
use super::pool::{PoolCore, may_decide, units};
use super::pool_trait::{MarketContext, TraderPool};
use super::pool_type::PoolKind;
use crate::error::{ConfigError, ConfigResult};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

/// Fundamental traders. Each decision re-estimates intrinsic value around the
/// market's basic value, shifts it by the trader's own bias, and trades when
/// price leaves the `[buy_band, sell_band]` corridor around that estimate.
#[derive(Debug, Clone)]
pub struct ValuePool {
    config: ValuePoolConfig,
    core: PoolCore,
    /// Per-trader valuation bias, parallel to the trader table.
    bias: Vec<f64>,
    estimate_noise: Normal<f64>,
    wait: FlooredExp,
}

impl ValuePool {
    pub fn new<R: Rng + ?Sized>(config: ValuePoolConfig, rng: &mut R) -> ConfigResult<Self> {
        config.validate()?;
        let estimate_noise = Normal::new(0.0, config.decision_deviation).map_err(|_| {
            ConfigError::NonPositive {
                field: "value.decision_deviation",
                value: config.decision_deviation,
            }
        })?;
        let wait = FlooredExp::with_mean("value.average_wait_time", config.average_wait_time)?;

        let bias: Vec<f64> = (0..config.population).map(|_| config.bias.sample(rng)).collect();
        let core = PoolCore::new(&config.setup(), rng, |_, r| wait.sample(r));

        Ok(Self {
            config,
            core,
            bias,
            estimate_noise,
            wait,
        })
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub fn config(&self) -> &ValuePoolConfig {
        &self.config
    }
}

impl TraderPool for ValuePool {
    fn kind(&self) -> PoolKind {
        PoolKind::ValueInvestor
    }

    fn core(&self) -> &PoolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PoolCore {
        &mut self.core
    }

    fn decide(&mut self, ctx: &MarketContext, rng: &mut dyn RngCore) {
        let price = ctx.current_price;
        self.core.margin_calls(price);
        self.core.queue_bankruptcies(price, rng, |_| 0);

        let floor = self.core.bankruptcy_cash();
        let noise = self.estimate_noise;
        let cfg = &self.config;

        for (trader, bias) in self.core.traders_mut().iter_mut().zip(&self.bias) {
            if !may_decide(trader, floor) {
                continue;
            }
            let intrinsic = ctx.basic_value * (1.0 + noise.sample(rng)) * (1.0 + bias);
            if price < cfg.buy_band * intrinsic {
                trader.order_positions = units(trader.cash / price * cfg.buy_proportion.sample(rng));
            } else if price > cfg.sell_band * intrinsic && trader.positions > 0 {
                trader.order_positions =
                    -units(trader.positions as f64 * cfg.sell_proportion.sample(rng));
            }
        }

        let wait = self.wait;
        self.core.tick_cooldowns(rng, |_, r| wait.sample(r));
    }
}

// ---- Unit Tests ----
#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::config::Span;
    use crate::types::TraderRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn context(price: f64, basic_value: f64) -> MarketContext {
        MarketContext {
            current_price: price,
            basic_value,
            depth: 1_000.0,
            sentiment: 0.0,
        }
    }

    fn unbiased_pool(rng: &mut StdRng) -> ValuePool {
        let config = ValuePoolConfig {
            population: 1,
            bias: Span::new(0.0, 1e-12),
            ..ValuePoolConfig::default()
        };
        let mut pool = ValuePool::new(config, rng).unwrap();
        pool.core_mut().traders_mut()[0] = TraderRecord::new(50_000.0, 800, 0);
        pool
    }

    #[test]
    fn cheap_stock_is_bought() {
        // Arrange: price 20 is far below 0.9 · 30 even after estimate noise
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = unbiased_pool(&mut rng);

        // Act
        pool.decide(&context(20.0, 30.0), &mut rng);

        // Assert
        let order = pool.traders()[0].order_positions;
        assert!((250..=500).contains(&order), "order {}", order);
    }

    #[test]
    fn expensive_stock_is_sold() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = unbiased_pool(&mut rng);

        pool.decide(&context(40.0, 30.0), &mut rng);

        let order = pool.traders()[0].order_positions;
        assert!((-240..=-160).contains(&order), "order {}", order);
    }

    #[test]
    fn fair_price_is_left_alone() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = unbiased_pool(&mut rng);

            pool.decide(&context(30.0, 30.0), &mut rng);

            assert_eq!(pool.traders()[0].order_positions, 0);
        }
    }

    #[test]
    fn bias_stays_in_configured_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = ValuePool::new(ValuePoolConfig::default(), &mut rng).unwrap();

        assert_eq!(pool.bias().len(), pool.population());
        assert!(pool.bias().iter().all(|b| (-0.05..0.05).contains(b)));
    }

    #[test]
    fn underwater_investor_is_forced_to_sell() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = unbiased_pool(&mut rng);
        pool.core_mut().traders_mut()[0] = TraderRecord::new(1_500.0, 800, 0);

        pool.decide(&context(20.0, 30.0), &mut rng);

        // (2500 - 1500) / 20 · 2 = 100, no discretionary buy on top
        assert_eq!(pool.traders()[0].order_positions, -100);
    }
}
