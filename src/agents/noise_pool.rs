// src/agents/noise_pool.rs

use super::config::NoisePoolConfig;
use super::cooldown::FlooredExp;
use super::pool::{PoolCore, may_decide};
use super::pool_trait::{MarketContext, TraderPool};
use super::pool_type::PoolKind;
use crate::error::ConfigResult;
use rand::{Rng, RngCore};

/// Uninformed traders: each active trader flips a three-way coin (buy, sell, sit)
/// and trades an exponentially distributed size.
#[derive(Debug, Clone)]
pub struct NoisePool {
    config: NoisePoolConfig,
    core: PoolCore,
    trade_size: FlooredExp,
    wait: FlooredExp,
}

impl NoisePool {
    pub fn new<R: Rng + ?Sized>(config: NoisePoolConfig, rng: &mut R) -> ConfigResult<Self> {
        config.validate()?;
        let trade_size = FlooredExp::with_mean("noise.average_trade_amount", config.average_trade_amount)?;
        let wait = FlooredExp::with_mean("noise.average_wait_time", config.average_wait_time)?;
        let core = PoolCore::new(&config.setup(), rng, |_, r| wait.sample(r));

        Ok(Self {
            config,
            core,
            trade_size,
            wait,
        })
    }

    pub fn config(&self) -> &NoisePoolConfig {
        &self.config
    }
}

impl TraderPool for NoisePool {
    fn kind(&self) -> PoolKind {
        PoolKind::Noise
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
        let trade_size = self.trade_size;
        self.core.queue_bankruptcies(price, rng, |r| trade_size.sample(r));

        let (buy_prob, sell_prob) = (self.config.buy_prob, self.config.sell_prob);
        let floor = self.core.bankruptcy_cash();
        for trader in self.core.traders_mut() {
            if !may_decide(trader, floor) {
                continue;
            }
            let u: f64 = rng.gen_range(0.0..1.0);
            if u < buy_prob {
                trader.order_positions = trade_size.sample(rng);
            } else if u < buy_prob + sell_prob {
                trader.order_positions = -trade_size.sample(rng);
            }
        }

        let wait = self.wait;
        self.core.tick_cooldowns(rng, |_, r| wait.sample(r));
    }
}
