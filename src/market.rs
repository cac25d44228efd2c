// src/market.rs

use crate::agents::momentum_pool::MomentumPool;
use crate::agents::noise_pool::NoisePool;
use crate::agents::pool_trait::{MarketContext, TraderPool};
use crate::agents::pool_type::PoolKind;
use crate::agents::value_pool::ValuePool;
use crate::config::SimulationConfig;
use crate::error::ConfigResult;
use crate::simulators::market_node::MarketNode;
use crate::simulators::market_trait::Marketable;
use crate::types::DayBars;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// The simulation engine. It owns the world state (the market node), the
/// participants (one pool per strategy) and the single random stream every
/// component draws from, and runs the per-tick interaction loop.
pub struct Market {
    node: MarketNode,
    pools: Vec<Box<dyn TraderPool>>,
    rng: StdRng,
    tick: u64,
    config: SimulationConfig,
    seed: u64,
}

impl Market {
    pub fn new(config: SimulationConfig, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let node = MarketNode::new(config.market)?;

        let mut pools = Vec::with_capacity(PoolKind::ALL.len());
        for kind in PoolKind::ALL {
            if let Some(pool) = Self::create_pool_from_kind(kind, &config, &mut rng)? {
                pools.push(pool);
            }
        }

        info!(
            "market created: seed {}, price {:.4}, basic value {:.4}, pools [{}]",
            seed,
            node.current_price(),
            node.basic_value(),
            pools
                .iter()
                .map(|p| format!("{}×{}", p.kind(), p.population()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            node,
            pools,
            rng,
            tick: 0,
            config,
            seed,
        })
    }

    // Builds the pool for `kind` if the configuration enables it.
    fn create_pool_from_kind(
        kind: PoolKind,
        config: &SimulationConfig,
        rng: &mut StdRng,
    ) -> ConfigResult<Option<Box<dyn TraderPool>>> {
        let pool: Option<Box<dyn TraderPool>> = match kind {
            PoolKind::Noise => match &config.noise {
                Some(c) => Some(Box::new(NoisePool::new(*c, rng)?)),
                None => None,
            },
            PoolKind::Momentum => match &config.momentum {
                Some(c) => Some(Box::new(MomentumPool::new(c.clone(), rng)?)),
                None => None,
            },
            PoolKind::ValueInvestor => match &config.value {
                Some(c) => Some(Box::new(ValuePool::new(*c, rng)?)),
                None => None,
            },
        };
        Ok(pool)
    }

    /// Steps through `days` whole trading days and returns the daily bars so far.
    pub fn run_days(&mut self, days: usize) -> &DayBars {
        let ticks = days as u64 * self.config.day_ticks;
        for _ in 0..ticks {
            self.step();
        }
        self.node.day_price_history()
    }

    pub fn node(&self) -> &MarketNode {
        &self.node
    }

    pub fn pools(&self) -> &[Box<dyn TraderPool>] {
        &self.pools
    }

    pub fn pool(&self, kind: PoolKind) -> Option<&dyn TraderPool> {
        self.pools.iter().find(|p| p.kind() == kind).map(|p| p.as_ref())
    }

    /// Ticks processed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Completed trading days.
    pub fn day(&self) -> usize {
        self.node.day()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn close_day(&mut self) {
        self.node.day_update(&mut self.rng);
        for pool in self.pools.iter_mut() {
            pool.day_update(&mut self.rng);
        }
    }
}

impl Marketable for Market {
    /// One tick: every pool decides and clears against the same snapshot, the
    /// aggregate flow moves the price, and the last tick of a day closes it.
    fn step(&mut self) -> f64 {
        let ctx = MarketContext::from_node(&self.node);

        for pool in self.pools.iter_mut() {
            let (buy, sell) = pool.tick_decision(&ctx, &mut self.rng);
            self.node.clinch(i64::try_from(buy).unwrap_or(i64::MAX));
            self.node.clinch(-i64::try_from(sell).unwrap_or(i64::MAX));
        }

        let (buy, sell) = self.node.pending_volume();
        debug!("tick {}: buy {} sell {} at {:.4}", self.tick, buy, sell, ctx.current_price);
        self.node.tick_update(self.tick, &mut self.rng);
        self.tick += 1;

        if self.tick % self.config.day_ticks == 0 {
            self.close_day();
        }
        self.node.current_price()
    }

    fn current_price(&self) -> f64 {
        self.node.current_price()
    }

    fn reset(&mut self) {
        match Market::new(self.config.clone(), self.seed) {
            Ok(fresh) => *self = fresh,
            Err(e) => warn!("reset skipped, configuration no longer valid: {}", e),
        }
    }
}
