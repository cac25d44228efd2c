// src/agents/pool_trait.rs

use super::pool::PoolCore;
use super::pool_type::PoolKind;
use crate::simulators::market_node::MarketNode;
use crate::types::TraderRecord;
use log::trace;
use rand::RngCore;

/// A read-only snapshot of the market given to a pool for decision-making.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketContext {
    pub current_price: f64,
    pub basic_value: f64,
    pub depth: f64,
    pub sentiment: f64,
}

impl MarketContext {
    pub fn from_node(node: &MarketNode) -> Self {
        Self {
            current_price: node.current_price(),
            basic_value: node.basic_value(),
            depth: node.market_depth(),
            sentiment: node.sentiment_index(),
        }
    }
}

/// The core trait every trader population implements.
///
/// A pool owns its traders as one table and answers each tick with a single
/// aggregate (buy, sell) pair for the market's impact step.
pub trait TraderPool {
    fn kind(&self) -> PoolKind;
    fn core(&self) -> &PoolCore;
    fn core_mut(&mut self) -> &mut PoolCore;

    /// Margin calls, bankruptcies, strategy decisions and the cooldown sweep.
    /// Leaves the tick's orders queued in the trader table.
    fn decide(&mut self, ctx: &MarketContext, rng: &mut dyn RngCore);

    /// Runs one full tick for the pool and returns the volumes the market should see.
    fn tick_decision(&mut self, ctx: &MarketContext, rng: &mut dyn RngCore) -> (u64, u64) {
        self.decide(ctx, rng);
        let settlement = self.core_mut().settle(ctx.current_price);
        trace!(
            "{} pool settled: requested {}/{} filled {}/{}",
            self.kind(),
            settlement.requested_buy,
            settlement.requested_sell,
            settlement.filled_buy,
            settlement.filled_sell
        );
        self.core().reported(&settlement)
    }

    /// Day-boundary bookkeeping.
    fn day_update(&mut self, rng: &mut dyn RngCore) {
        self.core_mut().pay_daily_income(rng);
    }

    fn traders(&self) -> &[TraderRecord] {
        self.core().traders()
    }

    fn population(&self) -> usize {
        self.core().traders().len()
    }
}
