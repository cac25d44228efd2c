// src/agents/pool.rs

//! The skeleton every trader pool shares: the population table, the bankruptcy
//! floor, the clearing engine and the cooldown sweep.

use super::config::{BANKRUPTCY_RECOVERY_FACTOR, PoolSetup, Span};
use crate::simulators::clearing::{OrderClearingEngine, ShortSelling};
use crate::types::{Settlement, TraderRecord};
use rand::Rng;

/// True when the trader may take a discretionary decision this tick: active,
/// above the bankruptcy floor, and with no order already queued.
#[inline]
pub(crate) fn may_decide(trader: &TraderRecord, bankruptcy_cash: f64) -> bool {
    trader.is_active() && trader.cash > bankruptcy_cash && trader.order_positions == 0
}

/// Floors a non-negative real quantity to whole units.
pub(crate) fn units(x: f64) -> i32 {
    if x.is_nan() {
        return 0;
    }
    x.floor().clamp(0.0, i32::MAX as f64) as i32
}

#[derive(Debug, Clone)]
pub struct PoolCore {
    traders: Vec<TraderRecord>,
    bankruptcy_cash: f64,
    clearing: OrderClearingEngine,
    daily_income: Option<Span>,
}

impl PoolCore {
    /// Draws cash, holdings and the first cooldown for each of `setup.population` traders.
    pub fn new<R: Rng + ?Sized>(
        setup: &PoolSetup,
        rng: &mut R,
        mut initial_cooldown: impl FnMut(usize, &mut R) -> i32,
    ) -> Self {
        let traders = (0..setup.population)
            .map(|i| {
                let cash = setup.start_cash.sample(rng);
                let positions = setup.start_positions.sample(rng);
                let cooldown = initial_cooldown(i, rng).max(0);
                TraderRecord::new(cash, positions, cooldown)
            })
            .collect();

        Self {
            traders,
            bankruptcy_cash: setup.bankruptcy_cash,
            clearing: OrderClearingEngine::new(setup.clearing),
            daily_income: setup.daily_income,
        }
    }

    pub fn traders(&self) -> &[TraderRecord] {
        &self.traders
    }

    pub fn traders_mut(&mut self) -> &mut [TraderRecord] {
        &mut self.traders
    }

    pub fn bankruptcy_cash(&self) -> f64 {
        self.bankruptcy_cash
    }

    pub fn clearing(&self) -> &OrderClearingEngine {
        &self.clearing
    }

    pub fn margin_calls(&mut self, price: f64) -> usize {
        self.clearing.margin_calls(&mut self.traders, price)
    }

    /// Queues a forced sale for every active trader at or under the bankruptcy floor.
    ///
    /// The sale is `max(1, floor(shortfall / price · 2), extra(rng))` units. Traders
    /// already holding a queued order (a margin call) are left alone. Under short
    /// selling the sale is capped at current holdings so a broke trader never opens
    /// a short.
    pub fn queue_bankruptcies<R: Rng + ?Sized>(
        &mut self,
        price: f64,
        rng: &mut R,
        mut extra: impl FnMut(&mut R) -> i32,
    ) -> usize {
        let floor = self.bankruptcy_cash;
        let may_short = matches!(
            self.clearing.policy().short_selling,
            ShortSelling::Enabled { .. }
        );
        let mut queued = 0;

        for trader in self.traders.iter_mut() {
            if !trader.is_active() || trader.cash > floor || trader.order_positions != 0 {
                continue;
            }
            let holdings = trader.positions.max(0);
            if may_short && holdings == 0 {
                continue;
            }
            let recovery = units((floor - trader.cash) / price * BANKRUPTCY_RECOVERY_FACTOR);
            let mut size = recovery.max(1).max(extra(rng));
            if may_short {
                size = size.min(holdings);
            }
            trader.order_positions = -size;
            queued += 1;
        }
        queued
    }

    /// Resamples every trader whose cooldown hit zero and decrements the rest.
    pub fn tick_cooldowns<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        mut resample: impl FnMut(usize, &mut R) -> i32,
    ) {
        for (i, trader) in self.traders.iter_mut().enumerate() {
            if trader.cooldown == 0 {
                trader.cooldown = resample(i, rng).max(0);
            } else {
                trader.cooldown -= 1;
            }
        }
    }

    pub fn settle(&mut self, price: f64) -> Settlement {
        self.clearing.settle(&mut self.traders, price)
    }

    pub fn reported(&self, settlement: &Settlement) -> (u64, u64) {
        self.clearing.reported(settlement)
    }

    /// Credits a fresh income draw to each trader, when income is configured.
    pub fn pay_daily_income<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(income) = self.daily_income else {
            return;
        };
        for trader in self.traders.iter_mut() {
            trader.cash += income.sample(rng);
        }
    }
}
