// src/simulators/clearing.rs

//! Population-wide order settlement.
//!
//! Every trader's pending `order_positions` is classified from that trader's own
//! pre-clearing row, clamped against its cash and holdings, applied at one quoted
//! price, and zeroed. Because no row reads another row, the outcome does not
//! depend on population order; the volume reduction runs left to right so totals
//! are reproducible bit for bit.

use crate::types::{Settlement, TraderRecord};
use serde::{Deserialize, Serialize};

/// Whether traders may sell more than they hold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShortSelling {
    /// Oversized sells are clamped to full liquidation; positions never go negative.
    #[default]
    Disabled,
    /// Positions may go negative. A short is force-covered once price has risen
    /// `cover_trigger` (fractional) above its average entry price.
    Enabled { cover_trigger: f64 },
}

/// Which volumes a pool forwards to the market's price-impact step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeReporting {
    /// Pre-clamp intent, so thwarted demand still moves the price.
    #[default]
    Requested,
    /// Only what actually changed hands.
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearingPolicy {
    pub short_selling: ShortSelling,
    pub reporting: VolumeReporting,
}

/// How a single row gets settled this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    CashLimited,
    PositionLimited,
    Unconstrained,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderClearingEngine {
    policy: ClearingPolicy,
}

impl OrderClearingEngine {
    pub fn new(policy: ClearingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ClearingPolicy {
        self.policy
    }

    fn classify(&self, trader: &TraderRecord, price: f64) -> Constraint {
        let order = trader.order_positions;
        if order > 0 && trader.cash < order as f64 * price {
            return Constraint::CashLimited;
        }
        let may_short = matches!(self.policy.short_selling, ShortSelling::Enabled { .. });
        if !may_short && order < 0 && (trader.positions as i64 + order as i64) < 0 {
            return Constraint::PositionLimited;
        }
        Constraint::Unconstrained
    }

    /// Settles every pending order in `traders` at `price` and returns the
    /// requested and filled volumes. All orders are zero afterwards.
    pub fn settle(&self, traders: &mut [TraderRecord], price: f64) -> Settlement {
        debug_assert!(price > 0.0, "clearing price must be positive");
        let mut report = Settlement::default();

        for trader in traders.iter_mut() {
            let order = trader.order_positions;
            if order == 0 {
                continue;
            }

            let fill = match self.classify(trader, price) {
                Constraint::CashLimited => {
                    let affordable = (trader.cash / price).floor().min(i32::MAX as f64);
                    affordable.max(0.0) as i32
                }
                Constraint::PositionLimited => -trader.positions,
                Constraint::Unconstrained => order,
            };
            apply_fill(trader, fill, price);

            if order > 0 {
                report.requested_buy += order as u64;
            } else {
                report.requested_sell += order.unsigned_abs() as u64;
            }
            if fill > 0 {
                report.filled_buy += fill as u64;
            } else {
                report.filled_sell += fill.unsigned_abs() as u64;
            }
            trader.order_positions = 0;
        }

        report
    }

    /// The (buy, sell) pair this engine's policy forwards to the market.
    pub fn reported(&self, settlement: &Settlement) -> (u64, u64) {
        match self.policy.reporting {
            VolumeReporting::Requested => settlement.requested(),
            VolumeReporting::Filled => settlement.filled(),
        }
    }

    /// Under short selling, queues a buy-to-cover for every short whose entry
    /// price has been exceeded by the cover trigger. Returns the number of
    /// traders called. No-op when short selling is disabled.
    pub fn margin_calls(&self, traders: &mut [TraderRecord], price: f64) -> usize {
        let ShortSelling::Enabled { cover_trigger } = self.policy.short_selling else {
            return 0;
        };
        let mut called = 0;
        for trader in traders.iter_mut() {
            if trader.positions < 0
                && trader.short_entry_price > 0.0
                && price >= trader.short_entry_price * (1.0 + cover_trigger)
            {
                trader.order_positions = -trader.positions;
                called += 1;
            }
        }
        called
    }
}

/// Moves `fill` units between cash and positions at `price` and keeps the
/// average short entry price current.
fn apply_fill(trader: &mut TraderRecord, fill: i32, price: f64) {
    let short_before = (-(trader.positions as i64)).max(0);
    trader.positions = trader.positions.saturating_add(fill);
    trader.cash -= fill as f64 * price;
    if trader.cash < 0.0 {
        // floor(cash / price) * price can overshoot cash by an ulp
        trader.cash = 0.0;
    }

    let short_after = (-(trader.positions as i64)).max(0);
    if short_after == 0 {
        trader.short_entry_price = 0.0;
    } else if short_after > short_before {
        let added = (short_after - short_before) as f64;
        trader.short_entry_price = (short_before as f64 * trader.short_entry_price
            + added * price)
            / short_after as f64;
    }
}

// -----------------------------------------------------------------------------
//  Unit Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn trader(cash: f64, positions: i32, order: i32) -> TraderRecord {
        TraderRecord {
            order_positions: order,
            ..TraderRecord::new(cash, positions, 0)
        }
    }

    fn short_engine() -> OrderClearingEngine {
        OrderClearingEngine::new(ClearingPolicy {
            short_selling: ShortSelling::Enabled { cover_trigger: 0.25 },
            reporting: VolumeReporting::Requested,
        })
    }

    #[test]
    fn cash_limited_buy_is_clamped_to_affordable_units() {
        // Arrange: wants 100 units at 27.0 but only has 1000 cash
        let engine = OrderClearingEngine::default();
        let mut pool = vec![trader(1000.0, 5, 100)];

        // Act
        let report = engine.settle(&mut pool, 27.0);

        // Assert
        let affordable = (1000.0_f64 / 27.0).floor() as i32;
        assert_eq!(pool[0].positions, 5 + affordable);
        assert!(pool[0].cash >= 0.0 && pool[0].cash < 27.0);
        assert_eq!(report.filled_buy, affordable as u64);
        assert_eq!(report.requested_buy, 100);
        assert_eq!(pool[0].order_positions, 0);
    }

    #[test]
    fn oversized_sell_liquidates_exactly() {
        let engine = OrderClearingEngine::default();
        let mut pool = vec![trader(500.0, 40, -90)];

        let report = engine.settle(&mut pool, 10.0);

        assert_eq!(pool[0].positions, 0);
        assert_abs_diff_eq!(pool[0].cash, 900.0);
        assert_eq!(report.filled_sell, 40);
        assert_eq!(report.requested_sell, 90);
    }

    #[test]
    fn unconstrained_fill_conserves_equity() {
        let engine = OrderClearingEngine::default();
        let price = 31.25;
        let mut pool = vec![trader(10_000.0, 100, 20), trader(10_000.0, 100, -60)];
        let before: Vec<f64> = pool.iter().map(|t| t.equity(price)).collect();

        engine.settle(&mut pool, price);

        for (t, equity) in pool.iter().zip(before) {
            assert_abs_diff_eq!(t.equity(price), equity, epsilon = 1e-9);
        }
        assert_eq!(pool[0].positions, 120);
        assert_eq!(pool[1].positions, 40);
    }

    #[test]
    fn reporting_policy_selects_intent_or_fill() {
        let mut pool = vec![trader(100.0, 0, 50), trader(0.0, 3, -10)];
        let report = OrderClearingEngine::default().settle(&mut pool, 10.0);

        let requested = OrderClearingEngine::default();
        let filled = OrderClearingEngine::new(ClearingPolicy {
            reporting: VolumeReporting::Filled,
            ..ClearingPolicy::default()
        });
        assert_eq!(requested.reported(&report), (50, 10));
        assert_eq!(filled.reported(&report), (10, 3));
    }

    #[test]
    fn solvency_holds_for_random_populations() {
        let mut rng = StdRng::seed_from_u64(99);
        let engine = OrderClearingEngine::default();
        let mut pool: Vec<TraderRecord> = (0..2_000)
            .map(|_| TraderRecord::new(rng.gen_range(0.0..5_000.0), rng.gen_range(0..200), 0))
            .collect();

        for _ in 0..50 {
            let price = rng.gen_range(5.0..60.0);
            for t in pool.iter_mut() {
                t.order_positions = rng.gen_range(-400..400);
            }
            engine.settle(&mut pool, price);
            for t in &pool {
                assert!(t.cash >= 0.0, "negative cash {}", t.cash);
                assert!(t.positions >= 0, "negative position {}", t.positions);
                assert_eq!(t.order_positions, 0);
            }
        }
    }

    #[test]
    fn result_does_not_depend_on_population_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool: Vec<TraderRecord> = (0..300)
            .map(|_| {
                trader(
                    rng.gen_range(0.0..3_000.0),
                    rng.gen_range(0..100),
                    rng.gen_range(-150..150),
                )
            })
            .collect();
        let mut forward = pool.clone();
        let mut backward: Vec<TraderRecord> = pool.into_iter().rev().collect();

        let engine = OrderClearingEngine::default();
        let a = engine.settle(&mut forward, 17.5);
        let b = engine.settle(&mut backward, 17.5);

        assert_eq!(a, b);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn short_selling_allows_negative_positions_and_tracks_entry() {
        let engine = short_engine();
        let mut pool = vec![trader(1_000.0, 10, -30)];

        engine.settle(&mut pool, 20.0);
        assert_eq!(pool[0].positions, -20);
        assert_abs_diff_eq!(pool[0].short_entry_price, 20.0);

        // adding to the short at a higher price averages the entry up
        pool[0].order_positions = -20;
        engine.settle(&mut pool, 30.0);
        assert_eq!(pool[0].positions, -40);
        assert_abs_diff_eq!(pool[0].short_entry_price, 25.0);

        // covering keeps the entry, flattening clears it
        pool[0].order_positions = 10;
        engine.settle(&mut pool, 24.0);
        assert_abs_diff_eq!(pool[0].short_entry_price, 25.0);
        pool[0].order_positions = 30;
        engine.settle(&mut pool, 24.0);
        assert_eq!(pool[0].positions, 0);
        assert_eq!(pool[0].short_entry_price, 0.0);
    }

    #[test]
    fn margin_call_fires_at_cover_trigger() {
        let engine = short_engine();
        let mut pool = vec![trader(10_000.0, 0, -50)];
        engine.settle(&mut pool, 20.0);

        assert_eq!(engine.margin_calls(&mut pool, 24.9), 0);
        assert_eq!(pool[0].order_positions, 0);

        assert_eq!(engine.margin_calls(&mut pool, 25.0), 1);
        assert_eq!(pool[0].order_positions, 50);
        engine.settle(&mut pool, 25.0);
        assert_eq!(pool[0].positions, 0);
    }

    #[test]
    fn margin_calls_are_inert_without_short_selling() {
        let engine = OrderClearingEngine::default();
        let mut pool = vec![TraderRecord {
            positions: -5,
            short_entry_price: 1.0,
            ..TraderRecord::default()
        }];
        assert_eq!(engine.margin_calls(&mut pool, 100.0), 0);
    }
}
