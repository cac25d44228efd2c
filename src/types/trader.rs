// src/types/trader.rs

/// One row of a trader population.
///
/// Pools keep these in a `Vec` and run every batch step (bankruptcy, decisions,
/// cooldown, clearing) over the whole vector at once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraderRecord {
    pub cash: f64,
    /// Held units. Only goes negative under a short-selling clearing policy.
    pub positions: i32,
    /// Signed desired trade for the current tick, zeroed by clearing.
    pub order_positions: i32,
    /// Ticks left before the next decision.
    pub cooldown: i32,
    /// Average entry price of the open short, 0 when flat or long.
    pub short_entry_price: f64,
}

impl TraderRecord {
    pub fn new(cash: f64, positions: i32, cooldown: i32) -> Self {
        Self {
            cash,
            positions,
            order_positions: 0,
            cooldown,
            short_entry_price: 0.0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.cooldown == 0
    }

    /// Cash plus positions marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.positions as f64 * price
    }
}
