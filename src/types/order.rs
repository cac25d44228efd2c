// src/types/order.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Direction of a signed order quantity; `None` for a hold.
    pub fn of(signed_volume: i64) -> Option<Side> {
        match signed_volume {
            v if v > 0 => Some(Side::Buy),
            v if v < 0 => Some(Side::Sell),
            _ => None,
        }
    }
}

/// Outcome of one clearing pass over a pool.
///
/// `requested_*` is the intent submitted by traders before any clamping,
/// `filled_*` is what was actually exchanged against cash and positions.
/// Both sides are reported as non-negative volumes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub requested_buy: u64,
    pub requested_sell: u64,
    pub filled_buy: u64,
    pub filled_sell: u64,
}

impl Settlement {
    pub fn requested(&self) -> (u64, u64) {
        (self.requested_buy, self.requested_sell)
    }

    pub fn filled(&self) -> (u64, u64) {
        (self.filled_buy, self.filled_sell)
    }
}
