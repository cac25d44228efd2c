// src/agents/pool_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of trading strategies a market can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Noise,
    Momentum,
    ValueInvestor,
}

impl PoolKind {
    /// Polling order within a tick.
    pub const ALL: [PoolKind; 3] = [PoolKind::Noise, PoolKind::Momentum, PoolKind::ValueInvestor];

    pub fn name(&self) -> &'static str {
        match self {
            PoolKind::Noise => "noise",
            PoolKind::Momentum => "momentum",
            PoolKind::ValueInvestor => "value",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
