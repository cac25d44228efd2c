// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod agents;
pub mod config;
pub mod error;
pub mod market;
pub mod sentiment;
pub mod simulators;
pub mod stats;
pub mod types;

// === 2. Re-export the public-facing components to create a clean API ===

// --- From `agents` ---
pub use agents::momentum_pool::{MomentumCoefs, MomentumPool};
pub use agents::noise_pool::NoisePool;
pub use agents::pool::PoolCore;
pub use agents::pool_trait::{MarketContext, TraderPool};
pub use agents::pool_type::PoolKind;
pub use agents::value_pool::ValuePool;

// --- From our `market` engine ---
pub use config::SimulationConfig;
pub use error::{ConfigError, ConfigResult};
pub use market::Market;

// --- From `simulators` ---
pub use simulators::clearing::{ClearingPolicy, OrderClearingEngine, ShortSelling, VolumeReporting};
pub use simulators::config::MarketConfig;
pub use simulators::impact::ImpactLaw;
pub use simulators::market_node::MarketNode;
pub use simulators::market_trait::Marketable;

// --- From `stats` and `types` ---
pub use stats::RollingWindowStats;
pub use types::{Candle, DayBars, Settlement, Side, TraderRecord};
