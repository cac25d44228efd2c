// src/config.rs

use crate::agents::config::{MomentumPoolConfig, NoisePoolConfig, ValuePoolConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::simulators::config::{DAY_TICKS, MarketConfig};
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`crate::Market`].
///
/// Missing fields fall back to the defaults in `simulators::config` and
/// `agents::config`. A pool set to `null` is left out of the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub day_ticks: u64,
    pub market: MarketConfig,
    pub noise: Option<NoisePoolConfig>,
    pub momentum: Option<MomentumPoolConfig>,
    pub value: Option<ValuePoolConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            day_ticks: DAY_TICKS,
            market: MarketConfig::default(),
            noise: Some(NoisePoolConfig::default()),
            momentum: Some(MomentumPoolConfig::default()),
            value: Some(ValuePoolConfig::default()),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.day_ticks == 0 {
            return Err(ConfigError::NonPositive {
                field: "day_ticks",
                value: 0.0,
            });
        }
        self.market.validate()?;
        if let Some(noise) = &self.noise {
            noise.validate()?;
        }
        if let Some(momentum) = &self.momentum {
            momentum.validate()?;
        }
        if let Some(value) = &self.value {
            value.validate()?;
        }
        Ok(())
    }
}
