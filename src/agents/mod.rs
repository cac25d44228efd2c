// src/agents/mod.rs

pub mod config;
pub mod cooldown;
pub mod momentum_pool;
pub mod noise_pool;
pub mod pool;
pub mod pool_trait;
pub mod pool_type;
pub mod value_pool;
