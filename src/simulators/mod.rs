// src/simulators/mod.rs

pub mod clearing;
pub mod config;
pub mod impact;
pub mod market_node;
pub mod market_trait;
