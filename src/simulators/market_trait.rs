// src/simulators/market_trait.rs

/// Anything that advances a simulated price one tick at a time.
pub trait Marketable {
    /// Runs one tick and returns the price it closed at.
    fn step(&mut self) -> f64;

    /// Returns the current price without advancing the simulation.
    fn current_price(&self) -> f64;

    /// Rebuilds the simulation from its starting configuration and seed.
    fn reset(&mut self);
}
