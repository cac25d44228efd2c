// src/stats/mod.rs

pub mod rolling_window;

pub use rolling_window::{RollingWindowStats, WINDOW_CAPACITY};
