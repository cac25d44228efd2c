// src/types/mod.rs

pub mod bars;
pub mod order;
pub mod trader;

pub use bars::{Candle, DayBars, resample};
pub use order::{Settlement, Side};
pub use trader::TraderRecord;
