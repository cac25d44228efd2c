// src/types/bars.rs

//! OHLC series handed to an external charting layer. No rendering happens here.

use serde::{Deserialize, Serialize};

/// A single OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Folds a run of tick prices into one bar. `None` for an empty slice.
    pub fn from_ticks(ticks: &[f64]) -> Option<Self> {
        let (&open, rest) = ticks.split_first()?;
        let mut candle = Candle {
            open,
            high: open,
            low: open,
            close: open,
        };
        for &price in rest {
            candle.high = candle.high.max(price);
            candle.low = candle.low.min(price);
            candle.close = price;
        }
        Some(candle)
    }
}

/// Day-level history as four parallel, append-only series (one entry per day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBars {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl DayBars {
    pub fn push(&mut self, candle: Candle) {
        self.open.push(candle.open);
        self.high.push(candle.high);
        self.low.push(candle.low);
        self.close.push(candle.close);
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn get(&self, day: usize) -> Option<Candle> {
        Some(Candle {
            open: *self.open.get(day)?,
            high: *self.high.get(day)?,
            low: *self.low.get(day)?,
            close: *self.close.get(day)?,
        })
    }

    pub fn last(&self) -> Option<Candle> {
        self.len().checked_sub(1).and_then(|day| self.get(day))
    }

    pub fn candles(&self) -> impl Iterator<Item = Candle> + '_ {
        (0..self.len()).filter_map(move |day| self.get(day))
    }
}

/// Buckets a tick series into consecutive bars of `bar_len` ticks (the last one
/// may be shorter). With one tick per second, `bar_len = 120` gives 2-minute bars.
pub fn resample(ticks: &[f64], bar_len: usize) -> Vec<Candle> {
    if bar_len == 0 {
        return Vec::new();
    }
    ticks.chunks(bar_len).filter_map(Candle::from_ticks).collect()
}
