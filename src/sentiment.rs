// src/sentiment.rs

//! Market sentiment index (MSI): a bounded read of the latest order imbalance.

use crate::simulators::config::DEPTH_EPSILON;

/// `tanh(gain · net_flow / depth)`, always within [-1, 1]. A degenerate depth reads as neutral.
pub fn sentiment_index(net_flow: f64, depth: f64, gain: f64) -> f64 {
    if depth <= DEPTH_EPSILON || !net_flow.is_finite() {
        return 0.0;
    }
    (gain * net_flow / depth).tanh().clamp(-1.0, 1.0)
}
