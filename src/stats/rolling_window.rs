// src/stats/rolling_window.rs

//! Sliding-horizon price statistics for the momentum pool.
//!
//! Prices live in a ring buffer and two cumulative sums (price, price²) live in a
//! second ring one slot larger, so any lookback `t <= len` is answered from two
//! reads: `(cum[n] - cum[n - t]) / t`. The cumulative sums are rebased once every
//! `capacity` appends to keep their magnitude bounded, which makes `append`
//! O(1) amortized.

/// Longest lookback any momentum trader may query, in ticks.
pub const WINDOW_CAPACITY: usize = 1080;

#[derive(Debug, Clone)]
pub struct RollingWindowStats {
    prices: Vec<f64>,
    /// `prefix_sum[k % (capacity + 1)]` holds the sum of the first `k` samples (since the last rebase).
    prefix_sum: Vec<f64>,
    prefix_sq_sum: Vec<f64>,
    capacity: usize,
    len: usize,
    /// Total samples ever appended. Drives the modular indexing of both rings.
    appended: usize,
}

impl Default for RollingWindowStats {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}

impl RollingWindowStats {
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RollingWindowStats capacity must be > 0");
        Self {
            prices: vec![0.0; capacity],
            prefix_sum: vec![0.0; capacity + 1],
            prefix_sq_sum: vec![0.0; capacity + 1],
            capacity,
            len: 0,
            appended: 0,
        }
    }

    /// Push the newest price, evicting the oldest one once the window is full.
    pub fn append(&mut self, price: f64) {
        let slots = self.capacity + 1;
        let prev = self.appended % slots;
        let next = (self.appended + 1) % slots;
        self.prefix_sum[next] = self.prefix_sum[prev] + price;
        self.prefix_sq_sum[next] = self.prefix_sq_sum[prev] + price * price;

        self.prices[self.appended % self.capacity] = price;
        self.appended += 1;
        if self.len < self.capacity {
            self.len += 1;
        }

        if self.appended % self.capacity == 0 {
            self.rebase();
        }
    }

    /// Re-anchor both cumulative rings at the start of the live window.
    fn rebase(&mut self) {
        let base_slot = (self.appended - self.len) % (self.capacity + 1);
        let base = self.prefix_sum[base_slot];
        let sq_base = self.prefix_sq_sum[base_slot];
        for (sum, sq) in self.prefix_sum.iter_mut().zip(self.prefix_sq_sum.iter_mut()) {
            *sum -= base;
            *sq -= sq_base;
        }
    }

    /// Cumulative (sum, sum of squares) over the `t` most recent samples.
    fn window_sums(&self, t: usize) -> Option<(f64, f64)> {
        if t == 0 || t > self.len {
            return None;
        }
        let slots = self.capacity + 1;
        let end = self.appended % slots;
        let start = (self.appended - t) % slots;
        Some((
            self.prefix_sum[end] - self.prefix_sum[start],
            self.prefix_sq_sum[end] - self.prefix_sq_sum[start],
        ))
    }

    /// Mean of the last `t` prices, or `None` when fewer than `t` are available.
    pub fn moving_average(&self, t: usize) -> Option<f64> {
        self.window_sums(t).map(|(sum, _)| sum / t as f64)
    }

    /// Population variance of the last `t` prices, or `None` when fewer than `t` are available.
    pub fn moving_variance(&self, t: usize) -> Option<f64> {
        self.window_sums(t).map(|(sum, sq_sum)| {
            let avg = sum / t as f64;
            // cancellation can leave a tiny negative residue on flat series
            (sq_sum / t as f64 - avg * avg).max(0.0)
        })
    }

    pub fn moving_std(&self, t: usize) -> Option<f64> {
        self.moving_variance(t).map(f64::sqrt)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently appended price.
    pub fn last(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            Some(self.prices[(self.appended - 1) % self.capacity])
        }
    }

    /// Live window contents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (self.appended - self.len..self.appended).map(move |i| self.prices[i % self.capacity])
    }
}
