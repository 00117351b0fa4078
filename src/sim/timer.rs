//! Repeating interval timer driven by elapsed host time
//!
//! The host feeds wall-clock milliseconds; the timer reports how many times
//! it fired. Keeps the simulation free of platform timer handles.

/// Shortest accepted interval, prevents an unbounded fire loop
const MIN_INTERVAL_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    interval_ms: f64,
    elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new(interval_ms: f64) -> Self {
        let interval_ms = if interval_ms.is_finite() {
            interval_ms.max(MIN_INTERVAL_MS)
        } else {
            MIN_INTERVAL_MS
        };
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Accumulate time and return the number of completed intervals
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += elapsed_ms;
        let mut fires = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fires += 1;
        }
        fires
    }
}
