//! Wall-Clock Timing
//!
//! Per-file timings are reported in whole milliseconds. The clock is
//! `std::time::Instant`, which is monotonic, so an elapsed value is never
//! negative even when the system clock is adjusted mid-run.

use std::time::Instant;

/// Timer for measuring a single parse call
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed whole milliseconds since `start` (truncated)
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        let millis = self.start.elapsed().as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}
