// analysis/ber.rs

use serde::Serialize;
use std::ops::AddAssign;

/// Erroneous and received bit counters of one or more runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BitCounts {
    pub erroneous: u64,
    pub received: u64,
}

impl BitCounts {
    pub fn new(erroneous: u64, received: u64) -> Self {
        Self {
            erroneous,
            received,
        }
    }

    /// Bit error rate, or `None` when nothing was received.
    pub fn ber(&self) -> Option<f64> {
        if self.received == 0 {
            None
        } else {
            Some(self.erroneous as f64 / self.received as f64)
        }
    }
}

impl AddAssign for BitCounts {
    fn add_assign(&mut self, other: Self) {
        self.erroneous += other.erroneous;
        self.received += other.received;
    }
}
