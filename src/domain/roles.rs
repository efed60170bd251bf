//! Asset Role Ranking for the Triangular Strategy
//!
//! Each bar, the three instantaneous returns are ranked into High (maximum),
//! Low (minimum) and Neutral (the remaining one). Ties resolve to the
//! earliest instrument index, so the assignment is deterministic.

use serde::{Deserialize, Serialize};

/// Role an instrument plays on a given bar of the triangular strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    High,
    Low,
    Neutral,
}

/// Per-bar role assignment over three instruments, identified by index 0..3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleAssignment {
    pub high: usize,
    pub low: usize,
    pub neutral: usize,
    pub high_value: f64,
    pub low_value: f64,
    pub neutral_value: f64,
}

impl RoleAssignment {
    /// Rank three simultaneous returns. The first index wins ties for both
    /// the maximum and the minimum.
    pub fn rank(returns: [f64; 3]) -> Self {
        let mut high = 0;
        let mut low = 0;
        for i in 1..3 {
            if returns[i] > returns[high] {
                high = i;
            }
            if returns[i] < returns[low] {
                low = i;
            }
        }
        // The neutral slot is whichever index is neither extreme. When all
        // three values are equal, high == low == 0 and neutral falls to 1.
        let neutral = (0..3).find(|&i| i != high && i != low).unwrap_or(1);

        Self {
            high,
            low,
            neutral,
            high_value: returns[high],
            low_value: returns[low],
            neutral_value: returns[neutral],
        }
    }

    pub fn role_of(&self, index: usize) -> Role {
        if index == self.high {
            Role::High
        } else if index == self.low {
            Role::Low
        } else {
            Role::Neutral
        }
    }

    pub fn range_high_low(&self) -> f64 {
        (self.high_value - self.low_value).abs()
    }

    pub fn range_high_neutral(&self) -> f64 {
        (self.high_value - self.neutral_value).abs()
    }

    pub fn range_neutral_low(&self) -> f64 {
        (self.neutral_value - self.low_value).abs()
    }
}
