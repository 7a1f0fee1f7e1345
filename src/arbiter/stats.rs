//! Usage tallies for observability.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cumulative counts of which mechanism produced each decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionStats {
    /// Decisions taken from the policy provider (warm-up included).
    pub policy_used: u64,
    /// Decisions taken by the safety net.
    pub safety_net_used: u64,
    /// Safety-net decisions that used a shortcut.
    pub shortcuts_taken: u64,
}

impl DecisionStats {
    /// Total decisions recorded.
    pub fn total(&self) -> u64 {
        self.policy_used + self.safety_net_used
    }

    /// Fraction of decisions from the policy, `0.0` when empty.
    pub fn policy_share(&self) -> f64 {
        share(self.policy_used, self.total())
    }

    /// Fraction of decisions from the safety net, `0.0` when empty.
    pub fn safety_net_share(&self) -> f64 {
        share(self.safety_net_used, self.total())
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: &DecisionStats) {
        self.policy_used += other.policy_used;
        self.safety_net_used += other.safety_net_used;
        self.shortcuts_taken += other.shortcuts_taken;
    }

    /// Clears the tally, returning the previous values.
    pub fn reset(&mut self) -> DecisionStats {
        std::mem::take(self)
    }
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

impl fmt::Display for DecisionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "No decisions made yet");
        }
        write!(
            f,
            "AI: {:.1}% | Safety: {:.1}%",
            self.policy_share() * 100.0,
            self.safety_net_share() * 100.0
        )
    }
}
