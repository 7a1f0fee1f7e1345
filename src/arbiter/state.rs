//! Per-tick inputs and outputs of the hybrid arbiter.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Action, Cell, Direction};

/// Immutable view of the environment for one decision.
///
/// The occupant snapshot is borrowed for the duration of the decision and is
/// never mutated by the core. It is non-empty; `occupants[0]` is the head.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub(crate) occupants: &'a [Cell],
    pub(crate) target: Cell,
    pub(crate) heading: Direction,
    pub(crate) games_played: u32,
}

impl<'a> TickContext<'a> {
    /// Creates a context; returns `None` for an empty snapshot.
    pub fn new(
        occupants: &'a [Cell],
        target: Cell,
        heading: Direction,
        games_played: u32,
    ) -> Option<Self> {
        if occupants.is_empty() {
            return None;
        }
        Some(Self {
            occupants,
            target,
            heading,
            games_played,
        })
    }

    /// Head cell (`occupants[0]`).
    pub fn head(&self) -> Cell {
        self.occupants[0]
    }

    /// Body cells, head first.
    pub fn occupants(&self) -> &'a [Cell] {
        self.occupants
    }

    /// Cell the agent is trying to reach.
    pub fn target(&self) -> Cell {
        self.target
    }

    /// Current absolute heading.
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Monotonic game/episode counter.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }
}

/// Decision state of the arbiter. Recomputed from scratch every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArbiterState {
    /// Warm-up: the policy always wins.
    Explore,
    /// Signals are being evaluated; no decision taken yet this episode.
    #[default]
    Evaluate,
    /// Shortcut planner, then cycle-following.
    SafetyNet,
    /// Delegate to the policy provider.
    Policy,
}

impl fmt::Display for ArbiterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbiterState::Explore => write!(f, "explore"),
            ArbiterState::Evaluate => write!(f, "evaluate"),
            ArbiterState::SafetyNet => write!(f, "safety_net"),
            ArbiterState::Policy => write!(f, "policy"),
        }
    }
}

/// Why the safety net was engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SafetyTrigger {
    /// No usable policy is loaded.
    NoPolicy,
    /// Danger level at or above `1 - danger_threshold`.
    HighDanger,
    /// Safety score below `danger_threshold`.
    LowSafety,
    /// Long body with danger above `mid_threshold`.
    LongBody,
}

/// Which mechanism produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecisionSource {
    Policy,
    Shortcut,
    /// Stepped to the adjacent cycle successor.
    CycleFollow,
    /// The successor was not reachable in one relative move (open-path
    /// wrap, off-cycle head, or a reversal); took the safest step toward it.
    CycleReset,
}

/// Full record of one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub state: ArbiterState,
    pub source: DecisionSource,
    pub trigger: Option<SafetyTrigger>,
}
