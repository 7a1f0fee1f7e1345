//! Scalar danger and safety metrics for the current body layout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cycle::CycleIndex;
use crate::grid::Cell;

/// Cycle-derived auxiliary features handed to a policy provider.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateFeatures {
    /// 1.0 if the head resolves to a traversal position, else 0.0.
    pub on_cycle: f64,
    /// Forward traversal distance head→target over the traversal length;
    /// 1.0 when unresolvable.
    pub normalized_distance: f64,
    /// [`SafetyScorer::safety_score`] of the head.
    pub safety: f64,
}

impl StateFeatures {
    /// Number of features.
    pub const DIM: usize = 3;

    /// Features as `[on_cycle, normalized_distance, safety]`.
    pub fn as_array(&self) -> [f64; Self::DIM] {
        [self.on_cycle, self.normalized_distance, self.safety]
    }
}

/// Scores the head position against the body and the traversal.
///
/// Borrowing the shared [`CycleIndex`] makes a scorer free to construct per
/// decision.
#[derive(Debug, Clone, Copy)]
pub struct SafetyScorer<'a> {
    index: &'a CycleIndex,
    tail_penalty: f64,
    guarded_segments: usize,
}

impl<'a> SafetyScorer<'a> {
    /// Penalty added when the head sits next to the body beyond the neck.
    pub const DEFAULT_TAIL_PENALTY: f64 = 0.3;
    /// Leading body segments that cannot trap the head and are skipped.
    pub const DEFAULT_GUARDED_SEGMENTS: usize = 3;

    /// Creates a scorer with default parameters.
    pub fn new(index: &'a CycleIndex) -> Self {
        Self {
            index,
            tail_penalty: Self::DEFAULT_TAIL_PENALTY,
            guarded_segments: Self::DEFAULT_GUARDED_SEGMENTS,
        }
    }

    /// Overrides the tail proximity penalty and the number of skipped leading
    /// segments.
    pub fn with_params(mut self, tail_penalty: f64, guarded_segments: usize) -> Self {
        self.tail_penalty = tail_penalty;
        self.guarded_segments = guarded_segments;
        self
    }

    /// Returns `true` if `cell` is off the grid or covered by the body
    /// (excluding the head at `occupants[0]`).
    pub fn is_blocked(&self, cell: &Cell, occupants: &[Cell]) -> bool {
        !self.index.geometry().contains(cell) || occupants.iter().skip(1).any(|c| c == cell)
    }

    /// Immediate danger around `head` in `[0, 1]`.
    ///
    /// The blocked fraction of the four orthogonal neighbours, forced to 1.0
    /// when three or four are blocked. Otherwise a fixed penalty is added when
    /// the body beyond the guarded segments is within one cell, then clamped.
    pub fn danger_level(&self, head: &Cell, occupants: &[Cell]) -> f64 {
        let geometry = self.index.geometry();
        let blocked = geometry
            .neighbours(head)
            .iter()
            .filter(|n| self.is_blocked(n, occupants))
            .count();
        if blocked >= 3 {
            return 1.0;
        }

        let mut danger = blocked as f64 / 4.0;
        let nearest_tail = occupants
            .iter()
            .skip(self.guarded_segments)
            .map(|segment| head.manhattan(segment))
            .min();
        if let Some(d) = nearest_tail {
            if d <= geometry.cell_size() {
                danger += self.tail_penalty;
            }
        }
        danger.clamp(0.0, 1.0)
    }

    /// Traversal-relative safety of `head` in `[0, 1]`; higher is safer.
    ///
    /// 1.0 for bodies too short to self-trap, for an unresolvable head, and
    /// when no trailing segment resolves. Otherwise the smallest cyclic gap to
    /// a trailing segment over `occupants.len() + 2`, capped at 1.0.
    pub fn safety_score(&self, head: &Cell, occupants: &[Cell]) -> f64 {
        if occupants.len() <= self.guarded_segments {
            return 1.0;
        }
        let Some(head_pos) = self.index.position_of(head) else {
            return 1.0;
        };

        let len = self.index.len();
        let min_gap = occupants
            .iter()
            .skip(self.guarded_segments)
            .filter_map(|segment| self.index.position_of(segment))
            .map(|pos| {
                let d = pos.abs_diff(head_pos);
                d.min(len - d)
            })
            .min();

        match min_gap {
            Some(gap) => (gap as f64 / (occupants.len() + 2) as f64).min(1.0),
            None => 1.0,
        }
    }

    /// Auxiliary policy features for the current head and target.
    pub fn state_features(&self, head: &Cell, target: &Cell, occupants: &[Cell]) -> StateFeatures {
        let on_cycle = if self.index.position_of(head).is_some() {
            1.0
        } else {
            0.0
        };
        let normalized_distance = self
            .index
            .distance(head, target)
            .map(|d| (d as f64 / self.index.len() as f64).min(1.0))
            .unwrap_or(1.0);
        StateFeatures {
            on_cycle,
            normalized_distance,
            safety: self.safety_score(head, occupants),
        }
    }
}
