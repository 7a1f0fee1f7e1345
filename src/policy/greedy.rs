//! Greedy target-seeking heuristic.

use super::trait_::PolicyProvider;
use crate::arbiter::TickContext;
use crate::grid::{Action, GridGeometry};
use crate::safety::StateFeatures;

/// Steps toward the target, avoiding immediate collisions.
///
/// Among the three relative moves whose destination is inside the grid and
/// off the body, picks the one closest (Manhattan) to the target; ties keep
/// the `[straight, right, left]` order. With no safe move it goes straight.
/// Serves as a competitive baseline that is unaware of self-trapping.
pub struct GreedyHeuristicPolicy {
    geometry: GridGeometry,
}

impl GreedyHeuristicPolicy {
    /// Creates a greedy policy for `geometry`.
    pub fn new(geometry: GridGeometry) -> Self {
        Self { geometry }
    }
}

impl PolicyProvider for GreedyHeuristicPolicy {
    fn select_action(&mut self, _features: &StateFeatures, tick: &TickContext<'_>) -> Action {
        let head = tick.head();
        let target = tick.target();
        let body = &tick.occupants()[1..];

        Action::ALL
            .iter()
            .map(|&action| {
                let cell = self.geometry.neighbour(&head, tick.heading().apply(action));
                (action, cell)
            })
            .filter(|(_, cell)| self.geometry.contains(cell) && !body.contains(cell))
            .min_by_key(|(_, cell)| cell.manhattan(&target))
            .map(|(action, _)| action)
            .unwrap_or(Action::Straight)
    }

    fn name(&self) -> &str {
        "greedy_heuristic"
    }
}
