//! Local, collision-checked moves straight toward the target.

use crate::grid::{Action, Cell, Direction, GridGeometry};

/// Proposes a direct move toward the target instead of following the cycle.
///
/// The shortcut is only attempted within a small Manhattan radius of the
/// target, where a one-step collision check is a meaningful guarantee. The
/// move axis is the one with the larger coordinate delta; ties prefer the
/// horizontal axis.
#[derive(Debug, Clone, Copy)]
pub struct ShortcutPlanner {
    geometry: GridGeometry,
    radius_cells: u32,
}

impl ShortcutPlanner {
    /// Default locality bound, in cells.
    pub const DEFAULT_RADIUS: u32 = 5;

    /// Creates a planner with the default radius.
    pub fn new(geometry: GridGeometry) -> Self {
        Self::with_radius(geometry, Self::DEFAULT_RADIUS)
    }

    /// Creates a planner that only fires within `radius_cells` of the target.
    pub fn with_radius(geometry: GridGeometry, radius_cells: u32) -> Self {
        Self {
            geometry,
            radius_cells,
        }
    }

    /// Locality bound in cells.
    pub fn radius(&self) -> u32 {
        self.radius_cells
    }

    /// Returns a relative action stepping toward `target`, or `None` when the
    /// target is too far, already reached, directly behind the heading, or
    /// the step would leave the grid or hit a body segment.
    ///
    /// `occupants[0]` is the head and is never treated as an obstacle.
    pub fn propose(
        &self,
        current: &Cell,
        heading: Direction,
        target: &Cell,
        occupants: &[Cell],
    ) -> Option<Action> {
        let reach = self.radius_cells as u64 * self.geometry.cell_size() as u64;
        if current.manhattan(target) as u64 > reach {
            return None;
        }

        let direction = current.heading_to(target)?;
        // A reversal has no single-step relative action.
        if direction == heading.reversed() {
            return None;
        }

        let next = self.geometry.neighbour(current, direction);
        if !self.geometry.contains(&next) || occupants.iter().skip(1).any(|c| *c == next) {
            return None;
        }

        Some(heading.action_towards(direction))
    }
}
