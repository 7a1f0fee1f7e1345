//! Observation encoding for policy providers.
//!
//! Combines the local collision picture around the head with the three
//! cycle-derived [`StateFeatures`].

use crate::arbiter::TickContext;
use crate::grid::{Cell, GridGeometry};
use crate::safety::StateFeatures;

/// Builds flat observation vectors.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Local features: danger (3) + heading (4) + target side (4).
    pub const LOCAL_DIM: usize = 11;

    /// Full observation length.
    pub const DIM: usize = Self::LOCAL_DIM + StateFeatures::DIM;

    /// Builds the observation for one tick.
    ///
    /// ```text
    /// [danger_straight, danger_right, danger_left,
    ///  heading_left, heading_right, heading_up, heading_down,
    ///  target_left, target_right, target_up, target_down,
    ///  on_cycle, normalized_distance, safety]
    /// ```
    pub fn build(
        geometry: &GridGeometry,
        tick: &TickContext<'_>,
        features: &StateFeatures,
    ) -> [f64; Self::DIM] {
        let head = tick.head();
        let heading = tick.heading();
        let target = tick.target();
        let occupants = tick.occupants();

        let danger = |cell: Cell| -> f64 {
            let hit = !geometry.contains(&cell) || occupants.iter().skip(1).any(|c| *c == cell);
            flag(hit)
        };

        let mut obs = [0.0; Self::DIM];
        obs[0] = danger(geometry.neighbour(&head, heading));
        obs[1] = danger(geometry.neighbour(&head, heading.turned_right()));
        obs[2] = danger(geometry.neighbour(&head, heading.turned_left()));

        let (dx, dy) = heading.delta();
        obs[3] = flag(dx < 0);
        obs[4] = flag(dx > 0);
        obs[5] = flag(dy < 0);
        obs[6] = flag(dy > 0);

        obs[7] = flag(target.x < head.x);
        obs[8] = flag(target.x > head.x);
        obs[9] = flag(target.y < head.y);
        obs[10] = flag(target.y > head.y);

        obs[Self::LOCAL_DIM..].copy_from_slice(&features.as_array());
        obs
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
