//! Grid value types: cells, absolute headings and relative actions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A grid cell addressed by its top-left corner in world units.
///
/// Cells produced by the cycle builder always lie on the lattice
/// `(k × cell_size, m × cell_size)`. Snapshots coming from an environment may
/// carry off-lattice points; [`crate::grid::GridGeometry::snap`] maps them
/// back onto the containing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance to another cell, in world units.
    ///
    /// Saturates at `u32::MAX` for points at opposite ends of the `i32` range.
    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Returns the neighbouring cell one step of `step` units in `direction`.
    ///
    /// Coordinates saturate at the `i32` bounds, so a step off the edge of the
    /// coordinate range stays put (and is never inside a grid).
    pub fn offset(&self, direction: Direction, step: i32) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(
            self.x.saturating_add(dx.saturating_mul(step)),
            self.y.saturating_add(dy.saturating_mul(step)),
        )
    }

    /// Heading along the axis with the larger delta toward `target`; ties
    /// prefer the horizontal axis. `None` when `target` is this cell.
    pub fn heading_to(&self, target: &Cell) -> Option<Direction> {
        let dx = i64::from(target.x) - i64::from(self.x);
        let dy = i64::from(target.y) - i64::from(self.y);
        if dx.abs() >= dy.abs() {
            Direction::from_step(dx.signum() as i32, 0)
        } else {
            Direction::from_step(0, dy.signum() as i32)
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute heading on the grid. `Down` increases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Headings in clockwise order starting from `Right`.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Unit step `(dx, dy)` for this heading.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// The heading after 90° clockwise rotation.
    pub fn turned_right(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// The heading after 90° counter-clockwise rotation.
    pub fn turned_left(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// The opposite heading.
    pub fn reversed(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 2) % 4]
    }

    /// The heading after applying a relative action.
    pub fn apply(&self, action: Action) -> Direction {
        match action {
            Action::Straight => *self,
            Action::TurnRight => self.turned_right(),
            Action::TurnLeft => self.turned_left(),
        }
    }

    /// Converts an absolute `target` heading into an action relative to `self`.
    ///
    /// A full reversal cannot be expressed as a single relative move; it maps
    /// to [`Action::TurnRight`], the first leg of a U-turn.
    pub fn action_towards(&self, target: Direction) -> Action {
        match (4 + target.clockwise_index() - self.clockwise_index()) % 4 {
            0 => Action::Straight,
            1 => Action::TurnRight,
            3 => Action::TurnLeft,
            _ => Action::TurnRight,
        }
    }

    /// Heading of a unit step `(dx, dy)`, if it is one.
    ///
    /// Only the sign of each component matters; diagonal or zero steps yield
    /// `None`.
    pub fn from_step(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A move relative to the current heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    /// All actions in policy output order `[straight, right, left]`.
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Index of this action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// Action at `index` in [`Action::ALL`].
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// One-hot encoding `[straight, right, left]`.
    pub fn one_hot(&self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Straight => write!(f, "straight"),
            Action::TurnRight => write!(f, "right"),
            Action::TurnLeft => write!(f, "left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Cell::new(0, 0);
        let b = Cell::new(40, -20);
        assert_eq!(a.manhattan(&b), 60);
        assert_eq!(b.manhattan(&a), 60);
    }

    #[test]
    fn offset_follows_screen_axes() {
        let c = Cell::new(20, 20);
        assert_eq!(c.offset(Direction::Up, 20), Cell::new(20, 0));
        assert_eq!(c.offset(Direction::Down, 20), Cell::new(20, 40));
        assert_eq!(c.offset(Direction::Left, 20), Cell::new(0, 20));
        assert_eq!(c.offset(Direction::Right, 20), Cell::new(40, 20));
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let low = Cell::new(i32::MIN, 0);
        let high = Cell::new(i32::MAX, i32::MAX);
        assert_eq!(low.manhattan(&high), u32::MAX);
        assert_eq!(high.offset(Direction::Right, 20), high);
        assert_eq!(low.offset(Direction::Left, 20), low);
        assert_eq!(low.heading_to(&high), Some(Direction::Right));
    }

    #[test]
    fn heading_to_prefers_horizontal_on_ties() {
        let c = Cell::new(0, 0);
        assert_eq!(c.heading_to(&Cell::new(20, 20)), Some(Direction::Right));
        assert_eq!(c.heading_to(&Cell::new(-20, 40)), Some(Direction::Down));
        assert_eq!(c.heading_to(&Cell::new(0, -20)), Some(Direction::Up));
        assert_eq!(c.heading_to(&c), None);
    }

    #[test]
    fn turns_are_inverse() {
        for d in Direction::CLOCKWISE {
            assert_eq!(d.turned_right().turned_left(), d);
            assert_eq!(d.reversed().reversed(), d);
        }
    }

    #[test]
    fn action_towards_roundtrips_through_apply() {
        for heading in Direction::CLOCKWISE {
            for target in Direction::CLOCKWISE {
                if target == heading.reversed() {
                    continue;
                }
                let action = heading.action_towards(target);
                assert_eq!(heading.apply(action), target);
            }
        }
    }

    #[test]
    fn reversal_maps_to_turn_right() {
        assert_eq!(
            Direction::Right.action_towards(Direction::Left),
            Action::TurnRight
        );
        assert_eq!(Direction::Up.action_towards(Direction::Down), Action::TurnRight);
    }

    #[test]
    fn from_step_rejects_diagonals() {
        assert_eq!(Direction::from_step(20, 0), Some(Direction::Right));
        assert_eq!(Direction::from_step(0, -20), Some(Direction::Up));
        assert_eq!(Direction::from_step(20, 20), None);
        assert_eq!(Direction::from_step(0, 0), None);
    }

    #[test]
    fn action_index_roundtrip() {
        for a in Action::ALL {
            assert_eq!(Action::from_index(a.index()), Some(a));
        }
        assert_eq!(Action::from_index(3), None);
        assert_eq!(Action::TurnLeft.one_hot(), [0.0, 0.0, 1.0]);
    }
}
