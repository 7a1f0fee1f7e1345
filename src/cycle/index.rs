//! Constant-time lookups over a built [`Cycle`].

use std::collections::HashMap;

use super::builder::Cycle;
use crate::grid::{Cell, GridGeometry};

/// Position lookups and cyclic distances over an immutable traversal.
///
/// Built once per grid and shared by reference (or `Arc`) between every
/// component that needs it. Unresolvable cells never raise an error: they
/// yield `None`, which callers treat as "maximally uncertain".
#[derive(Debug, Clone)]
pub struct CycleIndex {
    geometry: GridGeometry,
    cycle: Cycle,
    positions: HashMap<Cell, usize>,
    detour: Option<Detour>,
}

/// Swap of the spare cell for the cycle cell between `entry` and `exit`.
#[derive(Debug, Clone, Copy)]
struct Detour {
    spare: Cell,
    entry: Cell,
    exit: Cell,
}

impl CycleIndex {
    /// Indexes `cycle`, which must have been built for `geometry`.
    pub fn new(geometry: GridGeometry, cycle: Cycle) -> Self {
        let positions: HashMap<Cell, usize> = cycle
            .iter()
            .enumerate()
            .map(|(i, cell)| (*cell, i))
            .collect();
        let detour = find_detour(&geometry, &cycle, &positions);
        Self {
            geometry,
            cycle,
            positions,
            detour,
        }
    }

    /// Grid covered by the traversal.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// The underlying traversal.
    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// Traversal length (W × H).
    pub fn len(&self) -> usize {
        self.cycle.len()
    }

    /// Always `false` for an index built from a valid grid.
    pub fn is_empty(&self) -> bool {
        self.cycle.is_empty()
    }

    /// Cell at traversal position `index`.
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        self.cycle.get(index)
    }

    /// Position of `cell` in the traversal.
    ///
    /// Off-lattice points are snapped to their containing cell and looked up
    /// once more. Returns `None` (NOT_FOUND) for points outside the grid.
    pub fn position_of(&self, cell: &Cell) -> Option<usize> {
        self.positions
            .get(cell)
            .or_else(|| {
                self.geometry
                    .snap(cell)
                    .and_then(|snapped| self.positions.get(&snapped))
            })
            .copied()
    }

    /// Cyclic successor of `cell`.
    ///
    /// The spare cell continues at the cycle cell it rejoins. Any other
    /// unresolvable `cell` recovers to the first cell of the traversal.
    pub fn next(&self, cell: &Cell) -> Cell {
        match self.position_of(cell) {
            Some(i) => self.cycle.cells()[(i + 1) % self.len()],
            None => match self.detour {
                Some(d) if d.spare == *cell => d.exit,
                _ => self.cycle.first(),
            },
        }
    }

    /// Successor of `cell` on the way to `target`.
    ///
    /// Same as [`CycleIndex::next`], except that a target on the spare cell
    /// is entered from the cycle cell next to it when the spare is free. The
    /// swapped walk has the same length as the cycle, so a body that trails
    /// the head in traversal order stays clear of it.
    pub fn next_toward(&self, cell: &Cell, target: &Cell, occupants: &[Cell]) -> Cell {
        match self.detour {
            Some(d)
                if d.entry == *cell
                    && d.spare == *target
                    && !occupants.iter().skip(1).any(|c| *c == d.spare) =>
            {
                d.spare
            }
            _ => self.next(cell),
        }
    }

    /// Grid cell left out of the traversal, if any.
    pub fn spare(&self) -> Option<Cell> {
        self.detour.map(|d| d.spare)
    }

    /// Forward distance from `from` to `to`, walking in traversal order and
    /// wrapping past the end. `None` stands for ∞ (either end unresolvable).
    pub fn distance(&self, from: &Cell, to: &Cell) -> Option<usize> {
        let a = self.position_of(from)?;
        let b = self.position_of(to)?;
        Some(self.forward(a, b))
    }

    /// Shorter of the two wrap directions between `a` and `b`.
    pub fn cyclic_gap(&self, a: &Cell, b: &Cell) -> Option<usize> {
        let ia = self.position_of(a)?;
        let ib = self.position_of(b)?;
        let d = ia.abs_diff(ib);
        Some(d.min(self.len() - d))
    }

    /// Returns `true` if following the traversal from `head` reaches
    /// `target` without passing over a body segment.
    ///
    /// Auxiliary query for policy providers and tooling; the arbiter itself
    /// relies on the one-step check of the shortcut planner. Targets at most
    /// three steps ahead are always considered clear. The
    /// head itself (`occupants[0]`) is ignored; unresolvable ends are never
    /// clear.
    pub fn is_clear_ahead(&self, head: &Cell, target: &Cell, occupants: &[Cell]) -> bool {
        let (Some(from), Some(to)) = (self.position_of(head), self.position_of(target)) else {
            return false;
        };
        let span = self.forward(from, to);
        if span <= 3 {
            return true;
        }
        occupants
            .iter()
            .skip(1)
            .filter_map(|segment| self.position_of(segment))
            .all(|pos| {
                let ahead = self.forward(from, pos);
                ahead == 0 || ahead >= span
            })
    }

    fn forward(&self, from: usize, to: usize) -> usize {
        if to >= from {
            to - from
        } else {
            self.len() - from + to
        }
    }
}

/// Finds the two cycle neighbours of the spare cell that sit two steps apart
/// in traversal order.
fn find_detour(
    geometry: &GridGeometry,
    cycle: &Cycle,
    positions: &HashMap<Cell, usize>,
) -> Option<Detour> {
    let spare = cycle.spare()?;
    let len = cycle.len();
    let around: Vec<(Cell, usize)> = geometry
        .neighbours(&spare)
        .iter()
        .filter_map(|n| positions.get(n).map(|&pos| (*n, pos)))
        .collect();
    around.iter().find_map(|&(entry, from)| {
        around
            .iter()
            .find(|&&(_, to)| (from + 2) % len == to)
            .map(|&(exit, _)| Detour { spare, entry, exit })
    })
}
