//! Construction of the full-coverage traversal over a grid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, GridGeometry, InvalidGridError};

/// Visiting order used to cover the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraversalPattern {
    /// Plain boustrophedon scan: row 0 left→right, row 1 right→left, and so
    /// on. Covers every cell, but the last→first edge is only adjacent on
    /// degenerate grids, so the traversal is an open path with a reset step.
    Serpentine,
    /// Row 0 left→right, a serpentine over columns `1..W` for the remaining
    /// rows, then back up column 0. Closes into a true cycle whenever both
    /// sides are at least 2. An odd `W × H` has no cycle through every cell,
    /// so the bottom-left corner is left out as a spare cell.
    #[default]
    ReturnLane,
}

/// An ordered traversal visiting every grid cell exactly once.
///
/// Consecutive cells are always 4-adjacent. The closing edge from the last
/// cell back to the first is adjacent only when [`Cycle::is_closed`] holds.
/// Every grid cell is visited once, except the [`Cycle::spare`] cell if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    cells: Vec<Cell>,
    pattern: TraversalPattern,
    closed: bool,
    spare: Option<Cell>,
}

impl Cycle {
    /// Number of cells in the traversal (W × H, one less with a spare cell).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a valid grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in visiting order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// First cell of the traversal, the target of the closing edge.
    pub fn first(&self) -> Cell {
        self.cells[0]
    }

    /// Pattern actually used, which may differ from the one requested.
    pub fn pattern(&self) -> TraversalPattern {
        self.pattern
    }

    /// Returns `true` if the last→first edge is 4-adjacent.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Grid cell the traversal leaves out, if any.
    pub fn spare(&self) -> Option<Cell> {
        self.spare
    }

    /// Iterates cells in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

/// Builds the single traversal shared by every decision of an episode.
///
/// # Examples
///
/// ```
/// use snakeguard::cycle::GridCycleBuilder;
/// use snakeguard::grid::{Cell, GridGeometry};
///
/// let geometry = GridGeometry::from_pixels(640, 480, 20).unwrap();
/// let cycle = GridCycleBuilder::new(geometry).build();
/// assert_eq!(cycle.len(), 768);
/// assert_eq!(cycle.get(1), Some(Cell::new(20, 0)));
/// assert!(cycle.is_closed());
/// ```
#[derive(Debug, Clone)]
pub struct GridCycleBuilder {
    geometry: GridGeometry,
    pattern: TraversalPattern,
}

impl GridCycleBuilder {
    /// Creates a builder using the default [`TraversalPattern::ReturnLane`].
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            pattern: TraversalPattern::default(),
        }
    }

    /// Creates a builder straight from cell counts.
    pub fn from_dimensions(cols: u32, rows: u32, cell_size: u32) -> Result<Self, InvalidGridError> {
        Ok(Self::new(GridGeometry::new(cols, rows, cell_size)?))
    }

    /// Selects the visiting pattern.
    pub fn with_pattern(mut self, pattern: TraversalPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Grid this builder covers.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Builds the traversal.
    ///
    /// A requested [`TraversalPattern::ReturnLane`] falls back to
    /// [`TraversalPattern::Serpentine`] on a single row or column, where no
    /// closed cycle exists.
    pub fn build(&self) -> Cycle {
        let g = &self.geometry;
        let wide = g.cols() >= 2 && g.rows() >= 2;
        let (cells, spare, pattern) = match self.pattern {
            TraversalPattern::ReturnLane if wide && g.rows() % 2 == 0 => {
                (return_lane_by_rows(g), None, TraversalPattern::ReturnLane)
            }
            TraversalPattern::ReturnLane if wide && g.cols() % 2 == 0 => {
                (return_lane_by_columns(g), None, TraversalPattern::ReturnLane)
            }
            TraversalPattern::ReturnLane if wide => {
                let (cells, spare) = return_lane_with_spare(g);
                tracing::info!(spare = %spare, "Odd cell count; leaving one corner out of the cycle");
                (cells, Some(spare), TraversalPattern::ReturnLane)
            }
            TraversalPattern::ReturnLane => {
                tracing::warn!(
                    cols = g.cols(),
                    rows = g.rows(),
                    "No closed cycle exists for this grid; using an open serpentine path"
                );
                (serpentine(g), None, TraversalPattern::Serpentine)
            }
            TraversalPattern::Serpentine => (serpentine(g), None, TraversalPattern::Serpentine),
        };

        let closed = match (cells.first(), cells.last()) {
            (Some(first), Some(last)) => cells.len() == 1 || g.is_adjacent(last, first),
            _ => false,
        };

        tracing::info!(
            cols = g.cols(),
            rows = g.rows(),
            length = cells.len(),
            ?pattern,
            closed,
            "Built grid traversal"
        );

        Cycle {
            cells,
            pattern,
            closed,
            spare,
        }
    }
}

fn serpentine(g: &GridGeometry) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(g.cell_count());
    for row in 0..g.rows() {
        if row % 2 == 0 {
            cells.extend((0..g.cols()).map(|col| g.cell(col, row)));
        } else {
            cells.extend((0..g.cols()).rev().map(|col| g.cell(col, row)));
        }
    }
    cells
}

/// Even row count: rows `1..H` zig-zag over columns `1..W`, ending next to
/// column 0 on the last row.
fn return_lane_by_rows(g: &GridGeometry) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(g.cell_count());
    cells.extend((0..g.cols()).map(|col| g.cell(col, 0)));
    for row in 1..g.rows() {
        if row % 2 == 1 {
            cells.extend((1..g.cols()).rev().map(|col| g.cell(col, row)));
        } else {
            cells.extend((1..g.cols()).map(|col| g.cell(col, row)));
        }
    }
    cells.extend((1..g.rows()).rev().map(|row| g.cell(0, row)));
    cells
}

/// Odd row count, even column count: columns `W-1..1` zig-zag over rows
/// `1..H`, ending at the bottom of column 1.
fn return_lane_by_columns(g: &GridGeometry) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(g.cell_count());
    cells.extend((0..g.cols()).map(|col| g.cell(col, 0)));
    for (k, col) in (1..g.cols()).rev().enumerate() {
        if k % 2 == 0 {
            cells.extend((1..g.rows()).map(|row| g.cell(col, row)));
        } else {
            cells.extend((1..g.rows()).rev().map(|row| g.cell(col, row)));
        }
    }
    cells.extend((1..g.rows()).rev().map(|row| g.cell(0, row)));
    cells
}

/// Odd rows and columns: rows `1..H-2` zig-zag over columns `1..W`, the
/// last two rows are swept by column pairs from right to left, and column 0
/// returns to the top. The bottom-left corner is the spare cell; it sits
/// next to the two ends of the column-1 pair, so a walker can swap it in.
fn return_lane_with_spare(g: &GridGeometry) -> (Vec<Cell>, Cell) {
    let (w, h) = (g.cols(), g.rows());
    let mut cells = Vec::with_capacity(g.cell_count() - 1);
    cells.extend((0..w).map(|col| g.cell(col, 0)));
    for row in 1..h - 2 {
        if row % 2 == 1 {
            cells.extend((1..w).rev().map(|col| g.cell(col, row)));
        } else {
            cells.extend((1..w).map(|col| g.cell(col, row)));
        }
    }
    for (k, col) in (1..w).rev().enumerate() {
        if k % 2 == 0 {
            cells.extend([g.cell(col, h - 2), g.cell(col, h - 1)]);
        } else {
            cells.extend([g.cell(col, h - 1), g.cell(col, h - 2)]);
        }
    }
    cells.extend((1..h - 1).rev().map(|row| g.cell(0, row)));
    (cells, g.cell(0, h - 1))
}
