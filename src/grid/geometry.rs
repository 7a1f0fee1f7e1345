//! Grid extent, bounds checks and lattice snapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cell::{Cell, Direction};
use super::error::InvalidGridError;

/// Dimensions of a `cols × rows` grid of square cells of `cell_size` units.
///
/// Cell `(col, row)` lives at world coordinate
/// `(col × cell_size, row × cell_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGeometry"))]
pub struct GridGeometry {
    cols: u32,
    rows: u32,
    cell_size: u32,
}

/// Unchecked wire form; deserialization goes through [`GridGeometry::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGeometry {
    cols: u32,
    rows: u32,
    cell_size: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeometry> for GridGeometry {
    type Error = InvalidGridError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        GridGeometry::new(raw.cols, raw.rows, raw.cell_size)
    }
}

impl GridGeometry {
    /// Largest extent along one axis, in world units.
    pub const MAX_EXTENT: i64 = i32::MAX as i64;

    /// Creates a grid of `cols × rows` cells.
    ///
    /// Fails when any argument is zero or when the world extent would not fit
    /// the `i32` coordinate range.
    pub fn new(cols: u32, rows: u32, cell_size: u32) -> Result<Self, InvalidGridError> {
        Self::checked(cols as i64, rows as i64, cell_size as i64)
    }

    /// Creates a grid from a world extent in units, e.g. `640 × 480` px with
    /// `20` px cells.
    ///
    /// Fails when the extent is not positive or not a whole number of cells.
    pub fn from_pixels(width: i64, height: i64, cell_size: i64) -> Result<Self, InvalidGridError> {
        if cell_size <= 0 {
            return Err(InvalidGridError::NonPositiveCellSize(cell_size));
        }
        for (axis, extent) in [("width", width), ("height", height)] {
            if extent <= 0 {
                return Err(InvalidGridError::NonPositive {
                    axis,
                    value: extent,
                });
            }
            if extent % cell_size != 0 {
                return Err(InvalidGridError::NonIntegral {
                    axis,
                    extent,
                    cell_size,
                });
            }
        }
        Self::checked(width / cell_size, height / cell_size, cell_size)
    }

    fn checked(cols: i64, rows: i64, cell_size: i64) -> Result<Self, InvalidGridError> {
        if cell_size <= 0 {
            return Err(InvalidGridError::NonPositiveCellSize(cell_size));
        }
        for (axis, count) in [("width", cols), ("height", rows)] {
            if count <= 0 {
                return Err(InvalidGridError::NonPositive { axis, value: count });
            }
            let extent = count * cell_size;
            if extent > Self::MAX_EXTENT {
                return Err(InvalidGridError::TooLarge {
                    axis,
                    value: extent,
                    max: Self::MAX_EXTENT,
                });
            }
        }
        Ok(Self {
            cols: cols as u32,
            rows: rows as u32,
            cell_size: cell_size as u32,
        })
    }

    /// Number of columns (W).
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows (H).
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of one cell in world units.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Cell size as a signed step.
    pub fn step(&self) -> i32 {
        self.cell_size as i32
    }

    /// Total number of cells (W × H).
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// World width in units.
    pub fn width(&self) -> i32 {
        (self.cols * self.cell_size) as i32
    }

    /// World height in units.
    pub fn height(&self) -> i32 {
        (self.rows * self.cell_size) as i32
    }

    /// Cell at column `col`, row `row`.
    pub fn cell(&self, col: u32, row: u32) -> Cell {
        Cell::new((col * self.cell_size) as i32, (row * self.cell_size) as i32)
    }

    /// Returns `true` if `cell` lies inside the world rectangle.
    pub fn contains(&self, cell: &Cell) -> bool {
        cell.x >= 0 && cell.x < self.width() && cell.y >= 0 && cell.y < self.height()
    }

    /// Maps a point inside the world rectangle onto the lattice cell
    /// containing it. Points outside the grid have no containing cell.
    pub fn snap(&self, point: &Cell) -> Option<Cell> {
        if !self.contains(point) {
            return None;
        }
        let s = self.step();
        Some(Cell::new(point.x / s * s, point.y / s * s))
    }

    /// The cell one step away from `cell` in `direction`.
    pub fn neighbour(&self, cell: &Cell, direction: Direction) -> Cell {
        cell.offset(direction, self.step())
    }

    /// The four orthogonal neighbours of `cell`, including out-of-bounds ones.
    pub fn neighbours(&self, cell: &Cell) -> [Cell; 4] {
        [
            self.neighbour(cell, Direction::Right),
            self.neighbour(cell, Direction::Left),
            self.neighbour(cell, Direction::Down),
            self.neighbour(cell, Direction::Up),
        ]
    }

    /// Returns `true` if `a` and `b` share an edge.
    pub fn is_adjacent(&self, a: &Cell, b: &Cell) -> bool {
        a.manhattan(b) == self.cell_size
    }

    /// The lattice cell nearest the centre of the world.
    pub fn centre(&self) -> Cell {
        self.cell(self.cols / 2, self.rows / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_standard_window() {
        let g = GridGeometry::from_pixels(640, 480, 20).unwrap();
        assert_eq!(g.cols(), 32);
        assert_eq!(g.rows(), 24);
        assert_eq!(g.cell_count(), 768);
        assert_eq!(g.width(), 640);
        assert_eq!(g.height(), 480);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            GridGeometry::new(0, 4, 20),
            Err(InvalidGridError::NonPositive {
                axis: "width",
                value: 0
            })
        );
        assert!(GridGeometry::new(4, 0, 20).is_err());
        assert_eq!(
            GridGeometry::new(4, 4, 0),
            Err(InvalidGridError::NonPositiveCellSize(0))
        );
    }

    #[test]
    fn rejects_negative_and_fractional_pixels() {
        assert!(matches!(
            GridGeometry::from_pixels(-640, 480, 20),
            Err(InvalidGridError::NonPositive { axis: "width", .. })
        ));
        assert!(matches!(
            GridGeometry::from_pixels(640, 470, 20),
            Err(InvalidGridError::NonIntegral { axis: "height", .. })
        ));
    }

    #[test]
    fn rejects_extent_beyond_coordinate_range() {
        assert!(matches!(
            GridGeometry::new(u32::MAX, 2, 2),
            Err(InvalidGridError::TooLarge { .. })
        ));
    }

    #[test]
    fn contains_checks_world_rectangle() {
        let g = GridGeometry::new(4, 3, 10).unwrap();
        assert!(g.contains(&Cell::new(0, 0)));
        assert!(g.contains(&Cell::new(30, 20)));
        assert!(!g.contains(&Cell::new(40, 0)));
        assert!(!g.contains(&Cell::new(0, 30)));
        assert!(!g.contains(&Cell::new(-10, 0)));
    }

    #[test]
    fn snap_floors_onto_lattice() {
        let g = GridGeometry::new(4, 3, 10).unwrap();
        assert_eq!(g.snap(&Cell::new(15, 29)), Some(Cell::new(10, 20)));
        assert_eq!(g.snap(&Cell::new(39, 0)), Some(Cell::new(30, 0)));
    }

    #[test]
    fn snap_rejects_points_outside_the_grid() {
        let g = GridGeometry::new(4, 3, 10).unwrap();
        assert_eq!(g.snap(&Cell::new(-1, 0)), None);
        assert_eq!(g.snap(&Cell::new(i32::MIN, 0)), None);
        assert_eq!(g.snap(&Cell::new(i32::MAX, i32::MAX)), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_is_validated() {
        let g: GridGeometry =
            serde_json::from_str(r#"{"cols":32,"rows":24,"cell_size":20}"#).unwrap();
        assert_eq!(g, GridGeometry::new(32, 24, 20).unwrap());
        let zero = serde_json::from_str::<GridGeometry>(r#"{"cols":0,"rows":24,"cell_size":20}"#);
        assert!(zero.is_err());
        let huge =
            serde_json::from_str::<GridGeometry>(r#"{"cols":4000000000,"rows":1,"cell_size":20}"#);
        assert!(huge.is_err());
    }

    #[test]
    fn centre_is_on_lattice() {
        let g = GridGeometry::from_pixels(640, 480, 20).unwrap();
        assert_eq!(g.centre(), Cell::new(320, 240));
        let odd = GridGeometry::new(5, 5, 10).unwrap();
        assert_eq!(odd.centre(), Cell::new(20, 20));
    }
}
