use thiserror::Error;

/// Construction-time failure for grid geometry and cycle building.
///
/// This is the only fatal error of the core: without a valid grid no cycle
/// can be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidGridError {
    #[error("Grid {axis} must be a positive number of cells, got {value}")]
    NonPositive { axis: &'static str, value: i64 },

    #[error("Cell size must be positive, got {0}")]
    NonPositiveCellSize(i64),

    #[error("Grid {axis} of {extent} units is not a whole number of {cell_size}-unit cells")]
    NonIntegral {
        axis: &'static str,
        extent: i64,
        cell_size: i64,
    },

    #[error("Grid {axis} of {value} units exceeds the coordinate range (max {max})")]
    TooLarge {
        axis: &'static str,
        value: i64,
        max: i64,
    },
}
