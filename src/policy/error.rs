use thiserror::Error;

/// Why a policy could not be made available.
///
/// Returned by policy load operations instead of panicking; an arbiter
/// without a usable policy stays in the safety net.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyLoadError {
    #[error("Policy weights have shape {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    IncompatibleShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("Policy weight at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },

    #[error("No policy available: {0}")]
    Unavailable(String),
}
