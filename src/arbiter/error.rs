use thiserror::Error;

use crate::grid::InvalidGridError;

/// Configuration rejected at construction time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidGrid(#[from] InvalidGridError),

    #[error("Threshold {name} must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("Shortcut radius must be at least one cell")]
    ZeroShortcutRadius,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_is_transparent() {
        let inner = InvalidGridError::NonPositiveCellSize(0);
        let e: ConfigError = inner.clone().into();
        assert_eq!(e.to_string(), inner.to_string());
    }

    #[test]
    fn threshold_display() {
        let e = ConfigError::ThresholdOutOfRange {
            name: "danger_threshold",
            value: 1.5,
        };
        assert_eq!(
            e.to_string(),
            "Threshold danger_threshold must lie in [0, 1], got 1.5"
        );
    }
}
