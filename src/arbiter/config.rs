//! Configuration for the grid, the traversal and the hybrid arbiter.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cycle::{CycleIndex, GridCycleBuilder, TraversalPattern};
use crate::grid::GridGeometry;

/// Grid extent and traversal shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Number of columns (W).
    pub cols: u32,
    /// Number of rows (H).
    pub rows: u32,
    /// Cell edge length in world units.
    pub cell_size: u32,
    /// Requested traversal pattern.
    pub pattern: TraversalPattern,
}

impl GridConfig {
    /// Validated geometry for this configuration.
    pub fn geometry(&self) -> Result<GridGeometry, ConfigError> {
        Ok(GridGeometry::new(self.cols, self.rows, self.cell_size)?)
    }

    /// Builds the traversal and its index.
    pub fn build_index(&self) -> Result<CycleIndex, ConfigError> {
        let geometry = self.geometry()?;
        let cycle = GridCycleBuilder::new(geometry)
            .with_pattern(self.pattern)
            .build();
        Ok(CycleIndex::new(geometry, cycle))
    }
}

impl Default for GridConfig {
    /// A 640 × 480 world of 20-unit cells.
    fn default() -> Self {
        Self {
            cols: 32,
            rows: 24,
            cell_size: 20,
            pattern: TraversalPattern::default(),
        }
    }
}

/// Thresholds and counters governing the policy / safety-net choice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArbiterConfig {
    // --- Switching thresholds ---
    /// Safety score below this, or danger at or above `1 - this`, engages
    /// the safety net.
    pub danger_threshold: f64,
    /// Games below this count always use the policy.
    pub warmup_games: u32,
    /// Body length above which `mid_threshold` applies.
    pub length_threshold: usize,
    /// Danger above this engages the safety net for long bodies.
    pub mid_threshold: f64,

    // --- Safety net ---
    /// Shortcut locality bound in cells.
    pub shortcut_radius: u32,
    /// Whether the safety net tries a shortcut before cycle-following.
    pub shortcuts_enabled: bool,

    // --- Scoring ---
    /// Danger penalty for a trailing segment within one cell of the head.
    pub tail_penalty: f64,
    /// Leading body segments excluded from trap checks.
    pub guarded_segments: usize,
}

impl ArbiterConfig {
    /// Checks every threshold is a finite value in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("danger_threshold", self.danger_threshold),
            ("mid_threshold", self.mid_threshold),
            ("tail_penalty", self.tail_penalty),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.shortcut_radius == 0 {
            return Err(ConfigError::ZeroShortcutRadius);
        }
        Ok(())
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            danger_threshold: 0.3,
            warmup_games: 50,
            length_threshold: 20,
            mid_threshold: 0.4,
            shortcut_radius: 5,
            shortcuts_enabled: true,
            tail_penalty: 0.3,
            guarded_segments: 3,
        }
    }
}

/// Everything needed to construct a hybrid arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HybridConfig {
    pub grid: GridConfig,
    pub arbiter: ArbiterConfig,
}

impl HybridConfig {
    /// Validates both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.geometry()?;
        self.arbiter.validate()
    }
}
