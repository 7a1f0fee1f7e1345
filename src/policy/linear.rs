//! Linear action-value policy over the observation vector.

use super::error::PolicyLoadError;
use super::trait_::PolicyProvider;
use crate::arbiter::TickContext;
use crate::grid::{Action, GridGeometry};
use crate::observation::ObservationBuilder;
use crate::safety::StateFeatures;

type WeightRow = [f64; ObservationBuilder::DIM];

/// Scores each action as `w_a · obs + b_a` and picks the argmax.
///
/// Weights come from an external trainer; this type only validates and
/// evaluates them. Ties resolve to the earliest action in
/// `[straight, right, left]`.
pub struct LinearPolicy {
    geometry: GridGeometry,
    weights: [WeightRow; 3],
    bias: [f64; 3],
}

impl LinearPolicy {
    /// Builds a policy from a `3 × 14` weight matrix and a 3-element bias.
    ///
    /// Shape or finiteness problems are reported as [`PolicyLoadError`]
    /// rather than panicking, so a stale or mismatched weight set simply
    /// leaves the caller without a policy.
    pub fn from_weights(
        geometry: GridGeometry,
        weights: &[Vec<f64>],
        bias: &[f64],
    ) -> Result<Self, PolicyLoadError> {
        let cols = weights.first().map_or(0, Vec::len);
        if weights.len() != Action::ALL.len()
            || weights.iter().any(|row| row.len() != ObservationBuilder::DIM)
        {
            return Err(PolicyLoadError::IncompatibleShape {
                rows: weights.len(),
                cols,
                expected_rows: Action::ALL.len(),
                expected_cols: ObservationBuilder::DIM,
            });
        }
        if bias.len() != Action::ALL.len() {
            return Err(PolicyLoadError::IncompatibleShape {
                rows: 1,
                cols: bias.len(),
                expected_rows: 1,
                expected_cols: Action::ALL.len(),
            });
        }

        let mut w = [[0.0; ObservationBuilder::DIM]; 3];
        for (r, row) in weights.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(PolicyLoadError::NonFinite { row: r, col: c });
                }
                w[r][c] = value;
            }
        }
        let mut b = [0.0; 3];
        for (i, &value) in bias.iter().enumerate() {
            if !value.is_finite() {
                return Err(PolicyLoadError::NonFinite { row: 3, col: i });
            }
            b[i] = value;
        }

        Ok(Self {
            geometry,
            weights: w,
            bias: b,
        })
    }

    /// Action values for an observation, in `[straight, right, left]` order.
    pub fn q_values(&self, obs: &[f64; ObservationBuilder::DIM]) -> [f64; 3] {
        let mut q = self.bias;
        for (a, row) in self.weights.iter().enumerate() {
            q[a] += row.iter().zip(obs.iter()).map(|(w, x)| w * x).sum::<f64>();
        }
        q
    }
}

impl PolicyProvider for LinearPolicy {
    fn select_action(&mut self, features: &StateFeatures, tick: &TickContext<'_>) -> Action {
        let obs = ObservationBuilder::build(&self.geometry, tick, features);
        let q = self.q_values(&obs);
        Action::ALL
            .into_iter()
            .zip(q)
            .fold((Action::Straight, f64::NEG_INFINITY), |best, (action, value)| {
                if value > best.1 {
                    (action, value)
                } else {
                    best
                }
            })
            .0
    }

    fn name(&self) -> &str {
        "linear"
    }
}
