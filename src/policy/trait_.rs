//! Policy provider boundary.

use crate::arbiter::TickContext;
use crate::grid::Action;
use crate::safety::StateFeatures;

/// A learned or heuristic policy consulted by the arbiter.
///
/// The boundary is opaque: the arbiter uses the returned action verbatim and
/// never inspects how it was produced.
pub trait PolicyProvider: Send {
    /// Selects a relative action for the current tick.
    ///
    /// # Arguments
    ///
    /// * `features` - Cycle-derived auxiliary features for this tick
    /// * `tick` - Immutable occupant snapshot, target and heading
    fn select_action(&mut self, features: &StateFeatures, tick: &TickContext<'_>) -> Action;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}

impl<P: PolicyProvider + ?Sized> PolicyProvider for Box<P> {
    fn select_action(&mut self, features: &StateFeatures, tick: &TickContext<'_>) -> Action {
        (**self).select_action(features, tick)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
