//! Random policy for testing and baselines.

use rand::Rng;

use super::trait_::PolicyProvider;
use crate::arbiter::TickContext;
use crate::grid::Action;
use crate::safety::StateFeatures;

/// Uniformly random relative action.
///
/// The random source is injected so runs are reproducible with a seeded RNG.
pub struct RandomPolicy<R> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    /// Creates a new random policy drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> PolicyProvider for RandomPolicy<R> {
    fn select_action(&mut self, _features: &StateFeatures, _tick: &TickContext<'_>) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, Direction};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn features() -> StateFeatures {
        StateFeatures {
            on_cycle: 1.0,
            normalized_distance: 0.0,
            safety: 1.0,
        }
    }

    #[test]
    fn same_seed_same_actions() {
        let body = [Cell::new(0, 0)];
        let tick = TickContext::new(&body, Cell::new(20, 0), Direction::Right, 0).unwrap();
        let mut a = RandomPolicy::new(StdRng::seed_from_u64(7));
        let mut b = RandomPolicy::new(StdRng::seed_from_u64(7));
        for _ in 0..32 {
            assert_eq!(
                a.select_action(&features(), &tick),
                b.select_action(&features(), &tick)
            );
        }
    }

    #[test]
    fn covers_every_action() {
        let body = [Cell::new(0, 0)];
        let tick = TickContext::new(&body, Cell::new(20, 0), Direction::Right, 0).unwrap();
        let mut policy = RandomPolicy::new(StdRng::seed_from_u64(1));
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[policy.select_action(&features(), &tick).index()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
