//! Decaying random exploration around another policy.

use rand::Rng;

use super::trait_::PolicyProvider;
use crate::arbiter::TickContext;
use crate::grid::Action;
use crate::safety::StateFeatures;

/// Wraps a policy with epsilon-greedy exploration that fades out with play.
///
/// With `epsilon = explore_games - games_played`, a random action is taken
/// when a uniform roll in `0..=roll_range` falls below `epsilon`. Once
/// `games_played >= explore_games` the inner policy is always used.
pub struct EpsilonGreedy<P, R> {
    inner: P,
    rng: R,
    explore_games: u32,
    roll_range: u32,
    name: String,
}

impl<P: PolicyProvider, R: Rng> EpsilonGreedy<P, R> {
    /// Default number of games over which exploration decays to zero.
    pub const DEFAULT_EXPLORE_GAMES: u32 = 80;
    /// Default upper bound of the exploration roll.
    pub const DEFAULT_ROLL_RANGE: u32 = 200;

    /// Wraps `inner` with the default schedule.
    pub fn new(inner: P, rng: R) -> Self {
        Self::with_schedule(
            inner,
            rng,
            Self::DEFAULT_EXPLORE_GAMES,
            Self::DEFAULT_ROLL_RANGE,
        )
    }

    /// Wraps `inner` with a custom decay schedule.
    pub fn with_schedule(inner: P, rng: R, explore_games: u32, roll_range: u32) -> Self {
        let name = format!("epsilon_greedy({})", inner.name());
        Self {
            inner,
            rng,
            explore_games,
            roll_range,
            name,
        }
    }

    /// Current epsilon for a given game count.
    pub fn epsilon(&self, games_played: u32) -> u32 {
        self.explore_games.saturating_sub(games_played)
    }

    /// The wrapped policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: PolicyProvider, R: Rng + Send> PolicyProvider for EpsilonGreedy<P, R> {
    fn select_action(&mut self, features: &StateFeatures, tick: &TickContext<'_>) -> Action {
        let epsilon = self.epsilon(tick.games_played());
        if epsilon > 0 && self.rng.gen_range(0..=self.roll_range) < epsilon {
            return Action::ALL[self.rng.gen_range(0..Action::ALL.len())];
        }
        self.inner.select_action(features, tick)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
