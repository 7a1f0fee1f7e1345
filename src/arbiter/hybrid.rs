//! Per-tick choice between the policy provider and the safety net.

use std::sync::Arc;

use super::config::{ArbiterConfig, HybridConfig};
use super::error::ConfigError;
use super::state::{ArbiterState, Decision, DecisionSource, SafetyTrigger, TickContext};
use super::stats::DecisionStats;
use crate::cycle::CycleIndex;
use crate::grid::{Action, Cell, Direction};
use crate::policy::{PolicyLoadError, PolicyProvider};
use crate::safety::{SafetyScorer, ShortcutPlanner, StateFeatures};

/// Chooses, each tick, between a policy provider and the guaranteed-safe
/// traversal.
///
/// Transition rule, first match wins:
///
/// 1. No usable policy → `SafetyNet`.
/// 2. `games_played < warmup_games` → `Explore` (policy, unconditionally).
/// 3. `danger >= 1 - danger_threshold` → `SafetyNet`.
/// 4. `safety < danger_threshold` → `SafetyNet`.
/// 5. `len > length_threshold && danger > mid_threshold` → `SafetyNet`.
/// 6. Otherwise → `Policy`.
///
/// The safety net tries [`ShortcutPlanner::propose`] and otherwise follows
/// the cycle. The shared [`CycleIndex`] is never mutated; the arbiter only
/// keeps usage tallies across ticks.
///
/// # Examples
///
/// ```
/// use snakeguard::arbiter::{HybridArbiter, HybridConfig, TickContext};
/// use snakeguard::grid::{Action, Cell, Direction};
/// use snakeguard::policy::GreedyHeuristicPolicy;
///
/// let config = HybridConfig::default();
/// let mut arbiter =
///     HybridArbiter::<GreedyHeuristicPolicy>::from_config(&config, None).unwrap();
///
/// let body = [Cell::new(0, 0)];
/// let tick = TickContext::new(&body, Cell::new(400, 400), Direction::Right, 0).unwrap();
/// // Without a policy the arbiter follows the cycle: (0, 0) → (20, 0).
/// assert_eq!(arbiter.decide(&tick), Action::Straight);
/// assert_eq!(arbiter.stats().safety_net_used, 1);
/// ```
pub struct HybridArbiter<P> {
    config: ArbiterConfig,
    index: Arc<CycleIndex>,
    shortcuts: ShortcutPlanner,
    policy: Option<P>,
    stats: DecisionStats,
    last_state: ArbiterState,
}

impl<P: PolicyProvider> HybridArbiter<P> {
    /// Creates an arbiter over a shared, prebuilt index.
    ///
    /// `config` is taken as is; [`HybridArbiter::from_config`] is the
    /// validating constructor.
    pub fn new(config: ArbiterConfig, index: Arc<CycleIndex>, policy: Option<P>) -> Self {
        let shortcuts = ShortcutPlanner::with_radius(*index.geometry(), config.shortcut_radius);
        Self {
            config,
            index,
            shortcuts,
            policy,
            stats: DecisionStats::default(),
            last_state: ArbiterState::default(),
        }
    }

    /// Validates `config`, builds the traversal and creates the arbiter.
    pub fn from_config(config: &HybridConfig, policy: Option<P>) -> Result<Self, ConfigError> {
        config.validate()?;
        let index = Arc::new(config.grid.build_index()?);
        Ok(Self::new(config.arbiter, index, policy))
    }

    /// Creates an arbiter from the outcome of a policy load.
    ///
    /// A failed load is logged and leaves the arbiter permanently in the
    /// safety net. Like [`HybridArbiter::new`], `config` is not validated.
    pub fn with_loaded_policy(
        config: ArbiterConfig,
        index: Arc<CycleIndex>,
        loaded: Result<P, PolicyLoadError>,
    ) -> Self {
        let policy = match loaded {
            Ok(policy) => {
                tracing::info!(policy = policy.name(), "Policy loaded");
                Some(policy)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Policy unavailable; safety net only");
                None
            }
        };
        Self::new(config, index, policy)
    }

    /// Arbiter configuration.
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Shared traversal index.
    pub fn index(&self) -> &Arc<CycleIndex> {
        &self.index
    }

    /// Returns `true` if a policy provider is installed.
    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    /// The installed policy provider.
    pub fn policy(&self) -> Option<&P> {
        self.policy.as_ref()
    }

    /// Replaces the policy provider, returning the previous one.
    pub fn set_policy(&mut self, policy: Option<P>) -> Option<P> {
        std::mem::replace(&mut self.policy, policy)
    }

    /// Usage tallies since the last reset.
    pub fn stats(&self) -> &DecisionStats {
        &self.stats
    }

    /// Clears the usage tallies for a new episode, returning the old ones.
    pub fn reset_stats(&mut self) -> DecisionStats {
        self.last_state = ArbiterState::Evaluate;
        self.stats.reset()
    }

    /// State chosen on the most recent tick (`Evaluate` before the first).
    pub fn last_state(&self) -> ArbiterState {
        self.last_state
    }

    /// Scorer bound to the shared index and this arbiter's parameters.
    pub fn scorer(&self) -> SafetyScorer<'_> {
        SafetyScorer::new(&self.index)
            .with_params(self.config.tail_penalty, self.config.guarded_segments)
    }

    /// Auxiliary features exposed to policy providers and trainers.
    pub fn state_features(&self, head: &Cell, target: &Cell, occupants: &[Cell]) -> StateFeatures {
        self.scorer().state_features(head, target, occupants)
    }

    /// Applies the transition rule without side effects.
    pub fn select_state(&self, tick: &TickContext<'_>) -> (ArbiterState, Option<SafetyTrigger>) {
        if self.policy.is_none() {
            return (ArbiterState::SafetyNet, Some(SafetyTrigger::NoPolicy));
        }
        if tick.games_played() < self.config.warmup_games {
            return (ArbiterState::Explore, None);
        }

        let head = tick.head();
        let occupants = tick.occupants();
        let scorer = self.scorer();
        let threshold = self.config.danger_threshold;

        let danger = scorer.danger_level(&head, occupants);
        if danger >= 1.0 - threshold {
            return (ArbiterState::SafetyNet, Some(SafetyTrigger::HighDanger));
        }
        if scorer.safety_score(&head, occupants) < threshold {
            return (ArbiterState::SafetyNet, Some(SafetyTrigger::LowSafety));
        }
        if occupants.len() > self.config.length_threshold && danger > self.config.mid_threshold {
            return (ArbiterState::SafetyNet, Some(SafetyTrigger::LongBody));
        }
        (ArbiterState::Policy, None)
    }

    /// Decides one tick and returns the full decision record.
    pub fn evaluate(&mut self, tick: &TickContext<'_>) -> Decision {
        let (state, trigger) = self.select_state(tick);
        self.last_state = state;

        let decision = match state {
            ArbiterState::Explore | ArbiterState::Policy => match self.consult_policy(tick) {
                Some(action) => Decision {
                    action,
                    state,
                    source: DecisionSource::Policy,
                    trigger,
                },
                None => self.safety_net(tick, Some(SafetyTrigger::NoPolicy)),
            },
            ArbiterState::Evaluate | ArbiterState::SafetyNet => self.safety_net(tick, trigger),
        };

        tracing::trace!(
            state = %decision.state,
            source = ?decision.source,
            action = %decision.action,
            games = tick.games_played(),
            "Decision"
        );
        decision
    }

    /// Decides one tick.
    pub fn decide(&mut self, tick: &TickContext<'_>) -> Action {
        self.evaluate(tick).action
    }

    fn consult_policy(&mut self, tick: &TickContext<'_>) -> Option<Action> {
        let features = self.state_features(&tick.head(), &tick.target(), tick.occupants());
        let policy = self.policy.as_mut()?;
        let action = policy.select_action(&features, tick);
        self.stats.policy_used += 1;
        Some(action)
    }

    fn safety_net(&mut self, tick: &TickContext<'_>, trigger: Option<SafetyTrigger>) -> Decision {
        self.stats.safety_net_used += 1;
        if let Some(trigger) = trigger {
            tracing::debug!(?trigger, head = %tick.head(), "Safety net engaged");
        }

        let head = tick.head();
        let heading = tick.heading();
        let occupants = tick.occupants();

        if self.config.shortcuts_enabled {
            if let Some(action) =
                self.shortcuts
                    .propose(&head, heading, &tick.target(), occupants)
            {
                self.stats.shortcuts_taken += 1;
                return Decision {
                    action,
                    state: ArbiterState::SafetyNet,
                    source: DecisionSource::Shortcut,
                    trigger,
                };
            }
        }

        let (action, source) = self.follow_cycle(&head, heading, &tick.target(), occupants);
        Decision {
            action,
            state: ArbiterState::SafetyNet,
            source,
            trigger,
        }
    }

    /// Steps to the cycle successor, or takes a reset step toward it when it
    /// is not a single legal relative move away.
    fn follow_cycle(
        &self,
        head: &Cell,
        heading: Direction,
        target: &Cell,
        occupants: &[Cell],
    ) -> (Action, DecisionSource) {
        let next = self.index.next_toward(head, target, occupants);
        let geometry = self.index.geometry();

        if geometry.is_adjacent(head, &next) {
            if let Some(direction) = Direction::from_step(next.x - head.x, next.y - head.y) {
                if direction != heading.reversed() {
                    return (heading.action_towards(direction), DecisionSource::CycleFollow);
                }
            }
        }

        tracing::debug!(head = %head, successor = %next, "Cycle reset step");
        (
            self.reset_step(head, heading, &next, occupants),
            DecisionSource::CycleReset,
        )
    }

    /// Safe relative move closest to `goal`; steers straight at it when no
    /// move is safe.
    fn reset_step(&self, head: &Cell, heading: Direction, goal: &Cell, occupants: &[Cell]) -> Action {
        let geometry = self.index.geometry();
        let scorer = self.scorer();

        Action::ALL
            .iter()
            .map(|&action| (action, geometry.neighbour(head, heading.apply(action))))
            .filter(|(_, cell)| !scorer.is_blocked(cell, occupants))
            .min_by_key(|(_, cell)| cell.manhattan(goal))
            .map(|(action, _)| action)
            .unwrap_or_else(|| {
                head.heading_to(goal)
                    .map_or(Action::Straight, |d| heading.action_towards(d))
            })
    }
}
