//! Evaluation metrics for arbiter runs.
//!
//! Plays whole games and aggregates score, survival and the split between
//! policy and safety-net decisions.

use std::fmt;

use crate::arbiter::{DecisionStats, HybridArbiter};
use crate::environment::SnakeEnvironment;
use crate::policy::PolicyProvider;

/// Aggregated evaluation metrics over multiple games.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Mean targets eaten per game.
    pub mean_score: f64,
    /// Best score over all games.
    pub max_score: u32,
    /// Mean steps per game.
    pub mean_steps: f64,
    /// Games cut off at the step limit instead of ending naturally.
    pub truncated: usize,
    /// Decision tallies summed over all games.
    pub decisions: DecisionStats,
    /// Number of games evaluated.
    pub n_episodes: usize,
}

#[derive(Debug, Default)]
struct EpisodeStats {
    score: u32,
    steps: u32,
    truncated: bool,
}

impl EvaluationMetrics {
    /// Plays `n_episodes` games and aggregates the results.
    ///
    /// # Arguments
    ///
    /// * `env` - Environment to play in; reset before every game
    /// * `arbiter` - Arbiter deciding every step; its tallies are reset per game
    /// * `n_episodes` - Number of games
    /// * `max_steps` - Per-game step cap
    pub fn evaluate<P: PolicyProvider>(
        env: &mut SnakeEnvironment,
        arbiter: &mut HybridArbiter<P>,
        n_episodes: usize,
        max_steps: u32,
    ) -> Self {
        let mut all_stats = Vec::with_capacity(n_episodes);
        let mut decisions = DecisionStats::default();

        for _ in 0..n_episodes {
            env.reset();
            arbiter.reset_stats();
            let mut stats = EpisodeStats {
                truncated: true,
                ..EpisodeStats::default()
            };

            for _ in 0..max_steps {
                let action = arbiter.decide(&env.tick_context());
                let result = env.step(action);
                stats.score = result.score;
                stats.steps = result.steps;
                if result.done {
                    stats.truncated = false;
                    break;
                }
            }

            decisions.merge(arbiter.stats());
            all_stats.push(stats);
        }

        let n = all_stats.len().max(1) as f64;
        Self {
            mean_score: all_stats.iter().map(|s| s.score as f64).sum::<f64>() / n,
            max_score: all_stats.iter().map(|s| s.score).max().unwrap_or(0),
            mean_steps: all_stats.iter().map(|s| s.steps as f64).sum::<f64>() / n,
            truncated: all_stats.iter().filter(|s| s.truncated).count(),
            decisions,
            n_episodes,
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation Metrics ({} games) ===", self.n_episodes)?;
        writeln!(f, "  Mean score:        {:.2}", self.mean_score)?;
        writeln!(f, "  Best score:        {}", self.max_score)?;
        writeln!(f, "  Mean steps:        {:.1}", self.mean_steps)?;
        writeln!(f, "  Truncated games:   {}", self.truncated)?;
        write!(f, "  Decisions:         {}", self.decisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::HybridConfig;
    use crate::environment::EnvConfig;
    use crate::policy::GreedyHeuristicPolicy;

    #[test]
    fn evaluate_completes() {
        let config = HybridConfig::default();
        let mut arbiter: HybridArbiter<GreedyHeuristicPolicy> =
            HybridArbiter::from_config(&config, None).unwrap();
        let geometry = *arbiter.index().geometry();
        let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), 42);
        let metrics = EvaluationMetrics::evaluate(&mut env, &mut arbiter, 3, 200);
        assert_eq!(metrics.n_episodes, 3);
        assert!(metrics.mean_steps > 0.0);
        assert_eq!(metrics.decisions.policy_used, 0);
        assert!(metrics.decisions.safety_net_used > 0);
    }

    #[test]
    fn display_lists_decisions() {
        let metrics = EvaluationMetrics {
            mean_score: 1.5,
            max_score: 3,
            mean_steps: 40.0,
            truncated: 0,
            decisions: DecisionStats {
                policy_used: 1,
                safety_net_used: 1,
                shortcuts_taken: 0,
            },
            n_episodes: 2,
        };
        let text = metrics.to_string();
        assert!(text.contains("(2 games)"));
        assert!(text.contains("AI: 50.0% | Safety: 50.0%"));
    }
}
