//! End-to-end runs of the arbiter against the headless environment.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use snakeguard::arbiter::{
    ArbiterConfig, ArbiterState, GridConfig, HybridArbiter, HybridConfig, SafetyTrigger,
};
use snakeguard::cycle::TraversalPattern;
use snakeguard::environment::{EnvConfig, SnakeEnvironment};
use snakeguard::metrics::EvaluationMetrics;
use snakeguard::policy::{
    EpsilonGreedy, GreedyHeuristicPolicy, LinearPolicy, PolicyLoadError, PolicyProvider,
};
use snakeguard::{Cell, Direction, TickContext};

fn cycle_only(cols: u32, rows: u32, pattern: TraversalPattern) -> HybridArbiter<GreedyHeuristicPolicy> {
    let config = HybridConfig {
        grid: GridConfig {
            cols,
            rows,
            cell_size: 20,
            pattern,
        },
        arbiter: ArbiterConfig {
            shortcuts_enabled: false,
            ..ArbiterConfig::default()
        },
    };
    HybridArbiter::from_config(&config, None).unwrap()
}

#[test]
fn cycle_following_fills_the_grid() {
    let mut arbiter = cycle_only(8, 6, TraversalPattern::ReturnLane);
    let geometry = *arbiter.index().geometry();
    let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), 7);

    // Lay the body along row 0 so it trails the head in traversal order.
    let body = (0..5).rev().map(|i| Cell::new(i * 20, 0)).collect();
    env.place_snake(body, Direction::Right).unwrap();

    let mut last = None;
    for _ in 0..10_000 {
        let action = arbiter.decide(&env.tick_context());
        let result = env.step(action);
        if result.done {
            last = Some(result);
            break;
        }
    }

    let result = last.expect("game should end by filling the grid");
    assert!(result.reward > 0.0, "snake died: {:?}", result);
    assert_eq!(env.body().len(), geometry.cell_count());
    assert_eq!(arbiter.stats().policy_used, 0);
}

#[test]
fn odd_grid_cycle_following_never_starves() {
    let mut arbiter = cycle_only(9, 9, TraversalPattern::ReturnLane);
    let index = Arc::clone(arbiter.index());
    assert!(index.cycle().is_closed());
    assert_eq!(index.len(), 80);
    let geometry = *index.geometry();
    let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), 0);
    let body = (0..5).rev().map(|i| Cell::new(i * 20, 0)).collect();
    env.place_snake(body, Direction::Right).unwrap();

    let mut last = None;
    for _ in 0..50_000 {
        let action = arbiter.decide(&env.tick_context());
        let result = env.step(action);
        if result.done {
            last = Some(result);
            break;
        }
    }

    // Food on the spare corner is reached too, so the game only ends once
    // the body is as long as the loop itself.
    let result = last.expect("game should end");
    assert!(env.body().len() >= index.len(), "ended early: {:?}", result);
    assert!(result.score as usize >= index.len() - 5);
}

#[test]
fn open_path_reset_step_never_hits_a_wall() {
    let mut arbiter = cycle_only(5, 5, TraversalPattern::Serpentine);
    assert!(!arbiter.index().cycle().is_closed());
    let geometry = *arbiter.index().geometry();
    let config = EnvConfig {
        starvation_factor: 10_000,
        ..EnvConfig::default()
    };
    let mut env = SnakeEnvironment::new(geometry, config, 1);
    env.place_snake(vec![Cell::new(0, 80)], Direction::Right).unwrap();
    env.place_food_at(Cell::new(0, 0)).unwrap();

    for _ in 0..500 {
        let decision = arbiter.evaluate(&env.tick_context());
        assert_eq!(decision.state, ArbiterState::SafetyNet);
        let result = env.step(decision.action);
        assert!(!result.done, "died at {}", env.body()[0]);
    }
}

#[test]
fn concrete_trap_scenario_selects_safety_net() {
    let config = HybridConfig::default();
    let greedy = GreedyHeuristicPolicy::new(config.grid.geometry().unwrap());
    let mut arbiter = HybridArbiter::from_config(&config, Some(greedy)).unwrap();

    let body = [
        Cell::new(100, 100),
        Cell::new(80, 100),
        Cell::new(80, 80),
        Cell::new(100, 80),
        Cell::new(120, 80),
        Cell::new(120, 100),
    ];
    let scorer = arbiter.scorer();
    assert_eq!(scorer.danger_level(&body[0], &body), 1.0);

    let warm = TickContext::new(&body, Cell::new(400, 400), Direction::Down, 49).unwrap();
    assert_eq!(arbiter.evaluate(&warm).state, ArbiterState::Explore);

    let tick = TickContext::new(&body, Cell::new(400, 400), Direction::Down, 50).unwrap();
    let decision = arbiter.evaluate(&tick);
    assert_eq!(decision.state, ArbiterState::SafetyNet);
    assert_eq!(decision.trigger, Some(SafetyTrigger::HighDanger));
}

#[test]
fn shared_index_serves_multiple_arbiters() {
    let index = Arc::new(GridConfig::default().build_index().unwrap());
    let geometry = *index.geometry();
    let a = HybridArbiter::new(
        ArbiterConfig::default(),
        Arc::clone(&index),
        Some(GreedyHeuristicPolicy::new(geometry)),
    );
    let b: HybridArbiter<GreedyHeuristicPolicy> =
        HybridArbiter::new(ArbiterConfig::default(), Arc::clone(&index), None);
    assert!(Arc::ptr_eq(a.index(), b.index()));
    assert_eq!(Arc::strong_count(&index), 3);
}

#[test]
fn mismatched_weights_leave_only_the_safety_net() {
    let index = Arc::new(GridConfig::default().build_index().unwrap());
    let geometry = *index.geometry();
    // Weights trained without the cycle features.
    let stale = vec![vec![0.0; 11]; 3];
    let loaded = LinearPolicy::from_weights(geometry, &stale, &[0.0; 3]);
    assert!(matches!(loaded, Err(PolicyLoadError::IncompatibleShape { .. })));

    let mut arbiter = HybridArbiter::with_loaded_policy(ArbiterConfig::default(), index, loaded);
    let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), 3);
    for _ in 0..20 {
        let decision = arbiter.evaluate(&env.tick_context());
        assert_eq!(decision.trigger, Some(SafetyTrigger::NoPolicy));
        if env.step(decision.action).done {
            break;
        }
    }
    assert_eq!(arbiter.stats().policy_used, 0);
}

#[test]
fn exploring_policy_runs_through_evaluation() {
    let config = HybridConfig {
        arbiter: ArbiterConfig {
            warmup_games: 2,
            ..ArbiterConfig::default()
        },
        ..HybridConfig::default()
    };
    let geometry = config.grid.geometry().unwrap();
    let policy = EpsilonGreedy::new(
        GreedyHeuristicPolicy::new(geometry),
        StdRng::seed_from_u64(11),
    );
    assert_eq!(policy.name(), "epsilon_greedy(greedy_heuristic)");

    let mut arbiter = HybridArbiter::from_config(&config, Some(policy)).unwrap();
    let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), 11);
    let metrics = EvaluationMetrics::evaluate(&mut env, &mut arbiter, 4, 300);

    assert_eq!(metrics.n_episodes, 4);
    assert!(metrics.decisions.policy_used > 0);
    assert_eq!(
        metrics.decisions.total(),
        metrics.decisions.policy_used + metrics.decisions.safety_net_used
    );
}
