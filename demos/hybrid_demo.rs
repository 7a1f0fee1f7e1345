// Demonstration: play headless games with the hybrid arbiter and report metrics.
//
// Run from the repo root:
//   RUST_LOG=snakeguard=debug cargo run --example hybrid_demo -- --policy greedy --episodes 20

use std::env;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use snakeguard::arbiter::{HybridArbiter, HybridConfig};
use snakeguard::environment::{EnvConfig, SnakeEnvironment};
use snakeguard::metrics::EvaluationMetrics;
use snakeguard::policy::{EpsilonGreedy, GreedyHeuristicPolicy, PolicyProvider, RandomPolicy};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("greedy");
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(25);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let max_steps: u32 = arg_value(&args, "--max-steps")
        .and_then(|s| s.parse().ok())
        .unwrap_or(5_000);

    let config = HybridConfig::default();
    let geometry = match config.grid.geometry() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Invalid grid: {}", e);
            std::process::exit(2);
        }
    };

    let policy: Option<Box<dyn PolicyProvider>> = match policy_name {
        "none" => None,
        "random" => Some(Box::new(RandomPolicy::new(StdRng::seed_from_u64(seed)))),
        "greedy" => Some(Box::new(GreedyHeuristicPolicy::new(geometry))),
        "explore" => Some(Box::new(EpsilonGreedy::new(
            GreedyHeuristicPolicy::new(geometry),
            StdRng::seed_from_u64(seed),
        ))),
        other => {
            eprintln!(
                "Unknown --policy '{}'; expected 'none', 'random', 'greedy' or 'explore'.",
                other
            );
            std::process::exit(2);
        }
    };

    let mut arbiter = match HybridArbiter::from_config(&config, policy) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let mut env = SnakeEnvironment::new(geometry, EnvConfig::default(), seed);

    let metrics = EvaluationMetrics::evaluate(&mut env, &mut arbiter, episodes, max_steps);
    println!(
        "Policy: {}",
        arbiter.policy().map_or("none", |p| p.name())
    );
    println!("{}", metrics);
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
