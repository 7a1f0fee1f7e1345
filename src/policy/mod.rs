//! Policy provider trait and implementations.

pub mod error;
pub mod exploration;
pub mod greedy;
pub mod linear;
pub mod random;
pub mod trait_;

pub use error::PolicyLoadError;
pub use exploration::EpsilonGreedy;
pub use greedy::GreedyHeuristicPolicy;
pub use linear::LinearPolicy;
pub use random::RandomPolicy;
pub use trait_::PolicyProvider;
