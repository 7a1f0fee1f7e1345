//! Hybrid policy / safety-net arbitration.
//!
//! The arbiter is the only component holding state across ticks, and that
//! state is limited to usage tallies. Everything it reads per tick arrives
//! in a [`TickContext`]; the traversal is shared immutably.
//!
//! - [`config`] - [`HybridConfig`] and its grid / arbiter sections
//! - [`state`] - per-tick context, decision states and decision records
//! - [`stats`] - [`DecisionStats`] usage tallies
//! - [`hybrid`] - [`HybridArbiter`] itself

pub mod config;
pub mod error;
pub mod hybrid;
pub mod state;
pub mod stats;

pub use config::{ArbiterConfig, GridConfig, HybridConfig};
pub use error::ConfigError;
pub use hybrid::HybridArbiter;
pub use state::{ArbiterState, Decision, DecisionSource, SafetyTrigger, TickContext};
pub use stats::DecisionStats;
