//! snakeguard - guaranteed survivability for a grid agent with a trailing body
//!
//! Builds a full-coverage traversal of a `W × H` grid and arbitrates, tick by
//! tick, between a learned policy and a safety net (local shortcuts, then
//! cycle-following) based on danger and safety scores.
//!
//! Per-tick data flow:
//!
//! ```text
//! environment ─▶ TickContext ─▶ HybridArbiter ─┬─▶ SafetyScorer
//!                                              ├─▶ ShortcutPlanner
//!                                              ├─▶ CycleIndex
//!                                              └─▶ PolicyProvider
//!                                  Action ◀────┘
//! ```

pub mod arbiter;
pub mod cycle;
pub mod environment;
pub mod grid;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod safety;

pub use arbiter::{HybridArbiter, HybridConfig, TickContext};
pub use cycle::{CycleIndex, GridCycleBuilder};
pub use grid::{Action, Cell, Direction, GridGeometry};
pub use policy::PolicyProvider;
