//! Full-coverage traversal of the grid and O(1) lookups over it.
//!
//! - [`builder`] - [`GridCycleBuilder`] and the resulting [`Cycle`]
//! - [`index`] - [`CycleIndex`] position, successor and distance queries

pub mod builder;
pub mod index;

pub use builder::{Cycle, GridCycleBuilder, TraversalPattern};
pub use index::CycleIndex;
