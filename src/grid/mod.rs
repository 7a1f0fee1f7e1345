//! Grid primitives shared by every other module.

pub mod cell;
pub mod error;
pub mod geometry;

pub use cell::{Action, Cell, Direction};
pub use error::InvalidGridError;
pub use geometry::GridGeometry;
