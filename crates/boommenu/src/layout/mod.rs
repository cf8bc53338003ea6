//! Cluster placement: shapes, gravities and the position calculator.

pub mod gravity;
pub mod position;
pub mod shape;

pub use gravity::{Align, ClusterGravity, Corner, Placement, Side};
pub use position::{DefaultPositionCalculator, LayoutParams, PositionCalculator};
pub use shape::{ClusterShape, Footprint};
