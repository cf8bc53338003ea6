use thiserror::Error;

use crate::cluster::ClusterState;

/// Configuration faults detected during a build pass.
///
/// None of these are transient: a pass that hits one is aborted and nothing
/// from it is committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoomError {
    #[error("item {index} resolved to a non-positive dimension {width}x{height}")]
    InvalidDimension { index: usize, width: i64, height: i64 },
    #[error("no item to build")]
    EmptyCluster,
    #[error("invalid emission order: {0:?}")]
    InvalidEmissionOrder(String),
    #[error("invalid cluster shape: {0:?}")]
    InvalidShape(String),
    #[error("invalid cluster gravity: {0:?}")]
    InvalidGravity(String),
    #[error("invalid moving shape: {0:?}")]
    InvalidMovingShape(String),
    #[error("invalid text item style: {0:?}")]
    InvalidTextStyle(String),
    #[error("item {index} has no view to render")]
    MissingView { index: usize },
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: ClusterState,
    },
}

pub type Result<T, E = BoomError> = std::result::Result<T, E>;
