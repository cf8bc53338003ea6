mod macros;

pub mod cluster;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod schedule;
pub mod style;

pub use cluster::{ClusterConfig, ClusterManager, ClusterState};
pub use error::{BoomError, Result};
pub use events::{ItemEvent, Moved};
pub use geometry::{Bounds, Offset, Point, Rect, Size};
pub use item::{ItemBuilder, ItemKind, ItemSpec, ItemView, ViewProvider};
pub use schedule::{PlayDirection, Timeline, TransformUpdate};
