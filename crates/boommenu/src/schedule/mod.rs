//! Emission order, easing and per-item playback.

mod animation;
mod easing;
mod emission;

pub use animation::{
    DEPTH_TILT_DEGREES, ItemAnimation, MovingShape, PlayDirection, Timeline, Timing,
    TransformUpdate,
};
pub use easing::{Easing, OVERSHOOT, ParseEasingError};
pub use emission::{EmissionOrder, start_delays};

use crate::item::ItemSpec;
use rand::RngCore;
use std::time::Duration;

/// Assigns every item its start delay and builds the entrance timeline.
/// Returns the delays too, so the reverse playback can reuse them.
pub fn schedule(
    items: &[ItemSpec],
    order: EmissionOrder,
    timing: &Timing,
    rng: &mut dyn RngCore,
) -> (Vec<Duration>, Timeline) {
    let delays = start_delays(
        items.len(),
        order,
        timing.start_delay,
        timing.delay_between,
        rng,
    );
    log::debug!("scheduled {} items in {} order", items.len(), order);
    let timeline = Timeline::new(items, &delays, timing, PlayDirection::Boom);
    (delays, timeline)
}
