use super::Easing;
use crate::error::{BoomError, Result};
use crate::geometry::Point;
use crate::item::ItemSpec;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, serde_as};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Tilt at the start of a depth animation, in degrees.
pub const DEPTH_TILT_DEGREES: f64 = 60.0;
/// How far a curved path bows out, relative to its length.
const CURVE_BOW: f64 = 0.25;

/// Path an item travels between its start and end positions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MovingShape {
    #[default]
    #[strum(to_string = "line", serialize = "straight")]
    Line,
    #[strum(to_string = "curve", serialize = "arc")]
    Curve,
}

impl MovingShape {
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| BoomError::InvalidMovingShape(s.to_string()))
    }

    pub fn point_at(&self, from: Point, to: Point, t: f64) -> Point {
        match self {
            Self::Line => from.lerp(to, t),
            Self::Curve => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let mid = from.lerp(to, 0.5);
                let control = Point::new(mid.x - dy * CURVE_BOW, mid.y + dx * CURVE_BOW);
                let u = 1.0 - t;
                Point::new(
                    u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
                    u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayDirection {
    /// Items fly out of the anchor.
    #[default]
    Boom,
    /// Items fly back into the anchor.
    Unboom,
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "start_delay_ms")]
    pub start_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "delay_between_ms")]
    pub delay_between: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "duration_ms")]
    pub duration: Duration,
    /// Upper bound for the whole cluster; later items are clamped into it.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "total_ms")]
    pub total: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_delay: Duration::ZERO,
            delay_between: Duration::from_millis(50),
            duration: Duration::from_millis(400),
            total: Duration::from_millis(1000),
        }
    }
}

/// Transform of one item at one instant. Optional parts are only present
/// when the item animates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformUpdate {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemAnimation {
    pub index: usize,
    pub delay: Duration,
    pub duration: Duration,
    pub from: Point,
    pub to: Point,
    pub path: MovingShape,
    pub easing: Easing,
    pub rotation: Option<(f64, f64)>,
    pub scale: Option<(f64, f64)>,
    pub depth: Option<(f64, f64)>,
    /// Cancellation jumps to the final transform instead of freezing.
    pub snap_on_cancel: bool,
    cancelled: bool,
}

impl ItemAnimation {
    pub fn new(
        item: &ItemSpec,
        delay: Duration,
        timing: &Timing,
        direction: PlayDirection,
    ) -> Self {
        let anim = &item.animation;
        let settings = &item.settings;
        let mut rotation = (anim.start_rotation, anim.end_rotation);
        let mut scale = (anim.start_scale, anim.end_scale);
        let mut depth = (DEPTH_TILT_DEGREES, 0.0);
        let (mut from, mut to) = (item.start, item.end);

        if direction == PlayDirection::Unboom {
            std::mem::swap(&mut from, &mut to);
            rotation = (rotation.1, rotation.0);
            scale = (scale.1, scale.0);
            depth = (depth.1, depth.0);
        }

        let delay = delay.min(timing.total);
        let duration = timing.duration.min(timing.total - delay);
        if duration < timing.duration {
            log::debug!(
                "item {} clamped to {:?} to fit the {:?} cluster lifetime",
                item.index,
                duration,
                timing.total
            );
        }

        Self {
            index: item.index,
            delay,
            duration,
            from,
            to,
            path: item.moving_shape,
            easing: item.easing,
            rotation: settings.rotation.then_some(rotation),
            scale: settings.scale.then_some(scale),
            depth: settings.depth.then_some(depth),
            snap_on_cancel: settings.dismiss_immediate,
            cancelled: false,
        }
    }

    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Linear progress in 0-1 at `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let local = elapsed.saturating_sub(self.delay);
        if self.duration.is_zero() {
            return if elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        (local.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn transform_at(&self, elapsed: Duration) -> TransformUpdate {
        self.transform_for(self.progress(elapsed))
    }

    fn transform_for(&self, progress: f64) -> TransformUpdate {
        let eased = self.easing.apply(progress);
        let lerp = |(a, b): (f64, f64)| a + (b - a) * eased;
        let position = self.path.point_at(self.from, self.to, eased);

        TransformUpdate {
            index: self.index,
            x: position.x,
            y: position.y,
            rotation: self.rotation.map(lerp),
            scale: self.scale.map(lerp),
            // depth follows plain progress so it never tilts past flat
            depth: self.depth.map(|(a, b)| a + (b - a) * progress),
        }
    }

    pub fn translate_target(&mut self, dx: f64, dy: f64) {
        self.to.x += dx;
        self.to.y += dy;
    }

    pub fn translate_origin(&mut self, dx: f64, dy: f64) {
        self.from.x += dx;
        self.from.y += dy;
    }
}

/// Every item's animation for one playback of the cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    direction: PlayDirection,
    total: Duration,
    animations: Vec<ItemAnimation>,
}

impl Timeline {
    pub fn new(
        items: &[ItemSpec],
        delays: &[Duration],
        timing: &Timing,
        direction: PlayDirection,
    ) -> Self {
        let animations = items
            .iter()
            .zip(delays)
            .map(|(item, &delay)| {
                ItemAnimation::new(item, delay + item.anim_start_delay, timing, direction)
            })
            .collect();

        Self {
            direction,
            total: timing.total,
            animations,
        }
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn animations(&self) -> &[ItemAnimation] {
        &self.animations
    }

    /// When the last item settles; never past the cluster lifetime.
    pub fn end(&self) -> Duration {
        self.animations
            .iter()
            .map(ItemAnimation::end)
            .max()
            .unwrap_or_default()
            .min(self.total)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.end()
    }

    /// Transforms of every live item at `elapsed` since playback started.
    pub fn advance(&self, elapsed: Duration) -> Vec<TransformUpdate> {
        self.animations
            .iter()
            .filter(|a| !a.cancelled)
            .map(|a| a.transform_at(elapsed))
            .collect()
    }

    /// Stops one item. It either snaps to its final transform or stays where
    /// it is at `elapsed`, per its dismiss-immediate setting.
    pub fn cancel(&mut self, index: usize, elapsed: Duration) -> Option<TransformUpdate> {
        let anim = self
            .animations
            .iter_mut()
            .find(|a| a.index == index && !a.cancelled)?;
        anim.cancelled = true;
        Some(if anim.snap_on_cancel {
            anim.transform_for(1.0)
        } else {
            anim.transform_at(elapsed)
        })
    }

    pub fn cancel_all(&mut self, elapsed: Duration) -> Vec<TransformUpdate> {
        let indices: Vec<usize> = self.animations.iter().map(|a| a.index).collect();
        indices
            .into_iter()
            .filter_map(|i| self.cancel(i, elapsed))
            .collect()
    }

    /// Keeps in-flight items heading for the right place after a drag.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for anim in &mut self.animations {
            match self.direction {
                PlayDirection::Boom => anim.translate_target(dx, dy),
                PlayDirection::Unboom => anim.translate_origin(dx, dy),
            }
        }
    }
}
