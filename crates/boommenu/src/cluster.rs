use crate::error::{BoomError, Result};
use crate::events::{ItemEvent, Moved};
use crate::geometry::{Bounds, Offset, Rect, Size};
use crate::item::{
    BuildContext, ItemBuilder, ItemDefaults, ItemSpec, ItemView, Metrics, ViewProvider,
    start_scale_factor,
};
use crate::layout::{
    ClusterGravity, ClusterShape, DefaultPositionCalculator, LayoutParams, PositionCalculator,
};
use crate::schedule::{self, EmissionOrder, PlayDirection, Timeline, Timing, TransformUpdate};
use crate::style::ColorGenerator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::Display as StrumDisplay;

/// Where the manager is in its build-and-play cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClusterState {
    #[default]
    Idle,
    Resolving,
    Unisizing,
    Positioning,
    Scheduled,
    Animating,
}

/// Cluster-wide configuration. Read-only during a build pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub emission_order: EmissionOrder,
    pub shape: ClusterShape,
    pub gravity: ClusterGravity,
    pub offset: Offset,
    pub auto_scale_if_oversize: bool,
    pub auto_unisize: bool,
    pub allow_outside_board: bool,
    pub random_start_position: bool,
    /// Pixels per dp.
    pub density: f64,
    /// Fixes emission order, start positions and generated colors.
    pub seed: Option<u64>,
    pub timing: Timing,
    pub defaults: ItemDefaults,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            emission_order: EmissionOrder::default(),
            shape: ClusterShape::default(),
            gravity: ClusterGravity::default(),
            offset: Offset::default(),
            auto_scale_if_oversize: true,
            auto_unisize: true,
            allow_outside_board: false,
            random_start_position: true,
            density: 1.0,
            seed: None,
            timing: Timing::default(),
            defaults: ItemDefaults::default(),
        }
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Owns a cluster's builders and everything a build pass produces, and
/// drives playback from host-supplied elapsed time.
///
/// `elapsed` always counts from the most recent [`start`](Self::start) or
/// animated [`dismiss`](Self::dismiss).
pub struct ClusterManager {
    config: ClusterConfig,
    builders: Vec<ItemBuilder>,
    items: Vec<ItemSpec>,
    views: Vec<Box<dyn ItemView>>,
    bounds: Option<Bounds>,
    delays: Vec<Duration>,
    timeline: Option<Timeline>,
    state: ClusterState,
    calculator: Box<dyn PositionCalculator>,
    rng: StdRng,
    events: Vec<ItemEvent>,
    elapsed: Duration,
}

impl Default for ClusterManager {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

impl ClusterManager {
    pub fn new(config: ClusterConfig) -> Self {
        let rng = new_rng(config.seed);
        Self {
            config,
            builders: Vec::new(),
            items: Vec::new(),
            views: Vec::new(),
            bounds: None,
            delays: Vec::new(),
            timeline: None,
            state: ClusterState::Idle,
            calculator: Box::new(DefaultPositionCalculator),
            rng,
            events: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_items(mut self, builders: impl IntoIterator<Item = ItemBuilder>) -> Self {
        self.builders.extend(builders);
        self
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn state(&self) -> ClusterState {
        self.state
    }

    pub fn items(&self) -> &[ItemSpec] {
        &self.items
    }

    pub fn views(&self) -> &[Box<dyn ItemView>] {
        &self.views
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Start delay of each item from the last build pass, by index.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn builders(&self) -> &[ItemBuilder] {
        &self.builders
    }

    // Every change to the inputs drops the committed layout.

    pub fn set_config(&mut self, config: ClusterConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn set_emission_order(&mut self, order: EmissionOrder) {
        self.config.emission_order = order;
        self.invalidate();
    }

    pub fn set_shape(&mut self, shape: ClusterShape) {
        self.config.shape = shape;
        self.invalidate();
    }

    pub fn set_gravity(&mut self, gravity: ClusterGravity) {
        self.config.gravity = gravity;
        self.invalidate();
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.config.offset = offset;
        self.invalidate();
    }

    pub fn set_timing(&mut self, timing: Timing) {
        self.config.timing = timing;
        self.invalidate();
    }

    pub fn set_defaults(&mut self, defaults: ItemDefaults) {
        self.config.defaults = defaults;
        self.invalidate();
    }

    pub fn set_calculator(&mut self, calculator: Box<dyn PositionCalculator>) {
        self.calculator = calculator;
        self.invalidate();
    }

    /// Appends a builder and returns the index its item will get.
    pub fn add_item(&mut self, builder: ItemBuilder) -> usize {
        self.builders.push(builder);
        self.invalidate();
        self.builders.len() - 1
    }

    pub fn clear_items(&mut self) {
        self.builders.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.items.clear();
        self.views.clear();
        self.bounds = None;
        self.delays.clear();
        self.timeline = None;
        self.elapsed = Duration::ZERO;
        self.state = ClusterState::Idle;
    }

    /// Runs a full build pass against `anchor` (in board coordinates) and
    /// `board`. On success the cluster is `Scheduled`; on any error it is
    /// back to `Idle` with nothing committed.
    pub fn build(
        &mut self,
        anchor: Rect,
        board: Size,
        views: &mut dyn ViewProvider,
    ) -> Result<Bounds> {
        self.invalidate();
        self.rng = new_rng(self.config.seed);

        match self.run_pass(anchor, board, views) {
            Ok(bounds) => {
                log::debug!("built {} items, bounds {:?}", self.items.len(), bounds);
                Ok(bounds)
            }
            Err(e) => {
                log::debug!("build pass aborted during {}: {e}", self.state);
                self.invalidate();
                Err(e)
            }
        }
    }

    fn run_pass(
        &mut self,
        anchor: Rect,
        board: Size,
        views: &mut dyn ViewProvider,
    ) -> Result<Bounds> {
        if self.builders.is_empty() {
            return Err(BoomError::EmptyCluster);
        }

        self.state = ClusterState::Resolving;
        let metrics = Metrics::new(Size::new(anchor.width(), anchor.height()), board);
        let mut colors = ColorGenerator::new(self.config.seed.unwrap_or_default());
        let mut ctx = BuildContext {
            metrics,
            defaults: &self.config.defaults,
            density: self.config.density,
            colors: &mut colors,
            views,
        };
        let built = self
            .builders
            .iter()
            .enumerate()
            .map(|(index, builder)| builder.build(index, &mut ctx))
            .collect::<Result<Vec<_>>>()?;
        let (mut items, mut item_views): (Vec<_>, Vec<_>) = built.into_iter().unzip();

        self.state = ClusterState::Unisizing;
        if self.config.auto_unisize {
            unisize(&mut items, &mut item_views, &self.builders, metrics.anchor);
        }

        self.state = ClusterState::Positioning;
        let params = LayoutParams {
            gravity: self.config.gravity,
            shape: self.config.shape,
            offset: self.config.offset,
            board: metrics.board,
            anchor,
            random_start_position: self.config.random_start_position,
            auto_scale_if_oversize: self.config.auto_scale_if_oversize,
            allow_outside_board: self.config.allow_outside_board,
        };
        let bounds = self.calculator.layout(&mut items, &params, &mut self.rng)?;

        let (delays, timeline) = schedule::schedule(
            &items,
            self.config.emission_order,
            &self.config.timing,
            &mut self.rng,
        );

        self.items = items;
        self.views = item_views;
        self.bounds = Some(bounds);
        self.delays = delays;
        self.timeline = Some(timeline);
        self.state = ClusterState::Scheduled;
        Ok(bounds)
    }

    /// Begins the entrance animation.
    pub fn start(&mut self) -> Result<()> {
        self.require("start", &[ClusterState::Scheduled])?;
        self.elapsed = Duration::ZERO;
        self.state = ClusterState::Animating;
        Ok(())
    }

    /// Transforms of every live item at `elapsed`. Finishing the exit
    /// animation returns the cluster to `Idle`.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TransformUpdate> {
        if self.state != ClusterState::Animating {
            return Vec::new();
        }
        let Some(timeline) = self.timeline.as_ref() else {
            return Vec::new();
        };

        self.elapsed = elapsed;
        let updates = timeline.advance(elapsed);
        if timeline.direction() == PlayDirection::Unboom && timeline.is_finished(elapsed) {
            log::debug!("exit animation finished");
            // every item is already at its final transform in `updates`
            self.finish();
        }
        updates
    }

    /// Stops one item's animation. The returned transform is where the item
    /// comes to rest: its final transform when it dismisses immediately, its
    /// current one otherwise. `None` when nothing is playing for `index`.
    pub fn cancel(&mut self, index: usize) -> Result<Option<TransformUpdate>> {
        self.require("cancel", &[ClusterState::Animating])?;
        let elapsed = self.elapsed;
        Ok(self
            .timeline
            .as_mut()
            .and_then(|timeline| timeline.cancel(index, elapsed)))
    }

    /// Closes the menu. `immediate` drops it at once and returns where every
    /// item came to rest; otherwise the exit animation plays and
    /// [`advance`](Self::advance) returns to `Idle` when it ends.
    pub fn dismiss(&mut self, immediate: bool) -> Result<Vec<TransformUpdate>> {
        self.require("dismiss", &[ClusterState::Scheduled, ClusterState::Animating])?;

        if immediate || self.state == ClusterState::Scheduled {
            return Ok(self.finish());
        }

        if self
            .timeline
            .as_ref()
            .is_some_and(|t| t.direction() == PlayDirection::Unboom)
        {
            return Ok(Vec::new());
        }

        self.timeline = Some(Timeline::new(
            &self.items,
            &self.delays,
            &self.config.timing,
            PlayDirection::Unboom,
        ));
        self.elapsed = Duration::ZERO;
        Ok(Vec::new())
    }

    /// Cancels whatever is still playing and returns to `Idle`.
    fn finish(&mut self) -> Vec<TransformUpdate> {
        let playing = self.state == ClusterState::Animating;
        let updates = match self.timeline.as_mut() {
            // nothing is on screen before start
            Some(timeline) if playing => timeline.cancel_all(self.elapsed),
            _ => Vec::new(),
        };
        self.timeline = None;
        self.state = ClusterState::Idle;
        updates
    }

    /// Moves the committed cluster by (`dx`, `dy`). Each axis moves only if
    /// the bounds stay on the board along it, unless the cluster may leave
    /// the board. End positions, bounds and in-flight targets move together.
    pub fn translate(&mut self, dx: f64, dy: f64, board: Size) -> Result<Moved> {
        self.require("translate", &[ClusterState::Scheduled, ClusterState::Animating])?;
        let Some(bounds) = self.bounds.as_mut() else {
            return Err(BoomError::InvalidState {
                operation: "translate",
                state: self.state,
            });
        };

        let board = board.clamped();
        let free = self.config.allow_outside_board;
        let fits = |lo: f64, hi: f64, d: f64, room: f64| free || (lo + d >= 0.0 && hi + d <= room);
        let moved = Moved {
            x: dx != 0.0 && fits(bounds.left, bounds.right, dx, board.width),
            y: dy != 0.0 && fits(bounds.top, bounds.bottom, dy, board.height),
        };
        if !moved.any() {
            return Ok(moved);
        }

        let (dx, dy) = (
            if moved.x { dx } else { 0.0 },
            if moved.y { dy } else { 0.0 },
        );
        bounds.translate(dx, dy);
        for item in &mut self.items {
            item.end.x += dx;
            item.end.y += dy;
        }
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.translate(dx, dy);
        }
        Ok(moved)
    }

    /// Records a click. Items that dismiss on click close the menu the way
    /// their own dismiss-immediate setting says; the result is what
    /// [`dismiss`](Self::dismiss) returned.
    pub fn on_click(&mut self, index: usize, x: f64, y: f64) -> Result<Vec<TransformUpdate>> {
        self.require("click", &[ClusterState::Scheduled, ClusterState::Animating])?;
        let Some(settings) = self.items.get(index).map(|item| item.settings) else {
            log::warn!("click on unknown item {index}");
            return Ok(Vec::new());
        };

        self.events.push(ItemEvent::Click { index, x, y });
        if settings.dismiss_on_click {
            return self.dismiss(settings.dismiss_immediate);
        }
        Ok(Vec::new())
    }

    /// Drags the cluster by one of its items and records the outcome.
    pub fn on_drag(&mut self, index: usize, dx: f64, dy: f64, board: Size) -> Result<Moved> {
        let moved = self.translate(dx, dy, board)?;
        self.events.push(ItemEvent::Translate {
            index,
            dx,
            dy,
            moved,
        });
        Ok(moved)
    }

    pub fn drain_events(&mut self) -> Vec<ItemEvent> {
        std::mem::take(&mut self.events)
    }

    fn require(&self, operation: &'static str, allowed: &[ClusterState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(BoomError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

/// Gives every item the cluster's largest width and height.
fn unisize(
    items: &mut [ItemSpec],
    views: &mut [Box<dyn ItemView>],
    builders: &[ItemBuilder],
    anchor: Size,
) {
    let width = items.iter().map(|i| i.width).max().unwrap_or_default();
    let height = items.iter().map(|i| i.height).max().unwrap_or_default();
    log::debug!("unisizing {} items to {width}x{height}", items.len());

    for ((item, view), builder) in items.iter_mut().zip(views).zip(builders) {
        item.width = width;
        item.height = height;
        item.animation.start_scale =
            start_scale_factor(builder.sizing.start_scale, width, height, anchor);
        view.update_dimension(width, height);
    }
}
