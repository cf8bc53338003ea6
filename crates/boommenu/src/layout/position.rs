use super::gravity::ClusterGravity;
use super::shape::{ClusterShape, Footprint};
use crate::error::{BoomError, Result};
use crate::geometry::{Bounds, Offset, Point, Rect, Size};
use crate::item::ItemSpec;
use rand::{Rng, RngCore};

/// Below this spread a cluster cannot be shrunk any further.
const MIN_SPAN: f64 = 1e-9;

/// Inputs of one layout pass besides the items themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub gravity: ClusterGravity,
    pub shape: ClusterShape,
    pub offset: Offset,
    pub board: Size,
    pub anchor: Rect,
    pub random_start_position: bool,
    pub auto_scale_if_oversize: bool,
    pub allow_outside_board: bool,
}

/// Computes where items start and where they come to rest.
pub trait PositionCalculator {
    /// Writes each item's start and end position and returns the cluster
    /// bounds.
    fn layout(
        &mut self,
        items: &mut [ItemSpec],
        params: &LayoutParams,
        rng: &mut dyn RngCore,
    ) -> Result<Bounds>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPositionCalculator;

impl PositionCalculator for DefaultPositionCalculator {
    fn layout(
        &mut self,
        items: &mut [ItemSpec],
        params: &LayoutParams,
        rng: &mut dyn RngCore,
    ) -> Result<Bounds> {
        if items.is_empty() {
            return Err(BoomError::EmptyCluster);
        }

        let board = params.board.clamped();
        let footprints: Vec<Footprint> = items
            .iter()
            .map(|item| Footprint::new(item.size(), item.margin))
            .collect();

        let local_centers = params
            .shape
            .item_centers(&footprints, params.gravity.outward());
        let local = ClusterShape::local_bounds(&footprints, &local_centers);

        let placement = params.gravity.place(&local, &params.anchor);
        let (ox, oy) = params.offset.displacement();
        let (dx, dy) = (placement.dx + ox, placement.dy + oy);
        let pivot = Point::new(placement.pivot.x + ox, placement.pivot.y + oy);

        let mut centers: Vec<Point> = local_centers
            .iter()
            .map(|c| Point::new(c.x + dx, c.y + dy))
            .collect();

        if params.auto_scale_if_oversize {
            shrink_to_fit(&footprints, &mut centers, pivot, board);
        }

        let mut bounds = ClusterShape::local_bounds(&footprints, &centers);
        if !params.allow_outside_board {
            let (sx, sy) = (
                clamp_shift(bounds.left, bounds.right, board.width),
                clamp_shift(bounds.top, bounds.bottom, board.height),
            );
            if sx != 0.0 || sy != 0.0 {
                log::debug!("cluster shifted by ({sx}, {sy}) to stay on the board");
                centers.iter_mut().for_each(|c| {
                    c.x += sx;
                    c.y += sy;
                });
                bounds.translate(sx, sy);
            }
        }

        for (item, center) in items.iter_mut().zip(centers) {
            item.set_end_center(center);
            let start = start_center(item, &params.anchor, params.random_start_position, rng);
            item.set_start_center(start);
        }

        Ok(bounds)
    }
}

/// Pulls item centers toward `pivot` on every axis where the cluster is wider
/// than the board. Item sizes stay untouched.
fn shrink_to_fit(footprints: &[Footprint], centers: &mut [Point], pivot: Point, board: Size) {
    let bounds = ClusterShape::local_bounds(footprints, centers);

    if bounds.width() > board.width {
        let max_item = footprints.iter().map(|f| f.size.width).fold(0.0, f64::max);
        let span = spread(centers.iter().map(|c| c.x));
        let s = shrink_factor(board.width, max_item, span);
        log::warn!(
            "cluster is {} wide on a {} board, scaling by {s:.3}",
            bounds.width(),
            board.width
        );
        centers
            .iter_mut()
            .for_each(|c| c.x = pivot.x + (c.x - pivot.x) * s);
    }

    if bounds.height() > board.height {
        let max_item = footprints.iter().map(|f| f.size.height).fold(0.0, f64::max);
        let span = spread(centers.iter().map(|c| c.y));
        let s = shrink_factor(board.height, max_item, span);
        log::warn!(
            "cluster is {} high on a {} board, scaling by {s:.3}",
            bounds.height(),
            board.height
        );
        centers
            .iter_mut()
            .for_each(|c| c.y = pivot.y + (c.y - pivot.y) * s);
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max { 0.0 } else { max - min }
}

/// Factor in 0-1 that makes `span` centers plus the widest item fit `room`.
fn shrink_factor(room: f64, max_item: f64, span: f64) -> f64 {
    if span < MIN_SPAN {
        return 1.0;
    }
    ((room - max_item) / span).clamp(0.0, 1.0)
}

/// Shift that brings `[lo, hi]` inside `[0, room]`. When it cannot fit, the
/// low edge wins.
fn clamp_shift(lo: f64, hi: f64, room: f64) -> f64 {
    if lo < 0.0 || hi - lo > room {
        -lo
    } else if hi > room {
        room - hi
    } else {
        0.0
    }
}

/// Entrance point of an item: the anchor center, or a random point inside
/// the anchor that keeps the item's scaled-down footprint within it.
fn start_center(
    item: &ItemSpec,
    anchor: &Rect,
    random: bool,
    rng: &mut dyn RngCore,
) -> Point {
    let center = anchor.center();
    if !random {
        return center;
    }

    let scale = item.animation.start_scale.max(0.0);
    let (half_w, half_h) = (
        item.width as f64 * scale / 2.0,
        item.height as f64 * scale / 2.0,
    );
    let mut pick = |lo: f64, hi: f64, fallback: f64| {
        if lo < hi {
            rng.random_range(lo..=hi)
        } else {
            fallback
        }
    };

    Point::new(
        pick(anchor.left + half_w, anchor.right - half_w, center.x),
        pick(anchor.top + half_h, anchor.bottom - half_h, center.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{AnimationRange, ItemKind, ItemSettings};
    use crate::schedule::{Easing, MovingShape};
    use crate::style::{ColorGenerator, ItemStyle};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn item(index: usize, side: u32, margin: f64) -> ItemSpec {
        ItemSpec {
            index,
            kind: ItemKind::ImageOnly { icon: None },
            width: side,
            height: side,
            margin,
            settings: ItemSettings {
                rotation: false,
                depth: false,
                scale: true,
                dismiss_on_click: true,
                dismiss_immediate: true,
                margin,
            },
            animation: AnimationRange {
                start_rotation: 0.0,
                end_rotation: 360.0,
                start_scale: 0.25,
                end_scale: 1.0,
            },
            anim_start_delay: Duration::ZERO,
            moving_shape: MovingShape::Line,
            easing: Easing::Linear,
            style: ItemStyle::default().resolve(&mut ColorGenerator::default(), 1.0),
            start: Point::default(),
            end: Point::default(),
        }
    }

    fn params(shape: ClusterShape, gravity: ClusterGravity) -> LayoutParams {
        LayoutParams {
            gravity,
            shape,
            offset: Offset::default(),
            board: Size::new(1080.0, 1920.0),
            anchor: Rect::new(500.0, 1800.0, 580.0, 1880.0),
            random_start_position: false,
            auto_scale_if_oversize: true,
            allow_outside_board: false,
        }
    }

    #[test]
    fn vertical_line_stacks_above_anchor() {
        let mut items: Vec<_> = (0..3).map(|i| item(i, 40, 4.0)).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let p = params(ClusterShape::VerticalLine, ClusterGravity::TopCenter);
        let bounds = DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();

        assert_eq!(bounds.height(), 3.0 * 40.0 + 2.0 * 4.0);
        assert_eq!(bounds.bottom, 1800.0);
        assert_eq!(bounds.center().x, 540.0);
        for pair in items.windows(2) {
            assert_eq!(pair[1].end.y - pair[0].end.y, 44.0);
            assert_eq!(pair[1].end.x, pair[0].end.x);
        }
        // no random start: every item leaves from the anchor center
        assert!(items.iter().all(|i| i.start_center() == Point::new(540.0, 1840.0)));
    }

    #[test]
    fn bottom_left_centered_line_stands_on_the_corner() {
        let mut items: Vec<_> = (0..3).map(|i| item(i, 40, 4.0)).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let p = params(
            ClusterShape::VerticalLine,
            ClusterGravity::AnchorBottomLeftCentered,
        );
        let bounds = DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();

        assert_eq!(bounds.height(), 128.0);
        assert_eq!(bounds.bottom, 1880.0);
        assert_eq!(bounds.center().x, 500.0);
        for pair in items.windows(2) {
            assert_eq!(pair[1].end.y - pair[0].end.y, 44.0);
            assert_eq!(pair[1].end.x, pair[0].end.x);
        }
        assert!(items.iter().all(|i| i.end_rect().bottom <= 1880.0));
    }

    #[test]
    fn empty_cluster_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = params(ClusterShape::Circle, ClusterGravity::Center);
        assert_eq!(
            DefaultPositionCalculator.layout(&mut [], &p, &mut rng),
            Err(BoomError::EmptyCluster)
        );
    }

    #[test]
    fn offset_moves_whole_cluster() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut plain = vec![item(0, 40, 4.0)];
        let mut shifted = plain.clone();
        let mut p = params(ClusterShape::VerticalLine, ClusterGravity::TopCenter);
        DefaultPositionCalculator.layout(&mut plain, &p, &mut rng).unwrap();
        p.offset = Offset::new(10.0, 0.0, 0.0, 30.0);
        DefaultPositionCalculator.layout(&mut shifted, &p, &mut rng).unwrap();
        assert_eq!(shifted[0].end.x - plain[0].end.x, 10.0);
        assert_eq!(shifted[0].end.y - plain[0].end.y, -30.0);
    }

    #[test]
    fn oversized_cluster_is_scaled_into_board() {
        let mut rng = StdRng::seed_from_u64(3);
        for shape in [
            ClusterShape::VerticalLine,
            ClusterShape::HorizontalLine,
            ClusterShape::Circle,
            ClusterShape::Arc,
            ClusterShape::Grid,
        ] {
            let mut items: Vec<_> = (0..30).map(|i| item(i, 60, 8.0)).collect();
            let mut p = params(shape, ClusterGravity::TopCenter);
            p.board = Size::new(320.0, 480.0);
            p.anchor = Rect::new(120.0, 400.0, 200.0, 480.0);
            let bounds = DefaultPositionCalculator
                .layout(&mut items, &p, &mut rng)
                .unwrap();
            // shrink factors are exact up to float rounding
            let board = Rect::new(-1e-6, -1e-6, 320.0 + 1e-6, 480.0 + 1e-6);
            assert!(board.contains_rect(&bounds), "{shape}: {bounds:?}");
            assert!(bounds.left <= bounds.right && bounds.top <= bounds.bottom);
            // sizes are never touched
            assert!(items.iter().all(|i| i.width == 60 && i.height == 60));
        }
    }

    #[test]
    fn allow_outside_board_skips_clamping() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut items: Vec<_> = (0..3).map(|i| item(i, 40, 4.0)).collect();
        let mut p = params(ClusterShape::VerticalLine, ClusterGravity::TopCenter);
        p.anchor = Rect::new(500.0, 20.0, 580.0, 100.0);
        p.auto_scale_if_oversize = false;
        p.allow_outside_board = true;
        let bounds = DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();
        assert_eq!(bounds.bottom, 20.0);
        assert!(bounds.top < 0.0);

        p.allow_outside_board = false;
        let bounds = DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();
        assert_eq!(bounds.top, 0.0);
    }

    #[test]
    fn zero_area_board_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut items: Vec<_> = (0..4).map(|i| item(i, 40, 4.0)).collect();
        let mut p = params(ClusterShape::Circle, ClusterGravity::Center);
        p.board = Size::default();
        p.anchor = Rect::default();
        let bounds = DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();
        assert!(bounds.left.is_finite() && bounds.top.is_finite());
        // everything collapsed onto one spot
        let first = items[0].end;
        assert!(items.iter().all(|i| i.end == first));
    }

    #[test]
    fn random_start_on_zero_area_anchor_uses_its_center() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut items: Vec<_> = (0..4).map(|i| item(i, 40, 4.0)).collect();
        let mut p = params(ClusterShape::Circle, ClusterGravity::Center);
        p.anchor = Rect::new(300.0, 400.0, 300.0, 400.0);
        p.random_start_position = true;
        DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();
        assert!(
            items
                .iter()
                .all(|i| i.start_center() == Point::new(300.0, 400.0))
        );

        p.anchor = Rect::default();
        p.board = Size::default();
        DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();
        assert!(items.iter().all(|i| i.start_center() == Point::default()));
    }

    #[test]
    fn random_start_stays_inside_anchor() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut items: Vec<_> = (0..8).map(|i| item(i, 40, 4.0)).collect();
        let mut p = params(ClusterShape::Circle, ClusterGravity::TopCenter);
        p.random_start_position = true;
        DefaultPositionCalculator
            .layout(&mut items, &p, &mut rng)
            .unwrap();

        for item in &items {
            let footprint = Size::new(40.0 * 0.25, 40.0 * 0.25);
            let start = Rect::from_center_size(item.start_center(), footprint);
            assert!(p.anchor.contains_rect(&start), "{start:?}");
        }
        let distinct = items
            .windows(2)
            .filter(|w| w[0].start != w[1].start)
            .count();
        assert!(distinct > 0);
    }

    #[test]
    fn clamp_shift_prefers_low_edge() {
        assert_eq!(clamp_shift(-5.0, 10.0, 100.0), 5.0);
        assert_eq!(clamp_shift(95.0, 110.0, 100.0), -10.0);
        assert_eq!(clamp_shift(10.0, 150.0, 100.0), -10.0);
        assert_eq!(clamp_shift(10.0, 20.0, 100.0), 0.0);
    }
}
