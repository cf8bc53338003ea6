use crate::error::{BoomError, Result};
use crate::geometry::{Point, Rect, Size};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Ring placement starts at 12 o'clock and runs clockwise.
pub const START_OFFSET: f64 = -PI / 2.0;

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
#[serde(rename_all = "kebab-case")]
pub enum ClusterShape {
    #[default]
    #[strum(to_string = "vertical-line", serialize = "vertical", serialize = "v")]
    VerticalLine,
    #[strum(to_string = "horizontal-line", serialize = "horizontal", serialize = "h")]
    HorizontalLine,
    #[strum(to_string = "circle", serialize = "ring")]
    Circle,
    #[strum(to_string = "arc", serialize = "fan")]
    Arc,
    #[strum(to_string = "grid")]
    Grid,
}

/// What a shape needs to know about one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub size: Size,
    pub margin: f64,
}

impl Footprint {
    pub fn new(size: Size, margin: f64) -> Self {
        Self { size, margin }
    }

    fn extent(&self) -> f64 {
        self.size.width.max(self.size.height)
    }
}

impl ClusterShape {
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| BoomError::InvalidShape(s.to_string()))
    }

    /// Item centers relative to the shape-local origin.
    ///
    /// `outward` is the unit direction pointing away from the anchor; only the
    /// arc uses it, to open toward free space.
    pub fn item_centers(&self, items: &[Footprint], outward: (f64, f64)) -> Vec<Point> {
        match self {
            Self::VerticalLine => line(items, |s| s.height, |c| Point::new(0.0, c)),
            Self::HorizontalLine => line(items, |s| s.width, |c| Point::new(c, 0.0)),
            Self::Circle => ring(items),
            Self::Arc => arc(items, outward),
            Self::Grid => grid(items),
        }
    }

    /// Bounding box of the items around their centers.
    pub fn local_bounds(items: &[Footprint], centers: &[Point]) -> Rect {
        items
            .iter()
            .zip(centers)
            .map(|(item, &c)| Rect::from_center_size(c, item.size))
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default()
    }
}

fn line(
    items: &[Footprint],
    along: impl Fn(Size) -> f64,
    place: impl Fn(f64) -> Point,
) -> Vec<Point> {
    let mut cursor = 0.0;
    items
        .iter()
        .map(|item| {
            let len = along(item.size);
            let center = place(cursor + len / 2.0);
            cursor += len + item.margin;
            center
        })
        .collect()
}

/// Widest item plus its margin, so neighbours never overlap.
fn spacing(items: &[Footprint]) -> f64 {
    items
        .iter()
        .map(|item| item.extent() + item.margin)
        .fold(0.0, f64::max)
}

fn ring(items: &[Footprint]) -> Vec<Point> {
    let n = items.len();
    if n <= 1 {
        return vec![Point::default(); n];
    }

    let step = 2.0 * PI / n as f64;
    // chord between neighbours: 2r * sin(step / 2)
    let radius = spacing(items) / (2.0 * (step / 2.0).sin());

    (0..n)
        .map(|i| {
            let angle = START_OFFSET + i as f64 * step;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn arc(items: &[Footprint], outward: (f64, f64)) -> Vec<Point> {
    let n = items.len();
    let (ox, oy) = outward;
    let facing = if ox == 0.0 && oy == 0.0 {
        START_OFFSET
    } else {
        oy.atan2(ox)
    };

    if n <= 1 {
        return vec![Point::default(); n];
    }

    let step = PI / (n - 1) as f64;
    let radius = spacing(items) / (2.0 * (step / 2.0).sin());
    let first = facing - PI / 2.0;

    (0..n)
        .map(|i| {
            let angle = first + i as f64 * step;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn grid(items: &[Footprint]) -> Vec<Point> {
    let n = items.len();
    let columns = (n as f64).sqrt().ceil().max(1.0) as usize;
    let cell_w = items
        .iter()
        .map(|i| i.size.width + i.margin)
        .fold(0.0, f64::max);
    let cell_h = items
        .iter()
        .map(|i| i.size.height + i.margin)
        .fold(0.0, f64::max);

    (0..n)
        .map(|i| {
            let (col, row) = (i % columns, i / columns);
            Point::new(
                col as f64 * cell_w + cell_w / 2.0,
                row as f64 * cell_h + cell_h / 2.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(n: usize, side: f64, margin: f64) -> Vec<Footprint> {
        vec![Footprint::new(Size::new(side, side), margin); n]
    }

    #[test]
    fn test_shape_parsing() {
        let cases = vec![
            ("vertical-line", ClusterShape::VerticalLine),
            ("V", ClusterShape::VerticalLine),
            ("Horizontal", ClusterShape::HorizontalLine),
            ("ring", ClusterShape::Circle),
            ("ARC", ClusterShape::Arc),
            ("grid", ClusterShape::Grid),
        ];
        for (s, expected) in cases {
            assert_eq!(ClusterShape::parse(s).unwrap(), expected);
        }
        assert_eq!(
            ClusterShape::parse("spiral"),
            Err(BoomError::InvalidShape("spiral".into()))
        );
    }

    #[test]
    fn vertical_line_spacing() {
        let items = squares(3, 40.0, 4.0);
        let centers = ClusterShape::VerticalLine.item_centers(&items, (0.0, -1.0));
        assert_eq!(centers[0], Point::new(0.0, 20.0));
        assert_eq!(centers[1], Point::new(0.0, 64.0));
        assert_eq!(centers[2], Point::new(0.0, 108.0));

        let bounds = ClusterShape::local_bounds(&items, &centers);
        assert_eq!(bounds.height(), 3.0 * 40.0 + 2.0 * 4.0);
        assert_eq!(bounds.width(), 40.0);
    }

    #[test]
    fn horizontal_line_mixed_sizes() {
        let items = vec![
            Footprint::new(Size::new(10.0, 10.0), 2.0),
            Footprint::new(Size::new(30.0, 10.0), 2.0),
        ];
        let centers = ClusterShape::HorizontalLine.item_centers(&items, (0.0, -1.0));
        assert_eq!(centers, vec![Point::new(5.0, 0.0), Point::new(27.0, 0.0)]);
    }

    #[test]
    fn ring_neighbours_do_not_overlap() {
        let items = squares(6, 40.0, 4.0);
        let centers = ClusterShape::Circle.item_centers(&items, (0.0, 0.0));
        // first item sits at 12 o'clock
        assert!(centers[0].x.abs() < 1e-9);
        assert!(centers[0].y < 0.0);
        for i in 0..centers.len() {
            let next = centers[(i + 1) % centers.len()];
            assert!(centers[i].distance(next) >= 44.0 - 1e-9);
        }
    }

    #[test]
    fn arc_opens_away_from_anchor() {
        let items = squares(5, 20.0, 0.0);
        let centers = ClusterShape::Arc.item_centers(&items, (0.0, -1.0));
        assert!(centers.iter().all(|c| c.y <= 1e-9));
        // middle item points straight up
        assert!(centers[2].x.abs() < 1e-9);

        let right = ClusterShape::Arc.item_centers(&items, (1.0, 0.0));
        assert!(right.iter().all(|c| c.x >= -1e-9));
    }

    #[test]
    fn single_item_sits_on_origin() {
        let items = squares(1, 20.0, 0.0);
        for shape in [ClusterShape::Circle, ClusterShape::Arc] {
            assert_eq!(shape.item_centers(&items, (0.0, -1.0)), vec![Point::default()]);
        }
    }

    #[test]
    fn grid_is_row_major() {
        let items = squares(5, 10.0, 0.0);
        let centers = ClusterShape::Grid.item_centers(&items, (0.0, -1.0));
        // 5 items -> 3 columns
        assert_eq!(centers[2], Point::new(25.0, 5.0));
        assert_eq!(centers[3], Point::new(5.0, 15.0));
    }
}
