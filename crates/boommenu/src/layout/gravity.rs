use crate::error::{BoomError, Result};
use crate::geometry::{Point, Rect};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Side of the anchor the cluster is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Alignment along the attached side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// Anchor corner pinned by the `Anchor*` gravities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn point(&self, anchor: &Rect) -> Point {
        match self {
            Self::TopLeft => Point::new(anchor.left, anchor.top),
            Self::TopRight => Point::new(anchor.right, anchor.top),
            Self::BottomLeft => Point::new(anchor.left, anchor.bottom),
            Self::BottomRight => Point::new(anchor.right, anchor.bottom),
        }
    }
}

/// Where the cluster sits relative to the anchor.
///
/// `Top*` variants put the whole cluster above the anchor (its bottom edge on
/// the anchor's top edge); `Start`/`Center`/`End` then align its left edge,
/// center or right edge with the anchor's. `Left*`/`Right*` work the same way
/// vertically. `Center` centers the cluster on the anchor.
///
/// `Anchor*` variants pin the cluster to one corner of the anchor and grow
/// over the board from there: a bottom corner holds the cluster's bottom edge,
/// a top corner its top edge. Horizontally the cluster's matching edge sits
/// on the corner, or its center does for the `*Centered` forms.
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
pub enum ClusterGravity {
    #[strum(to_string = "center", serialize = "c")]
    Center,
    #[strum(to_string = "anchor-top-left", serialize = "atl")]
    AnchorTopLeft,
    #[strum(to_string = "anchor-top-left-centered", serialize = "atlc")]
    AnchorTopLeftCentered,
    #[strum(to_string = "anchor-top-right", serialize = "atr")]
    AnchorTopRight,
    #[strum(to_string = "anchor-top-right-centered", serialize = "atrc")]
    AnchorTopRightCentered,
    #[strum(to_string = "anchor-bottom-left", serialize = "abl")]
    AnchorBottomLeft,
    #[default]
    #[strum(to_string = "anchor-bottom-left-centered", serialize = "ablc")]
    AnchorBottomLeftCentered,
    #[strum(to_string = "anchor-bottom-right", serialize = "abr")]
    AnchorBottomRight,
    #[strum(to_string = "anchor-bottom-right-centered", serialize = "abrc")]
    AnchorBottomRightCentered,
    #[strum(to_string = "top-start", serialize = "ts")]
    TopStart,
    #[strum(to_string = "top-center", serialize = "top", serialize = "t")]
    TopCenter,
    #[strum(to_string = "top-end", serialize = "te")]
    TopEnd,
    #[strum(to_string = "bottom-start", serialize = "bs")]
    BottomStart,
    #[strum(to_string = "bottom-center", serialize = "bottom", serialize = "b")]
    BottomCenter,
    #[strum(to_string = "bottom-end", serialize = "be")]
    BottomEnd,
    #[strum(to_string = "left-start", serialize = "ls")]
    LeftStart,
    #[strum(to_string = "left-center", serialize = "left", serialize = "l")]
    LeftCenter,
    #[strum(to_string = "left-end", serialize = "le")]
    LeftEnd,
    #[strum(to_string = "right-start", serialize = "rs")]
    RightStart,
    #[strum(to_string = "right-center", serialize = "right", serialize = "r")]
    RightCenter,
    #[strum(to_string = "right-end", serialize = "re")]
    RightEnd,
}

/// Result of attaching a shape to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub dx: f64,
    pub dy: f64,
    /// The point where the cluster touches the anchor, in board coordinates.
    /// Overflow scaling happens about this point.
    pub pivot: Point,
}

impl ClusterGravity {
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| BoomError::InvalidGravity(s.to_string()))
    }

    /// `None` for the corner family.
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Center => Some(Side::Center),
            Self::TopStart | Self::TopCenter | Self::TopEnd => Some(Side::Top),
            Self::BottomStart | Self::BottomCenter | Self::BottomEnd => Some(Side::Bottom),
            Self::LeftStart | Self::LeftCenter | Self::LeftEnd => Some(Side::Left),
            Self::RightStart | Self::RightCenter | Self::RightEnd => Some(Side::Right),
            _ => None,
        }
    }

    pub fn corner(&self) -> Option<Corner> {
        match self {
            Self::AnchorTopLeft | Self::AnchorTopLeftCentered => Some(Corner::TopLeft),
            Self::AnchorTopRight | Self::AnchorTopRightCentered => Some(Corner::TopRight),
            Self::AnchorBottomLeft | Self::AnchorBottomLeftCentered => Some(Corner::BottomLeft),
            Self::AnchorBottomRight | Self::AnchorBottomRightCentered => {
                Some(Corner::BottomRight)
            }
            _ => None,
        }
    }

    /// Whether a corner gravity centers the cluster on the corner's x.
    pub fn is_centered(&self) -> bool {
        matches!(
            self,
            Self::AnchorTopLeftCentered
                | Self::AnchorTopRightCentered
                | Self::AnchorBottomLeftCentered
                | Self::AnchorBottomRightCentered
        )
    }

    pub fn align(&self) -> Align {
        match self {
            Self::TopStart | Self::BottomStart | Self::LeftStart | Self::RightStart => Align::Start,
            Self::TopEnd | Self::BottomEnd | Self::LeftEnd | Self::RightEnd => Align::End,
            _ => Align::Center,
        }
    }

    /// Unit direction pointing away from the anchor.
    ///
    /// Corner gravities point the way the cluster grows from the corner;
    /// the result is not normalized.
    pub fn outward(&self) -> (f64, f64) {
        if let Some(corner) = self.corner() {
            let y = match corner {
                Corner::TopLeft | Corner::TopRight => 1.0,
                Corner::BottomLeft | Corner::BottomRight => -1.0,
            };
            let x = match (corner, self.is_centered()) {
                (_, true) => 0.0,
                (Corner::TopLeft | Corner::BottomLeft, false) => 1.0,
                (Corner::TopRight | Corner::BottomRight, false) => -1.0,
            };
            return (x, y);
        }

        match self.side() {
            Some(Side::Top) => (0.0, -1.0),
            Some(Side::Bottom) => (0.0, 1.0),
            Some(Side::Left) => (-1.0, 0.0),
            Some(Side::Right) => (1.0, 0.0),
            Some(Side::Center) | None => (0.0, 0.0),
        }
    }

    /// Translation taking `local` (shape-local bounds) next to `anchor`.
    pub fn place(&self, local: &Rect, anchor: &Rect) -> Placement {
        if let Some(corner) = self.corner() {
            let pivot = corner.point(anchor);
            let dx = match (corner, self.is_centered()) {
                (_, true) => pivot.x - local.center().x,
                (Corner::TopLeft | Corner::BottomLeft, false) => pivot.x - local.left,
                (Corner::TopRight | Corner::BottomRight, false) => pivot.x - local.right,
            };
            let dy = match corner {
                Corner::TopLeft | Corner::TopRight => pivot.y - local.top,
                Corner::BottomLeft | Corner::BottomRight => pivot.y - local.bottom,
            };
            return Placement { dx, dy, pivot };
        }

        let align = self.align();
        // (shift, pivot coordinate) along the attached side
        let along_x = || match align {
            Align::Start => (anchor.left - local.left, anchor.left),
            Align::Center => (anchor.center().x - local.center().x, anchor.center().x),
            Align::End => (anchor.right - local.right, anchor.right),
        };
        let along_y = || match align {
            Align::Start => (anchor.top - local.top, anchor.top),
            Align::Center => (anchor.center().y - local.center().y, anchor.center().y),
            Align::End => (anchor.bottom - local.bottom, anchor.bottom),
        };

        let (dx, dy, pivot) = match self.side().unwrap_or(Side::Center) {
            Side::Center => {
                let c = anchor.center();
                (c.x - local.center().x, c.y - local.center().y, c)
            }
            Side::Top => {
                let (dx, px) = along_x();
                (dx, anchor.top - local.bottom, Point::new(px, anchor.top))
            }
            Side::Bottom => {
                let (dx, px) = along_x();
                (dx, anchor.bottom - local.top, Point::new(px, anchor.bottom))
            }
            Side::Left => {
                let (dy, py) = along_y();
                (anchor.left - local.right, dy, Point::new(anchor.left, py))
            }
            Side::Right => {
                let (dy, py) = along_y();
                (anchor.right - local.left, dy, Point::new(anchor.right, py))
            }
        };

        Placement { dx, dy, pivot }
    }
}
