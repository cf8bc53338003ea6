use super::ItemKind;
use crate::geometry::{Point, Rect, Size};
use crate::schedule::{Easing, MovingShape};
use crate::style::ResolvedStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cluster-wide values for every per-item setting an item leaves unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
    /// Rotate while animating.
    pub rotation: bool,
    /// Tilt in depth while animating.
    #[serde(rename = "3d")]
    pub depth: bool,
    /// Scale while animating.
    pub scale: bool,
    /// Dismiss the menu when the item is clicked.
    pub dismiss_on_click: bool,
    /// Dismiss at once instead of playing the reverse animation.
    pub dismiss_immediate: bool,
    /// In dp.
    pub margin: f64,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            rotation: false,
            depth: false,
            scale: true,
            dismiss_on_click: true,
            dismiss_immediate: true,
            margin: 4.0,
        }
    }
}

/// Per-item settings; `None` falls back to [`ItemDefaults`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemOverrides {
    pub rotation: Option<bool>,
    #[serde(rename = "3d")]
    pub depth: Option<bool>,
    pub scale: Option<bool>,
    pub dismiss_on_click: Option<bool>,
    pub dismiss_immediate: Option<bool>,
    pub margin: Option<f64>,
}

/// Settings after the default merge. Margin is in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemSettings {
    pub rotation: bool,
    pub depth: bool,
    pub scale: bool,
    pub dismiss_on_click: bool,
    pub dismiss_immediate: bool,
    pub margin: f64,
}

impl ItemOverrides {
    pub fn resolve(&self, defaults: &ItemDefaults, density: f64) -> ItemSettings {
        ItemSettings {
            rotation: self.rotation.unwrap_or(defaults.rotation),
            depth: self.depth.unwrap_or(defaults.depth),
            scale: self.scale.unwrap_or(defaults.scale),
            dismiss_on_click: self.dismiss_on_click.unwrap_or(defaults.dismiss_on_click),
            dismiss_immediate: self.dismiss_immediate.unwrap_or(defaults.dismiss_immediate),
            margin: dp_to_px(self.margin.unwrap_or(defaults.margin), density),
        }
    }
}

pub fn dp_to_px(dp: f64, density: f64) -> f64 {
    (dp * density).round()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationRange {
    pub start_rotation: f64,
    pub end_rotation: f64,
    pub start_scale: f64,
    pub end_scale: f64,
}

/// One resolved item. Positions are the item's top-left corner in board
/// coordinates; rotation and scale pivot about its center.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub index: usize,
    pub kind: ItemKind,
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    pub settings: ItemSettings,
    pub animation: AnimationRange,
    pub anim_start_delay: Duration,
    pub moving_shape: MovingShape,
    pub easing: Easing,
    pub style: ResolvedStyle,
    pub start: Point,
    pub end: Point,
}

impl ItemSpec {
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn end_rect(&self) -> Rect {
        Rect::from_origin_size(self.end, self.size())
    }

    pub fn end_center(&self) -> Point {
        self.end_rect().center()
    }

    pub fn start_center(&self) -> Point {
        Rect::from_origin_size(self.start, self.size()).center()
    }

    /// Moves the end position so the item is centered on `center`.
    pub fn set_end_center(&mut self, center: Point) {
        self.end = Point::new(
            center.x - self.width as f64 / 2.0,
            center.y - self.height as f64 / 2.0,
        );
    }

    pub fn set_start_center(&mut self, center: Point) {
        self.start = Point::new(
            center.x - self.width as f64 / 2.0,
            center.y - self.height as f64 / 2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_overrides_fall_back() {
        let defaults = ItemDefaults {
            rotation: true,
            margin: 6.0,
            ..Default::default()
        };
        let overrides = ItemOverrides {
            scale: Some(false),
            dismiss_immediate: Some(false),
            ..Default::default()
        };
        let settings = overrides.resolve(&defaults, 1.5);
        assert!(settings.rotation);
        assert!(!settings.scale);
        assert!(!settings.dismiss_immediate);
        assert!(settings.dismiss_on_click);
        assert_eq!(settings.margin, 9.0);
    }

    #[test]
    fn test_defaults_deserialization() {
        let json = r#"{ "3d": true, "margin": 8 }"#;
        let defaults: ItemDefaults = serde_json::from_str(json).unwrap();
        assert!(defaults.depth);
        assert!(defaults.scale);
        assert_eq!(defaults.margin, 8.0);
    }
}
