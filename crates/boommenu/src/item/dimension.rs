use crate::error::{BoomError, Result};
use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// How an item asks to be sized. Non-positive values mean "unset".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingRules {
    pub width: i32,
    pub height: i32,
    /// Fraction of the board width.
    pub width_percent: f64,
    /// Fraction of the board height.
    pub height_percent: f64,
    pub ratio_base_on_width: bool,
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Scale the item starts its entrance from; derived from the anchor when
    /// unset or too large.
    pub start_scale: Option<f64>,
}

impl Default for SizingRules {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            width_percent: 0.0,
            height_percent: 0.0,
            ratio_base_on_width: true,
            width_ratio: 0.0,
            height_ratio: 0.0,
            scale_x: 0.0,
            scale_y: 0.0,
            start_scale: None,
        }
    }
}

/// Anchor and board sizes captured for one build pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub anchor: Size,
    pub board: Size,
}

impl Metrics {
    /// Both sizes are clamped to zero and floored to whole pixels.
    pub fn new(anchor: Size, board: Size) -> Self {
        let whole = |s: Size| {
            let s = s.clamped();
            Size::new(s.width.floor(), s.height.floor())
        };
        Self {
            anchor: whole(anchor),
            board: whole(board),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub width: u32,
    pub height: u32,
    pub start_scale: f64,
}

impl Resolved {
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

impl SizingRules {
    /// Forces a 1:1 aspect ratio.
    pub fn square(mut self) -> Self {
        self.width_ratio = 1.0;
        self.height_ratio = 1.0;
        self
    }

    /// Resolves the pixel size of item `index`. Each step only overrides the
    /// previous one when its own input is set.
    pub fn resolve(&self, index: usize, metrics: &Metrics, measured: Size) -> Result<Resolved> {
        let (mut width, mut height) = if self.width > 0 && self.height > 0 {
            (self.width as i64, self.height as i64)
        } else {
            (measured.width as i64, measured.height as i64)
        };

        if self.width_percent > 0.0 {
            width = (self.width_percent * metrics.board.width) as i64;
        }
        if self.height_percent > 0.0 {
            height = (self.height_percent * metrics.board.height) as i64;
        }

        if self.width_ratio > 0.0 && self.height_ratio > 0.0 {
            if self.ratio_base_on_width {
                height = (self.height_ratio * width as f64 / self.width_ratio) as i64;
            } else {
                width = (self.width_ratio * height as f64 / self.height_ratio) as i64;
            }
        }

        if self.scale_x > 0.0 {
            width = (width as f64 * self.scale_x) as i64;
        }
        if self.scale_y > 0.0 {
            height = (height as f64 * self.scale_y) as i64;
        }

        if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
            return Err(BoomError::InvalidDimension {
                index,
                width,
                height,
            });
        }

        let (width, height) = (width as u32, height as u32);
        Ok(Resolved {
            width,
            height,
            start_scale: start_scale_factor(self.start_scale, width, height, metrics.anchor),
        })
    }
}

/// Items start their entrance no larger than an eighth of the anchor.
pub fn start_scale_factor(requested: Option<f64>, width: u32, height: u32, anchor: Size) -> f64 {
    let target_w = ((anchor.width.max(0.0) as i64) >> 3) as f64;
    let target_h = ((anchor.height.max(0.0) as i64) >> 3) as f64;
    let (w, h) = (width.max(1) as f64, height.max(1) as f64);

    match requested {
        Some(s) if s >= 0.0 && s * w <= target_w && s * h <= target_h => s,
        _ => (target_w / w).min(target_h / h),
    }
}
