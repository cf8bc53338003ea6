//! Item builders and the records they produce.

pub mod dimension;
pub mod spec;
pub mod view;

pub use dimension::{Metrics, Resolved, SizingRules, start_scale_factor};
pub use spec::{AnimationRange, ItemDefaults, ItemOverrides, ItemSettings, ItemSpec};
pub use view::{ItemView, MeasuredView, MeasuredViews, ViewProvider};

use crate::error::{BoomError, Result};
use crate::geometry::Point;
use crate::schedule::{Easing, MovingShape};
use crate::style::{ColorGenerator, ItemStyle};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(ItemLabel, IconName);

/// Where the label of a text item sits relative to its icon.
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
pub enum TextStyle {
    #[strum(to_string = "inside", serialize = "inside-icon")]
    InsideIcon,
    #[strum(to_string = "left", serialize = "left-of-icon")]
    LeftOfIcon,
    #[default]
    #[strum(to_string = "right", serialize = "right-of-icon")]
    RightOfIcon,
    #[strum(to_string = "top", serialize = "above-icon")]
    AboveIcon,
    #[strum(to_string = "bottom", serialize = "below-icon")]
    BelowIcon,
}

impl TextStyle {
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| BoomError::InvalidTextStyle(s.to_string()))
    }
}

/// The content of an item. The core never looks inside; it is handed to the
/// host's [`ViewProvider`] to inflate a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Text {
        style: TextStyle,
        icon: Option<IconName>,
        label: Option<ItemLabel>,
    },
    TextOnly {
        label: Option<ItemLabel>,
    },
    ImageOnly {
        icon: Option<IconName>,
    },
}

impl ItemKind {
    pub fn label(&self) -> Option<&ItemLabel> {
        match self {
            Self::Text { label, .. } | Self::TextOnly { label } => label.as_ref(),
            Self::ImageOnly { .. } => None,
        }
    }

    pub fn icon(&self) -> Option<&IconName> {
        match self {
            Self::Text { icon, .. } | Self::ImageOnly { icon } => icon.as_ref(),
            Self::TextOnly { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemBuilder {
    pub kind: ItemKind,
    pub sizing: SizingRules,
    pub style: ItemStyle,
    pub overrides: ItemOverrides,
    pub anim_start_delay: Duration,
    pub start_rotation: f64,
    pub end_rotation: f64,
    pub end_scale: f64,
    pub moving_shape: MovingShape,
    pub easing: Easing,
}

/// Everything a builder needs from the cluster for one pass.
pub struct BuildContext<'a> {
    pub metrics: Metrics,
    pub defaults: &'a ItemDefaults,
    pub density: f64,
    pub colors: &'a mut ColorGenerator,
    pub views: &'a mut dyn ViewProvider,
}

impl ItemBuilder {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            sizing: SizingRules::default(),
            style: ItemStyle::default(),
            overrides: ItemOverrides::default(),
            anim_start_delay: Duration::ZERO,
            start_rotation: 0.0,
            end_rotation: 360.0,
            end_scale: 1.0,
            moving_shape: MovingShape::default(),
            easing: Easing::default(),
        }
    }

    pub fn text(style: TextStyle, icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(ItemKind::Text {
            style,
            icon: Some(IconName::new(icon)),
            label: Some(ItemLabel::new(label)),
        })
    }

    pub fn text_only(label: impl Into<String>) -> Self {
        Self::new(ItemKind::TextOnly {
            label: Some(ItemLabel::new(label)),
        })
    }

    pub fn image_only(icon: impl Into<String>) -> Self {
        Self::new(ItemKind::ImageOnly {
            icon: Some(IconName::new(icon)),
        })
    }

    pub fn with_dimension(mut self, width: i32, height: i32) -> Self {
        self.sizing.width = width;
        self.sizing.height = height;
        self
    }

    pub fn with_percent(mut self, width_percent: f64, height_percent: f64) -> Self {
        self.sizing.width_percent = width_percent;
        self.sizing.height_percent = height_percent;
        self
    }

    pub fn with_dimension_ratio(
        mut self,
        base_on_width: bool,
        width_ratio: f64,
        height_ratio: f64,
    ) -> Self {
        self.sizing.ratio_base_on_width = base_on_width;
        self.sizing.width_ratio = width_ratio;
        self.sizing.height_ratio = height_ratio;
        self
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.sizing.scale_x = scale_x;
        self.sizing.scale_y = scale_y;
        self
    }

    pub fn with_circle_shape(mut self, circle: bool) -> Self {
        self.style.circle = circle;
        self
    }

    pub fn with_style(mut self, style: ItemStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_overrides(mut self, overrides: ItemOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_margin(mut self, dp: f64) -> Self {
        self.overrides.margin = Some(dp);
        self
    }

    pub fn with_anim_start_delay(mut self, delay: Duration) -> Self {
        self.anim_start_delay = delay;
        self
    }

    pub fn with_rotation_degrees(mut self, start: f64, end: f64) -> Self {
        self.start_rotation = start;
        self.end_rotation = end;
        self
    }

    pub fn with_scale_factor(mut self, start: Option<f64>, end: f64) -> Self {
        self.sizing.start_scale = start;
        self.end_scale = end;
        self
    }

    pub fn with_moving_shape(mut self, shape: MovingShape) -> Self {
        self.moving_shape = shape;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sizing with the circle constraint applied.
    pub fn effective_sizing(&self) -> SizingRules {
        if self.style.circle {
            self.sizing.clone().square()
        } else {
            self.sizing.clone()
        }
    }

    /// Builds item `index`: inflates its view, resolves its style and size and
    /// merges unset overrides with the cluster defaults.
    pub fn build(
        &self,
        index: usize,
        ctx: &mut BuildContext<'_>,
    ) -> Result<(ItemSpec, Box<dyn ItemView>)> {
        let style = self.style.resolve(ctx.colors, ctx.density);
        let mut view = ctx
            .views
            .inflate(index, &self.kind, &style)
            .ok_or(BoomError::MissingView { index })?;

        let resolved = self
            .effective_sizing()
            .resolve(index, &ctx.metrics, view.measure())?;
        let settings = self.overrides.resolve(ctx.defaults, ctx.density);

        view.update_dimension(resolved.width, resolved.height);

        let spec = ItemSpec {
            index,
            kind: self.kind.clone(),
            width: resolved.width,
            height: resolved.height,
            margin: settings.margin,
            settings,
            animation: AnimationRange {
                start_rotation: self.start_rotation,
                end_rotation: self.end_rotation,
                start_scale: resolved.start_scale,
                end_scale: self.end_scale,
            },
            anim_start_delay: self.anim_start_delay,
            moving_shape: self.moving_shape,
            easing: self.easing,
            style,
            start: Point::default(),
            end: Point::default(),
        };

        Ok((spec, view))
    }
}
