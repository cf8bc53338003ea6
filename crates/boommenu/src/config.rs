use crate::cluster::{ClusterConfig, ClusterManager};
use crate::geometry::{Rect, Size};
use crate::item::{
    IconName, ItemBuilder, ItemKind, ItemLabel, ItemOverrides, MeasuredViews, SizingRules,
    TextStyle,
};
use crate::schedule::{Easing, MovingShape};
use crate::style::ItemStyle;
use directories::ProjectDirs;
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

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
pub enum ItemKindConfig {
    #[strum(to_string = "text", serialize = "text-inside-circle")]
    Text,
    #[default]
    #[strum(to_string = "text-only", serialize = "label")]
    TextOnly,
    #[strum(to_string = "image-only", serialize = "image", serialize = "icon")]
    ImageOnly,
}

/// One `[[items]]` table.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ItemConfig {
    pub kind: ItemKindConfig,
    pub text_style: TextStyle,
    pub label: Option<ItemLabel>,
    pub icon: Option<IconName>,
    /// Size the preview host reports for the item's view.
    pub natural: Option<Size>,
    pub sizing: SizingRules,
    pub settings: ItemOverrides,
    pub circle: bool,
    pub corner_radius: Option<f64>,
    pub ripple: bool,
    /// `#rrggbb`
    pub normal_color: Option<String>,
    pub pressed_color: Option<String>,
    pub unable_color: Option<String>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "anim_start_delay_ms")]
    pub anim_start_delay: Duration,
    pub start_rotation: f64,
    pub end_rotation: f64,
    pub end_scale: f64,
    pub moving_shape: MovingShape,
    pub easing: Easing,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            kind: ItemKindConfig::default(),
            text_style: TextStyle::default(),
            label: None,
            icon: None,
            natural: None,
            sizing: SizingRules::default(),
            settings: ItemOverrides::default(),
            circle: false,
            corner_radius: None,
            ripple: true,
            normal_color: None,
            pressed_color: None,
            unable_color: None,
            anim_start_delay: Duration::ZERO,
            start_rotation: 0.0,
            end_rotation: 360.0,
            end_scale: 1.0,
            moving_shape: MovingShape::default(),
            easing: Easing::default(),
        }
    }
}

impl ItemConfig {
    pub fn to_builder(&self) -> Result<ItemBuilder, ConfigError> {
        let kind = match self.kind {
            ItemKindConfig::Text => ItemKind::Text {
                style: self.text_style,
                icon: self.icon.clone(),
                label: self.label.clone(),
            },
            ItemKindConfig::TextOnly => ItemKind::TextOnly {
                label: self.label.clone(),
            },
            ItemKindConfig::ImageOnly => ItemKind::ImageOnly {
                icon: self.icon.clone(),
            },
        };

        let style = ItemStyle {
            circle: self.circle,
            corner_radius: self.corner_radius,
            ripple: self.ripple,
            normal: self.normal_color.as_deref().map(parse_color).transpose()?,
            pressed: self.pressed_color.as_deref().map(parse_color).transpose()?,
            unable: self.unable_color.as_deref().map(parse_color).transpose()?,
        };

        let mut builder = ItemBuilder::new(kind)
            .with_style(style)
            .with_overrides(self.settings)
            .with_anim_start_delay(self.anim_start_delay)
            .with_rotation_degrees(self.start_rotation, self.end_rotation)
            .with_moving_shape(self.moving_shape)
            .with_easing(self.easing);
        builder.sizing = self.sizing.clone();
        builder.end_scale = self.end_scale;
        Ok(builder)
    }
}

pub fn parse_color(hex: &str) -> Result<Srgba<f64>, ConfigError> {
    let rgb: Srgb<u8> = hex
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidColor(hex.to_string()))?;
    let rgb = rgb.into_format::<f64>();
    Ok(Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0))
}

/// Simulated host surface for previews.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub anchor: Rect,
    pub board: Size,
    /// Natural view size of items that do not set their own.
    pub natural: Size,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            anchor: Rect::new(500.0, 1800.0, 580.0, 1880.0),
            board: Size::new(1080.0, 1920.0),
            natural: Size::new(48.0, 48.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MenuConfig {
    pub cluster: ClusterConfig,
    pub preview: PreviewConfig,
    pub items: Vec<ItemConfig>,
}

impl MenuConfig {
    pub fn manager(&self) -> Result<ClusterManager, ConfigError> {
        let builders = self
            .items
            .iter()
            .map(ItemConfig::to_builder)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ClusterManager::new(self.cluster.clone()).with_items(builders))
    }

    /// Views for a headless build, sized from each item's natural size.
    pub fn views(&self) -> MeasuredViews {
        MeasuredViews::new(
            self.items
                .iter()
                .map(|item| item.natural.unwrap_or(self.preview.natural))
                .collect(),
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "boommenu", "boommenu").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<MenuConfig, ConfigError> {
    load_from(get_config_path()?, false)
}

/// Loads `path`, which must exist, layered under `BOOM_` variables.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<MenuConfig, ConfigError> {
    load_from(path.as_ref().to_path_buf(), true)
}

fn load_from(path: PathBuf, required: bool) -> Result<MenuConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

/// `BOOM_` variables, with `__` between table and key.
fn environment() -> config::Environment {
    config::Environment::with_prefix("BOOM")
        .prefix_separator("_")
        .separator("__")
}

pub fn default_config() -> Result<MenuConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// The user's config, or the bundled one when there is none or it is broken.
pub fn load_or_default() -> Result<MenuConfig, ConfigError> {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return default_config();
    }

    match load_config() {
        Ok(c) => Ok(c),
        Err(e) => {
            log::warn!("Falling back to the bundled config: {e}");
            default_config()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterState;
    use crate::layout::{ClusterGravity, ClusterShape};
    use crate::schedule::EmissionOrder;

    #[test]
    fn test_bundled_config() {
        let config = default_config().unwrap();
        assert_eq!(config.cluster.shape, ClusterShape::Arc);
        assert_eq!(
            config.cluster.gravity,
            ClusterGravity::AnchorBottomLeftCentered
        );
        assert_eq!(config.cluster.emission_order, EmissionOrder::Randomized);
        assert_eq!(config.items.len(), 5);
        assert_eq!(config.items[0].kind, ItemKindConfig::Text);
        assert_eq!(config.items[1].natural, Some(Size::new(64.0, 48.0)));

        let mut manager = config.manager().unwrap();
        let mut views = config.views();
        manager
            .build(config.preview.anchor, config.preview.board, &mut views)
            .unwrap();
        assert_eq!(manager.state(), ClusterState::Scheduled);
        assert_eq!(manager.items().len(), 5);
    }

    #[test]
    fn environment_overrides_the_file() {
        let vars = config::Map::from_iter([
            ("BOOM_CLUSTER__SHAPE".to_string(), "circle".to_string()),
            ("BOOM_CLUSTER__GRAVITY".to_string(), "anchor-top-right".to_string()),
            ("BOOM_PREVIEW__BOARD__WIDTH".to_string(), "720".to_string()),
            ("OTHER_CLUSTER__EMISSION_ORDER".to_string(), "reversed".to_string()),
        ]);
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap();
        let config: MenuConfig = s.try_deserialize().unwrap();

        assert_eq!(config.cluster.shape, ClusterShape::Circle);
        assert_eq!(config.cluster.gravity, ClusterGravity::AnchorTopRight);
        assert_eq!(config.preview.board.width, 720.0);
        assert_eq!(config.cluster.emission_order, EmissionOrder::Randomized);
        assert_eq!(config.items.len(), 5);
    }

    #[test]
    fn test_item_kind_deserialization() {
        let cases = vec![
            ("\"text\"", ItemKindConfig::Text),
            ("\"Text-Only\"", ItemKindConfig::TextOnly),
            ("\"label\"", ItemKindConfig::TextOnly),
            ("\"icon\"", ItemKindConfig::ImageOnly),
            ("\"IMAGE-ONLY\"", ItemKindConfig::ImageOnly),
        ];

        for (json, expected) in cases {
            let deserialized: ItemKindConfig = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn item_config_to_builder() {
        let json = r##"{
            "kind": "image-only",
            "icon": "share",
            "circle": true,
            "normal_color": "#ff0000",
            "settings": { "rotation": true },
            "sizing": { "width": 40, "height": 40 },
            "anim_start_delay_ms": 30,
            "easing": "ease-out-back"
        }"##;
        let item: ItemConfig = serde_json::from_str(json).unwrap();
        let builder = item.to_builder().unwrap();

        assert_eq!(builder.kind.icon().map(|i| i.as_str()), Some("share"));
        assert!(builder.style.circle);
        assert_eq!(builder.style.normal, Some(Srgba::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(builder.overrides.rotation, Some(true));
        assert_eq!(builder.overrides.scale, None);
        assert_eq!((builder.sizing.width, builder.sizing.height), (40, 40));
        assert_eq!(builder.anim_start_delay, Duration::from_millis(30));
        assert_eq!(builder.easing, Easing::EaseOutBack);
        assert_eq!(builder.end_rotation, 360.0);
    }

    #[test]
    fn bad_color_is_rejected() {
        let item = ItemConfig {
            pressed_color: Some("purple-ish".into()),
            ..Default::default()
        };
        assert!(matches!(
            item.to_builder(),
            Err(ConfigError::InvalidColor(c)) if c == "purple-ish"
        ));
    }
}
