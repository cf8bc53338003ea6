use palette::{FromColor, Hsv, Srgb, Srgba};

/// Corner radius used when an item does not set one, in dp.
pub const DEFAULT_CORNER_RADIUS_DP: f64 = 16.0;

/// Hue step between consecutive generated colors; keeps neighbours apart.
const GOLDEN_ANGLE: f64 = 137.508;
const PRESSED_DARKEN: f64 = 0.8;
const UNABLE_ALPHA: f64 = 0.5;

/// Visual options an item builder may set. Unset colors come from the
/// cluster's [`ColorGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStyle {
    pub circle: bool,
    pub corner_radius: Option<f64>,
    pub ripple: bool,
    pub normal: Option<Srgba<f64>>,
    pub pressed: Option<Srgba<f64>>,
    pub unable: Option<Srgba<f64>>,
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            circle: false,
            corner_radius: None,
            ripple: true,
            normal: None,
            pressed: None,
            unable: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub circle: bool,
    /// In pixels.
    pub corner_radius: f64,
    pub ripple: bool,
    pub normal: Srgba<f64>,
    pub pressed: Srgba<f64>,
    pub unable: Srgba<f64>,
}

impl ItemStyle {
    pub fn resolve(&self, colors: &mut ColorGenerator, density: f64) -> ResolvedStyle {
        let normal = self.normal.unwrap_or_else(|| colors.next_normal_color());
        ResolvedStyle {
            circle: self.circle,
            corner_radius: self
                .corner_radius
                .unwrap_or(DEFAULT_CORNER_RADIUS_DP * density),
            ripple: self.ripple,
            normal,
            pressed: self
                .pressed
                .unwrap_or_else(|| ColorGenerator::pressed_color(normal)),
            unable: self
                .unable
                .unwrap_or_else(|| ColorGenerator::unable_color(normal)),
        }
    }
}

/// Hands out distinct background colors, one per item that asks.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGenerator {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl Default for ColorGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ColorGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            hue: (seed % 360) as f64,
            saturation: 0.55,
            value: 0.85,
        }
    }

    pub fn next_normal_color(&mut self) -> Srgba<f64> {
        let hsv = Hsv::<palette::encoding::Srgb, f64>::new(self.hue, self.saturation, self.value);
        let rgb = Srgb::<f64>::from_color(hsv);
        self.hue = (self.hue + GOLDEN_ANGLE) % 360.0;
        Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
    }

    pub fn pressed_color(normal: Srgba<f64>) -> Srgba<f64> {
        let (r, g, b, a) = normal.into_components();
        Srgba::new(
            r * PRESSED_DARKEN,
            g * PRESSED_DARKEN,
            b * PRESSED_DARKEN,
            a,
        )
    }

    /// Desaturated and half transparent.
    pub fn unable_color(normal: Srgba<f64>) -> Srgba<f64> {
        let (r, g, b, a) = normal.into_components();
        let gray = 0.299 * r + 0.587 * g + 0.114 * b;
        Srgba::new(
            (r + gray) / 2.0,
            (g + gray) / 2.0,
            (b + gray) / 2.0,
            a * UNABLE_ALPHA,
        )
    }
}
