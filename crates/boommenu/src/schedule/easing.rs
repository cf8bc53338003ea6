//! Easing curves

use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// "Up, over the top, down": the default curve items fly in on.
pub const OVERSHOOT: Easing = Easing::CubicBezier(0.48, 1.47, 0.91, 1.06);

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, DeserializeFromStr)]
#[serde(into = "String")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseOutBack,
    /// CSS-style cubic Bézier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier(f64, f64, f64, f64),
}

impl Default for Easing {
    fn default() -> Self {
        OVERSHOOT
    }
}

impl Easing {
    /// Apply easing function to progress value (0-1). Overshooting curves may
    /// return values outside 0-1.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Easing::Linear => t,

            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }

            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t = 2.0 * t - 2.0;
                    0.5 * t * t * t + 1.0
                }
            }

            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -0.5 * ((PI * t).cos() - 1.0),

            Easing::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t = t - 1.0;
                1.0 + c3 * t * t * t + c1 * t * t
            }

            Easing::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

/// One coordinate of the curve at parameter `s`.
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Finds the curve parameter whose x equals `x`.
fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // newton stalled, fall back to bisection
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "ease-in-quad",
            Easing::EaseOutQuad => "ease-out-quad",
            Easing::EaseInOutQuad => "ease-in-out-quad",
            Easing::EaseInCubic => "ease-in-cubic",
            Easing::EaseOutCubic => "ease-out-cubic",
            Easing::EaseInOutCubic => "ease-in-out-cubic",
            Easing::EaseInSine => "ease-in-sine",
            Easing::EaseOutSine => "ease-out-sine",
            Easing::EaseInOutSine => "ease-in-out-sine",
            Easing::EaseOutBack => "ease-out-back",
            Easing::CubicBezier(x1, y1, x2, y2) => {
                return write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})");
            }
        };
        f.write_str(name)
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing: {0:?}")]
pub struct ParseEasingError(String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEasingError(s.to_string());
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");

        if let Some(args) = normalized
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let points = args
                .split(',')
                .map(|p| p.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| err())?;
            return match points[..] {
                [x1, y1, x2, y2] if (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2) => {
                    Ok(Easing::CubicBezier(x1, y1, x2, y2))
                }
                _ => Err(err()),
            };
        }

        Ok(match normalized.as_str() {
            "linear" => Easing::Linear,
            "ease-in-quad" => Easing::EaseInQuad,
            "ease-out-quad" => Easing::EaseOutQuad,
            "ease-in-out-quad" => Easing::EaseInOutQuad,
            "ease-in-cubic" => Easing::EaseInCubic,
            "ease-out-cubic" => Easing::EaseOutCubic,
            "ease-in-out-cubic" => Easing::EaseInOutCubic,
            "ease-in-sine" => Easing::EaseInSine,
            "ease-out-sine" => Easing::EaseOutSine,
            "ease-in-out-sine" => Easing::EaseInOutSine,
            "ease-out-back" => Easing::EaseOutBack,
            "overshoot" => OVERSHOOT,
            _ => return Err(err()),
        })
    }
}
