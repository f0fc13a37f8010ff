//! The filter taxonomy: stateless per-pixel filters plus the
//! background-dependent blend filters.
//!
//! A [`Filter`] carries whatever data its kind needs (a channel, a light
//! formula, or a captured background image); [`FilterKind`] is the data-free
//! tag stored on every pixel a filter produces. Dispatch is always on the
//! tagged variant, never on a display name.

use crate::color::{hsl_to_rgb, rgb_to_hsl};
use crate::error::{CollageError, CollageResult};
use crate::image::Image;
use crate::pixel::Pixel;

/// The RGB channel a component filter keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// The photographic brightness formula used by brighten/darken filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Light {
    /// max(r, g, b)
    Value,
    /// (r + g + b) / 3
    Intensity,
    /// 0.2126 r + 0.7152 g + 0.0722 b
    Luma,
}

/// Identifies a filter kind without its data. Used as the per-pixel tag and
/// for equality checks during compositing and cascade invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterKind {
    Normal,
    Component(Channel),
    Brighten(Light),
    Darken(Light),
    Multiply,
    Screen,
    Difference,
}

impl FilterKind {
    /// Blend kinds depend on a background image and participate in cascade
    /// invalidation.
    pub fn is_blend(self) -> bool {
        matches!(self, Self::Multiply | Self::Screen | Self::Difference)
    }

    /// Resolves a filter option name. Unknown names are a recoverable
    /// failure; callers typically fall back to `Normal` and surface the
    /// message.
    pub fn from_name(name: &str) -> CollageResult<Self> {
        Ok(match name {
            "normal" => Self::Normal,
            "red-component" => Self::Component(Channel::Red),
            "green-component" => Self::Component(Channel::Green),
            "blue-component" => Self::Component(Channel::Blue),
            "brighten-value" => Self::Brighten(Light::Value),
            "brighten-intensity" => Self::Brighten(Light::Intensity),
            "brighten-luma" => Self::Brighten(Light::Luma),
            "darken-value" => Self::Darken(Light::Value),
            "darken-intensity" => Self::Darken(Light::Intensity),
            "darken-luma" => Self::Darken(Light::Luma),
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "difference" => Self::Difference,
            other => {
                return Err(CollageError::filter(format!(
                    "'{other}' is not a valid filter option"
                )));
            }
        })
    }

    /// The inverse of [`FilterKind::from_name`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Component(Channel::Red) => "red-component",
            Self::Component(Channel::Green) => "green-component",
            Self::Component(Channel::Blue) => "blue-component",
            Self::Brighten(Light::Value) => "brighten-value",
            Self::Brighten(Light::Intensity) => "brighten-intensity",
            Self::Brighten(Light::Luma) => "brighten-luma",
            Self::Darken(Light::Value) => "darken-value",
            Self::Darken(Light::Intensity) => "darken-intensity",
            Self::Darken(Light::Luma) => "darken-luma",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Difference => "difference",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter attached to a layer. Blend variants capture the cumulative
/// composite of everything beneath that layer at construction time; the
/// owning canvas rebuilds them whenever a lower layer changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Filter {
    Normal,
    Component(Channel),
    Brighten(Light),
    Darken(Light),
    Multiply { background: Image },
    Screen { background: Image },
    Difference { background: Image },
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Normal => FilterKind::Normal,
            Self::Component(c) => FilterKind::Component(*c),
            Self::Brighten(l) => FilterKind::Brighten(*l),
            Self::Darken(l) => FilterKind::Darken(*l),
            Self::Multiply { .. } => FilterKind::Multiply,
            Self::Screen { .. } => FilterKind::Screen,
            Self::Difference { .. } => FilterKind::Difference,
        }
    }

    /// Builds a blend filter of the given kind against a background image.
    /// Fails for non-blend kinds.
    pub fn blend(kind: FilterKind, background: Image) -> CollageResult<Self> {
        match kind {
            FilterKind::Multiply => Ok(Self::Multiply { background }),
            FilterKind::Screen => Ok(Self::Screen { background }),
            FilterKind::Difference => Ok(Self::Difference { background }),
            other => Err(CollageError::filter(format!(
                "'{other}' is not a blend filter"
            ))),
        }
    }

    /// Transforms the pixel at `(row, col)` of `image` in place and tags the
    /// result with this filter's kind.
    ///
    /// Value/intensity/luma/component filters never touch a transparent
    /// pixel. Blend filters run regardless of alpha but always preserve the
    /// foreground pixel's alpha, so transparency composites consistently.
    pub fn apply(&self, image: &mut Image, row: usize, col: usize) {
        let Some(px) = image.get(row, col) else {
            return;
        };

        let out = match self {
            Self::Normal => return,
            Self::Component(channel) => {
                if px.is_transparent() {
                    return;
                }
                let (r, g, b) = match channel {
                    Channel::Red => (px.red, 0, 0),
                    Channel::Green => (0, px.green, 0),
                    Channel::Blue => (0, 0, px.blue),
                };
                Pixel::from_channels(r, g, b, 255, self.kind())
            }
            Self::Brighten(light) => {
                if px.is_transparent() {
                    return;
                }
                shift_brightness(px, brightness_delta(px, *light), self.kind())
            }
            Self::Darken(light) => {
                if px.is_transparent() {
                    return;
                }
                shift_brightness(px, -brightness_delta(px, *light), self.kind())
            }
            Self::Multiply { background } => {
                let Some(out) = lightness_blend(px, background, row, col, self.kind(), |fg, bg| {
                    fg * bg
                }) else {
                    return;
                };
                out
            }
            Self::Screen { background } => {
                let Some(out) = lightness_blend(px, background, row, col, self.kind(), |fg, bg| {
                    1.0 - (1.0 - fg) * (1.0 - bg)
                }) else {
                    return;
                };
                out
            }
            Self::Difference { background } => {
                let Some(bg) = background.get(row, col) else {
                    return;
                };
                Pixel::clamped(
                    (i32::from(px.red) - i32::from(bg.red)).abs(),
                    (i32::from(px.green) - i32::from(bg.green)).abs(),
                    (i32::from(px.blue) - i32::from(bg.blue)).abs(),
                    px.alpha,
                    self.kind(),
                )
            }
        };

        image.set(row, col, out);
    }
}

/// Signed brightness delta for one pixel under the given light formula.
/// Integer arithmetic matches the classical definitions: intensity uses
/// integer division, luma truncates.
fn brightness_delta(px: Pixel, light: Light) -> i32 {
    let (r, g, b) = (i32::from(px.red), i32::from(px.green), i32::from(px.blue));
    match light {
        Light::Value => r.max(g).max(b),
        Light::Intensity => (r + g + b) / 3,
        Light::Luma => (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)) as i32,
    }
}

fn shift_brightness(px: Pixel, delta: i32, tag: FilterKind) -> Pixel {
    Pixel::clamped(
        i32::from(px.red) + delta,
        i32::from(px.green) + delta,
        i32::from(px.blue) + delta,
        px.alpha,
        tag,
    )
}

/// Multiply/screen share everything except the lightness combiner: both
/// pixels go to HSL, the new lightness comes from `combine(l_fg, l_bg)`, hue
/// and saturation stay with the foreground, and alpha is preserved.
fn lightness_blend(
    px: Pixel,
    background: &Image,
    row: usize,
    col: usize,
    tag: FilterKind,
    combine: impl FnOnce(f64, f64) -> f64,
) -> Option<Pixel> {
    let bg = background.get(row, col)?;
    let (_, _, l_bg) = rgb_to_hsl(
        f64::from(bg.red) / 255.0,
        f64::from(bg.green) / 255.0,
        f64::from(bg.blue) / 255.0,
    );
    let (h, s, l_fg) = rgb_to_hsl(
        f64::from(px.red) / 255.0,
        f64::from(px.green) / 255.0,
        f64::from(px.blue) / 255.0,
    );
    let (r, g, b) = hsl_to_rgb(h, s, combine(l_fg, l_bg));
    Some(Pixel::from_channels(r, g, b, px.alpha, tag))
}
