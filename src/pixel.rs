use crate::error::{CollageError, CollageResult};
use crate::filter::FilterKind;

/// One RGBA pixel plus the tag of the filter that last produced its color.
///
/// Pixels are immutable by replacement: filters and compositing always build
/// a new `Pixel` rather than editing channels in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
    pub filter_tag: FilterKind,
}

impl Pixel {
    /// Builds a pixel from integer channels, failing when any channel falls
    /// outside `[0, 255]`. The filter tag defaults to [`FilterKind::Normal`].
    pub fn new(red: i32, green: i32, blue: i32, alpha: i32) -> CollageResult<Self> {
        Self::with_tag(red, green, blue, alpha, FilterKind::Normal)
    }

    /// Like [`Pixel::new`] but tags the pixel with the given filter kind.
    pub fn with_tag(
        red: i32,
        green: i32,
        blue: i32,
        alpha: i32,
        filter_tag: FilterKind,
    ) -> CollageResult<Self> {
        for (name, v) in [("red", red), ("green", green), ("blue", blue), ("alpha", alpha)] {
            if !(0..=255).contains(&v) {
                return Err(CollageError::validation(format!(
                    "{name} channel {v} is outside [0, 255]"
                )));
            }
        }
        Ok(Self {
            red: red as u8,
            green: green as u8,
            blue: blue as u8,
            alpha: alpha as u8,
            filter_tag,
        })
    }

    /// Builds a pixel from already-computed channels, clamping RGB to
    /// `[0, 255]`. Filters use this after brightness/blend arithmetic.
    pub fn clamped(red: i32, green: i32, blue: i32, alpha: u8, filter_tag: FilterKind) -> Self {
        Self {
            red: red.clamp(0, 255) as u8,
            green: green.clamp(0, 255) as u8,
            blue: blue.clamp(0, 255) as u8,
            alpha,
            filter_tag,
        }
    }

    pub(crate) fn from_channels(
        red: u8,
        green: u8,
        blue: u8,
        alpha: u8,
        filter_tag: FilterKind,
    ) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            filter_tag,
        }
    }

    /// Alpha 0 means the pixel never overwrites anything beneath it.
    pub fn is_transparent(self) -> bool {
        self.alpha == 0
    }
}
