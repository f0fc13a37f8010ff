use crate::error::{CollageError, CollageResult};
use crate::filter::FilterKind;
use crate::pixel::Pixel;

/// A fixed-size row-major grid of [`Pixel`]s with a nominal maximum channel
/// value and an optional source identifier.
///
/// `max_value` is the scale the channels were decoded at; callers bring an
/// image to the 0-255 scale with [`Image::normalize_to_full_range`] before
/// placing it on a layer. The grid never changes size after construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Image {
    height: usize,
    width: usize,
    max_value: u8,
    pixels: Vec<Pixel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_id: Option<String>,
}

impl Image {
    /// Builds an image from a row-major pixel buffer.
    pub fn new(
        height: usize,
        width: usize,
        max_value: u8,
        pixels: Vec<Pixel>,
    ) -> CollageResult<Self> {
        if height == 0 || width == 0 {
            return Err(CollageError::validation(
                "image height and width must be >= 1",
            ));
        }
        if max_value == 0 {
            return Err(CollageError::validation("image max_value must be in [1, 255]"));
        }
        if pixels.len() != height * width {
            return Err(CollageError::validation(format!(
                "pixel buffer length {} does not match {height}x{width}",
                pixels.len()
            )));
        }
        Ok(Self {
            height,
            width,
            max_value,
            pixels,
            source_id: None,
        })
    }

    /// Builds an image from a rectangular grid of pixel rows.
    pub fn from_grid(rows: Vec<Vec<Pixel>>, max_value: u8) -> CollageResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(CollageError::validation("pixel grid is not rectangular"));
        }
        Self::new(height, width, max_value, rows.into_iter().flatten().collect())
    }

    /// A uniform backdrop: every pixel is `(max_value, max_value, max_value)`
    /// at the given alpha. A fresh layer uses alpha 0 (transparent white);
    /// the compositing backdrop uses alpha 255.
    pub fn blank(height: usize, width: usize, alpha: u8, max_value: u8) -> CollageResult<Self> {
        if max_value == 0 {
            return Err(CollageError::validation("image max_value must be in [1, 255]"));
        }
        if height == 0 || width == 0 {
            return Err(CollageError::validation(
                "image height and width must be >= 1",
            ));
        }
        let fill = Pixel::from_channels(max_value, max_value, max_value, alpha, FilterKind::Normal);
        let mut img = Self::filled(height, width, fill);
        img.max_value = max_value;
        Ok(img)
    }

    // Infallible path for callers whose dimensions are already validated.
    pub(crate) fn filled(height: usize, width: usize, fill: Pixel) -> Self {
        Self {
            height,
            width,
            max_value: 255,
            pixels: vec![fill; height * width],
            source_id: None,
        }
    }

    /// Attaches a source identifier (provenance for the structure report).
    #[must_use]
    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// The identifier of whatever this image was decoded from. Fails with a
    /// missing-metadata error when the image has none; callers report
    /// "Unknown" in that case.
    pub fn source_id(&self) -> CollageResult<&str> {
        self.source_id
            .as_deref()
            .ok_or_else(|| CollageError::missing_metadata("image has no source identifier"))
    }

    /// The pixel at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.pixels[row * self.width + col])
    }

    /// Replaces the pixel at `(row, col)`. Out-of-grid coordinates are
    /// ignored; boundary cropping is decided at the call sites that rely
    /// on this.
    pub fn set(&mut self, row: usize, col: usize, pixel: Pixel) {
        if row < self.height && col < self.width {
            self.pixels[row * self.width + col] = pixel;
        }
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub(crate) fn pixels_vec(&self) -> Vec<Pixel> {
        self.pixels.clone()
    }

    pub(crate) fn restore_pixels(&mut self, pixels: &[Pixel]) {
        self.pixels.copy_from_slice(pixels);
    }

    /// Rescales every channel by `255 / max_value`, forces alpha to full, and
    /// marks the image as full-range. Idempotent: a second call is a no-op.
    pub fn normalize_to_full_range(&mut self) {
        if self.max_value == 255 {
            return;
        }
        let factor = 255.0 / f64::from(self.max_value);
        for px in &mut self.pixels {
            *px = Pixel::clamped(
                (f64::from(px.red) * factor).round() as i32,
                (f64::from(px.green) * factor).round() as i32,
                (f64::from(px.blue) * factor).round() as i32,
                255,
                px.filter_tag,
            );
        }
        self.max_value = 255;
    }
}
