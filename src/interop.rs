//! In-memory conversion between [`Image`] and `image::RgbaImage`.
//!
//! This is the seam to the persistence layer: file decoding/encoding happens
//! outside this crate, and the decoded pixel buffers cross here.

use anyhow::Context as _;

use crate::error::CollageResult;
use crate::filter::FilterKind;
use crate::image::Image;
use crate::pixel::Pixel;

/// Builds an [`Image`] from a decoded RGBA buffer. The result is already at
/// full range (`max_value` 255) and every pixel carries the normal tag.
pub fn image_from_rgba8(rgba: &image::RgbaImage, source_id: Option<&str>) -> CollageResult<Image> {
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| Pixel::from_channels(p.0[0], p.0[1], p.0[2], p.0[3], FilterKind::Normal))
        .collect();
    let img = Image::new(height as usize, width as usize, 255, pixels)?;
    Ok(match source_id {
        Some(id) => img.with_source_id(id),
        None => img,
    })
}

/// Flattens an [`Image`] into an RGBA buffer for the persistence layer.
pub fn image_to_rgba8(image: &Image) -> CollageResult<image::RgbaImage> {
    let width = u32::try_from(image.width()).context("image width exceeds u32")?;
    let height = u32::try_from(image.height()).context("image height exceeds u32")?;
    let mut raw = Vec::with_capacity(image.pixels().len() * 4);
    for px in image.pixels() {
        raw.extend_from_slice(&[px.red, px.green, px.blue, px.alpha]);
    }
    image::RgbaImage::from_raw(width, height, raw)
        .context("rgba buffer does not match image dimensions")
        .map_err(Into::into)
}
