use crate::error::{CollageError, CollageResult};
use crate::filter::{Filter, FilterKind};
use crate::image::Image;
use crate::pixel::Pixel;

/// A named image layer: its composited pixels, the source images placed onto
/// it, the currently active filter, and a pre-filter pixel snapshot.
///
/// The snapshot always holds the layer's pixels as they stood before the
/// current filter was applied. Swapping one filter for another first reverts
/// to the snapshot, so filters replace each other instead of compounding.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    name: String,
    height: usize,
    width: usize,
    image: Image,
    placed: Vec<Image>,
    filter: Filter,
    previous_pixels: Vec<Pixel>,
}

impl Layer {
    /// A brand-new layer is fully transparent white under the normal filter.
    pub fn new(height: usize, width: usize, name: impl Into<String>) -> CollageResult<Self> {
        let image = Image::blank(height, width, 0, 255)?;
        let previous_pixels = image.pixels_vec();
        Ok(Self {
            name: name.into(),
            height,
            width,
            image,
            placed: Vec::new(),
            filter: Filter::Normal,
            previous_pixels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// The source images placed onto this layer, in placement order.
    pub fn placed_images(&self) -> &[Image] {
        &self.placed
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn snapshot(&self) -> &[Pixel] {
        &self.previous_pixels
    }

    /// Applies `filter` over every coordinate and records it as current.
    ///
    /// When the current filter is normal the live pixels are first captured
    /// as the clean baseline; otherwise the layer reverts to that baseline
    /// before the new filter runs.
    pub fn apply_filter(&mut self, filter: Filter) {
        if self.filter.kind() == FilterKind::Normal {
            self.previous_pixels = self.image.pixels_vec();
        } else {
            self.revert_to_snapshot();
        }

        for row in 0..self.height {
            for col in 0..self.width {
                filter.apply(&mut self.image, row, col);
            }
        }
        self.filter = filter;
    }

    /// Restores the pre-filter snapshot into the live image.
    pub fn revert_to_snapshot(&mut self) {
        self.image.restore_pixels(&self.previous_pixels);
    }

    /// Overlays `image` onto this layer starting at `(row, col)`.
    ///
    /// The origin must lie inside the layer grid; anything extending past
    /// the boundary is silently cropped. The snapshot is updated at every
    /// written coordinate so a later filter swap redoes against the placed
    /// content.
    pub fn place_image(&mut self, image: Image, row: usize, col: usize) -> CollageResult<()> {
        if row >= self.height || col >= self.width {
            return Err(CollageError::layer(format!(
                "image position ({row}, {col}) must be inside the {}x{} layer grid",
                self.height, self.width
            )));
        }

        let rows = image.height().min(self.height - row);
        let cols = image.width().min(self.width - col);
        for src_row in 0..rows {
            for src_col in 0..cols {
                if let Some(px) = image.get(src_row, src_col) {
                    let (dst_row, dst_col) = (row + src_row, col + src_col);
                    self.image.set(dst_row, dst_col, px);
                    self.previous_pixels[dst_row * self.width + dst_col] = px;
                }
            }
        }
        self.placed.push(image);
        Ok(())
    }
}
