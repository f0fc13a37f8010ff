//! The layer stack and the compositing algorithm.
//!
//! A [`Canvas`] owns its layers and a derived composite image. The composite
//! is recomputed by [`composite_layers`] after every mutating operation, so
//! callers never have to remember a refresh step. Blend filters capture the
//! composite of everything beneath their layer at apply time; the cascade
//! pass rebuilds every downstream blend filter after an upstream change.

use std::fmt::Write as _;

use crate::error::{CollageError, CollageResult};
use crate::filter::{Filter, FilterKind};
use crate::image::Image;
use crate::layer::Layer;
use crate::pixel::Pixel;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    height: usize,
    width: usize,
    composite: Image,
    layers: Vec<Layer>,
    project_name: String,
}

impl Canvas {
    pub fn new(height: usize, width: usize, project_name: impl Into<String>) -> CollageResult<Self> {
        let composite = Image::blank(height, width, 255, 255)?;
        Ok(Self {
            height,
            width,
            composite,
            layers: Vec::new(),
            project_name: project_name.into(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The current full composite. Always available; derived from the layer
    /// stack as of the last mutating operation.
    pub fn composite(&self) -> &Image {
        &self.composite
    }

    /// Pushes a new layer on top of the stack.
    pub fn add_layer(
        &mut self,
        height: usize,
        width: usize,
        name: impl Into<String>,
    ) -> CollageResult<()> {
        let name = name.into();
        if self.layers.iter().any(|l| l.name() == name) {
            return Err(CollageError::layer(format!(
                "a layer named '{name}' already exists"
            )));
        }
        self.layers.push(Layer::new(height, width, name)?);
        self.recomposite();
        Ok(())
    }

    /// Places `image` onto the named layer at `(row, col)`, then rebuilds
    /// every stale blend filter above it and recomposites.
    #[tracing::instrument(skip(self, image), fields(project = %self.project_name))]
    pub fn add_image_to_layer(
        &mut self,
        layer_name: &str,
        image: Image,
        row: usize,
        col: usize,
    ) -> CollageResult<()> {
        let index = self.layer_index(layer_name)?;
        self.layers[index].place_image(image, row, col)?;
        self.cascade_from(index);
        self.recomposite();
        Ok(())
    }

    /// Resolves `filter_name` for the named layer and applies it, then
    /// rebuilds every stale blend filter above and recomposites.
    ///
    /// Both lookups fail before any state changes.
    #[tracing::instrument(skip(self), fields(project = %self.project_name))]
    pub fn set_filter(&mut self, layer_name: &str, filter_name: &str) -> CollageResult<()> {
        let index = self.layer_index(layer_name)?;
        let filter = self.filter_from_name(filter_name, layer_name)?;
        self.layers[index].apply_filter(filter);
        self.cascade_from(index);
        self.recomposite();
        Ok(())
    }

    /// Resolves a filter option name into a [`Filter`] for the given layer.
    /// Blend names eagerly capture that layer's current background image.
    pub fn filter_from_name(&self, filter_name: &str, layer_name: &str) -> CollageResult<Filter> {
        let kind = FilterKind::from_name(filter_name)?;
        match kind {
            FilterKind::Normal => Ok(Filter::Normal),
            FilterKind::Component(c) => Ok(Filter::Component(c)),
            FilterKind::Brighten(l) => Ok(Filter::Brighten(l)),
            FilterKind::Darken(l) => Ok(Filter::Darken(l)),
            FilterKind::Multiply | FilterKind::Screen | FilterKind::Difference => {
                Filter::blend(kind, self.background_of(layer_name)?)
            }
        }
    }

    /// The composite of all layers strictly below the named layer, over an
    /// opaque white backdrop. Recomputed on every call; a cached background
    /// would be stale by the time anything used it.
    pub fn background_of(&self, layer_name: &str) -> CollageResult<Image> {
        let index = self.layer_index(layer_name)?;
        Ok(composite_layers(
            self.height,
            self.width,
            &self.layers[..index],
        ))
    }

    /// Packed 0xAARRGGBB sample of the composite, for presentation layers.
    pub fn composite_argb(&self, row: usize, col: usize) -> Option<u32> {
        let px = self.composite.get(row, col)?;
        Some(
            (u32::from(px.alpha) << 24)
                | (u32::from(px.red) << 16)
                | (u32::from(px.green) << 8)
                | u32::from(px.blue),
        )
    }

    /// An ordered textual summary of the stack: each layer's name and active
    /// filter, and the provenance of each placed image ("Unknown" when the
    /// image carries no source identifier).
    pub fn structure_report(&self) -> String {
        let mut out = String::new();
        if !self.layers.is_empty() {
            out.push_str("Current Project Structure:\n");
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let _ = writeln!(
                out,
                "Layer #{}: {} ({})",
                i + 1,
                layer.name(),
                layer.filter().kind()
            );
            for (j, image) in layer.placed_images().iter().enumerate() {
                let id = image.source_id().unwrap_or("Unknown");
                let _ = writeln!(out, " - Image #{}: {}", j + 1, id);
            }
        }
        out
    }

    fn layer_index(&self, name: &str) -> CollageResult<usize> {
        self.layers
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| CollageError::layer(format!("layer '{name}' does not exist")))
    }

    fn recomposite(&mut self) {
        self.composite = composite_layers(self.height, self.width, &self.layers);
    }

    /// Rebuilds every blend filter strictly above `index`, ascending, each
    /// against the background as updated by the rebuilds before it.
    fn cascade_from(&mut self, index: usize) {
        for j in index + 1..self.layers.len() {
            let kind = self.layers[j].filter().kind();
            if !kind.is_blend() {
                continue;
            }
            let background = composite_layers(self.height, self.width, &self.layers[..j]);
            let rebuilt = match kind {
                FilterKind::Multiply => Filter::Multiply { background },
                FilterKind::Screen => Filter::Screen { background },
                FilterKind::Difference => Filter::Difference { background },
                _ => continue,
            };
            tracing::debug!(layer = self.layers[j].name(), "rebuilding stale blend filter");
            self.layers[j].apply_filter(rebuilt);
        }
    }
}

/// Flattens a layer stack bottom-to-top over an opaque white backdrop.
///
/// Only pixels with nonzero alpha overwrite the pixel beneath them. When a
/// pixel's filter tag differs from its layer's current filter, the layer
/// filter is re-applied at that coordinate on the output being built; this
/// lazily reconciles pixels placed after a filter change. Coordinates
/// outside a layer's own grid are skipped.
pub fn composite_layers(height: usize, width: usize, layers: &[Layer]) -> Image {
    let backdrop = Pixel::from_channels(255, 255, 255, 255, FilterKind::Normal);
    let mut out = Image::filled(height, width, backdrop);

    for layer in layers {
        let kind = layer.filter().kind();
        let rows = height.min(layer.height());
        let cols = width.min(layer.width());
        for row in 0..rows {
            for col in 0..cols {
                let Some(px) = layer.image().get(row, col) else {
                    continue;
                };
                if px.is_transparent() {
                    continue;
                }
                out.set(row, col, px);
                if kind != px.filter_tag {
                    layer.filter().apply(&mut out, row, col);
                }
            }
        }
    }
    out
}
