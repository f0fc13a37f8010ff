//! Collage is a layered-image compositing engine.
//!
//! It maintains a stack of named image layers, each with an independently
//! selectable filter, and produces a single composite image by flattening
//! the stack top-to-bottom under an alpha-visibility rule.
//!
//! # Model overview
//!
//! 1. **Pixel / Image**: an [`Image`] is a fixed-size grid of RGBA
//!    [`Pixel`]s; each pixel is tagged with the [`FilterKind`] that last
//!    produced its color.
//! 2. **Layer**: a named [`Image`] plus its placed source images, active
//!    [`Filter`], and a pre-filter snapshot that lets filters replace each
//!    other without compounding.
//! 3. **Canvas**: the ordered layer stack plus the derived composite,
//!    recomputed after every mutating operation. Blend filters (multiply,
//!    screen, difference) capture the composite of everything beneath their
//!    layer; the canvas rebuilds them whenever a lower layer changes.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: compositing is a pure function of the layer stack.
//! - **No IO**: decoded pixel buffers cross the [`interop`] seam; file
//!   formats, CLIs, and widgets live outside this crate.
#![forbid(unsafe_code)]

pub mod canvas;
pub mod color;
pub mod error;
pub mod filter;
pub mod image;
pub mod interop;
pub mod layer;
pub mod pixel;

pub use canvas::{Canvas, composite_layers};
pub use color::{hsl_to_rgb, rgb_to_hsl};
pub use error::{CollageError, CollageResult};
pub use filter::{Channel, Filter, FilterKind, Light};
pub use image::Image;
pub use interop::{image_from_rgba8, image_to_rgba8};
pub use layer::Layer;
pub use pixel::Pixel;
