//! Software affine image transforms with fixed-point bilinear filtering.
//!
//! # Two-Step Design
//!
//! - **Matrix build** ([`TransformParams`] → [`AffineMatrix`]): once per frame,
//!   turn an image placement (origin, pivot, angle in tenths of a degree,
//!   per-axis scale) into an inverse fixed-point matrix. Exact quarter turns
//!   and mirrors come straight from [`Orientation90::matrix`].
//! - **Blit** ([`transform`] and the `transform_*_over_*` entry points): once
//!   per draw call, walk the destination draw area, clip each scanline to the
//!   source, filter 2x2 blocks and composite source-over.
//!
//! [`OpTransform`] bundles both steps behind chained setters.
//!
//! Pixel formats are chosen at compile time: a source format type
//! ([`Rgb565`], [`Argb8565`], [`Argb6666`], [`Argb8888`], [`Xrgb8888`],
//! [`Rgb888`], [`A8`], [`Index8`], [`Index4`], [`Index2`], [`Index1`],
//! [`Rgb565A8`]) and a destination format type ([`Rgb565`], [`Argb8888`],
//! [`Rgb888`]).
//!
//! # Example
//!
//! ```
//! use sw_transform::{Argb8888, Image, OpTransform, Rgb565};
//!
//! // A 64x64 ARGB8888 sprite.
//! let mut sprite: Image<Argb8888> = Image::new(64, 64);
//! sprite.fill_pixel(&0x80ff0000u32.to_le_bytes());
//!
//! // A 240x240 RGB565 framebuffer.
//! let mut fb: Image<Rgb565> = Image::new(240, 240);
//!
//! // Rotate 30 degrees around the sprite centre and scale it by 1.5.
//! let mut op = OpTransform::new();
//! op.set_image_origin(88, 88)
//!     .set_pivot(32, 32)
//!     .set_rotation(300)
//!     .set_scale(384, 384, 8);
//!
//! // Only redraw the area the sprite covers.
//! let area = op.bounding_area(&sprite.view()).unwrap();
//! let mut fb_view = fb.view_mut();
//! let mut draw_area = fb_view
//!     .region(area.x1 as usize, area.y1 as usize, area.width() as usize, area.height() as usize)
//!     .unwrap();
//! op.apply_to_preallocated(&sprite.view(), &mut draw_area, (area.x1 as i16, area.y1 as i16))
//!     .unwrap();
//! ```

#[doc(hidden)]
pub mod bench_utils;
pub mod bilinear;
pub mod blend;
mod error;
pub mod fixed;
mod format;
mod image;
mod matrix;
mod op_orient_90;
mod op_transform;
pub mod scanline;

pub use crate::error::{Axis, Result, TransformError};
pub use crate::format::{
    A8, Argb6666, Argb6666Sample, Argb8565, Argb8565Sample, Argb8888, Argb8888Sample, Block,
    Composite, DestFormat, Index1, Index2, Index4, Index8, Opa8, PackedIndex, PixelFormat, Rgb565,
    Rgb565A8, Rgb565Sample, Rgb888, Rgb888Sample, SourceFormat, Xrgb8888,
};
pub use crate::image::{Image, ImageView, ImageViewMut, MAX_DIMENSION};
pub use crate::matrix::{AffineMatrix, Area, MAX_SCALE_BITS, TransformParams};
pub use crate::op_orient_90::{OpOrient90, Orientation90};
pub use crate::op_transform::{
    OpTransform, ReferenceBackend, SoftwareBackend, TransformBackend, transform,
    transform_a8_over_argb8888, transform_a8_over_rgb565, transform_a8_over_rgb888,
    transform_argb6666_over_argb8888, transform_argb6666_over_rgb565,
    transform_argb6666_over_rgb888, transform_argb8565_over_argb8888,
    transform_argb8565_over_rgb565, transform_argb8565_over_rgb888,
    transform_argb8888_over_argb8888, transform_argb8888_over_rgb565,
    transform_argb8888_over_rgb888, transform_index1_over_argb8888, transform_index1_over_rgb565,
    transform_index1_over_rgb888, transform_index2_over_argb8888, transform_index2_over_rgb565,
    transform_index2_over_rgb888, transform_index4_over_argb8888, transform_index4_over_rgb565,
    transform_index4_over_rgb888, transform_index8_over_argb8888, transform_index8_over_rgb565,
    transform_index8_over_rgb888, transform_rgb565_over_argb8888, transform_rgb565_over_rgb565,
    transform_rgb565_over_rgb888, transform_rgb565a8_over_argb8888,
    transform_rgb565a8_over_rgb565, transform_rgb565a8_over_rgb888,
    transform_rgb888_over_argb8888, transform_rgb888_over_rgb565, transform_rgb888_over_rgb888,
    transform_xrgb8888_over_argb8888, transform_xrgb8888_over_rgb565,
    transform_xrgb8888_over_rgb888,
};
pub use crate::scanline::{ScanlineRange, clip_range};
