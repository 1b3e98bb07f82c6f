//! Affine transform blits with fixed-point bilinear filtering.
//!
//! # Algorithm Overview
//!
//! 1. **Inverse mapping**: An [`AffineMatrix`] maps each destination pixel
//!    back to a fixed-point-16 source coordinate. The coordinate of the first
//!    pixel of the draw area is computed once; each column adds `(sx, shy)`
//!    and each row adds `(shx, sy)`.
//!
//! 2. **Scanline clipping**: Per destination row, [`ScanlineRange::clip`]
//!    finds the exact interval of columns whose sample point lies inside the
//!    source. Columns outside it are never touched, and columns inside it
//!    fetch without bounds checks on the source coordinate.
//!
//! 3. **Bilinear sampling**: The integer part of the coordinate selects a 2x2
//!    block, the fraction becomes a 6 or 8-bit tap, and the source format's
//!    kernel filters the block into a sample.
//!
//! 4. **Compositing**: The sample is blended into the destination pixel with
//!    the formula for that (sample, destination) pair.
//!
//! The loop is written once; every source/destination pair is a
//! monomorphization of it. [`ReferenceBackend`] recomputes every coordinate
//! from the matrix and bounds-checks it per pixel, and produces bit-identical
//! output.

use log::{debug, trace};

use crate::error::{Result, TransformError};
use crate::fixed::fixed16;
use crate::format::{
    A8, Argb6666, Argb8565, Argb8888, Block, Composite, DestFormat, Index1, Index2, Index4, Index8,
    PixelFormat, Rgb565, Rgb565A8, Rgb888, SourceFormat, Xrgb8888,
};
use crate::image::{Image, ImageView, ImageViewMut, MAX_DIMENSION};
use crate::matrix::{AffineMatrix, Area, TransformParams};
use crate::scanline::ScanlineRange;

/// Strategy that executes a blit.
///
/// Backends are chosen by type when an operator is built and are never
/// mixed within one call.
pub trait TransformBackend {
    fn name(&self) -> &'static str;

    /// Composites `src`, mapped through `matrix`, into the draw area `dst`
    /// whose top-left pixel sits at display coordinate `origin`.
    fn transform<S, D>(
        &self,
        dst: &mut ImageViewMut<'_, D>,
        origin: (i16, i16),
        src: &ImageView<'_, S>,
        matrix: &AffineMatrix,
    ) where
        S: SourceFormat,
        D: DestFormat,
        S::Sample: Composite<D>;
}

/// Incremental scanline renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SoftwareBackend;

/// Per-pixel direct evaluation of the matrix; the baseline the incremental
/// renderer is checked against.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceBackend;

/// Filters the 2x2 block at fixed-point-16 coordinate `(px, py)`.
///
/// The coordinate must satisfy `0 <= p <= fixed16(dim - 1)` on both axes.
/// The right and lower neighbours are clamped to the last column and row,
/// which only happens when their weight is zero.
#[inline(always)]
fn sample_at<S: SourceFormat>(src: &ImageView<'_, S>, px: i64, py: i64) -> S::Sample {
    let block = Block::at(px, py, src.width(), src.height());
    src.format().sample(src, &block)
}

fn log_blit<S: PixelFormat, D: PixelFormat>(
    backend: &str,
    dst: &ImageViewMut<'_, D>,
    origin: (i16, i16),
    src: &ImageView<'_, S>,
) {
    debug!(
        "{backend}: {} over {}, {}x{} source into {}x{} area at ({}, {})",
        S::NAME,
        D::NAME,
        src.width(),
        src.height(),
        dst.width(),
        dst.height(),
        origin.0,
        origin.1
    );
}

impl TransformBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn transform<S, D>(
        &self,
        dst: &mut ImageViewMut<'_, D>,
        origin: (i16, i16),
        src: &ImageView<'_, S>,
        matrix: &AffineMatrix,
    ) where
        S: SourceFormat,
        D: DestFormat,
        S::Sample: Composite<D>,
    {
        log_blit(self.name(), dst, origin, src);
        if dst.is_empty() || src.is_empty() {
            trace!("empty source or draw area, nothing to draw");
            return;
        }

        let (mut row_x, mut row_y) = matrix.map(origin.0 as i32, origin.1 as i32);
        let step = (matrix.sx as i64, matrix.shy as i64);
        let last_column = dst.width() as i32 - 1;
        let mut drawn_rows = 0usize;

        for y in 0..dst.height() {
            let range = ScanlineRange::new(0, last_column).clip(
                src.width(),
                src.height(),
                (row_x, row_y),
                step,
            );

            if !range.is_empty() {
                drawn_rows += 1;
                let first = range.x_min as i64;
                let mut px = row_x + step.0 * first;
                let mut py = row_y + step.1 * first;
                for x in range.x_min..=range.x_max {
                    let sample = sample_at(src, px, py);
                    sample.composite(dst.pixel_bytes_mut(x as usize, y));
                    px += step.0;
                    py += step.1;
                }
            }

            row_x += matrix.shx as i64;
            row_y += matrix.sy as i64;
        }

        if drawn_rows == 0 {
            trace!("all {} rows clipped", dst.height());
        }
    }
}

impl TransformBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn transform<S, D>(
        &self,
        dst: &mut ImageViewMut<'_, D>,
        origin: (i16, i16),
        src: &ImageView<'_, S>,
        matrix: &AffineMatrix,
    ) where
        S: SourceFormat,
        D: DestFormat,
        S::Sample: Composite<D>,
    {
        log_blit(self.name(), dst, origin, src);
        if src.is_empty() {
            return;
        }

        let last_x = fixed16(1) as i64 * (src.width() as i64 - 1);
        let last_y = fixed16(1) as i64 * (src.height() as i64 - 1);
        for y in 0..dst.height() {
            for x in 0..dst.width() {
                let (px, py) = matrix.map(origin.0 as i32 + x as i32, origin.1 as i32 + y as i32);
                if (0..=last_x).contains(&px) && (0..=last_y).contains(&py) {
                    let sample = sample_at(src, px, py);
                    sample.composite(dst.pixel_bytes_mut(x, y));
                }
            }
        }
    }
}

/// Composites `src` into `dst` with the incremental renderer.
pub fn transform<S, D>(
    dst: &mut ImageViewMut<'_, D>,
    origin: (i16, i16),
    src: &ImageView<'_, S>,
    matrix: &AffineMatrix,
) where
    S: SourceFormat,
    D: DestFormat,
    S::Sample: Composite<D>,
{
    SoftwareBackend.transform(dst, origin, src, matrix)
}

macro_rules! transform_entry_points {
    ($($name:ident: $src:ty => $dst:ty;)*) => {
        $(
            #[doc = concat!(
                "Transforms a `", stringify!($src), "` source over a `",
                stringify!($dst), "` draw area. See [`transform`]."
            )]
            #[inline]
            pub fn $name(
                dst: &mut ImageViewMut<'_, $dst>,
                origin: (i16, i16),
                src: &ImageView<'_, $src>,
                matrix: &AffineMatrix,
            ) {
                transform(dst, origin, src, matrix)
            }
        )*
    };
}

transform_entry_points! {
    transform_rgb565_over_rgb565: Rgb565 => Rgb565;
    transform_rgb565_over_argb8888: Rgb565 => Argb8888;
    transform_rgb565_over_rgb888: Rgb565 => Rgb888;
    transform_argb8565_over_rgb565: Argb8565 => Rgb565;
    transform_argb8565_over_argb8888: Argb8565 => Argb8888;
    transform_argb8565_over_rgb888: Argb8565 => Rgb888;
    transform_argb6666_over_rgb565: Argb6666 => Rgb565;
    transform_argb6666_over_argb8888: Argb6666 => Argb8888;
    transform_argb6666_over_rgb888: Argb6666 => Rgb888;
    transform_argb8888_over_rgb565: Argb8888 => Rgb565;
    transform_argb8888_over_argb8888: Argb8888 => Argb8888;
    transform_argb8888_over_rgb888: Argb8888 => Rgb888;
    transform_xrgb8888_over_rgb565: Xrgb8888 => Rgb565;
    transform_xrgb8888_over_argb8888: Xrgb8888 => Argb8888;
    transform_xrgb8888_over_rgb888: Xrgb8888 => Rgb888;
    transform_rgb888_over_rgb565: Rgb888 => Rgb565;
    transform_rgb888_over_argb8888: Rgb888 => Argb8888;
    transform_rgb888_over_rgb888: Rgb888 => Rgb888;
    transform_a8_over_rgb565: A8 => Rgb565;
    transform_a8_over_argb8888: A8 => Argb8888;
    transform_a8_over_rgb888: A8 => Rgb888;
    transform_index8_over_rgb565: Index8<'_> => Rgb565;
    transform_index8_over_argb8888: Index8<'_> => Argb8888;
    transform_index8_over_rgb888: Index8<'_> => Rgb888;
    transform_index4_over_rgb565: Index4<'_> => Rgb565;
    transform_index4_over_argb8888: Index4<'_> => Argb8888;
    transform_index4_over_rgb888: Index4<'_> => Rgb888;
    transform_index2_over_rgb565: Index2<'_> => Rgb565;
    transform_index2_over_argb8888: Index2<'_> => Argb8888;
    transform_index2_over_rgb888: Index2<'_> => Rgb888;
    transform_index1_over_rgb565: Index1<'_> => Rgb565;
    transform_index1_over_argb8888: Index1<'_> => Argb8888;
    transform_index1_over_rgb888: Index1<'_> => Rgb888;
    transform_rgb565a8_over_rgb565: Rgb565A8<'_> => Rgb565;
    transform_rgb565a8_over_argb8888: Rgb565A8<'_> => Argb8888;
    transform_rgb565a8_over_rgb888: Rgb565A8<'_> => Rgb888;
}

/// Rotation, scaling and placement of a source image onto a framebuffer.
///
/// Configure with the chained setters, then call
/// [`apply_to_preallocated`](Self::apply_to_preallocated) once per draw
/// call. Parameters are validated when the matrix is built.
///
/// Defaults: no rotation, scale 1.0 with 8 fractional bits, pivot and image
/// origin at `(0, 0)`.
#[derive(Clone, Debug, Default)]
pub struct OpTransform<B = SoftwareBackend> {
    params: TransformParams,
    backend: B,
}

impl OpTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: TransformBackend> OpTransform<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { params: TransformParams::default(), backend }
    }

    /// Clockwise rotation around the pivot, in tenths of a degree
    /// (`0..=3600`).
    pub fn set_rotation(&mut self, angle_tenths: u16) -> &mut Self {
        self.params.angle = angle_tenths;
        self
    }

    /// Per-axis scale factors with `bits` fractional bits.
    pub fn set_scale(&mut self, scale_x: u16, scale_y: u16, bits: u16) -> &mut Self {
        self.params.scale_x = scale_x;
        self.params.scale_y = scale_y;
        self.params.scale_bits = bits;
        self
    }

    /// Pivot relative to the image's top-left corner.
    pub fn set_pivot(&mut self, x: i16, y: i16) -> &mut Self {
        self.params.pivot_x = x;
        self.params.pivot_y = y;
        self
    }

    /// Display coordinate of the untransformed image's top-left corner.
    pub fn set_image_origin(&mut self, x: i16, y: i16) -> &mut Self {
        self.params.img_x = x;
        self.params.img_y = y;
        self
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn matrix(&self) -> Result<AffineMatrix> {
        AffineMatrix::from_params(&self.params)
    }

    /// Display rectangle the transformed `src` covers.
    pub fn bounding_area<S: PixelFormat>(&self, src: &ImageView<'_, S>) -> Result<Area> {
        self.params.bounding_area(src.width() as u16, src.height() as u16)
    }

    /// Composites the transformed `src` into the draw area `dst`, whose
    /// top-left pixel sits at display coordinate `origin`.
    pub fn apply_to_preallocated<S, D>(
        &self,
        src: &ImageView<'_, S>,
        dst: &mut ImageViewMut<'_, D>,
        origin: (i16, i16),
    ) -> Result<()>
    where
        S: SourceFormat,
        D: DestFormat,
        S::Sample: Composite<D>,
    {
        let matrix = self.matrix()?;
        self.backend.transform(dst, origin, src, &matrix);
        Ok(())
    }

    /// Renders the transformed `src` into a new image sized to its
    /// bounding area, and returns the area with it.
    ///
    /// Pixels the source does not cover stay zero (transparent black for
    /// ARGB8888).
    pub fn apply<S, D>(&self, src: &ImageView<'_, S>) -> Result<(Area, Image<D>)>
    where
        S: SourceFormat,
        D: DestFormat + Default,
        S::Sample: Composite<D>,
    {
        let area = self.bounding_area(src)?;
        let (width, height) = (area.width() as usize, area.height() as usize);
        let out_of_range = || TransformError::DimensionTooLarge { width, height };
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(out_of_range());
        }
        let origin = (
            i16::try_from(area.x1).map_err(|_| out_of_range())?,
            i16::try_from(area.y1).map_err(|_| out_of_range())?,
        );

        let mut image = Image::new(width, height);
        self.apply_to_preallocated(src, &mut image.view_mut(), origin)?;
        Ok((area, image))
    }
}
