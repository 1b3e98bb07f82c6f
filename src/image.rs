//! Pixel buffers and the borrowed views the blit kernels operate on.
//!
//! # Memory Layout
//!
//! Pixels are stored as raw little-endian bytes in row-major order:
//!
//! ```text
//! data[y * pitch + x * bytes_per_pixel + i]
//! ```
//!
//! `pitch` may exceed `width * bytes_per_pixel` (padded rows, or a view into
//! a larger framebuffer). The last row only needs `width * bytes_per_pixel`
//! bytes, so a region view carved from the bottom-right of a buffer is valid.
//! Packed formats with fewer than 8 bits per pixel round each row up to
//! whole bytes.

use crate::error::{Result, TransformError};
use crate::format::{Block, PixelFormat};

/// Largest width or height a view may have; coordinates are 16-bit.
pub const MAX_DIMENSION: usize = i16::MAX as usize;

/// Checks that `len` bytes can back a `width` x `height` image with `pitch`,
/// and that the planes `format` carries match it.
fn validate_layout<F: PixelFormat>(
    len: usize,
    width: usize,
    height: usize,
    pitch: usize,
    format: &F,
) -> Result<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TransformError::DimensionTooLarge { width, height });
    }
    let min = F::row_bytes(width);
    if pitch < min {
        return Err(TransformError::PitchTooSmall { pitch, min });
    }
    let required = required_len::<F>(width, height, pitch);
    if len < required {
        return Err(TransformError::BufferTooSmall { len, required });
    }
    format.check_planes(width, height)
}

fn required_len<F: PixelFormat>(width: usize, height: usize, pitch: usize) -> usize {
    if width == 0 || height == 0 { 0 } else { (height - 1) * pitch + F::row_bytes(width) }
}

/// Byte offset of pixel `x` within its row.
#[inline(always)]
fn byte_offset<F: PixelFormat>(x: usize) -> usize {
    x * F::BITS_PER_PIXEL / 8
}

/// Byte offset and length of a `w` x `h` region at `(x, y)`.
fn region_span<F: PixelFormat>(
    (width, height, pitch): (usize, usize, usize),
    (x, y, w, h): (usize, usize, usize, usize),
) -> Result<(usize, usize)> {
    let fits_x = x.checked_add(w).is_some_and(|end| end <= width);
    let fits_y = y.checked_add(h).is_some_and(|end| end <= height);
    if !fits_x || !fits_y {
        return Err(TransformError::RegionOutOfBounds);
    }
    if (x * F::BITS_PER_PIXEL) % 8 != 0 {
        return Err(TransformError::UnalignedRegion { x });
    }
    let len = required_len::<F>(w, h, pitch);
    if len == 0 {
        return Ok((0, 0));
    }
    Ok((y * pitch + byte_offset::<F>(x), len))
}

/// Read-only view of pixels in format `F`.
///
/// Construction validates the layout, so every in-bounds pixel access on a
/// view is guaranteed to hit the backing slice.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, F> {
    data: &'a [u8],
    width: usize,
    height: usize,
    pitch: usize,
    format: F,
}

impl<'a, F: PixelFormat> ImageView<'a, F> {
    /// Wraps `data` as a `width` x `height` image with `pitch` bytes per row.
    pub fn new(data: &'a [u8], width: usize, height: usize, pitch: usize, format: F) -> Result<Self> {
        validate_layout(data.len(), width, height, pitch, &format)?;
        Ok(Self { data, width, height, pitch, format })
    }

    /// Like [`new`](Self::new) with tightly packed rows.
    pub fn packed(data: &'a [u8], width: usize, height: usize, format: F) -> Result<Self> {
        Self::new(data, width, height, F::row_bytes(width), format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from one row to the next.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the pixel bytes of row `y`.
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.pitch;
        &self.data[start..start + F::row_bytes(self.width)]
    }

    /// Returns the bytes of the pixel at (x, y). For packed formats this is
    /// the byte holding the pixel.
    #[inline(always)]
    pub fn pixel_bytes(&self, x: usize, y: usize) -> &'a [u8] {
        let start = y * self.pitch + byte_offset::<F>(x);
        &self.data[start..start + F::BYTES_PER_PIXEL]
    }

    /// Pixel bytes of `block` in `p00, p10, p01, p11` order.
    #[inline(always)]
    pub fn block_bytes(&self, block: &Block) -> [&'a [u8]; 4] {
        [
            self.pixel_bytes(block.x0, block.y0),
            self.pixel_bytes(block.x1, block.y0),
            self.pixel_bytes(block.x0, block.y1),
            self.pixel_bytes(block.x1, block.y1),
        ]
    }

    /// Sub-rectangle sharing this view's storage and pitch.
    pub fn region(&self, x: usize, y: usize, width: usize, height: usize) -> Result<ImageView<'a, F>> {
        let (offset, len) =
            region_span::<F>((self.width, self.height, self.pitch), (x, y, width, height))?;
        Ok(ImageView {
            data: &self.data[offset..offset + len],
            width,
            height,
            pitch: self.pitch,
            format: self.format.region(x, y, width, height)?,
        })
    }
}

/// Writable view of pixels in format `F`; the draw target of a blit.
#[derive(Debug)]
pub struct ImageViewMut<'a, F> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    pitch: usize,
    format: F,
}

impl<'a, F: PixelFormat> ImageViewMut<'a, F> {
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        pitch: usize,
        format: F,
    ) -> Result<Self> {
        validate_layout(data.len(), width, height, pitch, &format)?;
        Ok(Self { data, width, height, pitch, format })
    }

    pub fn packed(data: &'a mut [u8], width: usize, height: usize, format: F) -> Result<Self> {
        Self::new(data, width, height, F::row_bytes(width), format)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read-only view of the same pixels.
    pub fn as_view(&self) -> ImageView<'_, F> {
        ImageView {
            data: &*self.data,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
            format: self.format,
        }
    }

    /// Returns mutable pixel bytes of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.pitch;
        &mut self.data[start..start + F::row_bytes(self.width)]
    }

    /// Returns mutable bytes of the pixel at (x, y).
    #[inline(always)]
    pub fn pixel_bytes_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = y * self.pitch + byte_offset::<F>(x);
        &mut self.data[start..start + F::BYTES_PER_PIXEL]
    }

    /// Carves a sub-rectangle out of this view, e.g. the draw area of a
    /// framebuffer.
    pub fn region(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageViewMut<'_, F>> {
        let (offset, len) =
            region_span::<F>((self.width, self.height, self.pitch), (x, y, width, height))?;
        let format = self.format.region(x, y, width, height)?;
        Ok(ImageViewMut {
            data: &mut self.data[offset..offset + len],
            width,
            height,
            pitch: self.pitch,
            format,
        })
    }

    /// Consumes the view, keeping only the sub-rectangle.
    pub fn into_region(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageViewMut<'a, F>> {
        let (offset, len) =
            region_span::<F>((self.width, self.height, self.pitch), (x, y, width, height))?;
        let format = self.format.region(x, y, width, height)?;
        let Self { data, pitch, .. } = self;
        Ok(ImageViewMut {
            data: &mut data[offset..offset + len],
            width,
            height,
            pitch,
            format,
        })
    }
}

/// An owned image with tightly packed rows.
///
/// The pixel format is a value so that formats carrying state (a tint
/// colour, a palette) travel with the pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image<F> {
    width: usize,
    height: usize,
    format: F,
    data: Vec<u8>,
}

impl<F: PixelFormat + Default> Image<F> {
    /// Creates a zero-filled image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_format(width, height, F::default())
    }
}

impl<F: PixelFormat> Image<F> {
    /// Creates a zero-filled image in `format`.
    ///
    /// # Panics
    ///
    /// If planes carried by `format` do not match `width` x `height`.
    pub fn with_format(width: usize, height: usize, format: F) -> Self {
        if let Err(err) = format.check_planes(width, height) {
            panic!("{err}");
        }
        let len = height.saturating_mul(F::row_bytes(width));
        Self { width, height, format, data: vec![0; len] }
    }

    /// Wraps existing packed pixel bytes.
    pub fn from_bytes(width: usize, height: usize, format: F, data: Vec<u8>) -> Result<Self> {
        validate_layout(data.len(), width, height, F::row_bytes(width), &format)?;
        Ok(Self { width, height, format, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    /// Row stride in bytes.
    pub fn pitch(&self) -> usize {
        F::row_bytes(self.width)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let pitch = self.pitch();
        &self.data[y * pitch..(y + 1) * pitch]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let pitch = self.pitch();
        &mut self.data[y * pitch..(y + 1) * pitch]
    }

    pub fn pixel_bytes(&self, x: usize, y: usize) -> &[u8] {
        let start = y * self.pitch() + byte_offset::<F>(x);
        &self.data[start..start + F::BYTES_PER_PIXEL]
    }

    pub fn pixel_bytes_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = y * self.pitch() + byte_offset::<F>(x);
        &mut self.data[start..start + F::BYTES_PER_PIXEL]
    }

    /// Sets every pixel to the encoded value `pixel`. Packed formats take a
    /// whole byte.
    pub fn fill_pixel(&mut self, pixel: &[u8]) {
        debug_assert_eq!(pixel.len(), F::BYTES_PER_PIXEL);
        for px in self.data.chunks_exact_mut(F::BYTES_PER_PIXEL) {
            px.copy_from_slice(pixel);
        }
    }

    /// Calls `f(x, y, bytes)` for every pixel. Packed formats pass the
    /// byte holding the pixel, once per pixel in it.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize, &mut [u8])) {
        for y in 0..self.height {
            for x in 0..self.width {
                f(x, y, self.pixel_bytes_mut(x, y));
            }
        }
    }

    pub fn view(&self) -> ImageView<'_, F> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            pitch: self.pitch(),
            format: self.format,
        }
    }

    pub fn view_mut(&mut self) -> ImageViewMut<'_, F> {
        let pitch = self.pitch();
        ImageViewMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            pitch,
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Argb8888, Index4, Opa8, Rgb565, Rgb565A8, Rgb888};

    #[test]
    fn test_view_rejects_short_pitch() {
        let data = [0u8; 64];
        let err = ImageView::new(&data, 4, 4, 7, Rgb565).unwrap_err();
        assert_eq!(err, TransformError::PitchTooSmall { pitch: 7, min: 8 });
    }

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = [0u8; 30];
        let err = ImageView::new(&data, 4, 4, 8, Rgb565).unwrap_err();
        assert_eq!(err, TransformError::BufferTooSmall { len: 30, required: 32 });
    }

    #[test]
    fn test_last_row_needs_no_padding() {
        // Three rows of pitch 10, last row only 8 bytes long.
        let data = [0u8; 28];
        assert!(ImageView::new(&data, 4, 3, 10, Rgb565).is_ok());
    }

    #[test]
    fn test_view_rejects_huge_dimensions() {
        let err = ImageView::new(&[], 40_000, 0, 0, Rgb565).unwrap_err();
        assert!(matches!(err, TransformError::DimensionTooLarge { width: 40_000, .. }));
    }

    #[test]
    fn test_zero_sized_views_are_allowed() {
        let view = ImageView::new(&[], 0, 10, 0, Argb8888).unwrap();
        assert!(view.is_empty());
        let view = ImageView::packed(&[], 10, 0, Argb8888).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_region_shares_pitch() {
        let mut img: Image<Rgb888> = Image::new(5, 4);
        img.fill_with(|x, y, px| px.copy_from_slice(&[x as u8, y as u8, 0]));

        let view = img.view();
        let region = view.region(2, 1, 3, 3).unwrap();
        assert_eq!(region.pitch(), 15);
        assert_eq!(region.pixel_bytes(0, 0), &[2, 1, 0]);
        assert_eq!(region.pixel_bytes(2, 2), &[4, 3, 0]);
        assert_eq!(region.row(1), &[2, 2, 0, 3, 2, 0, 4, 2, 0]);

        assert_eq!(view.region(3, 0, 3, 1).unwrap_err(), TransformError::RegionOutOfBounds);
        assert!(view.region(5, 4, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_region_mut_writes_through() {
        let mut img: Image<Rgb565> = Image::new(4, 4);
        {
            let mut view = img.view_mut();
            let mut region = view.region(1, 2, 2, 2).unwrap();
            region.pixel_bytes_mut(1, 1).copy_from_slice(&[0xaa, 0xbb]);
            region.row_mut(0).fill(0x11);
        }
        assert_eq!(img.pixel_bytes(2, 3), &[0xaa, 0xbb]);
        assert_eq!(img.row(2), &[0, 0, 0x11, 0x11, 0x11, 0x11, 0, 0]);
    }

    #[test]
    fn test_fill_pixel() {
        let mut img: Image<Argb8888> = Image::new(3, 2);
        img.fill_pixel(&0x80402010u32.to_le_bytes());
        assert!(img.as_bytes().chunks(4).all(|px| px == [0x10, 0x20, 0x40, 0x80]));
    }

    #[test]
    fn test_from_bytes_validates_length() {
        assert!(Image::from_bytes(2, 2, Rgb565, vec![0; 8]).is_ok());
        assert_eq!(
            Image::from_bytes(2, 2, Rgb565, vec![0; 7]).unwrap_err(),
            TransformError::BufferTooSmall { len: 7, required: 8 }
        );
    }

    #[test]
    fn test_packed_rows_round_up_to_bytes() {
        let palette = [0u32; 16];
        let fmt = Index4::new(&palette).unwrap();
        let mut img = Image::with_format(5, 2, fmt);
        assert_eq!(img.pitch(), 3);
        assert_eq!(img.as_bytes().len(), 6);

        img.row_mut(1).copy_from_slice(&[0x12, 0x34, 0x50]);
        let view = img.view();
        assert_eq!(view.pixel_bytes(0, 1), &[0x12]);
        assert_eq!(view.pixel_bytes(3, 1), &[0x34]);
        assert_eq!(view.pixel_bytes(4, 1), &[0x50]);

        // Only byte-aligned columns can start a region.
        assert_eq!(view.region(2, 0, 3, 2).unwrap().row(1), &[0x34, 0x50]);
        assert_eq!(view.region(1, 0, 2, 2).unwrap_err(), TransformError::UnalignedRegion { x: 1 });
    }

    #[test]
    fn test_opacity_plane_must_match_colour_plane() {
        let opa = [0u8; 6];
        let plane = ImageView::packed(&opa, 3, 2, Opa8).unwrap();
        let colour = [0u8; 12];
        assert!(ImageView::packed(&colour, 3, 2, Rgb565A8::new(plane)).is_ok());
        assert_eq!(
            ImageView::packed(&colour, 2, 3, Rgb565A8::new(plane)).unwrap_err(),
            TransformError::PlaneMismatch { width: 2, height: 3, plane_width: 3, plane_height: 2 }
        );
    }

    #[test]
    fn test_region_carves_opacity_plane_too() {
        let opa: Vec<u8> = (0..12).collect();
        let plane = ImageView::packed(&opa, 4, 3, Opa8).unwrap();
        let colour = [0u8; 24];
        let view = ImageView::packed(&colour, 4, 3, Rgb565A8::new(plane)).unwrap();
        let region = view.region(1, 1, 2, 2).unwrap();
        let carved = region.format().opacity();
        assert_eq!((carved.width(), carved.height()), (2, 2));
        assert_eq!(carved.pixel_bytes(0, 0), &[5]);
        assert_eq!(carved.pixel_bytes(1, 1), &[10]);
    }
}
