//! Pixel encodings and the traits that connect them to the blit loop.
//!
//! A source format turns a 2x2 block of pixels into a filtered sample.
//! The sample type, not the source format, decides how it is composited, so
//! formats that filter to the same kind of sample (ARGB8888, A8 and the
//! indexed formats all produce [`Argb8888Sample`]) share one blend formula
//! per destination.
//!
//! All encodings are little-endian. Packed indexed formats store the
//! leftmost pixel in the most significant bits of each byte.

use crate::bilinear::{
    TAP_BITS_6, TAP_BITS_8, bilinear_a8, bilinear_argb6666, bilinear_argb8565,
    bilinear_argb8888, bilinear_rgb565, bilinear_rgb888, tap,
};
use crate::blend::{
    argb8888_to_rgb565, blend_argb6666_over_argb8888, blend_argb6666_over_rgb565,
    blend_argb8888_over_argb8888, blend_argb8888_over_rgb565, blend_rgb565_over_argb8888,
    blend_rgb565_over_rgb565, rgb565_to_argb8888, tint_a8,
};
use crate::error::{Result, TransformError};
use crate::image::ImageView;

/// Byte layout shared by sources and destinations.
pub trait PixelFormat: Copy {
    /// Bytes addressed per pixel. Packed formats share one byte between
    /// several pixels and report 1.
    const BYTES_PER_PIXEL: usize;
    const BITS_PER_PIXEL: usize = Self::BYTES_PER_PIXEL * 8;
    const NAME: &'static str;

    /// Bytes holding `width` pixels of one row.
    #[inline(always)]
    fn row_bytes(width: usize) -> usize {
        (width * Self::BITS_PER_PIXEL).div_ceil(8)
    }

    /// Checks planes carried by the format against a `width` x `height`
    /// image.
    fn check_planes(&self, _width: usize, _height: usize) -> Result<()> {
        Ok(())
    }

    /// The format for a `width` x `height` region at `(x, y)` of an image.
    fn region(&self, _x: usize, _y: usize, _width: usize, _height: usize) -> Result<Self> {
        Ok(*self)
    }
}

/// 2x2 filter neighbourhood of a sample point.
///
/// `(x0, y0)` holds the point; `x1`/`y1` are the right and lower neighbours,
/// clamped to the last column and row. `frac_x`/`frac_y` are the 16-bit
/// fractions of the point inside the top-left pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
    pub frac_x: i32,
    pub frac_y: i32,
}

impl Block {
    /// Block around fixed-point-16 point `(px, py)` of a `width` x `height`
    /// image. The point must satisfy `0 <= p <= fixed16(dim - 1)`; clamped
    /// neighbours always get zero weight.
    #[inline(always)]
    pub fn at(px: i64, py: i64, width: usize, height: usize) -> Self {
        let x0 = (px >> 16) as usize;
        let y0 = (py >> 16) as usize;
        Self {
            x0,
            y0,
            x1: (x0 + 1).min(width - 1),
            y1: (y0 + 1).min(height - 1),
            frac_x: (px & 0xffff) as i32,
            frac_y: (py & 0xffff) as i32,
        }
    }

    /// Horizontal and vertical taps with `bits` of precision.
    #[inline(always)]
    pub fn taps(&self, bits: u32) -> (u32, u32) {
        (tap(self.frac_x, bits), tap(self.frac_y, bits))
    }
}

/// A format that can be read and filtered.
pub trait SourceFormat: PixelFormat {
    /// Filtered value handed to the compositor.
    type Sample: Copy;

    /// Precision of the colour taps.
    const TAP_BITS: u32;

    /// Filters `block` of `src`, whose format is `self`.
    fn sample(&self, src: &ImageView<'_, Self>, block: &Block) -> Self::Sample;
}

/// A format that can be written to.
pub trait DestFormat: PixelFormat {}

/// Composites a sample into one destination pixel of format `D`.
pub trait Composite<D: DestFormat>: Copy {
    fn composite(self, dst: &mut [u8]);
}

/// Implements [`SourceFormat`] for a format whose pixels are whole bytes.
///
/// The kernel sees the four pixels as `p00` (top-left), `p10` (right),
/// `p01` (below) and `p11` (diagonal), each exactly one pixel long.
macro_rules! byte_source {
    (
        $fmt:ty => $sample:ty, $bits:expr,
        |$this:ident, $p00:ident, $p10:ident, $p01:ident, $p11:ident, $xt:ident, $yt:ident| $body:expr
    ) => {
        impl SourceFormat for $fmt {
            type Sample = $sample;
            const TAP_BITS: u32 = $bits;

            #[inline(always)]
            fn sample(&self, src: &ImageView<'_, Self>, block: &Block) -> $sample {
                let $this = self;
                let [$p00, $p10, $p01, $p11] = src.block_bytes(block);
                let ($xt, $yt) = block.taps(Self::TAP_BITS);
                $body
            }
        }
    };
}

macro_rules! unit_format {
    ($(#[$meta:meta])* $name:ident, $bpp:expr, $label:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl PixelFormat for $name {
            const BYTES_PER_PIXEL: usize = $bpp;
            const NAME: &'static str = $label;
        }
    };
}

unit_format!(
    /// `r5 g6 b5` in a little-endian `u16`.
    Rgb565, 2, "RGB565"
);
unit_format!(
    /// RGB565 followed by an 8-bit alpha byte.
    Argb8565, 3, "ARGB8565"
);
unit_format!(
    /// 24-bit word `a6 r6 g6 b6`, little-endian.
    Argb6666, 3, "ARGB6666"
);
unit_format!(
    /// Straight-alpha `a8 r8 g8 b8` in a little-endian `u32`.
    Argb8888, 4, "ARGB8888"
);
unit_format!(
    /// ARGB8888 layout with the alpha byte ignored.
    Xrgb8888, 4, "XRGB8888"
);
unit_format!(
    /// Bytes `b, g, r`.
    Rgb888, 3, "RGB888"
);
unit_format!(
    /// One opacity byte per pixel; the alpha plane of [`Rgb565A8`].
    Opa8, 1, "OPA8"
);

impl Rgb565 {
    #[inline(always)]
    pub fn read(p: &[u8]) -> u16 {
        u16::from_le_bytes([p[0], p[1]])
    }

    #[inline(always)]
    pub fn write(p: &mut [u8], c: u16) {
        p[..2].copy_from_slice(&c.to_le_bytes());
    }
}

impl Argb8565 {
    #[inline(always)]
    pub fn read(p: &[u8]) -> (u16, u8) {
        (u16::from_le_bytes([p[0], p[1]]), p[2])
    }

    pub fn encode(rgb: u16, a: u8) -> [u8; 3] {
        let [lo, hi] = rgb.to_le_bytes();
        [lo, hi, a]
    }
}

impl Argb6666 {
    #[inline(always)]
    pub fn read(p: &[u8]) -> u32 {
        u32::from_le_bytes([p[0], p[1], p[2], 0])
    }

    /// Packs 6-bit channels.
    pub fn encode(a: u8, r: u8, g: u8, b: u8) -> [u8; 3] {
        let word = ((a as u32 & 0x3f) << 18)
            | ((r as u32 & 0x3f) << 12)
            | ((g as u32 & 0x3f) << 6)
            | (b as u32 & 0x3f);
        let [b0, b1, b2, _] = word.to_le_bytes();
        [b0, b1, b2]
    }
}

impl Argb8888 {
    #[inline(always)]
    pub fn read(p: &[u8]) -> u32 {
        u32::from_le_bytes([p[0], p[1], p[2], p[3]])
    }

    #[inline(always)]
    pub fn write(p: &mut [u8], c: u32) {
        p[..4].copy_from_slice(&c.to_le_bytes());
    }
}

impl Rgb888 {
    /// Reads as `0x00RRGGBB`.
    #[inline(always)]
    pub fn read(p: &[u8]) -> u32 {
        u32::from_le_bytes([p[0], p[1], p[2], 0])
    }

    /// Stores the low 24 bits of `c`.
    #[inline(always)]
    pub fn write(p: &mut [u8], c: u32) {
        p[..3].copy_from_slice(&c.to_le_bytes()[..3]);
    }
}

/// 8-bit coverage tinted with a constant ARGB8888 colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct A8 {
    pub color: u32,
}

impl A8 {
    pub const fn new(color: u32) -> Self {
        Self { color }
    }
}

impl Default for A8 {
    fn default() -> Self {
        Self::new(0xffffffff)
    }
}

impl PixelFormat for A8 {
    const BYTES_PER_PIXEL: usize = 1;
    const NAME: &'static str = "A8";
}

/// 8-bit index into a 256-entry ARGB8888 palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Index8<'a> {
    pub palette: &'a [u32; 256],
}

impl<'a> Index8<'a> {
    pub const fn new(palette: &'a [u32; 256]) -> Self {
        Self { palette }
    }

    #[inline(always)]
    fn lookup(&self, p: &[u8]) -> u32 {
        self.palette[p[0] as usize]
    }
}

impl PixelFormat for Index8<'_> {
    const BYTES_PER_PIXEL: usize = 1;
    const NAME: &'static str = "INDEX8";
}

/// 1, 2 or 4-bit palette indices packed most significant bits first.
///
/// The palette must hold at least `1 << BPP` entries. Regions must start on
/// a byte boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PackedIndex<'a, const BPP: usize> {
    palette: &'a [u32],
}

/// Two-colour palette image, 8 pixels per byte.
pub type Index1<'a> = PackedIndex<'a, 1>;
/// Four-colour palette image, 4 pixels per byte.
pub type Index2<'a> = PackedIndex<'a, 2>;
/// Sixteen-colour palette image, 2 pixels per byte.
pub type Index4<'a> = PackedIndex<'a, 4>;

macro_rules! packed_index_new {
    ($($bpp:literal => $entries:literal),*) => {
        $(
            impl<'a> PackedIndex<'a, $bpp> {
                #[doc = concat!("Fails unless `palette` holds at least ", stringify!($entries), " colours.")]
                pub fn new(palette: &'a [u32]) -> Result<Self> {
                    let required = $entries;
                    if palette.len() < required {
                        return Err(TransformError::PaletteTooShort { len: palette.len(), required });
                    }
                    Ok(Self { palette })
                }
            }
        )*
    };
}

packed_index_new!(1 => 2, 2 => 4, 4 => 16);

impl<const BPP: usize> PackedIndex<'_, BPP> {
    const MASK: u8 = ((1u16 << BPP) - 1) as u8;

    pub fn palette(&self) -> &[u32] {
        self.palette
    }

    /// Palette colour of pixel `(x, y)` of `src`.
    #[inline(always)]
    fn lookup(&self, src: &ImageView<'_, Self>, x: usize, y: usize) -> u32 {
        let byte = src.pixel_bytes(x, y)[0];
        let shift = 8 - BPP - (x * BPP) % 8;
        self.palette[((byte >> shift) & Self::MASK) as usize]
    }
}

impl<const BPP: usize> PixelFormat for PackedIndex<'_, BPP> {
    const BYTES_PER_PIXEL: usize = 1;
    const BITS_PER_PIXEL: usize = BPP;
    const NAME: &'static str = match BPP {
        1 => "INDEX1",
        2 => "INDEX2",
        _ => "INDEX4",
    };
}

/// RGB565 colour plane paired with a separate [`Opa8`] opacity plane of the
/// same size.
///
/// The colour is filtered with 6-bit taps and the opacity with 8-bit taps.
#[derive(Copy, Clone, Debug)]
pub struct Rgb565A8<'a> {
    opa: ImageView<'a, Opa8>,
}

impl<'a> Rgb565A8<'a> {
    pub const fn new(opa: ImageView<'a, Opa8>) -> Self {
        Self { opa }
    }

    pub fn opacity(&self) -> &ImageView<'a, Opa8> {
        &self.opa
    }
}

impl PixelFormat for Rgb565A8<'_> {
    const BYTES_PER_PIXEL: usize = 2;
    const NAME: &'static str = "RGB565A8";

    fn check_planes(&self, width: usize, height: usize) -> Result<()> {
        let plane = (self.opa.width(), self.opa.height());
        if plane != (width, height) {
            return Err(TransformError::PlaneMismatch {
                width,
                height,
                plane_width: plane.0,
                plane_height: plane.1,
            });
        }
        Ok(())
    }

    fn region(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Self> {
        Ok(Self { opa: self.opa.region(x, y, width, height)? })
    }
}

/// Opaque RGB565 colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb565Sample(pub u16);

/// RGB565 colour with 8-bit alpha.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Argb8565Sample {
    pub rgb: u16,
    pub a: u8,
}

/// 24-bit `a6 r6 g6 b6` word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Argb6666Sample(pub u32);

/// Straight-alpha ARGB8888.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Argb8888Sample(pub u32);

/// Opaque `0x00RRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb888Sample(pub u32);

byte_source!(Rgb565 => Rgb565Sample, TAP_BITS_6, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (Rgb565::read(p00), Rgb565::read(p10), Rgb565::read(p01), Rgb565::read(p11));
    Rgb565Sample(bilinear_rgb565(c00, c10, c01, c11, xt, yt, TAP_BITS_6))
});

byte_source!(Argb8565 => Argb8565Sample, TAP_BITS_6, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (rgb, a) = bilinear_argb8565(
        Argb8565::read(p00),
        Argb8565::read(p10),
        Argb8565::read(p01),
        Argb8565::read(p11),
        xt,
        yt,
        TAP_BITS_6,
    );
    Argb8565Sample { rgb, a }
});

byte_source!(Argb6666 => Argb6666Sample, TAP_BITS_6, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (Argb6666::read(p00), Argb6666::read(p10), Argb6666::read(p01), Argb6666::read(p11));
    Argb6666Sample(bilinear_argb6666(c00, c10, c01, c11, xt, yt, TAP_BITS_6))
});

byte_source!(Argb8888 => Argb8888Sample, TAP_BITS_8, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (Argb8888::read(p00), Argb8888::read(p10), Argb8888::read(p01), Argb8888::read(p11));
    Argb8888Sample(bilinear_argb8888(c00, c10, c01, c11, xt, yt, TAP_BITS_8))
});

byte_source!(Xrgb8888 => Rgb888Sample, TAP_BITS_8, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (Argb8888::read(p00), Argb8888::read(p10), Argb8888::read(p01), Argb8888::read(p11));
    Rgb888Sample(bilinear_rgb888(c00, c10, c01, c11, xt, yt, TAP_BITS_8))
});

byte_source!(Rgb888 => Rgb888Sample, TAP_BITS_8, |_fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (Rgb888::read(p00), Rgb888::read(p10), Rgb888::read(p01), Rgb888::read(p11));
    Rgb888Sample(bilinear_rgb888(c00, c10, c01, c11, xt, yt, TAP_BITS_8))
});

byte_source!(A8 => Argb8888Sample, TAP_BITS_8, |fmt, p00, p10, p01, p11, xt, yt| {
    let coverage = bilinear_a8(p00[0], p10[0], p01[0], p11[0], xt, yt, TAP_BITS_8);
    Argb8888Sample(tint_a8(fmt.color, coverage))
});

byte_source!(Index8<'_> => Argb8888Sample, TAP_BITS_8, |fmt, p00, p10, p01, p11, xt, yt| {
    let (c00, c10, c01, c11) = (fmt.lookup(p00), fmt.lookup(p10), fmt.lookup(p01), fmt.lookup(p11));
    Argb8888Sample(bilinear_argb8888(c00, c10, c01, c11, xt, yt, TAP_BITS_8))
});

impl<const BPP: usize> SourceFormat for PackedIndex<'_, BPP> {
    type Sample = Argb8888Sample;
    const TAP_BITS: u32 = TAP_BITS_8;

    #[inline(always)]
    fn sample(&self, src: &ImageView<'_, Self>, b: &Block) -> Argb8888Sample {
        let (xt, yt) = b.taps(Self::TAP_BITS);
        Argb8888Sample(bilinear_argb8888(
            self.lookup(src, b.x0, b.y0),
            self.lookup(src, b.x1, b.y0),
            self.lookup(src, b.x0, b.y1),
            self.lookup(src, b.x1, b.y1),
            xt,
            yt,
            Self::TAP_BITS,
        ))
    }
}

impl SourceFormat for Rgb565A8<'_> {
    type Sample = Argb8565Sample;
    const TAP_BITS: u32 = TAP_BITS_6;

    #[inline(always)]
    fn sample(&self, src: &ImageView<'_, Self>, b: &Block) -> Argb8565Sample {
        let [p00, p10, p01, p11] = src.block_bytes(b);
        let (xt, yt) = b.taps(Self::TAP_BITS);
        let rgb = bilinear_rgb565(
            Rgb565::read(p00),
            Rgb565::read(p10),
            Rgb565::read(p01),
            Rgb565::read(p11),
            xt,
            yt,
            Self::TAP_BITS,
        );

        let opa = |x, y| self.opa.pixel_bytes(x, y)[0];
        let (xt, yt) = b.taps(TAP_BITS_8);
        let a = bilinear_a8(
            opa(b.x0, b.y0),
            opa(b.x1, b.y0),
            opa(b.x0, b.y1),
            opa(b.x1, b.y1),
            xt,
            yt,
            TAP_BITS_8,
        );
        Argb8565Sample { rgb, a }
    }
}

impl DestFormat for Rgb565 {}
impl DestFormat for Argb8888 {}
impl DestFormat for Rgb888 {}

/// Runs an ARGB8888 blend against an opaque RGB888 pixel.
#[inline(always)]
fn blend_into_rgb888(dst: &mut [u8], blend: impl FnOnce(u32) -> u32) {
    let d = Rgb888::read(dst) | 0xff000000;
    Rgb888::write(dst, blend(d));
}

impl Composite<Rgb565> for Rgb565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Rgb565::write(dst, self.0);
    }
}

impl Composite<Argb8888> for Rgb565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Argb8888::write(dst, rgb565_to_argb8888(self.0));
    }
}

impl Composite<Rgb888> for Rgb565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Rgb888::write(dst, rgb565_to_argb8888(self.0));
    }
}

impl Composite<Rgb565> for Argb8565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Rgb565::read(dst);
        Rgb565::write(dst, blend_rgb565_over_rgb565(d, self.rgb, self.a));
    }
}

impl Composite<Argb8888> for Argb8565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Argb8888::read(dst);
        Argb8888::write(dst, blend_rgb565_over_argb8888(d, self.rgb, self.a));
    }
}

impl Composite<Rgb888> for Argb8565Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        blend_into_rgb888(dst, |d| blend_rgb565_over_argb8888(d, self.rgb, self.a));
    }
}

impl Composite<Rgb565> for Argb6666Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Rgb565::read(dst);
        Rgb565::write(dst, blend_argb6666_over_rgb565(d, self.0));
    }
}

impl Composite<Argb8888> for Argb6666Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Argb8888::read(dst);
        Argb8888::write(dst, blend_argb6666_over_argb8888(d, self.0));
    }
}

impl Composite<Rgb888> for Argb6666Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        blend_into_rgb888(dst, |d| blend_argb6666_over_argb8888(d, self.0));
    }
}

impl Composite<Rgb565> for Argb8888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Rgb565::read(dst);
        Rgb565::write(dst, blend_argb8888_over_rgb565(d, self.0));
    }
}

impl Composite<Argb8888> for Argb8888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        let d = Argb8888::read(dst);
        Argb8888::write(dst, blend_argb8888_over_argb8888(d, self.0));
    }
}

impl Composite<Rgb888> for Argb8888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        blend_into_rgb888(dst, |d| blend_argb8888_over_argb8888(d, self.0));
    }
}

impl Composite<Rgb565> for Rgb888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Rgb565::write(dst, argb8888_to_rgb565(self.0));
    }
}

impl Composite<Argb8888> for Rgb888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Argb8888::write(dst, self.0 | 0xff000000);
    }
}

impl Composite<Rgb888> for Rgb888Sample {
    #[inline(always)]
    fn composite(self, dst: &mut [u8]) {
        Rgb888::write(dst, self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::fixed16;

    fn composite_into<D: DestFormat, S: Composite<D>>(sample: S, dst: &[u8]) -> Vec<u8> {
        let mut out = dst.to_vec();
        sample.composite(&mut out);
        out
    }

    #[test]
    fn test_byte_layouts() {
        assert_eq!(Rgb565::read(&[0x34, 0x12]), 0x1234);
        assert_eq!(Argb8565::encode(0xf81f, 0x80), [0x1f, 0xf8, 0x80]);
        assert_eq!(Argb8565::read(&[0x1f, 0xf8, 0x80]), (0xf81f, 0x80));
        assert_eq!(Argb6666::encode(63, 0, 0, 1), [0x01, 0x00, 0xfc]);
        assert_eq!(Argb6666::read(&Argb6666::encode(63, 0, 0, 1)), 0xfc0001);
        assert_eq!(Argb8888::read(&[0x44, 0x33, 0x22, 0x11]), 0x11223344);
        assert_eq!(Rgb888::read(&[0x56, 0x34, 0x12]), 0x123456);

        let mut px = [0u8; 3];
        Rgb888::write(&mut px, 0xff123456);
        assert_eq!(px, [0x56, 0x34, 0x12]);
    }

    /// Samples a 2x2 image given as `p00, p10, p01, p11` at taps `frac`.
    fn sample_quad<S: SourceFormat>(fmt: S, pixels: [&[u8]; 4], frac: (i32, i32)) -> S::Sample {
        let [p00, p10, p01, p11] = pixels;
        let data = [p00, p10, p01, p11].concat();
        let view = ImageView::packed(&data, 2, 2, fmt).unwrap();
        let block = Block { x0: 0, y0: 0, x1: 1, y1: 1, frac_x: frac.0, frac_y: frac.1 };
        fmt.sample(&view, &block)
    }

    #[test]
    fn test_block_clamps_neighbours() {
        let block = Block::at(0x2_8000, 0x1_0000, 3, 2);
        assert_eq!(block, Block { x0: 2, y0: 1, x1: 2, y1: 1, frac_x: 0x8000, frac_y: 0 });
        assert_eq!(block.taps(8), (128, 0));
        assert_eq!(block.taps(6), (32, 0));
    }

    #[test]
    fn test_zero_taps_sample_top_left() {
        let red = 0xf800u16.to_le_bytes();
        let blue = 0x001fu16.to_le_bytes();
        assert_eq!(sample_quad(Rgb565, [&red, &blue, &blue, &blue], (0, 0)), Rgb565Sample(0xf800));

        let px = [0x10, 0x20, 0x30, 0x40];
        let other = [0xff; 4];
        assert_eq!(
            sample_quad(Argb8888, [&px, &other, &other, &other], (0, 0)),
            Argb8888Sample(0x40302010)
        );
        assert_eq!(
            sample_quad(Xrgb8888, [&px, &other, &other, &other], (0, 0)),
            Rgb888Sample(0x302010)
        );
    }

    #[test]
    fn test_a8_is_tinted() {
        let fmt = A8::new(0xff00ff00);
        assert_eq!(
            sample_quad(fmt, [&[255], &[0], &[0], &[0]], (0, 0)),
            Argb8888Sample(0xff00ff00)
        );
        assert_eq!(sample_quad(fmt, [&[0], &[0], &[0], &[0]], (0, 0)), Argb8888Sample(0x0000ff00));

        let translucent = A8::new(0x80ff0000);
        assert_eq!(
            sample_quad(translucent, [&[255], &[255], &[255], &[255]], (10 << 8, 20 << 8)),
            Argb8888Sample(0x7fff0000)
        );
    }

    #[test]
    fn test_index8_looks_up_palette() {
        let mut palette = [0u32; 256];
        palette[1] = 0xff0000ff;
        palette[2] = 0x80ffffff;
        let fmt = Index8::new(&palette);
        assert_eq!(sample_quad(fmt, [&[1], &[2], &[2], &[2]], (0, 0)), Argb8888Sample(0xff0000ff));
        assert_eq!(sample_quad(fmt, [&[1], &[2], &[1], &[2]], (0xff00, 0)).0 >> 24, 0x80);
    }

    #[test]
    fn test_packed_index_reads_most_significant_bits_first() {
        let palette: Vec<u32> = (0..16).map(|i| 0xff000000 | i).collect();
        // Row of 8 one-bit pixels 1,0,1,1,0,0,0,1.
        let data = [0b1011_0001];
        let bits = ImageView::packed(&data, 8, 1, Index1::new(&palette).unwrap()).unwrap();
        let ones: Vec<u32> = (0..8)
            .map(|x| bits.format().sample(&bits, &Block::at(fixed16(x) as i64, 0, 8, 1)).0 & 0xff)
            .collect();
        assert_eq!(ones, [1, 0, 1, 1, 0, 0, 0, 1]);

        let data = [0b11_10_01_00];
        let pairs = ImageView::packed(&data, 4, 1, Index2::new(&palette).unwrap()).unwrap();
        let sample = |x| pairs.format().sample(&pairs, &Block::at(fixed16(x) as i64, 0, 4, 1)).0 & 0xff;
        assert_eq!([sample(0), sample(1), sample(2), sample(3)], [3, 2, 1, 0]);

        let data = [0xa5, 0xf0];
        let nibbles = ImageView::packed(&data, 3, 1, Index4::new(&palette).unwrap()).unwrap();
        let sample = |x| nibbles.format().sample(&nibbles, &Block::at(fixed16(x) as i64, 0, 3, 1)).0 & 0xff;
        assert_eq!([sample(0), sample(1), sample(2)], [0xa, 0x5, 0xf]);
    }

    #[test]
    fn test_packed_index_requires_full_palette() {
        let palette = [0u32; 3];
        assert!(Index1::new(&palette).is_ok());
        assert_eq!(
            Index2::new(&palette).unwrap_err(),
            TransformError::PaletteTooShort { len: 3, required: 4 }
        );
        assert_eq!(PackedIndex::<4>::NAME, "INDEX4");
        assert_eq!(Index2::row_bytes(5), 2);
    }

    #[test]
    fn test_rgb565a8_filters_alpha_from_its_own_plane() {
        // Opacity differs per pixel so a wrong neighbour shows up.
        let opa = [0, 64, 128, 255];
        let plane = ImageView::packed(&opa, 2, 2, Opa8).unwrap();
        let colour = [0x1fu8, 0xf8].repeat(4);
        let view = ImageView::packed(&colour, 2, 2, Rgb565A8::new(plane)).unwrap();
        let at = |fx, fy| {
            let block = Block { x0: 0, y0: 0, x1: 1, y1: 1, frac_x: fx, frac_y: fy };
            view.format().sample(&view, &block)
        };
        assert_eq!(at(0, 0), Argb8565Sample { rgb: 0xf81f, a: 0 });
        assert_eq!(at(0xffff, 0).a, 63);
        assert_eq!(at(0, 0xffff).a, 127);
        assert_eq!(at(0xffff, 0xffff).a, 253);
        assert_eq!(at(0x8000, 0x8000).a, 111);
    }

    #[test]
    fn test_composite_table_ends() {
        let dst565 = 0x1234u16.to_le_bytes();
        let dst8888 = 0x11223344u32.to_le_bytes();
        let dst888 = [0x44, 0x33, 0x22];

        // Transparent samples leave every destination untouched.
        let clear8565 = Argb8565Sample { rgb: 0xffff, a: 0 };
        assert_eq!(composite_into::<Rgb565, _>(clear8565, &dst565), dst565);
        assert_eq!(composite_into::<Argb8888, _>(clear8565, &dst8888), dst8888);
        assert_eq!(composite_into::<Rgb888, _>(clear8565, &dst888), dst888);

        let clear8888 = Argb8888Sample(0x00ffffff);
        assert_eq!(composite_into::<Rgb565, _>(clear8888, &dst565), dst565);
        assert_eq!(composite_into::<Argb8888, _>(clear8888, &dst8888), dst8888);
        assert_eq!(composite_into::<Rgb888, _>(clear8888, &dst888), dst888);

        // Opaque samples overwrite with the converted colour.
        let white6666 = Argb6666Sample(0xffffff);
        assert_eq!(composite_into::<Rgb565, _>(white6666, &dst565), [0xff, 0xff]);
        assert_eq!(composite_into::<Argb8888, _>(white6666, &dst8888), [0xff; 4]);
        assert_eq!(composite_into::<Rgb888, _>(white6666, &dst888), [0xff; 3]);

        let green = Rgb565Sample(0x07e0);
        assert_eq!(composite_into::<Rgb565, _>(green, &dst565), [0xe0, 0x07]);
        assert_eq!(composite_into::<Argb8888, _>(green, &dst8888), [0x00, 0xff, 0x00, 0xff]);
        assert_eq!(composite_into::<Rgb888, _>(green, &dst888), [0x00, 0xff, 0x00]);

        let teal = Rgb888Sample(0x00a0b0);
        assert_eq!(
            composite_into::<Argb8888, _>(teal, &dst8888),
            0xff00a0b0u32.to_le_bytes()
        );
        assert_eq!(composite_into::<Rgb888, _>(teal, &dst888), [0xb0, 0xa0, 0x00]);
        assert_eq!(
            composite_into::<Rgb565, _>(teal, &dst565),
            argb8888_to_rgb565(0x00a0b0).to_le_bytes()
        );
    }
}
