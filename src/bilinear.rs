//! Bilinear sample kernels.
//!
//! Every kernel takes the 2x2 neighbourhood `c00` (top-left), `c10` (right),
//! `c01` (below) and `c11` (diagonal) plus horizontal and vertical taps with
//! `bits` bits of precision. Channels are packed into lanes with a zero gap
//! between them so that two channels are weighted per multiply.

/// Fractional bits kept by the 16-bit formats.
pub const TAP_BITS_6: u32 = 6;

/// Fractional bits kept by the 24 and 32-bit formats.
pub const TAP_BITS_8: u32 = 8;

/// Quantizes a fixed-point-16 fraction to a `bits`-bit tap.
#[inline(always)]
pub const fn tap(frac: i32, bits: u32) -> u32 {
    (frac as u32 & 0xffff) >> (16 - bits)
}

/// Weights of the four neighbours. They always sum to `1 << bits`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Weights {
    pub w00: u32,
    pub w10: u32,
    pub w01: u32,
    pub w11: u32,
}

impl Weights {
    #[inline(always)]
    pub fn new(xt: u32, yt: u32, bits: u32) -> Self {
        let w11 = (xt * yt) >> bits;
        let w10 = xt - w11;
        let w01 = yt - w11;
        let w00 = (1 << bits) - w10 - w01 - w11;
        Self { w00, w10, w01, w11 }
    }

    /// Weighted sum of one lane group.
    #[inline(always)]
    fn apply(&self, c00: u32, c10: u32, c01: u32, c11: u32) -> u32 {
        c00 * self.w00 + c10 * self.w10 + c01 * self.w01 + c11 * self.w11
    }
}

#[inline(always)]
pub fn bilinear_rgb565(c00: u16, c10: u16, c01: u16, c11: u16, xt: u32, yt: u32, bits: u32) -> u16 {
    debug_assert!(bits <= TAP_BITS_6);
    let w = Weights::new(xt, yt, bits);
    let lane = |mask: u32| {
        w.apply(c00 as u32 & mask, c10 as u32 & mask, c01 as u32 & mask, c11 as u32 & mask)
            >> bits
            & mask
    };
    (lane(0xf81f) | lane(0x07e0)) as u16
}

/// RGB565 colour with a separate 8-bit alpha; the alpha is filtered as
/// its own channel.
#[inline(always)]
pub fn bilinear_argb8565(
    c00: (u16, u8),
    c10: (u16, u8),
    c01: (u16, u8),
    c11: (u16, u8),
    xt: u32,
    yt: u32,
    bits: u32,
) -> (u16, u8) {
    let rgb = bilinear_rgb565(c00.0, c10.0, c01.0, c11.0, xt, yt, bits);
    let w = Weights::new(xt, yt, bits);
    let a = w.apply(c00.1 as u32, c10.1 as u32, c01.1 as u32, c11.1 as u32) >> bits;
    (rgb, a as u8)
}

/// 24-bit `a6 r6 g6 b6` words.
#[inline(always)]
pub fn bilinear_argb6666(c00: u32, c10: u32, c01: u32, c11: u32, xt: u32, yt: u32, bits: u32) -> u32 {
    debug_assert!(bits <= TAP_BITS_6);
    let w = Weights::new(xt, yt, bits);
    let lane = |mask: u32| w.apply(c00 & mask, c10 & mask, c01 & mask, c11 & mask) >> bits & mask;
    lane(0x03f03f) | lane(0xfc0fc0)
}

#[inline(always)]
pub fn bilinear_argb8888(c00: u32, c10: u32, c01: u32, c11: u32, xt: u32, yt: u32, bits: u32) -> u32 {
    debug_assert!(bits <= TAP_BITS_8);
    let w = Weights::new(xt, yt, bits);
    let rb = w.apply(c00 & 0x00ff00ff, c10 & 0x00ff00ff, c01 & 0x00ff00ff, c11 & 0x00ff00ff);
    let ag = w.apply(
        c00 >> 8 & 0x00ff00ff,
        c10 >> 8 & 0x00ff00ff,
        c01 >> 8 & 0x00ff00ff,
        c11 >> 8 & 0x00ff00ff,
    );
    (rb >> bits & 0x00ff00ff) | ((ag >> bits & 0x00ff00ff) << 8)
}

/// `0x00RRGGBB` words; the top byte of the inputs is ignored.
#[inline(always)]
pub fn bilinear_rgb888(c00: u32, c10: u32, c01: u32, c11: u32, xt: u32, yt: u32, bits: u32) -> u32 {
    debug_assert!(bits <= TAP_BITS_8);
    let w = Weights::new(xt, yt, bits);
    let rb = w.apply(c00 & 0x00ff00ff, c10 & 0x00ff00ff, c01 & 0x00ff00ff, c11 & 0x00ff00ff);
    let g = w.apply(c00 >> 8 & 0xff, c10 >> 8 & 0xff, c01 >> 8 & 0xff, c11 >> 8 & 0xff);
    (rb >> bits & 0x00ff00ff) | ((g >> bits) << 8)
}

#[inline(always)]
pub fn bilinear_a8(c00: u8, c10: u8, c01: u8, c11: u8, xt: u32, yt: u32, bits: u32) -> u8 {
    debug_assert!(bits <= TAP_BITS_8);
    let w = Weights::new(xt, yt, bits);
    (w.apply(c00 as u32, c10 as u32, c01 as u32, c11 as u32) >> bits) as u8
}
