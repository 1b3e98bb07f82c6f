//! Source-over compositing and channel repacking.
//!
//! Alpha is straight (not premultiplied). Every `blend_*` function returns
//! the destination unchanged for a fully transparent source and the
//! converted source colour for a fully opaque one; the `mix_*` functions
//! are the intermediate-alpha formulas and do not special-case the ends.

/// Expands RGB565 to opaque ARGB8888 by replicating the low bits of each
/// channel.
#[inline(always)]
pub const fn rgb565_to_argb8888(c: u16) -> u32 {
    let c = c as u32;
    ((c & 0x1f) << 3)
        | (c & 0x07)
        | ((c & 0x07e0) << 5)
        | ((c & 0x0060) << 3)
        | ((c & 0xf800) << 8)
        | ((c & 0x3800) << 5)
        | 0xff000000
}

/// Keeps the top bits of each channel; alpha is dropped.
#[inline(always)]
pub const fn argb8888_to_rgb565(c: u32) -> u16 {
    (((c & 0xf80000) >> 8) | ((c & 0xfc00) >> 5) | ((c & 0xf8) >> 3)) as u16
}

/// Expands a 24-bit `a6 r6 g6 b6` word to ARGB8888.
#[inline(always)]
pub const fn argb6666_to_argb8888(c: u32) -> u32 {
    const fn expand(v: u32) -> u32 {
        (v << 2) | (v >> 4)
    }
    let b = expand(c & 0x3f);
    let g = expand((c >> 6) & 0x3f);
    let r = expand((c >> 12) & 0x3f);
    let a = expand((c >> 18) & 0x3f);
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Covers `color` with `coverage`, scaling by the colour's own alpha when it
/// is not opaque.
#[inline(always)]
pub const fn tint_a8(color: u32, coverage: u8) -> u32 {
    let color_a = color >> 24;
    let mut opa = coverage as u32;
    if color_a < 255 {
        opa = (opa * color_a) >> 8;
    }
    (color & 0x00ffffff) | (opa << 24)
}

#[inline(always)]
pub const fn mix_rgb565_over_rgb565(dst: u16, src: u16, a: u8) -> u16 {
    let (d, s, a) = (dst as u32, src as u32, a as u32);
    let ra = 255 - a;
    let r = (d >> 11) * ra + (s >> 11) * a;
    let g = (d & 0x07e0) * ra + (s & 0x07e0) * a;
    let b = (d & 0x1f) * ra + (s & 0x1f) * a;
    (((r >> 8) << 11) | ((g >> 8) & 0x07e0) | (b >> 8)) as u16
}

#[inline(always)]
pub const fn blend_rgb565_over_rgb565(dst: u16, src: u16, a: u8) -> u16 {
    match a {
        0 => dst,
        255 => src,
        _ => mix_rgb565_over_rgb565(dst, src, a),
    }
}

#[inline(always)]
pub const fn blend_rgb565_over_argb8888(dst: u32, src: u16, a: u8) -> u32 {
    if a == 0 {
        return dst;
    }
    let s = src as u32;
    let a = a as u32;
    let src_ag = ((s & 0x07e0) >> 3) | ((s & 0x0060) >> 5) | (a << 16);
    let src_rb = ((s & 0xf800) << 5) | (s & 0x1f);
    let src_rb = (src_rb << 3) | (src_rb & 0x00070007);
    if a == 255 {
        return (src_ag << 8) | src_rb;
    }

    let ra = 255 - a;
    let rb = src_rb * a + (dst & 0x00ff00ff) * ra;
    let ag = src_ag * a + ((dst & 0xff00ff00) >> 8) * ra;
    ((rb & 0xff00ff00) >> 8) | (ag & 0xff00ff00)
}

/// Blends a 24-bit `a6 r6 g6 b6` word onto RGB565 in 6-bit precision.
#[inline(always)]
pub const fn blend_argb6666_over_rgb565(dst: u16, src: u32) -> u16 {
    let a = (src >> 18) & 0x3f;
    if a == 0 {
        return dst;
    }
    let b = src & 0x3f;
    let g = (src >> 6) & 0x3f;
    let r = (src >> 12) & 0x3f;
    if a >= 63 {
        return (((r & 0x3e) << 10) | (g << 5) | (b >> 1)) as u16;
    }

    let d = dst as u32;
    let ra = 63 - a;
    let db = (((d & 0x1f) << 1) | (d & 1)) * ra + b * a;
    let dg = ((d & 0x07e0) >> 5) * ra + g * a;
    let dr = (((d & 0xf800) >> 10) | ((d & 0x0800) >> 11)) * ra + r * a;
    (((dr & 0xf80) << 4) | ((dg & 0xfc0) >> 1) | (db >> 7)) as u16
}

#[inline(always)]
pub const fn blend_argb6666_over_argb8888(dst: u32, src: u32) -> u32 {
    blend_argb8888_over_argb8888(dst, argb6666_to_argb8888(src))
}

#[inline(always)]
pub const fn mix_argb8888_over_rgb565(dst: u16, src: u32) -> u16 {
    let d = dst as u32;
    let a = src >> 24;
    let ra = 255 - a;
    let rb = ((d & 0xf800) << 8) | ((d & 0x1f) << 3);
    let rb = (src & 0x00ff00ff) * a + rb * ra;
    let g = (d & 0x07e0) << 5;
    let g = (src & 0xff00) * a + g * ra;
    (((rb >> 16) & 0xf800) | ((rb >> 11) & 0x1f) | ((g >> 13) & 0x07e0)) as u16
}

#[inline(always)]
pub const fn blend_argb8888_over_rgb565(dst: u16, src: u32) -> u16 {
    match src >> 24 {
        0 => dst,
        255 => argb8888_to_rgb565(src),
        _ => mix_argb8888_over_rgb565(dst, src),
    }
}

#[inline(always)]
pub const fn mix_argb8888_over_argb8888(dst: u32, src: u32) -> u32 {
    let a = src >> 24;
    let ra = 255 - a;
    let rb = (src & 0x00ff00ff) * a + (dst & 0x00ff00ff) * ra;
    let ag = ((src & 0xff00ff00) >> 8) * a + ((dst & 0xff00ff00) >> 8) * ra;
    ((rb & 0xff00ff00) >> 8) | (ag & 0xff00ff00)
}

#[inline(always)]
pub const fn blend_argb8888_over_argb8888(dst: u32, src: u32) -> u32 {
    match src >> 24 {
        0 => dst,
        255 => src,
        _ => mix_argb8888_over_argb8888(dst, src),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_expansion_replicates_low_bits() {
        assert_eq!(rgb565_to_argb8888(0xffff), 0xffffffff);
        assert_eq!(rgb565_to_argb8888(0x0000), 0xff000000);
        // r5 = 0b10000, g6 = 0b100001, b5 = 0b00011
        let c = (0b10000 << 11) | (0b100001 << 5) | 0b00011;
        assert_eq!(rgb565_to_argb8888(c), 0xff_80_85_1b);
        assert_eq!(argb8888_to_rgb565(rgb565_to_argb8888(c)), c);
    }

    #[test]
    fn test_argb6666_expansion() {
        assert_eq!(argb6666_to_argb8888(0xffffff), 0xffffffff);
        assert_eq!(argb6666_to_argb8888(0), 0);
        // a = 32, r = 1, g = 62, b = 16
        let c = (32 << 18) | (1 << 12) | (62 << 6) | 16;
        assert_eq!(argb6666_to_argb8888(c), 0x82_04_fb_41);
    }

    #[test]
    fn test_rgb565_over_rgb565() {
        assert_eq!(blend_rgb565_over_rgb565(0x1234, 0xffff, 0), 0x1234);
        assert_eq!(blend_rgb565_over_rgb565(0x1234, 0xffff, 255), 0xffff);
        // Half white over black.
        let mid = blend_rgb565_over_rgb565(0x0000, 0xffff, 128);
        assert_eq!(mid, (15 << 11) | (31 << 5) | 15);
    }

    #[test]
    fn test_rgb565_over_argb8888() {
        assert_eq!(blend_rgb565_over_argb8888(0x11223344, 0xffff, 0), 0x11223344);
        assert_eq!(blend_rgb565_over_argb8888(0x11223344, 0xf800, 255), 0xffff0000);
        assert_eq!(
            blend_rgb565_over_argb8888(0x11223344, 0x07e0, 255),
            rgb565_to_argb8888(0x07e0)
        );
        // Destination alpha is blended too.
        let mid = blend_rgb565_over_argb8888(0xff000000, 0xffff, 128);
        assert_eq!(mid, 0xbe_7f_7f_7f);
    }

    #[test]
    fn test_argb6666_over_rgb565() {
        let opaque_white = 0xffffff;
        let clear = 0x03ffff;
        assert_eq!(blend_argb6666_over_rgb565(0x1234, clear), 0x1234);
        assert_eq!(blend_argb6666_over_rgb565(0x1234, opaque_white), 0xffff);
        // Alpha 32 of 63, white over black.
        let mid = blend_argb6666_over_rgb565(0x0000, (32 << 18) | 0x03ffff);
        assert_eq!(mid >> 11, 15);
        assert_eq!((mid >> 5) & 0x3f, 31);
        assert_eq!(mid & 0x1f, 15);
    }

    #[test]
    fn test_argb6666_over_argb8888() {
        assert_eq!(blend_argb6666_over_argb8888(0x11223344, 0x03ffff), 0x11223344);
        assert_eq!(blend_argb6666_over_argb8888(0x11223344, 0xffffff), 0xffffffff);
    }

    #[test]
    fn test_argb8888_over_rgb565() {
        assert_eq!(blend_argb8888_over_rgb565(0x1234, 0x00ffffff), 0x1234);
        assert_eq!(blend_argb8888_over_rgb565(0x1234, 0xff00ff00), 0x07e0);
        assert_eq!(blend_argb8888_over_rgb565(0x1234, 0xffff0000), 0xf800);
        let mid = blend_argb8888_over_rgb565(0x0000, 0x80ffffff);
        assert_eq!(mid, (15 << 11) | (31 << 5) | 15);
    }

    #[test]
    fn test_argb8888_over_argb8888() {
        assert_eq!(blend_argb8888_over_argb8888(0x11223344, 0x00ffffff), 0x11223344);
        assert_eq!(blend_argb8888_over_argb8888(0x11223344, 0xff010203), 0xff010203);
        let mid = blend_argb8888_over_argb8888(0xff000000, 0x80ffffff);
        assert_eq!(mid, 0xbe_7f_7f_7f);
        assert_eq!(mix_argb8888_over_argb8888(0x00000000, 0x80ffffff) >> 24, 0x40);
    }

    #[test]
    fn test_tint_a8() {
        assert_eq!(tint_a8(0xff123456, 200), 0xc8123456);
        assert_eq!(tint_a8(0x80123456, 255), 0x7f123456);
        assert_eq!(tint_a8(0x00123456, 255), 0x00123456);
    }
}
