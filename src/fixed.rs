//! Fixed-point primitives.
//!
//! Coordinates are carried as `i32` with 16 fractional bits. Integer source
//! coordinate `n` addresses the pixel whose top-left corner sits at `n`;
//! `px_fixed16(n)` is that pixel's centre.
//!
//! Trigonometry uses 30 fractional bits (`sin30` / `cos30`) with angles in
//! tenths of a degree, the unit used throughout the crate.

/// Fractional bits of a [`Fixed16`] value.
pub const FRAC_BITS: u32 = 16;

/// Fixed-point number with 16 fractional bits.
pub type Fixed16 = i32;

/// One whole unit in fixed-point-30.
pub const ONE_FIXED30: i64 = 1 << 30;

/// Full turn in tenths of a degree.
pub const FULL_TURN: u16 = 3600;

const QUARTER_TURN: u16 = 900;

#[inline(always)]
pub const fn to_fixed(x: i32, fraction_bits: u32) -> i32 {
    x << fraction_bits
}

#[inline(always)]
pub const fn fixed16(x: i32) -> Fixed16 {
    to_fixed(x, FRAC_BITS)
}

/// Centre of pixel `x` in fixed-point-16.
#[inline(always)]
pub const fn px_fixed16(x: i32) -> Fixed16 {
    fixed16(x) + (fixed16(1) >> 1)
}

/// Rounds towards negative infinity.
#[inline(always)]
pub const fn floor_fixed(x: i32, fraction_bits: u32) -> i32 {
    x >> fraction_bits
}

/// Rounds towards positive infinity.
#[inline(always)]
pub const fn ceil_fixed(x: i32, fraction_bits: u32) -> i32 {
    (x + ((1 << fraction_bits) - 1)) >> fraction_bits
}

/// Rounds to nearest, halves towards positive infinity.
#[inline(always)]
pub const fn round_fixed(x: i32, fraction_bits: u32) -> i32 {
    (x + (1 << (fraction_bits - 1))) >> fraction_bits
}

#[inline(always)]
pub const fn floor_fixed16(x: Fixed16) -> i32 {
    floor_fixed(x, FRAC_BITS)
}

/// Fractional part of `x`, always in `0..1 << FRAC_BITS`.
#[inline(always)]
pub const fn frac_fixed16(x: Fixed16) -> i32 {
    x & ((1 << FRAC_BITS) - 1)
}

/// Integer division rounding towards negative infinity for every sign
/// combination of `a` and `b`.
///
/// Panics if `b == 0`.
#[inline]
pub fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Integer division rounding towards positive infinity for every sign
/// combination of `a` and `b`.
///
/// Panics if `b == 0`.
#[inline]
pub fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

#[inline]
pub(crate) fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[inline]
pub(crate) fn saturate_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Returns `(sin, cos)` of `angle` (tenths of a degree) in fixed-point-30.
///
/// Multiples of 90 degrees are exact; the rest is reduced to the first
/// quadrant so that symmetric angles produce symmetric values.
pub fn sin_cos30(angle: u16) -> (i32, i32) {
    let angle = angle % FULL_TURN;
    let quadrant = angle / QUARTER_TURN;
    let rem = angle % QUARTER_TURN;

    let (s, c) = if rem == 0 {
        (0, ONE_FIXED30 as i32)
    } else {
        let radians = (rem as f64 / 10.0).to_radians();
        let scale = ONE_FIXED30 as f64;
        (
            (radians.sin() * scale).round() as i32,
            (radians.cos() * scale).round() as i32,
        )
    };

    match quadrant {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    }
}

/// Sine of `angle` (tenths of a degree) in fixed-point-30.
pub fn sin30(angle: u16) -> i32 {
    sin_cos30(angle).0
}

/// Cosine of `angle` (tenths of a degree) in fixed-point-30.
pub fn cos30(angle: u16) -> i32 {
    sin_cos30(angle).1
}

/// Rotates `(dx, dy)` clockwise (y axis pointing down) by `angle`.
///
/// Products are formed in `i128`; results beyond `i64` saturate.
#[inline]
fn rotate30(dx: i64, dy: i64, angle: u16) -> (i64, i64) {
    let (sin, cos) = sin_cos30(angle);
    let (dx, dy, sin, cos) = (dx as i128, dy as i128, sin as i128, cos as i128);
    let half = (ONE_FIXED30 >> 1) as i128;
    (
        saturate_i64((dx * cos - dy * sin + half) >> 30),
        saturate_i64((dx * sin + dy * cos + half) >> 30),
    )
}

#[inline]
fn scale(d: i64, scale: u32, scale_bits: u16) -> i64 {
    saturate_i64((d as i128 * scale as i128) >> scale_bits)
}

/// [`rotate_then_scale`] on 64-bit fixed-point-16 coordinates.
pub(crate) fn rotate_then_scale_wide(
    (x, y): (i64, i64),
    (pivot_x, pivot_y): (i64, i64),
    angle: u16,
    scale_x: u32,
    scale_y: u32,
    scale_bits: u16,
) -> (i64, i64) {
    let (rx, ry) = rotate30(x.saturating_sub(pivot_x), y.saturating_sub(pivot_y), angle);
    (
        pivot_x.saturating_add(scale(rx, scale_x, scale_bits)),
        pivot_y.saturating_add(scale(ry, scale_y, scale_bits)),
    )
}

/// [`scale_then_rotate`] on 64-bit fixed-point-16 coordinates.
pub(crate) fn scale_then_rotate_wide(
    (x, y): (i64, i64),
    (pivot_x, pivot_y): (i64, i64),
    angle: u16,
    scale_x: u32,
    scale_y: u32,
    scale_bits: u16,
) -> (i64, i64) {
    let sx = scale(x.saturating_sub(pivot_x), scale_x, scale_bits);
    let sy = scale(y.saturating_sub(pivot_y), scale_y, scale_bits);
    let (rx, ry) = rotate30(sx, sy, angle);
    (pivot_x.saturating_add(rx), pivot_y.saturating_add(ry))
}

/// Rotates `(x, y)` around the pivot, then scales the rotated offset.
///
/// All coordinates are fixed-point-16; `scale_x`/`scale_y` carry
/// `scale_bits` fractional bits. This is the order needed to walk a
/// scale-then-rotate placement backwards. Results outside `i32` saturate.
pub fn rotate_then_scale(
    (x, y): (i32, i32),
    (pivot_x, pivot_y): (i32, i32),
    angle: u16,
    scale_x: u32,
    scale_y: u32,
    scale_bits: u16,
) -> (i32, i32) {
    let (x, y) = rotate_then_scale_wide(
        (x as i64, y as i64),
        (pivot_x as i64, pivot_y as i64),
        angle,
        scale_x,
        scale_y,
        scale_bits,
    );
    (saturate_i32(x), saturate_i32(y))
}

/// Scales the offset of `(x, y)` from the pivot, then rotates it.
///
/// Forward counterpart of [`rotate_then_scale`].
pub fn scale_then_rotate(
    (x, y): (i32, i32),
    (pivot_x, pivot_y): (i32, i32),
    angle: u16,
    scale_x: u32,
    scale_y: u32,
    scale_bits: u16,
) -> (i32, i32) {
    let (x, y) = scale_then_rotate_wide(
        (x as i64, y as i64),
        (pivot_x as i64, pivot_y as i64),
        angle,
        scale_x,
        scale_y,
        scale_bits,
    );
    (saturate_i32(x), saturate_i32(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_conversions() {
        assert_eq!(fixed16(1), 65536);
        assert_eq!(fixed16(-2), -131072);
        assert_eq!(px_fixed16(0), 32768);
        assert_eq!(px_fixed16(3), 3 * 65536 + 32768);

        assert_eq!(floor_fixed16(fixed16(5) + 1), 5);
        assert_eq!(floor_fixed16(-1), -1);
        assert_eq!(frac_fixed16(-1), 65535);
        assert_eq!(frac_fixed16(fixed16(-3) + 7), 7);

        assert_eq!(ceil_fixed(fixed16(2) + 1, 16), 3);
        assert_eq!(ceil_fixed(fixed16(2), 16), 2);
        assert_eq!(round_fixed(fixed16(2) + 32768, 16), 3);
        assert_eq!(round_fixed(fixed16(2) + 32767, 16), 2);
        assert_eq!(round_fixed(fixed16(-2) - 32768, 16), -2);
    }

    #[test]
    fn test_floor_ceil_div_all_signs() {
        let cases = [
            (7, 2),
            (-7, 2),
            (7, -2),
            (-7, -2),
            (6, 3),
            (-6, 3),
            (0, 5),
            (0, -5),
            (1, 65536),
            (-1, 65536),
            (-65535, -65536),
        ];
        for (a, b) in cases {
            let exact = a as f64 / b as f64;
            assert_eq!(floor_div(a, b), exact.floor() as i64, "floor {a}/{b}");
            assert_eq!(ceil_div(a, b), exact.ceil() as i64, "ceil {a}/{b}");
        }
    }

    #[test]
    fn test_truncating_division_would_differ() {
        // -1 / 2 truncates to 0; floor is -1.
        assert_eq!(-1_i64 / 2, 0);
        assert_eq!(floor_div(-1, 2), -1);
        assert_eq!(ceil_div(1, -2), 0);
        assert_eq!(ceil_div(-1, -2), 1);
    }

    #[test]
    fn test_sin_cos_exact_on_right_angles() {
        let one = ONE_FIXED30 as i32;
        assert_eq!(sin_cos30(0), (0, one));
        assert_eq!(sin_cos30(900), (one, 0));
        assert_eq!(sin_cos30(1800), (0, -one));
        assert_eq!(sin_cos30(2700), (-one, 0));
        assert_eq!(sin_cos30(3600), (0, one));
    }

    #[test]
    fn test_sin_cos_approximate() {
        for angle in (0..3600).step_by(37) {
            let radians = (angle as f64 / 10.0).to_radians();
            let s = sin30(angle) as f64 / ONE_FIXED30 as f64;
            let c = cos30(angle) as f64 / ONE_FIXED30 as f64;
            assert!((s - radians.sin()).abs() < 1e-8, "sin {angle}");
            assert!((c - radians.cos()).abs() < 1e-8, "cos {angle}");
        }
    }

    #[test]
    fn test_rotate_then_scale_quarter_turn_is_clockwise() {
        let (x, y) = rotate_then_scale((fixed16(1), 0), (0, 0), 900, 1, 1, 0);
        assert_eq!((x, y), (0, fixed16(1)));

        let (x, y) = rotate_then_scale(
            (fixed16(3), fixed16(2)),
            (fixed16(2), fixed16(2)),
            1800,
            1,
            1,
            0,
        );
        assert_eq!((x, y), (fixed16(1), fixed16(2)));
    }

    #[test]
    fn test_rotate_then_scale_applies_scale_after_rotation() {
        // Rotate (1, 0) by 90 degrees to (0, 1), then scale y by 2.
        let (x, y) = rotate_then_scale((fixed16(1), 0), (0, 0), 900, 256, 512, 8);
        assert_eq!((x, y), (0, fixed16(2)));

        // Scaling first would have stretched the x offset instead.
        let (x, y) = scale_then_rotate((fixed16(1), 0), (0, 0), 900, 256, 512, 8);
        assert_eq!((x, y), (0, fixed16(1)));
    }

    #[test]
    fn test_extreme_scales_saturate_instead_of_overflowing() {
        // 65535x with no fractional bits pushes the rotation products past i64.
        let (x, y) = scale_then_rotate_wide((fixed16(4) as i64, 0), (0, 0), 0, 65535, 1, 0);
        assert_eq!((x, y), (fixed16(4) as i64 * 65535, 0));

        let (x, y) = scale_then_rotate((fixed16(4), fixed16(4)), (0, 0), 450, 65535, 65535, 0);
        assert_eq!(y, i32::MAX);
        assert!(x.abs() < fixed16(1));

        let (_, y) = rotate_then_scale_wide((i64::MAX, i64::MAX), (0, 0), 450, u32::MAX, u32::MAX, 0);
        assert_eq!(y, i64::MAX);
    }
}
