//! Per-scanline clipping against the source image bounds.
//!
//! Along a destination row the source coordinate advances linearly, so the
//! set of columns whose sample point lands inside the source is a single
//! interval. [`clip_range`] finds that interval exactly with integer
//! arithmetic, which lets the blit loop fetch pixels without any per-pixel
//! bounds checks.

use crate::fixed::{ceil_div, fixed16, floor_div};

/// Inclusive range of destination columns on one scanline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanlineRange {
    pub x_min: i32,
    pub x_max: i32,
}

impl ScanlineRange {
    /// Columns `x_min..=x_max`.
    pub const fn new(x_min: i32, x_max: i32) -> Self {
        Self { x_min, x_max }
    }

    /// True when no column is left.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        if self.is_empty() { 0 } else { (self.x_max as i64 - self.x_min as i64) as usize + 1 }
    }

    /// Narrows the range to the columns whose sample point lies inside a
    /// `src_w` x `src_h` source.
    ///
    /// `start` is the source coordinate (fixed-point-16) at column `x_min`
    /// and `step` the per-column increment.
    pub fn clip(
        self,
        src_w: usize,
        src_h: usize,
        start: (i64, i64),
        step: (i64, i64),
    ) -> Self {
        let base = self.x_min as i64;
        let mut lo = base;
        let mut hi = self.x_max as i64;

        for (dim, start, step) in [(src_w, start.0, step.0), (src_h, start.1, step.1)] {
            match axis_bounds(dim, start, step) {
                Some((axis_lo, axis_hi)) => {
                    lo = lo.max(base + axis_lo);
                    hi = hi.min(base + axis_hi);
                }
                None => return Self::new(self.x_min, self.x_min - 1),
            }
        }

        if lo > hi {
            return Self::new(self.x_min, self.x_min - 1);
        }
        Self::new(lo as i32, hi as i32)
    }
}

/// Offsets `i` (relative to the range start) for which
/// `0 <= start + i * step <= fixed16(dim - 1)`.
///
/// `None` means no offset qualifies. A zero step leaves both sides
/// effectively unbounded.
fn axis_bounds(dim: usize, start: i64, step: i64) -> Option<(i64, i64)> {
    if dim == 0 {
        return None;
    }
    let last = fixed16(1) as i64 * (dim as i64 - 1);

    if step > 0 {
        Some((ceil_div(-start, step), floor_div(last - start, step)))
    } else if step < 0 {
        Some((ceil_div(last - start, step), floor_div(-start, step)))
    } else if (0..=last).contains(&start) {
        Some((i64::MIN / 2, i64::MAX / 2))
    } else {
        None
    }
}

/// Clips `[x_min, x_max]` to the columns that sample inside the source.
///
/// `(start_x, start_y)` is the fixed-point-16 source coordinate at `x_min`
/// and `(step_x, step_y)` its per-column increment. The returned range is
/// empty (`x_min' > x_max'`) when no column qualifies.
#[allow(clippy::too_many_arguments)]
pub fn clip_range(
    x_min: i32,
    x_max: i32,
    src_w: usize,
    src_h: usize,
    start_x: i64,
    start_y: i64,
    step_x: i64,
    step_y: i64,
) -> (i32, i32) {
    let range = ScanlineRange::new(x_min, x_max).clip(
        src_w,
        src_h,
        (start_x, start_y),
        (step_x, step_y),
    );
    (range.x_min, range.x_max)
}
