//! Inverse affine matrices and the parameters they are built from.

use log::trace;

use crate::error::{Axis, Result, TransformError};
use crate::fixed::{
    FULL_TURN, ceil_div, fixed16, px_fixed16, rotate_then_scale_wide, saturate_i32,
    scale_then_rotate_wide,
};

/// Largest supported number of fractional bits in a scale factor.
pub const MAX_SCALE_BITS: u16 = 15;

/// Maps destination pixel coordinates back to source image coordinates.
///
/// All six coefficients are fixed-point-16:
///
/// ```text
/// src.x = tx + dst.y * shx + dst.x * sx
/// src.y = ty + dst.y * sy  + dst.x * shy
/// ```
///
/// Integer source coordinate `n` is the pixel whose top-left corner is at `n`;
/// pixel-centre offsets are already folded into `tx`/`ty`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AffineMatrix {
    pub tx: i32,
    pub ty: i32,
    pub sx: i32,
    pub shy: i32,
    pub shx: i32,
    pub sy: i32,
}

impl AffineMatrix {
    /// Source equals destination.
    pub const fn identity() -> Self {
        Self {
            tx: 0,
            ty: 0,
            sx: fixed16(1),
            shy: 0,
            shx: 0,
            sy: fixed16(1),
        }
    }

    /// Builds the inverse mapping for an image placed with `params`.
    ///
    /// The placement is scale-then-rotate around the pivot, so the inverse
    /// applies the complementary angle first and the reciprocal scale second.
    pub fn from_params(params: &TransformParams) -> Result<Self> {
        params.validate()?;

        let bits = params.scale_bits;
        let unit = 1u32 << (2 * bits as u32);
        let revert_scale_x = (unit / params.scale_x as u32).max(1);
        let revert_scale_y = (unit / params.scale_y as u32).max(1);
        let revert_angle = FULL_TURN - params.angle;

        let pivot = (
            wide_fixed16(params.img_x as i64 + params.pivot_x as i64),
            wide_fixed16(params.img_y as i64 + params.pivot_y as i64),
        );
        let inverse = |point: (i64, i64), around: (i64, i64)| {
            rotate_then_scale_wide(
                point,
                around,
                revert_angle,
                revert_scale_x,
                revert_scale_y,
                bits,
            )
        };

        let centre = px_fixed16(0) as i64;
        let one = fixed16(1) as i64;
        let (tx, ty) = inverse((centre, centre), pivot);
        let (sx, shy) = inverse((one, 0), (0, 0));
        let (shx, sy) = inverse((0, one), (0, 0));

        let matrix = Self {
            tx: saturate_i32(tx - wide_fixed16(params.img_x as i64) - centre),
            ty: saturate_i32(ty - wide_fixed16(params.img_y as i64) - centre),
            sx: saturate_i32(sx),
            shy: saturate_i32(shy),
            shx: saturate_i32(shx),
            sy: saturate_i32(sy),
        };
        trace!("built {matrix:?} from {params:?}");
        Ok(matrix)
    }

    /// Source coordinate (fixed-point-16) of destination pixel `(x, y)`.
    #[inline]
    pub fn map(&self, x: i32, y: i32) -> (i64, i64) {
        let (x, y) = (x as i64, y as i64);
        (
            self.tx as i64 + y * self.shx as i64 + x * self.sx as i64,
            self.ty as i64 + y * self.sy as i64 + x * self.shy as i64,
        )
    }

    /// Like [`map`](Self::map) for a fixed-point-16 destination coordinate.
    #[inline]
    pub fn map_fixed(&self, fx: i32, fy: i32) -> (i64, i64) {
        let (fx, fy) = (fx as i64, fy as i64);
        (
            self.tx as i64 + ((fy * self.shx as i64 + fx * self.sx as i64) >> 16),
            self.ty as i64 + ((fy * self.sy as i64 + fx * self.shy as i64) >> 16),
        )
    }
}

/// `x` in fixed-point-16 without the `i32` range limit.
#[inline]
fn wide_fixed16(x: i64) -> i64 {
    x << 16
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Placement of a source image on the display.
///
/// `scale_x`/`scale_y` are unsigned fixed point with `scale_bits` fractional
/// bits, so `256` with 8 bits is 1.0. `angle` is clockwise, in tenths of a
/// degree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransformParams {
    /// Display coordinate of the image's top-left corner.
    pub img_x: i16,
    pub img_y: i16,
    /// Pivot relative to the image's top-left corner.
    pub pivot_x: i16,
    pub pivot_y: i16,
    pub angle: u16,
    pub scale_x: u16,
    pub scale_y: u16,
    pub scale_bits: u16,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            img_x: 0,
            img_y: 0,
            pivot_x: 0,
            pivot_y: 0,
            angle: 0,
            scale_x: 1 << 8,
            scale_y: 1 << 8,
            scale_bits: 8,
        }
    }
}

impl TransformParams {
    /// Rejects angles past a full turn, zero scales and too many scale bits.
    pub fn validate(&self) -> Result<()> {
        if self.angle > FULL_TURN {
            return Err(TransformError::InvalidAngle { angle: self.angle });
        }
        if self.scale_bits > MAX_SCALE_BITS {
            return Err(TransformError::InvalidScaleBits { bits: self.scale_bits });
        }
        if self.scale_x == 0 {
            return Err(TransformError::ZeroScale { axis: Axis::X });
        }
        if self.scale_y == 0 {
            return Err(TransformError::ZeroScale { axis: Axis::Y });
        }
        Ok(())
    }

    /// Inverse matrix for this placement; see [`AffineMatrix::from_params`].
    pub fn build_matrix(&self) -> Result<AffineMatrix> {
        AffineMatrix::from_params(self)
    }

    /// Display rectangle covered by a `width` x `height` image placed with
    /// these parameters.
    ///
    /// The four corners are mapped forwards (scale, then rotate around the
    /// pivot) and the result is the smallest integer rectangle enclosing
    /// them. An empty image yields an empty area.
    pub fn bounding_area(&self, width: u16, height: u16) -> Result<Area> {
        self.validate()?;

        let x0 = self.img_x as i32;
        let y0 = self.img_y as i32;
        if width == 0 || height == 0 {
            return Ok(Area::new(x0, y0, x0 - 1, y0 - 1));
        }

        let pivot = (
            wide_fixed16(x0 as i64 + self.pivot_x as i64),
            wide_fixed16(y0 as i64 + self.pivot_y as i64),
        );
        let x1 = x0 as i64 + width as i64;
        let y1 = y0 as i64 + height as i64;
        let (x0, y0) = (x0 as i64, y0 as i64);
        let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)].map(|(x, y)| {
            scale_then_rotate_wide(
                (wide_fixed16(x), wide_fixed16(y)),
                pivot,
                self.angle,
                self.scale_x as u32,
                self.scale_y as u32,
                self.scale_bits,
            )
        });

        let min_x = corners.iter().map(|c| c.0).min().unwrap_or(pivot.0);
        let max_x = corners.iter().map(|c| c.0).max().unwrap_or(pivot.0);
        let min_y = corners.iter().map(|c| c.1).min().unwrap_or(pivot.1);
        let max_y = corners.iter().map(|c| c.1).max().unwrap_or(pivot.1);

        let one = fixed16(1) as i64;
        Ok(Area::new(
            saturate_i32(min_x >> 16),
            saturate_i32(min_y >> 16),
            saturate_i32(ceil_div(max_x, one) - 1),
            saturate_i32(ceil_div(max_y, one) - 1),
        ))
    }
}

/// Inclusive integer rectangle in display coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    /// Area spanning `(x1, y1)` to `(x2, y2)`, both corners included.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Number of columns; zero when empty.
    pub fn width(&self) -> u32 {
        (self.x2 as i64 - self.x1 as i64 + 1).clamp(0, u32::MAX as i64) as u32
    }

    /// Number of rows; zero when empty.
    pub fn height(&self) -> u32 {
        (self.y2 as i64 - self.y1 as i64 + 1).clamp(0, u32::MAX as i64) as u32
    }

    /// True when the area holds no pixel.
    pub fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    /// Overlap of two areas; may be empty.
    pub fn intersect(&self, other: &Area) -> Area {
        Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        )
    }
}
