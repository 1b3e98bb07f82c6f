//! Exact quarter-turn and mirror placements.
//!
//! These orientations need no trigonometry: every destination pixel maps to
//! an integer source pixel, so the matrices below have zero fractional parts
//! and bilinear filtering degenerates to a copy of the top-left neighbour.

use log::trace;

use crate::fixed::fixed16;
use crate::format::{Composite, DestFormat, SourceFormat};
use crate::image::{ImageView, ImageViewMut};
use crate::matrix::AffineMatrix;
use crate::op_transform::{SoftwareBackend, TransformBackend};

/// Quarter-turn orientations of an image whose top-left sits at the
/// display origin.
///
/// Discriminants are the transformation mode bits used by display drivers:
/// bit 0 mirrors horizontally, bit 1 vertically, bit 2 swaps the axes.
///
/// ```text
/// Up (0)          FlipH (1)       FlipV (2)       Down (3)
/// ┌───────┐       ┌───────┐       ┌───────┐       ┌───────┐
/// │ 1   2 │       │ 2   1 │       │ 3   4 │       │ 4   3 │
/// │       │       │       │       │       │       │       │
/// │ 3   4 │       │ 4   3 │       │ 1   2 │       │ 2   1 │
/// └───────┘       └───────┘       └───────┘       └───────┘
///
/// Right (4)       Left (7)
/// ┌───────┐       ┌───────┐
/// │ 3   1 │       │ 2   4 │
/// │       │       │       │
/// │ 4   2 │       │ 1   3 │
/// └───────┘       └───────┘
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Orientation90 {
    #[default]
    Up = 0,
    FlipH = 1,
    FlipV = 2,
    Down = 3,
    /// 90 degrees clockwise.
    Right = 4,
    /// 270 degrees clockwise.
    Left = 7,
}

impl Orientation90 {
    /// Decodes driver mode bits. Combinations without a named orientation
    /// return `None`.
    pub fn from_mode_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Orientation90::Up),
            1 => Some(Orientation90::FlipH),
            2 => Some(Orientation90::FlipV),
            3 => Some(Orientation90::Down),
            4 => Some(Orientation90::Right),
            7 => Some(Orientation90::Left),
            _ => None,
        }
    }

    pub fn mode_bits(self) -> u8 {
        self as u8
    }

    /// Clockwise angle in tenths of a degree, for the pure rotations.
    pub fn angle(self) -> Option<u16> {
        match self {
            Orientation90::Up => Some(0),
            Orientation90::Right => Some(900),
            Orientation90::Down => Some(1800),
            Orientation90::Left => Some(2700),
            Orientation90::FlipH | Orientation90::FlipV => None,
        }
    }

    /// Size of the placed image; quarter turns swap the axes.
    pub fn output_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Orientation90::Right | Orientation90::Left => (height, width),
            _ => (width, height),
        }
    }

    /// Inverse matrix for a `width` x `height` source placed at the origin.
    pub fn matrix(self, width: u16, height: u16) -> AffineMatrix {
        let last_x = fixed16(width as i32 - 1);
        let last_y = fixed16(height as i32 - 1);
        let one = fixed16(1);
        let m = match self {
            Orientation90::Up => AffineMatrix::identity(),
            Orientation90::FlipH => AffineMatrix {
                tx: last_x,
                ty: 0,
                sx: -one,
                shy: 0,
                shx: 0,
                sy: one,
            },
            Orientation90::FlipV => AffineMatrix {
                tx: 0,
                ty: last_y,
                sx: one,
                shy: 0,
                shx: 0,
                sy: -one,
            },
            Orientation90::Down => AffineMatrix {
                tx: last_x,
                ty: last_y,
                sx: -one,
                shy: 0,
                shx: 0,
                sy: -one,
            },
            Orientation90::Right => AffineMatrix {
                tx: 0,
                ty: last_y,
                sx: 0,
                shy: -one,
                shx: one,
                sy: 0,
            },
            Orientation90::Left => AffineMatrix {
                tx: last_x,
                ty: 0,
                sx: 0,
                shy: one,
                shx: -one,
                sy: 0,
            },
        };
        trace!("{self:?} matrix for {width}x{height}: {m:?}");
        m
    }
}

/// Places a whole image in one of the [`Orientation90`] orientations.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpOrient90<B = SoftwareBackend> {
    orientation: Orientation90,
    backend: B,
}

impl OpOrient90 {
    pub fn new(orientation: Orientation90) -> Self {
        Self { orientation, backend: SoftwareBackend }
    }
}

impl<B: TransformBackend> OpOrient90<B> {
    pub fn with_backend(orientation: Orientation90, backend: B) -> Self {
        Self { orientation, backend }
    }

    pub fn set_orientation(&mut self, orientation: Orientation90) -> &mut Self {
        self.orientation = orientation;
        self
    }

    pub fn orientation(&self) -> Orientation90 {
        self.orientation
    }

    /// Composites the oriented `src` into `dst` at the display origin.
    ///
    /// Pixels of `dst` outside [`Orientation90::output_dimensions`] are left
    /// untouched.
    pub fn apply_to_preallocated<S, D>(&self, src: &ImageView<'_, S>, dst: &mut ImageViewMut<'_, D>)
    where
        S: SourceFormat,
        D: DestFormat,
        S::Sample: Composite<D>,
    {
        let matrix = self.orientation.matrix(src.width() as u16, src.height() as u16);
        self.backend.transform(dst, (0, 0), src, &matrix);
    }
}
