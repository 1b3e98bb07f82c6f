//! Error type shared by matrix construction and buffer descriptors.
//!
//! Nothing in the blit path returns an error: every check happens when a
//! matrix or a view is built, so a blit call with valid inputs always runs
//! to completion.

/// Axis selector used in error reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Errors reported when building a transform or describing a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    #[error("rotation angle {angle} is outside 0..=3600 tenths of a degree")]
    InvalidAngle { angle: u16 },

    #[error("scale factor on the {axis} axis is zero")]
    ZeroScale { axis: Axis },

    #[error("scale fraction bits {bits} exceed the supported maximum of 15")]
    InvalidScaleBits { bits: u16 },

    #[error("pitch {pitch} is smaller than one row of pixels ({min} bytes)")]
    PitchTooSmall { pitch: usize, min: usize },

    #[error("buffer holds {len} bytes but the descriptor needs {required}")]
    BufferTooSmall { len: usize, required: usize },

    #[error("image dimensions {width}x{height} exceed the 16-bit coordinate range")]
    DimensionTooLarge { width: usize, height: usize },

    #[error("region does not fit inside the parent image")]
    RegionOutOfBounds,

    #[error("region starts at column {x}, which is not on a byte boundary")]
    UnalignedRegion { x: usize },

    #[error("palette holds {len} colours but the format needs {required}")]
    PaletteTooShort { len: usize, required: usize },

    #[error(
        "plane of {plane_width}x{plane_height} does not match the {width}x{height} image"
    )]
    PlaneMismatch { width: usize, height: usize, plane_width: usize, plane_height: usize },
}

pub type Result<T> = std::result::Result<T, TransformError>;
