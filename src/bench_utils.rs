//! Shared helpers for benchmark drivers.

use crate::{Image, PixelFormat};

pub const BENCH_SIZES: [usize; 4] = [64, 128, 256, 512];
/// Angles in tenths of a degree.
pub const BENCH_ANGLES: [u16; 6] = [0, 150, 450, 900, 1800, 2700];

/// Fills every byte with a position-dependent pattern so that filtering does
/// real work. Alpha bytes vary too, so blends take the intermediate path.
pub fn create_test_image<F: PixelFormat>(width: usize, height: usize, format: F) -> Image<F> {
    let mut img = Image::with_format(width, height, format);
    let span = (width + height).max(1);
    img.fill_with(|x, y, px| {
        for (c, byte) in px.iter_mut().enumerate() {
            *byte = ((x + y * (c + 1)) * 255 / span) as u8;
        }
    });
    img
}

/// Label for a benchmark id, e.g. `ARGB8888->RGB565`.
pub fn pair_label<S: PixelFormat, D: PixelFormat>() -> String {
    format!("{}->{}", S::NAME, D::NAME)
}
