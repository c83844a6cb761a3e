//! One-call rendering of a slice to a SIXEL string.

use crate::encoder::SixelEncoder;
use crate::palette::Palette;
use crate::volume::Slice;
use crate::Result;

/// Encode `slice` with the palette's current scaling, optionally overlaying
/// crosshairs at `(x, y)`.
pub fn render_slice(
    slice: &Slice,
    palette: &Palette,
    crosshairs: Option<(usize, usize)>,
) -> Result<String> {
    let mut encoder = SixelEncoder::new(slice.width, slice.height, palette)?;
    for y in 0..slice.height {
        for x in 0..slice.width {
            encoder.set_pixel(x, y, slice.get(x, y))?;
        }
    }
    if let Some((x, y)) = crosshairs {
        encoder.draw_crosshairs(x, y)?;
    }
    Ok(encoder.encode())
}
