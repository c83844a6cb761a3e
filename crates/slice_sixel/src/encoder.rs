//! SIXEL encoder for palette-indexed grayscale slices.
//!
//! Pixels are quantized through a [`Palette`] as they are written and kept
//! as one register index per pixel. [`SixelEncoder::encode`] then walks the
//! image in bands of six rows, emitting one run-length compressed sixel
//! line for every register present in the band.

use std::io;

use crate::palette::Palette;
use crate::{Result, SixelError};

/// Rows covered by a single sixel character.
const BAND_HEIGHT: usize = 6;

/// Runs longer than this are written as `!<count><char>`.
const MAX_LITERAL_RUN: usize = 3;

/// Encoder for a single image.
///
/// The encoder borrows its palette for its whole lifetime; the palette can
/// not be rescaled while pixels are being written. `encode` consumes the
/// encoder, so each instance produces exactly one image.
#[derive(Debug)]
pub struct SixelEncoder<'a> {
    width: usize,
    height: usize,
    // row-major, padded to a whole number of bands
    levels: Vec<u8>,
    palette: &'a Palette,
}

impl<'a> SixelEncoder<'a> {
    /// Create an encoder for a `width` x `height` image, all pixels at level 0.
    pub fn new(width: usize, height: usize, palette: &'a Palette) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SixelError::InvalidDimensions { width, height });
        }
        let padded_height = height.div_ceil(BAND_HEIGHT) * BAND_HEIGHT;
        let len = width
            .checked_mul(padded_height)
            .ok_or(SixelError::InvalidDimensions { width, height })?;

        log::debug!(
            "sixel encoder for {}x{} image ({} rows padded)",
            width,
            height,
            padded_height
        );

        Ok(Self {
            width,
            height,
            levels: vec![0; len],
            palette,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels, without band padding.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Palette used to quantize written pixels.
    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    /// Quantize `value` and store it at `(x, y)`. Later writes win.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: f32) -> Result<()> {
        self.check_bounds(x, y)?;
        self.levels[x + self.width * y] = self.palette.quantize(value);
        Ok(())
    }

    /// Palette level currently stored at `(x, y)`.
    pub fn level(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.levels[x + self.width * y])
        } else {
            None
        }
    }

    /// Paint row `y0` and column `x0` in the highlight colour.
    ///
    /// Positions outside the image are rejected and leave it untouched.
    pub fn draw_crosshairs(&mut self, x0: usize, y0: usize) -> Result<()> {
        self.check_bounds(x0, y0)?;
        let highlight = self.palette.highlight_level();

        let row = y0 * self.width;
        self.levels[row..row + self.width].fill(highlight);
        for y in 0..self.height {
            self.levels[x0 + self.width * y] = highlight;
        }
        Ok(())
    }

    /// Produce the complete control string: `ESC P q`, the palette, one
    /// line per band and `ESC \`.
    #[must_use = "this returns the encoded SIXEL string"]
    pub fn encode(self) -> String {
        let bands = self.height.div_ceil(BAND_HEIGHT);
        let mut out = String::with_capacity(self.palette.spec().len() + bands * self.width * 2 + 8);

        // DCS introducer for SIXEL
        out.push('\x1b');
        out.push('P');
        out.push('q');
        out.push_str(self.palette.spec());

        for band in 0..bands {
            self.encode_band(&mut out, band * BAND_HEIGHT);
        }

        // String terminator: ESC \
        out.push('\x1b');
        out.push('\\');

        log::debug!("encoded {} bands into {} bytes", bands, out.len());
        out
    }

    /// Encode and write the result to `writer`.
    pub fn encode_to<W: io::Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.encode().as_bytes())
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(SixelError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn encode_band(&self, out: &mut String, y0: usize) {
        let band = &self.levels[y0 * self.width..(y0 + BAND_HEIGHT) * self.width];

        // Find which registers are used in this band, padding rows included
        let mut used = [false; 256];
        for &level in band {
            used[level as usize] = true;
        }

        let mut run = RunLength::default();
        for level in 0..=self.palette.highlight_level() {
            if !used[level as usize] {
                continue;
            }

            // Select color map register
            out.push('#');
            write_number(out, level as usize);

            for x in 0..self.width {
                let mut bits: u8 = 0;
                for bit in 0..BAND_HEIGHT {
                    if band[x + bit * self.width] == level {
                        bits |= 1 << bit;
                    }
                }
                run.add(out, bits);
            }
            run.flush(out);

            // Carriage return to start of band for next register
            out.push('$');
        }

        // Every pixel holds some register, so at least one line was written;
        // its carriage return becomes the move to the next band.
        if out.ends_with('$') {
            out.pop();
        }
        out.push('-');
    }
}

/// Run-length state for one sixel line.
#[derive(Debug, Default)]
struct RunLength {
    current: u8,
    repeats: usize,
}

impl RunLength {
    fn add(&mut self, out: &mut String, bits: u8) {
        if self.repeats > 0 && bits == self.current {
            self.repeats += 1;
        } else {
            self.flush(out);
            self.current = bits;
            self.repeats = 1;
        }
    }

    fn flush(&mut self, out: &mut String) {
        let ch = (63 + self.current) as char;
        match self.repeats {
            0 => {}
            n if n <= MAX_LITERAL_RUN => {
                for _ in 0..n {
                    out.push(ch);
                }
            }
            n => {
                out.push('!');
                write_number(out, n);
                out.push(ch);
            }
        }
        self.repeats = 0;
    }
}

/// Append `n` in decimal without going through the formatter.
#[inline]
pub(crate) fn write_number(out: &mut String, mut n: usize) {
    if n == 0 {
        out.push('0');
        return;
    }

    let mut buf = [0u8; 20];
    let mut i = buf.len();

    while n > 0 {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
    }

    out.extend(buf[i..].iter().map(|&b| b as char));
}
