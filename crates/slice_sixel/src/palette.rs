//! Grayscale palette with a reserved highlight colour.
//!
//! A palette of `N` levels defines `N + 1` gray registers, `#0` (black)
//! through `#N` (white), followed by register `#N+1` which is a saturated
//! yellow used only for overlays such as crosshairs.

use crate::encoder::write_number;
use crate::window::IntensityWindow;
use crate::{Result, SixelError};

/// Largest supported number of grayscale steps.
///
/// Levels are stored per pixel as `u8`, and the highlight register sits one
/// above the brightest gray.
pub const MAX_LEVELS: usize = 254;

/// Quantization table mapping scalar intensities onto palette registers.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    levels: u8,
    offset: f32,
    scale: f32,
    spec: String,
}

impl Palette {
    /// Build a palette with `levels` grayscale steps.
    ///
    /// The scaling starts out as the identity window, so `0.0` maps to
    /// level 0 and `1.0` to level `levels`.
    pub fn new(levels: usize) -> Result<Self> {
        if levels == 0 || levels > MAX_LEVELS {
            return Err(SixelError::InvalidLevelCount { levels });
        }

        let mut spec = String::with_capacity((levels + 2) * 16);
        for n in 0..=levels {
            let pct = (100.0 * n as f64 / levels as f64).round() as usize;
            spec.push('#');
            write_number(&mut spec, n);
            spec.push_str(";2;");
            write_number(&mut spec, pct);
            spec.push(';');
            write_number(&mut spec, pct);
            spec.push(';');
            write_number(&mut spec, pct);
        }

        // Highlight register, then end the palette line
        spec.push('#');
        write_number(&mut spec, levels + 1);
        spec.push_str(";2;100;100;0$\n");

        log::debug!("built {}-level grayscale palette", levels);

        Ok(Self {
            levels: levels as u8,
            offset: 0.0,
            scale: levels as f32,
            spec,
        })
    }

    /// Palette definition text, ready to follow the `ESC P q` introducer.
    #[inline]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Number of grayscale steps `N`; the brightest gray register is `N`.
    #[inline]
    pub fn level_count(&self) -> u8 {
        self.levels
    }

    /// Register reserved for overlays. Never produced by [`Palette::quantize`].
    #[inline]
    pub fn highlight_level(&self) -> u8 {
        self.levels + 1
    }

    /// Active offset, in level units.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Active scale, already multiplied by the level count.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set brightness and contrast as raw quantization parameters.
    ///
    /// Levels are computed as `round(offset + scale * N * value)`: `scale`
    /// is normalized (`1 / (max - min)` spans the whole ramp) while `offset`
    /// is taken in level units. Pixels quantized before a call are not
    /// updated.
    pub fn set_scaling(&mut self, offset: f32, scale: f32) {
        self.offset = offset;
        self.scale = scale * self.levels as f32;
    }

    /// Set brightness and contrast from a window expressed in `[0, 1]`
    /// display units, so that `offset + scale * value == 1` lands on the
    /// brightest gray.
    pub fn set_window(&mut self, window: &IntensityWindow) {
        let n = self.levels as f32;
        self.offset = window.offset * n;
        self.scale = window.scale * n;
    }

    /// Map an intensity onto a gray level in `[0, N]`. NaN maps to 0.
    #[inline]
    pub fn quantize(&self, value: f32) -> u8 {
        let level = (self.offset + self.scale * value).round();
        // `as` saturates and sends NaN to 0
        level.clamp(0.0, self.levels as f32) as u8
    }
}
