//! # slice_sixel
//!
//! A small Rust SIXEL encoder for previewing 2-D slices of scalar images
//! (for example one plane of a 3-D scan) on SIXEL-capable terminals.
//!
//! ## Features
//!
//! - **Palette**: a fixed grayscale ramp plus one reserved yellow highlight
//!   colour, with an affine intensity → level quantization
//! - **Encoder**: band packing and run-length compression into a complete
//!   `ESC P q … ESC \` control string
//! - **Volume**: slice extraction along any of the three axes, plus
//!   percentile based intensity windowing
//!
//! ## Quick Start
//!
//! ```
//! use slice_sixel::{Palette, SixelEncoder};
//!
//! # fn main() -> slice_sixel::Result<()> {
//! let palette = Palette::new(4)?;
//! let mut encoder = SixelEncoder::new(2, 6, &palette)?;
//! for y in 0..6 {
//!     encoder.set_pixel(0, y, 0.25)?;
//!     encoder.set_pixel(1, y, 0.75)?;
//! }
//! let sixel = encoder.encode();
//! assert!(sixel.ends_with("#1~?$#3?~-\x1b\\"));
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

pub mod encoder;
pub mod palette;
pub mod render;
pub mod volume;
pub mod window;

pub use encoder::SixelEncoder;
pub use palette::Palette;
pub use render::render_slice;
pub use volume::{Axis, Slice, Volume};
pub use window::{percentile, IntensityWindow};

/// Errors that can occur while building or encoding a SIXEL preview.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SixelError {
    /// Palette must have between 1 and [`palette::MAX_LEVELS`] grayscale steps
    #[error("invalid palette size: {levels} levels (expected 1..={max})", max = palette::MAX_LEVELS)]
    InvalidLevelCount { levels: usize },

    /// Invalid image dimensions (width or height is zero)
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} values, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Pixel or crosshair position outside the image
    #[error("position ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Axis index other than 0, 1 or 2
    #[error("invalid axis {0} (expected 0, 1 or 2)")]
    InvalidAxis(usize),

    /// Slice index past the end of the selected axis
    #[error("slice {index} out of range for axis {axis} (size {size})")]
    SliceOutOfRange {
        axis: usize,
        index: usize,
        size: usize,
    },

    /// Intensity range that is empty, inverted or not finite
    #[error("invalid intensity range: [{min}, {max}]")]
    InvalidIntensityRange { min: f32, max: f32 },

    /// Statistics requested on an empty data set
    #[error("no data")]
    EmptyData,
}

/// Result type for SIXEL operations.
pub type Result<T> = core::result::Result<T, SixelError>;
