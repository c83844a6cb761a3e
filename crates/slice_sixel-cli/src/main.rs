//! sixelpeek - preview image slices on the terminal
//!
//! Loads one or more images into a volume, extracts a slice and writes it
//! as a grayscale SIXEL graphic. Requires a terminal with SIXEL support.

use clap::Parser;
use flexi_logger::Logger;
use slice_sixel::{render_slice, Axis, IntensityWindow, Palette, Slice, Volume};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sixelpeek")]
#[command(version)]
#[command(about = "Preview image slices on the terminal (requires SIXEL support)", long_about = None)]
struct Cli {
    /// Input images (PNG, JPEG, GIF, WebP, TIFF); several files are stacked
    /// along z into a volume
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Slice normal: 0 = L/R (sagittal), 1 = A/P (coronal), 2 = I/S (axial)
    #[arg(short, long, default_value = "2")]
    axis: usize,

    /// Slice to display (default: middle slice)
    #[arg(short, long)]
    slice: Option<usize>,

    /// Intensity scaling as output = offset + scale * input, with [0, 1]
    /// visible
    #[arg(long, num_args = 2, value_names = ["OFFSET", "SCALE"], allow_negative_numbers = true)]
    scaling: Option<Vec<f32>>,

    /// Intensity range mapped from black to white (overrides --scaling)
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    intensity_range: Option<Vec<f32>>,

    /// Draw crosshairs at the specified position
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    crosshairs: Option<Vec<usize>>,

    /// Number of grayscale levels (1-254)
    #[arg(short, long, default_value = "100")]
    levels: usize,

    /// Output SIXEL file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _logger = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;

    let slices = cli
        .inputs
        .iter()
        .map(PathBuf::as_path)
        .map(load_slice)
        .collect::<Result<Vec<_>, _>>()?;
    let volume = Volume::from_slices(&slices)?;
    let [x, y, z] = volume.dims();
    log::info!("loaded {} image(s) as {}x{}x{} volume", slices.len(), x, y, z);

    let axis = Axis::try_from(cli.axis)?;
    let index = cli.slice.unwrap_or_else(|| volume.middle_slice(axis));
    let slice = volume.slice(axis, index)?;

    let window = select_window(&cli, &slice)?;
    log::info!(
        "slice {} along {:?}, intensity scaling offset {} scale {}",
        index,
        axis,
        window.offset,
        window.scale
    );

    let mut palette = Palette::new(cli.levels)?;
    palette.set_window(&window);

    let crosshairs = cli.crosshairs.as_deref().map(|c| (c[0], c[1]));
    let sixel = render_slice(&slice, &palette, crosshairs)?;

    match cli.output {
        Some(path) => {
            fs::write(&path, &sixel)?;
            log::info!("written {} bytes to '{}'", sixel.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(sixel.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Read an image file as a grayscale slice with intensities in `[0, 1]`.
fn load_slice(path: &Path) -> Result<Slice, Box<dyn std::error::Error>> {
    let img = image::open(path).map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
    let luma = img.to_luma32f();
    let (width, height) = luma.dimensions();
    log::debug!("'{}': {}x{}", path.display(), width, height);
    Ok(Slice::new(width as usize, height as usize, luma.into_raw())?)
}

/// Explicit range, then explicit scaling, then the automatic window.
fn select_window(cli: &Cli, slice: &Slice) -> slice_sixel::Result<IntensityWindow> {
    if let Some(range) = cli.intensity_range.as_deref() {
        return IntensityWindow::from_range(range[0], range[1]);
    }
    if let Some(scaling) = cli.scaling.as_deref() {
        return Ok(IntensityWindow::new(scaling[0], scaling[1]));
    }
    IntensityWindow::auto(&slice.data)
}
