//! Intensity windowing: mapping raw scalar values onto the `[0, 1]`
//! display range.

use crate::{Result, SixelError};

/// Lower percentile used for automatic windowing.
pub const AUTO_LOWER_PERCENTILE: f32 = 0.0;
/// Upper percentile used for automatic windowing; discards hot outliers.
pub const AUTO_UPPER_PERCENTILE: f32 = 99.8;

/// Affine display mapping `offset + scale * value`, with `[0, 1]` visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityWindow {
    pub offset: f32,
    pub scale: f32,
}

impl Default for IntensityWindow {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
        }
    }
}

impl IntensityWindow {
    pub fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// Window mapping `min` to black and `max` to white.
    pub fn from_range(min: f32, max: f32) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(SixelError::InvalidIntensityRange { min, max });
        }
        let scale = 1.0 / (max - min);
        Ok(Self {
            offset: -scale * min,
            scale,
        })
    }

    /// Window spanning the minimum to the 99.8th percentile of `data`.
    ///
    /// A flat image gets unit contrast with its value shown as black.
    pub fn auto(data: &[f32]) -> Result<Self> {
        let mut values = data.to_vec();
        let min = percentile(&mut values, AUTO_LOWER_PERCENTILE)?;
        let max = percentile(&mut values, AUTO_UPPER_PERCENTILE)?;
        log::debug!("automatic intensity range [{}, {}]", min, max);

        Self::from_range(min, max).or_else(|_| {
            log::warn!("degenerate intensity range [{min}, {max}], using unit scaling");
            let offset = if min.is_finite() { -min } else { 0.0 };
            Ok(Self { offset, scale: 1.0 })
        })
    }

    /// Apply the window to a single value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        self.offset + self.scale * value
    }
}

/// Percentile of `data` (0 to 100) with linear interpolation between
/// neighbouring order statistics. Reorders `data`.
///
/// NaN sorts above every number.
pub fn percentile(data: &mut [f32], pct: f32) -> Result<f32> {
    if data.is_empty() {
        return Err(SixelError::EmptyData);
    }
    if pct >= 100.0 {
        return Ok(data.iter().copied().max_by(f32::total_cmp).unwrap_or(f32::NAN));
    }
    if pct <= 0.0 {
        return Ok(data.iter().copied().min_by(f32::total_cmp).unwrap_or(f32::NAN));
    }

    let interp = 0.01 * pct as f64 * (data.len() - 1) as f64;
    let lower = interp.floor() as usize;
    let mu = interp - lower as f64;

    let (_, &mut lower_value, _) = data.select_nth_unstable_by(lower, f32::total_cmp);
    if lower + 1 >= data.len() {
        return Ok(lower_value);
    }
    let (_, &mut upper_value, _) = data.select_nth_unstable_by(lower + 1, f32::total_cmp);

    Ok(((1.0 - mu) * lower_value as f64 + mu * upper_value as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_extremes() {
        let mut data = vec![3.0, -1.0, 7.5, 2.0];
        assert_eq!(percentile(&mut data, 0.0), Ok(-1.0));
        assert_eq!(percentile(&mut data, 100.0), Ok(7.5));
    }

    #[test]
    fn test_percentile_interpolates() {
        let mut data: Vec<f32> = (0..=10).rev().map(|v| v as f32).collect();
        assert_eq!(percentile(&mut data, 50.0), Ok(5.0));
        assert_eq!(percentile(&mut data, 25.0), Ok(2.5));

        let mut data = vec![0.0, 10.0];
        assert_eq!(percentile(&mut data, 30.0), Ok(3.0));
    }

    #[test]
    fn test_percentile_single_value() {
        let mut data = vec![4.0];
        assert_eq!(percentile(&mut data, 99.8), Ok(4.0));
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&mut [], 50.0), Err(SixelError::EmptyData));
    }

    #[test]
    fn test_from_range() {
        let window = IntensityWindow::from_range(10.0, 20.0).unwrap();
        assert!((window.apply(10.0)).abs() < 1e-6);
        assert!((window.apply(15.0) - 0.5).abs() < 1e-6);
        assert!((window.apply(20.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_range_rejects_degenerate() {
        assert!(IntensityWindow::from_range(1.0, 1.0).is_err());
        assert!(IntensityWindow::from_range(2.0, 1.0).is_err());
        assert!(IntensityWindow::from_range(f32::NAN, 1.0).is_err());
        assert!(IntensityWindow::from_range(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_auto_window() {
        let data: Vec<f32> = (0..1001).map(|v| v as f32).collect();
        let window = IntensityWindow::auto(&data).unwrap();
        // 99.8th percentile of 0..=1000 is 998
        assert!(window.apply(0.0).abs() < 1e-6);
        assert!((window.apply(998.0) - 1.0).abs() < 1e-5);
        assert!(window.apply(1000.0) > 1.0);
    }

    #[test]
    fn test_auto_window_flat() {
        let window = IntensityWindow::auto(&[5.0; 16]).unwrap();
        assert_eq!(window, IntensityWindow::new(-5.0, 1.0));
        assert!(IntensityWindow::auto(&[]).is_err());
    }
}
