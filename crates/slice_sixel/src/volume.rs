//! Dense 3-D scalar volumes and 2-D slice extraction.

use crate::{Result, SixelError};

/// Slice normal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// Left/right normal, showing the y/z plane.
    Sagittal,
    /// Anterior/posterior normal, showing the x/z plane.
    Coronal,
    /// Inferior/superior normal, showing the x/y plane.
    #[default]
    Axial,
}

impl Axis {
    /// Volume dimension index along the slice normal.
    pub fn index(self) -> usize {
        match self {
            Axis::Sagittal => 0,
            Axis::Coronal => 1,
            Axis::Axial => 2,
        }
    }

    /// Volume dimensions shown horizontally and vertically.
    pub fn in_plane(self) -> (usize, usize) {
        match self {
            Axis::Sagittal => (1, 2),
            Axis::Coronal => (0, 2),
            Axis::Axial => (0, 1),
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = SixelError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Axis::Sagittal),
            1 => Ok(Axis::Coronal),
            2 => Ok(Axis::Axial),
            _ => Err(SixelError::InvalidAxis(value)),
        }
    }
}

/// A 2-D scalar image, row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Slice {
    /// Wrap `data`, which must hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SixelError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(SixelError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(SixelError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the slice.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside slice");
        self.data[x + self.width * y]
    }
}

/// A 3-D scalar volume stored with x varying fastest, then y, then z.
///
/// Volume axes follow scanner conventions: y points up the displayed
/// image, so slices are read with both in-plane axes reversed.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    dims: [usize; 3],
    data: Vec<f32>,
}

impl Volume {
    /// Wrap `data`, which must hold exactly one value per voxel of `dims`.
    pub fn new(dims: [usize; 3], data: Vec<f32>) -> Result<Self> {
        let invalid = SixelError::InvalidDimensions {
            width: dims[0],
            height: dims[1],
        };
        if dims.contains(&0) {
            return Err(invalid);
        }
        let expected = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .ok_or(invalid)?;
        if data.len() != expected {
            return Err(SixelError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// Stack display-oriented slices along z, so that axial slice `i`
    /// shows `slices[i]` the right way up.
    pub fn from_slices(slices: &[Slice]) -> Result<Self> {
        let Some(first) = slices.first() else {
            return Err(SixelError::EmptyData);
        };
        let (width, height) = (first.width, first.height);

        let mut data = Vec::with_capacity(width * height * slices.len());
        for slice in slices {
            if slice.width != width || slice.height != height {
                return Err(SixelError::InvalidDimensions {
                    width: slice.width,
                    height: slice.height,
                });
            }
            for y in (0..height).rev() {
                for x in (0..width).rev() {
                    data.push(slice.get(x, y));
                }
            }
        }
        Self::new([width, height, slices.len()], data)
    }

    /// Single-plane volume holding `slice`.
    pub fn from_slice(slice: Slice) -> Result<Self> {
        Self::from_slices(std::slice::from_ref(&slice))
    }

    /// Size along x, y and z.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Value at voxel `[x, y, z]`.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is past the end of its dimension.
    #[inline]
    pub fn get(&self, index: [usize; 3]) -> f32 {
        assert!(
            index.iter().zip(self.dims).all(|(&i, d)| i < d),
            "voxel {index:?} outside {:?} volume",
            self.dims
        );
        self.data[index[0] + self.dims[0] * (index[1] + self.dims[1] * index[2])]
    }

    /// Default slice position along `axis`.
    pub fn middle_slice(&self, axis: Axis) -> usize {
        self.dims[axis.index()] / 2
    }

    /// Extract slice `index` perpendicular to `axis`.
    pub fn slice(&self, axis: Axis, index: usize) -> Result<Slice> {
        let normal = axis.index();
        if index >= self.dims[normal] {
            return Err(SixelError::SliceOutOfRange {
                axis: normal,
                index,
                size: self.dims[normal],
            });
        }

        let (x_axis, y_axis) = axis.in_plane();
        let width = self.dims[x_axis];
        let height = self.dims[y_axis];

        let mut pos = [0; 3];
        pos[normal] = index;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            pos[y_axis] = height - 1 - y;
            for x in 0..width {
                pos[x_axis] = width - 1 - x;
                data.push(self.get(pos));
            }
        }

        log::debug!(
            "extracted {:?} slice {} ({}x{})",
            axis,
            index,
            width,
            height
        );
        Slice::new(width, height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // value encodes its own position: x + 10 y + 100 z
    fn indexed_volume(dims: [usize; 3]) -> Volume {
        let mut data = Vec::new();
        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    data.push((x + 10 * y + 100 * z) as f32);
                }
            }
        }
        Volume::new(dims, data).unwrap()
    }

    #[test]
    fn test_axis_try_from() {
        assert_eq!(Axis::try_from(0), Ok(Axis::Sagittal));
        assert_eq!(Axis::try_from(1), Ok(Axis::Coronal));
        assert_eq!(Axis::try_from(2), Ok(Axis::Axial));
        assert_eq!(Axis::try_from(3), Err(SixelError::InvalidAxis(3)));
        assert_eq!(Axis::default(), Axis::Axial);
    }

    #[test]
    fn test_volume_validation() {
        assert!(Volume::new([2, 2, 0], vec![]).is_err());
        assert_eq!(
            Volume::new([2, 2, 2], vec![0.0; 7]),
            Err(SixelError::BufferSizeMismatch {
                expected: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn test_dimension_overflow_is_rejected() {
        assert_eq!(
            Volume::new([usize::MAX / 2, usize::MAX / 2, 1], vec![]),
            Err(SixelError::InvalidDimensions {
                width: usize::MAX / 2,
                height: usize::MAX / 2
            })
        );
        assert!(Volume::new([usize::MAX, 2, 2], vec![]).is_err());
        assert_eq!(
            Slice::new(usize::MAX / 2, usize::MAX / 2, vec![]),
            Err(SixelError::InvalidDimensions {
                width: usize::MAX / 2,
                height: usize::MAX / 2
            })
        );
        assert!(Slice::new(usize::MAX, 2, vec![]).is_err());
    }

    #[test]
    #[should_panic]
    fn test_slice_get_out_of_bounds() {
        let slice = Slice::new(3, 2, vec![0.0; 6]).unwrap();
        // in range for the flat buffer, but not a valid pixel
        slice.get(3, 0);
    }

    #[test]
    #[should_panic]
    fn test_volume_get_out_of_bounds() {
        indexed_volume([3, 2, 4]).get([0, 2, 0]);
    }

    #[test]
    fn test_axial_slice_reverses_both_axes() {
        let volume = indexed_volume([3, 2, 4]);
        let slice = volume.slice(Axis::Axial, 1).unwrap();
        assert_eq!((slice.width, slice.height), (3, 2));
        assert_eq!(slice.data, vec![112.0, 111.0, 110.0, 102.0, 101.0, 100.0]);
    }

    #[test]
    fn test_coronal_slice() {
        let volume = indexed_volume([3, 2, 4]);
        let slice = volume.slice(Axis::Coronal, 1).unwrap();
        assert_eq!((slice.width, slice.height), (3, 4));
        assert_eq!(slice.get(0, 0), 312.0);
        assert_eq!(slice.get(2, 3), 10.0);
    }

    #[test]
    fn test_sagittal_slice() {
        let volume = indexed_volume([3, 2, 4]);
        let slice = volume.slice(Axis::Sagittal, 2).unwrap();
        assert_eq!((slice.width, slice.height), (2, 4));
        assert_eq!(slice.get(0, 0), 312.0);
        assert_eq!(slice.get(1, 3), 2.0);
    }

    #[test]
    fn test_slice_out_of_range() {
        let volume = indexed_volume([3, 2, 4]);
        assert_eq!(
            volume.slice(Axis::Axial, 4),
            Err(SixelError::SliceOutOfRange {
                axis: 2,
                index: 4,
                size: 4
            })
        );
        assert!(volume.slice(Axis::Sagittal, 3).is_err());
    }

    #[test]
    fn test_middle_slice() {
        let volume = indexed_volume([3, 2, 5]);
        assert_eq!(volume.middle_slice(Axis::Axial), 2);
        assert_eq!(volume.middle_slice(Axis::Coronal), 1);
        assert_eq!(volume.middle_slice(Axis::Sagittal), 1);
    }

    #[test]
    fn test_from_slices_round_trips_axial() {
        let a = Slice::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Slice::new(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let volume = Volume::from_slices(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(volume.dims(), [3, 2, 2]);
        assert_eq!(volume.slice(Axis::Axial, 0).unwrap(), a);
        assert_eq!(volume.slice(Axis::Axial, 1).unwrap(), b);
    }

    #[test]
    fn test_from_slices_mismatched() {
        let a = Slice::new(3, 2, vec![0.0; 6]).unwrap();
        let b = Slice::new(2, 3, vec![0.0; 6]).unwrap();
        assert!(Volume::from_slices(&[a, b]).is_err());
        assert_eq!(Volume::from_slices(&[]), Err(SixelError::EmptyData));
    }
}
