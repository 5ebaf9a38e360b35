//! Grid geometry and voxel coordinates
//!
//! A [`Geometry`] describes the sampling grid shared by label maps,
//! probability images and feature channels: the voxel extent along x, y
//! and z, the physical spacing between voxel centres and the physical
//! position of voxel (0, 0, 0).
//!
//! A 2-D image is a grid with z extent 1. Axes of extent 1 are called
//! *collapsed*; neighbourhood operations treat them as absent, so a 2-D
//! grid never picks up neighbours from a phantom third dimension.
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{Geometry, VoxelCoord};
//!
//! let geom = Geometry::new_2d(4, 3).unwrap();
//! assert_eq!(geom.voxel_count(), 12);
//! assert_eq!(geom.index_of(VoxelCoord::new(1, 2, 0)), 9);
//! assert_eq!(geom.coord_of(9), VoxelCoord::new(1, 2, 0));
//! assert!(geom.is_collapsed(2));
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// Integer position of a voxel in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VoxelCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl VoxelCoord {
    /// Create a new coordinate
    #[inline]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate as an array indexed by axis
    #[inline]
    pub fn to_array(self) -> [u32; 3] {
        [self.x, self.y, self.z]
    }

    /// Offset this coordinate by `delta`, returning `None` when the result
    /// leaves `extent`.
    #[inline]
    pub fn offset(self, delta: [i32; 3], extent: [u32; 3]) -> Option<Self> {
        let mut out = [0u32; 3];
        for (axis, slot) in out.iter_mut().enumerate() {
            let v = self.to_array()[axis] as i64 + delta[axis] as i64;
            if v < 0 || v >= extent[axis] as i64 {
                return None;
            }
            *slot = v as u32;
        }
        Some(Self::new(out[0], out[1], out[2]))
    }

    /// Offset this coordinate by `delta`, clamping each axis to the grid
    /// (replicate border).
    #[inline]
    pub fn offset_clamped(self, delta: [i32; 3], extent: [u32; 3]) -> Self {
        let c = self.to_array();
        let mut out = [0u32; 3];
        for axis in 0..3 {
            let v = c[axis] as i64 + delta[axis] as i64;
            out[axis] = v.clamp(0, extent[axis] as i64 - 1) as u32;
        }
        Self::new(out[0], out[1], out[2])
    }
}

impl From<(u32, u32, u32)> for VoxelCoord {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Sampling grid: extent, spacing and origin
///
/// Two grids are compatible only when all three agree exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    extent: [u32; 3],
    spacing: [f64; 3],
    origin: [f64; 3],
}

impl Geometry {
    /// Create a geometry with unit spacing and zero origin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidExtent` if any extent is 0.
    pub fn new(extent: [u32; 3]) -> Result<Self> {
        Self::with_spacing(extent, [1.0; 3], [0.0; 3])
    }

    /// Create a 2-D geometry (z extent 1)
    pub fn new_2d(width: u32, height: u32) -> Result<Self> {
        Self::new([width, height, 1])
    }

    /// Create a geometry with explicit spacing and origin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidExtent` if any extent is 0 and
    /// `Error::InvalidSpacing` if any spacing is not finite and positive.
    pub fn with_spacing(extent: [u32; 3], spacing: [f64; 3], origin: [f64; 3]) -> Result<Self> {
        if extent.contains(&0) {
            return Err(Error::InvalidExtent(extent));
        }
        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::InvalidSpacing(spacing));
        }
        if origin.iter().any(|o| !o.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "origin must be finite, got {:?}",
                origin
            )));
        }
        Ok(Self {
            extent,
            spacing,
            origin,
        })
    }

    #[inline]
    pub fn extent(&self) -> [u32; 3] {
        self.extent
    }

    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.extent[0]
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.extent[1]
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.extent[2]
    }

    /// Total number of voxels
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.extent.iter().map(|&e| e as usize).product()
    }

    /// Whether `axis` has extent 1
    #[inline]
    pub fn is_collapsed(&self, axis: usize) -> bool {
        self.extent[axis] == 1
    }

    /// Number of non-collapsed axes
    pub fn active_dimension(&self) -> usize {
        (0..3).filter(|&a| !self.is_collapsed(a)).count()
    }

    /// Whether `coord` lies inside the grid
    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x < self.extent[0] && coord.y < self.extent[1] && coord.z < self.extent[2]
    }

    /// Linear index of `coord` (x fastest, then y, then z)
    ///
    /// The coordinate is not bounds-checked.
    #[inline]
    pub fn index_of(&self, coord: VoxelCoord) -> usize {
        let w = self.extent[0] as usize;
        let h = self.extent[1] as usize;
        coord.x as usize + w * (coord.y as usize + h * coord.z as usize)
    }

    /// Coordinate of linear index `idx`
    #[inline]
    pub fn coord_of(&self, idx: usize) -> VoxelCoord {
        let w = self.extent[0] as usize;
        let h = self.extent[1] as usize;
        let x = idx % w;
        let y = (idx / w) % h;
        let z = idx / (w * h);
        VoxelCoord::new(x as u32, y as u32, z as u32)
    }

    /// Iterate over all coordinates in linear-index order
    pub fn coords(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        (0..self.voxel_count()).map(move |i| self.coord_of(i))
    }

    /// Check that `other` describes the same grid
    ///
    /// # Errors
    ///
    /// Returns `Error::GeometryMismatch` naming both grids.
    pub fn check_same(&self, other: &Geometry) -> Result<()> {
        if self != other {
            return Err(Error::GeometryMismatch {
                expected: self.to_string(),
                actual: other.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} spacing {:?} origin {:?}",
            self.extent[0], self.extent[1], self.extent[2], self.spacing, self.origin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_rejects_zero_extent() {
        assert_eq!(
            Geometry::new([3, 0, 1]).unwrap_err(),
            Error::InvalidExtent([3, 0, 1])
        );
    }

    #[test]
    fn test_geometry_rejects_bad_spacing() {
        assert!(Geometry::with_spacing([2, 2, 2], [1.0, 0.0, 1.0], [0.0; 3]).is_err());
        assert!(Geometry::with_spacing([2, 2, 2], [1.0, f64::NAN, 1.0], [0.0; 3]).is_err());
    }

    #[test]
    fn test_index_roundtrip_3d() {
        let geom = Geometry::new([3, 4, 5]).unwrap();
        for idx in 0..geom.voxel_count() {
            assert_eq!(geom.index_of(geom.coord_of(idx)), idx);
        }
        assert_eq!(geom.index_of(VoxelCoord::new(2, 3, 4)), 59);
    }

    #[test]
    fn test_collapsed_axes() {
        let geom = Geometry::new_2d(5, 5).unwrap();
        assert!(!geom.is_collapsed(0));
        assert!(geom.is_collapsed(2));
        assert_eq!(geom.active_dimension(), 2);
    }

    #[test]
    fn test_offset() {
        let extent = [3, 3, 1];
        let c = VoxelCoord::new(0, 1, 0);
        assert_eq!(c.offset([-1, 0, 0], extent), None);
        assert_eq!(c.offset([2, 1, 0], extent), Some(VoxelCoord::new(2, 2, 0)));
        assert_eq!(c.offset_clamped([-4, 5, 1], extent), VoxelCoord::new(0, 2, 0));
    }

    #[test]
    fn test_check_same() {
        let a = Geometry::new_2d(3, 3).unwrap();
        let b = Geometry::with_spacing([3, 3, 1], [0.5, 1.0, 1.0], [0.0; 3]).unwrap();
        assert!(a.check_same(&a).is_ok());
        assert!(matches!(
            a.check_same(&b),
            Err(Error::GeometryMismatch { .. })
        ));
    }
}
