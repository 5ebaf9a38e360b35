//! Volume - Generic voxel grid
//!
//! `Volume<T>` stores one value of type `T` per voxel of a [`Geometry`].
//! It is used for label maps (`Volume<L>` with `L: LabelValue`),
//! per-class probability images (`Volume<f32>`) and the 0/128/255 working
//! buffers of the regularizer (`Volume<u8>`).
//!
//! See [`field`] for the floating-point specific operations.
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{Geometry, Volume, VoxelCoord};
//!
//! let geom = Geometry::new([4, 4, 2]).unwrap();
//! let mut vol: Volume<u8> = Volume::new(geom);
//!
//! vol.set(VoxelCoord::new(1, 2, 1), 128).unwrap();
//! assert_eq!(vol.get(VoxelCoord::new(1, 2, 1)).unwrap(), 128);
//! assert_eq!(vol.count_value(128), 1);
//! ```

pub mod field;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, VoxelCoord};

/// Voxel grid
///
/// # Memory Layout
///
/// Data is stored in linear-index order with no padding: x fastest, then
/// y, then z. The voxel at (x, y, z) is at `x + width * (y + height * z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    geometry: Geometry,
    data: Vec<T>,
}

impl<T: Copy + Default> Volume<T> {
    /// Create a new volume with every voxel set to `T::default()`
    pub fn new(geometry: Geometry) -> Self {
        Self::new_with_value(geometry, T::default())
    }
}

impl<T: Copy> Volume<T> {
    /// Create a new volume with every voxel set to `value`
    ///
    /// # Examples
    ///
    /// ```
    /// use voxseg_core::{Geometry, Volume, VoxelCoord};
    ///
    /// let vol = Volume::new_with_value(Geometry::new_2d(3, 3).unwrap(), 0.5f32);
    /// assert_eq!(vol.get(VoxelCoord::new(2, 2, 0)).unwrap(), 0.5);
    /// ```
    pub fn new_with_value(geometry: Geometry, value: T) -> Self {
        Self {
            geometry,
            data: vec![value; geometry.voxel_count()],
        }
    }

    /// Create a volume from raw data in linear-index order
    ///
    /// # Errors
    ///
    /// Returns `Error::DataLength` if the data length doesn't match the grid.
    pub fn from_data(geometry: Geometry, data: Vec<T>) -> Result<Self> {
        let voxels = geometry.voxel_count();
        if data.len() != voxels {
            return Err(Error::DataLength {
                len: data.len(),
                voxels,
            });
        }
        Ok(Self { geometry, data })
    }

    /// Create a volume of the same geometry filled with `value`
    pub fn create_template<U: Copy>(&self, value: U) -> Volume<U> {
        Volume::new_with_value(self.geometry, value)
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn extent(&self) -> [u32; 3] {
        self.geometry.extent()
    }

    /// Number of voxels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed volume; present for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the value at `coord`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the coordinate is outside the grid.
    #[inline]
    pub fn get(&self, coord: VoxelCoord) -> Result<T> {
        self.check_bounds(coord)?;
        Ok(self.data[self.geometry.index_of(coord)])
    }

    /// Set the value at `coord`
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfBounds` if the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, coord: VoxelCoord, value: T) -> Result<()> {
        self.check_bounds(coord)?;
        let idx = self.geometry.index_of(coord);
        self.data[idx] = value;
        Ok(())
    }

    /// Get the value at `coord` without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the data.
    #[inline]
    pub fn get_unchecked(&self, coord: VoxelCoord) -> T {
        self.data[self.geometry.index_of(coord)]
    }

    /// Set the value at `coord` without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the data.
    #[inline]
    pub fn set_unchecked(&mut self, coord: VoxelCoord, value: T) {
        let idx = self.geometry.index_of(coord);
        self.data[idx] = value;
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the volume and return its data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Set all voxels to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every voxel, producing a new volume of the same geometry
    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Volume<U> {
        Volume {
            geometry: self.geometry,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Iterate over `(coord, value)` pairs in linear-index order
    pub fn iter_voxels(&self) -> impl Iterator<Item = (VoxelCoord, T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.geometry.coord_of(i), v))
    }

    fn check_bounds(&self, coord: VoxelCoord) -> Result<()> {
        if !self.geometry.contains(coord) {
            return Err(Error::OutOfBounds {
                x: coord.x,
                y: coord.y,
                z: coord.z,
                extent: self.geometry.extent(),
            });
        }
        Ok(())
    }
}

impl<T: Copy + PartialEq> Volume<T> {
    /// Number of voxels equal to `value`
    pub fn count_value(&self, value: T) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> Geometry {
        Geometry::new([4, 3, 2]).unwrap()
    }

    #[test]
    fn test_volume_creation() {
        let vol: Volume<u8> = Volume::new(geom());
        assert_eq!(vol.len(), 24);
        assert!(vol.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_volume_from_data_wrong_size() {
        let err = Volume::from_data(geom(), vec![0u8; 5]).unwrap_err();
        assert_eq!(err, Error::DataLength { len: 5, voxels: 24 });
    }

    #[test]
    fn test_volume_voxel_access() {
        let mut vol: Volume<u16> = Volume::new(geom());
        let c = VoxelCoord::new(3, 2, 1);
        vol.set(c, 7).unwrap();
        assert_eq!(vol.get(c).unwrap(), 7);
        assert_eq!(vol.data()[23], 7);
    }

    #[test]
    fn test_volume_out_of_bounds() {
        let mut vol: Volume<u8> = Volume::new(geom());
        assert!(matches!(
            vol.get(VoxelCoord::new(4, 0, 0)),
            Err(Error::OutOfBounds { x: 4, .. })
        ));
        assert!(vol.set(VoxelCoord::new(0, 0, 2), 1).is_err());
    }

    #[test]
    fn test_volume_map_and_count() {
        let vol = Volume::new_with_value(geom(), 3u8);
        let doubled = vol.map(|v| v as u32 * 2);
        assert_eq!(doubled.count_value(6), 24);
        assert_eq!(doubled.geometry(), vol.geometry());
    }

    #[test]
    fn test_iter_voxels_order() {
        let vol = Volume::from_data(Geometry::new_2d(2, 2).unwrap(), vec![1, 2, 3, 4]).unwrap();
        let coords: Vec<_> = vol.iter_voxels().collect();
        assert_eq!(coords[1], (VoxelCoord::new(1, 0, 0), 2));
        assert_eq!(coords[2], (VoxelCoord::new(0, 1, 0), 3));
    }
}
