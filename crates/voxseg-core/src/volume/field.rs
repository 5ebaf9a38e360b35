//! Floating-point volume operations
//!
//! Arithmetic and statistics on `Volume<f32>`, the storage type of the
//! per-class probability images.

use super::Volume;
use crate::error::Result;

/// Per-class probability field
pub type ProbabilityImage = Volume<f32>;

impl Volume<f32> {
    /// Multiply every voxel by `value`
    pub fn mul_constant(&mut self, value: f32) {
        for v in self.data_mut() {
            *v *= value;
        }
    }

    /// Add `value` to every voxel
    pub fn add_constant(&mut self, value: f32) {
        for v in self.data_mut() {
            *v += value;
        }
    }

    /// Replace every value strictly below `threshold` with `outside`
    ///
    /// Returns the number of voxels replaced.
    pub fn threshold_below(&mut self, threshold: f32, outside: f32) -> usize {
        let mut replaced = 0;
        for v in self.data_mut() {
            if *v < threshold {
                *v = outside;
                replaced += 1;
            }
        }
        replaced
    }

    /// Minimum value
    pub fn min_value(&self) -> Option<f32> {
        self.data().iter().copied().reduce(f32::min)
    }

    /// Maximum value
    pub fn max_value(&self) -> Option<f32> {
        self.data().iter().copied().reduce(f32::max)
    }

    /// Sum of all values
    pub fn sum(&self) -> f32 {
        self.data().iter().sum()
    }

    /// Mean of all values
    pub fn mean(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / self.len() as f32)
    }

    /// Largest absolute voxel-wise difference to `other`
    ///
    /// # Errors
    ///
    /// Returns `Error::GeometryMismatch` if the grids differ.
    pub fn max_abs_diff(&self, other: &Volume<f32>) -> Result<f32> {
        self.geometry().check_same(other.geometry())?;
        Ok(self
            .data()
            .iter()
            .zip(other.data())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max))
    }
}
