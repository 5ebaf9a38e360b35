//! Seeded region growth
//!
//! Connected-threshold growth: starting from a set of seed voxels, mark
//! every voxel whose value lies in an inclusive window and that is
//! connected to a seed through voxels also inside the window. The result
//! is a fresh buffer holding the replace value on the grown region and
//! 0 everywhere else. Seeds whose own value lies outside the window grow
//! nothing.

use crate::conncomp::Connectivity;
use crate::error::{RegionError, RegionResult};
use log::debug;
use std::collections::VecDeque;
use voxseg_core::{MaskVolume, Volume, VoxelCoord};

/// Options for connected-threshold growth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdGrowOptions {
    /// Inclusive lower bound of the value window
    pub lower: u8,
    /// Inclusive upper bound of the value window
    pub upper: u8,
    /// Value written on grown voxels
    pub replace_value: u8,
    /// Neighbourhood used to connect voxels
    pub connectivity: Connectivity,
}

impl ThresholdGrowOptions {
    /// Create options for the window `[lower, upper]`, replace value 255
    /// and face connectivity
    pub fn new(lower: u8, upper: u8) -> Self {
        Self {
            lower,
            upper,
            replace_value: 255,
            connectivity: Connectivity::Face,
        }
    }

    /// Set the replace value
    pub fn with_replace_value(mut self, value: u8) -> Self {
        self.replace_value = value;
        self
    }

    /// Set the connectivity
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[inline]
    fn accepts(&self, v: u8) -> bool {
        v >= self.lower && v <= self.upper
    }
}

/// Grow the seeds over the value window of `options`
///
/// # Arguments
///
/// * `mask` - Input buffer (8-bit)
/// * `seeds` - Seed voxels; duplicates are allowed
/// * `options` - Window, replace value and connectivity
///
/// # Returns
///
/// A new buffer with `replace_value` on the grown region and 0 elsewhere.
///
/// # Errors
///
/// Returns `RegionError::InvalidSeed` if a seed lies outside the grid and
/// `RegionError::InvalidParameters` if `lower > upper`.
pub fn connected_threshold<I>(
    mask: &MaskVolume,
    seeds: I,
    options: &ThresholdGrowOptions,
) -> RegionResult<MaskVolume>
where
    I: IntoIterator<Item = VoxelCoord>,
{
    if options.lower > options.upper {
        return Err(RegionError::InvalidParameters(format!(
            "empty window [{}, {}]",
            options.lower, options.upper
        )));
    }

    let geometry = *mask.geometry();
    let extent = geometry.extent();
    let offsets = options.connectivity.offsets(&geometry);

    let mut grown: Vec<bool> = vec![false; geometry.voxel_count()];
    let mut queue = VecDeque::new();
    let mut seed_count = 0usize;

    for seed in seeds {
        if !geometry.contains(seed) {
            return Err(RegionError::InvalidSeed {
                x: seed.x,
                y: seed.y,
                z: seed.z,
            });
        }
        seed_count += 1;
        let idx = geometry.index_of(seed);
        if !grown[idx] && options.accepts(mask.data()[idx]) {
            grown[idx] = true;
            queue.push_back(seed);
        }
    }

    let mut region = 0usize;
    while let Some(c) = queue.pop_front() {
        region += 1;
        for &delta in &offsets {
            let Some(n) = c.offset(delta, extent) else {
                continue;
            };
            let idx = geometry.index_of(n);
            if !grown[idx] && options.accepts(mask.data()[idx]) {
                grown[idx] = true;
                queue.push_back(n);
            }
        }
    }

    debug!(
        "connected_threshold [{}, {}]: {} seeds grew {} voxels",
        options.lower, options.upper, seed_count, region
    );

    let data = grown
        .into_iter()
        .map(|g| if g { options.replace_value } else { 0 })
        .collect();
    Ok(Volume::from_data(geometry, data)?)
}
