//! Iterative voting hole filling
//!
//! A background voxel is switched to foreground when the number of
//! foreground voxels in its radius-1 neighbourhood reaches the *birth
//! threshold* `neighbourhood_size / 2 + majority`. The neighbourhood
//! spans only the active axes of the grid (9 voxels in 2-D, 27 in 3-D)
//! and replicates the border voxels outside the grid.
//!
//! Each iteration reads the result of the previous one. Filling stops
//! after `max_iterations` passes or as soon as a pass changes nothing.

use crate::MorphResult;
use log::debug;
use voxseg_core::{MaskVolume, VoxelCoord};

/// Options for voting hole filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleFillOptions {
    /// Value treated as foreground
    pub foreground: u8,
    /// Value treated as background (only these voxels may flip)
    pub background: u8,
    /// Votes above the neighbourhood median needed to flip a voxel
    pub majority: u32,
    /// Maximum number of passes (0 disables filling)
    pub max_iterations: u32,
}

impl Default for HoleFillOptions {
    fn default() -> Self {
        Self {
            foreground: 255,
            background: 0,
            majority: 2,
            max_iterations: 1,
        }
    }
}

impl HoleFillOptions {
    /// Set the maximum number of passes
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the majority threshold
    pub fn with_majority(mut self, majority: u32) -> Self {
        self.majority = majority;
        self
    }
}

/// Summary of a hole filling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoleFillReport {
    /// Passes actually executed
    pub iterations: u32,
    /// Voxels switched to foreground over all passes
    pub filled: usize,
}

/// Fill holes in the foreground of `mask`
///
/// # Returns
///
/// The filled buffer and a report of the passes run.
pub fn fill_holes_voting(
    mask: &MaskVolume,
    options: &HoleFillOptions,
) -> MorphResult<(MaskVolume, HoleFillReport)> {
    let geometry = *mask.geometry();
    let extent = geometry.extent();

    let radius: [i32; 3] = std::array::from_fn(|a| if geometry.is_collapsed(a) { 0 } else { 1 });
    let mut offsets = Vec::with_capacity(27);
    for dz in -radius[2]..=radius[2] {
        for dy in -radius[1]..=radius[1] {
            for dx in -radius[0]..=radius[0] {
                if [dx, dy, dz] != [0, 0, 0] {
                    offsets.push([dx, dy, dz]);
                }
            }
        }
    }
    let neighbourhood_size = offsets.len() as u32 + 1;
    let birth = neighbourhood_size / 2 + options.majority;

    let mut current = mask.clone();
    let mut report = HoleFillReport::default();

    while report.iterations < options.max_iterations {
        let mut next = current.clone();
        let mut changed = 0usize;

        for (idx, &v) in current.data().iter().enumerate() {
            if v != options.background {
                continue;
            }
            let center: VoxelCoord = geometry.coord_of(idx);
            let votes = offsets
                .iter()
                .filter(|&&d| {
                    current.get_unchecked(center.offset_clamped(d, extent)) == options.foreground
                })
                .count() as u32;
            if votes >= birth {
                next.data_mut()[idx] = options.foreground;
                changed += 1;
            }
        }

        report.iterations += 1;
        report.filled += changed;
        current = next;
        if changed == 0 {
            break;
        }
    }

    debug!(
        "fill_holes_voting: birth threshold {} of {}, {} passes, {} voxels filled",
        birth, neighbourhood_size, report.iterations, report.filled
    );

    Ok((current, report))
}
