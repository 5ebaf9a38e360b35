//! Value-based binary morphology
//!
//! Implements dilation and erosion of the voxels carrying a given
//! foreground value in a [`MaskVolume`]. Voxels not touched by the
//! operation keep their input value, so the buffers may carry other
//! marker values alongside the foreground.
//!
//! Boundary handling is asymmetric: dilation never reaches in from
//! outside the grid, and erosion treats outside voxels as foreground so
//! objects touching the border are not eaten away from it.

use crate::{BallElement, MorphResult};
use voxseg_core::{MaskVolume, VoxelCoord, marker};

/// Dilate the voxels equal to `value`
///
/// Every voxel within the element's reach of a foreground voxel is set
/// to `value`; every other voxel keeps its input value.
pub fn dilate_value(mask: &MaskVolume, element: &BallElement, value: u8) -> MorphResult<MaskVolume> {
    let geometry = *mask.geometry();
    let extent = geometry.extent();
    let mut out = mask.clone();

    if element.is_point() {
        return Ok(out);
    }

    // Scatter from each foreground voxel
    for (idx, &v) in mask.data().iter().enumerate() {
        if v != value {
            continue;
        }
        let center = geometry.coord_of(idx);
        for &delta in element.offsets() {
            if let Some(c) = center.offset(delta, extent) {
                out.set_unchecked(c, value);
            }
        }
    }

    Ok(out)
}

/// Erode the voxels equal to `value`
///
/// A foreground voxel survives only if every in-grid voxel under the
/// element is also foreground; otherwise it becomes
/// [`marker::BACKGROUND`]. Every other voxel keeps its input value.
pub fn erode_value(mask: &MaskVolume, element: &BallElement, value: u8) -> MorphResult<MaskVolume> {
    let geometry = *mask.geometry();
    let extent = geometry.extent();
    let mut out = mask.clone();

    if element.is_point() {
        return Ok(out);
    }

    for (idx, &v) in mask.data().iter().enumerate() {
        if v != value {
            continue;
        }
        let center: VoxelCoord = geometry.coord_of(idx);
        let survives = element.offsets().iter().all(|&delta| {
            match center.offset(delta, extent) {
                Some(c) => mask.get_unchecked(c) == value,
                None => true, // outside counts as foreground
            }
        });
        if !survives {
            out.data_mut()[idx] = marker::BACKGROUND;
        }
    }

    Ok(out)
}

/// Open the foreground (erosion followed by dilation)
pub fn open_value(mask: &MaskVolume, element: &BallElement, value: u8) -> MorphResult<MaskVolume> {
    let eroded = erode_value(mask, element, value)?;
    dilate_value(&eroded, element, value)
}

/// Close the foreground (dilation followed by erosion)
pub fn close_value(mask: &MaskVolume, element: &BallElement, value: u8) -> MorphResult<MaskVolume> {
    let dilated = dilate_value(mask, element, value)?;
    erode_value(&dilated, element, value)
}
