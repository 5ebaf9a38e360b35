//! Convolution operations
//!
//! Separable convolution of floating-point voxel fields along single grid
//! axes, with replicate (clamp) border handling.

use crate::kernel::Kernel;
use crate::{FilterError, FilterResult};
use log::debug;
use voxseg_core::ProbabilityImage;

/// Convolve a field with a 1-D kernel along one axis.
///
/// Each output voxel is the weighted sum of the kernel applied to the
/// voxels along `axis` around it. Positions outside the grid replicate
/// the nearest border voxel.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if `axis > 2`.
pub fn convolve_axis(
    field: &ProbabilityImage,
    kernel: &Kernel,
    axis: usize,
) -> FilterResult<ProbabilityImage> {
    if axis > 2 {
        return Err(FilterError::InvalidParameters(format!(
            "axis must be 0, 1 or 2, got {axis}"
        )));
    }

    let geometry = *field.geometry();
    let extent = geometry.extent();
    let n = extent[axis] as i64;
    // Linear index distance between neighbours along `axis`
    let stride = match axis {
        0 => 1usize,
        1 => extent[0] as usize,
        _ => extent[0] as usize * extent[1] as usize,
    };
    let hw = kernel.half_width() as i64;
    let taps = kernel.data();
    let src = field.data();

    let mut out = field.clone();
    for (idx, dst) in out.data_mut().iter_mut().enumerate() {
        let pos = ((idx / stride) % extent[axis] as usize) as i64;
        let line_start = idx - pos as usize * stride;
        let mut sum = 0.0f32;
        for (k, &w) in taps.iter().enumerate() {
            let s = (pos + k as i64 - hw).clamp(0, n - 1) as usize;
            sum += src[line_start + s * stride] * w;
        }
        *dst = sum;
    }

    Ok(out)
}

/// Gaussian smoothing with a standard deviation in physical units.
///
/// The kernel is applied separably along each non-collapsed axis with a
/// per-axis sigma of `sigma / spacing[axis]` voxels. A sigma of 0 returns
/// an unchanged copy. Kernels are never wider than the grid: taps reaching
/// past the far border are folded onto it, which leaves the replicate
/// border result unchanged.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if `sigma` is negative or not
/// finite.
pub fn gaussian_smooth(field: &ProbabilityImage, sigma: f64) -> FilterResult<ProbabilityImage> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "smoothing sigma must be finite and >= 0, got {sigma}"
        )));
    }
    if sigma == 0.0 {
        return Ok(field.clone());
    }

    let geometry = *field.geometry();
    let spacing = geometry.spacing();
    let extent = geometry.extent();
    let mut current = field.clone();
    for axis in 0..3 {
        if geometry.is_collapsed(axis) {
            continue;
        }
        let max_half_width = extent[axis] as usize - 1;
        let kernel = Kernel::gaussian_folded(sigma / spacing[axis], max_half_width)?;
        debug!(
            "gaussian_smooth: axis {} sigma {:.3} voxels, {} taps",
            axis,
            sigma / spacing[axis],
            kernel.len()
        );
        current = convolve_axis(&current, &kernel, axis)?;
    }
    Ok(current)
}
