//! voxseg-filter - Filtering of floating-point voxel fields
//!
//! This crate provides the smoothing applied to probability images:
//!
//! - 1-D convolution kernels, including normalized Gaussians
//! - Single-axis convolution with replicate borders
//! - Separable, spacing-aware Gaussian smoothing

pub mod convolve;
mod error;
pub mod kernel;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use convolve::{convolve_axis, gaussian_smooth};
