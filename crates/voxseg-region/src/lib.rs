//! voxseg-region - Region processing for voxel buffers
//!
//! This crate provides the connectivity-constrained growth used by the
//! regularizer:
//!
//! - **Connectivity** - Face or full neighbourhoods on the active axes
//! - **Connected-threshold growth** - Seeded growth over a value window
//!
//! # Examples
//!
//! ```
//! use voxseg_core::{Geometry, MaskVolume, Volume, VoxelCoord};
//! use voxseg_region::{ThresholdGrowOptions, connected_threshold};
//!
//! let geom = Geometry::new_2d(4, 1).unwrap();
//! let mask: MaskVolume = Volume::from_data(geom, vec![128, 128, 0, 128]).unwrap();
//! let grown = connected_threshold(
//!     &mask,
//!     [VoxelCoord::new(0, 0, 0)],
//!     &ThresholdGrowOptions::new(64, 194),
//! )
//! .unwrap();
//! assert_eq!(grown.data(), &[255, 255, 0, 0]);
//! ```

pub mod conncomp;
pub mod error;
pub mod seedfill;

// Re-export core types
pub use voxseg_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use conncomp::Connectivity;
pub use seedfill::{ThresholdGrowOptions, connected_threshold};
