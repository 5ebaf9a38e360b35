//! voxseg core - Basic data structures for voxel classification
//!
//! This crate provides the fundamental data structures shared by the
//! voxseg crates:
//!
//! - [`Geometry`] / [`VoxelCoord`] - Sampling grid and voxel positions
//! - [`Volume`] - Generic voxel grid
//! - [`ProbabilityImage`] - Floating-point per-class field
//! - [`MaskVolume`] - 8-bit working buffer of the regularizer
//! - [`LabelMap`] / [`LabelValue`] - Label grids and the void label

pub mod error;
pub mod geometry;
pub mod label;
pub mod volume;

pub use error::{Error, Result};
pub use geometry::{Geometry, VoxelCoord};
pub use label::{LabelMap, LabelValue};
pub use volume::Volume;
pub use volume::field::ProbabilityImage;

/// 8-bit marker buffer used by the regularizer and the morphology crates
pub type MaskVolume = Volume<u8>;

/// Marker values carried by a [`MaskVolume`]
pub mod marker {
    /// Rejected or background voxel
    pub const BACKGROUND: u8 = 0;
    /// Lower bound of the first region-growth window
    pub const CANDIDATE_LOWER: u8 = 64;
    /// Candidate voxel awaiting connectivity confirmation
    pub const CANDIDATE: u8 = 128;
    /// Upper bound of the first growth window, lower bound of the second
    pub const CANDIDATE_UPPER: u8 = 194;
    /// Confirmed foreground voxel
    pub const CONFIRMED: u8 = 255;
}
