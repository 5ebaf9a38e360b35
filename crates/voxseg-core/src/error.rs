//! Error types for voxseg-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// voxseg core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid grid extent
    #[error("invalid extent: {}x{}x{}", .0[0], .0[1], .0[2])]
    InvalidExtent([u32; 3]),

    /// Invalid voxel spacing
    #[error("invalid spacing: {:?} (all components must be finite and > 0)", .0)]
    InvalidSpacing([f64; 3]),

    /// Voxel coordinate outside the grid
    #[error("voxel ({x}, {y}, {z}) outside grid {}x{}x{}", .extent[0], .extent[1], .extent[2])]
    OutOfBounds {
        x: u32,
        y: u32,
        z: u32,
        extent: [u32; 3],
    },

    /// Two grids that must share a geometry do not
    #[error("geometry mismatch: {expected} vs {actual}")]
    GeometryMismatch { expected: String, actual: String },

    /// Raw data length does not match the grid
    #[error("data length {len} does not match {voxels} voxels")]
    DataLength { len: usize, voxels: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
