//! voxseg-morph - Morphological operations on voxel marker buffers
//!
//! This crate provides the morphology the regularizer needs:
//!
//! - Ball structuring elements restricted to the active grid axes
//! - Value-based binary dilation, erosion, opening and closing
//! - Iterative voting hole filling

pub mod binary;
pub mod element;
mod error;
pub mod holefill;

pub use element::BallElement;
pub use error::{MorphError, MorphResult};

pub use binary::{close_value, dilate_value, erode_value, open_value};
pub use holefill::{HoleFillOptions, HoleFillReport, fill_holes_voting};
