//! voxseg - Voxel-wise PDF segmentation for Rust
//!
//! Classifies every voxel of a multi-channel image from per-class
//! probability models, then cleans the result up with connectivity and
//! morphology so that each class forms regions grown from its training
//! voxels.
//!
//! # Overview
//!
//! - Voxel grids, label maps and probability images (core types)
//! - Ball morphology and voting hole filling ([`morph`])
//! - Connected-threshold region growth ([`region`])
//! - Spacing-aware Gaussian smoothing ([`filter`])
//! - The cached classification pipeline ([`classify`])
//!
//! # Example
//!
//! ```
//! use voxseg::classify::{ChannelStack, PdfSegmenter, ZeroModel};
//! use voxseg::{Geometry, Volume};
//!
//! let geom = Geometry::new_2d(4, 4).unwrap();
//! let channel = Volume::new(geom);
//!
//! let mut seg = PdfSegmenter::<u8, _>::new(ZeroModel);
//! seg.set_feature_generator(ChannelStack::new(vec![channel]).unwrap());
//! seg.add_object_id(1).unwrap();
//! seg.classify().unwrap();
//! assert_eq!(seg.label_map().unwrap().count_value(1), 16);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use voxseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use voxseg_classify as classify;
pub use voxseg_filter as filter;
pub use voxseg_morph as morph;
pub use voxseg_region as region;
