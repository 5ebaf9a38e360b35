//! voxseg-classify - Voxel-wise PDF classification
//!
//! This crate turns a partial label map and per-voxel feature vectors into
//! a spatially regularized multi-class label map:
//!
//! - **Sample collection** - Training voxels per class plus an outside set
//! - **Probability images** - Weighted, smoothed and clamped class scores
//! - **Regularization** - Per-class seed, grow, fill, morph and reconnect
//! - **Merging** - Reclassification policy over existing labels
//! - **Caching** - [`PdfSegmenter`] recomputes only stale stages
//!
//! # Examples
//!
//! ```
//! use voxseg_classify::{ChannelStack, PdfSegmenter, ProbabilityModel};
//! use voxseg_core::{Geometry, Volume};
//!
//! struct Threshold;
//!
//! impl ProbabilityModel for Threshold {
//!     fn score(&self, class_index: usize, features: &[f32]) -> f32 {
//!         let bright = features[0] > 0.5;
//!         if bright == (class_index == 0) { 1.0 } else { 0.0 }
//!     }
//! }
//!
//! let geom = Geometry::new_2d(3, 1).unwrap();
//! let channel = Volume::from_data(geom, vec![0.9, 0.1, 0.8]).unwrap();
//!
//! let mut seg = PdfSegmenter::<u8, _>::new(Threshold);
//! seg.set_feature_generator(ChannelStack::new(vec![channel]).unwrap());
//! seg.set_object_ids(vec![1, 2]).unwrap();
//! seg.classify().unwrap();
//! assert_eq!(seg.label_map().unwrap().data(), &[1, 2, 1]);
//! ```

mod error;
pub mod feature;
pub mod ids;
pub mod merge;
pub mod model;
pub mod options;
pub mod probability;
pub mod progress;
pub mod regularize;
pub mod sample;
pub mod segmenter;

pub use error::{ClassifyError, ClassifyResult};

pub use feature::{ChannelStack, FeatureVectorGenerator};
pub use ids::ObjectIdList;
pub use merge::{MergeReport, ReclassifyPolicy, classify_argmax, merge_confirmed};
pub use model::{ProbabilityModel, ZeroModel};
pub use options::SegmenterOptions;
pub use probability::{ProbabilityImageBuilder, argmax_class};
pub use progress::ProgressSink;
pub use regularize::{RegionPipeline, RegionStage};
pub use sample::{ClassSample, Sample, collect_sample};
pub use segmenter::PdfSegmenter;
