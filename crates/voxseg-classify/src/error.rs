//! Error types for voxseg-classify
//!
//! Configuration errors are raised by setters and lookups before any state
//! changes. Precondition errors are raised by the pipeline stages before
//! they touch cached results or the label map.

use thiserror::Error;

/// Errors that can occur while configuring or running the segmenter
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxseg_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] voxseg_morph::MorphError),

    /// Region growth error
    #[error("region error: {0}")]
    Region(#[from] voxseg_region::RegionError),

    /// Filtering error
    #[error("filter error: {0}")]
    Filter(#[from] voxseg_filter::FilterError),

    /// Object id lookup for an id that is not in the list
    #[error("object id {0} not found in object id list")]
    ObjectIdNotFound(String),

    /// Object id added twice
    #[error("object id {0} is already in the object id list")]
    DuplicateObjectId(String),

    /// The void label was used as an object id
    #[error("object id {0} is the void label")]
    VoidObjectId(String),

    /// Weight list length differs from the object id list
    #[error("weight count mismatch: {ids} object ids, {weights} weights")]
    WeightCountMismatch { ids: usize, weights: usize },

    /// Class index past the end of the object id list
    #[error("class index {index} out of range for {count} classes")]
    ClassIndexOutOfRange { index: usize, count: usize },

    /// Invalid option or argument value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation needs at least one object id
    #[error("no object ids configured")]
    NoClasses,

    /// Operation needs a feature vector generator
    #[error("no feature vector generator set")]
    NoFeatureGenerator,

    /// Sample requested without a supplied label map
    #[error("no label map set")]
    NoLabelMap,

    /// Label map and feature generator disagree on the grid
    #[error("geometry mismatch: label map {label_map}, features {features}")]
    GeometryMismatch { label_map: String, features: String },

    /// Training voxel outside the probability image grid
    #[error("sample voxel ({x}, {y}, {z}) is outside the image grid")]
    SampleOutsideGrid { x: u32, y: u32, z: u32 },

    /// Feature vector length differs from what was expected
    #[error("feature count mismatch: expected {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}

/// Result type for classification operations
pub type ClassifyResult<T> = Result<T, ClassifyError>;
