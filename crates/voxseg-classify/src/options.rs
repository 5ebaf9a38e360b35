//! Segmenter options

use crate::error::{ClassifyError, ClassifyResult};
use crate::merge::ReclassifyPolicy;

/// Options controlling probability smoothing and spatial regularization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterOptions {
    /// Radius of the ball used by the two morphology passes (0 disables)
    pub erode_radius: u32,
    /// Maximum number of voting hole-fill passes (0 disables)
    pub hole_fill_iterations: u32,
    /// Dilate before reconnecting and erode after, instead of the reverse
    pub dilate_first: bool,
    /// Gaussian smoothing of probability images, physical units (0 disables)
    pub smoothing_sigma: f64,
    /// Allow confirmed voxels to overwrite other object ids, and revert
    /// unconfirmed voxels of the current class to void
    pub reclassify_object_labels: bool,
    /// Allow confirmed voxels to overwrite non-object, non-void labels
    pub reclassify_not_object_labels: bool,
    /// Label every voxel with its most probable class
    pub force_classification: bool,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            erode_radius: 1,
            hole_fill_iterations: 1,
            dilate_first: false,
            smoothing_sigma: 0.0,
            reclassify_object_labels: false,
            reclassify_not_object_labels: false,
            force_classification: false,
        }
    }
}

impl SegmenterOptions {
    /// Set the morphology radius
    pub fn with_erode_radius(mut self, radius: u32) -> Self {
        self.erode_radius = radius;
        self
    }

    /// Set the number of hole-fill passes
    pub fn with_hole_fill_iterations(mut self, iterations: u32) -> Self {
        self.hole_fill_iterations = iterations;
        self
    }

    /// Set whether dilation comes first
    pub fn with_dilate_first(mut self, dilate_first: bool) -> Self {
        self.dilate_first = dilate_first;
        self
    }

    /// Set the probability smoothing sigma
    pub fn with_smoothing_sigma(mut self, sigma: f64) -> Self {
        self.smoothing_sigma = sigma;
        self
    }

    /// Set whether existing object labels may be reclassified
    pub fn with_reclassify_object_labels(mut self, reclassify: bool) -> Self {
        self.reclassify_object_labels = reclassify;
        self
    }

    /// Set whether existing non-object labels may be reclassified
    pub fn with_reclassify_not_object_labels(mut self, reclassify: bool) -> Self {
        self.reclassify_not_object_labels = reclassify;
        self
    }

    /// Set forced argmax classification
    pub fn with_force_classification(mut self, force: bool) -> Self {
        self.force_classification = force;
        self
    }

    /// Merge policy built from the two reclassify flags
    pub fn policy(&self) -> ReclassifyPolicy {
        ReclassifyPolicy::new(
            self.reclassify_object_labels,
            self.reclassify_not_object_labels,
        )
    }

    /// Check option values
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidParameter` for a negative or
    /// non-finite smoothing sigma.
    pub fn validate(&self) -> ClassifyResult<()> {
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma < 0.0 {
            return Err(ClassifyError::InvalidParameter(format!(
                "smoothing sigma must be finite and >= 0, got {}",
                self.smoothing_sigma
            )));
        }
        Ok(())
    }
}
