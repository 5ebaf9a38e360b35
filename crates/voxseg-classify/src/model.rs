//! Probability models
//!
//! A model turns a feature vector into a non-negative likelihood for one
//! class. How it is trained is up to the implementation; the segmenter
//! only calls [`ProbabilityModel::fit`] with the current sample whenever
//! the sample changes.

use crate::error::ClassifyResult;
use crate::sample::Sample;

/// Per-class scoring function
pub trait ProbabilityModel {
    /// Train the model from a freshly collected sample
    ///
    /// The default keeps the model unchanged.
    fn fit(&mut self, sample: &Sample) -> ClassifyResult<()> {
        let _ = sample;
        Ok(())
    }

    /// Likelihood of `features` under class `class_index`
    fn score(&self, class_index: usize, features: &[f32]) -> f32;
}

/// Model that scores every input as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroModel;

impl ProbabilityModel for ZeroModel {
    fn score(&self, _class_index: usize, _features: &[f32]) -> f32 {
        0.0
    }
}
