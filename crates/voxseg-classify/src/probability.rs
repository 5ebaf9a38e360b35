//! Probability image construction
//!
//! For every class `c` and voxel `v` the image value is
//! `weight[c] * score(c, features(v))`, optionally Gaussian-smoothed and
//! finally clamped so that no value is negative.

use crate::error::{ClassifyError, ClassifyResult};
use crate::feature::FeatureVectorGenerator;
use crate::model::ProbabilityModel;
use log::{debug, warn};
use voxseg_core::{ProbabilityImage, Volume};
use voxseg_filter::gaussian_smooth;

/// Builder for per-class probability images
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbabilityImageBuilder {
    /// Smoothing standard deviation in physical units (0 disables)
    pub sigma: f64,
}

impl ProbabilityImageBuilder {
    /// Create a builder without smoothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smoothing standard deviation
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Build one image per weight on the generator's grid
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoClasses` if `weights` is empty and
    /// `ClassifyError::InvalidParameter` for a negative or non-finite
    /// sigma.
    pub fn build<M: ProbabilityModel + ?Sized>(
        &self,
        generator: &dyn FeatureVectorGenerator,
        model: &M,
        weights: &[f64],
    ) -> ClassifyResult<Vec<ProbabilityImage>> {
        if weights.is_empty() {
            return Err(ClassifyError::NoClasses);
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ClassifyError::InvalidParameter(format!(
                "smoothing sigma must be finite and >= 0, got {}",
                self.sigma
            )));
        }

        let geometry = *generator.geometry();
        let mut images: Vec<ProbabilityImage> =
            weights.iter().map(|_| Volume::new(geometry)).collect();
        let mut fv = vec![0.0f32; generator.feature_count()];

        for (idx, coord) in geometry.coords().enumerate() {
            generator.feature_vector(coord, &mut fv);
            for (c, (image, &w)) in images.iter_mut().zip(weights).enumerate() {
                image.data_mut()[idx] = (w * model.score(c, &fv) as f64) as f32;
            }
        }

        let mut clamped = 0usize;
        for image in &mut images {
            if self.sigma > 0.0 {
                *image = gaussian_smooth(image, self.sigma)?;
            }
            clamped += image.threshold_below(0.0, 0.0);
        }

        if images.iter().all(|im| im.max_value().unwrap_or(0.0) <= 0.0) {
            warn!("probability images are zero everywhere; classification will favour the first class");
        }
        debug!(
            "built {} probability images over {}, sigma {}, {} negative values clamped",
            images.len(),
            geometry,
            self.sigma,
            clamped
        );

        Ok(images)
    }
}

/// Index of the most probable class at linear index `idx`
///
/// Ties go to the lowest class index.
pub fn argmax_class(images: &[ProbabilityImage], idx: usize) -> usize {
    let mut best = 0;
    let mut best_p = f32::NEG_INFINITY;
    for (c, image) in images.iter().enumerate() {
        let p = image.data()[idx];
        if p > best_p {
            best_p = p;
            best = c;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ChannelStack;
    use voxseg_core::Geometry;

    struct Scaled;

    impl ProbabilityModel for Scaled {
        fn score(&self, class_index: usize, features: &[f32]) -> f32 {
            features[0] * (class_index + 1) as f32 - 1.0
        }
    }

    fn stack() -> ChannelStack {
        let geom = Geometry::new_2d(2, 2).unwrap();
        let ch = Volume::from_data(geom, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        ChannelStack::new(vec![ch]).unwrap()
    }

    #[test]
    fn test_weighted_scores_are_clamped() {
        let images = ProbabilityImageBuilder::new()
            .build(&stack(), &Scaled, &[1.0, 0.5])
            .unwrap();
        assert_eq!(images.len(), 2);
        // class 0: f - 1 -> [-1, 0, 1, 2], negatives clamped
        assert_eq!(images[0].data(), &[0.0, 0.0, 1.0, 2.0]);
        // class 1: 0.5 * (2f - 1) -> [-0.5, 0.5, 1.5, 2.5]
        assert_eq!(images[1].data(), &[0.0, 0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_no_classes() {
        let err = ProbabilityImageBuilder::new().build(&stack(), &Scaled, &[]);
        assert!(matches!(err, Err(ClassifyError::NoClasses)));
    }

    #[test]
    fn test_invalid_sigma() {
        let builder = ProbabilityImageBuilder::new().with_sigma(-1.0);
        assert!(matches!(
            builder.build(&stack(), &Scaled, &[1.0]),
            Err(ClassifyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_smoothing_keeps_constant_images() {
        struct Half;
        impl ProbabilityModel for Half {
            fn score(&self, _: usize, _: &[f32]) -> f32 {
                0.5
            }
        }
        let images = ProbabilityImageBuilder::new()
            .with_sigma(1.0)
            .build(&stack(), &Half, &[1.0])
            .unwrap();
        assert!(images[0].data().iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_argmax_ties_to_lowest() {
        let geom = Geometry::new_2d(2, 1).unwrap();
        let a = Volume::from_data(geom, vec![1.0, 0.2]).unwrap();
        let b = Volume::from_data(geom, vec![1.0, 0.7]).unwrap();
        let c = Volume::from_data(geom, vec![0.5, 0.7]).unwrap();
        let images = vec![a, b, c];
        assert_eq!(argmax_class(&images, 0), 0);
        assert_eq!(argmax_class(&images, 1), 1);
    }
}
