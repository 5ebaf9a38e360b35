//! Feature vector generation
//!
//! The segmenter never computes features itself; it asks a generator for
//! the fixed-length vector of each voxel.

use crate::error::{ClassifyError, ClassifyResult};
use voxseg_core::{Geometry, ProbabilityImage, VoxelCoord};

/// Source of per-voxel feature vectors
pub trait FeatureVectorGenerator {
    /// Length of every feature vector
    fn feature_count(&self) -> usize;

    /// Grid the features are defined on
    fn geometry(&self) -> &Geometry;

    /// Write the feature vector of `coord` into `out`
    ///
    /// `out` has exactly `feature_count()` elements and `coord` lies inside
    /// `geometry()`.
    fn feature_vector(&self, coord: VoxelCoord, out: &mut [f32]);
}

/// Generator whose features are the values of a stack of channels
///
/// Feature `i` of a voxel is the value of channel `i` at that voxel.
#[derive(Debug, Clone)]
pub struct ChannelStack {
    geometry: Geometry,
    channels: Vec<ProbabilityImage>,
}

impl ChannelStack {
    /// Create a stack from one or more channels on the same grid
    pub fn new(channels: Vec<ProbabilityImage>) -> ClassifyResult<Self> {
        let Some(first) = channels.first() else {
            return Err(ClassifyError::InvalidParameter(
                "channel stack needs at least one channel".to_string(),
            ));
        };
        let geometry = *first.geometry();
        for ch in &channels[1..] {
            geometry.check_same(ch.geometry())?;
        }
        Ok(Self { geometry, channels })
    }

    /// Append a channel
    pub fn push_channel(&mut self, channel: ProbabilityImage) -> ClassifyResult<()> {
        self.geometry.check_same(channel.geometry())?;
        self.channels.push(channel);
        Ok(())
    }

    /// Get channel `index`
    pub fn channel(&self, index: usize) -> Option<&ProbabilityImage> {
        self.channels.get(index)
    }
}

impl FeatureVectorGenerator for ChannelStack {
    fn feature_count(&self) -> usize {
        self.channels.len()
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn feature_vector(&self, coord: VoxelCoord, out: &mut [f32]) {
        let idx = self.geometry.index_of(coord);
        for (dst, ch) in out.iter_mut().zip(&self.channels) {
            *dst = ch.data()[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxseg_core::Volume;

    #[test]
    fn test_channel_stack_features() {
        let geom = Geometry::new_2d(2, 2).unwrap();
        let a = Volume::from_data(geom, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Volume::from_data(geom, vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let stack = ChannelStack::new(vec![a, b]).unwrap();
        assert_eq!(stack.feature_count(), 2);

        let mut fv = [0.0; 2];
        stack.feature_vector(VoxelCoord::new(1, 1, 0), &mut fv);
        assert_eq!(fv, [4.0, 40.0]);
    }

    #[test]
    fn test_channel_stack_rejects_mismatch() {
        let a: ProbabilityImage = Volume::new(Geometry::new_2d(2, 2).unwrap());
        let b: ProbabilityImage = Volume::new(Geometry::new_2d(3, 2).unwrap());
        assert!(ChannelStack::new(vec![a.clone(), b.clone()]).is_err());
        assert!(ChannelStack::new(Vec::new()).is_err());

        let mut stack = ChannelStack::new(vec![a]).unwrap();
        assert!(stack.push_channel(b).is_err());
        assert_eq!(stack.feature_count(), 1);
    }
}
