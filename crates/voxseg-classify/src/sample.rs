//! Training sample collection
//!
//! One pass over the label map routes every labelled voxel's feature
//! vector into the sample of its class, or into the shared *outside*
//! sample when the label is neither void nor an object id. Void voxels are
//! dropped.

use crate::error::{ClassifyError, ClassifyResult};
use crate::feature::FeatureVectorGenerator;
use crate::ids::ObjectIdList;
use log::{debug, warn};
use voxseg_core::{LabelMap, LabelValue, VoxelCoord};

/// Feature vectors and positions of one group of voxels
///
/// Entries keep the linear scan order of the label map.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSample {
    feature_count: usize,
    features: Vec<f32>,
    coords: Vec<VoxelCoord>,
}

impl ClassSample {
    /// Create an empty sample for vectors of `feature_count` values
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            features: Vec::new(),
            coords: Vec::new(),
        }
    }

    /// Append one entry
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::FeatureCountMismatch` if `features` has the
    /// wrong length.
    pub fn push(&mut self, features: &[f32], coord: VoxelCoord) -> ClassifyResult<()> {
        if features.len() != self.feature_count {
            return Err(ClassifyError::FeatureCountMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }
        self.features.extend_from_slice(features);
        self.coords.push(coord);
        Ok(())
    }

    /// Length of each feature vector
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the sample has no entries
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Voxel positions in scan order
    pub fn coords(&self) -> &[VoxelCoord] {
        &self.coords
    }

    /// Feature vector of entry `i`
    pub fn features(&self, i: usize) -> Option<&[f32]> {
        if i >= self.len() {
            return None;
        }
        let start = i * self.feature_count;
        Some(&self.features[start..start + self.feature_count])
    }

    /// Iterate over (feature vector, position) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&[f32], VoxelCoord)> + '_ {
        self.coords.iter().enumerate().map(move |(i, &c)| {
            let start = i * self.feature_count;
            (&self.features[start..start + self.feature_count], c)
        })
    }
}

/// Per-class training samples plus the outside sample
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    classes: Vec<ClassSample>,
    outside: ClassSample,
}

impl Sample {
    /// Create empty samples for `class_count` classes
    pub fn new(class_count: usize, feature_count: usize) -> Self {
        Self {
            classes: vec![ClassSample::new(feature_count); class_count],
            outside: ClassSample::new(feature_count),
        }
    }

    /// Training sample of class `index`
    pub fn class(&self, index: usize) -> Option<&ClassSample> {
        self.classes.get(index)
    }

    /// All class samples in class order
    pub fn classes(&self) -> &[ClassSample] {
        &self.classes
    }

    /// Voxels labelled with something other than an object id or void
    pub fn outside(&self) -> &ClassSample {
        &self.outside
    }

    /// Mutable training sample of class `index`, for hand-built samples
    pub fn class_mut(&mut self, index: usize) -> Option<&mut ClassSample> {
        self.classes.get_mut(index)
    }

    /// Mutable outside sample
    pub fn outside_mut(&mut self) -> &mut ClassSample {
        &mut self.outside
    }

    /// Number of classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Entries over all class samples and the outside sample
    pub fn total_len(&self) -> usize {
        self.classes.iter().map(ClassSample::len).sum::<usize>() + self.outside.len()
    }
}

/// Collect training samples from a label map
///
/// # Errors
///
/// Returns `ClassifyError::GeometryMismatch` if the generator's grid
/// differs from the label map's.
pub fn collect_sample<L: LabelValue>(
    label_map: &LabelMap<L>,
    generator: &dyn FeatureVectorGenerator,
    ids: &ObjectIdList<L>,
) -> ClassifyResult<Sample> {
    if generator.geometry() != label_map.geometry() {
        return Err(ClassifyError::GeometryMismatch {
            label_map: label_map.geometry().to_string(),
            features: generator.geometry().to_string(),
        });
    }

    let feature_count = generator.feature_count();
    let mut sample = Sample::new(ids.len(), feature_count);
    let mut fv = vec![0.0f32; feature_count];

    // Labels come in runs; remember the routing of the previous one
    let mut prev: Option<(L, Option<usize>)> = None;

    for (coord, label) in label_map.iter_voxels() {
        if label.is_void() {
            continue;
        }
        let class = match prev {
            Some((l, c)) if l == label => c,
            _ => {
                let c = ids.index_of(label);
                prev = Some((label, c));
                c
            }
        };
        generator.feature_vector(coord, &mut fv);
        match class {
            Some(c) => sample.classes[c].push(&fv, coord)?,
            None => sample.outside.push(&fv, coord)?,
        }
    }

    for (c, cls) in sample.classes.iter().enumerate() {
        if cls.is_empty() {
            warn!(
                "collect_sample: class {} (id {:?}) has no training voxels",
                c,
                ids.id(c)
            );
        }
    }
    debug!(
        "collect_sample: {} classes, sizes {:?}, outside {}",
        ids.len(),
        sample.classes.iter().map(ClassSample::len).collect::<Vec<_>>(),
        sample.outside.len()
    );

    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ChannelStack;
    use voxseg_core::{Geometry, Volume};

    fn setup() -> (LabelMap<u8>, ChannelStack) {
        let geom = Geometry::new_2d(3, 2).unwrap();
        let labels = Volume::from_data(geom, vec![1, 1, 0, 255, 2, 2]).unwrap();
        let ch = Volume::from_data(geom, (0..6).map(|v| v as f32).collect()).unwrap();
        (labels, ChannelStack::new(vec![ch]).unwrap())
    }

    #[test]
    fn test_partition() {
        let (labels, stack) = setup();
        let ids = ObjectIdList::from_ids(vec![1u8, 2]).unwrap();
        let sample = collect_sample(&labels, &stack, &ids).unwrap();

        let c0 = sample.class(0).unwrap();
        assert_eq!(c0.len(), 2);
        assert_eq!(c0.features(1), Some(&[1.0f32][..]));
        assert_eq!(c0.coords()[1], VoxelCoord::new(1, 0, 0));

        let c1 = sample.class(1).unwrap();
        assert_eq!(c1.coords(), &[VoxelCoord::new(1, 1, 0), VoxelCoord::new(2, 1, 0)]);

        assert_eq!(sample.outside().len(), 1);
        assert_eq!(sample.outside().coords()[0], VoxelCoord::new(2, 0, 0));
        // Void voxel dropped
        assert_eq!(sample.total_len(), 5);
    }

    #[test]
    fn test_id_order_routes_samples() {
        let (labels, stack) = setup();
        let ids = ObjectIdList::from_ids(vec![2u8, 1]).unwrap();
        let sample = collect_sample(&labels, &stack, &ids).unwrap();
        assert_eq!(sample.class(0).unwrap().coords()[0], VoxelCoord::new(1, 1, 0));
    }

    #[test]
    fn test_no_ids_everything_outside() {
        let (labels, stack) = setup();
        let ids = ObjectIdList::<u8>::new();
        let sample = collect_sample(&labels, &stack, &ids).unwrap();
        assert_eq!(sample.class_count(), 0);
        assert_eq!(sample.outside().len(), 5);
    }

    #[test]
    fn test_geometry_mismatch() {
        let (_, stack) = setup();
        let labels: LabelMap<u8> = Volume::new(Geometry::new_2d(2, 2).unwrap());
        let ids = ObjectIdList::from_ids(vec![1u8]).unwrap();
        assert!(matches!(
            collect_sample(&labels, &stack, &ids),
            Err(ClassifyError::GeometryMismatch { .. })
        ));
    }

    #[test]
    fn test_class_sample_push_checks_length() {
        let mut s = ClassSample::new(2);
        assert!(s.push(&[1.0], VoxelCoord::new(0, 0, 0)).is_err());
        s.push(&[1.0, 2.0], VoxelCoord::new(0, 0, 0)).unwrap();
        let pairs: Vec<_> = s.iter().collect();
        assert_eq!(pairs, vec![(&[1.0f32, 2.0][..], VoxelCoord::new(0, 0, 0))]);
        assert_eq!(s.features(1), None);
    }
}
