//! Merging class decisions into the label map
//!
//! Whether a confirmed voxel may overwrite the label already stored in the
//! map, and whether an unconfirmed voxel of the current class falls back
//! to void, depends on the two reclassify flags:
//!
//! | object | not object | confirmed voxel overwrites | unconfirmed voxel of class c |
//! |---|---|---|---|
//! | no  | no  | void only | kept |
//! | yes | no  | void or any object id | set to void |
//! | no  | yes | void or non-object labels | kept |
//! | yes | yes | anything | set to void |

use crate::error::{ClassifyError, ClassifyResult};
use crate::ids::ObjectIdList;
use crate::probability::argmax_class;
use log::debug;
use voxseg_core::{LabelMap, LabelValue, MaskVolume, ProbabilityImage, marker};

/// Reclassification flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReclassifyPolicy {
    /// Labels that are object ids may be overwritten
    pub object_labels: bool,
    /// Labels that are neither object ids nor void may be overwritten
    pub not_object_labels: bool,
}

impl ReclassifyPolicy {
    /// Create a policy from the two flags
    pub fn new(object_labels: bool, not_object_labels: bool) -> Self {
        Self {
            object_labels,
            not_object_labels,
        }
    }

    /// Whether a confirmed decision may replace `existing`
    pub fn may_overwrite<L: LabelValue>(&self, existing: L, ids: &ObjectIdList<L>) -> bool {
        if existing.is_void() || (self.object_labels && self.not_object_labels) {
            return true;
        }
        if ids.contains(existing) {
            self.object_labels
        } else {
            self.not_object_labels
        }
    }

    /// Whether unconfirmed voxels holding the current class revert to void
    pub fn reverts_unconfirmed(&self) -> bool {
        self.object_labels
    }
}

/// Voxels changed by a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Voxels set to the class id
    pub assigned: usize,
    /// Voxels reverted to void
    pub reverted: usize,
}

/// Merge the confirmed mask of class `class_index` into `label_map`
///
/// # Errors
///
/// Returns `ClassifyError::ClassIndexOutOfRange` for an unknown class and
/// a core geometry error if the mask and label map grids differ.
pub fn merge_confirmed<L: LabelValue>(
    label_map: &mut LabelMap<L>,
    mask: &MaskVolume,
    class_index: usize,
    ids: &ObjectIdList<L>,
    policy: ReclassifyPolicy,
) -> ClassifyResult<MergeReport> {
    let id = ids.id(class_index).ok_or(ClassifyError::ClassIndexOutOfRange {
        index: class_index,
        count: ids.len(),
    })?;
    label_map.geometry().check_same(mask.geometry())?;

    let mut report = MergeReport::default();
    for (label, &m) in label_map.data_mut().iter_mut().zip(mask.data()) {
        if m == marker::CONFIRMED {
            if *label != id && policy.may_overwrite(*label, ids) {
                *label = id;
                report.assigned += 1;
            }
        } else if *label == id && policy.reverts_unconfirmed() {
            *label = L::VOID;
            report.reverted += 1;
        }
    }

    debug!(
        "merge class {} (id {}): {} assigned, {} reverted",
        class_index, id, report.assigned, report.reverted
    );
    Ok(report)
}

/// Label every voxel with its most probable class, subject to `policy`
///
/// Returns the number of voxels whose label changed.
///
/// # Errors
///
/// Returns `ClassifyError::NoClasses` if there are no images, and
/// `ClassifyError::WeightCountMismatch` if the image count differs from
/// the id count.
pub fn classify_argmax<L: LabelValue>(
    label_map: &mut LabelMap<L>,
    images: &[ProbabilityImage],
    ids: &ObjectIdList<L>,
    policy: ReclassifyPolicy,
) -> ClassifyResult<usize> {
    if images.is_empty() {
        return Err(ClassifyError::NoClasses);
    }
    if images.len() != ids.len() {
        return Err(ClassifyError::WeightCountMismatch {
            ids: ids.len(),
            weights: images.len(),
        });
    }
    for image in images {
        label_map.geometry().check_same(image.geometry())?;
    }

    let mut changed = 0usize;
    for (idx, label) in label_map.data_mut().iter_mut().enumerate() {
        let best = ids.ids()[argmax_class(images, idx)];
        if *label != best && policy.may_overwrite(*label, ids) {
            *label = best;
            changed += 1;
        }
    }

    debug!("forced classification: {} voxels changed", changed);
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxseg_core::{Geometry, Volume};

    fn ids() -> ObjectIdList<u8> {
        ObjectIdList::from_ids(vec![1, 2]).unwrap()
    }

    #[test]
    fn test_policy_table() {
        let ids = ids();
        // existing labels: void, own/other object id, non-object
        let cases = [
            (ReclassifyPolicy::new(false, false), [true, false, false]),
            (ReclassifyPolicy::new(true, false), [true, true, false]),
            (ReclassifyPolicy::new(false, true), [true, false, true]),
            (ReclassifyPolicy::new(true, true), [true, true, true]),
        ];
        for (policy, expected) in cases {
            assert_eq!(policy.may_overwrite(255u8, &ids), expected[0]);
            assert_eq!(policy.may_overwrite(2u8, &ids), expected[1]);
            assert_eq!(policy.may_overwrite(0u8, &ids), expected[2]);
        }
        assert!(!ReclassifyPolicy::new(false, true).reverts_unconfirmed());
        assert!(ReclassifyPolicy::new(true, false).reverts_unconfirmed());
    }

    #[test]
    fn test_merge_frozen_labels() {
        let geom = Geometry::new_2d(4, 1).unwrap();
        let mut labels = Volume::from_data(geom, vec![255u8, 2, 0, 1]).unwrap();
        let mask = Volume::from_data(geom, vec![255, 255, 255, 0]).unwrap();
        let report =
            merge_confirmed(&mut labels, &mask, 0, &ids(), ReclassifyPolicy::default()).unwrap();
        assert_eq!(labels.data(), &[1, 2, 0, 1]);
        assert_eq!(report, MergeReport { assigned: 1, reverted: 0 });
    }

    #[test]
    fn test_merge_reverts_unconfirmed() {
        let geom = Geometry::new_2d(4, 1).unwrap();
        let mut labels = Volume::from_data(geom, vec![255u8, 2, 0, 1]).unwrap();
        let mask = Volume::from_data(geom, vec![255, 255, 255, 0]).unwrap();
        let report = merge_confirmed(
            &mut labels,
            &mask,
            0,
            &ids(),
            ReclassifyPolicy::new(true, false),
        )
        .unwrap();
        assert_eq!(labels.data(), &[1, 1, 0, 255]);
        assert_eq!(report, MergeReport { assigned: 2, reverted: 1 });
    }

    #[test]
    fn test_merge_bad_class() {
        let geom = Geometry::new_2d(1, 1).unwrap();
        let mut labels = Volume::from_data(geom, vec![255u8]).unwrap();
        let mask = Volume::from_data(geom, vec![255]).unwrap();
        assert!(matches!(
            merge_confirmed(&mut labels, &mask, 2, &ids(), ReclassifyPolicy::default()),
            Err(ClassifyError::ClassIndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_classify_argmax_respects_policy() {
        let geom = Geometry::new_2d(3, 1).unwrap();
        let p0 = Volume::from_data(geom, vec![0.9, 0.1, 0.5]).unwrap();
        let p1 = Volume::from_data(geom, vec![0.1, 0.9, 0.5]).unwrap();
        let images = vec![p0, p1];

        let mut labels = Volume::from_data(geom, vec![255u8, 255, 7]).unwrap();
        let changed =
            classify_argmax(&mut labels, &images, &ids(), ReclassifyPolicy::default()).unwrap();
        assert_eq!(labels.data(), &[1, 2, 7]);
        assert_eq!(changed, 2);

        classify_argmax(&mut labels, &images, &ids(), ReclassifyPolicy::new(false, true)).unwrap();
        // tie goes to the first class
        assert_eq!(labels.data(), &[1, 2, 1]);
    }
}
