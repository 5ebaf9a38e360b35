//! Per-class spatial regularization
//!
//! Each class runs through a fixed sequence of stages on its own 8-bit
//! working buffer:
//!
//! 1. **Seeded** - 128 where the class is strictly the most probable, 0
//!    elsewhere; unless object labels are reclassified, the class's
//!    training voxels are forced to 128 and every other labelled voxel
//!    to 0
//! 2. **Grown** - region growth from the training voxels over [64, 194]
//! 3. **HoleFilled** - voting hole fill
//! 4. **MorphedA** - erode (or dilate) with a ball
//! 5. **Reconnected** - region growth from the training voxels over
//!    [194, 255]
//! 6. **MorphedB** - the inverse of the first morphology pass
//! 7. **Merged** - confirmed voxels written into the shared label map
//!
//! Voxels left at 255 are *confirmed* for the class.

use crate::error::{ClassifyError, ClassifyResult};
use crate::ids::ObjectIdList;
use crate::merge::{MergeReport, ReclassifyPolicy, merge_confirmed};
use crate::options::SegmenterOptions;
use crate::sample::Sample;
use log::debug;
use voxseg_core::{LabelMap, LabelValue, MaskVolume, ProbabilityImage, Volume, marker};
use voxseg_morph::{BallElement, HoleFillOptions, dilate_value, erode_value, fill_holes_voting};
use voxseg_region::{ThresholdGrowOptions, connected_threshold};

/// Stage a [`RegionPipeline`] has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionStage {
    /// Nothing done yet
    Pending,
    /// Candidate markers placed
    Seeded,
    /// First connectivity pass done
    Grown,
    /// Holes filled
    HoleFilled,
    /// First morphology pass done
    MorphedA,
    /// Second connectivity pass done
    Reconnected,
    /// Second morphology pass done; ready to merge
    MorphedB,
    /// Written into the label map
    Merged,
}

impl RegionStage {
    /// Stage reached by the next step, if any
    ///
    /// Merging is not a step; it needs the label map.
    pub fn next(self) -> Option<RegionStage> {
        use RegionStage::*;
        match self {
            Pending => Some(Seeded),
            Seeded => Some(Grown),
            Grown => Some(HoleFilled),
            HoleFilled => Some(MorphedA),
            MorphedA => Some(Reconnected),
            Reconnected => Some(MorphedB),
            MorphedB | Merged => None,
        }
    }
}

/// Regularization of one class over a working buffer
pub struct RegionPipeline<'a> {
    class_index: usize,
    images: &'a [ProbabilityImage],
    sample: &'a Sample,
    options: SegmenterOptions,
    stage: RegionStage,
    buffer: MaskVolume,
}

impl<'a> RegionPipeline<'a> {
    /// Create a pipeline for class `class_index`
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ClassIndexOutOfRange` if there is no image
    /// or sample for the class, a core geometry error if the images are
    /// not on one grid and `ClassifyError::SampleOutsideGrid` if a
    /// training voxel lies off that grid.
    pub fn new(
        class_index: usize,
        images: &'a [ProbabilityImage],
        sample: &'a Sample,
        options: SegmenterOptions,
    ) -> ClassifyResult<Self> {
        let count = images.len();
        if class_index >= count || sample.class_count() != count {
            return Err(ClassifyError::ClassIndexOutOfRange {
                index: class_index,
                count: count.min(sample.class_count()),
            });
        }
        let geometry = *images[0].geometry();
        for image in &images[1..] {
            geometry.check_same(image.geometry())?;
        }
        let mut coords = sample
            .classes()
            .iter()
            .chain(std::iter::once(sample.outside()))
            .flat_map(|class| class.coords());
        if let Some(c) = coords.find(|&&c| !geometry.contains(c)) {
            return Err(ClassifyError::SampleOutsideGrid {
                x: c.x,
                y: c.y,
                z: c.z,
            });
        }
        Ok(Self {
            class_index,
            images,
            sample,
            options,
            stage: RegionStage::Pending,
            buffer: Volume::new(geometry),
        })
    }

    /// Class being regularized
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Last completed stage
    pub fn stage(&self) -> RegionStage {
        self.stage
    }

    /// Working buffer as left by the last completed stage
    pub fn buffer(&self) -> &MaskVolume {
        &self.buffer
    }

    /// Run the next stage
    ///
    /// Returns the stage now completed. Once the pipeline is ready to
    /// merge, further calls do nothing.
    pub fn step(&mut self) -> ClassifyResult<RegionStage> {
        let Some(next) = self.stage.next() else {
            return Ok(self.stage);
        };
        match next {
            RegionStage::Seeded => self.seed(),
            RegionStage::Grown => self.grow(marker::CANDIDATE_LOWER, marker::CANDIDATE_UPPER)?,
            RegionStage::HoleFilled => self.fill_holes()?,
            RegionStage::MorphedA => self.morph(self.options.dilate_first)?,
            RegionStage::Reconnected => {
                self.grow(marker::CANDIDATE_UPPER, marker::CONFIRMED)?
            }
            RegionStage::MorphedB => self.morph(!self.options.dilate_first)?,
            RegionStage::Pending | RegionStage::Merged => {}
        }
        self.stage = next;
        debug!(
            "class {}: {:?}, {} confirmed",
            self.class_index,
            next,
            self.buffer.count_value(marker::CONFIRMED)
        );
        Ok(next)
    }

    /// Run every remaining stage up to the merge
    pub fn run(&mut self) -> ClassifyResult<()> {
        while self.stage.next().is_some() {
            self.step()?;
        }
        Ok(())
    }

    /// Finish the remaining stages and merge into `label_map`
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidParameter` if the pipeline was
    /// already merged.
    pub fn merge_into<L: LabelValue>(
        &mut self,
        label_map: &mut LabelMap<L>,
        ids: &ObjectIdList<L>,
        policy: ReclassifyPolicy,
    ) -> ClassifyResult<MergeReport> {
        if self.stage == RegionStage::Merged {
            return Err(ClassifyError::InvalidParameter(format!(
                "class {} already merged",
                self.class_index
            )));
        }
        self.run()?;
        let report = merge_confirmed(label_map, &self.buffer, self.class_index, ids, policy)?;
        self.stage = RegionStage::Merged;
        Ok(report)
    }

    fn seed(&mut self) {
        let c = self.class_index;
        let images = self.images;
        let sample = self.sample;
        let own = &images[c];
        for (idx, v) in self.buffer.data_mut().iter_mut().enumerate() {
            let p = own.data()[idx];
            let is_max = images
                .iter()
                .enumerate()
                .all(|(oc, other)| oc == c || p > other.data()[idx]);
            *v = if is_max {
                marker::CANDIDATE
            } else {
                marker::BACKGROUND
            };
        }

        if self.options.reclassify_object_labels {
            return;
        }
        for coord in sample.classes()[c].coords() {
            self.buffer.set_unchecked(*coord, marker::CANDIDATE);
        }
        for (oc, other) in sample.classes().iter().enumerate() {
            if oc == c {
                continue;
            }
            for coord in other.coords() {
                self.buffer.set_unchecked(*coord, marker::BACKGROUND);
            }
        }
        for coord in sample.outside().coords() {
            self.buffer.set_unchecked(*coord, marker::BACKGROUND);
        }
    }

    fn grow(&mut self, lower: u8, upper: u8) -> ClassifyResult<()> {
        let seeds = self.sample.classes()[self.class_index]
            .coords()
            .iter()
            .copied();
        let options =
            ThresholdGrowOptions::new(lower, upper).with_replace_value(marker::CONFIRMED);
        self.buffer = connected_threshold(&self.buffer, seeds, &options)?;
        Ok(())
    }

    fn fill_holes(&mut self) -> ClassifyResult<()> {
        if self.options.hole_fill_iterations == 0 {
            return Ok(());
        }
        let options =
            HoleFillOptions::default().with_max_iterations(self.options.hole_fill_iterations);
        let (filled, _) = fill_holes_voting(&self.buffer, &options)?;
        self.buffer = filled;
        Ok(())
    }

    fn morph(&mut self, dilate: bool) -> ClassifyResult<()> {
        if self.options.erode_radius == 0 {
            return Ok(());
        }
        let element =
            BallElement::for_geometry(self.options.erode_radius, self.buffer.geometry())?;
        self.buffer = if dilate {
            dilate_value(&self.buffer, &element, marker::CONFIRMED)?
        } else {
            erode_value(&self.buffer, &element, marker::CONFIRMED)?
        };
        Ok(())
    }
}
