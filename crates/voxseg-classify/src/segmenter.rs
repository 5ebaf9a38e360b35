//! PDF segmenter
//!
//! [`PdfSegmenter`] ties the pipeline together and caches its
//! intermediate results. Three flags record whether the training sample,
//! the fitted model and the probability images are current. Any change to
//! the inputs they depend on clears them, and each stage recomputes its
//! stale upstream stages before running.
//!
//! When no label map is supplied, classification allocates one filled
//! with the void label and labels every voxel with its most probable
//! class.

use crate::error::{ClassifyError, ClassifyResult};
use crate::feature::FeatureVectorGenerator;
use crate::ids::ObjectIdList;
use crate::merge::classify_argmax;
use crate::model::ProbabilityModel;
use crate::options::SegmenterOptions;
use crate::probability::ProbabilityImageBuilder;
use crate::progress::{Progress, ProgressSink, checkpoint};
use crate::regularize::RegionPipeline;
use crate::sample::{ClassSample, Sample, collect_sample};
use log::debug;
use std::fmt;
use voxseg_core::{Geometry, LabelMap, LabelValue, ProbabilityImage, Volume};

/// Where the current label map came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelSource {
    Supplied,
    Allocated,
}

/// Voxel-wise classifier with spatial regularization
pub struct PdfSegmenter<L: LabelValue, M: ProbabilityModel> {
    model: M,
    generator: Option<Box<dyn FeatureVectorGenerator>>,
    label_map: Option<(LabelMap<L>, LabelSource)>,
    ids: ObjectIdList<L>,
    options: SegmenterOptions,
    sample: Option<Sample>,
    images: Vec<ProbabilityImage>,
    sample_up_to_date: bool,
    pdfs_up_to_date: bool,
    images_up_to_date: bool,
    progress: Progress,
}

impl<L: LabelValue, M: ProbabilityModel> PdfSegmenter<L, M> {
    /// Create a segmenter scoring with `model`
    pub fn new(model: M) -> Self {
        Self {
            model,
            generator: None,
            label_map: None,
            ids: ObjectIdList::new(),
            options: SegmenterOptions::default(),
            sample: None,
            images: Vec::new(),
            sample_up_to_date: false,
            pdfs_up_to_date: false,
            images_up_to_date: false,
            progress: Progress::default(),
        }
    }

    fn invalidate(&mut self) {
        self.sample_up_to_date = false;
        self.pdfs_up_to_date = false;
        self.images_up_to_date = false;
    }

    // ---- inputs ----

    /// Set the feature vector generator
    pub fn set_feature_generator<G: FeatureVectorGenerator + 'static>(&mut self, generator: G) {
        self.generator = Some(Box::new(generator));
        self.invalidate();
    }

    /// Feature vector generator, if set
    pub fn feature_generator(&self) -> Option<&dyn FeatureVectorGenerator> {
        self.generator.as_deref()
    }

    /// Supply the label map to train from and merge into
    pub fn set_label_map(&mut self, label_map: LabelMap<L>) {
        self.label_map = Some((label_map, LabelSource::Supplied));
        self.invalidate();
    }

    /// Current label map, supplied or produced by classification
    pub fn label_map(&self) -> Option<&LabelMap<L>> {
        self.label_map.as_ref().map(|(map, _)| map)
    }

    /// Remove and return the label map
    pub fn take_label_map(&mut self) -> Option<LabelMap<L>> {
        let taken = self.label_map.take().map(|(map, _)| map);
        if taken.is_some() {
            self.invalidate();
        }
        taken
    }

    /// Replace the probability model
    pub fn set_model(&mut self, model: M) {
        self.model = model;
        self.invalidate();
    }

    /// Probability model
    pub fn model(&self) -> &M {
        &self.model
    }

    // ---- object ids and weights ----

    /// Replace the object ids with a single id
    pub fn set_object_id(&mut self, id: L) -> ClassifyResult<()> {
        self.ids.set_single(id)?;
        self.invalidate();
        Ok(())
    }

    /// Append an object id with weight 1
    pub fn add_object_id(&mut self, id: L) -> ClassifyResult<()> {
        self.ids.push(id)?;
        self.invalidate();
        Ok(())
    }

    /// Replace all object ids; weights reset to 1
    pub fn set_object_ids(&mut self, ids: Vec<L>) -> ClassifyResult<()> {
        self.ids.set_ids(ids)?;
        self.invalidate();
        Ok(())
    }

    /// Remove every object id
    pub fn clear_object_ids(&mut self) {
        self.ids.clear();
        self.invalidate();
    }

    /// Object ids in class order
    pub fn object_ids(&self) -> &[L] {
        self.ids.ids()
    }

    /// Object id list with weights
    pub fn object_id_list(&self) -> &ObjectIdList<L> {
        &self.ids
    }

    /// Number of classes
    pub fn class_count(&self) -> usize {
        self.ids.len()
    }

    /// Feature vector length, if a generator is set
    pub fn feature_count(&self) -> Option<usize> {
        self.generator.as_ref().map(|g| g.feature_count())
    }

    /// Set the PDF weight of class `index`
    pub fn set_object_weight(&mut self, index: usize, weight: f64) -> ClassifyResult<()> {
        self.ids.set_weight(index, weight)?;
        self.invalidate();
        Ok(())
    }

    /// Replace all PDF weights
    pub fn set_object_weights(&mut self, weights: Vec<f64>) -> ClassifyResult<()> {
        self.ids.set_weights(weights)?;
        self.invalidate();
        Ok(())
    }

    /// PDF weights in class order
    pub fn object_weights(&self) -> &[f64] {
        self.ids.weights()
    }

    /// Class index of `id`, if it is an object id
    pub fn class_index(&self, id: L) -> Option<usize> {
        self.ids.index_of(id)
    }

    /// Class index of `id`
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ObjectIdNotFound` if `id` is not an object id.
    pub fn require_class_index(&self, id: L) -> ClassifyResult<usize> {
        self.ids.require_index(id)
    }

    // ---- options and progress ----

    /// Set the options
    ///
    /// A changed smoothing sigma marks the probability images stale.
    pub fn set_options(&mut self, options: SegmenterOptions) -> ClassifyResult<()> {
        options.validate()?;
        if options.smoothing_sigma != self.options.smoothing_sigma {
            self.images_up_to_date = false;
        }
        self.options = options;
        Ok(())
    }

    /// Current options
    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Report progress as `start + fraction * local` to `sink`
    pub fn set_progress<S: ProgressSink + 'static>(&mut self, sink: S, fraction: f64, start: f64) {
        self.progress = Progress::new(Box::new(sink), fraction, start);
    }

    /// Stop reporting progress
    pub fn clear_progress(&mut self) {
        self.progress = Progress::default();
    }

    // ---- cache state ----

    /// Whether the training sample is current
    pub fn is_sample_up_to_date(&self) -> bool {
        self.sample_up_to_date
    }

    /// Whether the model has been fitted to the current sample
    pub fn are_pdfs_up_to_date(&self) -> bool {
        self.pdfs_up_to_date
    }

    /// Whether the probability images are current
    pub fn are_probability_images_up_to_date(&self) -> bool {
        self.images_up_to_date
    }

    /// Training sample from the last collection
    pub fn sample(&self) -> Option<&Sample> {
        self.sample.as_ref()
    }

    /// Probability image of class `index`
    pub fn probability_image(&self, index: usize) -> Option<&ProbabilityImage> {
        self.images.get(index)
    }

    /// All probability images in class order
    pub fn probability_images(&self) -> &[ProbabilityImage] {
        &self.images
    }

    // ---- pipeline ----

    fn require_generator(&self) -> ClassifyResult<&dyn FeatureVectorGenerator> {
        self.generator
            .as_deref()
            .ok_or(ClassifyError::NoFeatureGenerator)
    }

    fn supplied_label_map(&self) -> Option<&LabelMap<L>> {
        match &self.label_map {
            Some((map, LabelSource::Supplied)) => Some(map),
            _ => None,
        }
    }

    fn check_geometry(&self) -> ClassifyResult<Geometry> {
        let generator = self.require_generator()?;
        let geometry = *generator.geometry();
        match self.supplied_label_map() {
            Some(map) if *map.geometry() != geometry => Err(ClassifyError::GeometryMismatch {
                label_map: map.geometry().to_string(),
                features: geometry.to_string(),
            }),
            _ => Ok(geometry),
        }
    }

    /// Collect the training sample from the supplied label map
    ///
    /// Marks the fitted model and the probability images stale.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoFeatureGenerator` or
    /// `ClassifyError::NoLabelMap` if an input is missing, and
    /// `ClassifyError::GeometryMismatch` if their grids differ.
    pub fn generate_sample(&mut self) -> ClassifyResult<()> {
        let generator = self.require_generator()?;
        let label_map = self.supplied_label_map().ok_or(ClassifyError::NoLabelMap)?;
        let sample = collect_sample(label_map, generator, &self.ids)?;

        self.sample = Some(sample);
        self.sample_up_to_date = true;
        self.pdfs_up_to_date = false;
        self.images_up_to_date = false;
        self.progress.report(checkpoint::SAMPLE);
        Ok(())
    }

    /// Fit the model to the training sample, collecting it first if stale
    ///
    /// Marks the probability images stale.
    pub fn generate_pdfs(&mut self) -> ClassifyResult<()> {
        if !self.sample_up_to_date {
            self.generate_sample()?;
        }
        let Some(sample) = self.sample.as_ref() else {
            return Err(ClassifyError::NoLabelMap);
        };
        self.model.fit(sample)?;

        self.pdfs_up_to_date = true;
        self.images_up_to_date = false;
        self.progress.report(checkpoint::PDFS);
        debug!("fitted model to {} training voxels", sample.total_len());
        Ok(())
    }

    /// Recollect the sample and refit the model
    pub fn update(&mut self) -> ClassifyResult<()> {
        self.generate_sample()?;
        self.generate_pdfs()
    }

    /// Rebuild the probability images
    ///
    /// With a supplied label map, a stale sample or model is brought up to
    /// date first.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoClasses` without object ids,
    /// `ClassifyError::NoFeatureGenerator` without a generator and
    /// `ClassifyError::GeometryMismatch` if the label map and generator
    /// grids differ.
    pub fn update_probability_images(&mut self) -> ClassifyResult<()> {
        if self.ids.is_empty() {
            return Err(ClassifyError::NoClasses);
        }
        self.check_geometry()?;

        if self.supplied_label_map().is_some() {
            if !self.sample_up_to_date {
                self.generate_sample()?;
            }
            if !self.pdfs_up_to_date {
                self.generate_pdfs()?;
            }
        }

        let generator = self.require_generator()?;
        let images = ProbabilityImageBuilder::new()
            .with_sigma(self.options.smoothing_sigma)
            .build(generator, &self.model, self.ids.weights())?;

        self.images = images;
        self.images_up_to_date = true;
        self.progress.report(checkpoint::IMAGES);
        Ok(())
    }

    /// Classify every voxel into the label map
    ///
    /// Stale upstream stages are recomputed first. Without a supplied
    /// label map every voxel gets its most probable class in a map owned
    /// by the segmenter, reallocated whenever the feature grid changes.
    pub fn classify(&mut self) -> ClassifyResult<()> {
        if self.ids.is_empty() {
            return Err(ClassifyError::NoClasses);
        }
        let geometry = self.check_geometry()?;

        if !self.images_up_to_date {
            self.update_probability_images()?;
        }

        let (mut label_map, source) = match self.label_map.take() {
            Some((map, source))
                if source == LabelSource::Supplied || *map.geometry() == geometry =>
            {
                (map, source)
            }
            _ => (Volume::new_with_value(geometry, L::VOID), LabelSource::Allocated),
        };
        let result = self.classify_into(&mut label_map, source);
        self.label_map = Some((label_map, source));
        result
    }

    fn classify_into(
        &mut self,
        label_map: &mut LabelMap<L>,
        source: LabelSource,
    ) -> ClassifyResult<()> {
        let policy = self.options.policy();

        if source == LabelSource::Allocated {
            label_map.fill(L::VOID);
        }
        if source == LabelSource::Allocated || self.options.force_classification {
            debug!("forced classification of {} classes", self.ids.len());
            classify_argmax(label_map, &self.images, &self.ids, policy)?;
            self.progress.report(checkpoint::DONE);
            return Ok(());
        }

        let Some(sample) = self.sample.as_ref() else {
            return Err(ClassifyError::NoLabelMap);
        };
        let images = &self.images;
        let options = self.options;
        let class_count = self.ids.len();
        let class_done = |c: usize| {
            checkpoint::IMAGES
                + (checkpoint::DONE - checkpoint::IMAGES) * (c + 1) as f64 / class_count as f64
        };

        // Stages up to the merge are independent per class; merges run
        // in class order
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let pipelines = (0..class_count)
                .into_par_iter()
                .map(|c| -> ClassifyResult<_> {
                    let mut pipeline = RegionPipeline::new(c, images, sample, options)?;
                    pipeline.run()?;
                    Ok(pipeline)
                })
                .collect::<ClassifyResult<Vec<_>>>()?;
            for (c, mut pipeline) in pipelines.into_iter().enumerate() {
                pipeline.merge_into(label_map, &self.ids, policy)?;
                self.progress.report(class_done(c));
            }
        }

        #[cfg(not(feature = "parallel"))]
        for c in 0..class_count {
            let mut pipeline = RegionPipeline::new(c, images, sample, options)?;
            pipeline.merge_into(label_map, &self.ids, policy)?;
            self.progress.report(class_done(c));
        }

        Ok(())
    }
}

impl<L: LabelValue, M: ProbabilityModel> fmt::Display for PdfSegmenter<L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SampleUpToDate = {}", self.sample_up_to_date)?;
        writeln!(f, "PDFsUpToDate = {}", self.pdfs_up_to_date)?;
        writeln!(f, "ProbabilityImagesUpToDate = {}", self.images_up_to_date)?;
        match self.generator.as_ref() {
            Some(g) => writeln!(f, "Feature generator = {} features", g.feature_count())?,
            None => writeln!(f, "Feature generator = none")?,
        }
        match &self.label_map {
            Some((map, source)) => writeln!(f, "LabelMap = {} ({:?})", map.geometry(), source)?,
            None => writeln!(f, "LabelMap = none")?,
        }
        writeln!(f, "Object ids = {:?}", self.ids.ids())?;
        writeln!(f, "Erode radius = {}", self.options.erode_radius)?;
        writeln!(f, "Hole fill iterations = {}", self.options.hole_fill_iterations)?;
        writeln!(f, "PDF weight count = {}", self.ids.weights().len())?;
        writeln!(f, "Smoothing sigma = {}", self.options.smoothing_sigma)?;
        writeln!(f, "Reclassify object labels = {}", self.options.reclassify_object_labels)?;
        writeln!(
            f,
            "Reclassify not object labels = {}",
            self.options.reclassify_not_object_labels
        )?;
        writeln!(f, "Probability images = {}", self.images.len())?;
        match &self.sample {
            Some(s) => write!(
                f,
                "Sample sizes = {:?}, outside = {}",
                s.classes().iter().map(ClassSample::len).collect::<Vec<_>>(),
                s.outside().len()
            ),
            None => write!(f, "Sample = none"),
        }
    }
}
