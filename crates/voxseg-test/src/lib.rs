//! voxseg-test - Regression test framework for voxseg
//!
//! This crate provides a small regression test helper modelled on the
//! classic `regutils` pattern: a [`RegParams`] value counts comparisons,
//! records failures and reports them on [`RegParams::cleanup`].
//!
//! It also builds the small hand-written fixtures most tests start from.
//!
//! # Usage
//!
//! ```
//! use voxseg_test::{RegParams, label_map_2d};
//!
//! let labels = label_map_2d::<u8>(&[&[1, 1, 0], &[0, 2, 2]]).unwrap();
//! let mut rp = RegParams::new("fixture");
//! rp.compare_values(6.0, labels.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

use voxseg_core::{Geometry, LabelMap, LabelValue, ProbabilityImage, Volume};

/// Build a 2-D volume from rows (row index is y, column index is x)
///
/// # Errors
///
/// Returns `TestError::Fixture` if the rows are empty or ragged.
pub fn volume_2d<T: Copy>(rows: &[&[T]]) -> TestResult<Volume<T>> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    if height == 0 || width == 0 {
        return Err(TestError::Fixture("empty rows".to_string()));
    }
    if rows.iter().any(|r| r.len() != width) {
        return Err(TestError::Fixture(format!(
            "ragged rows: expected width {}",
            width
        )));
    }

    let geometry = Geometry::new_2d(width as u32, height as u32)?;
    let data: Vec<T> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Ok(Volume::from_data(geometry, data)?)
}

/// Build a 2-D label map from rows
pub fn label_map_2d<L: LabelValue>(rows: &[&[L]]) -> TestResult<LabelMap<L>> {
    volume_2d(rows)
}

/// Build a 2-D probability image from rows
pub fn field_2d(rows: &[&[f32]]) -> TestResult<ProbabilityImage> {
    volume_2d(rows)
}

/// Extract the rows of a 2-D volume (z = 0 slice)
pub fn rows_of<T: Copy>(vol: &Volume<T>) -> Vec<Vec<T>> {
    let width = vol.extent()[0] as usize;
    let height = vol.extent()[1] as usize;
    (0..height)
        .map(|y| vol.data()[y * width..(y + 1) * width].to_vec())
        .collect()
}
