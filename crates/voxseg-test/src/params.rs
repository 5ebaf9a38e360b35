//! Regression test parameters and operations

use voxseg_core::{LabelMap, LabelValue, ProbabilityImage};

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index and success status. Every comparison
/// increments the index so failures can be located in the log.
pub struct RegParams {
    /// Name of the test (e.g., "sample")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two label maps for exact equality, geometry included
    pub fn compare_label_maps<L: LabelValue>(
        &mut self,
        expected: &LabelMap<L>,
        actual: &LabelMap<L>,
    ) -> bool {
        self.index += 1;

        if expected.geometry() != actual.geometry() {
            self.fail(format!(
                "Failure in {}_reg: label map comparison for index {} - geometry mismatch",
                self.test_name, self.index
            ));
            return false;
        }

        for ((coord, e), (_, a)) in expected.iter_voxels().zip(actual.iter_voxels()) {
            if e != a {
                self.fail(format!(
                    "Failure in {}_reg: label map comparison for index {} - \
                     voxel {} expected {} got {}",
                    self.test_name, self.index, coord, e, a
                ));
                return false;
            }
        }

        true
    }

    /// Compare two probability images voxel by voxel within `delta`
    pub fn compare_volumes(
        &mut self,
        expected: &ProbabilityImage,
        actual: &ProbabilityImage,
        delta: f32,
    ) -> bool {
        self.index += 1;

        match expected.max_abs_diff(actual) {
            Ok(diff) if diff <= delta => true,
            Ok(diff) => {
                self.fail(format!(
                    "Failure in {}_reg: volume comparison for index {}\n\
                     max difference = {} but allowed delta = {}",
                    self.test_name, self.index, diff, delta
                ));
                false
            }
            Err(e) => {
                self.fail(format!(
                    "Failure in {}_reg: volume comparison for index {} - {}",
                    self.test_name, self.index, e
                ));
                false
            }
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxseg_core::{Geometry, Volume};

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_label_maps() {
        let geom = Geometry::new_2d(2, 2).unwrap();
        let a = Volume::from_data(geom, vec![1u8, 2, 3, 255]).unwrap();
        let mut b = a.clone();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_label_maps(&a, &b));
        b.data_mut()[3] = 1;
        assert!(!rp.compare_label_maps(&a, &b));
        assert_eq!(rp.index(), 2);
    }
}
