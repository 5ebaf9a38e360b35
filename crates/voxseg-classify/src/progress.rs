//! Progress reporting

/// Receiver of progress values
pub trait ProgressSink {
    /// Called with the overall progress, monotonically increasing
    fn report(&mut self, progress: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn report(&mut self, progress: f64) {
        self(progress)
    }
}

/// Maps local progress in `[0, 1]` onto `start + fraction * local`
pub(crate) struct Progress {
    sink: Option<Box<dyn ProgressSink>>,
    fraction: f64,
    start: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            sink: None,
            fraction: 1.0,
            start: 0.0,
        }
    }
}

impl Progress {
    pub(crate) fn new(sink: Box<dyn ProgressSink>, fraction: f64, start: f64) -> Self {
        Self {
            sink: Some(sink),
            fraction,
            start,
        }
    }

    pub(crate) fn report(&mut self, local: f64) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report(self.start + self.fraction * local.clamp(0.0, 1.0));
        }
    }
}

/// Local progress reached at the end of each pipeline stage
pub(crate) mod checkpoint {
    pub const SAMPLE: f64 = 0.1;
    pub const PDFS: f64 = 0.2;
    pub const IMAGES: f64 = 0.5;
    pub const DONE: f64 = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_scaled_reports() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |p: f64| seen.lock().unwrap().push(p)
        };
        let mut progress = Progress::new(Box::new(sink), 0.5, 0.25);
        progress.report(0.0);
        progress.report(0.5);
        progress.report(2.0);
        assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_unset_is_silent() {
        let mut progress = Progress::default();
        progress.report(0.3);
        assert!(progress.sink.is_none());
    }
}
