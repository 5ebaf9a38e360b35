//! Convolution kernels
//!
//! One-dimensional kernels applied along a single grid axis. The kernel
//! is always odd-sized with its centre at `half_width`.

use crate::{FilterError, FilterResult};

/// Largest half-width [`Kernel::gaussian`] will build
pub const MAX_HALF_WIDTH: usize = 1 << 20;

/// Folded tails up to this many taps are summed tap by tap
const EXACT_TAIL_TAPS: usize = 4096;

/// A 1-D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Index of the centre tap
    half_width: usize,
    /// Taps, `2 * half_width + 1` values
    data: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from an odd-length slice of taps.
    pub fn from_slice(data: &[f32]) -> FilterResult<Self> {
        if data.is_empty() || data.len() % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel length must be odd, got {}",
                data.len()
            )));
        }
        Ok(Kernel {
            half_width: data.len() / 2,
            data: data.to_vec(),
        })
    }

    /// Identity kernel (a single tap of 1.0).
    pub fn identity() -> Self {
        Kernel {
            half_width: 0,
            data: vec![1.0],
        }
    }

    /// Create a normalized Gaussian kernel.
    ///
    /// `sigma` is in voxels. The half-width is `ceil(3 * sigma)`, so the
    /// kernel covers three standard deviations on each side. A zero sigma
    /// gives the identity kernel.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` if `sigma` is negative or not
    /// finite, or if the half-width would exceed [`MAX_HALF_WIDTH`].
    pub fn gaussian(sigma: f64) -> FilterResult<Self> {
        check_sigma(sigma)?;
        if sigma == 0.0 {
            return Ok(Self::identity());
        }
        let reach = (3.0 * sigma).ceil();
        if reach > MAX_HALF_WIDTH as f64 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma {sigma} needs more than {MAX_HALF_WIDTH} taps per side"
            )));
        }
        Ok(Self::gaussian_taps(sigma, reach as usize, 0.0))
    }

    /// Create a normalized Gaussian kernel no wider than `max_half_width`.
    ///
    /// Taps beyond `max_half_width` are folded into the two outermost taps.
    /// On a line of `max_half_width + 1` voxels with replicate borders
    /// every folded tap lands on the same border voxel as the outermost
    /// one, so the convolution result matches the full kernel.
    pub fn gaussian_folded(sigma: f64, max_half_width: usize) -> FilterResult<Self> {
        check_sigma(sigma)?;
        if sigma == 0.0 {
            return Ok(Self::identity());
        }
        let reach = (3.0 * sigma).ceil();
        if reach <= max_half_width as f64 {
            return Self::gaussian(sigma);
        }
        let tail = tail_weight(sigma, max_half_width, reach);
        Ok(Self::gaussian_taps(sigma, max_half_width, tail))
    }

    /// Gaussian taps over `[-half_width, half_width]` with `tail` added to
    /// each outermost tap, normalized to sum 1
    fn gaussian_taps(sigma: f64, half_width: usize, tail: f64) -> Self {
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f64> = (0..=2 * half_width)
            .map(|i| {
                let d = i as f64 - half_width as f64;
                (-(d * d) / denom).exp()
            })
            .collect();
        if half_width > 0 {
            taps[0] += tail;
            taps[2 * half_width] += tail;
        }
        let total: f64 = taps.iter().sum();
        Kernel {
            half_width,
            data: taps.into_iter().map(|v| (v / total) as f32).collect(),
        }
    }

    /// Number of taps on each side of the centre.
    #[inline]
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Total number of taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a kernel has at least one tap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the tap at signed offset `d` from the centre.
    #[inline]
    pub fn get(&self, d: i64) -> Option<f32> {
        let idx = d + self.half_width as i64;
        if idx < 0 {
            return None;
        }
        self.data.get(idx as usize).copied()
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// A kernel whose sum is near zero is left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() < 1e-6 {
            return;
        }
        for v in &mut self.data {
            *v /= sum;
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

fn check_sigma(sigma: f64) -> FilterResult<()> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(FilterError::InvalidKernel(format!(
            "gaussian sigma must be finite and >= 0, got {sigma}"
        )));
    }
    Ok(())
}

/// Unnormalized Gaussian weight of the taps `half_width + 1 ..= reach`
/// on one side
fn tail_weight(sigma: f64, half_width: usize, reach: f64) -> f64 {
    let denom = 2.0 * sigma * sigma;
    let weight = |d: f64| (-(d * d) / denom).exp();
    let first = half_width as f64 + 1.0;
    let count = reach - half_width as f64;
    if count <= EXACT_TAIL_TAPS as f64 {
        return (0..count as usize).map(|k| weight(first + k as f64)).sum();
    }

    // Simpson's rule over the unit cells of the taps
    let (a, b) = (first - 0.5, reach + 0.5);
    let panels = 2 * EXACT_TAIL_TAPS;
    let h = (b - a) / panels as f64;
    let inner: f64 = (1..panels)
        .map(|k| {
            let w = if k % 2 == 1 { 4.0 } else { 2.0 };
            w * weight(a + k as f64 * h)
        })
        .sum();
    (weight(a) + inner + weight(b)) * h / 3.0
}
