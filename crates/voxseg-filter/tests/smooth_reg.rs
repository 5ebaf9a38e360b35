//! Regression test for spacing-aware Gaussian smoothing

use voxseg_core::{Geometry, ProbabilityImage, Volume, VoxelCoord};
use voxseg_filter::{Kernel, convolve_axis, gaussian_smooth};
use voxseg_test::{RegParams, field_2d};

#[test]
fn smooth_reg() {
    let mut rp = RegParams::new("smooth");

    // Impulse in a 3-D grid spreads symmetrically and keeps its mass
    let geom = Geometry::new([11, 11, 11]).unwrap();
    let mut field: ProbabilityImage = Volume::new(geom);
    field.set_unchecked(VoxelCoord::new(5, 5, 5), 1.0);
    let smoothed = gaussian_smooth(&field, 1.0).unwrap();
    rp.compare_values(1.0, smoothed.sum() as f64, 1e-4);
    rp.compare_values(
        smoothed.get_unchecked(VoxelCoord::new(4, 5, 5)) as f64,
        smoothed.get_unchecked(VoxelCoord::new(5, 6, 5)) as f64,
        1e-6,
    );
    rp.compare_values(
        smoothed.get_unchecked(VoxelCoord::new(5, 5, 4)) as f64,
        smoothed.get_unchecked(VoxelCoord::new(5, 5, 6)) as f64,
        1e-6,
    );

    // Separable result equals sequential single-axis passes
    let k = Kernel::gaussian(1.0).unwrap();
    let mut manual = field.clone();
    for axis in 0..3 {
        manual = convolve_axis(&manual, &k, axis).unwrap();
    }
    rp.compare_volumes(&manual, &smoothed, 1e-6);

    assert!(rp.cleanup());
}

#[test]
fn smooth_spacing_reg() {
    let mut rp = RegParams::new("smooth_spacing");

    // Doubling the spacing along x halves the voxel sigma on that axis,
    // so the impulse spreads less along x than along y
    let geom = Geometry::with_spacing([15, 15, 1], [2.0, 1.0, 1.0], [0.0; 3]).unwrap();
    let mut field: ProbabilityImage = Volume::new(geom);
    field.set_unchecked(VoxelCoord::new(7, 7, 0), 1.0);
    let smoothed = gaussian_smooth(&field, 2.0).unwrap();
    let along_x = smoothed.get_unchecked(VoxelCoord::new(8, 7, 0));
    let along_y = smoothed.get_unchecked(VoxelCoord::new(7, 8, 0));
    rp.compare_values(1.0, if along_x < along_y { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, smoothed.sum() as f64, 1e-4);

    // Border replication keeps a constant field constant
    let flat = field_2d(&[&[0.25, 0.25, 0.25], &[0.25, 0.25, 0.25]]).unwrap();
    let out = gaussian_smooth(&flat, 3.0).unwrap();
    rp.compare_volumes(&flat, &out, 1e-6);

    assert!(rp.cleanup());
}

#[test]
fn smooth_wide_reg() {
    let mut rp = RegParams::new("smooth_wide");

    // A sigma far beyond the grid weighs the two replicated ends equally
    let line = field_2d(&[&[0.0, 1.0, 2.0, 3.0, 10.0]]).unwrap();
    let out = gaussian_smooth(&line, 1e10).unwrap();
    for x in 0..5 {
        rp.compare_values(5.0, out.get_unchecked(VoxelCoord::new(x, 0, 0)) as f64, 1e-3);
    }

    // On a 2x2 grid every voxel is a border voxel, so the result is the mean
    let square = field_2d(&[&[0.0, 2.0], &[4.0, 6.0]]).unwrap();
    let out = gaussian_smooth(&square, 1e10).unwrap();
    let flat: ProbabilityImage = Volume::new_with_value(*square.geometry(), 3.0);
    rp.compare_volumes(&flat, &out, 1e-3);

    // A sigma just past the grid matches the untruncated kernel
    let k = Kernel::gaussian(3.0).unwrap();
    let full = convolve_axis(&line, &k, 0).unwrap();
    let folded = gaussian_smooth(&line, 3.0).unwrap();
    rp.compare_volumes(&full, &folded, 1e-5);

    assert!(rp.cleanup());
}
