//! Regression test for connected-threshold growth
//!
//! Mirrors the two growth passes of the regularizer: candidates (128)
//! grown over [64, 194], then confirmed voxels (255) re-grown over
//! [194, 255].

use voxseg_core::{Geometry, MaskVolume, Volume, VoxelCoord};
use voxseg_region::{ThresholdGrowOptions, connected_threshold};
use voxseg_test::{RegParams, rows_of, volume_2d};

#[test]
fn seedfill_reg() {
    let mut rp = RegParams::new("seedfill");

    let mask: MaskVolume = volume_2d(&[
        &[128, 128, 0, 0, 128],
        &[0, 128, 0, 0, 128],
        &[0, 128, 128, 0, 0],
        &[0, 0, 0, 0, 128],
    ])
    .unwrap();

    let pass1 = connected_threshold(
        &mask,
        [VoxelCoord::new(0, 0, 0)],
        &ThresholdGrowOptions::new(64, 194),
    )
    .unwrap();
    rp.compare_values(5.0, pass1.count_value(255) as f64, 0.0);
    assert_eq!(
        rows_of(&pass1),
        vec![
            vec![255, 255, 0, 0, 0],
            vec![0, 255, 0, 0, 0],
            vec![0, 255, 255, 0, 0],
            vec![0, 0, 0, 0, 0],
        ]
    );

    // Second window only accepts confirmed voxels; seeding the detached
    // blob's former position grows nothing
    let pass2 = connected_threshold(
        &pass1,
        [VoxelCoord::new(4, 0, 0), VoxelCoord::new(1, 1, 0)],
        &ThresholdGrowOptions::new(194, 255),
    )
    .unwrap();
    rp.compare_values(5.0, pass2.count_value(255) as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn seedfill3d_reg() {
    let mut rp = RegParams::new("seedfill3d");

    // Two slabs joined by one voxel along z
    let geom = Geometry::new([3, 3, 3]).unwrap();
    let mut mask: MaskVolume = Volume::new(geom);
    for y in 0..3 {
        for x in 0..3 {
            mask.set_unchecked(VoxelCoord::new(x, y, 0), 128);
            mask.set_unchecked(VoxelCoord::new(x, y, 2), 128);
        }
    }
    mask.set_unchecked(VoxelCoord::new(1, 1, 1), 128);

    let grown = connected_threshold(
        &mask,
        [VoxelCoord::new(0, 0, 0)],
        &ThresholdGrowOptions::new(64, 194),
    )
    .unwrap();
    rp.compare_values(19.0, grown.count_value(255) as f64, 0.0);

    mask.set_unchecked(VoxelCoord::new(1, 1, 1), 0);
    let grown = connected_threshold(
        &mask,
        [VoxelCoord::new(0, 0, 0)],
        &ThresholdGrowOptions::new(64, 194),
    )
    .unwrap();
    rp.compare_values(9.0, grown.count_value(255) as f64, 0.0);

    assert!(rp.cleanup());
}
