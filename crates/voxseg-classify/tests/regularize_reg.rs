//! Regression test for the per-class regularizer on a 3-D grid

use voxseg_classify::{ClassSample, RegionPipeline, RegionStage, Sample, SegmenterOptions};
use voxseg_core::{Geometry, ProbabilityImage, Volume, VoxelCoord, marker};
use voxseg_test::RegParams;

fn images(geom: Geometry) -> Vec<ProbabilityImage> {
    // Class 0 dominates below z = 4; the top slab is a tie
    let mut a: ProbabilityImage = Volume::new_with_value(geom, 0.8);
    let b: ProbabilityImage = Volume::new_with_value(geom, 0.2);
    for y in 0..5 {
        for x in 0..5 {
            a.set_unchecked(VoxelCoord::new(x, y, 4), 0.2);
        }
    }
    vec![a, b]
}

fn push(cs: &mut ClassSample, coord: VoxelCoord) {
    cs.push(&[], coord).unwrap();
}

#[test]
fn regularize3d_reg() {
    let mut rp = RegParams::new("regularize3d");

    let geom = Geometry::new([5, 5, 5]).unwrap();
    let images = images(geom);
    let mut sample = Sample::new(2, 0);
    push(sample.class_mut(0).unwrap(), VoxelCoord::new(2, 2, 1));
    push(sample.class_mut(1).unwrap(), VoxelCoord::new(2, 2, 4));

    let mut pipeline =
        RegionPipeline::new(0, &images, &sample, SegmenterOptions::default()).unwrap();
    let mut stages = Vec::new();
    while pipeline.stage() != RegionStage::MorphedB {
        stages.push(pipeline.step().unwrap());
        if pipeline.stage() == RegionStage::Grown {
            // Slabs z = 0..=3 are candidates and connected to the seed
            rp.compare_values(
                100.0,
                pipeline.buffer().count_value(marker::CONFIRMED) as f64,
                0.0,
            );
        }
    }
    assert_eq!(
        stages,
        vec![
            RegionStage::Seeded,
            RegionStage::Grown,
            RegionStage::HoleFilled,
            RegionStage::MorphedA,
            RegionStage::Reconnected,
            RegionStage::MorphedB,
        ]
    );
    // The block touches the grid border on five sides, so erosion only
    // eats its top layer and dilation puts it back
    rp.compare_values(
        100.0,
        pipeline.buffer().count_value(marker::CONFIRMED) as f64,
        0.0,
    );

    // Class 1 is never strictly the most probable; only its training
    // voxel is seeded, and the erosion removes it
    let mut pipeline =
        RegionPipeline::new(1, &images, &sample, SegmenterOptions::default()).unwrap();
    pipeline.step().unwrap();
    rp.compare_values(
        1.0,
        pipeline.buffer().count_value(marker::CANDIDATE) as f64,
        0.0,
    );
    pipeline.run().unwrap();
    rp.compare_values(
        0.0,
        pipeline.buffer().count_value(marker::CONFIRMED) as f64,
        0.0,
    );

    assert!(rp.cleanup());
}
