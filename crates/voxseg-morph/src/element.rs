//! Ball structuring element for voxel morphology
//!
//! A structuring element defines the neighbourhood used in morphological
//! operations. The ball is the only shape the classifier needs: every
//! offset whose normalized squared distance from the origin is at most 1,
//! with semi-axis `radius + 0.5` along each axis so that a radius-1 ball
//! in 2-D covers the full 3x3 block.

use crate::{MorphError, MorphResult};
use voxseg_core::Geometry;

/// Ball (ellipsoid) structuring element with its origin at the centre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallElement {
    radius: [u32; 3],
    offsets: Vec<[i32; 3]>,
}

impl BallElement {
    /// Create an isotropic 3-D ball of `radius`
    pub fn new(radius: u32) -> MorphResult<Self> {
        Self::with_radii([radius; 3])
    }

    /// Create a ball of `radius` restricted to the active axes of
    /// `geometry` (radius 0 along collapsed axes)
    ///
    /// # Examples
    ///
    /// ```
    /// use voxseg_core::Geometry;
    /// use voxseg_morph::BallElement;
    ///
    /// let geom = Geometry::new_2d(10, 10).unwrap();
    /// let ball = BallElement::for_geometry(1, &geom).unwrap();
    /// assert_eq!(ball.len(), 9);
    /// ```
    pub fn for_geometry(radius: u32, geometry: &Geometry) -> MorphResult<Self> {
        let mut radii = [radius; 3];
        for (axis, r) in radii.iter_mut().enumerate() {
            if geometry.is_collapsed(axis) {
                *r = 0;
            }
        }
        Self::with_radii(radii)
    }

    /// Create a ball with a separate radius per axis
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidElement` if a radius would overflow
    /// the offset type.
    pub fn with_radii(radius: [u32; 3]) -> MorphResult<Self> {
        if radius.iter().any(|&r| r > i32::MAX as u32 / 2) {
            return Err(MorphError::InvalidElement(format!(
                "radius {:?} too large",
                radius
            )));
        }

        let r = radius.map(|v| v as i32);
        let semi = radius.map(|v| v as f64 + 0.5);
        let mut offsets = Vec::new();
        for dz in -r[2]..=r[2] {
            for dy in -r[1]..=r[1] {
                for dx in -r[0]..=r[0] {
                    let d = [dx, dy, dz];
                    let dist: f64 = (0..3)
                        .map(|a| {
                            let t = d[a] as f64 / semi[a];
                            t * t
                        })
                        .sum();
                    if dist <= 1.0 {
                        offsets.push(d);
                    }
                }
            }
        }

        Ok(Self { radius, offsets })
    }

    /// Radius along each axis
    #[inline]
    pub fn radius(&self) -> [u32; 3] {
        self.radius
    }

    /// Number of offsets, origin included
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the element only contains its origin
    pub fn is_point(&self) -> bool {
        self.radius == [0; 3]
    }

    /// Always false; the origin is always a member
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets relative to the origin, origin included
    pub fn offsets(&self) -> &[[i32; 3]] {
        &self.offsets
    }

    /// Whether `delta` is a member of the element
    pub fn contains(&self, delta: [i32; 3]) -> bool {
        self.offsets.contains(&delta)
    }
}
