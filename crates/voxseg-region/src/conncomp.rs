//! Voxel connectivity
//!
//! Neighbour offsets used by region growth. Collapsed axes contribute no
//! neighbours, so a 2-D grid gets 4 or 8 neighbours and a 3-D grid 6 or 26.

use voxseg_core::Geometry;

/// Connectivity type for region growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Neighbours share a face (4 in 2-D, 6 in 3-D)
    #[default]
    Face,
    /// Neighbours share at least a corner (8 in 2-D, 26 in 3-D)
    Full,
}

impl Connectivity {
    /// Neighbour offsets for `geometry`, origin excluded
    pub fn offsets(self, geometry: &Geometry) -> Vec<[i32; 3]> {
        let reach: [i32; 3] = std::array::from_fn(|a| if geometry.is_collapsed(a) { 0 } else { 1 });
        let mut out = Vec::new();
        for dz in -reach[2]..=reach[2] {
            for dy in -reach[1]..=reach[1] {
                for dx in -reach[0]..=reach[0] {
                    let steps = dx.abs() + dy.abs() + dz.abs();
                    let keep = match self {
                        Connectivity::Face => steps == 1,
                        Connectivity::Full => steps >= 1,
                    };
                    if keep {
                        out.push([dx, dy, dz]);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbour_counts() {
        let g2 = Geometry::new_2d(4, 4).unwrap();
        let g3 = Geometry::new([4, 4, 4]).unwrap();
        assert_eq!(Connectivity::Face.offsets(&g2).len(), 4);
        assert_eq!(Connectivity::Full.offsets(&g2).len(), 8);
        assert_eq!(Connectivity::Face.offsets(&g3).len(), 6);
        assert_eq!(Connectivity::Full.offsets(&g3).len(), 26);
    }

    #[test]
    fn test_line_grid() {
        let g1 = Geometry::new([1, 9, 1]).unwrap();
        let offsets = Connectivity::Full.offsets(&g1);
        assert_eq!(offsets, vec![[0, -1, 0], [0, 1, 0]]);
    }
}
