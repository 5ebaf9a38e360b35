//! Label value types
//!
//! A label map stores one integer label per voxel. The largest value of
//! the label type is reserved as the *void* label: it marks voxels that
//! are unassigned or untrained and is never a valid object id.

use crate::volume::Volume;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Integer type usable as a voxel label
pub trait LabelValue: Copy + Eq + Ord + Hash + Debug + Display + Default + Send + Sync + 'static {
    /// Void label: the type's maximum value
    const VOID: Self;

    /// Whether this label is the void label
    #[inline]
    fn is_void(self) -> bool {
        self == Self::VOID
    }
}

macro_rules! impl_label_value {
    ($($t:ty),*) => {
        $(
            impl LabelValue for $t {
                const VOID: Self = <$t>::MAX;
            }
        )*
    };
}

impl_label_value!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Integer voxel grid of labels
pub type LabelMap<L> = Volume<L>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_is_type_max() {
        assert_eq!(<u8 as LabelValue>::VOID, 255);
        assert_eq!(<u16 as LabelValue>::VOID, u16::MAX);
        assert_eq!(<i32 as LabelValue>::VOID, i32::MAX);
        assert!(255u8.is_void());
        assert!(!0u8.is_void());
    }
}
