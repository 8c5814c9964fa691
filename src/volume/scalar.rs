//! Voxel element types.

use std::fmt::Debug;

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

/// Runtime tag for the element type of a volume.
///
/// Only used where the type is not known at compile time (edit scripts);
/// everything past that boundary is generic over [`VoxelScalar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl ScalarKind {
    /// Bytes per voxel.
    pub fn size(self) -> usize {
        match self {
            ScalarKind::U8 | ScalarKind::I8 => 1,
            ScalarKind::U16 | ScalarKind::I16 => 2,
            ScalarKind::U32 | ScalarKind::I32 | ScalarKind::F32 => 4,
            ScalarKind::F64 => 8,
        }
    }
}

/// A plain-old-data voxel value.
///
/// The null value is the all-zero bit pattern; it marks "empty" for
/// overwrite checks and "outside" for ROI masks.
pub trait VoxelScalar: Pod + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Smallest representable value.
    const MIN: Self;
    /// Largest representable value.
    const MAX: Self;
    const KIND: ScalarKind;

    fn to_f64(self) -> f64;

    /// Narrow an f64, saturating at [`Self::MIN`]/[`Self::MAX`].
    /// NaN maps to zero for integer types.
    fn from_f64(value: f64) -> Self;

    fn is_null(&self) -> bool {
        bytemuck::bytes_of(self).iter().all(|&b| b == 0)
    }
}

macro_rules! impl_voxel_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl VoxelScalar for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const KIND: ScalarKind = ScalarKind::$kind;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    // `as` saturates float-to-int casts
                    value as $ty
                }
            }
        )*
    };
}

impl_voxel_scalar! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => F32,
    f64 => F64,
}
