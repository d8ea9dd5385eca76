//! Promotion policy applied to guarded arguments
//!
//! Linear algebra kernels only come in four precisions (single/double,
//! real/complex). Every other numeric dtype is promoted to one of them
//! before dispatch; everything non-numeric is rejected.

use super::DType;

/// Classification of a dtype against the kernel-supported set
///
/// `max_float` is the platform's widest native float: F64 on 64-bit targets,
/// F32 on 32-bit ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DTypeTag {
    /// Single-precision real, usable as-is
    Float32,
    /// The platform's max float (F64 on 64-bit targets), usable as-is
    MaxFloat,
    /// Single-precision complex, usable as-is
    Complex64,
    /// Double-precision complex, usable as-is
    Complex128,
    /// Integer that must be promoted to a float
    Integer {
        /// The float the integer promotes to
        target: DType,
    },
    /// Half float, not supported by CPU kernels, promotes to F32
    Float16,
    /// Not a numeric type the kernels can consume
    Unsupported,
}

impl DTypeTag {
    /// Classify `dtype` given the platform max float
    pub fn of(dtype: DType, max_float: DType) -> Self {
        use DType::*;

        match dtype {
            F32 => Self::Float32,
            d if d == max_float => Self::MaxFloat,
            Complex64 => Self::Complex64,
            Complex128 => Self::Complex128,
            // 64-bit integers need the widest float to keep their range
            I64 | U64 => Self::Integer { target: max_float },
            I32 | I16 | I8 | U32 | U16 | U8 => Self::Integer { target: F32 },
            F16 => Self::Float16,
            F64 | Bool => Self::Unsupported,
        }
    }

    /// The dtype a value with this tag must be converted to, if any
    ///
    /// Returns `None` both for dtypes that need no conversion and for
    /// unsupported ones; check [`DTypeTag::is_supported`] first.
    pub fn promotion_target(self) -> Option<DType> {
        match self {
            Self::Float32 | Self::MaxFloat | Self::Complex64 | Self::Complex128 => None,
            Self::Integer { target } => Some(target),
            Self::Float16 => Some(DType::F32),
            Self::Unsupported => None,
        }
    }

    /// Whether values with this tag can reach a kernel (possibly after promotion)
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}
