//! Element trait for mapping Rust types to DType

use super::{Complex128, Complex64, DType};
use crate::array::Storage;
use bytemuck::{Pod, Zeroable};
use half::f16;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of an `Array`
///
/// This trait connects Rust's type system to the runtime dtype system.
/// It's implemented for all primitive numeric types, `half::f16` and the
/// two complex types.
///
/// Booleans are stored as `u8` and have no `Element` impl of their own.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    ///
    /// For complex types this returns the magnitude, not the real part.
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// For complex types this creates a real number (imaginary part = 0).
    fn from_f64(v: f64) -> Self;

    /// Widen to a double-precision complex value
    #[inline]
    fn to_complex128(self) -> Complex128 {
        Complex128::new(self.to_f64(), 0.0)
    }

    /// Narrow from a double-precision complex value (real part for real types)
    #[inline]
    fn from_complex128(z: Complex128) -> Self {
        Self::from_f64(z.re)
    }

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Borrow the storage as a typed slice, if the dtypes agree
    fn slice(storage: &Storage) -> Option<&[Self]>;

    /// Mutably borrow the storage as a typed slice, if the dtypes agree
    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]>;

    /// Wrap a typed buffer into storage
    fn into_storage(data: Vec<Self>) -> Storage;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $zero:expr, $one:expr, |$x:ident| $to:expr, |$v:ident| $from:expr) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                let $x = self;
                $to
            }

            #[inline]
            fn from_f64($v: f64) -> Self {
                $from
            }

            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn one() -> Self {
                $one
            }

            #[inline]
            fn slice(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$variant(data) => Some(data.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]> {
                match storage {
                    Storage::$variant(data) => Some(data.as_mut_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn into_storage(data: Vec<Self>) -> Storage {
                Storage::$variant(data)
            }
        }
    };
}

impl_element!(f64, F64, 0.0, 1.0, |x| x, |v| v);
impl_element!(f32, F32, 0.0, 1.0, |x| x as f64, |v| v as f32);
impl_element!(f16, F16, f16::ZERO, f16::ONE, |x| x.to_f64(), |v| f16::from_f64(v));
impl_element!(i64, I64, 0, 1, |x| x as f64, |v| v as i64);
impl_element!(i32, I32, 0, 1, |x| x as f64, |v| v as i32);
impl_element!(i16, I16, 0, 1, |x| x as f64, |v| v as i16);
impl_element!(i8, I8, 0, 1, |x| x as f64, |v| v as i8);
impl_element!(u64, U64, 0, 1, |x| x as f64, |v| v as u64);
impl_element!(u32, U32, 0, 1, |x| x as f64, |v| v as u32);
impl_element!(u16, U16, 0, 1, |x| x as f64, |v| v as u16);
impl_element!(u8, U8, 0, 1, |x| x as f64, |v| v as u8);

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex64;

    #[inline]
    fn to_f64(self) -> f64 {
        self.magnitude() as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Self::new(v as f32, 0.0)
    }

    #[inline]
    fn to_complex128(self) -> Complex128 {
        self.into()
    }

    #[inline]
    fn from_complex128(z: Complex128) -> Self {
        z.into()
    }

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn slice(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::Complex64(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    #[inline]
    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]> {
        match storage {
            Storage::Complex64(data) => Some(data.as_mut_slice()),
            _ => None,
        }
    }

    #[inline]
    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::Complex64(data)
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn to_f64(self) -> f64 {
        self.magnitude()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Self::new(v, 0.0)
    }

    #[inline]
    fn to_complex128(self) -> Complex128 {
        self
    }

    #[inline]
    fn from_complex128(z: Complex128) -> Self {
        z
    }

    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn slice(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::Complex128(data) => Some(data.as_slice()),
            _ => None,
        }
    }

    #[inline]
    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]> {
        match storage {
            Storage::Complex128(data) => Some(data.as_mut_slice()),
            _ => None,
        }
    }

    #[inline]
    fn into_storage(data: Vec<Self>) -> Storage {
        Storage::Complex128(data)
    }
}
