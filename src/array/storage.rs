//! Typed host storage backing an `Array`

use crate::dtype::{Complex128, Complex64, DType, Element};
use crate::error::{Error, Result};
use half::f16;

/// Buffers at least this long are converted on the rayon pool
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Contiguous, row-major element buffer tagged with its dtype
///
/// Booleans are stored one byte per element.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    /// 64-bit floats
    F64(Vec<f64>),
    /// 32-bit floats
    F32(Vec<f32>),
    /// 16-bit floats
    F16(Vec<f16>),
    /// 64-bit signed integers
    I64(Vec<i64>),
    /// 32-bit signed integers
    I32(Vec<i32>),
    /// 16-bit signed integers
    I16(Vec<i16>),
    /// 8-bit signed integers
    I8(Vec<i8>),
    /// 64-bit unsigned integers
    U64(Vec<u64>),
    /// 32-bit unsigned integers
    U32(Vec<u32>),
    /// 16-bit unsigned integers
    U16(Vec<u16>),
    /// 8-bit unsigned integers
    U8(Vec<u8>),
    /// Booleans, one byte each (0 or 1)
    Bool(Vec<u8>),
    /// Single-precision complex
    Complex64(Vec<Complex64>),
    /// Double-precision complex
    Complex128(Vec<Complex128>),
}

/// Run `$body` with `$data` bound to the typed buffer inside a `Storage`.
macro_rules! with_storage {
    ($storage:expr, $data:ident => $body:expr) => {
        match $storage {
            Storage::F64($data) => $body,
            Storage::F32($data) => $body,
            Storage::F16($data) => $body,
            Storage::I64($data) => $body,
            Storage::I32($data) => $body,
            Storage::I16($data) => $body,
            Storage::I8($data) => $body,
            Storage::U64($data) => $body,
            Storage::U32($data) => $body,
            Storage::U16($data) => $body,
            Storage::U8($data) => $body,
            Storage::Bool($data) => $body,
            Storage::Complex64($data) => $body,
            Storage::Complex128($data) => $body,
        }
    };
}

/// Run `$body` with `$T` bound to the Rust element type of a non-bool dtype.
macro_rules! dispatch_element {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            DType::F64 => {
                type $T = f64;
                $body
            }
            DType::F32 => {
                type $T = f32;
                $body
            }
            DType::F16 => {
                type $T = f16;
                $body
            }
            DType::I64 => {
                type $T = i64;
                $body
            }
            DType::I32 => {
                type $T = i32;
                $body
            }
            DType::I16 => {
                type $T = i16;
                $body
            }
            DType::I8 => {
                type $T = i8;
                $body
            }
            DType::U64 => {
                type $T = u64;
                $body
            }
            DType::U32 => {
                type $T = u32;
                $body
            }
            DType::U16 => {
                type $T = u16;
                $body
            }
            DType::U8 | DType::Bool => {
                type $T = u8;
                $body
            }
            DType::Complex64 => {
                type $T = Complex64;
                $body
            }
            DType::Complex128 => {
                type $T = Complex128;
                $body
            }
        }
    };
}

impl Storage {
    /// Zero-filled storage of `len` elements
    pub fn zeros(dtype: DType, len: usize) -> Self {
        if dtype == DType::Bool {
            return Self::Bool(vec![0; len]);
        }
        dispatch_element!(dtype, T => { T::into_storage(vec![T::zero(); len]) })
    }

    /// Element type of this buffer
    pub fn dtype(&self) -> DType {
        match self {
            Self::F64(_) => DType::F64,
            Self::F32(_) => DType::F32,
            Self::F16(_) => DType::F16,
            Self::I64(_) => DType::I64,
            Self::I32(_) => DType::I32,
            Self::I16(_) => DType::I16,
            Self::I8(_) => DType::I8,
            Self::U64(_) => DType::U64,
            Self::U32(_) => DType::U32,
            Self::U16(_) => DType::U16,
            Self::U8(_) => DType::U8,
            Self::Bool(_) => DType::Bool,
            Self::Complex64(_) => DType::Complex64,
            Self::Complex128(_) => DType::Complex128,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_storage!(self, data => data.len())
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        with_storage!(self, data => bytemuck::cast_slice(data.as_slice()))
    }

    /// Convert every element to `target`, producing a new buffer
    ///
    /// Complex values cannot be narrowed to real types; that returns
    /// `UnsupportedDType` rather than silently dropping the imaginary part.
    pub fn cast(&self, target: DType) -> Result<Self> {
        let source = self.dtype();
        if source == target {
            return Ok(self.clone());
        }
        if source.is_complex() && !target.is_complex() {
            return Err(Error::unsupported_dtype(source, "cast to real"));
        }
        if target == DType::Bool {
            return Ok(Self::Bool(
                with_storage!(self, data => map_elements(data, |x| u8::from(x.to_f64() != 0.0))),
            ));
        }
        Ok(dispatch_element!(target, T => {
            with_storage!(self, data => T::into_storage(convert::<_, T>(data)))
        }))
    }
}

fn convert<S: Element, T: Element>(src: &[S]) -> Vec<T> {
    if T::DTYPE.is_complex() {
        map_elements(src, |x| T::from_complex128(x.to_complex128()))
    } else {
        map_elements(src, |x| T::from_f64(x.to_f64()))
    }
}

fn map_elements<S, T, F>(src: &[S], f: F) -> Vec<T>
where
    S: Element,
    T: Send,
    F: Fn(S) -> T + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        if src.len() >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;
            return src.par_iter().map(|&x| f(x)).collect();
        }
    }
    src.iter().map(|&x| f(x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_float() {
        let s = Storage::I64(vec![1, -2, 3]);
        assert_eq!(s.cast(DType::F64).unwrap(), Storage::F64(vec![1.0, -2.0, 3.0]));
    }

    #[test]
    fn test_half_to_single() {
        let s = Storage::F16(vec![f16::from_f32(0.5), f16::from_f32(-2.0)]);
        assert_eq!(s.cast(DType::F32).unwrap(), Storage::F32(vec![0.5, -2.0]));
    }

    #[test]
    fn test_real_to_complex() {
        let s = Storage::F32(vec![1.0, 2.0]);
        assert_eq!(
            s.cast(DType::Complex128).unwrap(),
            Storage::Complex128(vec![Complex128::new(1.0, 0.0), Complex128::new(2.0, 0.0)])
        );
    }

    #[test]
    fn test_complex_to_real_rejected() {
        let s = Storage::Complex64(vec![Complex64::new(1.0, 1.0)]);
        assert!(matches!(
            s.cast(DType::F32),
            Err(Error::UnsupportedDType { .. })
        ));
    }

    #[test]
    fn test_bool_roundtrip() {
        let s = Storage::F64(vec![0.0, 3.5]);
        let b = s.cast(DType::Bool).unwrap();
        assert_eq!(b, Storage::Bool(vec![0, 1]));
        assert_eq!(b.cast(DType::F32).unwrap(), Storage::F32(vec![0.0, 1.0]));
    }

    #[test]
    fn test_large_cast_parallel_path() {
        let n = (1 << 16) + 3;
        let s = Storage::I32((0..n as i32).collect());
        let out = s.cast(DType::F64).unwrap();
        match out {
            Storage::F64(v) => {
                assert_eq!(v.len(), n);
                assert_eq!(v[n - 1], (n - 1) as f64);
            }
            other => panic!("unexpected storage {:?}", other.dtype()),
        }
    }

    #[test]
    fn test_bytes_and_zeros() {
        let s = Storage::zeros(DType::Complex64, 3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_bytes().len(), 24);
        assert_eq!(Storage::zeros(DType::Bool, 2), Storage::Bool(vec![0, 0]));
    }
}
