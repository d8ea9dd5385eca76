//! Portable BLAS/LAPACK kernels
//!
//! Each kernel is generic over [`LinalgScalar`] and registered once per
//! precision. Like LAPACK bindings, a kernel casts its array arguments to
//! its own precision before computing, so a variant bound for f32 still
//! accepts f64 input (and computes in f32).

pub mod blas;
pub mod lapack;

use crate::array::Array;
use crate::dtype::{Complex128, Complex64, Element};
use crate::error::{Error, Result};
use crate::value::{CallArgs, Value};

/// Element types the kernels compute in
pub trait LinalgScalar: Element {
    /// Magnitude used for pivoting
    fn abs_val(self) -> f64;
    /// Complex conjugate (identity for reals)
    fn conj_val(self) -> Self;
    /// Principal square root
    fn sqrt_val(self) -> Self;
    /// Real part
    fn real_part(self) -> f64;

    /// Wrap a scalar result
    fn into_value(self) -> Value {
        if Self::DTYPE.is_complex() {
            Value::Complex(self.to_complex128())
        } else {
            Value::Float(self.to_f64())
        }
    }
}

impl LinalgScalar for f32 {
    #[inline]
    fn abs_val(self) -> f64 {
        self.abs() as f64
    }
    #[inline]
    fn conj_val(self) -> Self {
        self
    }
    #[inline]
    fn sqrt_val(self) -> Self {
        self.sqrt()
    }
    #[inline]
    fn real_part(self) -> f64 {
        self as f64
    }
}

impl LinalgScalar for f64 {
    #[inline]
    fn abs_val(self) -> f64 {
        self.abs()
    }
    #[inline]
    fn conj_val(self) -> Self {
        self
    }
    #[inline]
    fn sqrt_val(self) -> Self {
        self.sqrt()
    }
    #[inline]
    fn real_part(self) -> f64 {
        self
    }
}

impl LinalgScalar for Complex64 {
    #[inline]
    fn abs_val(self) -> f64 {
        self.magnitude() as f64
    }
    #[inline]
    fn conj_val(self) -> Self {
        self.conj()
    }
    #[inline]
    fn sqrt_val(self) -> Self {
        self.sqrt()
    }
    #[inline]
    fn real_part(self) -> f64 {
        self.re as f64
    }
}

impl LinalgScalar for Complex128 {
    #[inline]
    fn abs_val(self) -> f64 {
        self.magnitude()
    }
    #[inline]
    fn conj_val(self) -> Self {
        self.conj()
    }
    #[inline]
    fn sqrt_val(self) -> Self {
        self.sqrt()
    }
    #[inline]
    fn real_part(self) -> f64 {
        self.re
    }
}

/// Array argument at `index` (or keyword `name`), cast to `T`
pub(crate) fn array_arg<T: LinalgScalar>(
    args: &CallArgs,
    index: usize,
    name: &'static str,
) -> Result<Array> {
    let value = args.lookup(index, name).ok_or(Error::InvalidArgument {
        arg: name,
        reason: "missing".into(),
    })?;
    let array = value.as_array().ok_or_else(|| Error::InvalidArgument {
        arg: name,
        reason: format!("expected array, got {}", value.kind()),
    })?;
    array.astype(T::DTYPE)
}

/// 2-D array argument, returned as `(row-major data, rows, cols)`
pub(crate) fn matrix_arg<T: LinalgScalar>(
    args: &CallArgs,
    index: usize,
    name: &'static str,
) -> Result<(Vec<T>, usize, usize)> {
    let array = array_arg::<T>(args, index, name)?;
    if array.ndim() != 2 {
        return Err(Error::InvalidArgument {
            arg: name,
            reason: format!("expected 2-D array, got shape {:?}", array.shape()),
        });
    }
    let (m, n) = array.shape().matrix_dims();
    Ok((array.to_vec()?, m, n))
}

/// Scalar argument at `index` (or keyword `name`), with a default
pub(crate) fn scalar_arg<T: LinalgScalar>(
    args: &CallArgs,
    index: usize,
    name: &'static str,
    default: f64,
) -> Result<T> {
    match args.lookup(index, name) {
        None => Ok(T::from_f64(default)),
        Some(value) => value
            .as_complex()
            .map(T::from_complex128)
            .ok_or_else(|| Error::InvalidArgument {
                arg: name,
                reason: format!("expected scalar, got {}", value.kind()),
            }),
    }
}

/// Boolean keyword option
pub(crate) fn flag_arg(args: &CallArgs, name: &str, default: bool) -> bool {
    args.keyword(name)
        .and_then(Value::as_bool)
        .unwrap_or(default)
}
