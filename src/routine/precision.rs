//! Precision variants of BLAS/LAPACK routines

use crate::dtype::DType;
use std::fmt;

/// One of the four dtype-specialised variants of a routine
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Precision {
    /// `s` prefix: f32
    Single,
    /// `d` prefix: f64
    Double,
    /// `c` prefix: complex64
    ComplexSingle,
    /// `z` prefix: complex128
    ComplexDouble,
}

impl Precision {
    /// Every variant, in prefix order s, d, c, z
    pub const ALL: [Self; 4] = [
        Self::Single,
        Self::Double,
        Self::ComplexSingle,
        Self::ComplexDouble,
    ];

    /// Conventional routine-name prefix
    pub const fn prefix(self) -> char {
        match self {
            Self::Single => 's',
            Self::Double => 'd',
            Self::ComplexSingle => 'c',
            Self::ComplexDouble => 'z',
        }
    }

    /// Element dtype the variant computes in
    pub const fn dtype(self) -> DType {
        match self {
            Self::Single => DType::F32,
            Self::Double => DType::F64,
            Self::ComplexSingle => DType::Complex64,
            Self::ComplexDouble => DType::Complex128,
        }
    }

    /// Full routine name, e.g. `sgetrf`
    pub fn routine_name(self, base: &str) -> String {
        format!("{}{}", self.prefix(), base)
    }

    /// Variant a LAPACK routine should use for `dtype`
    ///
    /// Single precision is only chosen when `turbo` allows it; f32 input
    /// without `turbo` runs in double. Anything unrecognised, including a
    /// missing dtype, falls through to double complex.
    pub fn for_lapack(dtype: Option<DType>, turbo: bool) -> Self {
        match dtype {
            Some(DType::F32) if turbo => Self::Single,
            Some(DType::F32 | DType::F64) => Self::Double,
            Some(DType::Complex64) => Self::ComplexSingle,
            _ => Self::ComplexDouble,
        }
    }

    /// Variant a BLAS routine should use for `dtype`
    pub fn for_blas(dtype: Option<DType>) -> Self {
        match dtype {
            Some(DType::F32) => Self::Single,
            Some(DType::F64) => Self::Double,
            Some(DType::Complex64) => Self::ComplexSingle,
            _ => Self::ComplexDouble,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
