//! Matrix-like 2-D container
//!
//! A `Matrix` always has exactly two dimensions. Guarded calls never hand a
//! `Matrix` to the wrapped function: it is normalised into a plain `Array`
//! first, flattening single-row matrices to vectors.

use super::Array;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};

/// Strictly two-dimensional array wrapper
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    inner: Array,
}

impl Matrix {
    /// Wrap a 2-D array
    pub fn new(array: Array) -> Result<Self> {
        if array.ndim() != 2 {
            return Err(Error::type_error(format!(
                "matrix must be 2-dimensional, got shape {:?}",
                array.shape()
            )));
        }
        Ok(Self { inner: array })
    }

    /// Build a matrix from a row-major buffer
    pub fn from_vec<T: Element>(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        Self::new(Array::from_vec(data, [rows, cols])?)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.inner.shape()[0]
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.inner.shape()[1]
    }

    /// Element type
    pub fn dtype(&self) -> DType {
        self.inner.dtype()
    }

    /// Materialise as a plain array
    ///
    /// A single-row matrix becomes a 1-D vector; anything else stays 2-D.
    pub fn into_array(self) -> Array {
        if self.rows() == 1 {
            self.inner.flatten()
        } else {
            self.inner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_flattens() {
        let m = Matrix::from_vec(vec![1.0f32, 2.0, 3.0], 1, 3).unwrap();
        let a = m.into_array();
        assert_eq!(a.shape().as_slice(), &[3]);
    }

    #[test]
    fn test_multi_row_stays_2d() {
        let m = Matrix::from_vec(vec![1.0f32; 6], 2, 3).unwrap();
        let a = m.into_array();
        assert_eq!(a.shape().as_slice(), &[2, 3]);
    }

    #[test]
    fn test_rejects_non_2d() {
        let a = Array::zeros(DType::F64, [4]);
        assert!(matches!(Matrix::new(a), Err(Error::Type { .. })));
    }
}
