//! Shape type: dimensions of an array

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Guarded arguments are matrices or vectors, so four is plenty
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of an array
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Create an empty (scalar) shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Leading two dimensions as `(n, p)`.
    ///
    /// A vector `(k,)` is read as a single row `(1, k)`; a scalar as `(1, 1)`.
    /// Trailing dimensions beyond the second are ignored.
    pub fn matrix_dims(&self) -> (usize, usize) {
        match self.0.as_slice() {
            [] => (1, 1),
            [k] => (1, *k),
            [n, p, ..] => (*n, *p),
        }
    }

    /// Whether the first two dimensions are equal (trivially true below 2-D).
    pub fn is_square(&self) -> bool {
        match self.0.as_slice() {
            [n, p, ..] => n == p,
            _ => true,
        }
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_dims() {
        assert_eq!(Shape::from([7]).matrix_dims(), (1, 7));
        assert_eq!(Shape::from([3, 4]).matrix_dims(), (3, 4));
        assert_eq!(Shape::from([3, 4, 5]).matrix_dims(), (3, 4));
        assert_eq!(Shape::new().matrix_dims(), (1, 1));
    }

    #[test]
    fn test_numel_and_square() {
        let s = Shape::from([3, 3]);
        assert_eq!(s.numel(), 9);
        assert!(s.is_square());
        assert!(!Shape::from([2, 3]).is_square());
        assert!(Shape::from([5]).is_square());
    }
}
