//! Core Array type

use super::{Shape, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// Dense, row-major n-dimensional array on the host
///
/// `Array` is what guarded functions and routines receive. It owns its
/// buffer; conversions with [`Array::astype`] produce a new array and leave
/// the original untouched.
#[derive(Clone, PartialEq)]
pub struct Array {
    shape: Shape,
    storage: Storage,
}

impl Array {
    /// Create an array from a typed buffer
    ///
    /// Fails if `data.len()` does not equal the product of `shape`.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        Self::from_storage(T::into_storage(data), shape)
    }

    /// Create a boolean array
    pub fn from_bools(data: &[bool], shape: impl Into<Shape>) -> Result<Self> {
        let bytes = data.iter().map(|&b| u8::from(b)).collect();
        Self::from_storage(Storage::Bool(bytes), shape)
    }

    /// Create an array from existing storage
    pub fn from_storage(storage: Storage, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if storage.len() != shape.numel() {
            return Err(Error::shape_mismatch(&[storage.len()], &shape));
        }
        Ok(Self { shape, storage })
    }

    /// Zero-filled array
    pub fn zeros(dtype: DType, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let storage = Storage::zeros(dtype, shape.numel());
        Self { shape, storage }
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Dimensions
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Size of the buffer in bytes
    pub fn nbytes(&self) -> usize {
        self.numel() * self.dtype().size_in_bytes()
    }

    /// Backing storage
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Raw bytes of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Borrow the elements as `&[T]`
    ///
    /// Fails with `UnsupportedDType` if `T` is not the array's dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        let dtype = self.dtype();
        T::slice(&self.storage).ok_or(Error::UnsupportedDType {
            dtype,
            op: "as_slice",
        })
    }

    /// Mutably borrow the elements as `&mut [T]`
    pub fn as_slice_mut<T: Element>(&mut self) -> Result<&mut [T]> {
        let dtype = self.dtype();
        T::slice_mut(&mut self.storage).ok_or(Error::UnsupportedDType {
            dtype,
            op: "as_slice_mut",
        })
    }

    /// Copy the elements out as `Vec<T>`
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.as_slice().map(<[T]>::to_vec)
    }

    /// Return an array with the same buffer and a new shape
    pub fn reshape(self, shape: impl Into<Shape>) -> Result<Self> {
        Self::from_storage(self.storage, shape)
    }

    /// Collapse to one dimension
    pub fn flatten(self) -> Self {
        let shape = Shape::from([self.numel()]);
        Self {
            shape,
            storage: self.storage,
        }
    }

    /// Convert to another dtype, returning a new array
    pub fn astype(&self, dtype: DType) -> Result<Self> {
        Ok(Self {
            shape: self.shape.clone(),
            storage: self.storage.cast(dtype)?,
        })
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype())
            .finish()
    }
}
