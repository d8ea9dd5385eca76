//! Host arrays handed to guarded functions and routines
//!
//! This module provides the `Array` type (shape + typed storage), the
//! matrix-like `Matrix` container that guarded calls normalise away, and
//! the dtype conversions the guard performs before dispatch.

mod core;
mod matrix;
mod shape;
mod storage;

pub use core::Array;
pub use matrix::Matrix;
pub use shape::Shape;
pub use storage::Storage;
