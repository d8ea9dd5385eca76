//! Level-1 BLAS kernels

use super::{array_arg, scalar_arg, LinalgScalar};
use crate::array::Array;
use crate::error::{Error, Result};
use crate::value::{CallArgs, Value};

fn same_length(x: &Array, y: &Array) -> Result<()> {
    if x.numel() != y.numel() {
        return Err(Error::shape_mismatch(x.shape(), y.shape()));
    }
    Ok(())
}

/// Unconjugated inner product `sum(x[i] * y[i])`
///
/// Arguments: `x`, `y` of equal length (any shape).
pub fn dot<T: LinalgScalar>(args: CallArgs) -> Result<Value> {
    let x = array_arg::<T>(&args, 0, "x")?;
    let y = array_arg::<T>(&args, 1, "y")?;
    same_length(&x, &y)?;

    let total = x
        .as_slice::<T>()?
        .iter()
        .zip(y.as_slice::<T>()?)
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
    Ok(total.into_value())
}

/// `a * x + y`
///
/// Arguments: `x`, `y` of equal length, optional scalar `a` (default 1).
/// The result has the shape of `y`.
pub fn axpy<T: LinalgScalar>(args: CallArgs) -> Result<Value> {
    let x = array_arg::<T>(&args, 0, "x")?;
    let mut y = array_arg::<T>(&args, 1, "y")?;
    let a = scalar_arg::<T>(&args, 2, "a", 1.0)?;
    same_length(&x, &y)?;

    for (yi, &xi) in y.as_slice_mut::<T>()?.iter_mut().zip(x.as_slice::<T>()?) {
        *yi = a * xi + *yi;
    }
    Ok(Value::Array(y))
}

/// `a * x`
///
/// Arguments: `x`, scalar `a`.
pub fn scal<T: LinalgScalar>(args: CallArgs) -> Result<Value> {
    let mut x = array_arg::<T>(&args, 0, "x")?;
    let a = scalar_arg::<T>(&args, 1, "a", 1.0)?;

    for xi in x.as_slice_mut::<T>()? {
        *xi = a * *xi;
    }
    Ok(Value::Array(x))
}
