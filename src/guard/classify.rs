//! Per-argument dtype classification

use crate::dtype::{DType, DTypeTag};
use crate::error::{Error, Result};
use crate::memory::{estimate, UsagePattern};
use crate::value::Value;

/// What the guard learned about one argument
///
/// Created fresh for every call and discarded after dispatch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgSpec {
    /// The argument is a multi-dimensional array
    pub is_array: bool,
    /// The array must be converted before dispatch
    pub needs_conversion: bool,
    /// The dtype to convert to, if any
    pub target_dtype: Option<DType>,
    /// Megabytes the conversion would allocate
    pub memory_cost_mb: u64,
}

impl ArgSpec {
    /// Argument the guard does not classify (scalars, flags, vectors)
    pub const UNCLASSIFIED: Self = Self {
        is_array: false,
        needs_conversion: false,
        target_dtype: None,
        memory_cost_mb: 0,
    };

    /// Array already in a kernel-native dtype
    pub const NATIVE: Self = Self {
        is_array: true,
        needs_conversion: false,
        target_dtype: None,
        memory_cost_mb: 0,
    };
}

/// Classify one argument
///
/// Only arrays with more than one dimension are inspected. The array is
/// never modified; the returned `ArgSpec` says what a conversion would cost.
///
/// # Errors
///
/// - `NotSquare` if `require_square` is set and the leading dimensions differ
/// - `UnsupportedDType` if the dtype cannot be promoted to a kernel dtype
pub fn classify(value: &Value, require_square: bool, max_float: DType) -> Result<ArgSpec> {
    let array = match value {
        Value::Array(a) if a.ndim() > 1 => a,
        _ => return Ok(ArgSpec::UNCLASSIFIED),
    };
    let shape = array.shape();
    if require_square && !shape.is_square() {
        return Err(Error::NotSquare {
            shape: shape.to_vec(),
        });
    }

    let dtype = array.dtype();
    let tag = DTypeTag::of(dtype, max_float);
    if !tag.is_supported() {
        return Err(Error::unsupported_dtype(dtype, "guarded call"));
    }
    let Some(target) = tag.promotion_target() else {
        return Ok(ArgSpec::NATIVE);
    };

    let cost = estimate(Some(UsagePattern::Same), shape, target.size_in_bytes());
    log::debug!(
        "argument {:?} {} needs promotion to {} ({} MB)",
        shape,
        dtype,
        target,
        cost
    );
    Ok(ArgSpec {
        is_array: true,
        needs_conversion: true,
        target_dtype: Some(target),
        memory_cost_mb: cost,
    })
}
