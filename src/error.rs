//! Error types for numguard

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using numguard's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while admitting, converting or dispatching a call
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number of arguments for the wrapped function
    #[error("Arity error: {reason}")]
    Arity {
        /// Why the argument count was rejected
        reason: String,
    },

    /// An argument is not of the expected kind
    #[error("Type error: {reason}")]
    Type {
        /// Description of the mismatch
        reason: String,
    },

    /// A square matrix was required
    #[error("2D array is not square. Dimensions seen are {shape:?}")]
    NotSquare {
        /// The offending shape
        shape: Vec<usize>,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Keyword argument does not name a declared parameter
    #[error("Argument '{key}' is not recognised in function. Function accepted signature is {signature}")]
    Name {
        /// The unrecognised keyword
        key: String,
        /// The accepted signature, rendered as `name(a, b, c)`
        signature: String,
    },

    /// A parameter was supplied both positionally and by keyword
    #[error("Argument '{key}' was given both positionally and by keyword")]
    DuplicateArgument {
        /// The duplicated parameter name
        key: String,
    },

    /// Memory-check configuration names an unknown usage pattern
    #[error("Memory usage argument for '{key}' not recognised: '{pattern}'")]
    UnknownUsagePattern {
        /// The argument the pattern was configured for
        key: String,
        /// The unrecognised pattern name
        pattern: String,
    },

    /// Projected memory requirement exceeds the admission budget
    #[error(
        "Operation requires {required_mb} MB, but {available_mb} MB is free, \
         so an extra {shortfall_mb} MB is required"
    )]
    OutOfMemory {
        /// Projected requirement in megabytes
        required_mb: u64,
        /// Budget in megabytes after the safety margin
        available_mb: u64,
        /// `required_mb - available_mb`
        shortfall_mb: u64,
    },

    /// The wrapped function itself ran out of memory
    #[error("Operation requires more memory than what the system resources offer")]
    MemoryExhausted,

    /// No routine is registered for a name/precision pair
    #[error("Routine '{name}' is not registered")]
    RoutineNotFound {
        /// Fully prefixed routine name, e.g. `sgetrf`
        name: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration '{key}': {reason}")]
    Config {
        /// Configuration key
        key: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create an arity error
    pub fn arity(reason: impl Into<String>) -> Self {
        Self::Arity {
            reason: reason.into(),
        }
    }

    /// Create a type error
    pub fn type_error(reason: impl Into<String>) -> Self {
        Self::Type {
            reason: reason.into(),
        }
    }

    /// Create an unknown-argument error
    pub fn name_error(key: impl Into<String>, signature: impl ToString) -> Self {
        Self::Name {
            key: key.into(),
            signature: signature.to_string(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an admission failure from a requirement and a budget
    pub fn out_of_memory(required_mb: u64, available_mb: u64) -> Self {
        Self::OutOfMemory {
            required_mb,
            available_mb,
            shortfall_mb: required_mb.saturating_sub(available_mb),
        }
    }

    /// Whether this error reports memory exhaustion of any kind
    pub fn is_memory_error(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. } | Self::MemoryExhausted)
    }
}
