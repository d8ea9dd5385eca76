//! # numguard
//!
//! **Admission control and precision dispatch for linear algebra calls.**
//!
//! numguard sits between callers and numerical kernels. Before a wrapped
//! function runs it validates the arguments, promotes array dtypes to one
//! the kernels support, and refuses the call when the projected memory
//! exceeds what the system has free. Inside the function, a resolver binds
//! each routine to its single/double, real/complex variant.
//!
//! ## Components
//!
//! - **Memory estimation**: usage patterns turn a matrix shape into megabytes
//! - **Argument classification**: which arrays need promotion, and at what cost
//! - **Call guard**: validate, classify, budget, convert, then delegate
//! - **Routine resolver**: lazily bound `s`/`d`/`c`/`z` routine variants
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use numguard::prelude::*;
//!
//! let lib = Arc::new(RoutineLibrary::builtin());
//! let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
//!
//! let lu = CallGuard::builder("lu", &["a"])
//!     .memcheck("full")
//!     .square(true)
//!     .build(move |args| getrf.call(args))?;
//!
//! let a = Array::from_vec(vec![1i64, 2, 3, 4], [2, 2])?;
//! let factors = lu.invoke(CallArgs::new().arg(a))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): parallel dtype conversion of large arrays
//!
//! ## Configuration
//!
//! [`GuardConfig::from_env`](config::GuardConfig::from_env) honours
//! `NUMGUARD_MAX_MEMORY` (fraction of free memory a call may use) and
//! `NUMGUARD_WORD_SIZE` (`32` or `64`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod config;
pub mod dtype;
pub mod error;
pub mod guard;
pub mod memory;
pub mod routine;
pub mod value;

/// Prelude module for convenient imports
///
/// ```
/// use numguard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::array::{Array, Matrix, Shape};
    pub use crate::config::{GuardConfig, WordSize};
    pub use crate::dtype::{Complex128, Complex64, DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::guard::{CallGuard, CallGuardBuilder, MemoryBudgetFlags, PreparedCall};
    pub use crate::memory::{estimate, FixedMemory, MemoryProbe, SystemMemory, UsagePattern};
    pub use crate::routine::{Precision, RoutineLibrary, RoutineResolver};
    pub use crate::value::{CallArgs, Value};
    pub use std::sync::Arc;
}
