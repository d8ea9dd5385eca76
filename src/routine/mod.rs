//! Routine dispatch across precision variants
//!
//! Numerical routines come in four variants (`s`, `d`, `c`, `z`). A
//! [`RoutineResolver`] picks one from the dtype of the first argument it
//! sees and keeps forwarding to it. Variants live in a [`RoutineLibrary`];
//! [`RoutineLibrary::builtin`] provides portable kernels.
//!
//! ```ignore
//! use numguard::prelude::*;
//! use std::sync::Arc;
//!
//! let lib = Arc::new(RoutineLibrary::builtin());
//! let getrf = RoutineResolver::lapack(lib.clone(), "getrf", None, true);
//! let lu = getrf.call(CallArgs::new().arg(a))?;
//! ```

pub mod kernels;
mod library;
mod precision;
mod resolver;

pub use library::{Routine, RoutineLibrary, RoutineTable};
pub use precision::Precision;
pub use resolver::{ResolvedRoutine, RoutineResolver};
