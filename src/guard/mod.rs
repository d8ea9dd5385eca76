//! Admission control for numerical functions
//!
//! [`CallGuard`] wraps a function, classifies its array arguments, checks the
//! projected memory against what the system has free, promotes dtypes and
//! finally delegates.
//!
//! ```ignore
//! use numguard::prelude::*;
//!
//! let svd = CallGuard::builder("svd", &["X", "U", "S", "V"])
//!     .memcheck_args([("X", "full"), ("U", "same"), ("V", "triu")])
//!     .build(|args| {
//!         let x = args.get(0).and_then(Value::as_array).ok_or_else(|| Error::type_error("X"))?;
//!         // x is f32, f64 or complex here
//!         Ok(Value::None)
//!     })?;
//!
//! svd.invoke(CallArgs::new().arg(x).kwarg("U", true))?;
//! ```

mod call_guard;
mod classify;
mod flags;
mod signature;

pub use call_guard::{CallGuard, CallGuardBuilder, GuardedFn, PreparedCall};
pub use classify::{classify, ArgSpec};
pub use flags::{MemoryBudgetFlags, MemoryCheck};
pub use signature::Signature;
