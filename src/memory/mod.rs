//! Memory estimation and probing
//!
//! [`estimate`] turns an operation's usage pattern and operand shape into a
//! megabyte figure; a [`MemoryProbe`] says how many megabytes there are to
//! spend.

mod estimator;
mod probe;

pub use estimator::{estimate, UsagePattern};
pub use probe::{FixedMemory, MemoryProbe, SystemMemory};
