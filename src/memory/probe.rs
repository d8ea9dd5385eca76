//! Sources of "currently available memory"

use parking_lot::Mutex;
use sysinfo::System;

/// Reports how much memory the system can hand out right now
///
/// The reading is a point-in-time sample. Other processes may consume the
/// headroom between the sample and the allocation, so admission decisions
/// built on it are advisory.
pub trait MemoryProbe: Send + Sync {
    /// Available memory in bytes
    fn available_bytes(&self) -> u64;
}

/// Live system memory via `sysinfo`
pub struct SystemMemory {
    system: Mutex<System>,
}

impl SystemMemory {
    /// Create a probe; memory is sampled on every call, not here
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemory {
    fn available_bytes(&self) -> u64 {
        let mut system = self.system.lock();
        system.refresh_memory();
        system.available_memory()
    }
}

impl std::fmt::Debug for SystemMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMemory").finish_non_exhaustive()
    }
}

/// Probe reporting a fixed amount, for tests and sandboxed deployments
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedMemory {
    bytes: u64,
}

impl FixedMemory {
    /// Report exactly `bytes`
    pub const fn new(bytes: u64) -> Self {
        Self { bytes }
    }

    /// Report `mb` megabytes
    pub const fn from_mb(mb: u64) -> Self {
        Self { bytes: mb << 20 }
    }
}

impl MemoryProbe for FixedMemory {
    fn available_bytes(&self) -> u64 {
        self.bytes
    }
}
