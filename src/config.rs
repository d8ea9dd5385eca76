//! Guard configuration
//!
//! The memory safety margin and the platform word size are fixed for the
//! lifetime of a guard and travel in a [`GuardConfig`].

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Fraction of available memory a single call may claim
pub const DEFAULT_MAX_MEMORY_FRACTION: f64 = 0.94;

/// Environment variable overriding [`GuardConfig::max_memory_fraction`]
pub const ENV_MAX_MEMORY: &str = "NUMGUARD_MAX_MEMORY";

/// Environment variable overriding [`GuardConfig::word_size`] (`32` or `64`)
pub const ENV_WORD_SIZE: &str = "NUMGUARD_WORD_SIZE";

/// Native pointer width, which decides the platform's max float
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WordSize {
    /// 32-bit platform: F32 is the widest native float
    Bits32,
    /// 64-bit platform: F64 is the widest native float
    Bits64,
}

impl WordSize {
    /// Word size of the compilation target
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// Widest float the platform handles natively
    #[inline]
    pub const fn max_float(self) -> DType {
        match self {
            Self::Bits32 => DType::F32,
            Self::Bits64 => DType::F64,
        }
    }
}

impl Default for WordSize {
    fn default() -> Self {
        Self::native()
    }
}

/// Immutable settings shared by every call through a guard
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GuardConfig {
    /// Fraction of sampled available memory a call may use, in `(0, 1]`
    pub max_memory_fraction: f64,
    /// Platform word size
    pub word_size: WordSize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_memory_fraction: DEFAULT_MAX_MEMORY_FRACTION,
            word_size: WordSize::native(),
        }
    }
}

impl GuardConfig {
    /// Defaults with overrides from `NUMGUARD_MAX_MEMORY` / `NUMGUARD_WORD_SIZE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_MEMORY) {
            config.max_memory_fraction = raw.trim().parse().map_err(|_| Error::Config {
                key: ENV_MAX_MEMORY,
                reason: format!("'{raw}' is not a number"),
            })?;
        }
        if let Some(raw) = lookup(ENV_WORD_SIZE) {
            config.word_size = match raw.trim() {
                "32" => WordSize::Bits32,
                "64" => WordSize::Bits64,
                other => {
                    return Err(Error::Config {
                        key: ENV_WORD_SIZE,
                        reason: format!("expected 32 or 64, got '{other}'"),
                    })
                }
            };
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the memory fraction
    pub fn with_max_memory_fraction(mut self, fraction: f64) -> Self {
        self.max_memory_fraction = fraction;
        self
    }

    /// Set the word size
    pub fn with_word_size(mut self, word_size: WordSize) -> Self {
        self.word_size = word_size;
        self
    }

    /// Check the fraction lies in `(0, 1]`
    pub fn validate(&self) -> Result<()> {
        let f = self.max_memory_fraction;
        if !(f > 0.0 && f <= 1.0) {
            return Err(Error::Config {
                key: "max_memory_fraction",
                reason: format!("must be in (0, 1], got {f}"),
            });
        }
        Ok(())
    }

    /// Widest native float for this configuration
    #[inline]
    pub fn max_float(&self) -> DType {
        self.word_size.max_float()
    }

    /// Admission budget in megabytes for `available_bytes` of free memory
    pub fn budget_mb(&self, available_bytes: u64) -> u64 {
        ((available_bytes as f64 * self.max_memory_fraction) as u64) >> 20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.max_memory_fraction, 0.94);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_budget() {
        let config = GuardConfig::default();
        // 1010 MB * 0.94 = 949.4 MB
        assert_eq!(config.budget_mb(1010 << 20), 949);
        assert_eq!(config.budget_mb(0), 0);
    }

    #[test]
    fn test_max_float() {
        assert_eq!(WordSize::Bits64.max_float(), DType::F64);
        assert_eq!(WordSize::Bits32.max_float(), DType::F32);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = GuardConfig::from_lookup(|key| match key {
            ENV_MAX_MEMORY => Some("0.5".into()),
            ENV_WORD_SIZE => Some("32".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.max_memory_fraction, 0.5);
        assert_eq!(config.word_size, WordSize::Bits32);
    }

    #[test]
    fn test_lookup_rejects_bad_values() {
        let bad_fraction = GuardConfig::from_lookup(|key| (key == ENV_MAX_MEMORY).then(|| "1.5".into()));
        assert!(matches!(bad_fraction, Err(Error::Config { .. })));
        let bad_word = GuardConfig::from_lookup(|key| (key == ENV_WORD_SIZE).then(|| "16".into()));
        assert!(matches!(bad_word, Err(Error::Config { .. })));
    }
}
