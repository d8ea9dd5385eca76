//! Working-memory estimates for matrix operations

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// How an operation's working set scales with its input shape `(n, p)`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UsagePattern {
    /// Input plus a square workspace of the smaller side: `n*p + min(n², p²)`
    Full,
    /// Same size as the input: `n*p`
    Same,
    /// Upper-triangular factor: `p²` if `p < n`, else `n*p`
    Triu,
    /// Square in the row count: `n²`
    Squared,
    /// One value per column: `p`
    Columns,
}

impl UsagePattern {
    /// Every pattern, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Full,
        Self::Same,
        Self::Triu,
        Self::Squared,
        Self::Columns,
    ];

    /// Element-count multiplier for a `(n, p)` operand, saturating at `u128::MAX`
    pub fn multiplier(self, n: usize, p: usize) -> u128 {
        let (n, p) = (n as u128, p as u128);
        let np = n.saturating_mul(p);
        match self {
            Self::Full => np.saturating_add(n.saturating_mul(n).min(p.saturating_mul(p))),
            Self::Same => np,
            Self::Triu => {
                if p < n {
                    p.saturating_mul(p)
                } else {
                    np
                }
            }
            Self::Squared => n.saturating_mul(n),
            Self::Columns => p,
        }
    }

    /// Configuration name of this pattern
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Same => "same",
            Self::Triu => "triu",
            Self::Squared => "squared",
            Self::Columns => "columns",
        }
    }

    /// Parse a configured pattern name, naming `key` on failure
    pub fn parse_for(key: &str, name: &str) -> Result<Self> {
        name.parse().map_err(|_| Error::UnknownUsagePattern {
            key: key.to_owned(),
            pattern: name.to_owned(),
        })
    }
}

impl FromStr for UsagePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownUsagePattern {
                key: String::new(),
                pattern: s.to_owned(),
            })
    }
}

impl fmt::Display for UsagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Megabytes needed to run `pattern` over `shape` at `byte_width` bytes per element
///
/// A vector `(k,)` is treated as the row `(1, k)`. `None` costs nothing.
/// The result is floored to whole megabytes (`>> 20`).
pub fn estimate(pattern: Option<UsagePattern>, shape: &[usize], byte_width: usize) -> u64 {
    let Some(pattern) = pattern else {
        return 0;
    };
    let (n, p) = match shape {
        [] => (1, 1),
        [k] => (1, *k),
        [n, p, ..] => (*n, *p),
    };
    let bytes = pattern.multiplier(n, p).saturating_mul(byte_width as u128);
    u64::try_from(bytes >> 20).unwrap_or(u64::MAX)
}
