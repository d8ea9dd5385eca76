//! Memory-check configuration and per-call flag resolution

use crate::memory::UsagePattern;
use crate::value::{CallArgs, Value};

/// Which usage pattern applies to which flag, in priority order
///
/// The primary input's key is the name of the wrapped function's first
/// parameter. Other keys name boolean parameters that, when set, switch the
/// primary array's operation cost to their own pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryCheck {
    entries: Vec<(String, UsagePattern)>,
}

impl MemoryCheck {
    /// No memory accounting for the operation itself
    pub fn none() -> Self {
        Self::default()
    }

    /// One pattern, applied to the primary input
    pub fn primary(primary: &str, pattern: UsagePattern) -> Self {
        Self {
            entries: vec![(primary.to_owned(), pattern)],
        }
    }

    /// Patterns per flag, scanned in the given order
    pub fn per_argument(entries: Vec<(String, UsagePattern)>) -> Self {
        Self { entries }
    }

    /// Declared entries in priority order
    pub fn entries(&self) -> &[(String, UsagePattern)] {
        &self.entries
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pattern declared for `key`
    pub fn pattern(&self, key: &str) -> Option<UsagePattern> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| *p)
    }

    /// Resolve the flags for one call
    ///
    /// Exactly one flag ends up true. The primary flag wins when the caller
    /// set none of the other flags, or all of them; otherwise the first set
    /// flag in declaration order wins.
    pub fn resolve(&self, primary: &str, args: &CallArgs) -> MemoryBudgetFlags {
        let others: Vec<&str> = self
            .entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| *k != primary)
            .collect();
        let set = |key: &str| matches!(args.keyword(key), Some(Value::Bool(true)));
        let set_count = others.iter().filter(|&&k| set(k)).count();

        let winner = if set_count == 0 || set_count == others.len() {
            primary
        } else {
            // others non-empty here, and at least one is set
            others.iter().copied().find(|&k| set(k)).unwrap_or(primary)
        };

        let mut flags: Vec<(String, bool)> = Vec::with_capacity(self.entries.len() + 1);
        flags.push((primary.to_owned(), winner == primary));
        flags.extend(others.iter().map(|k| ((*k).to_owned(), *k == winner)));

        MemoryBudgetFlags {
            primary: primary.to_owned(),
            flags,
            pattern: self.pattern(winner),
        }
    }
}

/// Outcome of flag resolution for one call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryBudgetFlags {
    primary: String,
    flags: Vec<(String, bool)>,
    pattern: Option<UsagePattern>,
}

impl MemoryBudgetFlags {
    /// Name of the primary flag
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Whether the primary flag resolved true
    pub fn primary_selected(&self) -> bool {
        self.get(&self.primary).unwrap_or(false)
    }

    /// Resolved value of `key`
    pub fn get(&self, key: &str) -> Option<bool> {
        self.flags.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// The key that resolved true
    pub fn selected(&self) -> &str {
        self.flags
            .iter()
            .find(|(_, v)| *v)
            .map(|(k, _)| k.as_str())
            .unwrap_or(self.primary.as_str())
    }

    /// Usage pattern of the selected key, if one was declared for it
    pub fn pattern(&self) -> Option<UsagePattern> {
        self.pattern
    }

    /// Resolved non-primary flags, to be passed on to the wrapped function
    pub fn forwarded(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags
            .iter()
            .filter(move |(k, _)| *k != self.primary)
            .map(|(k, v)| (k.as_str(), *v))
    }
}
