//! Admission control and argument preparation for guarded calls
//!
//! A [`CallGuard`] wraps a numerical function. Every call runs the same
//! linear pipeline before the function sees its arguments:
//!
//! 1. **Validate** argument counts, the primary input and keyword names
//! 2. **Classify** every array argument and resolve the memory flags
//! 3. **Budget** the projected megabytes against sampled free memory
//! 4. **Convert** arrays that need promotion
//! 5. **Clean** bookkeeping out of the argument lists
//! 6. **Delegate** to the wrapped function
//!
//! Nothing is converted unless every check passed, and the guard keeps no
//! state between calls.

use super::classify::{classify, ArgSpec};
use super::flags::{MemoryBudgetFlags, MemoryCheck};
use super::signature::Signature;
use crate::config::GuardConfig;
use crate::error::{Error, Result};
use crate::memory::{estimate, MemoryProbe, SystemMemory, UsagePattern};
use crate::value::{CallArgs, Value};
use std::fmt;
use std::sync::Arc;

/// Function body a guard delegates to
pub type GuardedFn = dyn Fn(CallArgs) -> Result<Value> + Send + Sync;

/// How the builder was told to account for the operation's own memory
#[derive(Clone, Debug)]
enum MemCheckSpec {
    None,
    Primary(String),
    PerArgument(Vec<(String, String)>),
}

/// Builder for [`CallGuard`]
pub struct CallGuardBuilder {
    signature: Signature,
    memcheck: MemCheckSpec,
    require_square: bool,
    config: GuardConfig,
    probe: Option<Arc<dyn MemoryProbe>>,
}

impl CallGuardBuilder {
    /// Charge the operation to the primary input with pattern `pattern`
    pub fn memcheck(mut self, pattern: &str) -> Self {
        self.memcheck = MemCheckSpec::Primary(pattern.to_owned());
        self
    }

    /// Charge the operation per flag: `(argument name, pattern name)` in priority order
    pub fn memcheck_args<I, K, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<String>,
    {
        self.memcheck = MemCheckSpec::PerArgument(
            entries
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        );
        self
    }

    /// Require 2-D array arguments to be square
    pub fn square(mut self, require_square: bool) -> Self {
        self.require_square = require_square;
        self
    }

    /// Use `config` instead of the defaults
    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Sample free memory from `probe` instead of the live system
    pub fn probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Share an existing probe
    pub fn shared_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Wrap `func`
    ///
    /// # Errors
    ///
    /// - `Arity` if the signature declares no parameter
    /// - `UnknownUsagePattern` if a pattern name is not recognised
    /// - `Name` if a memory-check key is not a declared parameter
    /// - `Config` if the configuration is invalid
    pub fn build<F>(self, func: F) -> Result<CallGuard>
    where
        F: Fn(CallArgs) -> Result<Value> + Send + Sync + 'static,
    {
        let Some(primary) = self.signature.primary().map(str::to_owned) else {
            return Err(Error::arity(format!(
                "{} must declare at least one parameter",
                self.signature.name()
            )));
        };
        self.config.validate()?;

        let memory_check = match self.memcheck {
            MemCheckSpec::None => MemoryCheck::none(),
            MemCheckSpec::Primary(name) => {
                MemoryCheck::primary(&primary, UsagePattern::parse_for(&primary, &name)?)
            }
            MemCheckSpec::PerArgument(entries) => {
                let mut parsed = Vec::with_capacity(entries.len());
                for (key, name) in entries {
                    if !self.signature.contains(&key) {
                        return Err(Error::name_error(key, &self.signature));
                    }
                    let pattern = UsagePattern::parse_for(&key, &name)?;
                    parsed.push((key, pattern));
                }
                MemoryCheck::per_argument(parsed)
            }
        };

        Ok(CallGuard {
            signature: self.signature,
            memory_check,
            require_square: self.require_square,
            config: self.config,
            probe: self
                .probe
                .unwrap_or_else(|| Arc::new(SystemMemory::new())),
            func: Arc::new(func),
        })
    }
}

/// Arguments that passed admission, ready for the wrapped function
#[derive(Clone, Debug)]
pub struct PreparedCall {
    args: CallArgs,
    flags: MemoryBudgetFlags,
    required_mb: u64,
}

impl PreparedCall {
    /// Cleaned, converted arguments
    pub fn args(&self) -> &CallArgs {
        &self.args
    }

    /// Resolved memory flags
    pub fn flags(&self) -> &MemoryBudgetFlags {
        &self.flags
    }

    /// Projected megabytes for conversions plus the operation
    pub fn required_mb(&self) -> u64 {
        self.required_mb
    }

    /// Take the arguments
    pub fn into_args(self) -> CallArgs {
        self.args
    }
}

/// A numerical function behind admission control
#[derive(Clone)]
pub struct CallGuard {
    signature: Signature,
    memory_check: MemoryCheck,
    require_square: bool,
    config: GuardConfig,
    probe: Arc<dyn MemoryProbe>,
    func: Arc<GuardedFn>,
}

impl CallGuard {
    /// Start building a guard for `name(params...)`
    pub fn builder<S: AsRef<str>>(name: &str, params: &[S]) -> CallGuardBuilder {
        CallGuardBuilder {
            signature: Signature::new(name, params),
            memcheck: MemCheckSpec::None,
            require_square: false,
            config: GuardConfig::default(),
            probe: None,
        }
    }

    /// Declared signature of the wrapped function
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Configuration this guard was built with
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Run admission control and call the wrapped function
    ///
    /// A memory failure reported by the wrapped function comes back as
    /// [`Error::MemoryExhausted`].
    pub fn invoke(&self, args: CallArgs) -> Result<Value> {
        let prepared = self.prepare(args)?;
        match (self.func)(prepared.args) {
            Err(err) if err.is_memory_error() => {
                log::debug!("{} ran out of memory: {err}", self.signature.name());
                Err(Error::MemoryExhausted)
            }
            other => other,
        }
    }

    /// Run every admission step without calling the wrapped function
    pub fn prepare(&self, args: CallArgs) -> Result<PreparedCall> {
        let nparams = self.signature.len();
        let (positional, mut keyword) = args.into_parts();

        if positional.is_empty() {
            return Err(Error::arity("Function needs >= 1 function arguments"));
        }
        if positional.len() + keyword.len() > nparams {
            return Err(Error::arity(format!(
                "{} has too many inputs. Only {nparams} are accepted",
                self.signature
            )));
        }

        let mut positional = positional.into_iter();
        let primary = match positional.next().map(normalize) {
            Some(Value::Array(a)) => a,
            other => {
                return Err(Error::type_error(format!(
                    "First argument is not a 2D array, got {}",
                    other.as_ref().map_or("nothing", Value::kind)
                )))
            }
        };

        for (key, _) in &keyword {
            match self.signature.position(key) {
                None => return Err(Error::name_error(key.as_str(), &self.signature)),
                Some(pos) if pos < positional.len() + 1 => {
                    return Err(Error::DuplicateArgument { key: key.clone() })
                }
                Some(_) => {}
            }
        }
        for (_, value) in keyword.iter_mut() {
            *value = normalize(std::mem::replace(value, Value::None));
        }

        // Boolean positionals are shorthand for the flag of the same position
        let mut rest = Vec::with_capacity(positional.len());
        let mut occupied = vec![0];
        for (index, value) in positional.enumerate().map(|(i, v)| (i + 1, v)) {
            match value {
                Value::Bool(b) => {
                    let name = &self.signature.params()[index];
                    keyword.push((name.clone(), Value::Bool(b)));
                }
                other => {
                    occupied.push(index);
                    rest.push(normalize(other));
                }
            }
        }

        let mut args = CallArgs::from_parts(Vec::new(), keyword);
        let flags = self.memory_check.resolve(self.primary_key(), &args);
        for (key, value) in flags.forwarded() {
            // A flag parameter already holding caller data keeps it
            let taken = self
                .signature
                .position(key)
                .is_some_and(|pos| occupied.contains(&pos))
                || args.keyword(key).is_some_and(|v| !v.is_bool());
            if !taken {
                args.set_keyword(key, Value::Bool(value));
            }
        }
        let (_, mut keyword) = args.into_parts();

        let mut positional = Vec::with_capacity(rest.len() + 1);
        positional.push(Value::Array(primary));
        positional.extend(rest);

        let max_float = self.config.max_float();
        let square = self.require_square;
        let positional_specs = positional
            .iter()
            .map(|v| classify(v, square, max_float))
            .collect::<Result<Vec<_>>>()?;
        let keyword_specs = keyword
            .iter()
            .map(|(_, v)| classify(v, square, max_float))
            .collect::<Result<Vec<_>>>()?;

        let conversion_mb: u64 = positional_specs
            .iter()
            .chain(&keyword_specs)
            .fold(0, |total, s| total.saturating_add(s.memory_cost_mb));
        let operation_mb = self.operation_cost(&positional[0], &positional_specs[0], &flags);
        let required_mb = conversion_mb.saturating_add(operation_mb);
        log::debug!(
            "{}: {} MB for conversions, {} MB for '{}' ({:?})",
            self.signature.name(),
            conversion_mb,
            operation_mb,
            flags.selected(),
            flags.pattern()
        );

        if required_mb > 0 {
            self.admit(required_mb)?;
        }

        for (value, spec) in positional.iter_mut().zip(&positional_specs) {
            convert(value, spec)?;
        }
        for ((_, value), spec) in keyword.iter_mut().zip(&keyword_specs) {
            convert(value, spec)?;
        }

        Ok(PreparedCall {
            args: CallArgs::from_parts(positional, keyword),
            flags,
            required_mb,
        })
    }

    fn primary_key(&self) -> &str {
        // build() refuses empty signatures
        self.signature.primary().unwrap_or_default()
    }

    /// Megabytes for running the operation on the (converted) primary input
    fn operation_cost(&self, primary: &Value, spec: &ArgSpec, flags: &MemoryBudgetFlags) -> u64 {
        let Value::Array(array) = primary else {
            return 0;
        };
        let dtype = spec.target_dtype.unwrap_or_else(|| array.dtype());
        estimate(flags.pattern(), array.shape(), dtype.size_in_bytes())
    }

    fn admit(&self, required_mb: u64) -> Result<()> {
        let available_bytes = self.probe.available_bytes();
        let budget_mb = self.config.budget_mb(available_bytes);
        if required_mb > budget_mb {
            log::warn!(
                "{} refused: requires {} MB, budget is {} MB",
                self.signature.name(),
                required_mb,
                budget_mb
            );
            return Err(Error::out_of_memory(required_mb, budget_mb));
        }
        log::debug!(
            "{} admitted: {} MB of {} MB budget",
            self.signature.name(),
            required_mb,
            budget_mb
        );
        Ok(())
    }
}

impl fmt::Debug for CallGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallGuard")
            .field("signature", &self.signature)
            .field("memory_check", &self.memory_check)
            .field("require_square", &self.require_square)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Materialise matrix-like containers as plain arrays
fn normalize(value: Value) -> Value {
    match value {
        Value::Matrix(m) => Value::Array(m.into_array()),
        other => other,
    }
}

fn convert(value: &mut Value, spec: &ArgSpec) -> Result<()> {
    let Some(target) = spec.target_dtype else {
        return Ok(());
    };
    if let Value::Array(array) = value {
        *array = array.astype(target)?;
    }
    Ok(())
}
