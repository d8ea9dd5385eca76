//! Lazy, memoized binding of routine names to precision variants

use super::library::{Routine, RoutineLibrary, RoutineTable};
use super::precision::Precision;
use crate::error::{Error, Result};
use crate::value::{CallArgs, Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Which routine table a resolver draws from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Family {
    Lapack,
    Blas,
}

/// A routine a resolver has bound to
#[derive(Clone)]
pub struct ResolvedRoutine {
    name: String,
    precision: Option<Precision>,
    handle: Routine,
}

impl ResolvedRoutine {
    /// Full name of the bound routine, e.g. `sgetrf`, or the fast path's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Precision variant, `None` for a fast path
    pub fn precision(&self) -> Option<Precision> {
        self.precision
    }

    /// Whether this is a precision-agnostic fast path
    pub fn is_fast_path(&self) -> bool {
        self.precision.is_none()
    }
}

impl fmt::Debug for ResolvedRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRoutine")
            .field("name", &self.name)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

/// Dispatches calls to one logical routine across its precision variants
///
/// The variant is chosen from the dtype of the first argument on the
/// **first** call and then reused for every later call, whatever its dtype.
/// Kernels cast their inputs to their own precision, so a resolver first
/// bound for f32 keeps computing in f32 when later handed f64 data. Use one
/// resolver per call site with homogeneous dtypes.
pub struct RoutineResolver {
    family: Family,
    name: String,
    library: Arc<RoutineLibrary>,
    fast_path: Option<(String, Routine)>,
    turbo: bool,
    memo: RwLock<Option<ResolvedRoutine>>,
}

impl RoutineResolver {
    /// Resolver for the LAPACK routine `name`
    ///
    /// `fast_path` names a precision-agnostic replacement. If the library
    /// has it, it is used for every call; otherwise it is ignored. `turbo`
    /// allows single precision for f32 input, which otherwise runs in
    /// double.
    pub fn lapack(
        library: Arc<RoutineLibrary>,
        name: &str,
        fast_path: Option<&str>,
        turbo: bool,
    ) -> Self {
        let fast_path = fast_path.and_then(|fast| match library.fast_path(fast) {
            Some(routine) => Some((fast.to_owned(), routine)),
            None => {
                log::warn!("fast path '{fast}' for {name} is not registered, ignoring it");
                None
            }
        });
        Self {
            family: Family::Lapack,
            name: name.to_owned(),
            library,
            fast_path,
            turbo,
            memo: RwLock::new(None),
        }
    }

    /// Resolver for the BLAS routine `name`
    pub fn blas(library: Arc<RoutineLibrary>, name: &str) -> Self {
        Self {
            family: Family::Blas,
            name: name.to_owned(),
            library,
            fast_path: None,
            turbo: false,
            memo: RwLock::new(None),
        }
    }

    /// Base routine name, without precision prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether single precision is allowed for f32 input
    pub fn turbo(&self) -> bool {
        self.turbo
    }

    /// Whether a routine has been bound
    pub fn is_cached(&self) -> bool {
        self.memo.read().is_some()
    }

    /// The bound routine, if any call has happened yet
    pub fn resolved(&self) -> Option<ResolvedRoutine> {
        self.memo.read().clone()
    }

    /// Call the routine, binding it first if needed
    ///
    /// # Errors
    ///
    /// - `Arity` if the first call has no argument to take a dtype from
    /// - `RoutineNotFound` if the library lacks the selected variant
    /// - whatever the routine itself returns
    pub fn call(&self, args: CallArgs) -> Result<Value> {
        let handle = self.bind(&args)?;
        handle(args)
    }

    fn bind(&self, args: &CallArgs) -> Result<Routine> {
        if let Some(handle) = self.memo.read().as_ref().map(|r| r.handle.clone()) {
            return Ok(handle);
        }

        let resolved = self.resolve(args)?;
        let mut memo = self.memo.write();
        // A concurrent first call may have bound already; keep its choice
        let bound = memo.get_or_insert(resolved);
        Ok(bound.handle.clone())
    }

    fn resolve(&self, args: &CallArgs) -> Result<ResolvedRoutine> {
        if let Some((name, handle)) = &self.fast_path {
            log::debug!("{}: bound to fast path {name}", self.name);
            return Ok(ResolvedRoutine {
                name: name.clone(),
                precision: None,
                handle: handle.clone(),
            });
        }

        let dtype = args
            .first()
            .ok_or_else(|| Error::arity(format!("{} needs >= 1 argument", self.name)))?
            .dtype();
        let precision = match self.family {
            Family::Lapack => Precision::for_lapack(dtype, self.turbo),
            Family::Blas => Precision::for_blas(dtype),
        };
        let full_name = precision.routine_name(&self.name);
        let handle = self
            .table()
            .get(&self.name, precision)
            .ok_or_else(|| Error::RoutineNotFound {
                name: full_name.clone(),
            })?;

        log::debug!(
            "{}: bound to {full_name} for dtype {}",
            self.name,
            dtype.map_or_else(|| "unknown".to_owned(), |d| d.to_string())
        );
        Ok(ResolvedRoutine {
            name: full_name,
            precision: Some(precision),
            handle,
        })
    }

    fn table(&self) -> &RoutineTable {
        match self.family {
            Family::Lapack => self.library.lapack(),
            Family::Blas => self.library.blas(),
        }
    }
}

impl fmt::Debug for RoutineResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutineResolver")
            .field("family", &self.family)
            .field("name", &self.name)
            .field("fast_path", &self.fast_path.as_ref().map(|(n, _)| n))
            .field("turbo", &self.turbo)
            .field("resolved", &*self.memo.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;
    use crate::dtype::Complex64;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Library whose routines record their own name when called
    fn recording_library() -> (Arc<RoutineLibrary>, Log) {
        let log: Log = Arc::default();
        let mut lib = RoutineLibrary::new();
        for base in ["getrf", "potrf"] {
            for p in Precision::ALL {
                let log = log.clone();
                let name = p.routine_name(base);
                lib.lapack_mut().register(base, p, move |_| {
                    log.lock().push(name.clone());
                    Ok(Value::None)
                });
            }
        }
        for p in Precision::ALL {
            let log = log.clone();
            let name = p.routine_name("dot");
            lib.blas_mut().register("dot", p, move |_| {
                log.lock().push(name.clone());
                Ok(Value::None)
            });
        }
        let fast_log = log.clone();
        lib.register_fast_path("lu", move |_| {
            fast_log.lock().push("lu".to_owned());
            Ok(Value::None)
        });
        (Arc::new(lib), log)
    }

    fn array_of<T: crate::dtype::Element>(v: T) -> CallArgs {
        CallArgs::new().arg(Array::from_vec(vec![v; 4], [2, 2]).unwrap())
    }

    #[test]
    fn test_first_dtype_wins() {
        let (lib, log) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
        assert!(!getrf.is_cached());

        getrf.call(array_of(1.0f32)).unwrap();
        // Later f64 input still goes to the single-precision variant
        getrf.call(array_of(1.0f64)).unwrap();

        assert_eq!(*log.lock(), vec!["sgetrf", "sgetrf"]);
        let bound = getrf.resolved().unwrap();
        assert_eq!(bound.name(), "sgetrf");
        assert_eq!(bound.precision(), Some(Precision::Single));
    }

    #[test]
    fn test_without_turbo_f32_runs_in_double() {
        let (lib, log) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", None, false);
        getrf.call(array_of(1.0f32)).unwrap();
        assert_eq!(*log.lock(), vec!["dgetrf"]);
    }

    #[test]
    fn test_precision_per_dtype() {
        let cases: Vec<(CallArgs, &str)> = vec![
            (array_of(1.0f64), "dgetrf"),
            (array_of(Complex64::ONE), "cgetrf"),
            (array_of(1i64), "zgetrf"),
            (CallArgs::new().kwarg("a", "text"), "zgetrf"),
        ];
        for (args, expected) in cases {
            let (lib, log) = recording_library();
            RoutineResolver::lapack(lib, "getrf", None, true)
                .call(args)
                .unwrap();
            assert_eq!(*log.lock(), vec![expected]);
        }
    }

    #[test]
    fn test_blas_has_no_turbo() {
        let (lib, log) = recording_library();
        let dot = RoutineResolver::blas(lib, "dot");
        assert!(!dot.turbo());
        dot.call(array_of(1.0f32)).unwrap();
        assert_eq!(*log.lock(), vec!["sdot"]);
    }

    #[test]
    fn test_fast_path_used_unconditionally() {
        let (lib, log) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", Some("lu"), true);
        getrf.call(array_of(1.0f32)).unwrap();
        getrf.call(array_of(Complex64::ONE)).unwrap();
        assert_eq!(*log.lock(), vec!["lu", "lu"]);
        assert!(getrf.resolved().unwrap().is_fast_path());
    }

    #[test]
    fn test_unknown_fast_path_ignored() {
        let (lib, log) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", Some("numba_lu"), true);
        getrf.call(array_of(1.0f64)).unwrap();
        assert_eq!(*log.lock(), vec!["dgetrf"]);
    }

    #[test]
    fn test_missing_routine_is_not_cached() {
        let (lib, _) = recording_library();
        let gesdd = RoutineResolver::lapack(lib, "gesdd", None, true);
        let err = gesdd.call(array_of(1.0f64)).unwrap_err();
        assert!(matches!(err, Error::RoutineNotFound { ref name } if name == "dgesdd"));
        assert!(!gesdd.is_cached());
    }

    #[test]
    fn test_no_arguments() {
        let (lib, _) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
        assert!(matches!(getrf.call(CallArgs::new()), Err(Error::Arity { .. })));
    }

    #[test]
    fn test_concurrent_first_calls_agree() {
        let (lib, log) = recording_library();
        let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
        std::thread::scope(|s| {
            for i in 0..8 {
                let getrf = &getrf;
                s.spawn(move || {
                    let args = if i % 2 == 0 {
                        array_of(1.0f32)
                    } else {
                        array_of(1.0f64)
                    };
                    getrf.call(args).unwrap();
                });
            }
        });
        let bound = getrf.resolved().unwrap();
        let calls = log.lock();
        assert_eq!(calls.len(), 8);
        // Every call, racing first calls included, used the binding that stuck
        assert!(calls.iter().all(|n| n == bound.name()));
    }

    #[test]
    fn test_builtin_getrf() {
        let lib = Arc::new(RoutineLibrary::builtin());
        let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
        let a = Array::from_vec(vec![4.0f64, 3.0, 6.0, 3.0], [2, 2]).unwrap();
        match getrf.call(CallArgs::new().arg(a)).unwrap() {
            Value::Tuple(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[2], Value::Int(0));
            }
            other => panic!("expected tuple, got {other}"),
        }
    }
}
