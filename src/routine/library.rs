//! Routine tables
//!
//! A [`RoutineLibrary`] maps `(base name, precision)` to a callable for
//! each family (LAPACK and BLAS), plus a table of precision-agnostic fast
//! paths. Resolvers look routines up here; nothing is registered lazily.

use super::kernels::{blas, lapack};
use super::precision::Precision;
use crate::dtype::{Complex128, Complex64};
use crate::error::Result;
use crate::value::{CallArgs, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A callable routine
pub type Routine = Arc<dyn Fn(CallArgs) -> Result<Value> + Send + Sync>;

/// Routines of one family, keyed by base name and precision
#[derive(Clone, Default)]
pub struct RoutineTable {
    routines: HashMap<(String, Precision), Routine>,
}

impl RoutineTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `routine` as the `precision` variant of `base`, replacing any previous one
    pub fn register<F>(&mut self, base: &str, precision: Precision, routine: F)
    where
        F: Fn(CallArgs) -> Result<Value> + Send + Sync + 'static,
    {
        self.routines
            .insert((base.to_owned(), precision), Arc::new(routine));
    }

    /// The `precision` variant of `base`
    pub fn get(&self, base: &str, precision: Precision) -> Option<Routine> {
        self.routines.get(&(base.to_owned(), precision)).cloned()
    }

    /// Whether any variant of `base` is registered
    pub fn contains(&self, base: &str) -> bool {
        self.routines.keys().any(|(name, _)| name == base)
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl fmt::Debug for RoutineTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .routines
            .keys()
            .map(|(base, precision)| precision.routine_name(base))
            .collect();
        names.sort();
        f.debug_list().entries(names).finish()
    }
}

/// Everything a resolver can bind to
#[derive(Clone, Default)]
pub struct RoutineLibrary {
    lapack: RoutineTable,
    blas: RoutineTable,
    fast_paths: HashMap<String, Routine>,
}

impl fmt::Debug for RoutineLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fast_paths: Vec<&str> = self.fast_paths.keys().map(String::as_str).collect();
        fast_paths.sort_unstable();
        f.debug_struct("RoutineLibrary")
            .field("lapack", &self.lapack)
            .field("blas", &self.blas)
            .field("fast_paths", &fast_paths)
            .finish()
    }
}

macro_rules! register_all_precisions {
    ($table:expr, $name:literal, $module:ident::$kernel:ident) => {
        $table.register($name, Precision::Single, $module::$kernel::<f32>);
        $table.register($name, Precision::Double, $module::$kernel::<f64>);
        $table.register($name, Precision::ComplexSingle, $module::$kernel::<Complex64>);
        $table.register($name, Precision::ComplexDouble, $module::$kernel::<Complex128>);
    };
}

impl RoutineLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the portable kernels registered
    ///
    /// - LAPACK: `getrf`, `potrf`
    /// - BLAS: `dot`, `axpy`, `scal`
    /// - fast paths: `lu`
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        register_all_precisions!(lib.lapack, "getrf", lapack::getrf);
        register_all_precisions!(lib.lapack, "potrf", lapack::potrf);
        register_all_precisions!(lib.blas, "dot", blas::dot);
        register_all_precisions!(lib.blas, "axpy", blas::axpy);
        register_all_precisions!(lib.blas, "scal", blas::scal);
        lib.register_fast_path("lu", lapack::lu);
        lib
    }

    /// LAPACK routines
    pub fn lapack(&self) -> &RoutineTable {
        &self.lapack
    }

    /// LAPACK routines, for registration
    pub fn lapack_mut(&mut self) -> &mut RoutineTable {
        &mut self.lapack
    }

    /// BLAS routines
    pub fn blas(&self) -> &RoutineTable {
        &self.blas
    }

    /// BLAS routines, for registration
    pub fn blas_mut(&mut self) -> &mut RoutineTable {
        &mut self.blas
    }

    /// Register a precision-agnostic implementation under `name`
    pub fn register_fast_path<F>(&mut self, name: &str, routine: F)
    where
        F: Fn(CallArgs) -> Result<Value> + Send + Sync + 'static,
    {
        self.fast_paths.insert(name.to_owned(), Arc::new(routine));
    }

    /// Fast path registered under `name`
    pub fn fast_path(&self, name: &str) -> Option<Routine> {
        self.fast_paths.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contents() {
        let lib = RoutineLibrary::builtin();
        assert_eq!(lib.lapack().len(), 8);
        assert_eq!(lib.blas().len(), 12);
        for p in Precision::ALL {
            assert!(lib.lapack().get("getrf", p).is_some());
            assert!(lib.blas().get("axpy", p).is_some());
        }
        assert!(lib.lapack().contains("potrf"));
        assert!(!lib.lapack().contains("gesdd"));
        assert!(lib.fast_path("lu").is_some());
        assert!(lib.fast_path("qr").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut table = RoutineTable::new();
        table.register("noop", Precision::Double, |_| Ok(Value::Int(1)));
        table.register("noop", Precision::Double, |_| Ok(Value::Int(2)));
        assert_eq!(table.len(), 1);
        let f = table.get("noop", Precision::Double).unwrap();
        assert_eq!(f(CallArgs::new()).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_debug_lists_names() {
        let mut table = RoutineTable::new();
        table.register("dot", Precision::Single, blas::dot::<f32>);
        table.register("dot", Precision::ComplexDouble, blas::dot::<Complex128>);
        assert_eq!(format!("{table:?}"), r#"["sdot", "zdot"]"#);
    }

    #[test]
    fn test_library_debug_lists_tables_and_fast_paths() {
        let mut lib = RoutineLibrary::new();
        lib.blas_mut().register("dot", Precision::Double, blas::dot::<f64>);
        lib.register_fast_path("qr", lapack::lu);
        lib.register_fast_path("lu", lapack::lu);
        assert_eq!(
            format!("{lib:?}"),
            r#"RoutineLibrary { lapack: [], blas: ["ddot"], fast_paths: ["lu", "qr"] }"#
        );
    }
}
