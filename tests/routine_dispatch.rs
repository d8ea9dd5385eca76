//! Guarded functions dispatching through `RoutineResolver`

mod common;

use common::{assert_allclose_f64, filled, init_logging};
use numguard::prelude::*;

fn unpack(value: Value) -> Vec<Value> {
    match value {
        Value::Tuple(items) => items,
        other => panic!("expected tuple, got {other}"),
    }
}

#[test]
fn test_guarded_lu_promotes_then_factors() {
    init_logging();
    let lib = Arc::new(RoutineLibrary::builtin());
    let getrf = RoutineResolver::lapack(lib, "getrf", None, true);
    let lu = CallGuard::builder("lu", &["a"])
        .memcheck("full")
        .square(true)
        .probe(FixedMemory::from_mb(1024))
        .build(move |args| getrf.call(args))
        .unwrap();

    let a = Array::from_vec(vec![2i64, 1, 4, 3], [2, 2]).unwrap();
    let out = unpack(lu.invoke(CallArgs::new().arg(a)).unwrap());
    let factors = out[0].as_array().unwrap();
    assert_eq!(factors.dtype(), DType::F64);
    // Pivot on 4: L = [[1, 0], [0.5, 1]], U = [[4, 3], [0, -0.5]]
    assert_allclose_f64(
        &factors.to_vec::<f64>().unwrap(),
        &[4.0, 3.0, 0.5, -0.5],
        1e-12,
        1e-12,
        "lu",
    );
    assert_eq!(out[1].as_array().unwrap().to_vec::<i64>().unwrap(), vec![1, 1]);
    assert_eq!(out[2], Value::Int(0));
}

#[test]
fn test_first_binding_sticks_across_dtypes() {
    let lib = Arc::new(RoutineLibrary::builtin());
    let getrf = RoutineResolver::lapack(lib, "getrf", None, true);

    let single = unpack(getrf.call(CallArgs::new().arg(filled(2.0f32, 2, 2))).unwrap());
    assert_eq!(single[0].as_array().unwrap().dtype(), DType::F32);
    assert_eq!(getrf.resolved().unwrap().name(), "sgetrf");

    // f64 input is still handled by sgetrf and comes back in f32
    let stale = unpack(getrf.call(CallArgs::new().arg(filled(2.0f64, 2, 2))).unwrap());
    assert_eq!(stale[0].as_array().unwrap().dtype(), DType::F32);
    assert_eq!(getrf.resolved().unwrap().precision(), Some(Precision::Single));
}

#[test]
fn test_flag_shorthand_reaches_kernel() {
    let lib = Arc::new(RoutineLibrary::builtin());
    let potrf = RoutineResolver::lapack(lib, "potrf", None, false);
    let cholesky = CallGuard::builder("cholesky", &["a", "lower"])
        .memcheck("same")
        .square(true)
        .probe(FixedMemory::from_mb(1024))
        .build(move |args| potrf.call(args))
        .unwrap();

    let a = Array::from_vec(vec![4.0f64, 2.0, 2.0, 3.0], [2, 2]).unwrap();
    let out = unpack(cholesky.invoke(CallArgs::new().arg(a)).unwrap());
    assert_eq!(out[1], Value::Int(0));
    let upper = out[0].as_array().unwrap().to_vec::<f64>().unwrap();
    assert_eq!(upper[2], 0.0);
    assert_allclose_f64(&upper[..2], &[2.0, 1.0], 1e-12, 0.0, "upper");

    let a = Array::from_vec(vec![4.0f64, 2.0, 2.0, 3.0], [2, 2]).unwrap();
    let out = unpack(cholesky.invoke(CallArgs::new().arg(a).arg(true)).unwrap());
    let lower = out[0].as_array().unwrap().to_vec::<f64>().unwrap();
    assert_eq!(lower[1], 0.0);
    assert_allclose_f64(&[lower[0], lower[2]], &[2.0, 1.0], 1e-12, 0.0, "lower");
}

#[test]
fn test_fast_path_replaces_variants() {
    let lib = Arc::new(RoutineLibrary::builtin());
    let getrf = RoutineResolver::lapack(lib, "getrf", Some("lu"), false);

    // The fast path follows each input's dtype instead of the first one
    let single = unpack(getrf.call(CallArgs::new().arg(filled(2.0f32, 2, 2))).unwrap());
    assert_eq!(single[0].as_array().unwrap().dtype(), DType::F32);
    let double = unpack(getrf.call(CallArgs::new().arg(filled(2.0f64, 2, 2))).unwrap());
    assert_eq!(double[0].as_array().unwrap().dtype(), DType::F64);
    assert_eq!(getrf.resolved().unwrap().name(), "lu");
}

#[test]
fn test_blas_dispatch() {
    let lib = Arc::new(RoutineLibrary::builtin());
    let dot = RoutineResolver::blas(lib.clone(), "dot");
    let x = Array::from_vec(vec![1.0f64, 2.0, 3.0], [3]).unwrap();
    let out = dot.call(CallArgs::new().arg(x.clone()).arg(x.clone())).unwrap();
    assert_eq!(out, Value::Float(14.0));
    assert_eq!(dot.resolved().unwrap().name(), "ddot");

    let axpy = RoutineResolver::blas(lib, "axpy");
    let y = Array::from_vec(vec![1.0f64, 1.0, 1.0], [3]).unwrap();
    let out = axpy
        .call(CallArgs::new().arg(x).arg(y).kwarg("a", -1.0))
        .unwrap()
        .into_array()
        .unwrap();
    assert_eq!(out.to_vec::<f64>().unwrap(), vec![0.0, -1.0, -2.0]);
}

#[test]
fn test_unknown_routine() {
    let lib = Arc::new(RoutineLibrary::builtin());
    let gesdd = RoutineResolver::lapack(lib, "gesdd", None, true);
    let err = gesdd
        .call(CallArgs::new().arg(filled(1.0f32, 2, 2)))
        .unwrap_err();
    assert!(matches!(err, Error::RoutineNotFound { ref name } if name == "sgesdd"));
}
