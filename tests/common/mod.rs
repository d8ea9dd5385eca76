//! Common test utilities
#![allow(dead_code)]

use half::f16;
use numguard::prelude::*;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `rows x cols` array filled with `value`
pub fn filled<T: Element>(value: T, rows: usize, cols: usize) -> Array {
    Array::from_vec(vec![value; rows * cols], [rows, cols]).unwrap()
}

/// `rows x cols` half-precision array of ones
pub fn f16_ones(rows: usize, cols: usize) -> Array {
    filled(f16::ONE, rows, cols)
}

/// Guard whose wrapped function echoes its (prepared) arguments back
///
/// Positional arguments come back as a tuple; keywords are dropped, use
/// `CallGuard::prepare` to inspect those.
pub fn echo_guard(name: &str, params: &[&str]) -> CallGuardBuilder {
    CallGuard::builder(name, params).probe(FixedMemory::from_mb(1 << 20))
}

/// Body for [`echo_guard`]
pub fn echo(args: CallArgs) -> Result<Value> {
    Ok(Value::Tuple(args.positional().to_vec()))
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
