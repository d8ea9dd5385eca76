//! LAPACK-style factorizations
//!
//! All matrices are row-major. Pivot indices are 0-based and `info`
//! follows LAPACK: `0` on success, `k > 0` when the k-th (1-based) pivot
//! or leading minor is the problem.

use super::{flag_arg, matrix_arg, LinalgScalar};
use crate::array::Array;
use crate::dtype::{Complex128, Complex64, DType};
use crate::error::{Error, Result};
use crate::value::{CallArgs, Value};

/// LU factorization with partial pivoting: `P * A = L * U`
///
/// Arguments: `a` (m x n). Returns `(lu, piv, info)` where `lu` holds the
/// unit-lower `L` below the diagonal and `U` on and above it.
pub fn getrf<T: LinalgScalar>(args: CallArgs) -> Result<Value> {
    let (mut a, m, n) = matrix_arg::<T>(&args, 0, "a")?;
    let (piv, info) = lu_in_place(&mut a, m, n);
    let k = piv.len();
    Ok(Value::Tuple(vec![
        Value::Array(Array::from_vec(a, [m, n])?),
        Value::Array(Array::from_vec(piv, [k])?),
        Value::Int(info),
    ]))
}

/// Doolittle LU with partial pivoting, in place
///
/// A zero pivot column is recorded in `info` and skipped; the remaining
/// columns are still factored.
pub(crate) fn lu_in_place<T: LinalgScalar>(a: &mut [T], m: usize, n: usize) -> (Vec<i64>, i64) {
    let k = m.min(n);
    let mut piv = vec![0i64; k];
    let mut info = 0i64;

    for col in 0..k {
        // Find pivot: max magnitude in column col, rows col..m
        let mut pivot_row = col;
        let mut max_val = a[col * n + col].abs_val();
        for row in (col + 1)..m {
            let val = a[row * n + col].abs_val();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }
        piv[col] = pivot_row as i64;

        if max_val == 0.0 {
            if info == 0 {
                info = col as i64 + 1;
            }
            continue;
        }

        if pivot_row != col {
            for j in 0..n {
                a.swap(col * n + j, pivot_row * n + j);
            }
        }

        let pivot = a[col * n + col];
        for row in (col + 1)..m {
            let factor = a[row * n + col] / pivot;
            a[row * n + col] = factor;
            for j in (col + 1)..n {
                let u = a[col * n + j];
                a[row * n + j] = a[row * n + j] - factor * u;
            }
        }
    }

    (piv, info)
}

/// Cholesky factorization of a Hermitian positive-definite matrix
///
/// Arguments: `a` (n x n), keyword `lower` (default false). Returns
/// `(c, info)` with `c` upper (`A = Cᴴ C`) or lower (`A = C Cᴴ`) and the
/// other triangle zeroed.
pub fn potrf<T: LinalgScalar>(args: CallArgs) -> Result<Value> {
    let (a, m, n) = matrix_arg::<T>(&args, 0, "a")?;
    if m != n {
        return Err(Error::shape_mismatch(&[m, m], &[m, n]));
    }
    let lower = flag_arg(&args, "lower", false);

    let mut l = vec![T::zero(); n * n];
    let mut info = 0i64;
    for j in 0..n {
        let mut d = a[j * n + j];
        for k in 0..j {
            d = d - l[j * n + k] * l[j * n + k].conj_val();
        }
        let re = d.real_part();
        if re <= 0.0 || re.is_nan() {
            info = j as i64 + 1;
            break;
        }
        let djj = d.sqrt_val();
        l[j * n + j] = djj;
        for i in (j + 1)..n {
            let mut s = a[i * n + j];
            for k in 0..j {
                s = s - l[i * n + k] * l[j * n + k].conj_val();
            }
            l[i * n + j] = s / djj;
        }
    }

    let c = if lower {
        l
    } else {
        let mut u = vec![T::zero(); n * n];
        for i in 0..n {
            for j in i..n {
                u[i * n + j] = l[j * n + i].conj_val();
            }
        }
        u
    };

    Ok(Value::Tuple(vec![
        Value::Array(Array::from_vec(c, [n, n])?),
        Value::Int(info),
    ]))
}

/// Dtype-agnostic LU
///
/// Picks the computing precision from the input itself, so it can stand in
/// for every `?getrf` variant at once.
pub fn lu(args: CallArgs) -> Result<Value> {
    match args.lookup(0, "a").and_then(Value::dtype) {
        Some(DType::F32) => getrf::<f32>(args),
        Some(DType::Complex64) => getrf::<Complex64>(args),
        Some(DType::Complex128) => getrf::<Complex128>(args),
        _ => getrf::<f64>(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack(value: Value) -> Vec<Value> {
        match value {
            Value::Tuple(items) => items,
            other => panic!("expected tuple, got {other}"),
        }
    }

    #[test]
    fn test_getrf_reconstructs() {
        let a = Array::from_vec(vec![2.0f64, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0], [3, 3]).unwrap();
        let out = unpack(getrf::<f64>(CallArgs::new().arg(a.clone())).unwrap());
        let lu = out[0].as_array().unwrap().to_vec::<f64>().unwrap();
        let piv = out[1].as_array().unwrap().to_vec::<i64>().unwrap();
        assert_eq!(out[2], Value::Int(0));

        // Apply the row swaps to A, then compare with L * U
        let mut pa = a.to_vec::<f64>().unwrap();
        for (i, &p) in piv.iter().enumerate() {
            for j in 0..3 {
                pa.swap(i * 3 + j, p as usize * 3 + j);
            }
        }
        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    let l = if i == k { 1.0 } else if k < i { lu[i * 3 + k] } else { 0.0 };
                    let u = if k <= j { lu[k * 3 + j] } else { 0.0 };
                    sum += l * u;
                }
                assert!((sum - pa[i * 3 + j]).abs() < 1e-12, "[{i},{j}]");
            }
        }
    }

    #[test]
    fn test_getrf_singular_info() {
        let a = Array::from_vec(vec![0.0f32, 0.0, 0.0, 1.0], [2, 2]).unwrap();
        let out = unpack(getrf::<f32>(CallArgs::new().arg(a)).unwrap());
        assert_eq!(out[2], Value::Int(1));
    }

    #[test]
    fn test_getrf_casts_input() {
        let a = Array::from_vec(vec![4.0f64, 3.0, 6.0, 3.0], [2, 2]).unwrap();
        let out = unpack(getrf::<f32>(CallArgs::new().arg(a)).unwrap());
        assert_eq!(out[0].as_array().unwrap().dtype(), DType::F32);
    }

    #[test]
    fn test_potrf_upper_and_lower() {
        let a = Array::from_vec(vec![4.0f64, 2.0, 2.0, 3.0], [2, 2]).unwrap();
        let upper = unpack(potrf::<f64>(CallArgs::new().arg(a.clone())).unwrap());
        let u = upper[0].as_array().unwrap().to_vec::<f64>().unwrap();
        assert_eq!(upper[1], Value::Int(0));
        assert!((u[0] - 2.0).abs() < 1e-12);
        assert!((u[1] - 1.0).abs() < 1e-12);
        assert_eq!(u[2], 0.0);
        assert!((u[3] - 2f64.sqrt()).abs() < 1e-12);

        let lower = unpack(potrf::<f64>(CallArgs::new().arg(a).kwarg("lower", true)).unwrap());
        let l = lower[0].as_array().unwrap().to_vec::<f64>().unwrap();
        assert!((l[2] - 1.0).abs() < 1e-12);
        assert_eq!(l[1], 0.0);
    }

    #[test]
    fn test_potrf_not_positive_definite() {
        let a = Array::from_vec(vec![1.0f64, 2.0, 2.0, 1.0], [2, 2]).unwrap();
        let out = unpack(potrf::<f64>(CallArgs::new().arg(a)).unwrap());
        assert_eq!(out[1], Value::Int(2));
    }

    #[test]
    fn test_potrf_hermitian() {
        // [[2, i], [-i, 2]] = C^H C
        let a = Array::from_vec(
            vec![
                Complex128::new(2.0, 0.0),
                Complex128::new(0.0, 1.0),
                Complex128::new(0.0, -1.0),
                Complex128::new(2.0, 0.0),
            ],
            [2, 2],
        )
        .unwrap();
        let out = unpack(potrf::<Complex128>(CallArgs::new().arg(a)).unwrap());
        assert_eq!(out[1], Value::Int(0));
        let c = out[0].as_array().unwrap().to_vec::<Complex128>().unwrap();
        // (C^H C)[0][1] = conj(c00) * c01
        let entry = c[0].conj() * c[1];
        assert!((entry.re - 0.0).abs() < 1e-12 && (entry.im - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lu_follows_input_dtype() {
        let a = Array::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        let out = unpack(lu(CallArgs::new().arg(a)).unwrap());
        assert_eq!(out[0].as_array().unwrap().dtype(), DType::F32);

        let ints = Array::from_vec(vec![1i32, 2, 3, 4], [2, 2]).unwrap();
        let out = unpack(lu(CallArgs::new().arg(ints)).unwrap());
        assert_eq!(out[0].as_array().unwrap().dtype(), DType::F64);
    }
}
