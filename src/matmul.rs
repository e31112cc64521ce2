//! Small GEMM wrapper used by the batched forward pass.
//!
//! This module provides a single abstraction over matrix multiplication:
//! - default: `dgemm` from the `matrixmultiply` crate
//! - fallback (feature disabled): a simple, safe triple-loop implementation

#[allow(clippy::too_many_arguments)]
#[inline]
pub(crate) fn gemm_f64(
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    rsa: usize,
    csa: usize,
    b: &[f64],
    rsb: usize,
    csb: usize,
    beta: f64,
    c: &mut [f64],
    rsc: usize,
    csc: usize,
) {
    debug_assert!(m > 0 && n > 0 && k > 0);
    debug_assert!((m - 1) * rsa + (k - 1) * csa < a.len());
    debug_assert!((k - 1) * rsb + (n - 1) * csb < b.len());
    debug_assert!((m - 1) * rsc + (n - 1) * csc < c.len());

    #[cfg(feature = "matrixmultiply")]
    {
        // matrixmultiply supports arbitrary strides; bounds were checked above.
        unsafe {
            matrixmultiply::dgemm(
                m,
                k,
                n,
                alpha,
                a.as_ptr(),
                rsa as isize,
                csa as isize,
                b.as_ptr(),
                rsb as isize,
                csb as isize,
                beta,
                c.as_mut_ptr(),
                rsc as isize,
                csc as isize,
            );
        }
    }

    #[cfg(not(feature = "matrixmultiply"))]
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0_f64;
            let a0 = i * rsa;
            let b0 = j * csb;

            for p in 0..k {
                let av = a[a0 + p * csa];
                let bv = b[p * rsb + b0];
                acc = av.mul_add(bv, acc);
            }

            let idx = i * rsc + j * csc;
            c[idx] = alpha * acc + beta * c[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemm_accumulates_into_c_with_beta_one() {
        // (2x3) * (3x2) + C, row-major contiguous.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mut c = [10.0, 20.0, 30.0, 40.0];

        gemm_f64(2, 2, 3, 1.0, &a, 3, 1, &b, 2, 1, 1.0, &mut c, 2, 1);

        // A*B = [[4, 5], [10, 11]]
        assert_eq!(c, [14.0, 25.0, 40.0, 51.0]);
    }

    #[test]
    fn gemm_overwrites_c_with_beta_zero() {
        let a = [2.0, 0.0, 0.0, 2.0];
        let b = [1.0, 2.0, 3.0, 4.0];
        let mut c = [9.0; 4];

        gemm_f64(2, 2, 2, 1.0, &a, 2, 1, &b, 2, 1, 0.0, &mut c, 2, 1);

        assert_eq!(c, [2.0, 4.0, 6.0, 8.0]);
    }
}
