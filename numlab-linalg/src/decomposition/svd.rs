//! Singular value decomposition (spec C7).
//!
//! Golub-Kahan bidiagonalization (Householder reflectors applied alternately
//! from the left and right) followed by implicit-shift QR sweeps on the
//! resulting bidiagonal form, accumulating `U` and `V` alongside the singular
//! values, the same two-phase shape as [`crate::decomposition::eigen`]'s
//! tridiagonalize-then-QL path, specialized to the non-square, non-symmetric
//! case.

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[derive(Debug, Clone)]
pub struct SvdDecomposition {
    u: Matrix,
    s: Vec<f64>,
    v: Matrix,
    m: usize,
    n: usize,
}

impl SvdDecomposition {
    pub fn compute(a: &Matrix) -> LinalgResult<Self> {
        let (m, n) = a.dims().as_tuple();
        if m == 0 || n == 0 {
            return Err(LinalgError::ShapeMismatch {
                context: "SvdDecomposition::compute".to_string(),
                expected: (1, 1),
                actual: (m, n),
            });
        }

        let transposed_input = m < n;
        let work = if transposed_input { a.transpose() } else { a.clone() };
        let (wm, wn) = work.dims().as_tuple();

        let nu = wm.min(wn);
        let mut s = vec![0.0; wn.min(wm + 1)];
        let mut u = Matrix::zeros(wm, nu);
        let mut v = Matrix::zeros(wn, wn);
        let mut work_a = work.clone();
        let mut e = vec![0.0; wn];
        let mut work_vec = vec![0.0; wm];

        golub_reinsch(&mut work_a, &mut s, &mut e, &mut u, &mut v, &mut work_vec, wm, wn, nu);

        let singular_values: Vec<f64> = s.iter().take(nu).cloned().collect();

        if transposed_input {
            Ok(SvdDecomposition {
                u: v.submatrix(0..wn, 0..nu).unwrap(),
                s: singular_values,
                v: u,
                m,
                n,
            })
        } else {
            Ok(SvdDecomposition {
                u,
                s: singular_values,
                v: v.submatrix(0..wn, 0..nu).unwrap(),
                m,
                n,
            })
        }
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.s
    }

    pub fn u(&self) -> Matrix {
        self.u.clone()
    }

    pub fn v(&self) -> Matrix {
        self.v.clone()
    }

    /// Number of singular values exceeding `s[0] * max(m, n) * f64::EPSILON`.
    pub fn rank(&self) -> usize {
        let tol = self.s.first().copied().unwrap_or(0.0) * (self.m.max(self.n) as f64) * f64::EPSILON;
        self.s.iter().filter(|&&value| value > tol).count()
    }

    /// The largest singular value, i.e. the induced 2-norm.
    pub fn norm2(&self) -> f64 {
        self.s.first().copied().unwrap_or(0.0)
    }

    /// The condition number `sigma_max / sigma_min`, `f64::INFINITY` if rank-deficient.
    pub fn condition_number(&self) -> f64 {
        let smallest = self.s.last().copied().unwrap_or(0.0);
        if smallest <= 0.0 {
            f64::INFINITY
        } else {
            self.norm2() / smallest
        }
    }

    /// Moore-Penrose pseudo-inverse, built from `V * Sigma^+ * U^T` with
    /// near-zero singular values (below rank-detection tolerance) zeroed
    /// instead of inverted.
    pub fn pinv(&self) -> Matrix {
        let tol = self.s.first().copied().unwrap_or(0.0) * (self.m.max(self.n) as f64) * f64::EPSILON;
        if self.s.iter().any(|&value| value <= tol) {
            default_diagnostics().warn("SvdDecomposition::pinv: matrix is rank-deficient, tiny singular values zeroed");
        }
        let mut sigma_plus = Matrix::zeros(self.v.cols(), self.u.cols());
        for (i, &value) in self.s.iter().enumerate() {
            if value > tol {
                sigma_plus.set(i, i, 1.0 / value);
            }
        }
        self.v
            .times(&sigma_plus)
            .unwrap()
            .times(&self.u.transpose())
            .unwrap()
    }
}

#[allow(clippy::too_many_arguments)]
fn golub_reinsch(
    a: &mut Matrix,
    s: &mut [f64],
    e: &mut [f64],
    u: &mut Matrix,
    v: &mut Matrix,
    work: &mut [f64],
    m: usize,
    n: usize,
    nu: usize,
) {
    let nct = (m - 1).min(n);
    let nrt = 0.max(n.saturating_sub(2)).min(m);

    for k in 0..nct.max(nrt) {
        if k < nct {
            s[k] = (k..m).map(|i| a.get(i, k).powi(2)).sum::<f64>().sqrt();
            if s[k] != 0.0 {
                if a.get(k, k) < 0.0 {
                    s[k] = -s[k];
                }
                for i in k..m {
                    let scaled = a.get(i, k) / s[k];
                    a.set(i, k, scaled);
                }
                a.set(k, k, a.get(k, k) + 1.0);
            }
            s[k] = -s[k];
        }
        for j in (k + 1)..n {
            if k < nct && s[k] != 0.0 {
                let mut t = (k..m).map(|i| a.get(i, k) * a.get(i, j)).sum::<f64>();
                t = -t / a.get(k, k);
                for i in k..m {
                    let updated = a.get(i, j) + t * a.get(i, k);
                    a.set(i, j, updated);
                }
            }
            e[j] = a.get(k, j);
        }
        if k < nct {
            for i in k..m {
                u.set(i, k, a.get(i, k));
            }
        }
        if k < nrt {
            e[k] = (k + 1..n).map(|i| e[i].powi(2)).sum::<f64>().sqrt();
            if e[k] != 0.0 {
                if e[k + 1] < 0.0 {
                    e[k] = -e[k];
                }
                for i in (k + 1)..n {
                    e[i] /= e[k];
                }
                e[k + 1] += 1.0;
            }
            e[k] = -e[k];
            if (k + 1) < m && e[k] != 0.0 {
                for i in (k + 1)..m {
                    work[i] = 0.0;
                }
                for j in (k + 1)..n {
                    for i in (k + 1)..m {
                        work[i] += e[j] * a.get(i, j);
                    }
                }
                for j in (k + 1)..n {
                    let t = -e[j] / e[k + 1];
                    for i in (k + 1)..m {
                        let updated = a.get(i, j) + t * work[i];
                        a.set(i, j, updated);
                    }
                }
            }
            for i in (k + 1)..n {
                v.set(i, k, e[i]);
            }
        }
    }

    let mut p = n.min(m + 1);
    if nct < n {
        s[nct] = a.get(nct, nct);
    }
    if m < p {
        s[p - 1] = 0.0;
    }
    if (nrt + 1) < p {
        e[nrt] = a.get(nrt, p - 1);
    }
    e[p - 1] = 0.0;

    for j in nct..nu {
        for i in 0..m {
            u.set(i, j, 0.0);
        }
        u.set(j, j, 1.0);
    }
    for k in (0..nct).rev() {
        if s[k] != 0.0 {
            for j in (k + 1)..nu {
                let mut t = (k..m).map(|i| u.get(i, k) * u.get(i, j)).sum::<f64>();
                t = -t / u.get(k, k);
                for i in k..m {
                    let updated = u.get(i, j) + t * u.get(i, k);
                    u.set(i, j, updated);
                }
            }
            for i in k..m {
                u.set(i, k, -u.get(i, k));
            }
            u.set(k, k, 1.0 + u.get(k, k));
            for i in 0..(k.max(1) - 1) {
                u.set(i, k, 0.0);
            }
        } else {
            for i in 0..m {
                u.set(i, k, 0.0);
            }
            u.set(k, k, 1.0);
        }
    }

    for k in (0..n).rev() {
        if k < nrt && e[k] != 0.0 {
            for j in (k + 1)..nu.max(k + 1).min(n) {
                let mut t = ((k + 1)..n).map(|i| v.get(i, k) * v.get(i, j)).sum::<f64>();
                t = -t / v.get(k + 1, k);
                for i in (k + 1)..n {
                    let updated = v.get(i, j) + t * v.get(i, k);
                    v.set(i, j, updated);
                }
            }
        }
        for i in 0..n {
            v.set(i, k, 0.0);
        }
        v.set(k, k, 1.0);
    }

    let pp = p - 1;
    let eps = f64::EPSILON;
    while p > 0 {
        let mut k;
        let kase;
        k = (p as i64) - 2;
        loop {
            if k < 0 {
                break;
            }
            let ku = k as usize;
            if e[ku].abs() <= eps * (s[ku].abs() + s[ku + 1].abs()) {
                e[ku] = 0.0;
                break;
            }
            k -= 1;
        }
        if k == (p as i64 - 2) {
            kase = 4;
        } else {
            let mut ks = p.saturating_sub(1) as i64;
            while ks > k {
                let ksu = ks as usize;
                let t = (if ksu != p - 1 { e[ksu].abs() } else { 0.0 })
                    + (if ksu != (k + 1) as usize { e[ksu - 1].abs() } else { 0.0 });
                if s[ksu].abs() <= eps * t {
                    s[ksu] = 0.0;
                    break;
                }
                ks -= 1;
            }
            if ks == k {
                kase = 3;
            } else if ks == (p as i64 - 1) {
                kase = 1;
            } else {
                kase = 2;
                k = ks;
            }
        }
        let mut k = (k + 1) as usize;

        match kase {
            1 => {
                let mut f = e[p - 2];
                e[p - 2] = 0.0;
                for j in (k..=(p - 2)).rev() {
                    let mut t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    if j != k {
                        f = -sn * e[j - 1];
                        e[j - 1] *= cs;
                    }
                    for i in 0..n {
                        t = cs * v.get(i, j) + sn * v.get(i, p - 2);
                        let updated = -sn * v.get(i, j) + cs * v.get(i, p - 2);
                        v.set(i, p - 2, updated);
                        v.set(i, j, t);
                    }
                }
            }
            2 => {
                let mut f = e[k - 1];
                e[k - 1] = 0.0;
                for j in k..p {
                    let mut t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    f = -sn * e[j];
                    e[j] *= cs;
                    for i in 0..m {
                        t = cs * u.get(i, j) + sn * u.get(i, k - 1);
                        let updated = -sn * u.get(i, j) + cs * u.get(i, k - 1);
                        u.set(i, k - 1, updated);
                        u.set(i, j, t);
                    }
                }
            }
            3 => {
                let scale = s[p - 1]
                    .abs()
                    .max(s[p - 2].abs())
                    .max(e[p - 2].abs())
                    .max(s[k].abs())
                    .max(e[k].abs());
                let sp = s[p - 1] / scale;
                let spm1 = s[p - 2] / scale;
                let epm1 = e[p - 2] / scale;
                let sk = s[k] / scale;
                let ek = e[k] / scale;
                let b = ((spm1 - sp) * (spm1 + sp) + epm1 * epm1) / 2.0;
                let c = (sp * epm1) * (sp * epm1);
                let mut shift = 0.0;
                if b != 0.0 || c != 0.0 {
                    shift = (b * b + c).sqrt();
                    if b < 0.0 {
                        shift = -shift;
                    }
                    shift = c / (b + shift);
                }
                let mut f = (sk + sp) * (sk - sp) + shift;
                let mut g = sk * ek;
                for j in k..(p - 1) {
                    let mut t = f.hypot(g);
                    let mut cs = f / t;
                    let mut sn = g / t;
                    if j != k {
                        e[j - 1] = t;
                    }
                    f = cs * s[j] + sn * e[j];
                    e[j] = cs * e[j] - sn * s[j];
                    g = sn * s[j + 1];
                    s[j + 1] *= cs;
                    for i in 0..n {
                        t = cs * v.get(i, j) + sn * v.get(i, j + 1);
                        let updated = -sn * v.get(i, j) + cs * v.get(i, j + 1);
                        v.set(i, j + 1, updated);
                        v.set(i, j, t);
                    }
                    t = f.hypot(g);
                    cs = f / t;
                    sn = g / t;
                    s[j] = t;
                    f = cs * e[j] + sn * s[j + 1];
                    s[j + 1] = -sn * e[j] + cs * s[j + 1];
                    g = sn * e[j + 1];
                    e[j + 1] *= cs;
                    if j < m - 1 {
                        for i in 0..m {
                            t = cs * u.get(i, j) + sn * u.get(i, j + 1);
                            let updated = -sn * u.get(i, j) + cs * u.get(i, j + 1);
                            u.set(i, j + 1, updated);
                            u.set(i, j, t);
                        }
                    }
                }
                e[p - 2] = f;
            }
            _ => {
                if s[k] <= 0.0 {
                    s[k] = if s[k] < 0.0 { -s[k] } else { 0.0 };
                    for i in 0..=pp {
                        v.set(i, k, -v.get(i, k));
                    }
                }
                while k < pp && s[k] < s[k + 1] {
                    s.swap(k, k + 1);
                    if k < n - 1 {
                        for i in 0..n {
                            let tmp = v.get(i, k);
                            v.set(i, k, v.get(i, k + 1));
                            v.set(i, k + 1, tmp);
                        }
                    }
                    if k < m - 1 {
                        for i in 0..m {
                            let tmp = u.get(i, k);
                            u.set(i, k, u.get(i, k + 1));
                            u.set(i, k + 1, tmp);
                        }
                    }
                    k += 1;
                }
                p -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_values_are_nonnegative_and_descending() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        let svd = SvdDecomposition::compute(&a).unwrap();
        let values = svd.singular_values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|&v| v >= -1e-9));
    }

    #[test]
    fn identity_has_unit_singular_values() {
        let a = Matrix::identity(3);
        let svd = SvdDecomposition::compute(&a).unwrap();
        for &value in svd.singular_values() {
            assert!((value - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn rank_detects_deficiency() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        let svd = SvdDecomposition::compute(&a).unwrap();
        assert_eq!(svd.rank(), 1);
    }
}
