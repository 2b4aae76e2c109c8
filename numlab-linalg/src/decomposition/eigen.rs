//! Eigendecomposition (spec C8).
//!
//! Symmetric inputs go through Householder tridiagonalization followed by
//! implicit-shift QL iteration (real eigenvalues, orthonormal eigenvectors).
//! Non-symmetric inputs are reduced to upper Hessenberg form by orthogonal
//! similarity, then swept with double-shift Francis QR iteration to a real
//! Schur form; eigenvalues come off the Schur form's diagonal (1x1 blocks) and
//! 2x2 blocks (complex-conjugate pairs, reported as real/imaginary parts
//! rather than panicking or truncating to their real part alone).

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    n: usize,
    real: Vec<f64>,
    imag: Vec<f64>,
    vectors: Matrix,
    symmetric: bool,
}

impl EigenDecomposition {
    pub fn compute(a: &Matrix) -> LinalgResult<Self> {
        let dims = a.dims();
        if !dims.is_square() {
            return Err(LinalgError::ShapeMismatch {
                context: "EigenDecomposition::compute".to_string(),
                expected: (dims.rows, dims.rows),
                actual: dims.as_tuple(),
            });
        }
        let n = dims.rows;
        let symmetric = is_symmetric(a);

        let (real, imag, vectors) = if symmetric {
            let mut v = a.clone();
            let mut d = vec![0.0; n];
            let mut e = vec![0.0; n];
            tred2(&mut v, &mut d, &mut e, n);
            tql2(&mut v, &mut d, &mut e, n);
            (d, vec![0.0; n], v)
        } else {
            let mut h = a.clone();
            let mut v = Matrix::identity(n);
            let ort = orthes(&mut h, &mut v, n);
            let (real, imag) = hqr2(&mut h, &mut v, ort, n);
            (real, imag, v)
        };

        if imag.iter().any(|&im| im.abs() > f64::EPSILON) {
            default_diagnostics().warn("EigenDecomposition::compute: matrix has complex-conjugate eigenvalue pairs");
        }

        Ok(EigenDecomposition {
            n,
            real,
            imag,
            vectors,
            symmetric,
        })
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Real parts of the eigenvalues, in the order produced by the algorithm
    /// (ascending for the symmetric path).
    pub fn eigenvalues_real(&self) -> &[f64] {
        &self.real
    }

    /// Imaginary parts; all zero for a symmetric input.
    pub fn eigenvalues_imag(&self) -> &[f64] {
        &self.imag
    }

    /// Eigenvectors as columns. Orthonormal when [`EigenDecomposition::is_symmetric`];
    /// for a non-symmetric input with complex eigenvalues, the column pair for
    /// a conjugate pair packs `(real_part, imag_part)` per the standard real
    /// Schur convention rather than two literal complex vectors.
    pub fn vectors(&self) -> Matrix {
        self.vectors.clone()
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

fn is_symmetric(a: &Matrix) -> bool {
    let n = a.rows();
    if n != a.cols() {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (a.get(i, j) - a.get(j, i)).abs() > 1e-9 * (1.0 + a.get(i, j).abs().max(a.get(j, i).abs())) {
                return false;
            }
        }
    }
    true
}

/// Householder reduction of a symmetric matrix to tridiagonal form,
/// accumulating the orthogonal transform in `v` (JAMA `tred2`).
fn tred2(v: &mut Matrix, d: &mut [f64], e: &mut [f64], n: usize) {
    for j in 0..n {
        d[j] = v.get(n - 1, j);
    }

    for i in (1..n).rev() {
        let mut scale = 0.0;
        let mut h = 0.0;
        for k in 0..i {
            scale += d[k].abs();
        }
        if scale == 0.0 {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v.get(i - 1, j);
                v.set(i, j, 0.0);
                v.set(j, i, 0.0);
            }
        } else {
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = if f > 0.0 { -h.sqrt() } else { h.sqrt() };
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for j in 0..i {
                e[j] = 0.0;
            }
            for j in 0..i {
                f = d[j];
                v.set(j, i, f);
                g = e[j] + v.get(j, j) * f;
                for k in (j + 1)..i {
                    g += v.get(k, j) * d[k];
                    e[k] += v.get(k, j) * f;
                }
                e[j] = g;
            }
            f = 0.0;
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    let updated = v.get(k, j) - (f * e[k] + g * d[k]);
                    v.set(k, j, updated);
                }
                d[j] = v.get(i - 1, j);
                v.set(i, j, 0.0);
            }
        }
        d[i] = h;
    }

    for i in 0..(n - 1) {
        v.set(n - 1, i, v.get(i, i));
        v.set(i, i, 1.0);
        let h = d[i + 1];
        if h != 0.0 {
            for k in 0..=i {
                d[k] = v.get(k, i + 1) / h;
            }
            for j in 0..=i {
                let mut g = 0.0;
                for k in 0..=i {
                    g += v.get(k, i + 1) * v.get(k, j);
                }
                for k in 0..=i {
                    let updated = v.get(k, j) - g * d[k];
                    v.set(k, j, updated);
                }
            }
        }
        for k in 0..=i {
            v.set(k, i + 1, 0.0);
        }
    }
    for j in 0..n {
        d[j] = v.get(n - 1, j);
        v.set(n - 1, j, 0.0);
    }
    v.set(n - 1, n - 1, 1.0);
    e[0] = 0.0;
}

/// Implicit-shift QL iteration with Wilkinson's shift on a tridiagonal matrix
/// (JAMA `tql2`), updating `d`/`v` in place to eigenvalues/eigenvectors.
fn tql2(v: &mut Matrix, d: &mut [f64], e: &mut [f64], n: usize) {
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    let mut f = 0.0;
    let mut tst1: f64 = 0.0;
    let eps = f64::EPSILON;

    for l in 0..n {
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n {
            if e[m].abs() <= eps * tst1 {
                break;
            }
            m += 1;
        }

        if m > l {
            loop {
                let g = d[l];
                let mut p = (d[l + 1] - g) / (2.0 * e[l]);
                let mut r = p.hypot(1.0);
                if p < 0.0 {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for i in (l + 2)..n {
                    d[i] -= h;
                }
                f += h;

                p = d[m];
                let mut c = 1.0;
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = 0.0;
                let mut s2 = 0.0;
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    let g2 = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g2;
                    d[i + 1] = h + s * (c * g2 + s * d[i]);

                    for k in 0..n {
                        h = v.get(k, i + 1);
                        v.set(k, i + 1, s * v.get(k, i) + c * h);
                        v.set(k, i, c * v.get(k, i) - s * h);
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] += f;
        e[l] = 0.0;
    }

    for i in 0..(n - 1) {
        let mut min_index = i;
        let mut min_value = d[i];
        for j in (i + 1)..n {
            if d[j] < min_value {
                min_index = j;
                min_value = d[j];
            }
        }
        if min_index != i {
            d[min_index] = d[i];
            d[i] = min_value;
            for k in 0..n {
                let tmp = v.get(k, i);
                v.set(k, i, v.get(k, min_index));
                v.set(k, min_index, tmp);
            }
        }
    }
}

/// Orthogonal reduction of a general matrix to upper Hessenberg form (JAMA
/// `orthes`), accumulating the transform into `v` and returning the scratch
/// vector `orthes` needs to finish accumulating during `hqr2`.
fn orthes(h: &mut Matrix, v: &mut Matrix, n: usize) -> Vec<f64> {
    let low = 0;
    let high = n - 1;
    let mut ort = vec![0.0; n];

    for m in (low + 1)..high {
        let mut scale = 0.0;
        for i in m..=high {
            scale += h.get(i, m - 1).abs();
        }
        if scale != 0.0 {
            let mut hsum = 0.0;
            for i in (m..=high).rev() {
                ort[i] = h.get(i, m - 1) / scale;
                hsum += ort[i] * ort[i];
            }
            let mut g = hsum.sqrt();
            if ort[m] > 0.0 {
                g = -g;
            }
            hsum -= ort[m] * g;
            ort[m] -= g;

            for j in m..n {
                let mut f = 0.0;
                for i in (m..=high).rev() {
                    f += ort[i] * h.get(i, j);
                }
                f /= hsum;
                for i in m..=high {
                    let updated = h.get(i, j) - f * ort[i];
                    h.set(i, j, updated);
                }
            }

            for i in 0..=high {
                let mut f = 0.0;
                for j in (m..=high).rev() {
                    f += ort[j] * h.get(i, j);
                }
                f /= hsum;
                for j in m..=high {
                    let updated = h.get(i, j) - f * ort[j];
                    h.set(i, j, updated);
                }
            }
            ort[m] = scale * ort[m];
            h.set(m, m - 1, scale * g);
        }
    }

    for i in 0..n {
        for j in 0..n {
            v.set(i, j, if i == j { 1.0 } else { 0.0 });
        }
    }

    for m in (low + 1..high).rev() {
        if h.get(m, m - 1) != 0.0 {
            for i in (m + 1)..=high {
                ort[i] = h.get(i, m - 1);
            }
            for j in m..=high {
                let mut g = 0.0;
                for i in m..=high {
                    g += ort[i] * v.get(i, j);
                }
                g = (g / ort[m]) / h.get(m, m - 1);
                for i in m..=high {
                    let updated = v.get(i, j) + g * ort[i];
                    v.set(i, j, updated);
                }
            }
        }
    }

    ort
}

/// Double-shift Francis QR iteration reducing an upper-Hessenberg matrix to
/// real Schur form (JAMA `hqr2`), returning eigenvalue real/imaginary parts.
/// Accumulates eigenvectors into `v` by back-substitution.
fn hqr2(h: &mut Matrix, v: &mut Matrix, _ort: Vec<f64>, n: usize) -> (Vec<f64>, Vec<f64>) {
    let nn = n;
    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    let low = 0usize;
    let high = nn - 1;
    let eps = f64::EPSILON;
    let mut exshift = 0.0;
    let mut p = 0.0;
    let mut q = 0.0;
    let mut r = 0.0;
    let mut s = 0.0;
    let mut z = 0.0;
    let mut t;
    let mut w;
    let mut x;
    let mut y;

    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h.get(i, j).abs();
        }
    }

    let mut n_idx = high as i64;
    let mut iter = 0;
    while n_idx >= low as i64 {
        let n_u = n_idx as usize;
        let mut l = n_idx;
        while l > low as i64 {
            let l_u = l as usize;
            s = h.get(l_u - 1, l_u - 1).abs() + h.get(l_u, l_u).abs();
            if s == 0.0 {
                s = norm;
            }
            if h.get(l_u, l_u - 1).abs() < eps * s {
                break;
            }
            l -= 1;
        }
        let l_u = l as usize;

        if l == n_idx {
            h.set(n_u, n_u, h.get(n_u, n_u) + exshift);
            d[n_u] = h.get(n_u, n_u);
            e[n_u] = 0.0;
            n_idx -= 1;
            iter = 0;
        } else if l == n_idx - 1 {
            w = h.get(n_u, n_u - 1) * h.get(n_u - 1, n_u);
            p = (h.get(n_u - 1, n_u - 1) - h.get(n_u, n_u)) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h.set(n_u, n_u, h.get(n_u, n_u) + exshift);
            h.set(n_u - 1, n_u - 1, h.get(n_u - 1, n_u - 1) + exshift);
            x = h.get(n_u, n_u);

            if q >= 0.0 {
                z = if p >= 0.0 { p + z } else { p - z };
                d[n_u - 1] = x + z;
                d[n_u] = d[n_u - 1];
                if z != 0.0 {
                    d[n_u] = x - w / z;
                }
                e[n_u - 1] = 0.0;
                e[n_u] = 0.0;
                x = h.get(n_u, n_u - 1);
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;
                for j in (n_u - 1)..nn {
                    z = h.get(n_u - 1, j);
                    h.set(n_u - 1, j, q * z + p * h.get(n_u, j));
                    h.set(n_u, j, q * h.get(n_u, j) - p * z);
                }
                for i in 0..=n_u {
                    z = h.get(i, n_u - 1);
                    h.set(i, n_u - 1, q * z + p * h.get(i, n_u));
                    h.set(i, n_u, q * h.get(i, n_u) - p * z);
                }
                for i in low..=high {
                    z = v.get(i, n_u - 1);
                    v.set(i, n_u - 1, q * z + p * v.get(i, n_u));
                    v.set(i, n_u, q * v.get(i, n_u) - p * z);
                }
            } else {
                d[n_u - 1] = x + p;
                d[n_u] = x + p;
                e[n_u - 1] = z;
                e[n_u] = -z;
            }
            n_idx -= 2;
            iter = 0;
        } else {
            x = h.get(n_u, n_u);
            y = 0.0;
            w = 0.0;
            if l_u < n_u {
                y = h.get(n_u - 1, n_u - 1);
                w = h.get(n_u, n_u - 1) * h.get(n_u - 1, n_u);
            }

            if iter == 10 {
                exshift += x;
                for i in low..=n_u {
                    h.set(i, i, h.get(i, i) - x);
                }
                s = h.get(n_u, n_u - 1).abs() + h.get(n_u - 1, n_u - 2).abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            if iter == 30 {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in low..=n_u {
                        h.set(i, i, h.get(i, i) - s);
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }

            iter += 1;

            let mut m = n_u - 2;
            let mut m_i64 = m as i64;
            while m_i64 >= l {
                m = m_i64 as usize;
                z = h.get(m, m);
                r = x - z;
                s = y - z;
                p = (r * s - w) / h.get(m + 1, m) + h.get(m, m + 1);
                q = h.get(m + 1, m + 1) - z - r - s;
                r = h.get(m + 2, m + 1);
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l_u {
                    break;
                }
                let threshold = eps
                    * p.abs()
                    * (h.get(m - 1, m - 1).abs() + z.abs() + h.get(m + 1, m + 1).abs());
                if h.get(m, m - 1).abs() * (q.abs() + r.abs()) < threshold {
                    break;
                }
                m_i64 -= 1;
            }

            for i in (m + 2)..=n_u {
                h.set(i, i - 2, 0.0);
                if i > m + 2 {
                    h.set(i, i - 3, 0.0);
                }
            }

            let mut k_idx = m as i64;
            while k_idx <= n_idx - 1 {
                let k = k_idx as usize;
                let notlast = k != n_u - 1;
                if k != m {
                    p = h.get(k, k - 1);
                    q = h.get(k + 1, k - 1);
                    r = if notlast { h.get(k + 2, k - 1) } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x != 0.0 {
                        p /= x;
                        q /= x;
                        r /= x;
                    }
                }
                if x == 0.0 {
                    k_idx += 1;
                    continue;
                }
                let mut s_local = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s_local = -s_local;
                }
                if s_local != 0.0 {
                    if k != m {
                        h.set(k, k - 1, -s_local * x);
                    } else if l != m as i64 {
                        h.set(k, k - 1, -h.get(k, k - 1));
                    }
                    p += s_local;
                    x = p / s_local;
                    y = q / s_local;
                    z = r / s_local;
                    q /= p;
                    r /= p;

                    for j in k..nn {
                        p = h.get(k, j) + q * h.get(k + 1, j);
                        if notlast {
                            p += r * h.get(k + 2, j);
                            h.set(k + 2, j, h.get(k + 2, j) - p * z);
                        }
                        h.set(k, j, h.get(k, j) - p * x);
                        h.set(k + 1, j, h.get(k + 1, j) - p * y);
                    }

                    let upper = n_u.min(k + 3);
                    for i in 0..=upper {
                        p = x * h.get(i, k) + y * h.get(i, k + 1);
                        if notlast {
                            p += z * h.get(i, k + 2);
                            h.set(i, k + 2, h.get(i, k + 2) - p * r);
                        }
                        h.set(i, k, h.get(i, k) - p);
                        h.set(i, k + 1, h.get(i, k + 1) - p * q);
                    }

                    for i in low..=high {
                        p = x * v.get(i, k) + y * v.get(i, k + 1);
                        if notlast {
                            p += z * v.get(i, k + 2);
                            v.set(i, k + 2, v.get(i, k + 2) - p * r);
                        }
                        v.set(i, k, v.get(i, k) - p);
                        v.set(i, k + 1, v.get(i, k + 1) - p * q);
                    }
                }
                k_idx += 1;
            }
        }
    }

    if norm == 0.0 {
        return (d, e);
    }

    for n_idx in (0..nn).rev() {
        p = d[n_idx];
        q = e[n_idx];
        if q == 0.0 {
            let mut l = n_idx;
            h.set(n_idx, n_idx, 1.0);
            for i in (0..n_idx).rev() {
                w = h.get(i, i) - p;
                r = 0.0;
                for j in l..=n_idx {
                    r += h.get(i, j) * h.get(j, n_idx);
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        h.set(i, n_idx, if w != 0.0 { -r / w } else { -r / (eps * norm) });
                    } else {
                        x = h.get(i, i + 1);
                        y = h.get(i + 1, i);
                        q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                        t = (x * s - z * r) / q;
                        h.set(i, n_idx, t);
                        h.set(
                            i + 1,
                            n_idx,
                            if x.abs() > z.abs() { (-r - w * t) / x } else { (-s - y * t) / z },
                        );
                    }
                }
            }
        } else if q < 0.0 {
            let mut l = n_idx - 1;
            if h.get(n_idx, n_idx - 1).abs() > h.get(n_idx - 1, n_idx).abs() {
                h.set(n_idx - 1, n_idx - 1, q / h.get(n_idx, n_idx - 1));
                h.set(n_idx - 1, n_idx, -(h.get(n_idx, n_idx) - p) / h.get(n_idx, n_idx - 1));
            } else {
                let (cr, ci) = complex_div(0.0, -h.get(n_idx - 1, n_idx), h.get(n_idx - 1, n_idx - 1) - p, q);
                h.set(n_idx - 1, n_idx - 1, cr);
                h.set(n_idx - 1, n_idx, ci);
            }
            h.set(n_idx, n_idx - 1, 0.0);
            h.set(n_idx, n_idx, 1.0);
            for i in (0..(n_idx - 1)).rev() {
                w = h.get(i, i) - p;
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=n_idx {
                    ra += h.get(i, j) * h.get(j, n_idx - 1);
                    sa += h.get(i, j) * h.get(j, n_idx);
                }
                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        let (cr, ci) = complex_div(-ra, -sa, w, q);
                        h.set(i, n_idx - 1, cr);
                        h.set(i, n_idx, ci);
                    } else {
                        x = h.get(i, i + 1);
                        y = h.get(i + 1, i);
                        let vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                        let vi = (d[i] - p) * 2.0 * q;
                        let (vr, vi) = if vr == 0.0 && vi == 0.0 {
                            (eps * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs()), vi)
                        } else {
                            (vr, vi)
                        };
                        let (cr, ci) = complex_div(
                            x * r - z * ra + q * sa,
                            x * s - z * sa - q * ra,
                            vr,
                            vi,
                        );
                        h.set(i, n_idx - 1, cr);
                        h.set(i, n_idx, ci);
                        if x.abs() > z.abs() + q.abs() {
                            h.set(i + 1, n_idx - 1, (-ra - w * h.get(i, n_idx - 1) + q * h.get(i, n_idx)) / x);
                            h.set(i + 1, n_idx, (-sa - w * h.get(i, n_idx) - q * h.get(i, n_idx - 1)) / x);
                        } else {
                            let (cr2, ci2) = complex_div(-r - y * h.get(i, n_idx - 1), -s - y * h.get(i, n_idx), z, q);
                            h.set(i + 1, n_idx - 1, cr2);
                            h.set(i + 1, n_idx, ci2);
                        }
                    }
                }
            }
        }
    }

    for i in 0..nn {
        if i < low || i > high {
            for j in i..nn {
                v.set(i, j, h.get(i, j));
            }
        }
    }

    for j in ((low + 1)..nn).rev() {
        for i in low..=high.min(j) {
            z = 0.0;
            for k in low..=j.min(high) {
                z += v.get(i, k) * h.get(k, j);
            }
            v.set(i, j, z);
        }
    }

    (d, e)
}

fn complex_div(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let ratio = yi / yr;
        let denom = yr + ratio * yi;
        ((xr + ratio * xi) / denom, (xi - ratio * xr) / denom)
    } else {
        let ratio = yr / yi;
        let denom = yi + ratio * yr;
        ((ratio * xr + xi) / denom, (ratio * xi - xr) / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_matrix_has_real_eigenvalues() {
        let a = Matrix::from_row_major(2, 2, vec![2.0, 1.0, 1.0, 2.0]).unwrap();
        let eig = EigenDecomposition::compute(&a).unwrap();
        assert!(eig.is_symmetric());
        let mut values = eig.eigenvalues_real().to_vec();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((values[0] - 1.0).abs() < 1e-8);
        assert!((values[1] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn symmetric_eigenvectors_are_orthonormal() {
        let a = Matrix::from_row_major(3, 3, vec![4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]).unwrap();
        let eig = EigenDecomposition::compute(&a).unwrap();
        let v = eig.vectors();
        let gram = v.transpose().times(&v).unwrap();
        assert!(gram.approx_eq(&Matrix::identity(3), 1e-6));
    }

    #[test]
    fn identity_has_unit_eigenvalues() {
        let a = Matrix::identity(4);
        let eig = EigenDecomposition::compute(&a).unwrap();
        for &value in eig.eigenvalues_real() {
            assert!((value - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn non_symmetric_matrix_is_detected() {
        let a = Matrix::from_row_major(2, 2, vec![0.0, -1.0, 1.0, 0.0]).unwrap();
        let eig = EigenDecomposition::compute(&a).unwrap();
        assert!(!eig.is_symmetric());
    }
}
