// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

use core::ops::{Index, IndexMut};

use alloc::vec;
use alloc::vec::Vec;

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathdeform requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn acos(self) -> Self => acos/acosf;
    fn asin(self) -> Self => asin/asinf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn cbrt(self) -> Self => cbrt/cbrtf;
    fn ceil(self) -> Self => ceil/ceilf;
    fn copysign(self, sign: Self) -> Self => copysign/copysignf;
    fn floor(self) -> Self => floor/floorf;
    fn cos(self) -> Self => cos/cosf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn log2(self) -> Self => log2/log2f;
    fn mul_add(self, a: Self, b: Self) -> Self => fma/fmaf;
    fn powi(self, n: i32) -> Self => pow/powf;
    fn powf(self, n: Self) -> Self => pow/powf;
    fn sin(self) -> Self => sin/sinf;
    fn sin_cos(self) -> (Self, Self) => sincos/sincosf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
    fn tan(self) -> Self => tan/tanf;
}

#[cfg(not(feature = "std"))]
use FloatFuncs as _;

/// Find real roots of cubic equation.
///
/// The implementation is not (yet) fully robust, but it does handle the case
/// where `c3` is zero (in that case, solving the quadratic equation).
///
/// See: <https://momentsingraphics.de/CubicRoots.html>
///
/// That implementation is in turn based on Jim Blinn's "How to Solve a Cubic
/// Equation", which is masterful.
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ = 0.
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let c3_recip = c3.recip();
    const ONETHIRD: f64 = 1. / 3.;
    let scaled_c2 = c2 * (ONETHIRD * c3_recip);
    let scaled_c1 = c1 * (ONETHIRD * c3_recip);
    let scaled_c0 = c0 * c3_recip;
    if !(scaled_c0.is_finite() && scaled_c1.is_finite() && scaled_c2.is_finite()) {
        // cubic coefficient is zero or nearly so.
        for root in solve_quadratic(c0, c1, c2) {
            result.push(root);
        }
        return result;
    }
    let (c0, c1, c2) = (scaled_c0, scaled_c1, scaled_c2);
    // (d0, d1, d2) is called "Delta" in article
    let d0 = (-c2).mul_add(c2, c1);
    let d1 = (-c1).mul_add(c2, c0);
    let d2 = c2 * c0 - c1 * c1;
    // d is called "Discriminant"
    let d = 4.0 * d0 * d2 - d1 * d1;
    // de is called "Depressed.x", Depressed.y = d0
    let de = (-2.0 * c2).mul_add(d0, d1);
    if d < 0.0 {
        let sq = (-0.25 * d).sqrt();
        let r = -0.5 * de;
        let t1 = (r + sq).cbrt() + (r - sq).cbrt();
        result.push(t1 - c2);
    } else if d == 0.0 {
        let t1 = (-d0).sqrt().copysign(de);
        result.push(t1 - c2);
        result.push(-2.0 * t1 - c2);
    } else {
        let th = d.sqrt().atan2(-de) * ONETHIRD;
        // (th_cos, th_sin) is called "CubicRoot"
        let (th_sin, th_cos) = th.sin_cos();
        // (r0, r1, r2) is called "Root"
        let r0 = th_cos;
        let ss3 = th_sin * 3.0f64.sqrt();
        let r1 = 0.5 * (-th_cos + ss3);
        let r2 = 0.5 * (-th_cos - ss3);
        let t = 2.0 * (-d0).sqrt();
        result.push(t.mul_add(r0, -c2));
        result.push(t.mul_add(r1, -c2));
        result.push(t.mul_add(r2, -c2));
    }
    result
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// This function tries to be quite numerically robust. If the equation
/// is nearly linear, it will return the root ignoring the quadratic term;
/// the other root might be out of representable range. In the degenerate
/// case where all coefficients are zero, so that all values of x satisfy
/// the equation, a single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            // Degenerate case
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // Likely, calculation of sc1 * sc1 overflowed. Find one root
        // using sc1 x + x² = 0, other root as sc0 / root1.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        // Sort just to be friendly and make results deterministic.
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

/// Solve an arbitrary function for a zero-crossing.
///
/// This uses the [ITP method], as described in the paper
/// [An Enhancement of the Bisection Method Average Performance Preserving Minmax Optimality].
///
/// The values of `ya` and `yb` are given as arguments rather than
/// computed from `f`, as the values may already be known, or they may
/// be less expensive to compute as special cases.
///
/// It is assumed that `ya < 0.0` and `yb > 0.0`, otherwise unexpected
/// results may occur.
///
/// The value of `epsilon` must be larger than 2^-63 times `b - a`,
/// otherwise integer overflow may occur. The `a` and `b` parameters
/// represent the lower and upper bounds of the bracket searched for a
/// solution.
///
/// The ITP method has tuning parameters. This implementation hardwires
/// k2 to 2, both because it avoids an expensive floating point
/// exponentiation, and because this value has been tested to work well
/// with curve fitting problems.
///
/// The `n0` parameter controls the relative impact of the bisection and
/// secant components. When it is 0, the number of iterations is
/// guaranteed to be no more than the number required by bisection (thus,
/// this method is strictly superior to bisection). However, when the
/// function is smooth, a value of 1 gives the secant method more of a
/// chance to engage, so the average number of iterations is likely
/// lower, though there can be one more iteration than bisection in the
/// worst case.
///
/// The `k1` parameter is harder to characterize; a value of
/// `0.2 / (b - a)` is suggested.
///
/// [ITP method]: https://en.wikipedia.org/wiki/ITP_Method
/// [An Enhancement of the Bisection Method Average Performance Preserving Minmax Optimality]: https://dl.acm.org/doi/10.1145/3423597
#[allow(clippy::too_many_arguments)]
pub fn solve_itp(
    mut f: impl FnMut(f64) -> f64,
    mut a: f64,
    mut b: f64,
    epsilon: f64,
    n0: usize,
    k1: f64,
    mut ya: f64,
    mut yb: f64,
) -> f64 {
    let n1_2 = (((b - a) / epsilon).log2().ceil() - 1.0).max(0.0) as usize;
    let nmax = n0 + n1_2;
    let mut scaled_epsilon = epsilon * (1u64 << nmax) as f64;
    while b - a > 2.0 * epsilon {
        let x1_2 = 0.5 * (a + b);
        let r = scaled_epsilon - 0.5 * (b - a);
        let xf = (yb * a - ya * b) / (yb - ya);
        let sigma = x1_2 - xf;
        // This has k2 = 2 hardwired for efficiency.
        let delta = k1 * (b - a).powi(2);
        let xt = if delta <= (x1_2 - xf).abs() {
            xf + delta.copysign(sigma)
        } else {
            x1_2
        };
        let xitp = if (xt - x1_2).abs() <= r {
            xt
        } else {
            x1_2 - r.copysign(sigma)
        };
        let yitp = f(xitp);
        if yitp > 0.0 {
            b = xitp;
            yb = yitp;
        } else if yitp < 0.0 {
            a = xitp;
            ya = yitp;
        } else {
            return xitp;
        }
        scaled_epsilon *= 0.5;
    }
    0.5 * (a + b)
}

/// Maximum number of QR sweeps spent on a single eigenvalue.
const MAX_QR_ITERATIONS: usize = 60;

/// Find the real roots of a polynomial of arbitrary degree.
///
/// The coefficients are given in ascending order, so the polynomial is
/// c\[0\] + c\[1\] x + c\[2\] x² + …
///
/// The roots are the eigenvalues of the companion matrix. The matrix is
/// balanced, reduced to upper Hessenberg form and then its eigenvalues are
/// extracted with the shifted QR algorithm. Eigenvalues whose imaginary
/// part is below `epsilon` (relative to the magnitude of the real part, but
/// never less than `epsilon` itself) are reported as real roots, and each is
/// polished by a few Newton steps on the original polynomial.
///
/// A root of multiplicity `m` comes out of the eigenvalue problem as a
/// cluster of `m` eigenvalues spread around it, often with imaginary parts
/// far above `epsilon`. Such clusters are recognized and reported once, at
/// their center. Roots closer than `epsilon` (relative, as above) are
/// reported once as well. The result is sorted in ascending order.
///
/// A leading coefficient that is at most `epsilon` times the largest of the
/// other coefficients is dropped and the polynomial of lower degree is
/// solved instead. As with [`solve_quadratic`], when all coefficients are
/// zero a single `0.0` is returned.
pub fn real_poly_roots(coeffs: &[f64], epsilon: f64) -> Vec<f64> {
    if coeffs.iter().all(|&c| c == 0.0) {
        return if coeffs.is_empty() {
            Vec::new()
        } else {
            vec![0.0]
        };
    }
    let mut n = coeffs.len();
    while n > 1 {
        let lead = coeffs[n - 1].abs();
        let rest = coeffs[..n - 1].iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        if lead > epsilon * rest && (rest / lead).is_finite() {
            break;
        }
        n -= 1;
    }
    if n <= 1 {
        // Non-zero constant.
        return Vec::new();
    }
    let coeffs = &coeffs[..n];
    let degree = n - 1;
    let mut roots = if degree == 1 {
        vec![-coeffs[0] / coeffs[1]]
    } else {
        let mut a = SquareMatrix::companion(coeffs);
        a.balance();
        a.reduce_to_hessenberg();
        match a.hessenberg_eigenvalues() {
            Some(eigenvalues) => real_eigenvalues(coeffs, &eigenvalues, epsilon),
            None => {
                log::debug!("QR iteration did not converge for degree {degree} polynomial");
                Vec::new()
            }
        }
    };
    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|a, b| (*a - *b).abs() <= epsilon * b.abs().max(1.0));
    roots
}

/// The real roots among the eigenvalues of a companion matrix.
fn real_eigenvalues(coeffs: &[f64], eigenvalues: &[(f64, f64)], epsilon: f64) -> Vec<f64> {
    let is_real = |re: f64, im: f64| im.abs() <= epsilon * re.abs().max(1.0);
    // Rounding spreads the eigenvalues of an m-fold root over a radius of
    // about `f64::EPSILON^(1/m)`, and m is at most the degree.
    let degree = coeffs.len() - 1;
    let spread = 8.0 * f64::EPSILON.powf(1.0 / degree as f64);
    let mut used = vec![false; eigenvalues.len()];
    let mut roots = Vec::new();
    for (i, &(re, im)) in eigenvalues.iter().enumerate() {
        if used[i] || is_real(re, im) {
            continue;
        }
        used[i] = true;
        let mut cluster = vec![i];
        let mut k = 0;
        while k < cluster.len() {
            let (x, y) = eigenvalues[cluster[k]];
            let radius = spread * x.abs().max(1.0);
            for (j, &(u, v)) in eigenvalues.iter().enumerate() {
                if !used[j] && (u - x).hypot(v - y) <= radius {
                    used[j] = true;
                    cluster.push(j);
                }
            }
            k += 1;
        }
        if cluster.len() < 2 {
            continue;
        }
        let m = cluster.len() as f64;
        let (sum_re, sum_im) = cluster.iter().fold((0.0, 0.0), |(a, b), &j| {
            (a + eigenvalues[j].0, b + eigenvalues[j].1)
        });
        let (center, center_im) = (sum_re / m, sum_im / m);
        // A pair of complex roots close together leaves a clear minimum of
        // the polynomial instead of a zero.
        if is_real(center, center_im) && is_near_zero(coeffs, center, epsilon) {
            roots.push(center);
        }
    }
    for (i, &(re, im)) in eigenvalues.iter().enumerate() {
        if !used[i] && is_real(re, im) {
            roots.push(polish_root(coeffs, re));
        }
    }
    roots
}

/// Whether the polynomial at `x` is small relative to the size of its terms.
fn is_near_zero(coeffs: &[f64], x: f64, epsilon: f64) -> bool {
    let (p, _) = eval_poly(coeffs, x);
    let mut size = 0.0;
    let mut power = 1.0;
    for c in coeffs {
        size += (c * power).abs();
        power *= x.abs();
    }
    p.abs() <= epsilon * size
}

/// Evaluate a polynomial and its derivative using Horner's scheme.
fn eval_poly(coeffs: &[f64], x: f64) -> (f64, f64) {
    let mut p = 0.0;
    let mut dp = 0.0;
    for &c in coeffs.iter().rev() {
        dp = dp * x + p;
        p = p * x + c;
    }
    (p, dp)
}

fn polish_root(coeffs: &[f64], mut x: f64) -> f64 {
    let (mut p, _) = eval_poly(coeffs, x);
    for _ in 0..4 {
        let (_, dp) = eval_poly(coeffs, x);
        let step = p / dp;
        if !step.is_finite() {
            break;
        }
        let candidate = x - step;
        let (p_candidate, _) = eval_poly(coeffs, candidate);
        if p_candidate.abs() >= p.abs() {
            break;
        }
        x = candidate;
        p = p_candidate;
    }
    x
}

/// A dense square matrix with 1-based indexing.
///
/// The eigenvalue routines below follow the classic EISPACK formulation,
/// which is written in terms of 1-based indices; keeping the indexing
/// avoids a whole class of off-by-one errors in the translation.
struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[(i - 1) * self.n + (j - 1)]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[(i - 1) * self.n + (j - 1)]
    }
}

/// Transfer the magnitude of `a` to the sign of `b`.
#[inline]
fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

impl SquareMatrix {
    /// The companion matrix of a polynomial with ascending coefficients.
    ///
    /// The leading coefficient must be non-zero.
    fn companion(coeffs: &[f64]) -> Self {
        let m = coeffs.len() - 1;
        let mut a = SquareMatrix {
            n: m,
            data: vec![0.0; m * m],
        };
        for k in 1..=m {
            a[(1, k)] = -coeffs[m - k] / coeffs[m];
            if k < m {
                a[(k + 1, k)] = 1.0;
            }
        }
        a
    }

    /// Balance the matrix by similarity transforms with powers of two.
    ///
    /// This makes corresponding rows and columns have comparable norms,
    /// which greatly improves the accuracy of the eigenvalues.
    fn balance(&mut self) {
        const RADIX: f64 = 2.0;
        let n = self.n;
        let sqrdx = RADIX * RADIX;
        let mut done = false;
        while !done {
            done = true;
            for i in 1..=n {
                let mut r = 0.0;
                let mut c = 0.0;
                for j in 1..=n {
                    if j != i {
                        c += self[(j, i)].abs();
                        r += self[(i, j)].abs();
                    }
                }
                if c != 0.0 && r != 0.0 {
                    let mut g = r / RADIX;
                    let mut f = 1.0;
                    let s = c + r;
                    while c < g {
                        f *= RADIX;
                        c *= sqrdx;
                    }
                    g = r * RADIX;
                    while c > g {
                        f /= RADIX;
                        c /= sqrdx;
                    }
                    if (c + r) / f < 0.95 * s {
                        done = false;
                        let g = 1.0 / f;
                        for j in 1..=n {
                            self[(i, j)] *= g;
                        }
                        for j in 1..=n {
                            self[(j, i)] *= f;
                        }
                    }
                }
            }
        }
    }

    /// Reduce to upper Hessenberg form by elimination with pivoting.
    fn reduce_to_hessenberg(&mut self) {
        let n = self.n;
        for m in 2..n {
            let mut x: f64 = 0.0;
            let mut i = m;
            for j in m..=n {
                if self[(j, m - 1)].abs() > x.abs() {
                    x = self[(j, m - 1)];
                    i = j;
                }
            }
            if i != m {
                for j in (m - 1)..=n {
                    let tmp = self[(i, j)];
                    self[(i, j)] = self[(m, j)];
                    self[(m, j)] = tmp;
                }
                for j in 1..=n {
                    let tmp = self[(j, i)];
                    self[(j, i)] = self[(j, m)];
                    self[(j, m)] = tmp;
                }
            }
            if x != 0.0 {
                for i in (m + 1)..=n {
                    let mut y = self[(i, m - 1)];
                    if y != 0.0 {
                        y /= x;
                        self[(i, m - 1)] = y;
                        for j in m..=n {
                            self[(i, j)] -= y * self[(m, j)];
                        }
                        for j in 1..=n {
                            self[(j, m)] += y * self[(j, i)];
                        }
                    }
                }
            }
        }
        // The multipliers left below the subdiagonal are not part of the
        // Hessenberg matrix.
        for i in 3..=n {
            for j in 1..=(i - 2) {
                self[(i, j)] = 0.0;
            }
        }
    }

    /// All eigenvalues of an upper Hessenberg matrix, as (real, imaginary)
    /// pairs.
    ///
    /// Returns `None` if the shifted QR iteration fails to converge. The
    /// matrix is destroyed in the process.
    fn hessenberg_eigenvalues(&mut self) -> Option<Vec<(f64, f64)>> {
        let n = self.n;
        let mut wr = vec![0.0; n + 1];
        let mut wi = vec![0.0; n + 1];
        let mut anorm = 0.0;
        for i in 1..=n {
            for j in (i.max(2) - 1)..=n {
                anorm += self[(i, j)].abs();
            }
        }
        let mut nn = n;
        let mut t = 0.0;
        while nn >= 1 {
            let mut its = 0;
            loop {
                // Look for a single small subdiagonal element.
                let mut l = nn;
                while l >= 2 {
                    let mut s = self[(l - 1, l - 1)].abs() + self[(l, l)].abs();
                    if s == 0.0 {
                        s = anorm;
                    }
                    if self[(l, l - 1)].abs() + s == s {
                        self[(l, l - 1)] = 0.0;
                        break;
                    }
                    l -= 1;
                }
                let mut x = self[(nn, nn)];
                if l == nn {
                    // One root found.
                    wr[nn] = x + t;
                    wi[nn] = 0.0;
                    nn -= 1;
                } else {
                    let mut y = self[(nn - 1, nn - 1)];
                    let mut w = self[(nn, nn - 1)] * self[(nn - 1, nn)];
                    if l == nn - 1 {
                        // Two roots found.
                        let p = 0.5 * (y - x);
                        let q = p * p + w;
                        let z = q.abs().sqrt();
                        x += t;
                        if q >= 0.0 {
                            let z = p + sign(z, p);
                            wr[nn - 1] = x + z;
                            wr[nn] = x + z;
                            if z != 0.0 {
                                wr[nn] = x - w / z;
                            }
                            wi[nn - 1] = 0.0;
                            wi[nn] = 0.0;
                        } else {
                            wr[nn - 1] = x + p;
                            wr[nn] = x + p;
                            wi[nn - 1] = -z;
                            wi[nn] = z;
                        }
                        nn -= 2;
                    } else {
                        if its == MAX_QR_ITERATIONS {
                            return None;
                        }
                        if its == 10 || its == 20 || its == 40 {
                            // Exceptional shift.
                            t += x;
                            for i in 1..=nn {
                                self[(i, i)] -= x;
                            }
                            let s = self[(nn, nn - 1)].abs() + self[(nn - 1, nn - 2)].abs();
                            x = 0.75 * s;
                            y = x;
                            w = -0.4375 * s * s;
                        }
                        its += 1;
                        // Look for two consecutive small subdiagonal elements.
                        let mut m = nn - 2;
                        let (mut p, mut q, mut r);
                        loop {
                            let z = self[(m, m)];
                            r = x - z;
                            let s = y - z;
                            p = (r * s - w) / self[(m + 1, m)] + self[(m, m + 1)];
                            q = self[(m + 1, m + 1)] - z - r - s;
                            r = self[(m + 2, m + 1)];
                            let s = p.abs() + q.abs() + r.abs();
                            p /= s;
                            q /= s;
                            r /= s;
                            if m == l {
                                break;
                            }
                            let u = self[(m, m - 1)].abs() * (q.abs() + r.abs());
                            let v = p.abs()
                                * (self[(m - 1, m - 1)].abs()
                                    + z.abs()
                                    + self[(m + 1, m + 1)].abs());
                            if u + v == v {
                                break;
                            }
                            m -= 1;
                        }
                        for i in (m + 2)..=nn {
                            self[(i, i - 2)] = 0.0;
                            if i != m + 2 {
                                self[(i, i - 3)] = 0.0;
                            }
                        }
                        // Double QR step on rows l..nn and columns m..nn.
                        for k in m..nn {
                            if k != m {
                                p = self[(k, k - 1)];
                                q = self[(k + 1, k - 1)];
                                r = 0.0;
                                if k != nn - 1 {
                                    r = self[(k + 2, k - 1)];
                                }
                                x = p.abs() + q.abs() + r.abs();
                                if x != 0.0 {
                                    p /= x;
                                    q /= x;
                                    r /= x;
                                }
                            }
                            let s = sign((p * p + q * q + r * r).sqrt(), p);
                            if s != 0.0 {
                                if k == m {
                                    if l != m {
                                        self[(k, k - 1)] = -self[(k, k - 1)];
                                    }
                                } else {
                                    self[(k, k - 1)] = -s * x;
                                }
                                p += s;
                                x = p / s;
                                y = q / s;
                                let z = r / s;
                                q /= p;
                                r /= p;
                                for j in k..=nn {
                                    let mut p = self[(k, j)] + q * self[(k + 1, j)];
                                    if k != nn - 1 {
                                        p += r * self[(k + 2, j)];
                                        self[(k + 2, j)] -= p * z;
                                    }
                                    self[(k + 1, j)] -= p * y;
                                    self[(k, j)] -= p * x;
                                }
                                let mmin = if nn < k + 3 { nn } else { k + 3 };
                                for i in l..=mmin {
                                    let mut p = x * self[(i, k)] + y * self[(i, k + 1)];
                                    if k != nn - 1 {
                                        p += z * self[(i, k + 2)];
                                        self[(i, k + 2)] -= p * r;
                                    }
                                    self[(i, k + 1)] -= p * q;
                                    self[(i, k)] -= p;
                                }
                            }
                        }
                    }
                }
                if l + 1 >= nn {
                    break;
                }
            }
        }
        Some((1..=n).map(|i| (wr[i], wi[i])).collect())
    }
}
