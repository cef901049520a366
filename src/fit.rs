// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a cubic Bézier to prescribed end tangents and curvatures.
//!
//! A cubic with end points `A`, `B`, unit end tangents `ta`, `tb` and control
//! points `A + α·ta`, `B − β·tb` has curvature
//!
//! ```text
//! κa = 2/3 · (D − β·T) / (α·|α|)      κb = 2/3 · (E − α·T) / (β·|β|)
//! ```
//!
//! at its ends, where `T = ta × tb`, `D = ta × (B − A)` and
//! `E = tb × (A − B)`. Prescribing `κa` and `κb` gives two coupled quadratic
//! equations in the arm lengths. Eliminating one arm for each choice of
//! signs leaves a quartic, solved by [`real_poly_roots`].

use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::common::real_poly_roots;
use crate::{CubicBez, DeformError, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Threshold of the approximate closed forms, in units of the chord
/// length, tried when the general solution finds nothing.
const LOOSE_ZERO: f64 = 1e-2;

/// Relative residual accepted when checking a candidate against the two
/// curvature equations.
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Smallest tolerance handed to the root solver, so that nearly double
/// roots of the quartics still reach the residual check.
const MIN_ROOT_EPSILON: f64 = 1e-5;

/// Sines of angles below this make two rays parallel.
const MIN_SINE: f64 = 1e-12;

/// Signed lengths of the two control arms of a cubic Bézier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlArms {
    /// Distance from the start point to the first control point.
    pub start: f64,
    /// Distance from the end point to the second control point.
    pub end: f64,
}

impl ControlArms {
    /// Create a new pair of arm lengths.
    #[inline(always)]
    pub const fn new(start: f64, end: f64) -> ControlArms {
        ControlArms { start, end }
    }

    /// Whether neither arm points backwards.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.start >= 0.0 && self.end >= 0.0
    }

    /// Build the cubic with these arms.
    ///
    /// `ta` and `tb` are the unit tangents in the direction of travel at
    /// `a` and `b`.
    pub fn to_cubic(&self, a: Point, ta: Vec2, b: Point, tb: Vec2) -> CubicBez {
        CubicBez::new(a, a + self.start * ta, b - self.end * tb, b)
    }
}

/// Arm lengths of cubic Béziers from `a` to `b` with the given unit
/// tangents and signed curvatures at the ends.
///
/// `epsilon` is the length below which two points are the same. It decides
/// when the tangents count as parallel, when a curvature counts as zero and
/// when an end lies on the other end's tangent, all measured over the
/// chord from `a` to `b`.
///
/// Every pair returned satisfies both curvature conditions. Pairs with two
/// non-negative arms come first; within each group, pairs are ordered by
/// the sum of the squared arms.
///
/// # Errors
///
/// Returns [`DeformError::Unsolvable`] when no pair of arms gives the
/// requested curvatures, or the input is not finite.
pub fn fit_control_arms(
    a: Point,
    ta: Vec2,
    kappa_a: f64,
    b: Point,
    tb: Vec2,
    kappa_b: f64,
    epsilon: f64,
) -> Result<SmallVec<[ControlArms; 4]>, DeformError> {
    let chord = b - a;
    let ab = chord.hypot();
    if ab <= epsilon || !ab.is_finite() || !kappa_a.is_finite() || !kappa_b.is_finite() {
        return Err(DeformError::Unsolvable);
    }
    // The tolerance in units of the chord length.
    let zero = epsilon / ab;
    let ta = ta.normalize();
    let tb = tb.normalize();
    // Work in units of the chord length.
    let sys = System {
        t: ta.cross(tb),
        d: ta.cross(chord) / ab,
        e: tb.cross(-chord) / ab,
        ka: kappa_a * ab,
        kb: kappa_b * ab,
        zero,
    };
    if !sys.t.is_finite() || !sys.d.is_finite() || !sys.e.is_finite() {
        return Err(DeformError::Unsolvable);
    }

    let mut candidates: Vec<(f64, f64)> = Vec::new();
    if let Some(pair) = sys.closed_form(zero) {
        candidates.extend(pair);
    } else {
        sys.general(&mut candidates);
    }
    let mut arms: SmallVec<[ControlArms; 4]> = SmallVec::new();
    for (alpha, beta) in candidates {
        if !sys.satisfies(alpha, beta) {
            continue;
        }
        let dup = arms.iter().any(|c| {
            (c.start - alpha).abs() <= 1e-9 * (1.0 + alpha.abs())
                && (c.end - beta).abs() <= 1e-9 * (1.0 + beta.abs())
        });
        if !dup {
            arms.push(ControlArms::new(alpha, beta));
        }
    }
    if arms.is_empty() {
        if let Some(pair) = sys.closed_form(LOOSE_ZERO.max(zero)) {
            log::trace!("using approximate closed form for curvature fit");
            arms.extend(
                pair.into_iter()
                    .filter(|(alpha, beta)| alpha.is_finite() && beta.is_finite())
                    .map(|(alpha, beta)| ControlArms::new(alpha, beta)),
            );
        }
    }
    if arms.is_empty() {
        return Err(DeformError::Unsolvable);
    }
    arms.sort_by(rank);
    for arm in &mut arms {
        arm.start *= ab;
        arm.end *= ab;
    }
    Ok(arms)
}

fn rank(x: &ControlArms, y: &ControlArms) -> Ordering {
    y.is_positive().cmp(&x.is_positive()).then_with(|| {
        let nx = x.start * x.start + x.end * x.end;
        let ny = y.start * y.start + y.end * y.end;
        nx.total_cmp(&ny)
    })
}

/// The curvature equations in units of the chord length:
///
/// ```text
/// 1.5·ka·α·|α| + T·β = D
/// 1.5·kb·β·|β| + T·α = E
/// ```
struct System {
    t: f64,
    d: f64,
    e: f64,
    ka: f64,
    kb: f64,
    /// Length tolerance.
    zero: f64,
}

impl System {
    /// Solutions for the cases where the equations decouple, or `None`
    /// when they are fully coupled.
    fn closed_form(&self, zero: f64) -> Option<SmallVec<[(f64, f64); 1]>> {
        let mut out = SmallVec::new();
        if self.t.abs() <= zero {
            let alpha = decoupled_arm(self.d, self.ka, zero);
            let beta = decoupled_arm(self.e, self.kb, zero);
            if let (Some(alpha), Some(beta)) = (alpha, beta) {
                out.push((alpha, beta));
            }
        } else if self.ka.abs() <= zero {
            let beta = self.d / self.t;
            let alpha = (self.e - 1.5 * self.kb * beta * beta.abs()) / self.t;
            out.push((alpha, beta));
        } else if self.kb.abs() <= zero {
            let alpha = self.e / self.t;
            let beta = (self.d - 1.5 * self.ka * alpha * alpha.abs()) / self.t;
            out.push((alpha, beta));
        } else {
            return None;
        }
        Some(out)
    }

    /// Candidates from the quartics of every sign combination.
    fn general(&self, out: &mut Vec<(f64, f64)>) {
        let Self {
            t,
            d,
            e,
            ka,
            kb,
            zero,
        } = *self;
        let root_epsilon = zero.max(MIN_ROOT_EPSILON);
        let t2 = t * t;
        let t3 = t2 * t;
        for sa in [1.0, -1.0] {
            for sb in [1.0, -1.0] {
                let coeffs_a = [
                    1.5 * kb * sb * d * d - t2 * e,
                    t3,
                    -4.5 * ka * kb * sa * sb * d,
                    0.0,
                    3.375 * ka * ka * kb * sb,
                ];
                for alpha in real_poly_roots(&coeffs_a, root_epsilon) {
                    let beta = (d - 1.5 * ka * sa * alpha * alpha) / t;
                    if alpha * sa >= 0.0 && beta * sb >= 0.0 {
                        out.push((alpha, beta));
                    }
                }
                let coeffs_b = [
                    1.5 * ka * sa * e * e - t2 * d,
                    t3,
                    -4.5 * ka * kb * sa * sb * e,
                    0.0,
                    3.375 * kb * kb * ka * sa,
                ];
                for beta in real_poly_roots(&coeffs_b, root_epsilon) {
                    let alpha = (e - 1.5 * kb * sb * beta * beta) / t;
                    if alpha * sa >= 0.0 && beta * sb >= 0.0 {
                        out.push((alpha, beta));
                    }
                }
            }
        }
    }

    /// Check both equations with a residual relative to their terms, plus
    /// the length tolerance.
    fn satisfies(&self, alpha: f64, beta: f64) -> bool {
        if !alpha.is_finite() || !beta.is_finite() {
            return false;
        }
        let check = |k: f64, x: f64, y: f64, rhs: f64| {
            let quad = 1.5 * k * x * x.abs();
            let lin = self.t * y;
            let scale = quad.abs() + lin.abs() + rhs.abs();
            (quad + lin - rhs).abs() <= RESIDUAL_TOLERANCE * scale + self.zero
        };
        check(self.ka, alpha, beta, self.d) && check(self.kb, beta, alpha, self.e)
    }
}

/// Solve `1.5·k·x·|x| = rhs` for a single arm.
fn decoupled_arm(rhs: f64, k: f64, zero: f64) -> Option<f64> {
    if k.abs() <= zero {
        // Without curvature any arm works if the end is on the tangent.
        (rhs.abs() <= zero).then_some(1.0 / 3.0)
    } else {
        let x2 = rhs / (1.5 * k);
        Some(x2.signum() * x2.abs().sqrt())
    }
}

/// Where two rays `a + t·ta` and `b + s·tb` meet, as `(t, s)`.
///
/// Returns `None` for parallel rays.
pub fn ray_intersection(a: Point, ta: Vec2, b: Point, tb: Vec2) -> Option<(f64, f64)> {
    let det = ta.cross(tb);
    if det.abs() <= MIN_SINE * ta.hypot() * tb.hypot() {
        return None;
    }
    let w = b - a;
    Some((w.cross(tb) / det, w.cross(ta) / det))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::ParamCurveCurvature;

    const EPSILON: f64 = 1e-9;

    fn end_curvatures(c: &CubicBez) -> (f64, f64) {
        (c.curvature(0.0), c.curvature(1.0))
    }

    #[test]
    fn quarter_circle() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let ta = Vec2::new(0.0, 1.0);
        let tb = Vec2::new(-1.0, 0.0);
        let arms = fit_control_arms(a, ta, 1.0, b, tb, 1.0, EPSILON).unwrap();
        let best = arms[0];
        assert!(best.is_positive());
        // 1.5·α² + α = 1
        let expected = (7.0f64.sqrt() - 1.0) / 3.0;
        assert!((best.start - expected).abs() < 1e-9, "{best:?}");
        assert!((best.end - expected).abs() < 1e-9, "{best:?}");
        let (ka, kb) = end_curvatures(&best.to_cubic(a, ta, b, tb));
        assert!((ka - 1.0).abs() < 1e-9 && (kb - 1.0).abs() < 1e-9);
    }

    #[test]
    fn straight_ends() {
        // Zero curvature at both ends with crossing tangents.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let ta = Vec2::new(1.0, 1.0).normalize();
        let tb = Vec2::new(1.0, -1.0).normalize();
        let arms = fit_control_arms(a, ta, 0.0, b, tb, 0.0, EPSILON).unwrap();
        let c = arms[0].to_cubic(a, ta, b, tb);
        let (ka, kb) = end_curvatures(&c);
        assert!(ka.abs() < 1e-9 && kb.abs() < 1e-9);
        // Both control points sit on the tangent intersection.
        assert!(c.p1.distance(Point::new(1.0, 1.0)) < 1e-9);
        assert!(c.p2.distance(Point::new(1.0, 1.0)) < 1e-9);
    }

    #[test]
    fn parallel_tangents() {
        // An S-bend: parallel tangents decouple the equations.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 1.0);
        let t = Vec2::new(1.0, 0.0);
        let arms = fit_control_arms(a, t, 0.5, b, t, -0.5, EPSILON).unwrap();
        let c = arms[0].to_cubic(a, t, b, t);
        let (ka, kb) = end_curvatures(&c);
        assert!((ka - 0.5).abs() < 1e-9, "{ka}");
        assert!((kb + 0.5).abs() < 1e-9, "{kb}");

        // Straight and parallel: any arm, a third of the chord by convention.
        let b = Point::new(3.0, 0.0);
        let arms = fit_control_arms(a, t, 0.0, b, t, 0.0, EPSILON).unwrap();
        assert!((arms[0].start - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unsolvable() {
        let a = Point::new(0.0, 0.0);
        // Straight, parallel tangents, but the end is off the line.
        let b = Point::new(3.0, 1.0);
        let t = Vec2::new(1.0, 0.0);
        assert_eq!(fit_control_arms(a, t, 0.0, b, t, 0.0, EPSILON), Err(DeformError::Unsolvable));
        assert_eq!(fit_control_arms(a, t, 1.0, a, t, 1.0, EPSILON), Err(DeformError::Unsolvable));
        assert!(fit_control_arms(a, t, f64::NAN, b, t, 1.0, EPSILON).is_err());
    }

    #[test]
    fn tolerance_follows_epsilon() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 0.0);
        let t = Vec2::new(1.0, 0.0);
        // A faint curvature on a straight chord only counts as zero for a
        // coarse epsilon, which then picks the conventional third.
        let coarse = fit_control_arms(a, t, 1e-8, b, t, 1e-8, 1e-6).unwrap();
        assert!((coarse[0].start - 1.0).abs() < 1e-12, "{coarse:?}");
        let fine = fit_control_arms(a, t, 1e-8, b, t, 1e-8, EPSILON).unwrap();
        assert!(fine[0].start.abs() < 1e-12, "{fine:?}");

        // Ends closer than epsilon are the same point.
        let b = Point::new(1e-6, 0.0);
        assert!(fit_control_arms(a, t, 0.0, b, t, 0.0, EPSILON).is_ok());
        assert_eq!(fit_control_arms(a, t, 0.0, b, t, 0.0, 1e-5), Err(DeformError::Unsolvable));
    }

    #[test]
    fn ranking_puts_positive_first() {
        let mut arms = [
            ControlArms::new(-0.1, 0.1),
            ControlArms::new(2.0, 2.0),
            ControlArms::new(1.0, 0.5),
        ];
        arms.sort_by(rank);
        assert_eq!(arms[0], ControlArms::new(1.0, 0.5));
        assert_eq!(arms[1], ControlArms::new(2.0, 2.0));
        assert_eq!(arms[2], ControlArms::new(-0.1, 0.1));
    }

    #[test]
    fn random_curves_are_recovered() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let a = Point::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
            let len = rng.random_range(1.0..10.0);
            let dir = rng.random_range(-3.0..3.0);
            let b = a + len * Vec2::from_angle(dir);
            let ta = Vec2::from_angle(dir + rng.random_range(-1.0..1.0));
            let tb = Vec2::from_angle(dir + rng.random_range(-1.0..1.0));
            let alpha = len * rng.random_range(0.2..0.6);
            let beta = len * rng.random_range(0.2..0.6);
            let c = ControlArms::new(alpha, beta).to_cubic(a, ta, b, tb);
            let (ka, kb) = end_curvatures(&c);

            let arms = fit_control_arms(a, ta, ka, b, tb, kb, EPSILON).unwrap();
            assert!(
                arms.iter().any(|x| (x.start - alpha).abs() < 1e-6 * len
                    && (x.end - beta).abs() < 1e-6 * len),
                "({alpha}, {beta}) not among {arms:?}"
            );
            assert!(arms[0].is_positive());
            for x in arms.iter().filter(|x| x.start.abs().min(x.end.abs()) > 0.1 * len) {
                let (fa, fb) = end_curvatures(&x.to_cubic(a, ta, b, tb));
                assert!((fa - ka).abs() * len < 1e-4 * (1.0 + (ka * len).abs()));
                assert!((fb - kb).abs() * len < 1e-4 * (1.0 + (kb * len).abs()));
            }
        }
    }

    #[test]
    fn rays() {
        let (t, s) = ray_intersection(
            Point::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Point::new(2.0, -1.0),
            Vec2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 2.0).abs() < 1e-12 && (s - 1.0).abs() < 1e-12);
        assert!(ray_intersection(
            Point::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0)
        )
        .is_none());
    }
}
