// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::{Mul, Range};

use crate::{
    Affine, Line, Nearest, ParamCurve, ParamCurveArclen, ParamCurveCurvature, ParamCurveDeriv,
    ParamCurveNearest, Point, QuadBez,
};

/// Number of uniform samples used to seed the nearest point search.
const NEAREST_SAMPLES: usize = 16;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline(always)]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// The cubic with the same trace as a line, parametrized uniformly.
    #[inline]
    pub fn from_line(line: Line) -> CubicBez {
        CubicBez::new(
            line.p0,
            line.p0.lerp(line.p1, 1.0 / 3.0),
            line.p0.lerp(line.p1, 2.0 / 3.0),
            line.p1,
        )
    }

    /// Returns a cubic Bézier segment that exactly represents this one,
    /// but runs in the opposite direction.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> CubicBez {
        CubicBez {
            p0: self.p3,
            p1: self.p2,
            p2: self.p1,
            p3: self.p0,
        }
    }

    /// The length of the control polygon.
    ///
    /// This is an upper bound for the arc length, and cheap to compute.
    #[inline]
    pub fn polygon_len(&self) -> f64 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Is this cubic Bézier curve [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p3 = self.eval(t1);
        let d = self.deriv();
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + scale * d.eval(t0).to_vec2();
        let p2 = p3 - scale * d.eval(t1).to_vec2();
        CubicBez { p0, p1, p2, p3 }
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        let pm = self.eval(0.5);
        (
            CubicBez::new(
                self.p0,
                self.p0.midpoint(self.p1),
                ((self.p0.to_vec2() + self.p1.to_vec2() * 2.0 + self.p2.to_vec2()) * 0.25)
                    .to_point(),
                pm,
            ),
            CubicBez::new(
                pm,
                ((self.p1.to_vec2() + self.p2.to_vec2() * 2.0 + self.p3.to_vec2()) * 0.25)
                    .to_point(),
                self.p2.midpoint(self.p3),
                self.p3,
            ),
        )
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p3
    }
}

impl ParamCurveDeriv for CubicBez {
    type DerivResult = QuadBez;

    #[inline]
    fn deriv(&self) -> QuadBez {
        QuadBez::new(
            (3.0 * (self.p1 - self.p0)).to_point(),
            (3.0 * (self.p2 - self.p1)).to_point(),
            (3.0 * (self.p3 - self.p2)).to_point(),
        )
    }
}

impl ParamCurveArclen for CubicBez {
    /// Arclength of a cubic Bézier segment.
    ///
    /// This algorithm is based on "Adaptive subdivision and the length and
    /// energy of Bézier curves" by Jens Gravesen.
    fn arclen(&self, accuracy: f64) -> f64 {
        // Estimate for a single segment.
        fn calc_l0(c: &CubicBez) -> f64 {
            let lc = (c.p3 - c.p0).hypot();
            let lp = c.polygon_len();
            (lc + lp) * 0.5
        }
        const MAX_DEPTH: usize = 16;
        fn rec(c: &CubicBez, l0: f64, accuracy: f64, depth: usize) -> f64 {
            let (c0, c1) = c.subdivide();
            let l0_c0 = calc_l0(&c0);
            let l0_c1 = calc_l0(&c1);
            let l1 = l0_c0 + l0_c1;
            let error = (l0 - l1) * (1.0 / 15.0);
            if error.abs() < accuracy || depth == MAX_DEPTH {
                l1 - error
            } else {
                rec(&c0, l0_c0, accuracy * 0.5, depth + 1)
                    + rec(&c1, l0_c1, accuracy * 0.5, depth + 1)
            }
        }
        rec(self, calc_l0(self), accuracy, 0)
    }
}

impl ParamCurveNearest for CubicBez {
    /// Find the nearest point by sampling, then refining with Newton's
    /// method on the squared distance.
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        let mut best = Nearest {
            distance_sq: p.distance_squared(self.p0),
            t: 0.0,
        };
        for i in 1..=NEAREST_SAMPLES {
            let t = i as f64 / NEAREST_SAMPLES as f64;
            let distance_sq = p.distance_squared(self.eval(t));
            if distance_sq < best.distance_sq {
                best = Nearest { distance_sq, t };
            }
        }
        let d = self.deriv();
        let dd = d.deriv();
        let mut t = best.t;
        for _ in 0..16 {
            let r = self.eval(t) - p;
            let v = d.eval(t).to_vec2();
            let a = dd.eval(t).to_vec2();
            let f = r.dot(v);
            let df = v.hypot2() + r.dot(a);
            if df <= 0.0 {
                break;
            }
            let next_t = (t - f / df).clamp(0.0, 1.0);
            let moved = (next_t - t).abs() * v.hypot();
            t = next_t;
            if moved < 1e-3 * accuracy {
                break;
            }
        }
        let distance_sq = p.distance_squared(self.eval(t));
        if distance_sq < best.distance_sq {
            best = Nearest { distance_sq, t };
        }
        best
    }
}

impl ParamCurveCurvature for CubicBez {}

impl Mul<CubicBez> for Affine {
    type Output = CubicBez;

    #[inline]
    fn mul(self, c: CubicBez) -> CubicBez {
        CubicBez {
            p0: self * c.p0,
            p1: self * c.p1,
            p2: self * c.p2,
            p3: self * c.p3,
        }
    }
}
