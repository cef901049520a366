// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path segments: the straight or cubic pieces a subpath is made of.

use alloc::vec::Vec;
use core::ops::{Mul, Range};

use crate::{
    Affine, CubicBez, Line, Nearest, ParamCurve, ParamCurveArclen, ParamCurveCurvature,
    ParamCurveDeriv, ParamCurveNearest, Point, Vec2,
};

/// Speeds below this fraction of the control polygon length are treated as
/// zero, making the tangent and the curvature undefined at that parameter.
const SPEED_EPSILON: f64 = 1e-9;

/// A segment of a subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

impl PathSeg {
    /// Returns a new `PathSeg` describing the same path as `self`, but with
    /// the points reversed.
    #[must_use]
    pub fn reverse(&self) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.reversed()),
            PathSeg::Cubic(c) => PathSeg::Cubic(c.reversed()),
        }
    }

    /// Convert this segment to a cubic Bézier.
    pub fn to_cubic(&self) -> CubicBez {
        match *self {
            PathSeg::Line(line) => CubicBez::from_line(line),
            PathSeg::Cubic(c) => c,
        }
    }

    /// The length of the control polygon, an upper bound for the arc length.
    pub fn polygon_len(&self) -> f64 {
        match self {
            PathSeg::Line(line) => line.length(),
            PathSeg::Cubic(c) => c.polygon_len(),
        }
    }

    /// Whether the segment is too short to carry any geometry.
    ///
    /// This looks at the control polygon, so a cubic with a short chord but
    /// far-reaching control points is not degenerate.
    #[inline]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.polygon_len() < epsilon
    }

    /// The same segment with its start point moved to `p`.
    ///
    /// For a cubic the first control point moves along, preserving the
    /// start tangent.
    #[must_use]
    pub fn with_start(&self, p: Point) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(Line::new(p, line.p1)),
            PathSeg::Cubic(c) => {
                PathSeg::Cubic(CubicBez::new(p, c.p1 + (p - c.p0), c.p2, c.p3))
            }
        }
    }

    /// The same segment with its end point moved to `p`.
    #[must_use]
    pub fn with_end(&self, p: Point) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(Line::new(line.p0, p)),
            PathSeg::Cubic(c) => {
                PathSeg::Cubic(CubicBez::new(c.p0, c.p1, c.p2 + (p - c.p3), p))
            }
        }
    }

    /// The velocity at `t`, or `None` where it is too small to define a
    /// direction.
    fn velocity(&self, t: f64) -> Option<Vec2> {
        let v = match self {
            PathSeg::Line(line) => line.p1 - line.p0,
            PathSeg::Cubic(c) => c.deriv().eval(t).to_vec2(),
        };
        let min_speed = SPEED_EPSILON * self.polygon_len();
        (v.hypot() > min_speed && v.is_finite()).then_some(v)
    }

    /// The unit tangent at `t`.
    ///
    /// At the ends of a cubic whose control point coincides with the end
    /// point, the direction of the limit is used instead. Elsewhere a
    /// vanishing derivative gives `None`.
    pub fn tangent(&self, t: f64) -> Option<Vec2> {
        if let Some(v) = self.velocity(t) {
            return Some(v.normalize());
        }
        let PathSeg::Cubic(c) = self else {
            return None;
        };
        let limit = if t <= 0.0 {
            [c.p2 - c.p0, c.p3 - c.p0]
        } else if t >= 1.0 {
            [c.p3 - c.p1, c.p3 - c.p0]
        } else {
            return None;
        };
        let min_len = SPEED_EPSILON * c.polygon_len();
        limit
            .into_iter()
            .find(|v| v.hypot() > min_len)
            .map(Vec2::normalize)
    }

    /// The signed curvature at `t`, positive for left turns.
    ///
    /// Returns `None` where the derivative vanishes.
    pub fn curvature(&self, t: f64) -> Option<f64> {
        match self {
            PathSeg::Line(line) => line.is_finite().then_some(0.0),
            PathSeg::Cubic(c) => {
                self.velocity(t)?;
                let k = c.curvature(t);
                k.is_finite().then_some(k)
            }
        }
    }

    /// The signed radius of curvature at `t`.
    ///
    /// Returns `None` on straight pieces as well as where the curvature is
    /// undefined.
    pub fn radius(&self, t: f64) -> Option<f64> {
        self.curvature(t)
            .filter(|&k| k != 0.0)
            .map(|k| k.recip())
    }

    /// The local frame at `t`: origin on the curve, x axis along the
    /// tangent, y axis along the left normal.
    pub fn frame(&self, t: f64) -> Option<Affine> {
        self.tangent(t).map(|u| Affine::frame(self.eval(t), u))
    }

    /// Split at increasing parameters, returning the pieces in between.
    ///
    /// Parameters are clamped to `[0, 1]`; consecutive equal parameters give
    /// empty pieces, which are skipped.
    pub fn split_at(&self, params: &[f64]) -> Vec<PathSeg> {
        let mut pieces = Vec::with_capacity(params.len() + 1);
        let mut t0 = 0.0;
        for &t in params.iter().chain(core::iter::once(&1.0)) {
            let t = t.clamp(t0, 1.0);
            if t > t0 {
                pieces.push(self.subsegment(t0..t));
            }
            t0 = t;
        }
        pieces
    }
}

impl From<Line> for PathSeg {
    #[inline(always)]
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<CubicBez> for PathSeg {
    #[inline(always)]
    fn from(c: CubicBez) -> PathSeg {
        PathSeg::Cubic(c)
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.arclen(accuracy),
            PathSeg::Cubic(cubic) => cubic.arclen(accuracy),
        }
    }

    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64 {
        match *self {
            PathSeg::Line(line) => line.inv_arclen(arclen, accuracy),
            PathSeg::Cubic(cubic) => cubic.inv_arclen(arclen, accuracy),
        }
    }
}

impl ParamCurveNearest for PathSeg {
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        match *self {
            PathSeg::Line(line) => line.nearest(p, accuracy),
            PathSeg::Cubic(cubic) => cubic.nearest(p, accuracy),
        }
    }
}

impl Mul<PathSeg> for Affine {
    type Output = PathSeg;

    fn mul(self, other: PathSeg) -> PathSeg {
        match other {
            PathSeg::Line(line) => PathSeg::Line(self * line),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(self * cubic),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, Line, ParamCurve, PathSeg, Point, Vec2};

    #[test]
    fn tangent_fallback_at_collapsed_control_points() {
        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (2.0, 0.0)));
        let t0 = c.tangent(0.0).unwrap();
        assert!((t0 - Vec2::new(1.0, 1.0).normalize()).hypot() < 1e-12);
        assert!(c.curvature(0.0).is_none());
        assert!(c.tangent(0.5).is_some());

        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (2.0, 0.0)));
        let t1 = c.tangent(1.0).unwrap();
        assert!((t1 - Vec2::new(1.0, -1.0).normalize()).hypot() < 1e-12);
    }

    #[test]
    fn cusp_has_no_tangent() {
        // Symmetric cusp at t = 0.5.
        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)));
        assert!(c.tangent(0.5).is_none());
        assert!(c.curvature(0.5).is_none());
        assert!(c.tangent(0.4).is_some());
    }

    #[test]
    fn line_frame_and_radius() {
        let l = PathSeg::Line(Line::new((0.0, 0.0), (0.0, 2.0)));
        assert_eq!(l.curvature(0.3), Some(0.0));
        assert_eq!(l.radius(0.3), None);
        let frame = l.frame(0.5).unwrap();
        let p = frame * Point::new(0.0, 1.0);
        assert!(p.distance(Point::new(-1.0, 1.0)) < 1e-12);
    }

    #[test]
    fn move_endpoints() {
        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)));
        let moved = c.with_start(Point::new(0.0, 0.5)).with_end(Point::new(3.0, 0.5));
        assert_eq!(moved.start(), Point::new(0.0, 0.5));
        assert_eq!(moved.end(), Point::new(3.0, 0.5));
        assert!((moved.tangent(0.0).unwrap() - c.tangent(0.0).unwrap()).hypot() < 1e-12);
        assert!(c.reverse().reverse() == c);
    }

    #[test]
    fn split_pieces() {
        let l = PathSeg::Line(Line::new((0.0, 0.0), (4.0, 0.0)));
        let pieces = l.split_at(&[0.25, 0.25, 0.5]);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].end(), Point::new(1.0, 0.0));
        assert_eq!(pieces[2].start(), Point::new(2.0, 0.0));
        assert!(!l.is_degenerate(1e-5));
        assert!(PathSeg::Line(Line::new((0.0, 0.0), (1e-6, 0.0))).is_degenerate(1e-5));
    }
}
