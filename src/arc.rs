// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular arcs.

use core::f64::consts::{PI, TAU};

use crate::{CubicBez, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single circular arc segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radius.
    pub radius: f64,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    ///
    /// Positive values run counterclockwise.
    pub sweep_angle: f64,
}

impl Arc {
    /// Create a new `Arc`.
    #[inline(always)]
    pub fn new(center: impl Into<Point>, radius: f64, start_angle: f64, sweep_angle: f64) -> Arc {
        Arc {
            center: center.into(),
            radius,
            start_angle,
            sweep_angle,
        }
    }

    /// The arc around `center` from the direction of `from` to the
    /// direction of `to`.
    ///
    /// The sweep is chosen in `[0, 2π)` when running counterclockwise and in
    /// `(-2π, 0]` when running clockwise, so coincident directions give an
    /// empty arc.
    pub fn from_endpoints(center: Point, radius: f64, from: Point, to: Point, clockwise: bool) -> Arc {
        let start_angle = (from - center).atan2();
        let end_angle = (to - center).atan2();
        let mut sweep = (end_angle - start_angle) % TAU;
        if clockwise {
            if sweep > 0.0 {
                sweep -= TAU;
            }
        } else if sweep < 0.0 {
            sweep += TAU;
        }
        Arc::new(center, radius, start_angle, sweep)
    }

    /// The point at a given angle on the arc's circle.
    #[inline]
    pub fn point_at(&self, angle: f64) -> Point {
        self.center + self.radius * Vec2::from_angle(angle)
    }

    /// The start point.
    #[inline]
    pub fn start(&self) -> Point {
        self.point_at(self.start_angle)
    }

    /// The end point.
    #[inline]
    pub fn end(&self) -> Point {
        self.point_at(self.start_angle + self.sweep_angle)
    }

    /// Create an iterator generating cubic Bézier approximations of the arc.
    ///
    /// The number of cubics is chosen so that the approximation error stays
    /// below `tolerance`, but no cubic spans more than a quarter circle.
    pub fn cubics(&self, tolerance: f64) -> ArcCubics {
        let scaled_err = self.radius.abs() / tolerance;
        // Number of subdivisions per circle based on error tolerance.
        // Note: this may slightly underestimate the error for quadrants.
        let n_err = (1.1163 * scaled_err).powf(1.0 / 6.0).max(3.999_999);
        let n = (n_err * self.sweep_angle.abs() * (1.0 / (2.0 * PI))).ceil();
        let angle_step = self.sweep_angle / n;
        let n = if n.is_finite() { n as usize } else { 0 };
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).abs().tan() * self.sweep_angle.signum();
        ArcCubics {
            idx: 0,
            arc: *self,
            n,
            arm_len,
            angle_step,
            angle0: self.start_angle,
        }
    }
}

/// An iterator over the cubic Béziers approximating an [`Arc`].
///
/// Created by [`Arc::cubics`].
#[derive(Clone, Debug)]
pub struct ArcCubics {
    idx: usize,
    arc: Arc,
    n: usize,
    arm_len: f64,
    angle_step: f64,
    angle0: f64,
}

impl Iterator for ArcCubics {
    type Item = CubicBez;

    fn next(&mut self) -> Option<CubicBez> {
        if self.idx >= self.n {
            return None;
        }
        let angle1 = self.angle0 + self.angle_step;
        let r = self.arc.radius;
        let p0 = self.arc.point_at(self.angle0);
        let p1 = p0 + self.arm_len * r * Vec2::from_angle(self.angle0).turn_90();
        let p3 = self.arc.point_at(angle1);
        let p2 = p3 - self.arm_len * r * Vec2::from_angle(angle1).turn_90();
        self.angle0 = angle1;
        self.idx += 1;
        Some(CubicBez::new(p0, p1, p2, p3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParamCurve, ParamCurveCurvature};

    #[test]
    fn arc_cubics_stay_on_circle() {
        let arc = Arc::new((1.0, 2.0), 3.0, 0.3, 2.5);
        let cubics: Vec<_> = arc.cubics(1e-6).collect();
        assert!(cubics.len() >= 2);
        assert!(cubics[0].start().distance(arc.start()) < 1e-12);
        assert!(cubics.last().unwrap().end().distance(arc.end()) < 1e-9);
        for c in &cubics {
            for i in 0..=10 {
                let p = c.eval(i as f64 / 10.0);
                assert!((p.distance(arc.center) - 3.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn arc_direction() {
        let center = Point::ORIGIN;
        let from = Point::new(1.0, 0.0);
        let to = Point::new(0.0, 1.0);
        let ccw = Arc::from_endpoints(center, 1.0, from, to, false);
        assert!((ccw.sweep_angle - PI / 2.0).abs() < 1e-12);
        let cw = Arc::from_endpoints(center, 1.0, from, to, true);
        assert!((cw.sweep_angle + 3.0 * PI / 2.0).abs() < 1e-12);
        for c in cw.cubics(1e-6) {
            assert!(c.curvature(0.5) < 0.0);
        }
        for c in ccw.cubics(1e-6) {
            assert!(c.curvature(0.5) > 0.0);
        }
        assert_eq!(Arc::from_endpoints(center, 1.0, from, from, true).cubics(1e-6).count(), 0);
    }
}
