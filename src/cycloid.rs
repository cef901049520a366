// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping a cycloid around a path.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::deform::invalid;
use crate::{
    Affine, CubicBez, DeformError, Deformer, Path, Point, SegParam, Subpath, Vec2, WarningKind,
    CM,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The side of the base path a deformation starts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Left of the direction of travel.
    #[default]
    Left,
    /// Right of the direction of travel.
    Right,
}

impl Side {
    /// `1.0` for the left side, `-1.0` for the right side.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Configuration of a [`Cycloid`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycloidParams {
    /// Radius of the loops.
    pub radius: f64,
    /// Number of half loops along the path.
    pub halfloops: usize,
    /// Number of cubics per half loop.
    pub curves_per_halfloop: usize,
    /// Length at the start of the path left undeformed.
    pub skip_first: f64,
    /// Length at the end of the path left undeformed.
    pub skip_last: f64,
    /// Perspective angle of the loops, in radians: 0 gives a flat
    /// sinusoid, angles towards π/2 give stacked circles.
    pub turn_angle: f64,
    /// The side the first loop starts towards.
    pub side: Side,
}

impl Default for CycloidParams {
    fn default() -> Self {
        CycloidParams {
            radius: 0.5 * CM,
            halfloops: 10,
            curves_per_halfloop: 3,
            skip_first: CM,
            skip_last: CM,
            turn_angle: FRAC_PI_4,
            side: Side::Left,
        }
    }
}

impl CycloidParams {
    /// Builder method for setting the loop radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Builder method for setting the number of half loops.
    pub fn with_halfloops(mut self, halfloops: usize) -> Self {
        self.halfloops = halfloops;
        self
    }

    /// Builder method for setting the number of cubics per half loop.
    pub fn with_curves_per_halfloop(mut self, n: usize) -> Self {
        self.curves_per_halfloop = n;
        self
    }

    /// Builder method for setting both undeformed end lengths.
    pub fn with_skip(mut self, first: f64, last: f64) -> Self {
        self.skip_first = first;
        self.skip_last = last;
        self
    }

    /// Builder method for setting the perspective angle, in radians.
    pub fn with_turn_angle(mut self, angle: f64) -> Self {
        self.turn_angle = angle;
        self
    }

    /// Builder method for setting the starting side.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

/// A deformer turning a path into a spring wound around it.
///
/// The loops are distributed evenly over the arc length between the
/// undeformed ends. Closed subpaths are treated as open, and so is the
/// result.
#[derive(Clone, Copy, Debug)]
pub struct Cycloid {
    params: CycloidParams,
}

impl Cycloid {
    /// Create a cycloid deformer.
    ///
    /// Negative lengths are taken by their absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`DeformError::InvalidParameter`] for non-finite lengths, zero
    /// loops or cubics per loop, and turn angles outside `[0, π/2)`.
    pub fn new(params: CycloidParams) -> Result<Cycloid, DeformError> {
        if !params.radius.is_finite() {
            return Err(invalid("radius", "must be finite"));
        }
        if params.halfloops == 0 {
            return Err(invalid("halfloops", "must be at least 1"));
        }
        if params.curves_per_halfloop == 0 {
            return Err(invalid("curves_per_halfloop", "must be at least 1"));
        }
        if !params.skip_first.is_finite() || !params.skip_last.is_finite() {
            return Err(invalid("skip", "must be finite"));
        }
        if !(0.0..FRAC_PI_2).contains(&params.turn_angle) {
            return Err(invalid("turn_angle", "must be in [0, π/2)"));
        }
        Ok(Cycloid { params })
    }

    /// The configuration.
    pub fn params(&self) -> &CycloidParams {
        &self.params
    }
}

/// A point of the cycloid with the control points before and after it.
struct Knot {
    pre: Point,
    base: Point,
    post: Point,
}

impl Deformer for Cycloid {
    fn deform_subpath(&self, subpath: &Subpath, warnings: &mut Vec<WarningKind>) -> Path {
        let p = &self.params;
        let eps = subpath.epsilon();
        let radius = p.radius.abs();
        let skip_first = p.skip_first.abs();
        let skip_last = p.skip_last.abs();
        let (sin_turn, cos_turn) = p.turn_angle.sin_cos();

        let total = subpath.arclen();
        let usable = total - skip_first - skip_last - 2.0 * radius * sin_turn;
        if usable <= 0.0 || subpath.is_empty() {
            warnings.push(WarningKind::TooShort);
            return subpath.clone().into();
        }

        // The loops are parametrized by the rotation angle around the path.
        let n = p.halfloops * p.curves_per_halfloop;
        let dphi = PI / p.curves_per_halfloop as f64;
        let dz_dphi = usable / (p.halfloops as f64 * PI * cos_turn);
        // Arm length of an arc of angle `dphi`.
        let arm = 4.0 * radius * (1.0 - (0.5 * dphi).cos()) / (3.0 * (0.5 * dphi).sin());
        let sign = p.side.sign();

        let mut knots = Vec::with_capacity(n + 1);
        let mut params = Vec::with_capacity(n + 1);
        let mut last_tangent = Vec2::new(1.0, 0.0);
        for i in 0..=n {
            let phi = i as f64 * dphi;
            // Arc length of the projected loop point.
            let z = skip_first + radius * sin_turn - sin_turn * radius * phi.cos()
                + cos_turn * dz_dphi * phi;
            let param = subpath.param_at_arclen(z);
            params.push(param);
            let tangent = subpath.tangent(param).unwrap_or(last_tangent);
            last_tangent = tangent;
            let Some(origin) = subpath.eval(param) else {
                continue;
            };
            let frame = Affine::frame(origin, tangent);

            let (sin_phi, cos_phi) = phi.sin_cos();
            let base_y = sign * radius * sin_phi;
            // Direction of the loop in local coordinates; the component
            // out of the plane only enters the normalization.
            let tx = -cos_turn * radius * sin_phi + sin_turn * dz_dphi;
            let ty = sign * radius * cos_phi;
            let tz = sin_turn * radius * sin_phi + dz_dphi * cos_turn;
            let norm = (tx * tx + ty * ty + tz * tz).sqrt();
            let dir = Vec2::new(tz / norm, ty / norm);

            // Shorten the arms on the inside of bends.
            let factor = subpath
                .curvature(param)
                .map_or(1.0, |k| (1.0 - k * base_y).abs());
            let l = arm * factor;

            let base = Point::new(0.0, base_y);
            knots.push(Knot {
                pre: frame * (base - l * dir),
                base: frame * base,
                post: frame * (base + l * dir),
            });
        }
        if knots.len() <= 1 {
            warnings.push(WarningKind::TooShort);
            return subpath.clone().into();
        }

        let mut result = Subpath::new(eps);
        if skip_first > eps {
            let head = subpath.slice(SegParam::new(0, 0.0), params[0]);
            result.extend(head.segments().iter().copied());
        }
        for pair in knots.windows(2) {
            result.curve_to(CubicBez::new(pair[0].base, pair[0].post, pair[1].pre, pair[1].base));
        }
        if skip_last > eps {
            if let Some(&last) = params.last() {
                let tail = subpath.slice(last, subpath.end_param());
                result.extend(tail.segments().iter().copied());
            }
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Line, ParamCurve};

    fn line(len: f64) -> Subpath {
        Subpath::from_segments([Line::new((0.0, 0.0), (len, 0.0)).into()], false, 1e-5)
    }

    fn flat(halfloops: usize, cph: usize) -> Cycloid {
        Cycloid::new(
            CycloidParams::default()
                .with_radius(0.5)
                .with_halfloops(halfloops)
                .with_curves_per_halfloop(cph)
                .with_skip(0.0, 0.0)
                .with_turn_angle(0.0),
        )
        .unwrap()
    }

    #[test]
    fn validation() {
        assert!(Cycloid::new(CycloidParams::default()).is_ok());
        assert!(Cycloid::new(CycloidParams::default().with_halfloops(0)).is_err());
        assert!(Cycloid::new(CycloidParams::default().with_curves_per_halfloop(0)).is_err());
        assert!(Cycloid::new(CycloidParams::default().with_turn_angle(FRAC_PI_2)).is_err());
        assert!(Cycloid::new(CycloidParams::default().with_radius(f64::NAN)).is_err());
        assert!(Cycloid::new(CycloidParams::default().with_skip(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn sinusoid_along_line() {
        let base = line(10.0);
        let mut warnings = Vec::new();
        let out = flat(4, 4).deform_subpath(&base, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(out.len(), 1);
        let sp = &out.subpaths()[0];
        assert_eq!(sp.len(), 16);
        assert!(sp.start().unwrap().distance(Point::new(0.0, 0.0)) < 1e-9);
        assert!(sp.end().unwrap().distance(Point::new(10.0, 0.0)) < 1e-9);
        assert!(sp.arclen() > 10.0);
        // The first loop bulges to the left, with the loop radius.
        let top = sp.segments()[1].end();
        assert!((top.y - 0.5).abs() < 1e-9, "{top:?}");
        for seg in sp.segments() {
            for i in 0..=8 {
                let y = seg.eval(i as f64 / 8.0).y;
                assert!(y.abs() < 0.5 + 1e-2);
            }
        }
    }

    #[test]
    fn right_side_mirrors() {
        let base = line(10.0);
        let c = Cycloid::new(*flat(4, 4).params()).unwrap();
        let right = Cycloid::new(c.params().with_side(Side::Right)).unwrap();
        let l = c.deform_subpath(&base, &mut Vec::new());
        let r = right.deform_subpath(&base, &mut Vec::new());
        let (l, r) = (&l.subpaths()[0], &r.subpaths()[0]);
        for (a, b) in l.segments().iter().zip(r.segments()) {
            let (pa, pb) = (a.eval(0.3), b.eval(0.3));
            assert!((pa.x - pb.x).abs() < 1e-9 && (pa.y + pb.y).abs() < 1e-9);
        }
    }

    #[test]
    fn skips_keep_ends() {
        let base = line(20.0);
        let c = Cycloid::new(
            CycloidParams::default()
                .with_radius(0.5)
                .with_halfloops(5)
                .with_skip(2.0, 3.0)
                .with_turn_angle(0.0),
        )
        .unwrap();
        let out = c.deform(&base.into());
        assert!(out.warnings.is_empty());
        let sp = &out.path.subpaths()[0];
        assert_eq!(sp.len(), 1 + 5 * 3 + 1);
        assert!(sp.segments()[0].end().distance(Point::new(2.0, 0.0)) < 1e-9);
        assert!(sp.segments()[16].start().distance(Point::new(17.0, 0.0)) < 1e-9);
        assert_eq!(sp.end(), Some(Point::new(20.0, 0.0)));
    }

    #[test]
    fn too_short_is_unchanged() {
        let base = line(1.0);
        let out = Cycloid::new(CycloidParams::default()).unwrap().deform(&base.clone().into());
        assert_eq!(out.path.subpaths(), &[base]);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, WarningKind::TooShort);
    }

    #[test]
    fn follows_a_circle() {
        let circle = Subpath::circle(Point::ORIGIN, 10.0, 1e-6);
        let c = Cycloid::new(
            CycloidParams::default()
                .with_radius(1.0)
                .with_halfloops(20)
                .with_skip(0.0, 0.0),
        )
        .unwrap();
        let out = c.deform(&circle.into());
        assert!(out.warnings.is_empty());
        let sp = &out.path.subpaths()[0];
        assert!(!sp.is_closed());
        for seg in sp.segments() {
            let r = seg.eval(0.5).to_vec2().hypot();
            assert!((9.0 - 1e-2..=11.0 + 1e-2).contains(&r), "{r}");
        }
    }
}
