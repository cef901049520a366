// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounding the corners of a path.

use alloc::vec::Vec;

use crate::deform::invalid;
use crate::fit::{fit_control_arms, ray_intersection};
use crate::{
    CubicBez, DeformError, Deformer, ParamCurve, ParamCurveArclen, Path, PathSeg, Point,
    Subpath, Vec2, WarningKind, CM,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The largest softness factor for which two cubics joining straight lines
/// keep a monotonic curvature.
const MAX_LINE_SOFTNESS: f64 = 0.3192;

/// Configuration of a [`Smoothed`] deformer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmoothedParams {
    /// Arc length from each corner to the points where the path is cut.
    pub radius: f64,
    /// Shape of corners between straight lines, from 0 (sharp) to 1.
    pub softness: f64,
    /// Keep the sign of the curvature at the cut points.
    ///
    /// When false, the sign is chosen so that the inserted curve bends
    /// towards the next cut point, and the arms are limited by the tangent
    /// intersection. This avoids overshooting loops at the price of a jump
    /// in curvature.
    pub obey_curvature: bool,
    /// Segments shorter than this fraction of `radius` are merged away
    /// before smoothing.
    pub rel_skip: f64,
}

impl Default for SmoothedParams {
    fn default() -> Self {
        SmoothedParams {
            radius: CM,
            softness: 1.0,
            obey_curvature: false,
            rel_skip: 0.01,
        }
    }
}

impl SmoothedParams {
    /// Create parameters with the given radius and default settings.
    pub fn new(radius: f64) -> Self {
        SmoothedParams {
            radius,
            ..Default::default()
        }
    }

    /// One of the standard radii, `1cm · √(2^k)`.
    ///
    /// `k = 0` is the default radius; negative values give sharper corners,
    /// positive values rounder ones. The usual range is `-6..=6`.
    pub fn preset(k: i32) -> Self {
        SmoothedParams::new(CM * 2.0f64.powf(0.5 * f64::from(k)))
    }

    /// Builder method for setting the softness of line corners.
    pub fn with_softness(mut self, softness: f64) -> Self {
        self.softness = softness;
        self
    }

    /// Builder method for keeping the sign of the curvature.
    pub fn with_obey_curvature(mut self, yes: bool) -> Self {
        self.obey_curvature = yes;
        self
    }

    /// Builder method for setting the relative skip length.
    pub fn with_rel_skip(mut self, rel_skip: f64) -> Self {
        self.rel_skip = rel_skip;
        self
    }
}

/// A deformer replacing corners by smooth curves.
///
/// Each segment is cut at arc length `radius` from both of its ends. Between
/// two cut points, a corner of two straight lines is replaced by a pair of
/// cubics with vanishing curvature at the cut points; any other corner by a
/// single cubic fitted to the tangents and curvatures there.
#[derive(Clone, Copy, Debug)]
pub struct Smoothed {
    params: SmoothedParams,
}

impl Smoothed {
    /// Create a smoothing deformer.
    ///
    /// # Errors
    ///
    /// Returns [`DeformError::InvalidParameter`] for a negative or non-finite
    /// radius, a softness outside `[0, 1]` and a relative skip length
    /// outside `[0, 1)`.
    pub fn new(params: SmoothedParams) -> Result<Smoothed, DeformError> {
        if !params.radius.is_finite() || params.radius < 0.0 {
            return Err(invalid("radius", "must be finite and non-negative"));
        }
        if !(0.0..=1.0).contains(&params.softness) {
            return Err(invalid("softness", "must be in [0, 1]"));
        }
        if !(0.0..1.0).contains(&params.rel_skip) {
            return Err(invalid("rel_skip", "must be in [0, 1)"));
        }
        Ok(Smoothed { params })
    }

    /// The configuration.
    pub fn params(&self) -> &SmoothedParams {
        &self.params
    }
}

/// A segment together with the parameters where it is cut.
struct Item {
    seg: PathSeg,
    t0: f64,
    t1: f64,
}

/// Position, direction and curvature at a cut point.
struct Cut {
    p: Point,
    tangent: Vec2,
    curvature: f64,
}

impl Item {
    fn cut(&self, t: f64) -> Cut {
        let seg = &self.seg;
        let tangent = seg
            .tangent(t)
            .unwrap_or_else(|| (seg.end() - seg.start()).normalize());
        Cut {
            p: seg.eval(t),
            tangent,
            curvature: seg.curvature(t).unwrap_or(0.0),
        }
    }
}

impl Deformer for Smoothed {
    fn deform_subpath(&self, subpath: &Subpath, warnings: &mut Vec<WarningKind>) -> Path {
        let radius = self.params.radius;
        let eps = subpath.epsilon();
        let flushed = subpath.flushed(eps.max(self.params.rel_skip * radius));
        if flushed.is_empty() {
            warnings.push(WarningKind::SmoothedAway);
            return subpath.clone().into();
        }
        if flushed.len() < subpath.len() {
            warnings.push(WarningKind::SegmentSkipped);
        }
        let closed = flushed.is_closed();
        let segs = flushed.segments();
        let n = segs.len();
        if n == 1 && !closed {
            return flushed.into();
        }

        let items: Vec<Item> = segs
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let len = seg.arclen(eps);
                let mut c0 = radius.min(0.5 * len);
                let mut c1 = (0.5 * len).max(len - radius);
                if !closed && i == 0 {
                    c0 = 0.0;
                    c1 = (len - radius).max(0.0);
                }
                if !closed && i == n - 1 {
                    c0 = radius.min(len);
                    c1 = len;
                }
                Item {
                    seg: *seg,
                    t0: seg.inv_arclen(c0, eps),
                    t1: seg.inv_arclen(c1, eps),
                }
            })
            .collect();

        let mut result = Subpath::new(eps);
        for (i, item) in items.iter().enumerate() {
            if item.t1 > item.t0 {
                result.push(item.seg.subsegment(item.t0..item.t1));
            }
            if !closed && i == n - 1 {
                break;
            }
            let next = &items[(i + 1) % n];
            match (item.seg, next.seg) {
                (PathSeg::Line(l1), PathSeg::Line(l2)) => {
                    let corner = l1.p1;
                    let a = l1.eval(item.t1);
                    let d = l2.eval(next.t0);
                    let curves = curves_from_end_lines(
                        corner,
                        l1.p1 - l1.p0,
                        l2.p1 - l2.p0,
                        a.distance(corner),
                        d.distance(corner),
                        self.params.softness,
                    );
                    result.extend(curves.map(PathSeg::Cubic));
                }
                _ => {
                    let c = self.corner_curve(
                        &item.cut(item.t1),
                        &next.cut(next.t0),
                        eps,
                        warnings,
                    );
                    result.curve_to(c);
                }
            }
        }
        if closed {
            result.close();
        }
        result.into()
    }
}

impl Smoothed {
    /// The cubic joining two cut points.
    fn corner_curve(
        &self,
        a: &Cut,
        d: &Cut,
        eps: f64,
        warnings: &mut Vec<WarningKind>,
    ) -> CubicBez {
        let chord = d.p - a.p;
        let (mut ka, mut kd) = (a.curvature, d.curvature);
        if !self.params.obey_curvature {
            let sign = |x: f64| if x >= 0.0 { 1.0 } else { -1.0 };
            ka = sign(a.tangent.cross(chord)) * ka.abs();
            kd = sign(d.tangent.cross(chord)) * kd.abs();
        }
        let rays = ray_intersection(a.p, a.tangent, d.p, d.tangent);
        let arms = fit_control_arms(a.p, a.tangent, ka, d.p, d.tangent, kd, eps)
            .ok()
            .and_then(|arms| arms.first().copied())
            .and_then(|best| {
                if self.params.obey_curvature {
                    return best.is_positive().then_some((best.start, best.end));
                }
                // Stay within the tangent intersection.
                match rays {
                    Some((t, s)) if t >= 0.0 && s <= 0.0 && best.is_positive() => {
                        Some((best.start.min(t), best.end.min(-s)))
                    }
                    _ => None,
                }
            });
        let (arm_a, arm_d) = match (arms, rays) {
            (Some(arms), _) => arms,
            (None, Some((t, s))) if t > 0.0 && s < 0.0 => {
                log::trace!("corner fit failed, using tangent intersection");
                (2.0 / 3.0 * t, -2.0 / 3.0 * s)
            }
            _ => {
                warnings.push(WarningKind::FitFallback);
                let third = chord.hypot() / 3.0;
                (third, third)
            }
        };
        CubicBez::new(a.p, a.p + arm_a * a.tangent, d.p - arm_d * d.tangent, d.p)
    }
}

/// Two cubics rounding the corner between two straight lines.
///
/// The lines run in directions `t1` and `t2` and meet at `corner`; they are
/// cut at distances `r1` before and `r2` after it. The curvature vanishes
/// at both cut points and is stationary where the cubics meet.
fn curves_from_end_lines(
    corner: Point,
    t1: Vec2,
    t2: Vec2,
    r1: f64,
    r2: f64,
    softness: f64,
) -> [CubicBez; 2] {
    let d1 = -t1.normalize();
    let d2 = t2.normalize();
    let f = MAX_LINE_SOFTNESS * softness;
    let g = (15.0 * f + (-15.0 * f * f + 24.0 * f).sqrt()) / 12.0;
    let f1 = corner + f * r1 * d1;
    let f2 = corner + f * r2 * d2;
    let g1 = corner + g * r1 * d1;
    let g2 = corner + g * r2 * d2;
    let e = f1.midpoint(f2);
    [
        CubicBez::new(corner + r1 * d1, g1, f1, e),
        CubicBez::new(e, f2, g2, corner + r2 * d2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Line;

    fn line(p0: (f64, f64), p1: (f64, f64)) -> PathSeg {
        PathSeg::Line(Line::new(p0, p1))
    }

    fn square(side: f64) -> Subpath {
        Subpath::polyline(
            [
                Point::new(0.0, 0.0),
                Point::new(side, 0.0),
                Point::new(side, side),
                Point::new(0.0, side),
            ],
            true,
            1e-5,
        )
    }

    fn assert_continuous(sp: &Subpath) {
        let eps = sp.epsilon();
        for pair in sp.segments().windows(2) {
            assert!(pair[0].end().is_within(pair[1].start(), eps));
        }
        if sp.is_closed() {
            assert!(sp.end().unwrap().is_within(sp.start().unwrap(), eps));
        }
    }

    #[test]
    fn validation() {
        assert!(Smoothed::new(SmoothedParams::new(-1.0)).is_err());
        assert!(Smoothed::new(SmoothedParams::new(f64::NAN)).is_err());
        assert!(Smoothed::new(SmoothedParams::default().with_softness(1.5)).is_err());
        assert!(Smoothed::new(SmoothedParams::default().with_rel_skip(1.0)).is_err());
        assert!(Smoothed::new(SmoothedParams::preset(-6)).is_ok());
        assert!((SmoothedParams::preset(2).radius - 2.0 * CM).abs() < 1e-12);
        assert!((SmoothedParams::preset(-6).radius - CM / 8.0).abs() < 1e-12);
    }

    #[test]
    fn square_corners() {
        let s = Smoothed::new(SmoothedParams::new(1.0)).unwrap();
        let out = s.deform(&square(10.0).into());
        assert!(out.warnings.is_empty());
        let sp = &out.path.subpaths()[0];
        assert!(sp.is_closed());
        assert_continuous(sp);
        // Per side: the middle line and two cubics for its end corner.
        assert_eq!(sp.len(), 12);
        assert_eq!(sp.segments()[0], line((1.0, 0.0), (9.0, 0.0)));
        // The corner curves stay inside the square and off the corner.
        let c = sp.segments()[1];
        assert_eq!(c.start(), Point::new(9.0, 0.0));
        assert!(c.curvature(0.0).unwrap().abs() < 1e-9);
        assert!(c.eval(0.5).x <= 10.0 && c.eval(0.5).y >= 0.0);
        let e = sp.segments()[1].end();
        assert!(e.distance(Point::new(10.0, 0.0)) > 0.1);
        assert!(e.distance(Point::new(10.0, 0.0)) < 0.5);
    }

    #[test]
    fn open_ends_are_kept() {
        let sp = Subpath::polyline(
            [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)],
            false,
            1e-5,
        );
        let out = Smoothed::new(SmoothedParams::new(1.0)).unwrap().deform(&sp.into());
        let sp = &out.path.subpaths()[0];
        assert!(!sp.is_closed());
        assert_continuous(sp);
        assert_eq!(sp.start(), Some(Point::new(0.0, 0.0)));
        assert_eq!(sp.end(), Some(Point::new(5.0, 5.0)));
        assert_eq!(sp.segments()[0], line((0.0, 0.0), (4.0, 0.0)));
        assert_eq!(*sp.segments().last().unwrap(), line((5.0, 1.0), (5.0, 5.0)));
    }

    #[test]
    fn softness_zero_keeps_corner() {
        let sp = Subpath::polyline(
            [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)],
            false,
            1e-5,
        );
        let s = Smoothed::new(SmoothedParams::new(1.0).with_softness(0.0)).unwrap();
        let out = s.deform(&sp.into());
        let sp = &out.path.subpaths()[0];
        assert!(sp.segments().iter().any(|s| s.end() == Point::new(5.0, 0.0)));
    }

    #[test]
    fn curve_corner() {
        // A quarter circle followed by a line going back inwards.
        let k = 4.0 / 3.0 * (2.0f64.sqrt() - 1.0) * 5.0;
        let arc = CubicBez::new((5.0, 0.0), (5.0, k), (k, 5.0), (0.0, 5.0));
        let mut sp = Subpath::new(1e-5);
        sp.curve_to(arc);
        sp.push(line((0.0, 5.0), (0.0, 0.0)));
        let out = Smoothed::new(SmoothedParams::new(1.0)).unwrap().deform(&sp.clone().into());
        assert!(out.warnings.is_empty());
        let smooth = &out.path.subpaths()[0];
        assert_continuous(smooth);
        assert_eq!(smooth.len(), 3);
        assert_eq!(smooth.start(), sp.start());
        assert_eq!(smooth.end(), sp.end());
        // Tangent continuity at both ends of the inserted curve.
        let joint = smooth.segments()[1];
        let before = smooth.segments()[0].tangent(1.0).unwrap();
        let after = smooth.segments()[2].tangent(0.0).unwrap();
        assert!((joint.tangent(0.0).unwrap() - before).hypot() < 1e-6);
        assert!((joint.tangent(1.0).unwrap() - after).hypot() < 1e-6);
    }

    #[test]
    fn everything_too_short() {
        let sp = Subpath::polyline(
            [Point::new(0.0, 0.0), Point::new(1e-3, 0.0), Point::new(1e-3, 1e-3)],
            false,
            1e-5,
        );
        let s = Smoothed::new(SmoothedParams::new(1.0).with_rel_skip(0.5)).unwrap();
        let out = s.deform(&sp.clone().into());
        assert_eq!(out.path.subpaths(), &[sp]);
        assert_eq!(out.warnings[0].kind, WarningKind::SmoothedAway);
    }
}
