// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Continuous runs of segments.

use core::ops::Mul;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::{
    Affine, Arc, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveNearest, PathSeg, Point,
    Vec2,
};

/// The default geometric tolerance, in PostScript points.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// A position on a subpath: a segment index and a parameter in that segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegParam {
    /// Index of the segment.
    pub segment: usize,
    /// Parameter within the segment, in `[0, 1]`.
    pub t: f64,
}

impl SegParam {
    /// Create a new `SegParam`.
    #[inline(always)]
    pub const fn new(segment: usize, t: f64) -> SegParam {
        SegParam { segment, t }
    }
}

/// A continuous sequence of segments, each starting where the previous one
/// ends, optionally closed.
///
/// The subpath carries its own tolerance `epsilon`. Segments are appended
/// through [`Subpath::push`], which keeps the sequence continuous: gaps up
/// to `epsilon` are closed by moving the new segment's start, larger gaps
/// are bridged by a line, and segments whose control polygon is shorter
/// than `epsilon` are dropped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subpath {
    segs: Vec<PathSeg>,
    closed: bool,
    epsilon: f64,
    /// Start of the run of dropped segments since the last kept one.
    skipped: Option<Point>,
}

impl Default for Subpath {
    fn default() -> Self {
        Subpath::new(DEFAULT_EPSILON)
    }
}

impl Subpath {
    /// Create an empty, open subpath with the given tolerance.
    pub fn new(epsilon: f64) -> Subpath {
        Subpath {
            segs: Vec::new(),
            closed: false,
            epsilon,
            skipped: None,
        }
    }

    /// Build a subpath from segments, then close it if requested.
    pub fn from_segments(
        segs: impl IntoIterator<Item = PathSeg>,
        closed: bool,
        epsilon: f64,
    ) -> Subpath {
        let mut sp = Subpath::new(epsilon);
        sp.extend(segs);
        if closed {
            sp.close();
        }
        sp
    }

    /// A polyline through the given points.
    pub fn polyline(points: impl IntoIterator<Item = Point>, closed: bool, epsilon: f64) -> Subpath {
        let mut points = points.into_iter();
        let mut sp = Subpath::new(epsilon);
        if let Some(mut last) = points.next() {
            for p in points {
                sp.push(Line::new(last, p).into());
                last = p;
            }
        }
        if closed {
            sp.close();
        }
        sp
    }

    /// A closed circle, counterclockwise, approximated by cubics to within
    /// `epsilon`.
    pub fn circle(center: Point, radius: f64, epsilon: f64) -> Subpath {
        let arc = Arc::new(center, radius, 0.0, core::f64::consts::TAU);
        Subpath::from_segments(
            arc.cubics(epsilon).map(PathSeg::Cubic),
            true,
            epsilon,
        )
    }

    /// The tolerance of this subpath.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The segments.
    #[inline]
    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    /// Whether the subpath is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    /// Whether the subpath has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// The start point, if there is any geometry.
    pub fn start(&self) -> Option<Point> {
        self.segs.first().map(ParamCurve::start)
    }

    /// The end point, if there is any geometry.
    pub fn end(&self) -> Option<Point> {
        self.segs.last().map(ParamCurve::end)
    }

    /// Append a segment, keeping the subpath continuous.
    ///
    /// Appending to a closed subpath reopens it.
    pub fn push(&mut self, seg: PathSeg) {
        if seg.is_degenerate(self.epsilon) {
            if self.skipped.is_none() {
                self.skipped = Some(self.end().unwrap_or_else(|| seg.start()));
            }
            return;
        }
        self.closed = false;
        let seg = match (self.skipped.take(), self.end()) {
            (Some(anchor), _) => seg.with_start(anchor),
            (None, Some(end)) if end.is_within(seg.start(), self.epsilon) => seg.with_start(end),
            (None, Some(end)) => {
                self.segs.push(Line::new(end, seg.start()).into());
                seg
            }
            (None, None) => seg,
        };
        self.segs.push(seg);
    }

    /// Append a cubic Bézier segment.
    pub fn curve_to(&mut self, c: CubicBez) {
        self.push(PathSeg::Cubic(c));
    }

    /// Close the subpath.
    ///
    /// A gap up to `epsilon` between end and start is closed by moving the
    /// end point; a larger gap is bridged by a line. Closing an empty subpath
    /// has no effect.
    pub fn close(&mut self) {
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return;
        };
        self.skipped = None;
        if start.is_within(end, self.epsilon) {
            if let Some(last) = self.segs.last_mut() {
                *last = last.with_end(start);
            }
        } else {
            self.segs.push(Line::new(end, start).into());
        }
        self.closed = true;
    }

    /// Rebuild the subpath dropping segments shorter than `threshold`.
    ///
    /// The result keeps the original tolerance.
    pub fn flushed(&self, threshold: f64) -> Subpath {
        let mut sp = Subpath::from_segments(self.segs.iter().copied(), self.closed, threshold);
        sp.epsilon = self.epsilon;
        sp
    }

    /// The subpath traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Subpath {
        Subpath {
            segs: self.segs.iter().rev().map(PathSeg::reverse).collect(),
            closed: self.closed,
            epsilon: self.epsilon,
            skipped: None,
        }
    }

    /// Total arc length.
    pub fn arclen(&self) -> f64 {
        self.segs.iter().map(|s| s.arclen(self.epsilon)).sum()
    }

    /// Arc length of every segment.
    pub fn segment_arclens(&self) -> Vec<f64> {
        self.segs.iter().map(|s| s.arclen(self.epsilon)).collect()
    }

    /// The position at arc length `s` from the start.
    ///
    /// Values outside the subpath are clamped to its ends.
    pub fn param_at_arclen(&self, s: f64) -> SegParam {
        let mut remaining = s;
        if remaining <= 0.0 || self.segs.is_empty() {
            return SegParam::new(0, 0.0);
        }
        for (i, seg) in self.segs.iter().enumerate() {
            let len = seg.arclen(self.epsilon);
            if remaining <= len {
                return SegParam::new(i, seg.inv_arclen(remaining, self.epsilon));
            }
            remaining -= len;
        }
        SegParam::new(self.segs.len() - 1, 1.0)
    }

    /// Arc length from the start to a position.
    pub fn arclen_at(&self, param: SegParam) -> f64 {
        let before: f64 = self.segs[..param.segment.min(self.segs.len())]
            .iter()
            .map(|s| s.arclen(self.epsilon))
            .sum();
        let within = self
            .segs
            .get(param.segment)
            .map_or(0.0, |s| s.subsegment(0.0..param.t).arclen(self.epsilon));
        before + within
    }

    /// The position of the end of the subpath.
    pub fn end_param(&self) -> SegParam {
        SegParam::new(self.segs.len().saturating_sub(1), 1.0)
    }

    fn seg(&self, param: SegParam) -> Option<&PathSeg> {
        self.segs.get(param.segment)
    }

    /// The point at a position.
    pub fn eval(&self, param: SegParam) -> Option<Point> {
        self.seg(param).map(|s| s.eval(param.t))
    }

    /// The unit tangent at a position.
    pub fn tangent(&self, param: SegParam) -> Option<Vec2> {
        self.seg(param)?.tangent(param.t)
    }

    /// The signed curvature at a position.
    pub fn curvature(&self, param: SegParam) -> Option<f64> {
        self.seg(param)?.curvature(param.t)
    }

    /// The local frame at a position.
    pub fn frame(&self, param: SegParam) -> Option<Affine> {
        self.seg(param)?.frame(param.t)
    }

    /// The open piece between two positions, `from` not after `to`.
    pub fn slice(&self, from: SegParam, to: SegParam) -> Subpath {
        let mut sp = Subpath::new(self.epsilon);
        if self.segs.is_empty() {
            return sp;
        }
        let last = self.segs.len() - 1;
        let first_seg = from.segment.min(last);
        let last_seg = to.segment.min(last);
        for i in first_seg..=last_seg {
            let t0 = if i == first_seg { from.t } else { 0.0 };
            let t1 = if i == last_seg { to.t } else { 1.0 };
            if t1 > t0 {
                sp.push(self.segs[i].subsegment(t0..t1));
            }
        }
        sp
    }

    /// Distance from a point to the nearest point of the subpath.
    pub fn distance_to(&self, p: Point) -> f64 {
        self.segs
            .iter()
            .map(|s| s.nearest(p, self.epsilon).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

impl Extend<PathSeg> for Subpath {
    fn extend<I: IntoIterator<Item = PathSeg>>(&mut self, iter: I) {
        for seg in iter {
            self.push(seg);
        }
    }
}

impl Mul<&Subpath> for Affine {
    type Output = Subpath;

    fn mul(self, other: &Subpath) -> Subpath {
        Subpath {
            segs: other.segs.iter().map(|&s| self * s).collect(),
            closed: other.closed,
            epsilon: other.epsilon,
            skipped: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Subpath {
        Subpath::polyline(
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)].map(Point::from),
            true,
            DEFAULT_EPSILON,
        )
    }

    #[test]
    fn push_snaps_small_gaps() {
        let mut sp = Subpath::new(1e-3);
        sp.push(Line::new((0.0, 0.0), (1.0, 0.0)).into());
        sp.push(Line::new((1.0, 5e-4), (2.0, 0.0)).into());
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.segments()[1].start(), Point::new(1.0, 0.0));
    }

    #[test]
    fn push_bridges_large_gaps() {
        let mut sp = Subpath::new(1e-3);
        sp.push(Line::new((0.0, 0.0), (1.0, 0.0)).into());
        sp.push(Line::new((1.0, 1.0), (2.0, 1.0)).into());
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.segments()[1], Line::new((1.0, 0.0), (1.0, 1.0)).into());
    }

    #[test]
    fn push_drops_degenerate() {
        let mut sp = Subpath::new(1e-3);
        sp.push(Line::new((0.0, 0.0), (1.0, 0.0)).into());
        sp.push(Line::new((1.0, 0.0), (1.0, 4e-4)).into());
        sp.push(Line::new((1.0, 8e-4), (2.0, 0.0)).into());
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.segments()[1].start(), Point::new(1.0, 0.0));
    }

    #[test]
    fn closing() {
        let sp = square();
        assert!(sp.is_closed());
        assert_eq!(sp.len(), 4);
        assert_eq!(sp.end(), sp.start());
        assert!((sp.arclen() - 4.0).abs() < 1e-12);

        let mut nearly = Subpath::polyline(
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1e-6)].map(Point::from),
            false,
            DEFAULT_EPSILON,
        );
        nearly.close();
        assert_eq!(nearly.len(), 3);
        assert_eq!(nearly.end(), Some(Point::ORIGIN));
    }

    #[test]
    fn arclength_params() {
        let sp = square();
        let p = sp.param_at_arclen(2.5);
        assert_eq!(p.segment, 2);
        assert!((p.t - 0.5).abs() < 1e-9);
        assert!((sp.arclen_at(p) - 2.5).abs() < 1e-9);
        assert_eq!(sp.param_at_arclen(-1.0), SegParam::new(0, 0.0));
        assert_eq!(sp.param_at_arclen(10.0), SegParam::new(3, 1.0));
    }

    #[test]
    fn slicing() {
        let sp = square();
        let piece = sp.slice(SegParam::new(0, 0.5), SegParam::new(2, 0.5));
        assert!(!piece.is_closed());
        assert_eq!(piece.len(), 3);
        assert!((piece.arclen() - 2.0).abs() < 1e-12);
        assert_eq!(piece.start(), Some(Point::new(0.5, 0.0)));
        assert_eq!(piece.end(), Some(Point::new(0.5, 1.0)));
    }

    #[test]
    fn reversing() {
        let sp = square().reversed();
        assert!(sp.is_closed());
        assert_eq!(sp.start(), Some(Point::ORIGIN));
        assert_eq!(sp.segments()[0].end(), Point::new(0.0, 1.0));
    }

    #[test]
    fn circle_geometry() {
        let sp = Subpath::circle(Point::new(1.0, 1.0), 2.0, DEFAULT_EPSILON);
        assert!(sp.is_closed());
        assert!(sp.len() >= 4);
        assert!((sp.arclen() - 4.0 * core::f64::consts::PI).abs() < 1e-3);
        assert!((sp.distance_to(Point::new(1.0, 1.0)) - 2.0).abs() < 1e-3);
        let k = sp.curvature(SegParam::new(1, 0.5)).unwrap();
        assert!((k - 0.5).abs() < 1e-3);
    }
}
