// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths: ordered sequences of subpaths.

use core::ops::Mul;

use alloc::vec::Vec;

use crate::intersect::segment_intersections;
use crate::{Affine, ParamCurve, PathSeg, Point, SegParam, Subpath};

/// A position on a path.
///
/// Positions are ordered by subpath, then segment, then parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathParam {
    /// Index of the subpath.
    pub subpath: usize,
    /// Index of the segment within the subpath.
    pub segment: usize,
    /// Parameter within the segment, in `[0, 1]`.
    pub t: f64,
}

impl PathParam {
    /// Create a new `PathParam`.
    #[inline(always)]
    pub const fn new(subpath: usize, segment: usize, t: f64) -> PathParam {
        PathParam { subpath, segment, t }
    }

    /// The position within its subpath.
    #[inline]
    pub const fn seg_param(self) -> SegParam {
        SegParam::new(self.segment, self.t)
    }
}

/// An ordered sequence of subpaths.
///
/// The order of the subpaths is the drawing order; it carries no
/// geometric meaning. Empty subpaths are never stored.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Path {
        Path::default()
    }

    /// Create a path from subpaths, dropping empty ones.
    pub fn from_subpaths(subpaths: impl IntoIterator<Item = Subpath>) -> Path {
        let mut path = Path::new();
        path.extend(subpaths);
        path
    }

    /// Append a subpath. Empty subpaths are ignored.
    pub fn push(&mut self, subpath: Subpath) {
        if !subpath.is_empty() {
            self.subpaths.push(subpath);
        }
    }

    /// The subpaths.
    #[inline]
    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Consume the path, returning its subpaths.
    pub fn into_subpaths(self) -> Vec<Subpath> {
        self.subpaths
    }

    /// The number of subpaths.
    #[inline]
    pub fn len(&self) -> usize {
        self.subpaths.len()
    }

    /// Whether the path has no geometry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Iterate over all segments together with their positions.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize, &PathSeg)> + '_ {
        self.subpaths.iter().enumerate().flat_map(|(i, sp)| {
            sp.segments()
                .iter()
                .enumerate()
                .map(move |(j, seg)| (i, j, seg))
        })
    }

    /// The largest tolerance of any subpath, used when comparing subpaths
    /// against each other.
    pub fn epsilon(&self) -> Option<f64> {
        self.subpaths
            .iter()
            .map(Subpath::epsilon)
            .reduce(f64::max)
    }

    /// Connect another path to this one.
    ///
    /// The first subpath of `other` continues the last subpath of `self`
    /// when that one is open; the remaining subpaths are appended.
    pub fn join(&mut self, other: Path) {
        let mut rest = other.subpaths.into_iter();
        if let Some(first) = rest.next() {
            match self.subpaths.last_mut() {
                Some(last) if !last.is_closed() => last.extend(first.segments().iter().copied()),
                _ => self.push(first),
            }
        }
        self.extend(rest);
    }

    /// The path with every subpath reversed, in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Path {
        Path {
            subpaths: self.subpaths.iter().rev().map(Subpath::reversed).collect(),
        }
    }

    /// Total arc length of all subpaths.
    pub fn arclen(&self) -> f64 {
        self.subpaths.iter().map(Subpath::arclen).sum()
    }

    /// The point at a position.
    pub fn eval(&self, param: PathParam) -> Option<Point> {
        self.subpaths.get(param.subpath)?.eval(param.seg_param())
    }

    /// Distance from a point to the nearest point of the path.
    ///
    /// An empty path is infinitely far away.
    pub fn distance_to(&self, p: Point) -> f64 {
        self.subpaths
            .iter()
            .map(|sp| sp.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// All crossings between this path and `other`.
    ///
    /// Each entry holds the position on `self` and the position on `other`.
    pub fn intersections_with(&self, other: &Path) -> Vec<(PathParam, PathParam)> {
        let epsilon = match (self.epsilon(), other.epsilon()) {
            (Some(a), Some(b)) => a.max(b),
            _ => return Vec::new(),
        };
        let mut result = Vec::new();
        for (i, j, a) in self.segments() {
            for (k, l, b) in other.segments() {
                for (ta, tb) in segment_intersections(a, b, epsilon) {
                    result.push((PathParam::new(i, j, ta), PathParam::new(k, l, tb)));
                }
            }
        }
        dedup_crossings(self, &mut result, epsilon);
        result
    }

    /// All crossings of the path with itself, each reported once with the
    /// earlier position first.
    ///
    /// Touching at the joint of two neighboring segments is not a crossing.
    pub fn self_intersections(&self) -> Vec<(PathParam, PathParam)> {
        let Some(epsilon) = self.epsilon() else {
            return Vec::new();
        };
        let segs: Vec<_> = self.segments().collect();
        let mut result = Vec::new();
        for (m, &(i, j, a)) in segs.iter().enumerate() {
            for &(k, l, b) in &segs[m + 1..] {
                let joint = self.shared_joint(i, j, k, l);
                for (ta, tb) in segment_intersections(a, b, epsilon) {
                    let p = a.eval(ta);
                    if matches!(joint, Some(q) if q.is_within(p, epsilon)) {
                        continue;
                    }
                    result.push((PathParam::new(i, j, ta), PathParam::new(k, l, tb)));
                }
            }
        }
        dedup_crossings(self, &mut result, epsilon);
        log::trace!("{} self-intersections", result.len());
        result
    }

    /// The point shared by two neighboring segments of one subpath.
    fn shared_joint(&self, i: usize, j: usize, k: usize, l: usize) -> Option<Point> {
        if i != k {
            return None;
        }
        let sp = &self.subpaths[i];
        let segs = sp.segments();
        if l == j + 1 {
            Some(segs[j].end())
        } else if sp.is_closed() && j == 0 && l + 1 == segs.len() {
            Some(segs[j].start())
        } else {
            None
        }
    }
}

/// Drop crossings that repeat an earlier one, as happens when a crossing
/// lies on a segment joint.
fn dedup_crossings(path: &Path, crossings: &mut Vec<(PathParam, PathParam)>, epsilon: f64) {
    let mut kept: Vec<(PathParam, PathParam, Point)> = Vec::with_capacity(crossings.len());
    for &(a, b) in crossings.iter() {
        let Some(p) = path.eval(a) else {
            continue;
        };
        if kept.iter().all(|&(_, _, q)| !q.is_within(p, epsilon)) {
            kept.push((a, b, p));
        }
    }
    *crossings = kept.into_iter().map(|(a, b, _)| (a, b)).collect();
}

impl From<Subpath> for Path {
    fn from(subpath: Subpath) -> Path {
        Path::from_subpaths([subpath])
    }
}

impl Extend<Subpath> for Path {
    fn extend<I: IntoIterator<Item = Subpath>>(&mut self, iter: I) {
        for sp in iter {
            self.push(sp);
        }
    }
}

impl FromIterator<Subpath> for Path {
    fn from_iter<I: IntoIterator<Item = Subpath>>(iter: I) -> Path {
        Path::from_subpaths(iter)
    }
}

impl Mul<&Path> for Affine {
    type Output = Path;

    fn mul(self, path: &Path) -> Path {
        path.subpaths.iter().map(|sp| self * sp).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Line;

    fn square(epsilon: f64) -> Subpath {
        Subpath::polyline(
            [
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
            true,
            epsilon,
        )
    }

    #[test]
    fn empty_subpaths_are_dropped() {
        let path = Path::from_subpaths([Subpath::new(1e-5), square(1e-5)]);
        assert_eq!(path.len(), 1);
        assert!(Path::new().is_empty());
        assert_eq!(Path::new().distance_to(Point::ORIGIN), f64::INFINITY);
    }

    #[test]
    fn params_are_ordered() {
        let a = PathParam::new(0, 3, 0.9);
        let b = PathParam::new(1, 0, 0.1);
        let c = PathParam::new(1, 0, 0.2);
        assert!(a < b && b < c);
    }

    #[test]
    fn join_continues_open_subpath() {
        let mut path = Path::from(Subpath::polyline(
            [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            false,
            1e-5,
        ));
        let other = Path::from_subpaths([
            Subpath::polyline([Point::new(1.0, 0.0), Point::new(1.0, 1.0)], false, 1e-5),
            square(1e-5),
        ]);
        path.join(other);
        assert_eq!(path.len(), 2);
        assert_eq!(path.subpaths()[0].len(), 2);
        assert!((path.arclen() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn square_has_no_self_intersections() {
        let path = Path::from(square(1e-5));
        assert!(path.self_intersections().is_empty());
    }

    #[test]
    fn figure_eight_crosses_once() {
        let sp = Subpath::polyline(
            [
                Point::new(0.0, 0.0),
                Point::new(2.0, 2.0),
                Point::new(2.0, 0.0),
                Point::new(0.0, 2.0),
            ],
            true,
            1e-5,
        );
        let path = Path::from(sp);
        let crossings = path.self_intersections();
        assert_eq!(crossings.len(), 1);
        let (a, b) = crossings[0];
        assert!(a < b);
        let p = path.eval(a).unwrap();
        assert!(p.distance(Point::new(1.0, 1.0)) < 1e-9);
        assert!(path.eval(b).unwrap().distance(p) < 1e-9);
    }

    #[test]
    fn crossing_other_path() {
        let path = Path::from(square(1e-5));
        let line = Path::from(Subpath::from_segments(
            [Line::new((-1.0, 0.5), (2.0, 0.5)).into()],
            false,
            1e-5,
        ));
        let hits = path.intersections_with(&line);
        assert_eq!(hits.len(), 2);
        for (a, b) in hits {
            assert!(path.eval(a).unwrap().distance(line.eval(b).unwrap()) < 1e-9);
        }
    }
}
