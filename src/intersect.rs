// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between path segments.

use alloc::vec::Vec;

use crate::common::solve_cubic;
use crate::{CubicBez, Line, ParamCurve, ParamCurveDeriv, PathSeg, Point};

/// Subdivision depth after which overlapping pieces are reported as hits.
const MAX_DEPTH: usize = 48;

/// Newton steps used to polish a subdivision hit.
const REFINE_STEPS: usize = 4;

/// All crossings of two segments, as pairs of parameters `(t_a, t_b)`.
///
/// Crossings closer than `epsilon` to each other are reported once.
/// Collinear overlaps have no isolated crossing and are not reported.
pub(crate) fn segment_intersections(a: &PathSeg, b: &PathSeg, epsilon: f64) -> Vec<(f64, f64)> {
    let mut hits = match (a, b) {
        (PathSeg::Line(la), PathSeg::Line(lb)) => line_line(*la, *lb, epsilon).into_iter().collect(),
        (PathSeg::Line(l), PathSeg::Cubic(c)) => line_cubic(*l, c, epsilon),
        (PathSeg::Cubic(c), PathSeg::Line(l)) => line_cubic(*l, c, epsilon)
            .into_iter()
            .map(|(tl, tc)| (tc, tl))
            .collect(),
        (PathSeg::Cubic(ca), PathSeg::Cubic(cb)) => {
            let mut hits = Vec::new();
            cubic_cubic(ca, 0.0, 1.0, cb, 0.0, 1.0, epsilon, 0, &mut hits);
            hits.into_iter()
                .map(|(ta, tb)| refine(ca, cb, ta, tb))
                .collect()
        }
    };
    dedup_hits(a, &mut hits, epsilon);
    hits
}

fn dedup_hits(a: &PathSeg, hits: &mut Vec<(f64, f64)>, epsilon: f64) {
    hits.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut kept: Vec<(f64, f64)> = Vec::with_capacity(hits.len());
    for &(ta, tb) in hits.iter() {
        let p = a.eval(ta);
        if kept.iter().all(|&(ka, _)| !a.eval(ka).is_within(p, epsilon)) {
            kept.push((ta, tb));
        }
    }
    *hits = kept;
}

fn line_line(a: Line, b: Line, epsilon: f64) -> Option<(f64, f64)> {
    let da = a.p1 - a.p0;
    let db = b.p1 - b.p0;
    let la = da.hypot();
    let lb = db.hypot();
    let det = da.cross(db);
    if det.abs() <= 1e-12 * la * lb {
        return None;
    }
    let w = b.p0 - a.p0;
    let s = w.cross(db) / det;
    let u = w.cross(da) / det;
    let (tol_a, tol_b) = (epsilon / la, epsilon / lb);
    if s < -tol_a || s > 1.0 + tol_a || u < -tol_b || u > 1.0 + tol_b {
        return None;
    }
    Some((s.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
}

/// Crossings of a line and a cubic, as `(t_line, t_cubic)`.
///
/// The cubic is expressed as signed distance from the line, whose roots
/// are found analytically.
fn line_cubic(l: Line, c: &CubicBez, epsilon: f64) -> Vec<(f64, f64)> {
    let mut result = Vec::new();
    let d = l.p1 - l.p0;
    let len = d.hypot();
    if len < epsilon {
        return result;
    }
    let u = d / len;
    let h = |p: Point| u.cross(p - l.p0);
    let (h0, h1, h2, h3) = (h(c.p0), h(c.p1), h(c.p2), h(c.p3));
    if h0.abs().max(h1.abs()).max(h2.abs()).max(h3.abs()) < epsilon * 1e-3 {
        // Collinear.
        return result;
    }
    let c0 = h0;
    let c1 = 3.0 * (h1 - h0);
    let c2 = 3.0 * (h0 - 2.0 * h1 + h2);
    let c3 = h3 - h0 + 3.0 * (h1 - h2);
    let tol_c = epsilon / c.polygon_len().max(epsilon);
    let tol_l = epsilon / len;
    for t in solve_cubic(c0, c1, c2, c3) {
        if !(-tol_c..=1.0 + tol_c).contains(&t) {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        let s = u.dot(c.eval(t) - l.p0) / len;
        if (-tol_l..=1.0 + tol_l).contains(&s) {
            result.push((s.clamp(0.0, 1.0), t));
        }
    }
    result
}

fn bounds(c: &CubicBez) -> (Point, Point) {
    let xs = [c.p0.x, c.p1.x, c.p2.x, c.p3.x];
    let ys = [c.p0.y, c.p1.y, c.p2.y, c.p3.y];
    let min = Point::new(
        xs.iter().copied().fold(f64::INFINITY, f64::min),
        ys.iter().copied().fold(f64::INFINITY, f64::min),
    );
    let max = Point::new(
        xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    );
    (min, max)
}

/// Largest distance of the inner control points from the chord.
fn flatness(c: &CubicBez) -> f64 {
    let chord = c.p3 - c.p0;
    let len = chord.hypot();
    if len == 0.0 {
        return c.p0.distance(c.p1).max(c.p0.distance(c.p2));
    }
    let u = chord / len;
    u.cross(c.p1 - c.p0).abs().max(u.cross(c.p2 - c.p0).abs())
}

#[allow(clippy::too_many_arguments)]
fn cubic_cubic(
    a: &CubicBez,
    a0: f64,
    a1: f64,
    b: &CubicBez,
    b0: f64,
    b1: f64,
    epsilon: f64,
    depth: usize,
    hits: &mut Vec<(f64, f64)>,
) {
    let (amin, amax) = bounds(a);
    let (bmin, bmax) = bounds(b);
    if amax.x + epsilon < bmin.x
        || bmax.x + epsilon < amin.x
        || amax.y + epsilon < bmin.y
        || bmax.y + epsilon < amin.y
    {
        return;
    }
    let flat_tol = 0.1 * epsilon;
    let flat_a = flatness(a) <= flat_tol;
    let flat_b = flatness(b) <= flat_tol;
    if flat_a && flat_b {
        if let Some((s, u)) = line_line(Line::new(a.p0, a.p3), Line::new(b.p0, b.p3), epsilon) {
            hits.push((a0 + s * (a1 - a0), b0 + u * (b1 - b0)));
        }
        return;
    }
    if depth >= MAX_DEPTH {
        hits.push((0.5 * (a0 + a1), 0.5 * (b0 + b1)));
        return;
    }
    let am = 0.5 * (a0 + a1);
    let bm = 0.5 * (b0 + b1);
    match (flat_a, flat_b) {
        (false, false) => {
            let (a_lo, a_hi) = a.subdivide();
            let (b_lo, b_hi) = b.subdivide();
            cubic_cubic(&a_lo, a0, am, &b_lo, b0, bm, epsilon, depth + 1, hits);
            cubic_cubic(&a_lo, a0, am, &b_hi, bm, b1, epsilon, depth + 1, hits);
            cubic_cubic(&a_hi, am, a1, &b_lo, b0, bm, epsilon, depth + 1, hits);
            cubic_cubic(&a_hi, am, a1, &b_hi, bm, b1, epsilon, depth + 1, hits);
        }
        (true, false) => {
            let (b_lo, b_hi) = b.subdivide();
            cubic_cubic(a, a0, a1, &b_lo, b0, bm, epsilon, depth + 1, hits);
            cubic_cubic(a, a0, a1, &b_hi, bm, b1, epsilon, depth + 1, hits);
        }
        _ => {
            let (a_lo, a_hi) = a.subdivide();
            cubic_cubic(&a_lo, a0, am, b, b0, b1, epsilon, depth + 1, hits);
            cubic_cubic(&a_hi, am, a1, b, b0, b1, epsilon, depth + 1, hits);
        }
    }
}

/// Polish a crossing with Newton steps on `a(s) - b(u) = 0`.
fn refine(a: &CubicBez, b: &CubicBez, mut s: f64, mut u: f64) -> (f64, f64) {
    let (da, db) = (a.deriv(), b.deriv());
    for _ in 0..REFINE_STEPS {
        let f = a.eval(s) - b.eval(u);
        let ja = da.eval(s).to_vec2();
        let jb = db.eval(u).to_vec2();
        // Solve ja * ds - jb * du = -f.
        let det = -ja.cross(jb);
        if det.abs() < 1e-300 {
            break;
        }
        let ds = (-f).cross(-jb) / det;
        let du = ja.cross(-f) / det;
        let (ns, nu) = ((s + ds).clamp(0.0, 1.0), (u + du).clamp(0.0, 1.0));
        if (a.eval(ns) - b.eval(nu)).hypot() > f.hypot() {
            break;
        }
        s = ns;
        u = nu;
    }
    (s, u)
}
