// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallel curves at a constant normal distance.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

use smallvec::{smallvec, SmallVec};

use crate::common::solve_itp;
use crate::deform::invalid;
use crate::fit::fit_control_arms;
use crate::{
    Arc, ControlArms, CubicBez, DeformError, Deformer, Line, ParamCurve, ParamCurveNearest, Path,
    PathParam, PathSeg, Point, SegParam, Subpath, WarningKind, CM,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Values of `1 - κ·d` at or below this have no usable parallel.
const MIN_STRETCH: f64 = 1e-3;

/// How often a piece is bisected before its parallel is replaced by a line.
const MAX_DEPTH: usize = 10;

/// How often a piece is split around points without a parallel.
const MAX_SPLITS: usize = 8;

/// Tangents whose cross product is below this count as parallel when
/// choosing a branch.
const PARALLEL_TANGENTS: f64 = 1e-9;

/// Intervals per segment when checking that a piece of the parallel keeps
/// away from the original.
const CLEARANCE_SAMPLES: usize = 8;

/// Configuration of a [`Parallel`] deformer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelParams {
    /// Normal distance, positive to the left of the direction of travel.
    pub distance: f64,
    /// Allowed deviation from `distance`, relative to it.
    pub rel_error: f64,
    /// Draw outer corners as sharp wedges instead of circular arcs.
    pub sharp_corners: bool,
    /// Remove the parts of the raw parallel that come closer to the
    /// original than `distance`.
    pub resolve_intersections: bool,
    /// Parameters at which every fitted cubic is checked against the
    /// distance.
    pub check_params: SmallVec<[f64; 4]>,
    /// Number of curvature samples per curve segment.
    pub look_samples: usize,
    /// Parameter step used to move away from points without a parallel.
    pub search_step: f64,
}

impl Default for ParallelParams {
    fn default() -> Self {
        ParallelParams {
            distance: CM,
            rel_error: 0.05,
            sharp_corners: false,
            resolve_intersections: true,
            check_params: smallvec![0.5],
            look_samples: 11,
            search_step: 0.01,
        }
    }
}

impl ParallelParams {
    /// Default parameters with the given distance.
    pub fn new(distance: f64) -> Self {
        ParallelParams {
            distance,
            ..Default::default()
        }
    }

    /// Builder method for setting the relative error.
    pub fn with_rel_error(mut self, rel_error: f64) -> Self {
        self.rel_error = rel_error;
        self
    }

    /// Builder method for choosing sharp or round outer corners.
    pub fn with_sharp_corners(mut self, sharp: bool) -> Self {
        self.sharp_corners = sharp;
        self
    }

    /// Builder method for switching intersection resolution on or off.
    pub fn with_resolve_intersections(mut self, resolve: bool) -> Self {
        self.resolve_intersections = resolve;
        self
    }

    /// Builder method for setting the distance check parameters.
    pub fn with_check_params(mut self, params: impl IntoIterator<Item = f64>) -> Self {
        self.check_params = params.into_iter().collect();
        self
    }

    /// Builder method for setting the number of curvature samples.
    pub fn with_look_samples(mut self, samples: usize) -> Self {
        self.look_samples = samples;
        self
    }

    /// Builder method for setting the search step.
    pub fn with_search_step(mut self, step: f64) -> Self {
        self.search_step = step;
        self
    }
}

/// A deformer producing the parallel of a path.
///
/// Lines are shifted along their normal. Curves are split where the
/// curvature reaches `1/distance`; the pieces on the far side have no
/// parallel and are left out, the others are approximated by cubics with the
/// curvature of the true parallel at both ends. Corners of the original get
/// circular arcs (or wedges) around them. Finally, the parts that come
/// closer to the original than `distance` are cut away at the
/// self-intersections.
#[derive(Clone, Debug)]
pub struct Parallel {
    params: ParallelParams,
}

impl Parallel {
    /// Create a parallel deformer.
    ///
    /// # Errors
    ///
    /// Returns [`DeformError::InvalidParameter`] for a non-finite distance,
    /// a relative error outside `(0, 1)`, a check parameter outside
    /// `(0, 1)`, fewer than two curvature samples and a search step outside
    /// `(0, 1)`.
    pub fn new(params: ParallelParams) -> Result<Parallel, DeformError> {
        let open_unit = |x: f64| x > 0.0 && x < 1.0;
        if !params.distance.is_finite() {
            return Err(invalid("distance", "must be finite"));
        }
        if !open_unit(params.rel_error) {
            return Err(invalid("rel_error", "must be in (0, 1)"));
        }
        if !params.check_params.iter().all(|&t| open_unit(t)) {
            return Err(invalid("check_params", "must be in (0, 1)"));
        }
        if params.look_samples < 2 {
            return Err(invalid("look_samples", "must be at least 2"));
        }
        if !open_unit(params.search_step) {
            return Err(invalid("search_step", "must be in (0, 1)"));
        }
        Ok(Parallel { params })
    }

    /// The configuration.
    pub fn params(&self) -> &ParallelParams {
        &self.params
    }
}

/// A point of a segment where no parallel exists.
#[derive(Clone, Copy, Debug)]
struct InvalidParam {
    t: f64,
}

/// Offset geometry of one piece of a segment.
struct Run {
    sp: Subpath,
    /// The piece begins at the start of its segment.
    from_start: bool,
    /// The piece runs up to the end of its segment.
    to_end: bool,
}

impl Deformer for Parallel {
    fn deform_subpath(&self, subpath: &Subpath, warnings: &mut Vec<WarningKind>) -> Path {
        if self.params.distance.abs() < subpath.epsilon() {
            warnings.push(WarningKind::NegligibleDistance);
            return subpath.clone().into();
        }
        let mut fallbacks = 0;
        let raw = self.raw_parallel(subpath, &mut fallbacks);
        if fallbacks > 0 {
            log::debug!("{fallbacks} parallel pieces replaced by lines");
            warnings.push(WarningKind::FitFallback);
        }
        if self.params.resolve_intersections {
            self.resolve(raw, subpath)
        } else {
            raw
        }
    }
}

impl Parallel {
    /// The parallel before intersection resolution.
    fn raw_parallel(&self, subpath: &Subpath, fallbacks: &mut usize) -> Path {
        let eps = subpath.epsilon();
        let segs = subpath.segments();
        let mut pieces = Vec::new();
        let mut current = Subpath::new(eps);
        // Whether `current` ends at the end of the previous segment.
        let mut at_joint = false;
        // Whether the first piece starts at the start of the subpath.
        let mut first_at_joint = false;
        for (i, seg) in segs.iter().enumerate() {
            let runs = self.offset_segment(seg, eps, fallbacks);
            if runs.is_empty() {
                at_joint = false;
            }
            for (k, run) in runs.into_iter().enumerate() {
                let continues = k == 0 && i > 0 && run.from_start && at_joint;
                match (continues, run.sp.start()) {
                    (true, Some(to)) if !current.is_empty() => {
                        self.join_corner(&mut current, &segs[i - 1], seg, to);
                    }
                    _ => {
                        if !current.is_empty() {
                            pieces.push(core::mem::replace(&mut current, Subpath::new(eps)));
                        }
                        if i == 0 && k == 0 {
                            first_at_joint = run.from_start;
                        }
                    }
                }
                current.extend(run.sp.segments().iter().copied());
                at_joint = run.to_end;
            }
        }
        if subpath.is_closed() && at_joint && first_at_joint && !current.is_empty() {
            let head = pieces.first().unwrap_or(&current).start();
            if let (Some(last), Some(first), Some(to)) = (segs.last(), segs.first(), head) {
                self.join_corner(&mut current, last, first, to);
            }
            if pieces.is_empty() {
                current.close();
            } else {
                let head = pieces.remove(0);
                current.extend(head.segments().iter().copied());
            }
        }
        pieces.push(current);
        Path::from_subpaths(pieces)
    }

    /// Connect the parallels of two segments meeting at a corner.
    ///
    /// `to` is where the parallel of `after` starts.
    fn join_corner(&self, out: &mut Subpath, before: &PathSeg, after: &PathSeg, to: Point) {
        let d = self.params.distance;
        let eps = out.epsilon();
        let (Some(from), Some(t_in), Some(t_out)) = (out.end(), before.tangent(1.0), after.tangent(0.0))
        else {
            return;
        };
        let turn = t_in.cross(t_out);
        if t_in.dot(t_out) > 0.0 && turn.abs() * d.abs() <= eps {
            return;
        }
        if self.params.sharp_corners && turn * d < 0.0 {
            let incoming = Line::new(from, from + t_in);
            let outgoing = Line::new(to, to + t_out);
            if let Some(tip) = incoming.crossing_point(outgoing) {
                // The tip must lie ahead of both parallels.
                if (tip - from).dot(t_in) >= 0.0 && (tip - to).dot(t_out) <= 0.0 {
                    out.push(Line::new(from, tip).into());
                    out.push(Line::new(tip, to).into());
                    return;
                }
            }
        }
        let arc = Arc::from_endpoints(after.start(), d.abs(), from, to, d > 0.0);
        for c in arc.cubics(eps) {
            out.curve_to(c);
        }
    }

    /// The parallel of a single segment, as runs of continuous geometry.
    fn offset_segment(&self, seg: &PathSeg, eps: f64, fallbacks: &mut usize) -> Vec<Run> {
        match seg {
            PathSeg::Line(line) => {
                let Some(t) = seg.tangent(0.0) else {
                    return Vec::new();
                };
                let mut sp = Subpath::new(eps);
                sp.push((*line + self.params.distance * t.turn_90()).into());
                vec![Run {
                    sp,
                    from_start: true,
                    to_end: true,
                }]
            }
            PathSeg::Cubic(_) => self.offset_curve(seg, eps, fallbacks),
        }
    }

    fn offset_curve(&self, seg: &PathSeg, eps: f64, fallbacks: &mut usize) -> Vec<Run> {
        let margin = self.params.rel_error.max(MIN_STRETCH);
        let mut bounds = Vec::new();
        bounds.push(0.0);
        bounds.extend(self.curvature_crossings(seg, eps));
        bounds.push(1.0);
        let mut runs = Vec::new();
        for pair in bounds.windows(2) {
            let (mut a, mut b) = (pair[0], pair[1]);
            if b <= a || !self.is_valid_at(seg, 0.5 * (a + b), MIN_STRETCH) {
                continue;
            }
            if a > 0.0 && !self.is_valid_at(seg, a, margin) {
                let Some(t) = self.valid_near(seg, a, b) else {
                    continue;
                };
                a = t;
            }
            if b < 1.0 && !self.is_valid_at(seg, b, margin) {
                let Some(t) = self.valid_near(seg, b, a) else {
                    continue;
                };
                b = t;
            }
            runs.extend(self.offset_piece(seg, a, b, 0, eps, fallbacks));
        }
        runs
    }

    /// Parameters where `κ·d` crosses 1, in increasing order.
    ///
    /// Points where the curvature is undefined are included as well.
    fn curvature_crossings(&self, seg: &PathSeg, eps: f64) -> Vec<f64> {
        let d = self.params.distance;
        let f = |t: f64| seg.curvature(t).map_or(f64::NAN, |k| k * d - 1.0);
        let t_eps = (eps / seg.polygon_len()).clamp(1e-12, 1e-3);
        let n = self.params.look_samples - 1;
        let mut crossings = Vec::new();
        let (mut t0, mut y0) = (0.0, f(0.0));
        for i in 1..=n {
            let t1 = i as f64 / n as f64;
            let y1 = f(t1);
            if !y1.is_finite() {
                if i < n {
                    crossings.push(t1);
                }
            } else if y0.is_finite() && (y0 < 0.0) != (y1 < 0.0) {
                let k1 = 0.2 / (t1 - t0);
                let t = if y0 < 0.0 {
                    solve_itp(&f, t0, t1, t_eps, 1, k1, y0, y1)
                } else {
                    solve_itp(|t| -f(t), t0, t1, t_eps, 1, k1, -y0, -y1)
                };
                crossings.push(t);
            }
            (t0, y0) = (t1, y1);
        }
        crossings
    }

    /// Whether `1 - κ·d` exceeds `margin` at `t`.
    fn is_valid_at(&self, seg: &PathSeg, t: f64, margin: f64) -> bool {
        matches!(seg.curvature(t), Some(k) if 1.0 - k * self.params.distance > margin)
    }

    /// Step from `t` towards `toward` until the parallel is well defined.
    ///
    /// At least one step is taken. Returns `None` when `toward` is passed.
    fn valid_near(&self, seg: &PathSeg, t: f64, toward: f64) -> Option<f64> {
        let margin = self.params.rel_error.max(MIN_STRETCH);
        let step = self.params.search_step.copysign(toward - t);
        let mut t = t + step;
        while (toward - t) * step > 0.0 {
            if self.is_valid_at(seg, t, margin) {
                return Some(t);
            }
            t += step;
        }
        None
    }

    /// The parallel of the piece `a..b` of a segment, split around points
    /// where it does not exist.
    fn offset_piece(
        &self,
        seg: &PathSeg,
        a: f64,
        b: f64,
        splits: usize,
        eps: f64,
        fallbacks: &mut usize,
    ) -> Vec<Run> {
        let mut segs = Vec::new();
        let mut lines = 0;
        match self.offset_range(seg, a..b, 0, eps, &mut segs, &mut lines) {
            Ok(()) => {
                *fallbacks += lines;
                let mut sp = Subpath::new(eps);
                sp.extend(segs);
                if sp.is_empty() {
                    return Vec::new();
                }
                vec![Run {
                    sp,
                    from_start: a == 0.0,
                    to_end: b == 1.0,
                }]
            }
            Err(InvalidParam { t }) => {
                log::debug!("no parallel at t = {t}, splitting");
                let mut runs = Vec::new();
                if splits >= MAX_SPLITS {
                    return runs;
                }
                if let Some(end) = self.valid_near(seg, t, a) {
                    runs.extend(self.offset_piece(seg, a, end, splits + 1, eps, fallbacks));
                }
                if let Some(start) = self.valid_near(seg, t, b) {
                    runs.extend(self.offset_piece(seg, start, b, splits + 1, eps, fallbacks));
                }
                runs
            }
        }
    }

    /// Fit cubics to the parallel of `a..b`, bisecting until every cubic
    /// keeps the distance.
    fn offset_range(
        &self,
        seg: &PathSeg,
        range: Range<f64>,
        depth: usize,
        eps: f64,
        out: &mut Vec<PathSeg>,
        lines: &mut usize,
    ) -> Result<(), InvalidParam> {
        let Range { start: a, end: b } = range;
        let d = self.params.distance;
        for t in [a, b] {
            if !self.is_valid_at(seg, t, MIN_STRETCH) {
                return Err(InvalidParam { t });
            }
        }
        let ta = seg.tangent(a).ok_or(InvalidParam { t: a })?;
        let tb = seg.tangent(b).ok_or(InvalidParam { t: b })?;
        let pa = seg.eval(a) + d * ta.turn_90();
        let pb = seg.eval(b) + d * tb.turn_90();
        let fitted = fit_control_arms(
            pa,
            ta,
            self.offset_curvature(seg, a),
            pb,
            tb,
            self.offset_curvature(seg, b),
            eps,
        )
        .ok()
        .and_then(|arms| arms.into_iter().find(ControlArms::is_positive))
        .map(|arms| arms.to_cubic(pa, ta, pb, tb));
        if let Some(c) = fitted {
            if self.keeps_distance(&seg.subsegment(a..b), &c) {
                out.push(c.into());
                return Ok(());
            }
        }
        if depth >= MAX_DEPTH {
            *lines += 1;
            out.push(Line::new(pa, pb).into());
            return Ok(());
        }
        let mid = 0.5 * (a + b);
        if !self.is_valid_at(seg, mid, MIN_STRETCH) {
            return Err(InvalidParam { t: mid });
        }
        self.offset_range(seg, a..mid, depth + 1, eps, out, lines)?;
        self.offset_range(seg, mid..b, depth + 1, eps, out, lines)
    }

    /// Curvature of the parallel: `κ / (1 - κ·d)`.
    fn offset_curvature(&self, seg: &PathSeg, t: f64) -> f64 {
        seg.curvature(t)
            .map_or(0.0, |k| k / (1.0 - k * self.params.distance))
    }

    /// Whether a candidate lies at the right distance, on the right side.
    fn keeps_distance(&self, piece: &PathSeg, c: &CubicBez) -> bool {
        let d = self.params.distance;
        let tolerance = self.params.rel_error * d.abs();
        let accuracy = 0.01 * tolerance;
        self.params.check_params.iter().all(|&s| {
            let q = c.eval(s);
            let near = piece.nearest(q, accuracy);
            let Some(tangent) = piece.tangent(near.t) else {
                return false;
            };
            let side = tangent.cross(q - piece.eval(near.t)) * d;
            side > 0.0 && (near.distance_sq.sqrt() - d.abs()).abs() <= tolerance
        })
    }
}

/// What happens at a cut of the raw parallel.
#[derive(Clone, Copy, Debug, PartialEq)]
enum CutKind {
    Start,
    /// Crossing with another part of the parallel, at cut `partner`.
    Crossing { partner: usize },
    /// Meeting the original path.
    Touch,
    End,
}

#[derive(Clone, Copy, Debug)]
struct Cut {
    at: PathParam,
    kind: CutKind,
}

impl Cut {
    fn rank(&self) -> u8 {
        match self.kind {
            CutKind::Start => 0,
            CutKind::End => 2,
            _ => 1,
        }
    }
}

/// The raw parallel between two consecutive cuts.
#[derive(Clone, Copy, Debug)]
struct Edge {
    from: usize,
    to: usize,
    valid: bool,
}

/// The raw parallel split at its crossings.
struct Graph<'a> {
    raw: &'a Path,
    cuts: Vec<Cut>,
    edges: Vec<Edge>,
    /// The edge leaving each cut.
    outgoing: Vec<Option<usize>>,
}

impl Graph<'_> {
    /// The geometry of an edge.
    fn segments(&self, edge: Edge) -> Subpath {
        let (from, to) = (self.cuts[edge.from].at, self.cuts[edge.to].at);
        let sp = &self.raw.subpaths()[from.subpath];
        let (from, to) = (from.seg_param(), to.seg_param());
        if to > from || !sp.is_closed() {
            return sp.slice(from, to);
        }
        let mut piece = sp.slice(from, sp.end_param());
        piece.extend(sp.slice(SegParam::new(0, 0.0), to).segments().iter().copied());
        piece
    }

    /// Whether an edge stays at least `min_distance` away from `original`.
    fn keeps_clear(&self, edge: Edge, original: &Subpath, min_distance: f64) -> bool {
        let piece = self.segments(edge);
        if piece.is_empty() {
            let at = self.cuts[edge.from].at;
            return matches!(self.raw.eval(at), Some(p) if original.distance_to(p) >= min_distance);
        }
        stays_clear(&piece, original, min_distance)
    }
}

/// Whether every segment of `piece`, sampled at both ends and
/// [`CLEARANCE_SAMPLES`] intervals, is at least `min_distance` away from
/// `original`.
fn stays_clear(piece: &Subpath, original: &Subpath, min_distance: f64) -> bool {
    piece.segments().iter().all(|seg| {
        (0..=CLEARANCE_SAMPLES).all(|i| {
            let p = seg.eval(i as f64 / CLEARANCE_SAMPLES as f64);
            original.distance_to(p) >= min_distance
        })
    })
}

impl Parallel {
    /// Cut away the parts of the raw parallel that are too close to the
    /// original.
    fn resolve(&self, raw: Path, original: &Subpath) -> Path {
        let crossings = raw.self_intersections();
        let touches = raw.intersections_with(&Path::from(original.clone()));
        if crossings.is_empty() {
            if touches.is_empty() {
                return raw;
            }
            log::debug!("parallel meets the original without crossing itself, dropped");
            return Path::new();
        }
        log::trace!(
            "resolving {} crossings, {} touches",
            crossings.len(),
            touches.len()
        );

        let mut cuts = Vec::new();
        for (k, sp) in raw.subpaths().iter().enumerate() {
            if !sp.is_closed() {
                let end = sp.end_param();
                cuts.push(Cut {
                    at: PathParam::new(k, 0, 0.0),
                    kind: CutKind::Start,
                });
                cuts.push(Cut {
                    at: PathParam::new(k, end.segment, end.t),
                    kind: CutKind::End,
                });
            }
        }
        for &(a, b) in &crossings {
            let i = cuts.len();
            cuts.push(Cut {
                at: a,
                kind: CutKind::Crossing { partner: i + 1 },
            });
            cuts.push(Cut {
                at: b,
                kind: CutKind::Crossing { partner: i },
            });
        }
        cuts.extend(touches.iter().map(|&(a, _)| Cut {
            at: a,
            kind: CutKind::Touch,
        }));

        let mut order: Vec<usize> = (0..cuts.len()).collect();
        order.sort_by(|&i, &j| {
            let (a, b) = (&cuts[i], &cuts[j]);
            a.at.partial_cmp(&b.at)
                .unwrap_or(Ordering::Equal)
                .then(a.rank().cmp(&b.rank()))
        });

        let mut graph = Graph {
            raw: &raw,
            edges: Vec::new(),
            outgoing: vec![None; cuts.len()],
            cuts,
        };
        let mut result = Path::new();
        let min_distance = self.params.distance.abs() * (1.0 - self.params.rel_error);
        for (k, sp) in raw.subpaths().iter().enumerate() {
            let group: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&c| graph.cuts[c].at.subpath == k)
                .collect();
            if group.is_empty() {
                // A closed loop crossing nothing.
                if stays_clear(sp, original, min_distance) {
                    result.push(sp.clone());
                }
                continue;
            }
            let mut pairs: Vec<(usize, usize)> = group.windows(2).map(|w| (w[0], w[1])).collect();
            if sp.is_closed() {
                pairs.push((group[group.len() - 1], group[0]));
            }
            for (from, to) in pairs {
                let touches_original = [from, to]
                    .iter()
                    .any(|&c| graph.cuts[c].kind == CutKind::Touch);
                let mut edge = Edge {
                    from,
                    to,
                    valid: false,
                };
                edge.valid = !touches_original && graph.keeps_clear(edge, original, min_distance);
                graph.outgoing[from] = Some(graph.edges.len());
                graph.edges.push(edge);
            }
        }

        let mut starts: Vec<usize> = (0..graph.edges.len()).collect();
        starts.sort_by_key(|&e| graph.cuts[graph.edges[e].from].kind != CutKind::Start);
        let mut visited = vec![false; graph.edges.len()];
        for start in starts {
            if visited[start] || !graph.edges[start].valid {
                continue;
            }
            let mut out = Subpath::new(original.epsilon());
            let mut edge = start;
            let closed = loop {
                visited[edge] = true;
                out.extend(graph.segments(graph.edges[edge]).segments().iter().copied());
                let usable = |e: usize| graph.edges[e].valid && (!visited[e] || e == start);
                let at = graph.edges[edge].to;
                let next = match graph.cuts[at].kind {
                    CutKind::Crossing { partner } => {
                        let cont = graph.outgoing[at].filter(|&e| usable(e));
                        let other = graph.outgoing[partner].filter(|&e| usable(e));
                        match (cont, other) {
                            (Some(c), Some(o)) => {
                                let here = graph.cuts[at].at;
                                let there = graph.cuts[partner].at;
                                Some(if self.switches(&raw, here, there) { o } else { c })
                            }
                            (c, o) => c.or(o),
                        }
                    }
                    _ => None,
                };
                match next {
                    Some(e) if e == start => break true,
                    Some(e) => edge = e,
                    None => break false,
                }
            };
            if closed {
                out.close();
            }
            result.push(out);
        }
        result
    }

    /// Whether the walk leaves its branch at a crossing.
    ///
    /// The walk turns onto the other branch when that one heads to the
    /// side of the parallel away from the original.
    fn switches(&self, raw: &Path, here: PathParam, there: PathParam) -> bool {
        let sign = self.params.distance.signum();
        let sp_here = &raw.subpaths()[here.subpath];
        let sp_there = &raw.subpaths()[there.subpath];
        let (Some(t_in), Some(t_other)) = (
            sp_here.tangent(here.seg_param()),
            sp_there.tangent(there.seg_param()),
        ) else {
            return false;
        };
        let turn = t_in.cross(t_other);
        if turn.abs() > PARALLEL_TANGENTS {
            return turn * sign > 0.0;
        }
        let k_in = sp_here.curvature(here.seg_param()).unwrap_or(0.0);
        let k_other = sp_there.curvature(there.seg_param()).unwrap_or(0.0);
        (k_other - k_in) * sign > 0.0
    }
}
