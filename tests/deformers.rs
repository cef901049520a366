// Copyright 2026 the pathdeform Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the deformers.

use pathdeform::{
    deform_chain, fit_control_arms, CubicBez, Cycloid, CycloidParams, DeformError, Deformer,
    Line, ParamCurve, ParamCurveCurvature, Parallel, ParallelParams, Path, PathSeg, Point,
    Smoothed, SmoothedParams, Subpath, WarningKind,
};

const EPSILON: f64 = 1e-5;

fn square(side: f64) -> Subpath {
    Subpath::polyline(
        [
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ],
        true,
        EPSILON,
    )
}

/// A closed shape with one bulging side.
fn bulge() -> Subpath {
    let mut sp = Subpath::new(EPSILON);
    sp.push(Line::new((0.0, 0.0), (40.0, 0.0)).into());
    sp.curve_to(CubicBez::new((40.0, 0.0), (55.0, 10.0), (55.0, 30.0), (40.0, 40.0)));
    sp.push(Line::new((40.0, 40.0), (0.0, 40.0)).into());
    sp.close();
    sp
}

fn assert_continuous(path: &Path) {
    for sp in path.subpaths() {
        let eps = sp.epsilon();
        for pair in sp.segments().windows(2) {
            assert!(
                pair[0].end().is_within(pair[1].start(), eps),
                "gap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
        if sp.is_closed() {
            let (start, end) = (sp.start().unwrap(), sp.end().unwrap());
            assert!(end.is_within(start, eps), "open end {end:?} vs {start:?}");
        }
    }
}

#[test]
fn spring_along_a_line() {
    let base = Path::from(Subpath::polyline(
        [Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        false,
        EPSILON,
    ));
    let params = CycloidParams::default()
        .with_radius(0.5)
        .with_halfloops(4)
        .with_skip(0.0, 0.0)
        .with_turn_angle(0.0);
    let result = Cycloid::new(params).unwrap().deform(&base);
    assert!(result.warnings.is_empty());
    assert_eq!(result.path.len(), 1);
    let spring = &result.path.subpaths()[0];
    assert_eq!(spring.len(), 4 * 3);
    assert!(spring
        .segments()
        .iter()
        .all(|s| matches!(s, PathSeg::Cubic(_))));
    assert!(spring.start().unwrap().distance(Point::new(0.0, 0.0)) < 1e-9);
    assert!(spring.end().unwrap().distance(Point::new(10.0, 0.0)) < 1e-9);
    assert!(spring.arclen() > 10.0);
}

#[test]
fn circle_parallels() {
    let circle = Subpath::circle(Point::new(5.0, 5.0), 20.0, EPSILON);
    let inward = Parallel::new(ParallelParams::new(5.0)).unwrap();
    let result = inward.deform(&circle.clone().into());
    assert!(result.warnings.is_empty());
    assert_eq!(result.path.len(), 1);
    let out = &result.path.subpaths()[0];
    assert!(out.is_closed());
    // No corner arcs and no subdivision.
    assert_eq!(out.len(), circle.len());
    for (_, _, seg) in result.path.segments() {
        for t in [0.0, 0.3, 0.5, 0.8] {
            let r = seg.eval(t).distance(Point::new(5.0, 5.0));
            assert!((r - 15.0).abs() < 1e-3, "radius {r}");
        }
    }

    for d in [20.0, 30.0] {
        let gone = Parallel::new(ParallelParams::new(d))
            .unwrap()
            .deform(&circle.clone().into());
        assert!(gone.path.is_empty(), "distance {d}");
    }
}

#[test]
fn every_output_is_continuous() {
    let input = Path::from_subpaths([bulge(), square(10.0)]);
    let spring = CycloidParams::default()
        .with_radius(2.0)
        .with_skip(3.0, 3.0);
    let deformers: Vec<Box<dyn Deformer>> = vec![
        Box::new(Cycloid::new(spring).unwrap()),
        Box::new(Smoothed::new(SmoothedParams::new(4.0)).unwrap()),
        Box::new(Smoothed::new(SmoothedParams::new(4.0).with_obey_curvature(true)).unwrap()),
        Box::new(Parallel::new(ParallelParams::new(2.0)).unwrap()),
        Box::new(Parallel::new(ParallelParams::new(-2.0)).unwrap()),
        Box::new(Parallel::new(ParallelParams::new(-2.0).with_sharp_corners(true)).unwrap()),
    ];
    for deformer in &deformers {
        let result = deformer.deform(&input);
        assert!(!result.path.is_empty());
        assert_continuous(&result.path);
    }
}

#[test]
fn fitted_cubics_reproduce_curvatures() {
    let curves = [
        CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0)),
        CubicBez::new((0.0, 0.0), (2.0, 0.5), (3.0, 1.5), (3.5, 4.0)),
        CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, -1.0), (3.0, 0.0)),
    ];
    for c in curves {
        let (a, b) = (c.start(), c.end());
        let ta = (c.p1 - c.p0).normalize();
        let tb = (c.p3 - c.p2).normalize();
        let (ka, kb) = (c.curvature(0.0), c.curvature(1.0));
        let arms = fit_control_arms(a, ta, ka, b, tb, kb, EPSILON).unwrap();
        let chord = a.distance(b);
        let mut checked = 0;
        for arm in arms.iter().filter(|arm| arm.start.min(arm.end) > 0.1 * chord) {
            let fitted = arm.to_cubic(a, ta, b, tb);
            let (fa, fb) = (fitted.curvature(0.0), fitted.curvature(1.0));
            assert!((fa - ka).abs() * chord < 1e-4 * (1.0 + (ka * chord).abs()), "{fa} vs {ka}");
            assert!((fb - kb).abs() * chord < 1e-4 * (1.0 + (kb * chord).abs()), "{fb} vs {kb}");
            checked += 1;
        }
        assert!(checked > 0, "no usable arms for {c:?}");
    }
}

#[test]
fn parallel_keeps_its_distance() {
    let c = CubicBez::new((0.0, 0.0), (10.0, 10.0), (20.0, -10.0), (30.0, 0.0));
    let sp = Subpath::from_segments([c.into()], false, EPSILON);
    let checks = [0.2, 0.4, 0.6, 0.8];
    for d in [1.0, -1.0, 3.0] {
        let params = ParallelParams::new(d).with_check_params(checks);
        let result = Parallel::new(params).unwrap().deform(&sp.clone().into());
        assert!(result.warnings.is_empty());
        for (_, _, seg) in result.path.segments() {
            for t in checks {
                let dist = sp.distance_to(seg.eval(t));
                assert!((dist - d.abs()).abs() <= 0.05 * d.abs(), "d = {d}: {dist}");
            }
        }
    }
}

#[test]
fn wide_inward_parallel_vanishes() {
    let shape = Path::from(bulge());
    for d in [25.0, 30.0] {
        let result = Parallel::new(ParallelParams::new(d)).unwrap().deform(&shape);
        assert!(result.path.is_empty(), "distance {d}: {:?}", result.path);
    }
}

#[test]
fn offset_back_and_forth() {
    let c = CubicBez::new((0.0, 0.0), (10.0, 10.0), (20.0, -10.0), (30.0, 0.0));
    let original = Subpath::from_segments([c.into()], false, EPSILON);
    let there = Parallel::new(ParallelParams::new(1.0)).unwrap();
    let first = there.deform(&original.clone().into()).path;

    let back = Parallel::new(ParallelParams::new(-1.0)).unwrap();
    let returned = [
        back.deform(&first).path,
        there.deform(&first.reversed()).path.reversed(),
    ];
    for path in &returned {
        assert_eq!(path.len(), 1);
        let sp = &path.subpaths()[0];
        assert!(sp.start().unwrap().distance(Point::new(0.0, 0.0)) < 1e-6);
        assert!(sp.end().unwrap().distance(Point::new(30.0, 0.0)) < 1e-6);
        for (_, _, seg) in path.segments() {
            for t in [0.25, 0.5, 0.75] {
                assert!(original.distance_to(seg.eval(t)) < 0.1);
            }
        }
    }
}

#[test]
fn smoothing_is_local() {
    let radius = 1.5;
    let input = square(10.0);
    let result = Smoothed::new(SmoothedParams::new(radius))
        .unwrap()
        .deform(&input.clone().into());
    let corners = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)].map(Point::from);
    let mut moved = 0;
    for (_, _, seg) in result.path.segments() {
        for i in 0..=10 {
            let p = seg.eval(f64::from(i) / 10.0);
            let near_corner = corners.iter().any(|c| c.distance(p) <= radius + 1e-9);
            if near_corner {
                moved += usize::from(input.distance_to(p) > 1e-6);
            } else {
                assert!(input.distance_to(p) < 1e-9, "{p:?} left the square");
            }
        }
    }
    assert!(moved > 0);
}

#[test]
fn degenerate_input_is_kept() {
    let short = Path::from(Subpath::polyline(
        [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        false,
        EPSILON,
    ));
    let result = Cycloid::new(CycloidParams::default()).unwrap().deform(&short);
    assert_eq!(result.path, short);
    assert_eq!(result.warnings[0].kind, WarningKind::TooShort);
    assert!(matches!(result.strict(), Err(DeformError::Warning(_))));

    let tiny = Path::from(square(10.0));
    let params = SmoothedParams::new(100.0).with_rel_skip(0.5);
    let result = Smoothed::new(params).unwrap().deform(&tiny);
    assert_eq!(result.path, tiny);
    assert_eq!(result.warnings[0].kind, WarningKind::SmoothedAway);
}

#[test]
fn chain_collects_warnings() {
    let short = Path::from(Subpath::polyline(
        [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        false,
        EPSILON,
    ));
    let cycloid = Cycloid::new(CycloidParams::default()).unwrap();
    let parallel = Parallel::new(ParallelParams::new(0.5)).unwrap();
    let result = deform_chain(&short, &[&cycloid, &parallel]);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].subpath, 0);
    let out = &result.path.subpaths()[0];
    assert!(out.start().unwrap().distance(Point::new(0.0, 0.5)) < 1e-12);
    assert!(out.end().unwrap().distance(Point::new(1.0, 0.5)) < 1e-12);
}
