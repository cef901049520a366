#![feature(test)]
extern crate test;
use pathdeform::common::{real_poly_roots, solve_cubic};
use test::Bencher;

#[bench]
fn bench_cubic(bb: &mut Bencher) {
    bb.iter(|| solve_cubic(test::black_box(-6.0), 11.0, -6.0, 1.0))
}

#[bench]
fn bench_companion_quartic(bb: &mut Bencher) {
    // (x - 1)(x - 2)(x - 3)(x - 4)
    let coeffs = [24.0, -50.0, 35.0, -10.0, 1.0];
    bb.iter(|| real_poly_roots(test::black_box(&coeffs), 1e-9))
}

#[bench]
fn bench_companion_sextic(bb: &mut Bencher) {
    let coeffs = [-1.0, 0.5, 3.0, -2.0, 0.25, 1.5, 1.0];
    bb.iter(|| real_poly_roots(test::black_box(&coeffs), 1e-9))
}
