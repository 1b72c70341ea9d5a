// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eikonal_fsm::field::VelocityField;
use eikonal_fsm::solver::{FastSweepingSolver, Relaxation};

fn make_solver(n: usize) -> FastSweepingSolver {
    let velocity = VelocityField::uniform([n, n], 1.0).unwrap();
    FastSweepingSolver::new(velocity, [n / 2, n / 2]).unwrap()
}

fn make_checkerboard_solver(n: usize) -> FastSweepingSolver {
    let mut speed = vec![0.0; n * n];
    for x in 0..n {
        for y in 0..n {
            speed[x * n + y] = if (x / 8 + y / 8) % 2 == 0 { 1.0 } else { 2.0 };
        }
    }
    let velocity = VelocityField::new([n, n], speed).unwrap();
    FastSweepingSolver::new(velocity, [n / 2, n / 2]).unwrap()
}

/// Baseline: 512^2 homogeneous, center source.
fn bench_uniform_512(c: &mut Criterion) {
    c.bench_function("uniform_512x512", |b| {
        b.iter_with_setup(
            || make_solver(512),
            |mut solver| {
                black_box(solver.solve());
                solver
            },
        );
    });
}

/// Grid size scaling: sweep count stays fixed, cost grows with cell count.
fn bench_grid_size_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_size_scaling");
    for &n in &[128, 256, 512, 1024] {
        group.bench_function(format!("{}x{}", n, n), |b| {
            b.iter_with_setup(
                || make_solver(n),
                |mut solver| {
                    black_box(solver.solve());
                    solver
                },
            );
        });
    }
    group.finish();
}

/// Heterogeneous speeds need more sweeps than a uniform field.
fn bench_checkerboard(c: &mut Criterion) {
    c.bench_function("checkerboard_256x256", |b| {
        b.iter_with_setup(
            || make_checkerboard_solver(256),
            |mut solver| {
                black_box(solver.solve());
                solver
            },
        );
    });
}

/// In-place versus double-buffered updates on a small grid.
fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation_128x128");
    for (name, relaxation) in [
        ("gauss_seidel", Relaxation::GaussSeidel),
        ("jacobi", Relaxation::Jacobi),
    ] {
        group.bench_function(name, |b| {
            b.iter_with_setup(
                || make_solver(128).with_relaxation(relaxation),
                |mut solver| {
                    black_box(solver.solve());
                    solver
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_uniform_512,
    bench_grid_size_scaling,
    bench_checkerboard,
    bench_relaxation,
);
criterion_main!(benches);
