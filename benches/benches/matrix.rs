// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_matrix::{Matrix, PinPair, solve_pins};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_f64(&mut self, scale: f64) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX) * scale
    }

    fn point(&mut self) -> Point {
        Point::new(self.gen_f64(500.0), self.gen_f64(500.0))
    }
}

fn matrices(n: usize, axis_aligned: bool, seed: u64) -> Vec<Matrix> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| {
            let mut m = Matrix::IDENTITY;
            m.scale(rng.gen_f64(2.0) + 0.5, rng.gen_f64(2.0) + 0.5);
            if !axis_aligned {
                m.rotate(rng.gen_f64(6.0));
            }
            m.translate(rng.gen_f64(100.0), rng.gen_f64(100.0));
            m
        })
        .collect()
}

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_matrix");

    for axis_aligned in [true, false] {
        let input = matrices(256, axis_aligned, 0x3A7_0000_0000_0001);

        group.bench_function(format!("concat_chain(axis_aligned={axis_aligned})"), |b| {
            b.iter(|| {
                let mut acc = Matrix::IDENTITY;
                for m in &input {
                    acc.concat(m);
                }
                black_box(acc)
            });
        });

        group.bench_function(format!("invert(axis_aligned={axis_aligned})"), |b| {
            b.iter(|| {
                for m in &input {
                    black_box(m.inverse());
                }
            });
        });
    }

    for pin_count in 1..=3 {
        let mut rng = Lcg::new(0x9123_0000_0000_0001);
        let sets: Vec<Vec<PinPair>> = (0..256)
            .map(|_| {
                (0..pin_count)
                    .map(|_| PinPair::new(rng.point(), rng.point()))
                    .collect()
            })
            .collect();

        group.bench_function(format!("solve_pins(pins={pin_count})"), |b| {
            b.iter(|| {
                for pins in &sets {
                    black_box(solve_pins(pins, Size::new(120.0, 80.0)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_matrix);
criterion_main!(benches);
