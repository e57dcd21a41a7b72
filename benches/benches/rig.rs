// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_rig::{
    Axis, PartAttribute, PartId, PinSlot, RenderedAttribute, Scene, SceneList,
};

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

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }

    fn gen_f64(&mut self, scale: f64) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX) * scale
    }
}

/// A random tree of `n` parts. Every part moves with input 0; roughly one in
/// `cross` also reads the rendered x of an earlier part, and every eighth part
/// carries a pinned part following its parent.
fn build_scene(n: usize, cross: usize, seed: u64) -> (Scene, PartId) {
    let mut scene = Scene::new();
    let mut rng = Lcg::new(seed);
    let time = scene.input(0);
    let root = scene.part();
    let mut parts = vec![root];

    for i in 1..n {
        let part = scene.part();
        let parent = parts[rng.gen_range_usize(parts.len())];
        scene.add_child(parent, part);

        let x = scene.part_attribute(part, PartAttribute::X);
        scene.modify(x).add(time).divide(100.0).remainder(rng.gen_f64(50.0) + 1.0);
        scene.set_part_attribute(part, PartAttribute::Rotation, rng.gen_f64(360.0));

        // Parents precede children, so reading an earlier part never cycles.
        if cross > 0 && i % cross == 0 {
            let earlier = parts[rng.gen_range_usize(parts.len())];
            let rendered = scene.rendered(earlier, RenderedAttribute::X);
            let y = scene.part_attribute(part, PartAttribute::Y);
            scene.modify(y).add(rendered);
        }

        if i % 8 == 0 {
            let pinned = scene.pinned_part();
            scene.add_child(parent, pinned);
            let a = scene.attach_pin(pinned, PinSlot::A, Point::ZERO);
            scene.set_pin_target(a, Point::new(rng.gen_f64(100.0), rng.gen_f64(100.0)));
            let b = scene.attach_pin(pinned, PinSlot::B, Point::new(100.0, 0.0));
            let follow = scene.rendered(part, RenderedAttribute::X);
            if let Some(bx) = scene.pin_target(b, Axis::X) {
                scene.modify(bx).assign(follow);
            }
        }

        parts.push(part);
    }

    (scene, root)
}

fn compiled(n: usize, cross: usize) -> (Scene, SceneList) {
    let (scene, root) = build_scene(n, cross, 0x5CE_0000_0000_0001);
    let list = scene.compile(root).expect("generated scenes are acyclic");
    (scene, list)
}

fn bench_rig(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_rig");
    group.sample_size(50);

    for &(n, cross) in &[(64_usize, 0_usize), (64, 4), (1_024, 0), (1_024, 4)] {
        group.bench_function(format!("compile(n={n},cross={cross})"), |b| {
            let (scene, root) = build_scene(n, cross, 0x5CE_0000_0000_0001);
            b.iter(|| black_box(scene.compile(root).expect("acyclic")));
        });

        group.bench_function(format!("render_list(n={n},cross={cross})"), |b| {
            let (mut scene, list) = compiled(n, cross);
            let mut time = 0.0;
            b.iter(|| {
                time += 16.0;
                scene.render_list(&list, &[Some(time)], &mut ());
                black_box(&scene);
            });
        });
    }

    group.bench_function("render_model_cached(n=1024)", |b| {
        b.iter_batched(
            || {
                let (mut scene, root) = build_scene(1_024, 4, 0x5CE_0000_0000_0002);
                let model = scene.model();
                scene.add_child(model, root);
                let clock = scene.scalar(0.0);
                scene.set_render_input_source(model, 0, clock);
                scene.render_model(model, &mut ()).expect("acyclic");
                (scene, model, clock)
            },
            |(mut scene, model, clock)| {
                for frame in 0..16 {
                    scene.set_value(clock, f64::from(frame) * 16.0);
                    scene.render_model(model, &mut ()).expect("acyclic");
                }
                black_box(scene);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_rig);
criterion_main!(benches);
