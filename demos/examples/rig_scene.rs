// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless rig scene.
//!
//! A model holds a parent part with an animated, rotated child, a sibling
//! that follows the child, a pin on the child and a pinned part stretched
//! between a fixed point and the child. A frame ticker drives the model's
//! input 0 once per simulated second and a logging adapter prints every
//! matrix.
//!
//! Run:
//! - `RUST_LOG=info cargo run -p understory_demos --example rig_scene`
//! - `RUST_LOG=debug` also shows when lists are compiled.

use kurbo::Point;
use understory_rig::{
    Axis, Dimension, DisplayAdapter, DisplayHandle, PartAttribute, PinSlot, RenderedAttribute,
    RenderedNode, Scene,
};
use understory_timing::FrameTicker;

const CONTAINER_WIDTH: f64 = 400.0;
const VIEWPORT_WIDTH: f64 = 800.0;
const FRAMES: u32 = 5;

/// Logs what a DOM client would apply as a CSS transform.
struct LogClient {
    names: Vec<&'static str>,
}

impl LogClient {
    fn handle(&mut self, name: &'static str) -> DisplayHandle {
        self.names.push(name);
        DisplayHandle(self.names.len() as u64 - 1)
    }
}

impl DisplayAdapter for LogClient {
    fn render(&mut self, scene: &Scene, node: RenderedNode, handle: DisplayHandle) {
        let name = usize::try_from(handle.0)
            .ok()
            .and_then(|i| self.names.get(i))
            .copied()
            .unwrap_or("?");
        match node {
            RenderedNode::Part(part) => log::info!("{name}: {}", scene.matrix(part)),
            RenderedNode::PinnedPart(part) => log::info!("{name}: {}", scene.matrix(part)),
            RenderedNode::Pin(pin) => {
                if let Some(at) = scene.pin_position(pin) {
                    log::info!("{name}: {},{}", at.x, at.y);
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let mut client = LogClient { names: Vec::new() };

    let container = scene.model();
    let parent = scene.part();
    let child = scene.part();
    let sib = scene.part();
    let pin = scene.pin();
    let pinned = scene.pinned_part();
    scene.add_children(container, [parent]);
    scene.add_child(container, pinned);
    scene.add_children(parent, [child, sib]);
    scene.add_child(child, pin);

    for (node, name) in [(parent, "parent"), (child, "child"), (sib, "sib")] {
        let handle = client.handle(name);
        scene.set_display_handle(node, handle);
    }
    let handle = client.handle("pin");
    scene.set_display_handle(pin, handle);
    let handle = client.handle("pinned");
    scene.set_display_handle(pinned, handle);

    scene.set_part_attribute(parent, PartAttribute::X, 100.0);
    scene.set_part_attribute(parent, PartAttribute::Y, 150.0);

    // Slides left by one unit every 60 ms, wrapping every 50 units.
    let time = scene.input(0);
    let slide = scene.calculated(0.0);
    scene.modify(slide).add(time).divide(3000.0 / 50.0).remainder(50.0);
    let x = scene.set_part_attribute(child, PartAttribute::X, 50.0);
    scene.modify(x).subtract(slide);
    scene.set_part_attribute(child, PartAttribute::OriginX, 50.0);
    scene.set_part_attribute(child, PartAttribute::OriginY, 50.0);
    scene.set_part_attribute(child, PartAttribute::Rotation, 45.0);

    let child_x = scene.rendered(child, RenderedAttribute::X);
    let child_y = scene.rendered(child, RenderedAttribute::Y);
    let y = scene.part_attribute(sib, PartAttribute::Y);
    scene.modify(y).add(child_x);

    scene.set_pin_coordinate(pin, Axis::X, 0.0);
    scene.set_pin_coordinate(pin, Axis::Y, 0.0);

    scene.set_pinned_part_dimension(pinned, Dimension::Width, 30.0);
    scene.set_pinned_part_dimension(pinned, Dimension::Height, 30.0);
    let a = scene.attach_pin(pinned, PinSlot::A, Point::new(0.0, 15.0));
    scene.set_pin_target(a, Point::new(50.0, 50.0));
    let b = scene.attach_pin(pinned, PinSlot::B, Point::new(30.0, 15.0));
    if let Some(bx) = scene.pin_target(b, Axis::X) {
        scene.modify(bx).assign(child_x);
    }
    if let Some(by) = scene.pin_target(b, Axis::Y) {
        scene.modify(by).assign(child_y);
    }

    let ratio = VIEWPORT_WIDTH / CONTAINER_WIDTH;
    scene.set_part_attribute(container, PartAttribute::ScaleX, ratio);
    scene.set_part_attribute(container, PartAttribute::ScaleY, ratio);

    let clock = scene.scalar(0.0);
    scene.set_render_input_source(container, 0, clock);

    let mut ticker = FrameTicker::new();
    ticker.set_on_frame(|elapsed| log::debug!("frame at {elapsed} ms"));
    ticker.play();

    for frame in 0..FRAMES {
        let now = 1000.0 * f64::from(frame);
        let Some(elapsed) = ticker.frame(now) else {
            break;
        };
        log::info!("-- t = {elapsed} ms");
        scene.set_value(clock, elapsed);
        if let Err(err) = scene.render_model(container, &mut client) {
            log::error!("{err}");
            return;
        }
    }
    ticker.pause();
}
