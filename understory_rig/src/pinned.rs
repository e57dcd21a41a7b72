// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinned parts: parts whose matrix is solved from up to three pins.

use kurbo::Point;

use crate::Scene;
use crate::id::{CalculatedId, PinnedPartId};
use crate::node::{Node, PinSlotState, PinnedPart};
use crate::pin::Axis;

/// One of the three pins of a pinned part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PinSlot {
    /// The first pin.
    A,
    /// The second pin.
    B,
    /// The third pin.
    C,
}

impl PinSlot {
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

/// A declared dimension of a pinned part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Width.
    Width,
    /// Height.
    Height,
}

/// Handle to one attached pin of a pinned part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PinnedPartPinId {
    /// The pinned part.
    pub part: PinnedPartId,
    /// Which pin.
    pub slot: PinSlot,
}

impl Scene {
    /// Creates a detached pinned part with no pins.
    pub fn pinned_part(&mut self) -> PinnedPartId {
        PinnedPartId(self.alloc(Node::PinnedPart(PinnedPart::default())))
    }

    /// The calculated width or height of `part`, created at
    /// [`SceneOptions::default_size`](crate::SceneOptions::default_size) on
    /// first access.
    pub fn pinned_part_dimension(&mut self, part: PinnedPartId, dimension: Dimension) -> CalculatedId {
        let slot = match dimension {
            Dimension::Width => 0,
            Dimension::Height => 1,
        };
        if let Node::PinnedPart(node) = self.node(part.0) {
            if let Some(existing) = node.size[slot] {
                return CalculatedId(existing);
            }
        }
        let created = self.calculated(self.options().default_size);
        if let Node::PinnedPart(node) = self.node_mut(part.0) {
            node.size[slot] = Some(created.0);
        }
        created
    }

    /// Sets the base value of a pinned part's width or height.
    pub fn set_pinned_part_dimension(
        &mut self,
        part: PinnedPartId,
        dimension: Dimension,
        value: f64,
    ) -> CalculatedId {
        let id = self.pinned_part_dimension(part, dimension);
        self.set_base_value(id, value);
        id
    }

    /// Attaches the pin in `slot`, anchored at `origin` in the part's own
    /// unscaled space.
    ///
    /// The first call creates the pin; later calls return the same pin and
    /// leave its origin unchanged (use [`Scene::pin_origin`] to edit it).
    /// The pin only takes part in the solve once one of its target
    /// coordinates has been accessed through [`Scene::pin_target`].
    pub fn attach_pin(&mut self, part: PinnedPartId, slot: PinSlot, origin: Point) -> PinnedPartPinId {
        let id = PinnedPartPinId { part, slot };
        if let Node::PinnedPart(node) = self.node(part.0) {
            if node.pins[slot.slot()].is_some() {
                return id;
            }
        }
        let origin = [self.calculated(origin.x).0, self.calculated(origin.y).0];
        if let Node::PinnedPart(node) = self.node_mut(part.0) {
            node.pins[slot.slot()] = Some(PinSlotState {
                origin,
                target: [None, None],
            });
        }
        id
    }

    /// The calculated origin coordinate of an attached pin.
    ///
    /// Returns `None` if the slot has not been attached.
    #[must_use]
    pub fn pin_origin(&self, pin: PinnedPartPinId, axis: Axis) -> Option<CalculatedId> {
        self.pin_state(pin)
            .map(|state| CalculatedId(state.origin[axis.slot()]))
    }

    /// The calculated world-space target coordinate of an attached pin,
    /// created at `0` on first access.
    ///
    /// Returns `None` if the slot has not been attached; nothing is created.
    pub fn pin_target(&mut self, pin: PinnedPartPinId, axis: Axis) -> Option<CalculatedId> {
        let state = self.pin_state(pin)?;
        if let Some(existing) = state.target[axis.slot()] {
            return Some(CalculatedId(existing));
        }
        let created = self.calculated(0.0);
        if let Node::PinnedPart(node) = self.node_mut(pin.part.0) {
            if let Some(state) = &mut node.pins[pin.slot.slot()] {
                state.target[axis.slot()] = Some(created.0);
            }
        }
        Some(created)
    }

    /// Sets the base values of both target coordinates of an attached pin.
    ///
    /// Does nothing if the slot has not been attached.
    pub fn set_pin_target(&mut self, pin: PinnedPartPinId, target: Point) {
        if let Some(x) = self.pin_target(pin, Axis::X) {
            self.set_base_value(x, target.x);
        }
        if let Some(y) = self.pin_target(pin, Axis::Y) {
            self.set_base_value(y, target.y);
        }
    }

    fn pin_state(&self, pin: PinnedPartPinId) -> Option<&PinSlotState> {
        match self.node(pin.part.0) {
            Node::PinnedPart(node) => node.pins[pin.slot.slot()].as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PartAttribute, RenderedAttribute};

    fn render(scene: &mut Scene, part: PinnedPartId) {
        let list = scene.compile(part).unwrap();
        scene.render_list(&list, &[], &mut ());
    }

    fn assert_maps(scene: &Scene, part: PinnedPartId, from: Point, to: Point) {
        let got = scene.matrix(part).transform_point(from);
        assert!(
            (got.x - to.x).abs() < 1e-9 && (got.y - to.y).abs() < 1e-9,
            "{from:?} mapped to {got:?}, want {to:?}"
        );
    }

    #[test]
    fn no_targets_means_identity() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        scene.attach_pin(part, PinSlot::A, Point::new(3.0, 4.0));
        render(&mut scene, part);
        assert!(scene.matrix(part).is_identity());
    }

    #[test]
    fn one_pin_translates() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        let a = scene.attach_pin(part, PinSlot::A, Point::ZERO);
        scene.set_pin_target(a, Point::new(5.0, 7.0));
        render(&mut scene, part);

        let m = scene.matrix(part);
        assert_eq!((m.a, m.b, m.c, m.d), (1.0, 0.0, 0.0, 1.0));
        assert_maps(&scene, part, Point::new(2.0, 3.0), Point::new(7.0, 10.0));
    }

    #[test]
    fn three_pins_on_their_origins_give_identity() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        scene.set_pinned_part_dimension(part, Dimension::Width, 40.0);
        scene.set_pinned_part_dimension(part, Dimension::Height, 20.0);
        for (slot, corner) in [
            (PinSlot::A, Point::ZERO),
            (PinSlot::B, Point::new(40.0, 0.0)),
            (PinSlot::C, Point::new(0.0, 20.0)),
        ] {
            let pin = scene.attach_pin(part, slot, corner);
            scene.set_pin_target(pin, corner);
        }
        render(&mut scene, part);

        let m = scene.matrix(part);
        for (got, want) in [(m.a, 1.0), (m.b, 0.0), (m.c, 0.0), (m.d, 1.0), (m.x, 0.0), (m.y, 0.0)] {
            assert!((got - want).abs() < 1e-12, "{m:?}");
        }
    }

    #[test]
    fn one_target_axis_is_enough_to_participate() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        let a = scene.attach_pin(part, PinSlot::A, Point::new(0.0, 15.0));
        let x = scene.pin_target(a, Axis::X).unwrap();
        scene.set_base_value(x, 50.0);
        render(&mut scene, part);

        // The untouched y target reads as 0.
        assert_maps(&scene, part, Point::new(0.0, 15.0), Point::new(50.0, 0.0));
    }

    #[test]
    fn attach_keeps_first_origin() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        let first = scene.attach_pin(part, PinSlot::B, Point::new(1.0, 2.0));
        let again = scene.attach_pin(part, PinSlot::B, Point::new(9.0, 9.0));
        assert_eq!(first, again);
        let x = scene.pin_origin(again, Axis::X).unwrap();
        assert_eq!(scene.value(x), 1.0);
    }

    #[test]
    fn unattached_slot_has_no_cells() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        scene.attach_pin(part, PinSlot::A, Point::ZERO);
        let c = PinnedPartPinId {
            part,
            slot: PinSlot::C,
        };
        let nodes = scene.node_count();
        assert_eq!(scene.pin_origin(c, Axis::X), None);
        assert_eq!(scene.pin_target(c, Axis::Y), None);
        scene.set_pin_target(c, Point::new(42.0, 42.0));
        assert_eq!(scene.node_count(), nodes);

        // Unset attributes of other parts still read zero.
        let other = scene.part();
        let rotation = scene.rendered(other, RenderedAttribute::Rotation);
        let list = scene.compile(other).unwrap();
        scene.render_list(&list, &[], &mut ());
        assert!(scene.matrix(other).is_identity());
        assert_eq!(scene.value(rotation), 0.0);
    }

    #[test]
    fn two_pins_follow_a_moving_part() {
        let mut scene = Scene::new();
        let root = scene.part();
        let anchor = scene.part();
        let pinned = scene.pinned_part();
        scene.add_children(root, [anchor]);
        scene.add_child(root, pinned);
        scene.set_part_attribute(anchor, PartAttribute::X, 80.0);
        scene.set_pinned_part_dimension(pinned, Dimension::Width, 30.0);
        scene.set_pinned_part_dimension(pinned, Dimension::Height, 30.0);

        let a = scene.attach_pin(pinned, PinSlot::A, Point::new(0.0, 15.0));
        scene.set_pin_target(a, Point::new(50.0, 50.0));
        let b = scene.attach_pin(pinned, PinSlot::B, Point::new(30.0, 15.0));
        let anchor_x = scene.rendered(anchor, RenderedAttribute::X);
        let anchor_y = scene.rendered(anchor, RenderedAttribute::Y);
        let bx = scene.pin_target(b, Axis::X).unwrap();
        scene.modify(bx).assign(anchor_x);
        let by = scene.pin_target(b, Axis::Y).unwrap();
        scene.modify(by).assign(anchor_y).add(50.0);

        let list = scene.compile(root).unwrap();
        scene.render_list(&list, &[], &mut ());
        assert_maps(&scene, pinned, Point::new(0.0, 15.0), Point::new(50.0, 50.0));
        assert_maps(&scene, pinned, Point::new(30.0, 15.0), Point::new(80.0, 50.0));

        scene.set_part_attribute(anchor, PartAttribute::X, 110.0);
        scene.render_list(&list, &[], &mut ());
        assert_maps(&scene, pinned, Point::new(30.0, 15.0), Point::new(110.0, 50.0));
        assert!((scene.matrix(pinned).x_scale() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn parent_matrix_is_not_inherited() {
        let mut scene = Scene::new();
        let parent = scene.part();
        let pinned = scene.pinned_part();
        scene.add_child(parent, pinned);
        scene.set_part_attribute(parent, PartAttribute::X, 500.0);
        let a = scene.attach_pin(pinned, PinSlot::A, Point::ZERO);
        scene.set_pin_target(a, Point::new(1.0, 2.0));

        let list = scene.compile(parent).unwrap();
        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.matrix(pinned).x, 1.0);
    }

    #[test]
    fn rendered_size_of_pinned_part() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        let width = scene.rendered(part, RenderedAttribute::Width);
        assert_eq!(scene.value(width), 100.0);

        scene.set_pinned_part_dimension(part, Dimension::Width, 10.0);
        let a = scene.attach_pin(part, PinSlot::A, Point::ZERO);
        let b = scene.attach_pin(part, PinSlot::B, Point::new(10.0, 0.0));
        scene.set_pin_target(a, Point::ZERO);
        scene.set_pin_target(b, Point::new(30.0, 0.0));
        render(&mut scene, part);
        assert!((scene.value(width) - 30.0).abs() < 1e-9);
    }
}
