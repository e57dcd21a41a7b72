// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pins: points in a parent's space.

use kurbo::Point;

use crate::Scene;
use crate::id::{CalculatedId, NodeId, PinId, ValueId};
use crate::node::{Node, Pin, Scalar};

/// A coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

impl Scene {
    /// Creates a detached pin at local `(0, 0)`.
    ///
    /// A pin only reports a position once it has been added to a container.
    pub fn pin(&mut self) -> PinId {
        PinId(self.alloc(Node::Pin(Pin::default())))
    }

    /// The calculated local coordinate of `pin`, created at `0` on first access.
    pub fn pin_coordinate(&mut self, pin: PinId, axis: Axis) -> CalculatedId {
        if let Node::Pin(node) = self.node(pin.0) {
            if let Some(existing) = node.coordinates[axis.slot()] {
                return CalculatedId(existing);
            }
        }
        let created = self.calculated(0.0);
        if let Node::Pin(node) = self.node_mut(pin.0) {
            node.coordinates[axis.slot()] = Some(created.0);
        }
        created
    }

    /// Sets the base value of a pin coordinate.
    pub fn set_pin_coordinate(&mut self, pin: PinId, axis: Axis, value: f64) -> CalculatedId {
        let id = self.pin_coordinate(pin, axis);
        self.set_base_value(id, value);
        id
    }

    /// The world position of `pin` along `axis`, refreshed each time it renders.
    ///
    /// Computed by mapping the local coordinate through the parent's display
    /// matrix. Without a parent the value stays where it was (`0` when
    /// created).
    pub fn pin_rendered(&mut self, pin: PinId, axis: Axis) -> ValueId {
        if let Node::Pin(node) = self.node(pin.0) {
            if let Some(existing) = node.rendered[axis.slot()] {
                return ValueId(existing);
            }
        }
        let cell = self.alloc(Node::Scalar(Scalar {
            value: 0.0,
            requirement: Some(pin.0),
        }));
        if let Node::Pin(node) = self.node_mut(pin.0) {
            node.rendered[axis.slot()] = Some(cell);
        }
        self.refresh_pin(pin.0);
        ValueId(cell)
    }

    /// The world position of `pin`, read without materializing anything.
    ///
    /// `None` while the pin has no parent.
    #[must_use]
    pub fn pin_position(&self, pin: PinId) -> Option<Point> {
        self.pin_world(pin.0)
    }

    fn pin_world(&self, pin: NodeId) -> Option<Point> {
        let Node::Pin(node) = self.node(pin) else {
            return None;
        };
        let matrix = self.node(node.parent?).display_matrix()?;
        let [x, y] = node
            .coordinates
            .map(|c| c.map_or(0.0, |c| self.node(c).value()));
        Some(matrix.transform_point(Point::new(x, y)))
    }

    /// Recomputes the materialized world position of a pin.
    pub(crate) fn refresh_pin(&mut self, pin: NodeId) {
        let Some(world) = self.pin_world(pin) else {
            return;
        };
        let Node::Pin(node) = self.node(pin) else {
            return;
        };
        let cells = node.rendered;
        for (cell, value) in cells.into_iter().zip([world.x, world.y]) {
            if let Some(cell) = cell {
                self.node_mut(cell).set_value(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartAttribute;

    #[test]
    fn pin_follows_parent_content_matrix() {
        let mut scene = Scene::new();
        let part = scene.part();
        let pin = scene.pin();
        scene.add_child(part, pin);
        scene.set_part_attribute(part, PartAttribute::X, 100.0);
        scene.set_part_attribute(part, PartAttribute::ScaleX, 2.0);
        scene.set_part_attribute(part, PartAttribute::OriginX, 5.0);
        scene.set_pin_coordinate(pin, Axis::X, 10.0);
        scene.set_pin_coordinate(pin, Axis::Y, 3.0);
        let x = scene.pin_rendered(pin, Axis::X);
        let y = scene.pin_rendered(pin, Axis::Y);

        let list = scene.compile(part).unwrap();
        scene.render_list(&list, &[], &mut ());

        // (10 - 5) * 2 + 100
        assert_eq!(scene.value(x), 110.0);
        assert_eq!(scene.value(y), 3.0);
        assert_eq!(scene.pin_position(pin), Some(Point::new(110.0, 3.0)));
    }

    #[test]
    fn detached_pin_keeps_zero() {
        let mut scene = Scene::new();
        let pin = scene.pin();
        scene.set_pin_coordinate(pin, Axis::X, 10.0);
        let x = scene.pin_rendered(pin, Axis::X);

        let list = scene.compile(pin).unwrap();
        scene.render_list(&list, &[], &mut ());
        assert_eq!(scene.value(x), 0.0);
        assert_eq!(scene.pin_position(pin), None);
    }

    #[test]
    fn pin_coordinate_is_created_once() {
        let mut scene = Scene::new();
        let pin = scene.pin();
        let x = scene.pin_coordinate(pin, Axis::X);
        assert_eq!(scene.pin_coordinate(pin, Axis::X), x);
        assert_ne!(scene.pin_coordinate(pin, Axis::Y), x);
    }
}
