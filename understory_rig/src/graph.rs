// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene as a render graph.

use alloc::rc::Rc;
use alloc::vec::Vec;

use smallvec::SmallVec;
use understory_render_list::{
    CompileContext, CycleError, RenderGraph, Requirement, compile_isolated,
};

use crate::Scene;
use crate::command::{Command, SceneCommand};
use crate::id::NodeId;
use crate::node::{Node, Part, PinnedPart};
use crate::part::PartAttribute;

type Requirements = Vec<Requirement<NodeId, SceneCommand>>;

fn command(command: Command) -> Requirement<NodeId, SceneCommand> {
    Requirement::Command(SceneCommand(command))
}

impl RenderGraph for Scene {
    type Node = NodeId;
    type Command = SceneCommand;

    fn requirements(&self, node: NodeId, cx: &CompileContext<NodeId>, out: &mut Requirements) {
        match self.node(node) {
            Node::Scalar(scalar) => out.push(scalar.requirement.into()),
            Node::Input(_) => {}
            // The tail requires its predecessor, and so on down to the base.
            Node::Calculated(calculated) => {
                out.extend(calculated.modifiers.last().map(|m| Requirement::Node(*m)));
            }
            Node::Modified(modified) => {
                out.push(Requirement::Node(modified.target));
                out.push(modified.modifier.into());
            }
            Node::Transformation(step) => out.push(Requirement::Node(step.source)),
            Node::Part(part) => {
                if part.model.is_some() && cx.is_isolated(node) {
                    return;
                }
                self.part_requirements(node, part, out);
            }
            Node::Pin(pin) => {
                out.push(pin.parent.into());
                out.extend(pin.coordinates.iter().map(|c| Requirement::from(*c)));
            }
            Node::PinnedPart(pinned) => self.pinned_part_requirements(node, pinned, out),
        }
    }

    fn commands(
        &self,
        node: NodeId,
        cx: &CompileContext<NodeId>,
        out: &mut Vec<SceneCommand>,
    ) -> Result<(), CycleError<NodeId>> {
        let command = match self.node(node) {
            Node::Scalar(_) | Node::Input(_) => return Ok(()),
            Node::Calculated(calculated) => match calculated.modifiers.last() {
                Some(tail) => Command::AssignFrom {
                    dest: node,
                    source: *tail,
                },
                None => return Ok(()),
            },
            Node::Modified(modified) => Command::Modify {
                dest: node,
                op: modified.op,
                target: modified.target,
                modifier: modified.modifier,
            },
            Node::Transformation(step) => Command::Transform {
                owner: step.owner,
                op: step.op,
                value: step.source,
            },
            Node::Part(part) if part.model.is_none() => Command::RenderPart(node),
            // Inside its own list a model is only the parent of its children.
            Node::Part(_) if cx.is_isolated(node) => return Ok(()),
            Node::Part(_) => {
                out.push(SceneCommand(Command::RenderPart(node)));
                let list = compile_isolated(self, node, cx)?;
                Command::RenderModel {
                    model: node,
                    list: Rc::new(list),
                }
            }
            Node::Pin(_) => Command::RenderPin(node),
            Node::PinnedPart(_) => Command::RenderPinnedPart(node),
        };
        out.push(SceneCommand(command));
        Ok(())
    }

    fn children(&self, node: NodeId, cx: &CompileContext<NodeId>, out: &mut Vec<NodeId>) {
        match self.node(node) {
            // A model's subtree belongs to its own list.
            Node::Part(part) if part.model.is_some() && !cx.is_isolated(node) => {}
            Node::Part(Part { container, .. }) | Node::PinnedPart(PinnedPart { container, .. }) => {
                out.extend_from_slice(&container.children);
            }
            _ => {}
        }
    }

    fn input_index(&self, node: NodeId) -> Option<usize> {
        match self.node(node) {
            Node::Input(input) => Some(input.index),
            _ => None,
        }
    }
}

impl Scene {
    fn part_requirements(&self, node: NodeId, part: &Part, out: &mut Requirements) {
        let parent = part.container.parent;
        out.push(parent.into());

        let inputs = [
            PartAttribute::X,
            PartAttribute::Y,
            PartAttribute::ScaleX,
            PartAttribute::ScaleY,
            PartAttribute::Rotation,
        ]
        .map(|a| self.attribute_or_default(part, a));
        out.extend(inputs.iter().map(|n| Requirement::Node(*n)));
        out.push(command(Command::ComposeFromAttributes { part: node, inputs }));

        out.extend(
            part.container
                .transform
                .transformations
                .iter()
                .map(|t| Requirement::Node(*t)),
        );
        if let Some(parent) = parent {
            out.push(command(Command::ConcatParent { part: node, parent }));
        }

        let origin = [PartAttribute::OriginX, PartAttribute::OriginY]
            .map(|a| self.attribute_or_default(part, a));
        out.extend(origin.iter().map(|n| Requirement::Node(*n)));
        out.push(command(Command::UpdateContentMatrix { part: node, origin }));

        out.push(part.attributes[PartAttribute::Width.slot()].into());
        out.push(part.attributes[PartAttribute::Height.slot()].into());
    }

    fn pinned_part_requirements(&self, node: NodeId, pinned: &PinnedPart, out: &mut Requirements) {
        let mut points = SmallVec::new();
        for pin in pinned.pins.iter().flatten() {
            if pin.target.iter().all(Option::is_none) {
                continue;
            }
            let point = [
                pin.origin[0],
                pin.origin[1],
                pin.target[0].unwrap_or(self.zero),
                pin.target[1].unwrap_or(self.zero),
            ];
            out.extend(point.iter().map(|n| Requirement::Node(*n)));
            points.push(point);
        }

        let size = pinned.size.map(|s| s.unwrap_or(self.size));
        out.extend(size.iter().map(|n| Requirement::Node(*n)));
        out.push(command(Command::ComposeFromPins {
            part: node,
            points,
            size,
        }));

        out.extend(
            pinned
                .container
                .transform
                .transformations
                .iter()
                .map(|t| Requirement::Node(*t)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Axis, PinSlot, RenderedAttribute};
    use kurbo::Point;

    #[test]
    fn unset_attributes_share_constants() {
        let mut scene = Scene::new();
        let parts = [scene.part(), scene.part()];
        let count = scene.node_count();
        let root = scene.part();
        scene.add_children(root, parts);
        let list = scene.compile(root).unwrap();

        assert_eq!(scene.node_count(), count + 1);
        // Per part: compose, content, render.
        assert_eq!(list.len(), 3 + 2 * 4);
    }

    #[test]
    fn cycle_through_rendered_value_is_reported() {
        let mut scene = Scene::new();
        let part = scene.part();
        let rendered_x = scene.rendered(part, RenderedAttribute::X);
        let x = scene.part_attribute(part, PartAttribute::X);
        scene.modify(x).add(rendered_x);

        let err = scene.compile(part).unwrap_err();
        assert_eq!(err.node, NodeId::from(part));
        assert_eq!(err.path.first(), Some(&NodeId::from(part)));
        assert_eq!(err.path.last(), Some(&NodeId::from(part)));
    }

    #[test]
    fn container_cycle_is_reported() {
        let mut scene = Scene::new();
        let a = scene.part();
        let b = scene.part();
        scene.add_child(a, b);
        scene.add_child(b, a);
        assert!(scene.compile(a).is_err());
    }

    #[test]
    fn pin_without_target_adds_no_points() {
        let mut scene = Scene::new();
        let part = scene.pinned_part();
        scene.attach_pin(part, PinSlot::A, Point::ZERO);
        let b = scene.attach_pin(part, PinSlot::B, Point::ZERO);
        assert!(scene.pin_target(b, Axis::Y).is_some());

        let list = scene.compile(part).unwrap();
        assert_eq!(list.len(), 2);
        scene.render_list(&list, &[], &mut ());
        assert!(scene.matrix(part).is_identity());

        // Requirements: 4 point cells, 2 size cells, then the solve.
        let Node::PinnedPart(pinned) = scene.node(part.into()) else {
            unreachable!()
        };
        let mut out = Vec::new();
        scene.pinned_part_requirements(part.into(), pinned, &mut out);
        assert_eq!(out.len(), 7);
    }
}
