// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive scene commands and their execution.

use alloc::rc::Rc;

use kurbo::{Point, Size};
use smallvec::SmallVec;
use understory_matrix::{Matrix, PinPair, solve_pins};
use understory_render_list::CommandTarget;

use crate::adapter::{DisplayAdapter, RenderedNode};
use crate::id::{NodeId, PartId, PinId, PinnedPartId};
use crate::part::MatrixOp;
use crate::value::ModifierOp;
use crate::{Scene, SceneList};

/// One primitive, pre-bound operation of a compiled scene list.
///
/// Commands only name the nodes they read and write; executing one never
/// inspects the graph.
#[derive(Clone, Debug)]
pub struct SceneCommand(pub(crate) Command);

#[derive(Clone, Debug)]
pub(crate) enum Command {
    /// `dest = op(target, modifier)`.
    Modify {
        dest: NodeId,
        op: ModifierOp,
        target: NodeId,
        modifier: Option<NodeId>,
    },
    /// `dest = source`.
    AssignFrom { dest: NodeId, source: NodeId },
    /// Working matrix from `[x, y, scale_x, scale_y, rotation]`.
    ComposeFromAttributes { part: NodeId, inputs: [NodeId; 5] },
    Transform {
        owner: NodeId,
        op: MatrixOp,
        value: NodeId,
    },
    ConcatParent { part: NodeId, parent: NodeId },
    UpdateContentMatrix { part: NodeId, origin: [NodeId; 2] },
    /// Each point is `[origin_x, origin_y, target_x, target_y]`.
    ComposeFromPins {
        part: NodeId,
        points: SmallVec<[[NodeId; 4]; 3]>,
        size: [NodeId; 2],
    },
    RenderPart(NodeId),
    RenderPin(NodeId),
    RenderPinnedPart(NodeId),
    /// Replays a model's own list with the model's input sources.
    RenderModel { model: NodeId, list: Rc<SceneList> },
}

/// Executes commands against a scene for one render pass.
pub(crate) struct Frame<'a> {
    scene: &'a mut Scene,
    adapter: &'a mut dyn DisplayAdapter,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(scene: &'a mut Scene, adapter: &'a mut dyn DisplayAdapter) -> Self {
        Self { scene, adapter }
    }

    fn value(&self, node: NodeId) -> f64 {
        self.scene.node(node).value()
    }

    fn matrix_mut(&mut self, node: NodeId) -> Option<&mut Matrix> {
        self.scene
            .node_mut(node)
            .container_mut()
            .map(|c| &mut c.transform.matrix)
    }

    fn present(&mut self, node: NodeId, rendered: RenderedNode) {
        if let Some(handle) = self.scene.node(node).display_handle() {
            self.adapter.render(self.scene, rendered, handle);
        }
    }
}

impl CommandTarget<NodeId, SceneCommand> for Frame<'_> {
    fn write_input(&mut self, node: NodeId, value: f64) {
        self.scene.node_mut(node).set_value(value);
    }

    fn execute(&mut self, command: &SceneCommand) {
        match &command.0 {
            Command::Modify {
                dest,
                op,
                target,
                modifier,
            } => {
                let target = self.value(*target);
                let modifier = modifier.map_or(0.0, |m| self.value(m));
                self.scene
                    .node_mut(*dest)
                    .set_value(op.apply(target, modifier));
            }
            Command::AssignFrom { dest, source } => {
                let value = self.value(*source);
                self.scene.node_mut(*dest).set_value(value);
            }
            Command::ComposeFromAttributes { part, inputs } => {
                let [x, y, scale_x, scale_y, rotation] = inputs.map(|n| self.value(n));
                if let Some(m) = self.matrix_mut(*part) {
                    *m = Matrix::IDENTITY;
                    m.scale(scale_x, scale_y);
                    m.rotate(rotation.to_radians());
                    m.translate(x, y);
                }
            }
            Command::Transform { owner, op, value } => {
                let value = self.value(*value);
                if let Some(m) = self.matrix_mut(*owner) {
                    op.apply(m, value);
                }
            }
            Command::ConcatParent { part, parent } => {
                let Some(parent) = self.scene.node(*parent).container() else {
                    return;
                };
                let parent = parent.transform.matrix;
                if let Some(m) = self.matrix_mut(*part) {
                    m.concat(&parent);
                }
            }
            Command::UpdateContentMatrix { part, origin } => {
                let [origin_x, origin_y] = origin.map(|n| self.value(n));
                if let Some(container) = self.scene.node_mut(*part).container_mut() {
                    let transform = &mut container.transform;
                    transform.content = Matrix::IDENTITY;
                    transform.content.translate(-origin_x, -origin_y);
                    transform.content.concat(&transform.matrix);
                }
            }
            Command::ComposeFromPins { part, points, size } => {
                let pins: SmallVec<[PinPair; 3]> = points
                    .iter()
                    .map(|p| {
                        let [ox, oy, tx, ty] = p.map(|n| self.value(n));
                        PinPair::new(Point::new(ox, oy), Point::new(tx, ty))
                    })
                    .collect();
                let [width, height] = size.map(|n| self.value(n));
                let solved = solve_pins(&pins, Size::new(width, height));
                if let Some(m) = self.matrix_mut(*part) {
                    *m = solved;
                }
            }
            Command::RenderPart(part) => {
                self.scene.refresh_rendered(*part);
                self.present(*part, RenderedNode::Part(PartId(*part)));
            }
            Command::RenderPin(pin) => {
                self.scene.refresh_pin(*pin);
                self.present(*pin, RenderedNode::Pin(PinId(*pin)));
            }
            Command::RenderPinnedPart(part) => {
                self.scene.refresh_rendered(*part);
                self.present(*part, RenderedNode::PinnedPart(PinnedPartId(*part)));
            }
            Command::RenderModel { model, list } => {
                let inputs = self.scene.model_inputs(*model);
                list.render(self, &inputs);
            }
        }
    }
}
