// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for scene nodes.

use alloc::rc::Rc;
use alloc::vec::Vec;

use understory_matrix::Matrix;

use crate::SceneList;
use crate::id::{DisplayHandle, NodeId};
use crate::part::MatrixOp;
use crate::value::ModifierOp;

/// Number of [`PartAttribute`](crate::PartAttribute) slots.
pub(crate) const PART_ATTRIBUTES: usize = 9;
/// Number of [`RenderedAttribute`](crate::RenderedAttribute) slots.
pub(crate) const RENDERED_ATTRIBUTES: usize = 7;

#[derive(Clone, Debug)]
pub(crate) enum Node {
    Scalar(Scalar),
    Input(Input),
    Calculated(Calculated),
    Modified(Modified),
    Transformation(Transformation),
    Part(Part),
    Pin(Pin),
    PinnedPart(PinnedPart),
}

/// A plain numeric cell, optionally ordered after another node.
#[derive(Clone, Debug)]
pub(crate) struct Scalar {
    pub(crate) value: f64,
    pub(crate) requirement: Option<NodeId>,
}

/// A numeric cell refreshed from an external input slot.
#[derive(Clone, Debug)]
pub(crate) struct Input {
    pub(crate) value: f64,
    pub(crate) index: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Calculated {
    /// Scalar holding the base value; the first modifier's target.
    pub(crate) base: NodeId,
    pub(crate) value: f64,
    /// Modifier chain, oldest first. Each entry targets the previous one.
    pub(crate) modifiers: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub(crate) struct Modified {
    pub(crate) op: ModifierOp,
    pub(crate) target: NodeId,
    /// `None` for unary operations.
    pub(crate) modifier: Option<NodeId>,
    pub(crate) value: f64,
}

/// An extra matrix operation appended to a container's working matrix.
#[derive(Clone, Debug)]
pub(crate) struct Transformation {
    pub(crate) owner: NodeId,
    pub(crate) op: MatrixOp,
    pub(crate) source: NodeId,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Transform {
    pub(crate) matrix: Matrix,
    pub(crate) content: Matrix,
    pub(crate) transformations: Vec<NodeId>,
}

/// Child list, parent link and transform shared by parts and pinned parts.
#[derive(Clone, Debug, Default)]
pub(crate) struct Container {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) transform: Transform,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Part {
    pub(crate) container: Container,
    pub(crate) attributes: [Option<NodeId>; PART_ATTRIBUTES],
    pub(crate) rendered: [Option<NodeId>; RENDERED_ATTRIBUTES],
    pub(crate) display: Option<DisplayHandle>,
    pub(crate) model: Option<ModelState>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ModelState {
    pub(crate) inputs: Vec<Option<NodeId>>,
    pub(crate) compiled: Option<CompiledModel>,
}

#[derive(Clone, Debug)]
pub(crate) struct CompiledModel {
    pub(crate) generation: u64,
    pub(crate) list: Rc<SceneList>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Pin {
    pub(crate) parent: Option<NodeId>,
    pub(crate) coordinates: [Option<NodeId>; 2],
    pub(crate) rendered: [Option<NodeId>; 2],
    pub(crate) display: Option<DisplayHandle>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PinnedPart {
    pub(crate) container: Container,
    pub(crate) size: [Option<NodeId>; 2],
    pub(crate) pins: [Option<PinSlotState>; 3],
    pub(crate) rendered: [Option<NodeId>; RENDERED_ATTRIBUTES],
    pub(crate) display: Option<DisplayHandle>,
}

#[derive(Clone, Debug)]
pub(crate) struct PinSlotState {
    pub(crate) origin: [NodeId; 2],
    pub(crate) target: [Option<NodeId>; 2],
}

impl Node {
    pub(crate) fn value(&self) -> f64 {
        match self {
            Self::Scalar(scalar) => scalar.value,
            Self::Input(input) => input.value,
            Self::Calculated(calculated) => calculated.value,
            Self::Modified(modified) => modified.value,
            Self::Transformation(_) | Self::Part(_) | Self::Pin(_) | Self::PinnedPart(_) => 0.0,
        }
    }

    /// Writes the current value of a value-carrying node; other kinds ignore it.
    pub(crate) fn set_value(&mut self, value: f64) {
        match self {
            Self::Scalar(scalar) => scalar.value = value,
            Self::Input(input) => input.value = value,
            Self::Calculated(calculated) => calculated.value = value,
            Self::Modified(modified) => modified.value = value,
            Self::Transformation(_) | Self::Part(_) | Self::Pin(_) | Self::PinnedPart(_) => {}
        }
    }

    pub(crate) fn container(&self) -> Option<&Container> {
        match self {
            Self::Part(part) => Some(&part.container),
            Self::PinnedPart(pinned) => Some(&pinned.container),
            _ => None,
        }
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Self::Part(part) => Some(&mut part.container),
            Self::PinnedPart(pinned) => Some(&mut pinned.container),
            _ => None,
        }
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        match self {
            Self::Pin(pin) => pin.parent,
            _ => self.container().and_then(|c| c.parent),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Self::Pin(pin) => pin.parent = parent,
            _ => {
                if let Some(container) = self.container_mut() {
                    container.parent = parent;
                }
            }
        }
    }

    /// The matrix children and pins see: the content matrix of a part, the
    /// working matrix of a pinned part.
    pub(crate) fn display_matrix(&self) -> Option<&Matrix> {
        match self {
            Self::Part(part) => Some(&part.container.transform.content),
            Self::PinnedPart(pinned) => Some(&pinned.container.transform.matrix),
            _ => None,
        }
    }

    pub(crate) fn display_handle(&self) -> Option<DisplayHandle> {
        match self {
            Self::Part(part) => part.display,
            Self::Pin(pin) => pin.display,
            Self::PinnedPart(pinned) => pinned.display,
            _ => None,
        }
    }

    pub(crate) fn display_handle_mut(&mut self) -> Option<&mut Option<DisplayHandle>> {
        match self {
            Self::Part(part) => Some(&mut part.display),
            Self::Pin(pin) => Some(&mut pin.display),
            Self::PinnedPart(pinned) => Some(&mut pinned.display),
            _ => None,
        }
    }

    pub(crate) fn model(&self) -> Option<&ModelState> {
        match self {
            Self::Part(part) => part.model.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn model_mut(&mut self) -> Option<&mut ModelState> {
        match self {
            Self::Part(part) => part.model.as_mut(),
            _ => None,
        }
    }
}
