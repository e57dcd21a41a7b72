// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute-driven parts, extra matrix operations and rendered read-backs.

use understory_matrix::Matrix;

use crate::Scene;
use crate::id::{CalculatedId, ContainerHandle, NodeId, PartId, ValueId};
use crate::node::{Node, Part, Scalar, Transformation};

/// An input of a part's transform.
///
/// Attributes are created on first access. Until then the part reads a
/// shared constant: `0` for positions, origins and rotation, `1` for scales,
/// and [`SceneOptions::default_size`](crate::SceneOptions::default_size) for
/// width and height.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PartAttribute {
    /// Horizontal translation.
    X,
    /// Vertical translation.
    Y,
    /// Horizontal anchor of the content, in local units.
    OriginX,
    /// Vertical anchor of the content, in local units.
    OriginY,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// Rotation in degrees.
    Rotation,
    /// Declared width.
    Width,
    /// Declared height.
    Height,
}

impl PartAttribute {
    /// Every attribute.
    pub const ALL: [Self; 9] = [
        Self::X,
        Self::Y,
        Self::OriginX,
        Self::OriginY,
        Self::ScaleX,
        Self::ScaleY,
        Self::Rotation,
        Self::Width,
        Self::Height,
    ];

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// A value derived from a part's final matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderedAttribute {
    /// World x of the content's local origin.
    X,
    /// World y of the content's local origin.
    Y,
    /// Length of the first basis vector.
    ScaleX,
    /// Length of the second basis vector.
    ScaleY,
    /// Angle of the first basis vector in degrees, in `[0, 360)`.
    Rotation,
    /// Declared width times the rendered x scale.
    Width,
    /// Declared height times the rendered y scale.
    Height,
}

impl RenderedAttribute {
    /// Every rendered attribute.
    pub const ALL: [Self; 7] = [
        Self::X,
        Self::Y,
        Self::ScaleX,
        Self::ScaleY,
        Self::Rotation,
        Self::Width,
        Self::Height,
    ];

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// An extra step appended to a container's working matrix, driven by a
/// calculated value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatrixOp {
    /// [`Matrix::translate_x`].
    TranslateX,
    /// [`Matrix::translate_y`].
    TranslateY,
    /// [`Matrix::scale_x`].
    ScaleX,
    /// [`Matrix::scale_y`].
    ScaleY,
    /// [`Matrix::rotate`], with the value in degrees.
    Rotate,
}

impl MatrixOp {
    /// Applies the operation to `matrix`.
    pub fn apply(self, matrix: &mut Matrix, value: f64) {
        match self {
            Self::TranslateX => matrix.translate_x(value),
            Self::TranslateY => matrix.translate_y(value),
            Self::ScaleX => matrix.scale_x(value),
            Self::ScaleY => matrix.scale_y(value),
            Self::Rotate => matrix.rotate(value.to_radians()),
        }
    }
}

impl Scene {
    /// Creates a detached part with no attributes set.
    pub fn part(&mut self) -> PartId {
        PartId(self.alloc(Node::Part(Part::default())))
    }

    /// The calculated value behind `attribute`, created with its default
    /// base value on first access.
    pub fn part_attribute(
        &mut self,
        part: impl Into<PartId>,
        attribute: PartAttribute,
    ) -> CalculatedId {
        let part = part.into().0;
        if let Node::Part(node) = self.node(part) {
            if let Some(existing) = node.attributes[attribute.slot()] {
                return CalculatedId(existing);
            }
        }
        let default = match attribute {
            PartAttribute::ScaleX | PartAttribute::ScaleY => 1.0,
            PartAttribute::Width | PartAttribute::Height => self.options().default_size,
            _ => 0.0,
        };
        let created = self.calculated(default);
        if let Node::Part(node) = self.node_mut(part) {
            node.attributes[attribute.slot()] = Some(created.0);
        }
        created
    }

    /// Sets the base value of `attribute`, creating it if needed.
    pub fn set_part_attribute(
        &mut self,
        part: impl Into<PartId>,
        attribute: PartAttribute,
        value: f64,
    ) -> CalculatedId {
        let id = self.part_attribute(part, attribute);
        self.set_base_value(id, value);
        id
    }

    /// Appends an extra operation to `node`'s working matrix.
    ///
    /// The operations run after the node's own composition, before the
    /// parent's matrix is concatenated. Returns the calculated value that
    /// drives the operation, with base value `0`.
    pub fn add_transformation(&mut self, node: impl ContainerHandle, op: MatrixOp) -> CalculatedId {
        let owner = node.into();
        let source = self.calculated(0.0);
        let step = self.alloc(Node::Transformation(Transformation {
            owner,
            op,
            source: source.0,
        }));
        if let Some(container) = self.node_mut(owner).container_mut() {
            container.transform.transformations.push(step);
        }
        source
    }

    /// A read-back of `node`'s final matrix, refreshed each time the node
    /// renders.
    ///
    /// The cell is created on first access and computed right away from the
    /// current matrix, so before any render it reports the untransformed
    /// state (for example the declared width).
    pub fn rendered(&mut self, node: impl ContainerHandle, attribute: RenderedAttribute) -> ValueId {
        let owner = node.into();
        let existing = match self.node(owner) {
            Node::Part(part) => part.rendered[attribute.slot()],
            Node::PinnedPart(pinned) => pinned.rendered[attribute.slot()],
            _ => None,
        };
        if let Some(existing) = existing {
            return ValueId(existing);
        }

        let value = self.rendered_value(owner, attribute);
        let cell = self.alloc(Node::Scalar(Scalar {
            value,
            requirement: Some(owner),
        }));
        match self.node_mut(owner) {
            Node::Part(part) => part.rendered[attribute.slot()] = Some(cell),
            Node::PinnedPart(pinned) => pinned.rendered[attribute.slot()] = Some(cell),
            _ => {}
        }
        ValueId(cell)
    }

    /// Recomputes every materialized read-back of a part or pinned part.
    pub(crate) fn refresh_rendered(&mut self, owner: NodeId) {
        let slots = match self.node(owner) {
            Node::Part(part) => part.rendered,
            Node::PinnedPart(pinned) => pinned.rendered,
            _ => return,
        };
        for attribute in RenderedAttribute::ALL {
            if let Some(cell) = slots[attribute.slot()] {
                let value = self.rendered_value(owner, attribute);
                self.node_mut(cell).set_value(value);
            }
        }
    }

    fn rendered_value(&self, owner: NodeId, attribute: RenderedAttribute) -> f64 {
        let node = self.node(owner);
        let Some(m) = node.display_matrix() else {
            return 0.0;
        };
        match attribute {
            RenderedAttribute::X => m.x,
            RenderedAttribute::Y => m.y,
            RenderedAttribute::ScaleX => m.x_scale(),
            RenderedAttribute::ScaleY => m.y_scale(),
            RenderedAttribute::Rotation => {
                let degrees = m.x_rotation().to_degrees();
                if degrees < 0.0 { degrees + 360.0 } else { degrees }
            }
            RenderedAttribute::Width => self.declared_size(owner, 0) * m.x_scale(),
            RenderedAttribute::Height => self.declared_size(owner, 1) * m.y_scale(),
        }
    }

    /// Declared width (`axis == 0`) or height of a part or pinned part.
    pub(crate) fn declared_size(&self, owner: NodeId, axis: usize) -> f64 {
        let cell = match self.node(owner) {
            Node::Part(part) => {
                let attribute = [PartAttribute::Width, PartAttribute::Height][axis];
                part.attributes[attribute.slot()]
            }
            Node::PinnedPart(pinned) => pinned.size[axis],
            _ => None,
        };
        self.node(cell.unwrap_or(self.size)).value()
    }

    /// The attribute cell to read, or the shared constant standing in for it.
    pub(crate) fn attribute_or_default(&self, part: &Part, attribute: PartAttribute) -> NodeId {
        part.attributes[attribute.slot()].unwrap_or(match attribute {
            PartAttribute::ScaleX | PartAttribute::ScaleY => self.one,
            PartAttribute::Width | PartAttribute::Height => self.size,
            _ => self.zero,
        })
    }
}
