// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers and typed handles.
//!
//! Every graph participant lives in the [`Scene`](crate::Scene) arena and is
//! addressed by a [`NodeId`]. Public operations take typed handles instead so
//! that passing, say, a pin where a part is expected does not compile.

/// Identifier of any node in a [`Scene`](crate::Scene).
///
/// This is the node type of the scene's render graph, so it shows up in
/// compiled command lists and in cycle errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0
    }

    /// Position of this node in allocation order.
    ///
    /// The scene's three shared constants take indices 0 to 2.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) NodeId);

        impl From<$name> for NodeId {
            #[inline]
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

handle!(
    /// Any node carrying a numeric value: scalars, inputs, calculated values
    /// and rendered read-backs.
    ValueId
);
handle!(
    /// A value computed from a base value and a chain of modifiers.
    CalculatedId
);
handle!(
    /// An attribute-driven part.
    PartId
);
handle!(
    /// A part that compiles its own subtree with private inputs.
    ModelId
);
handle!(
    /// A point attached to a parent's local space.
    PinId
);
handle!(
    /// A part whose transform is solved from up to three pins.
    PinnedPartId
);

impl From<CalculatedId> for ValueId {
    #[inline]
    fn from(id: CalculatedId) -> Self {
        Self(id.0)
    }
}

impl From<ModelId> for PartId {
    #[inline]
    fn from(id: ModelId) -> Self {
        Self(id.0)
    }
}

/// Opaque token identifying the display-adapter object that draws a node.
///
/// The scene never interprets it; it is handed back to
/// [`DisplayAdapter::render`](crate::DisplayAdapter::render).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u64);

mod sealed {
    /// Restricts the handle traits to this crate's handles.
    #[allow(unnameable_types, reason = "sealing trait, never named outside the crate")]
    pub trait Sealed {}
    impl Sealed for super::PartId {}
    impl Sealed for super::ModelId {}
    impl Sealed for super::PinnedPartId {}
    impl Sealed for super::PinId {}
}

/// Handles of nodes that own a transform and may have children.
///
/// Implemented by [`PartId`], [`ModelId`] and [`PinnedPartId`].
pub trait ContainerHandle: ChildHandle {}

impl ContainerHandle for PartId {}
impl ContainerHandle for ModelId {}
impl ContainerHandle for PinnedPartId {}

/// Handles of nodes that may be placed under a container.
pub trait ChildHandle: sealed::Sealed + Copy + Into<NodeId> {}

impl ChildHandle for PartId {}
impl ChildHandle for ModelId {}
impl ChildHandle for PinnedPartId {}
impl ChildHandle for PinId {}
