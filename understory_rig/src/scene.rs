// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene arena, its options and container operations.

use alloc::vec::Vec;

use understory_matrix::Matrix;
use understory_render_list::{CycleError, compile};

use crate::SceneList;
use crate::adapter::DisplayAdapter;
use crate::command::Frame;
use crate::id::{ChildHandle, ContainerHandle, DisplayHandle, NodeId};
use crate::node::{Node, Scalar};

/// Options applied when a [`Scene`] is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    /// Width and height of parts and pinned parts that never declared one.
    ///
    /// Defaults to `100`.
    pub default_size: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { default_size: 100.0 }
    }
}

/// What a [`NodeId`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain numeric cell, including rendered read-backs.
    Scalar,
    /// A numeric cell bound to an external input index.
    Input,
    /// A base value with a modifier chain.
    Calculated,
    /// One step of a modifier chain.
    Modified,
    /// An extra operation on a container's working matrix.
    Transformation,
    /// An attribute-driven part.
    Part,
    /// A part compiling its own subtree.
    Model,
    /// A point in a parent's space.
    Pin,
    /// A part solved from pins.
    PinnedPart,
}

/// Owner of every node of one scene tree.
///
/// Nodes are never freed; detaching a child only unlinks it. All handles
/// returned by a scene are only meaningful for that scene, and operations
/// panic when given a handle from another scene.
#[derive(Clone, Debug)]
pub struct Scene {
    pub(crate) nodes: Vec<Node>,
    options: SceneOptions,
    /// Bumped by every structural edit; compiled lists older than this are stale.
    generation: u64,
    pub(crate) zero: NodeId,
    pub(crate) one: NodeId,
    /// Shared cell holding [`SceneOptions::default_size`].
    pub(crate) size: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SceneOptions::default())
    }

    /// Creates an empty scene.
    #[must_use]
    pub fn with_options(options: SceneOptions) -> Self {
        let constant = |value| {
            Node::Scalar(Scalar {
                value,
                requirement: None,
            })
        };
        let nodes = alloc::vec![
            constant(0.0),
            constant(1.0),
            constant(options.default_size)
        ];
        Self {
            nodes,
            options,
            generation: 0,
            zero: NodeId::new(0),
            one: NodeId::new(1),
            size: NodeId::new(2),
        }
    }

    /// The options this scene was created with.
    #[must_use]
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Structure generation.
    ///
    /// Incremented whenever a node is created, a modifier is appended or a
    /// child is added or removed. Value edits do not change it.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of nodes, including the scene's shared constants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kind of the node `id` refers to.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        match self.node(id) {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Input(_) => NodeKind::Input,
            Node::Calculated(_) => NodeKind::Calculated,
            Node::Modified(_) => NodeKind::Modified,
            Node::Transformation(_) => NodeKind::Transformation,
            Node::Part(part) if part.model.is_some() => NodeKind::Model,
            Node::Part(_) => NodeKind::Part,
            Node::Pin(_) => NodeKind::Pin,
            Node::PinnedPart(_) => NodeKind::PinnedPart,
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.touch();
        id
    }

    pub(crate) fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }

    /// Appends `child` to `parent`'s children, detaching it from its previous
    /// parent first.
    ///
    /// Adding a child that is already last under `parent` moves nothing.
    pub fn add_child(&mut self, parent: impl ContainerHandle, child: impl ChildHandle) {
        let parent = parent.into();
        let child = child.into();
        if let Some(old) = self.node(child).parent() {
            self.unlink(old, child);
        }
        self.node_mut(child).set_parent(Some(parent));
        if let Some(container) = self.node_mut(parent).container_mut() {
            container.children.push(child);
        }
        self.touch();
    }

    /// Adds each of `children` to `parent`, in order.
    pub fn add_children<C: ChildHandle>(
        &mut self,
        parent: impl ContainerHandle,
        children: impl IntoIterator<Item = C>,
    ) {
        for child in children {
            self.add_child(parent, child);
        }
    }

    /// Detaches `child` from `parent`.
    ///
    /// Returns `false` if `child` was not one of `parent`'s children.
    pub fn remove_child(&mut self, parent: impl ContainerHandle, child: impl ChildHandle) -> bool {
        let removed = self.unlink(parent.into(), child.into());
        if removed {
            self.touch();
        }
        removed
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(container) = self.node_mut(parent).container_mut() else {
            return false;
        };
        let Some(position) = container.children.iter().position(|c| *c == child) else {
            return false;
        };
        container.children.remove(position);
        self.node_mut(child).set_parent(None);
        true
    }

    /// The child of `parent` at `index`.
    #[must_use]
    pub fn child(&self, parent: impl ContainerHandle, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// Children of `parent`, in render order.
    #[must_use]
    pub fn children(&self, parent: impl ContainerHandle) -> &[NodeId] {
        self.node(parent.into())
            .container()
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    /// The container `child` is attached to.
    #[must_use]
    pub fn parent(&self, child: impl ChildHandle) -> Option<NodeId> {
        self.node(child.into()).parent()
    }

    /// Associates `node` with an object of the host's display adapter.
    ///
    /// Nodes without a handle are still computed but never reach the adapter.
    pub fn set_display_handle(&mut self, node: impl ChildHandle, handle: DisplayHandle) {
        if let Some(slot) = self.node_mut(node.into()).display_handle_mut() {
            *slot = Some(handle);
        }
    }

    /// The display handle of `node`, if one was set.
    #[must_use]
    pub fn display_handle(&self, node: impl ChildHandle) -> Option<DisplayHandle> {
        self.node(node.into()).display_handle()
    }

    /// The matrix that places `node`'s content in world space.
    ///
    /// For parts and models this is the content matrix (the working matrix
    /// offset by the origin); for pinned parts it is the solved matrix.
    #[must_use]
    pub fn matrix(&self, node: impl ContainerHandle) -> Matrix {
        self.node(node.into())
            .display_matrix()
            .copied()
            .unwrap_or_default()
    }

    /// The working matrix of `node`, before any origin offset.
    ///
    /// Children concatenate their own matrix with this one.
    #[must_use]
    pub fn working_matrix(&self, node: impl ContainerHandle) -> Matrix {
        self.node(node.into())
            .container()
            .map(|c| c.transform.matrix)
            .unwrap_or_default()
    }

    /// Compiles the graph reachable from `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if some node transitively requires itself.
    pub fn compile(&self, root: impl Into<NodeId>) -> Result<SceneList, CycleError<NodeId>> {
        compile(self, root.into())
    }

    /// Replays a list compiled from this scene.
    ///
    /// `inputs[i]`, when present, is copied into every input node bound to
    /// index `i` before the commands run.
    pub fn render_list(
        &mut self,
        list: &SceneList,
        inputs: &[Option<f64>],
        adapter: &mut dyn DisplayAdapter,
    ) {
        list.render(&mut Frame::new(self, adapter), inputs);
    }
}
