// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render node contract.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::error::CycleError;

/// One entry of a node's requirement sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Requirement<N, C> {
    /// An absent optional edge (for example "no parent"). Skipped.
    Gap,
    /// A node that must be resolved, and its commands emitted, first.
    Node(N),
    /// A pre-bound primitive emitted at this position.
    ///
    /// Inline commands have no identity of their own, so they are emitted
    /// every time the owning node is resolved (which is at most once).
    Command(C),
}

impl<N, C> From<Option<N>> for Requirement<N, C> {
    #[inline]
    fn from(node: Option<N>) -> Self {
        match node {
            Some(node) => Self::Node(node),
            None => Self::Gap,
        }
    }
}

/// State shared with every query made during one compilation.
///
/// Records which nodes are currently being compiled in isolation, innermost
/// last. See [`compile_isolated`](crate::compile_isolated).
#[derive(Clone, Debug)]
pub struct CompileContext<N> {
    isolated: Vec<N>,
}

impl<N: Copy + Eq> CompileContext<N> {
    pub(crate) fn new() -> Self {
        Self {
            isolated: Vec::new(),
        }
    }

    pub(crate) fn nested(&self, root: N) -> Self {
        let mut isolated = self.isolated.clone();
        isolated.push(root);
        Self { isolated }
    }

    /// Returns `true` if `node` is compiling its own sub-list somewhere up the stack.
    #[must_use]
    pub fn is_isolated(&self, node: N) -> bool {
        self.isolated.contains(&node)
    }

    /// Nodes currently compiling in isolation, outermost first.
    #[must_use]
    pub fn isolated(&self) -> &[N] {
        &self.isolated
    }
}

/// A graph of render nodes.
///
/// Implementations answer read-only queries about a node; they may be asked
/// more than once per compilation and must not have side effects. Every query
/// has an empty default so pure data holders only implement what they need.
pub trait RenderGraph {
    /// Stable node identity.
    type Node: Copy + Eq + Hash + Debug;
    /// A primitive, pre-bound operation.
    type Command: Clone + Debug;

    /// Appends the entries that must be resolved before `node`'s own commands.
    fn requirements(
        &self,
        node: Self::Node,
        cx: &CompileContext<Self::Node>,
        out: &mut Vec<Requirement<Self::Node, Self::Command>>,
    ) {
        let _ = (node, cx, out);
    }

    /// Appends the commands `node` contributes.
    ///
    /// Fails only when building an embedded sub-list hits a cycle.
    fn commands(
        &self,
        node: Self::Node,
        cx: &CompileContext<Self::Node>,
        out: &mut Vec<Self::Command>,
    ) -> Result<(), CycleError<Self::Node>> {
        let _ = (node, cx, out);
        Ok(())
    }

    /// Appends child nodes to resolve after `node` (containers only).
    fn children(
        &self,
        node: Self::Node,
        cx: &CompileContext<Self::Node>,
        out: &mut Vec<Self::Node>,
    ) {
        let _ = (node, cx, out);
    }

    /// The external input index `node` is bound to, if any.
    fn input_index(&self, node: Self::Node) -> Option<usize> {
        let _ = node;
        None
    }
}
