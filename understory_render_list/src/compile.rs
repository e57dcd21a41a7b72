// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first "require before add" compilation.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::error::CycleError;
use crate::graph::{CompileContext, RenderGraph, Requirement};
use crate::list::{InputBinding, RenderCommandList};

/// Compiles the graph reachable from `root` into a [`RenderCommandList`].
///
/// # Algorithm
///
/// 1. *Resolve* `root`: require it, then resolve each of its children.
/// 2. *Require* a node: if already added, do nothing; if pending, fail with a
///    [`CycleError`]; otherwise mark it pending, require every entry of its
///    requirements (skipping gaps, emitting inline commands in place), then
///    add it.
/// 3. *Add* a node: mark it added, append its commands, and record it as an
///    input node if it is bound to an input index.
///
/// A node reachable through several paths contributes its commands once.
///
/// # Errors
///
/// Returns a [`CycleError`] if any node transitively requires itself.
pub fn compile<G: RenderGraph>(
    graph: &G,
    root: G::Node,
) -> Result<RenderCommandList<G::Node, G::Command>, CycleError<G::Node>> {
    Compiler::new(graph, root, CompileContext::new()).run()
}

/// Compiles `root` as an isolated unit nested inside the compilation `outer`.
///
/// The returned list is independent from the outer one: it has its own
/// visit state and its own input nodes. While it is being built, `root` (and
/// every node already isolated in `outer`) reports
/// [`CompileContext::is_isolated`], so a graph can answer with a reduced
/// contract for it.
///
/// # Errors
///
/// Returns a [`CycleError`] if any node of the nested graph transitively
/// requires itself.
pub fn compile_isolated<G: RenderGraph>(
    graph: &G,
    root: G::Node,
    outer: &CompileContext<G::Node>,
) -> Result<RenderCommandList<G::Node, G::Command>, CycleError<G::Node>> {
    Compiler::new(graph, root, outer.nested(root)).run()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Visit {
    Pending,
    Added,
}

struct Compiler<'g, G: RenderGraph> {
    graph: &'g G,
    root: G::Node,
    cx: CompileContext<G::Node>,
    visits: HashMap<G::Node, Visit>,
    /// Nodes whose children were already resolved.
    expanded: HashSet<G::Node>,
    /// Pending chain, outermost first.
    pending: Vec<G::Node>,
    commands: Vec<G::Command>,
    inputs: Vec<InputBinding<G::Node>>,
}

impl<'g, G: RenderGraph> Compiler<'g, G> {
    fn new(graph: &'g G, root: G::Node, cx: CompileContext<G::Node>) -> Self {
        Self {
            graph,
            root,
            cx,
            visits: HashMap::new(),
            expanded: HashSet::new(),
            pending: Vec::new(),
            commands: Vec::new(),
            inputs: Vec::new(),
        }
    }

    fn run(mut self) -> Result<RenderCommandList<G::Node, G::Command>, CycleError<G::Node>> {
        log::debug!(
            "compiling render list for {:?} (isolated: {:?})",
            self.root,
            self.cx.isolated()
        );

        self.resolve(self.root)?;

        log::debug!(
            "compiled render list for {:?}: {} commands, {} inputs",
            self.root,
            self.commands.len(),
            self.inputs.len()
        );

        Ok(RenderCommandList {
            root: self.root,
            commands: self.commands,
            inputs: self.inputs,
        })
    }

    fn resolve(&mut self, node: G::Node) -> Result<(), CycleError<G::Node>> {
        self.require(node)?;

        if !self.expanded.insert(node) {
            return Ok(());
        }

        let mut children = Vec::new();
        self.graph.children(node, &self.cx, &mut children);
        for child in children {
            self.resolve(child)?;
        }
        Ok(())
    }

    fn require(&mut self, node: G::Node) -> Result<(), CycleError<G::Node>> {
        match self.visits.get(&node) {
            Some(Visit::Added) => return Ok(()),
            Some(Visit::Pending) => return Err(self.cycle_at(node)),
            None => {}
        }

        self.visits.insert(node, Visit::Pending);
        self.pending.push(node);

        let mut requirements = Vec::new();
        self.graph.requirements(node, &self.cx, &mut requirements);
        for requirement in requirements {
            match requirement {
                Requirement::Gap => {}
                Requirement::Node(upstream) => self.require(upstream)?,
                Requirement::Command(command) => self.commands.push(command),
            }
        }

        self.pending.pop();
        self.add(node)
    }

    fn add(&mut self, node: G::Node) -> Result<(), CycleError<G::Node>> {
        self.visits.insert(node, Visit::Added);

        let start = self.commands.len();
        self.graph.commands(node, &self.cx, &mut self.commands)?;
        if self.commands.len() > start {
            log::trace!("{node:?}: {:?}", &self.commands[start..]);
        }

        if let Some(index) = self.graph.input_index(node) {
            self.inputs.push(InputBinding { node, index });
        }
        Ok(())
    }

    fn cycle_at(&self, node: G::Node) -> CycleError<G::Node> {
        let start = self
            .pending
            .iter()
            .position(|pending| *pending == node)
            .unwrap_or(0);
        let mut path = self.pending[start..].to_vec();
        path.push(node);
        log::debug!("cycle while compiling {:?}: {path:?}", self.root);
        CycleError { node, path }
    }
}
