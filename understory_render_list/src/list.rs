// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiled command lists and their replay.

use alloc::vec::Vec;

/// Receives input values and executes commands during [`RenderCommandList::render`].
pub trait CommandTarget<N, C> {
    /// Copies an externally supplied value into an input node.
    fn write_input(&mut self, node: N, value: f64);

    /// Executes one command.
    fn execute(&mut self, command: &C);
}

/// A node bound to an external input index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InputBinding<N> {
    /// The input node.
    pub node: N,
    /// Index into the `inputs` slice passed to [`RenderCommandList::render`].
    pub index: usize,
}

/// A flat, ordered list of commands compiled from a root node.
///
/// Produced by [`compile`](crate::compile). Executing the commands in order
/// evaluates every required node exactly once, dependencies first.
#[derive(Clone, Debug)]
pub struct RenderCommandList<N, C> {
    pub(crate) root: N,
    pub(crate) commands: Vec<C>,
    pub(crate) inputs: Vec<InputBinding<N>>,
}

impl<N: Copy, C> RenderCommandList<N, C> {
    /// The node this list was compiled from.
    #[must_use]
    pub fn root(&self) -> N {
        self.root
    }

    /// The commands, in execution order.
    #[must_use]
    pub fn commands(&self) -> &[C] {
        &self.commands
    }

    /// The input nodes, in the order they were added.
    #[must_use]
    pub fn inputs(&self) -> &[InputBinding<N>] {
        &self.inputs
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the list contains no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays the list.
    ///
    /// For every input node whose index has a value in `inputs`, the value is
    /// written first; indices that are out of range or `None` leave the node
    /// untouched. Then every command is executed in order.
    pub fn render<T>(&self, target: &mut T, inputs: &[Option<f64>])
    where
        T: CommandTarget<N, C> + ?Sized,
    {
        for binding in &self.inputs {
            if let Some(Some(value)) = inputs.get(binding.index) {
                target.write_input(binding.node, *value);
            }
        }

        for command in &self.commands {
            target.execute(command);
        }
    }
}
