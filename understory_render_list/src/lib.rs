// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Render List: compile a graph of render nodes into a flat command list.
//!
//! A *render node* is anything that can answer three read-only questions
//! (see [`RenderGraph`]):
//!
//! - **Requirements**: which nodes must have executed before this node's own
//!   work, possibly with gaps for absent optional edges and pre-bound inline
//!   commands placed between them.
//! - **Commands**: which primitive operations the node contributes.
//! - **Children**: which further nodes a container wants resolved after it.
//!
//! [`compile`] walks the requirement graph depth first ("require before add"),
//! places each node in the output at most once, rejects cycles with a
//! [`CycleError`], and returns a [`RenderCommandList`]. The list is meant to be
//! cached by its owner and replayed every frame with
//! [`RenderCommandList::render`], which first copies externally supplied input
//! values into the nodes bound to input indices and then executes every command
//! in order against a [`CommandTarget`].
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_render_list::{
//!     compile, CommandTarget, CompileContext, CycleError, RenderGraph, Requirement,
//! };
//!
//! // Node 0 adds the value of node 1 (an external input) to node 2 (a constant).
//! struct Sum;
//!
//! impl RenderGraph for Sum {
//!     type Node = u32;
//!     type Command = u32;
//!
//!     fn requirements(
//!         &self,
//!         node: u32,
//!         _cx: &CompileContext<u32>,
//!         out: &mut Vec<Requirement<u32, u32>>,
//!     ) {
//!         if node == 0 {
//!             out.extend([Requirement::Node(1), Requirement::Node(2)]);
//!         }
//!     }
//!
//!     fn commands(
//!         &self,
//!         node: u32,
//!         _cx: &CompileContext<u32>,
//!         out: &mut Vec<u32>,
//!     ) -> Result<(), CycleError<u32>> {
//!         if node == 0 {
//!             out.push(0);
//!         }
//!         Ok(())
//!     }
//!
//!     fn input_index(&self, node: u32) -> Option<usize> {
//!         (node == 1).then_some(0)
//!     }
//! }
//!
//! struct Cells([f64; 3]);
//!
//! impl CommandTarget<u32, u32> for Cells {
//!     fn write_input(&mut self, node: u32, value: f64) {
//!         self.0[node as usize] = value;
//!     }
//!
//!     fn execute(&mut self, _command: &u32) {
//!         self.0[0] = self.0[1] + self.0[2];
//!     }
//! }
//!
//! let list = compile(&Sum, 0).unwrap();
//! assert_eq!(list.len(), 1);
//!
//! let mut cells = Cells([0.0, 0.0, 2.0]);
//! list.render(&mut cells, &[Some(40.0)]);
//! assert_eq!(cells.0[0], 42.0);
//! ```
//!
//! ## Isolated compilation
//!
//! A node can embed an independently compiled sub-list as one of its own
//! commands. While compiling that sub-list with [`compile_isolated`], the
//! embedding node is recorded on the [`CompileContext`] so that the graph can
//! answer differently for it (typically: no requirements, no commands, only
//! children), which keeps the nested compile from recursing back into itself.
//!
//! ## Logging
//!
//! Compilation reports through the [`log`] facade: `debug` for compile start,
//! end and detected cycles, `trace` for every node that contributes commands.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod compile;
mod error;
mod graph;
mod list;

pub use compile::{compile, compile_isolated};
pub use error::CycleError;
pub use graph::{CompileContext, RenderGraph, Requirement};
pub use list::{CommandTarget, InputBinding, RenderCommandList};
