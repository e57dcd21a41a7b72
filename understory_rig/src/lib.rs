// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Rig: a reactive scene of parts, pins and models.
//!
//! A [`Scene`] owns every node of one tree:
//!
//! - **Values**: scalars, inputs bound to an external index, and calculated
//!   values whose base is run through a chain of modifiers
//!   ([`Scene::modify`]).
//! - **Parts**: containers whose working matrix is composed from calculated
//!   attributes ([`PartAttribute`]), followed by extra [`MatrixOp`]s and the
//!   parent's working matrix. The content matrix further offsets the origin.
//! - **Pins**: points in a parent's content space with a world-space
//!   read-back.
//! - **Pinned parts**: containers whose matrix is solved from up to three
//!   origin/target pin pairs.
//! - **Models**: parts that compile their subtree in isolation and feed it
//!   from their own input sources.
//!
//! Nothing is evaluated eagerly. [`Scene::compile`] walks the dependency graph
//! once into a [`SceneList`] with [`understory_render_list`]; the list is then
//! replayed every frame with [`Scene::render_list`], which executes each
//! command in dependency order and hands every node that carries a
//! [`DisplayHandle`] to a [`DisplayAdapter`].
//!
//! ## Example
//!
//! ```rust
//! use understory_rig::{PartAttribute, RenderedAttribute, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.part();
//! let child = scene.part();
//! let sibling = scene.part();
//! scene.add_children(root, [child, sibling]);
//!
//! scene.set_part_attribute(root, PartAttribute::X, 100.0);
//!
//! // The child moves with external input 0.
//! let time = scene.input(0);
//! let x = scene.part_attribute(child, PartAttribute::X);
//! scene.modify(x).add(time).divide(10.0);
//!
//! // The sibling sits below wherever the child ended up.
//! let child_x = scene.rendered(child, RenderedAttribute::X);
//! let y = scene.part_attribute(sibling, PartAttribute::Y);
//! scene.modify(y).add(child_x);
//!
//! let list = scene.compile(root).unwrap();
//! scene.render_list(&list, &[Some(50.0)], &mut ());
//!
//! assert_eq!(scene.matrix(child).x, 105.0);
//! assert_eq!(scene.matrix(sibling).y, 105.0);
//! ```
//!
//! Compilation rejects dependency cycles with a [`CycleError`] instead of
//! producing a list.
//!
//! This crate is `no_std`. Enable either the `std` (default) or `libm`
//! feature.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_rig requires either the `std` or `libm` feature");

mod adapter;
mod command;
mod graph;
mod id;
mod model;
mod node;
mod part;
mod pin;
mod pinned;
mod scene;
mod value;

pub use understory_matrix::Matrix;
pub use understory_render_list::CycleError;

pub use adapter::{DisplayAdapter, RenderedNode};
pub use command::SceneCommand;
pub use id::{
    CalculatedId, ChildHandle, ContainerHandle, DisplayHandle, ModelId, NodeId, PartId, PinId,
    PinnedPartId, ValueId,
};
pub use part::{MatrixOp, PartAttribute, RenderedAttribute};
pub use pin::Axis;
pub use pinned::{Dimension, PinSlot, PinnedPartPinId};
pub use scene::{NodeKind, Scene, SceneOptions};
pub use value::{ModifierChain, ModifierOp, ValueSource};

/// A compiled, replayable list of scene commands.
pub type SceneList = understory_render_list::RenderCommandList<NodeId, SceneCommand>;
