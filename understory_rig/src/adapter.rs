// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display-adapter contract.

use crate::Scene;
use crate::id::{DisplayHandle, PartId, PinId, PinnedPartId};

/// A node whose matrices and read-backs were just refreshed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderedNode {
    /// A part or a model; read [`Scene::matrix`].
    Part(PartId),
    /// A pin; read [`Scene::pin_position`].
    Pin(PinId),
    /// A pinned part; read [`Scene::matrix`].
    PinnedPart(PinnedPartId),
}

/// Turns computed transforms into pixels, or anything else the host wants.
///
/// Called once per node per frame, right after that node's matrices and
/// materialized read-backs are up to date, and only for nodes that carry a
/// [`DisplayHandle`]. Implementations only read the scene.
pub trait DisplayAdapter {
    /// Presents `node`, identified on the host side by `handle`.
    fn render(&mut self, scene: &Scene, node: RenderedNode, handle: DisplayHandle);
}

/// Discards every node.
impl DisplayAdapter for () {
    fn render(&mut self, _scene: &Scene, _node: RenderedNode, _handle: DisplayHandle) {}
}
