// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural compile errors.

use alloc::vec::Vec;
use core::fmt;

/// Error returned when a node's requirements transitively include itself.
///
/// Compilation aborts as soon as a pending node is re-entered; no partial
/// command list is produced.
#[derive(Clone, PartialEq, Eq)]
pub struct CycleError<N> {
    /// The node that was required again while still pending.
    pub node: N,
    /// The pending chain that closes the cycle, outermost first.
    ///
    /// Starts and ends with [`node`](Self::node).
    pub path: Vec<N>,
}

impl<N: fmt::Debug> fmt::Debug for CycleError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CycleError {{ node: {:?}, path: {:?} }}",
            self.node, self.path
        )
    }
}

impl<N: fmt::Debug> fmt::Display for CycleError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular render dependency through {:?}", self.node)?;
        if self.path.len() > 1 {
            write!(f, " (")?;
            for (i, node) in self.path.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{node:?}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl<N: fmt::Debug> core::error::Error for CycleError<N> {}
