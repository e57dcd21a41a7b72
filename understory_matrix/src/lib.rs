// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Matrix: mutable 2D affine matrices and a pin-correspondence solver.
//!
//! [`Matrix`] is a six-coefficient affine transform `(a, b, c, d, x, y)` with
//! the same layout as [`kurbo::Affine`]: a point `(px, py)` maps to
//! `(a·px + c·py + x, b·px + d·py + y)`. Unlike `Affine` it is edited in place,
//! which is what a per-frame command list wants: every operation *appends* a
//! step, so `m.scale(2.0, 2.0); m.translate(10.0, 0.0);` scales first and then
//! translates.
//!
//! - Axis-aligned matrices take fast paths in [`Matrix::concat`] and
//!   [`Matrix::invert`].
//! - Inverting a singular matrix yields the identity rather than an error.
//! - Decomposition queries report the scale and rotation of each basis vector.
//!
//! [`solve_pins`] reconstructs a matrix from up to three point
//! correspondences ([`PinPair`]): an origin in a part's own space and a target
//! in world space.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_matrix::{Matrix, PinPair, solve_pins};
//!
//! let mut m = Matrix::IDENTITY;
//! m.scale(2.0, 1.0);
//! m.translate(10.0, 0.0);
//! assert_eq!(m.transform_point(Point::new(1.0, 0.0)), Point::new(12.0, 0.0));
//!
//! // One pin only positions.
//! let pins = [PinPair::new(Point::ZERO, Point::new(5.0, 7.0))];
//! let solved = solve_pins(&pins, Size::new(100.0, 100.0));
//! assert_eq!(solved.transform_point(Point::new(1.0, 1.0)), Point::new(6.0, 8.0));
//! ```
//!
//! This crate is `no_std`. Enable either the `std` (default) or `libm`
//! feature for the trigonometry it needs.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_matrix requires either the `std` or `libm` feature");

mod matrix;
mod pins;

pub use matrix::Matrix;
pub use pins::{PinPair, solve_pins};
