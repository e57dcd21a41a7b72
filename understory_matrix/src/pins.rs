// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconstructing a matrix from pinned point correspondences.

use core::f64::consts::FRAC_PI_2;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};

use crate::Matrix;

/// A point in a part's own (unscaled) space and where it must land in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinPair {
    /// Location in the part's local rectangle.
    pub origin: Point,
    /// Location in world space.
    pub target: Point,
}

impl PinPair {
    /// Creates a pin pair.
    #[inline]
    #[must_use]
    pub const fn new(origin: Point, target: Point) -> Self {
        Self { origin, target }
    }
}

/// Solves for the affine map sending each pin's origin to its target.
///
/// - No pins: the identity.
/// - One pin: a pure translation by `target - origin`.
/// - Two pins: a third pin is synthesized on each side one unit along the
///   perpendicular of the first-to-second segment, which keeps the segment's
///   direction and length ratio.
/// - Three pins: the exact affine map through all three. Further pins are
///   ignored.
///
/// `size` is the part's declared size. It scales the intermediate bases so
/// they span the part's rectangle; a zero width or height zeroes that basis
/// column instead of dividing by zero.
#[must_use]
pub fn solve_pins(pins: &[PinPair], size: Size) -> Matrix {
    let (first, second, third) = match pins {
        [] => return Matrix::IDENTITY,
        [only] => {
            let mut m = Matrix::IDENTITY;
            m.translate(only.target.x - only.origin.x, only.target.y - only.origin.y);
            return m;
        }
        [first, second] => (
            *first,
            *second,
            PinPair::new(
                unit_perpendicular(first.origin, second.origin),
                unit_perpendicular(first.target, second.target),
            ),
        ),
        [first, second, third, ..] => (*first, *second, *third),
    };

    let mut m = spanning_basis(size, first.origin, second.origin, third.origin);
    m.invert();
    m.concat(&spanning_basis(
        size,
        first.target,
        second.target,
        third.target,
    ));
    m
}

/// The point one unit from `from`, a quarter turn counter-clockwise from the
/// direction of `toward`.
fn unit_perpendicular(from: Point, toward: Point) -> Point {
    let angle = (toward.y - from.y).atan2(toward.x - from.x) + FRAC_PI_2;
    Point::new(from.x + angle.cos(), from.y + angle.sin())
}

/// Matrix sending `(0, 0)`, `(w, 0)` and `(0, h)` to `p1`, `p2` and `p3`.
fn spanning_basis(size: Size, p1: Point, p2: Point, p3: Point) -> Matrix {
    let (w, h) = (size.width, size.height);
    let column = |p: Point, extent: f64| {
        if extent == 0.0 {
            (0.0, 0.0)
        } else {
            ((p.x - p1.x) / extent, (p.y - p1.y) / extent)
        }
    };
    let (a, b) = column(p2, w);
    let (c, d) = column(p3, h);
    Matrix::new(a, b, c, d, p1.x, p1.y)
}
