// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place 2D affine matrix.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Size};

/// A 2D affine transform edited in place.
///
/// The linear part is `[a c; b d]` acting on column vectors and the
/// translation is `(x, y)`. Every mutating operation appends a step after the
/// transform accumulated so far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// X component of the first basis vector.
    pub a: f64,
    /// Y component of the first basis vector.
    pub b: f64,
    /// X component of the second basis vector.
    pub c: f64,
    /// Y component of the second basis vector.
    pub d: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform `(1, 0, 0, 1, 0, 0)`.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a matrix from its six coefficients.
    #[inline]
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, x: f64, y: f64) -> Self {
        Self { a, b, c, d, x, y }
    }

    /// Resets to the identity.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Returns `true` if this is exactly the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if the linear part has no rotation or shear.
    #[inline]
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0
    }

    /// Copies all coefficients from `m`.
    #[inline]
    pub fn copy_from(&mut self, m: &Self) {
        *self = *m;
    }

    /// Copies only the translation from `m`.
    pub fn copy_translation_from(&mut self, m: &Self) {
        self.x = m.x;
        self.y = m.y;
    }

    /// Copies only the linear part from `m`.
    pub fn copy_linear_from(&mut self, m: &Self) {
        self.a = m.a;
        self.b = m.b;
        self.c = m.c;
        self.d = m.d;
    }

    /// Rotates the whole transform by `radians` about the origin.
    pub fn rotate(&mut self, radians: f64) {
        self.rotate_linear(radians);
        self.rotate_translation(radians);
    }

    /// Rotates only the first basis vector `(a, b)`.
    pub fn rotate_x_axis(&mut self, radians: f64) {
        let (v, u) = (radians.sin(), radians.cos());
        let a = self.a;
        self.a = u * a - v * self.b;
        self.b = v * a + u * self.b;
    }

    /// Rotates only the second basis vector `(c, d)`.
    pub fn rotate_y_axis(&mut self, radians: f64) {
        let (v, u) = (radians.sin(), radians.cos());
        let c = self.c;
        self.c = u * c - v * self.d;
        self.d = v * c + u * self.d;
    }

    /// Rotates only the translation.
    pub fn rotate_translation(&mut self, radians: f64) {
        let (v, u) = (radians.sin(), radians.cos());
        let x = self.x;
        self.x = u * x - v * self.y;
        self.y = v * x + u * self.y;
    }

    /// Rotates only the linear part.
    pub fn rotate_linear(&mut self, radians: f64) {
        self.rotate_x_axis(radians);
        self.rotate_y_axis(radians);
    }

    /// Adds `(tx, ty)` to the translation.
    #[inline]
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.x += tx;
        self.y += ty;
    }

    /// Adds `tx` to the horizontal translation.
    #[inline]
    pub fn translate_x(&mut self, tx: f64) {
        self.x += tx;
    }

    /// Adds `ty` to the vertical translation.
    #[inline]
    pub fn translate_y(&mut self, ty: f64) {
        self.y += ty;
    }

    /// Scales the transformed output by `(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.scale_x(sx);
        self.scale_y(sy);
    }

    /// Scales the transformed output horizontally.
    pub fn scale_x(&mut self, sx: f64) {
        self.a *= sx;
        self.c *= sx;
        self.x *= sx;
    }

    /// Scales the transformed output vertically.
    pub fn scale_y(&mut self, sy: f64) {
        self.b *= sy;
        self.d *= sy;
        self.y *= sy;
    }

    /// Appends `m`: the result maps a point through `self`, then through `m`.
    pub fn concat(&mut self, m: &Self) {
        let x = self.x * m.a + m.x;
        let y = self.y * m.d + m.y;
        if self.is_axis_aligned() && m.is_axis_aligned() {
            *self = Self::new(self.a * m.a, 0.0, 0.0, self.d * m.d, x, y);
            return;
        }
        *self = Self::new(
            self.a * m.a + self.b * m.c,
            self.a * m.b + self.b * m.d,
            self.c * m.a + self.d * m.c,
            self.d * m.d + self.c * m.b,
            x + self.y * m.c,
            y + self.x * m.b,
        );
    }

    /// Appends only the linear part of `m`, leaving the translation untouched.
    pub fn concat_linear(&mut self, m: &Self) {
        if self.is_axis_aligned() && m.is_axis_aligned() {
            self.a *= m.a;
            self.d *= m.d;
            return;
        }
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        self.a = a * m.a + b * m.c;
        self.b = a * m.b + b * m.d;
        self.c = c * m.a + d * m.c;
        self.d = d * m.d + c * m.b;
    }

    /// Maps only the translation through `m`, leaving the linear part untouched.
    pub fn concat_translation(&mut self, m: &Self) {
        let (x, y) = (self.x, self.y);
        self.x = m.x + x * m.a + y * m.c;
        self.y = m.y + y * m.d + x * m.b;
    }

    /// Inverts in place.
    ///
    /// Axis-aligned matrices with non-zero scale take a reciprocal fast path.
    /// A singular matrix becomes the identity.
    pub fn invert(&mut self) {
        if self.is_axis_aligned() && self.a != 0.0 && self.d != 0.0 {
            self.a = 1.0 / self.a;
            self.d = 1.0 / self.d;
            self.x *= -self.a;
            self.y *= -self.d;
            return;
        }

        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 {
            self.reset();
            return;
        }
        let inv = 1.0 / det;
        let (a, b, c, d, x, y) = (
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            self.x,
            self.y,
        );
        *self = Self::new(a, b, c, d, -(a * x + c * y), -(b * x + d * y));
    }

    /// Returns the inverse, leaving `self` untouched.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut m = *self;
        m.invert();
        m
    }

    /// Length of the first basis vector.
    #[must_use]
    pub fn x_scale(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Length of the second basis vector.
    #[must_use]
    pub fn y_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Angle of the first basis vector, in radians.
    #[must_use]
    pub fn x_rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// Angle of the second basis vector from the vertical, in radians.
    ///
    /// Equal to [`Matrix::x_rotation`] unless the matrix is skewed.
    #[must_use]
    pub fn y_rotation(&self) -> f64 {
        (-self.c).atan2(self.d)
    }

    /// Transformed x coordinate of `(px, py)`.
    #[inline]
    #[must_use]
    pub fn transform_x(&self, px: f64, py: f64) -> f64 {
        self.x + self.a * px + self.c * py
    }

    /// Transformed y coordinate of `(px, py)`.
    #[inline]
    #[must_use]
    pub fn transform_y(&self, px: f64, py: f64) -> f64 {
        self.y + self.d * py + self.b * px
    }

    /// Transforms a point.
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(self.transform_x(p.x, p.y), self.transform_y(p.x, p.y))
    }

    /// Returns `true` if `p` falls inside the rectangle `(0, 0)..size` of this
    /// matrix's local space (edges included).
    #[must_use]
    pub fn contains_point(&self, p: Point, size: Size) -> bool {
        let local = self.inverse().transform_point(p);
        local.x >= 0.0 && local.x <= size.width && local.y >= 0.0 && local.y <= size.height
    }
}

impl From<Matrix> for Affine {
    fn from(m: Matrix) -> Self {
        Self::new([m.a, m.b, m.c, m.d, m.x, m.y])
    }
}

impl From<Affine> for Matrix {
    fn from(affine: Affine) -> Self {
        let [a, b, c, d, x, y] = affine.as_coeffs();
        Self::new(a, b, c, d, x, y)
    }
}

/// Formats as a CSS `matrix()` function.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({},{},{},{},{},{})",
            self.a, self.b, self.c, self.d, self.x, self.y
        )
    }
}
