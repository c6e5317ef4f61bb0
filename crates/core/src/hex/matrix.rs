//! Integer affine transforms over cube coordinates

use crate::hex::{bound_facing, Hex};
use nalgebra::{Matrix4, Vector4};
use std::ops;

/// A rigid transform of the hex grid, stored as a 4×4 integer matrix acting
/// on homogeneous cube coordinates `(q, r, s, 1)`.
///
/// Matrices can only be built from rotations by multiples of 60° and integer
/// translations (and compositions of those), so applying one to a hex always
/// produces a valid hex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HexMatrix(Matrix4<i64>);

impl HexMatrix {
    /// The transform that leaves every hex where it is
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Shift every hex by `offset`
    pub fn translation(offset: Hex) -> Self {
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1, 0, 0, offset.q(),
            0, 1, 0, offset.r(),
            0, 0, 1, offset.s(),
            0, 0, 0, 1,
        );
        Self(matrix)
    }

    /// Rotate around the origin by `turns` steps of 60°, counterclockwise.
    /// Any integer is accepted; it's normalized into `0..6`.
    pub fn rotation(turns: i64) -> Self {
        // Each step of 60° counterclockwise maps (q, r, s) to (-s, -q, -r).
        // Rows are (q', r', s', 1)
        #[rustfmt::skip]
        let matrix = match bound_facing(turns) {
            0 => Matrix4::identity(),
            1 => Matrix4::new(
                0, 0, -1, 0,
                -1, 0, 0, 0,
                0, -1, 0, 0,
                0, 0, 0, 1,
            ),
            2 => Matrix4::new(
                0, 1, 0, 0,
                0, 0, 1, 0,
                1, 0, 0, 0,
                0, 0, 0, 1,
            ),
            3 => Matrix4::new(
                -1, 0, 0, 0,
                0, -1, 0, 0,
                0, 0, -1, 0,
                0, 0, 0, 1,
            ),
            4 => Matrix4::new(
                0, 0, 1, 0,
                1, 0, 0, 0,
                0, 1, 0, 0,
                0, 0, 0, 1,
            ),
            5 => Matrix4::new(
                0, -1, 0, 0,
                0, 0, -1, 0,
                -1, 0, 0, 0,
                0, 0, 0, 1,
            ),
            _ => unreachable!("bound_facing returns 0..6"),
        };
        Self(matrix)
    }

    /// Rotate around `pivot` by `turns` steps of 60°, counterclockwise. This
    /// moves the pivot to the origin, rotates, then moves it back.
    pub fn rotation_about(pivot: Hex, turns: i64) -> Self {
        Self::translation(pivot)
            * Self::rotation(turns)
            * Self::translation(-pivot)
    }

    /// Compose two transforms, such that `self` is applied first and `next`
    /// second
    pub fn then(self, next: Self) -> Self {
        next * self
    }

    /// The underlying integer matrix
    pub fn matrix(&self) -> &Matrix4<i64> {
        &self.0
    }

    /// Transform a single hex. Panics if the result breaks the cube
    /// invariant, which would mean the matrix is corrupt.
    pub fn apply(&self, hex: Hex) -> Hex {
        let transformed = self.0 * Vector4::new(hex.q(), hex.r(), hex.s(), 1);
        Hex::from_cube(transformed.x, transformed.y, transformed.z)
    }
}

impl Default for HexMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ops::Mul for HexMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}
