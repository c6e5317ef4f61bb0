//! Real-valued points and vectors in axial hex space

use crate::{
    hex::Hex,
    util::{almost_equal, ULPS},
};
use derive_more::{Add, AddAssign, Display, Neg, Sub, SubAssign};
use nalgebra::{UnitComplex, Vector2};
use serde::{Deserialize, Serialize};
use std::{f64::consts::TAU, ops};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A point (or vector) anywhere in the hex plane, not necessarily on a cell
/// center. Shares the axial layout of [Hex], with `s = -(q + r)`.
///
/// Lengths use the hex metric, so a vector between neighbouring cell centers
/// has length 1. Angles are screen angles: measured from the +x axis, growing
/// counterclockwise as seen on screen. See the [module docs](crate::Hex) for
/// the screen space mapping.
///
/// `PartialEq` is exact. Use [Self::almost_equals] when comparing computed
/// values.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Display,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{{{}, {}, {}}}", "self.q", "self.r", "self.s()")]
pub struct HexFractional {
    q: f64,
    r: f64,
}

impl HexFractional {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(q: f64, r: f64) -> Self {
        Self { q, r }
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn s(&self) -> f64 {
        -(self.q + self.r)
    }

    /// Are both components finite (not `NaN` or infinite)?
    pub fn is_finite(&self) -> bool {
        self.q.is_finite() && self.r.is_finite()
    }

    /// Map a screen space point into hex space. This is the inverse of
    /// [Self::to_cartesian].
    pub fn from_cartesian(point: Vector2<f64>) -> Self {
        // Solve x = √3·q + (√3/2)·r, y = 3/2·r
        let r = point.y / 1.5;
        let q = point.x / SQRT_3 - point.y / 3.0;
        Self::new(q, r)
    }

    /// Map this point into screen space, using pointy-topped hexes of unit
    /// size (center to corner)
    pub fn to_cartesian(self) -> Vector2<f64> {
        Vector2::new(SQRT_3 * self.q + SQRT_3 / 2.0 * self.r, 1.5 * self.r)
    }

    /// Get the unit-length vector pointing at the given screen angle
    pub fn from_angle(angle: f64) -> Self {
        // Screen y points down, so a counterclockwise angle has negative y
        Self::from_cartesian(Vector2::new(
            SQRT_3 * angle.cos(),
            -SQRT_3 * angle.sin(),
        ))
    }

    /// Get the screen angle of this vector, in `[0, 2π)`
    pub fn angle(self) -> f64 {
        let cartesian = self.to_cartesian();
        (-cartesian.y).atan2(cartesian.x).rem_euclid(TAU)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.q * other.q
            + self.r * other.r
            + (self.q * other.r + self.r * other.q) / 2.0
    }

    pub fn length_squared(self) -> f64 {
        self.q * self.q + self.r * self.r + self.q * self.r
    }

    /// Euclidean length in the hex metric
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Scale this vector to length 1. The zero vector has no direction, so it
    /// stays zero.
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            self
        } else {
            self / length
        }
    }

    /// Linearly interpolate between two points. `t = 0` gives this point,
    /// `t = 1` gives `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Rotate this point around `center` by `angle` radians, counterclockwise
    /// on screen. Rotating by `k·π/3` agrees with [Hex::rotate].
    pub fn rotate(self, center: Self, angle: f64) -> Self {
        // UnitComplex rotates counterclockwise in a y-up frame, which is
        // clockwise on screen
        let rotation = UnitComplex::new(-angle);
        let offset = (self - center).to_cartesian();
        center + Self::from_cartesian(rotation * offset)
    }

    /// Project this vector onto `other`. Projecting onto the zero vector gives
    /// zero.
    pub fn project_onto(self, other: Self) -> Self {
        let denominator = other.length_squared();
        if denominator == 0.0 {
            Self::ZERO
        } else {
            other * (self.dot(other) / denominator)
        }
    }

    /// Get the inner angle between this vector and `other`, in `[0, π]`
    pub fn angle_to(self, other: Self) -> f64 {
        UnitComplex::rotation_between(
            &self.to_cartesian(),
            &other.to_cartesian(),
        )
            .angle()
            .abs()
    }

    /// Round to the nearest exact hex. Each cube component is rounded
    /// independently, then whichever moved the most is recomputed from the
    /// other two so the cube invariant holds.
    pub fn round(self) -> Hex {
        // https://www.redblobgames.com/grids/hexagons/#rounding
        let mut q = self.q.round();
        let mut r = self.r.round();
        let s = self.s().round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s()).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        }
        // Otherwise s took the biggest hit, and s is derived anyway
        Hex::new(q as i64, r as i64)
    }

    /// Compare component-wise, allowing each to be off by up to [ULPS] units
    /// in the last place
    pub fn almost_equals(self, other: Self) -> bool {
        self.almost_equals_ulps(other, ULPS)
    }

    /// Compare component-wise, allowing each to be off by up to `max_ulps`
    /// units in the last place
    pub fn almost_equals_ulps(self, other: Self, max_ulps: u64) -> bool {
        almost_equal(self.q, other.q, max_ulps)
            && almost_equal(self.r, other.r, max_ulps)
    }
}

impl From<Hex> for HexFractional {
    fn from(hex: Hex) -> Self {
        Self::new(hex.q() as f64, hex.r() as f64)
    }
}

// Scale a vector by a constant
impl ops::Mul<f64> for HexFractional {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.q * rhs, self.r * rhs)
    }
}

impl ops::Div<f64> for HexFractional {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.q / rhs, self.r / rhs)
    }
}
