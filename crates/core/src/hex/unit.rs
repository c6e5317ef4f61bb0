//! This sub-module contains the exact hex cell type and the six directions
//! between neighbouring cells. See the parent module documentation for more
//! info on the coordinate system.

use crate::hex::{HexFractional, HexMatrix};
use derive_more::{Add, AddAssign, Display, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use std::{iter, ops};
use strum::{EnumIter, IntoEnumIterator};

/// A single cell in the hex grid, addressed by its axial coordinates. The
/// third cube component is derived as `s = -(q + r)` so the cube invariant
/// `q + r + s = 0` holds by construction.
///
/// Hexes double as vectors: adding two hexes translates one by the other, and
/// multiplying by an integer scales the offset.
///
/// Hexes are ordered by `(q, r)`. The ordering has no geometric meaning; it
/// exists so collections of hexes can be sorted deterministically.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
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
pub struct Hex {
    q: i64,
    r: i64,
}

impl Hex {
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Construct a new hex with the given q and r. Since q+r+s=0 for all
    /// hexes, we can derive s from q & r.
    pub const fn new(q: i64, r: i64) -> Self {
        Self { q, r }
    }

    /// Construct a new hex from all three cube components. Panics if they
    /// don't satisfy `q + r + s = 0`, since that means some transform
    /// upstream is broken.
    pub fn from_cube(q: i64, r: i64, s: i64) -> Self {
        assert_eq!(q + r + s, 0, "invalid cube coordinate ({q}, {r}, {s})");
        Self::new(q, r)
    }

    pub const fn q(&self) -> i64 {
        self.q
    }

    pub const fn r(&self) -> i64 {
        self.r
    }

    pub const fn s(&self) -> i64 {
        -(self.q + self.r)
    }

    /// Number of single steps from the origin to this hex
    pub fn length(self) -> i64 {
        // https://www.redblobgames.com/grids/hexagons/#distances
        (self.q.abs() + self.r.abs() + self.s().abs()) / 2
    }

    /// Calculate the path distance between two hexes, meaning the number of
    /// hops it takes to get from one to the other. 0 if the hexes are equal,
    /// 1 if they are adjacent, 2 if there is 1 hex between them, etc.
    pub fn distance_to(self, other: Hex) -> i64 {
        (self - other).length()
    }

    /// Get the unit offset for the given direction index. The index is
    /// normalized into `0..6` first, so any integer is accepted.
    pub fn direction(direction: i64) -> Hex {
        Direction::from_index(direction).to_vector()
    }

    /// Get the hex adjacent to this one in the given direction
    pub fn neighbor(self, direction: Direction) -> Hex {
        self + direction.to_vector()
    }

    /// Get an iterator of all the hexes directly adjacent to this one, in
    /// [Direction] order. The iterator will always contain exactly 6 values.
    pub fn neighbors(self) -> impl Iterator<Item = Hex> {
        Direction::iter().map(move |dir| self.neighbor(dir))
    }

    /// Rotate this hex around `pivot` by `turns` steps of 60°,
    /// counterclockwise. Negative turns rotate clockwise.
    pub fn rotate(self, pivot: Hex, turns: i64) -> Hex {
        HexMatrix::rotation_about(pivot, turns).apply(self)
    }

    /// Linearly interpolate between two hexes. `t = 0` gives this hex,
    /// `t = 1` gives `other`.
    pub fn lerp(self, other: Hex, t: f64) -> HexFractional {
        HexFractional::from(self).lerp(other.into(), t)
    }

    /// Get the sequence of hexes on the straight line from this hex to
    /// `other`, including both endpoints. The line has `distance + 1` hexes
    /// and each consecutive pair is adjacent.
    pub fn line_to(self, other: Hex) -> Vec<Hex> {
        let steps = self.distance_to(other);
        if steps == 0 {
            return vec![self];
        }
        (0..=steps)
            .map(|i| self.lerp(other, i as f64 / steps as f64).round())
            .collect()
    }

    /// Walk the ring of hexes that are exactly `radius` steps from this one.
    /// The walk starts at `self + direction(4) * radius` and traverses the six
    /// sides in direction order, so consecutive hexes are always adjacent.
    /// A ring of radius 0 is just this hex.
    pub fn ring_iter(self, radius: u32) -> impl Iterator<Item = Hex> {
        let start = self + Hex::direction(4) * i64::from(radius);
        let walk = Direction::iter()
            .flat_map(move |dir| iter::repeat(dir).take(radius as usize))
            .scan(start, |current, dir| {
                let hex = *current;
                *current = current.neighbor(dir);
                Some(hex)
            });
        iter::once(self).filter(move |_| radius == 0).chain(walk)
    }

    /// Walk every hex within `radius` steps of this one, center first, then
    /// ring by ring outward.
    pub fn spiral_iter(self, radius: u32) -> impl Iterator<Item = Hex> {
        (0..=radius).flat_map(move |ring| self.ring_iter(ring))
    }

    /// Get the three hexes that meet at the corner between `direction` and
    /// the direction counterclockwise from it. This hex is always first.
    pub fn vertex_hexes(self, direction: Direction) -> [Hex; 3] {
        [
            self,
            self.neighbor(direction),
            self.neighbor(direction.rotate(1)),
        ]
    }

    /// Get the position of the corner between `direction` and the direction
    /// counterclockwise from it. This is the centroid of the three hexes
    /// returned by [Self::vertex_hexes].
    pub fn vertex(self, direction: Direction) -> HexFractional {
        let [a, b, c] = self.vertex_hexes(direction);
        HexFractional::from(a + b + c) / 3.0
    }
}

// Scale an offset by a constant
impl ops::Mul<i64> for Hex {
    type Output = Hex;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::new(self.q * rhs, self.r * rhs)
    }
}

/// Normalize any integer direction index into the range `0..6`
pub fn bound_facing(direction: i64) -> usize {
    direction.rem_euclid(6) as usize
}

/// The 6 directions in which hexes can line up side-to-side. Each direction
/// points from a hex's center to the center of one of its neighbors. Variants
/// are listed in index order, which runs counterclockwise on screen starting
/// at east.
#[derive(
    Copy,
    Clone,
    Debug,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// East
    E,
    /// Northeast
    NE,
    /// Northwest
    NW,
    /// West
    W,
    /// Southwest
    SW,
    /// Southeast
    SE,
}

impl Direction {
    /// All directions, in index order
    pub const ALL: [Self; 6] =
        [Self::E, Self::NE, Self::NW, Self::W, Self::SW, Self::SE];

    /// Get the direction for an index. Any integer is accepted; it's
    /// normalized into `0..6` with [bound_facing].
    pub fn from_index(index: i64) -> Self {
        Self::ALL[bound_facing(index)]
    }

    /// Position of this direction in [Self::ALL]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the unit offset that moves a hex one step in this direction
    pub fn to_vector(self) -> Hex {
        match self {
            Self::E => Hex::new(1, 0),
            Self::NE => Hex::new(1, -1),
            Self::NW => Hex::new(0, -1),
            Self::W => Hex::new(-1, 0),
            Self::SW => Hex::new(-1, 1),
            Self::SE => Hex::new(0, 1),
        }
    }

    /// Rotate this direction by `turns` steps of 60°, counterclockwise
    pub fn rotate(self, turns: i64) -> Self {
        Self::from_index(self.index() as i64 + turns)
    }

    /// Get the direction directly opposite this one
    pub fn opposite(self) -> Self {
        self.rotate(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexSet;

    #[test]
    fn test_cube_invariant() {
        for hex in Hex::ORIGIN.spiral_iter(4) {
            assert_eq!(hex.q() + hex.r() + hex.s(), 0);
        }
        let hex = Hex::from_cube(3, -5, 2);
        assert_eq!(hex, Hex::new(3, -5));
    }

    #[test]
    #[should_panic]
    fn test_from_cube_invalid() {
        Hex::from_cube(1, 1, 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Hex::new(1, -2).to_string(), "{1, -2, 1}");
        assert_eq!(Hex::ORIGIN.to_string(), "{0, 0, 0}");
    }

    #[test]
    fn test_arithmetic() {
        let a = Hex::new(1, 2);
        let b = Hex::new(4, -1);
        assert_eq!(a + b, Hex::new(5, 1));
        assert_eq!(a - b, Hex::new(-3, 3));
        assert_eq!(a * 3, Hex::new(3, 6));
        assert_eq!(-a, Hex::new(-1, -2));
    }

    #[test]
    fn test_distance_to() {
        let p0 = Hex::ORIGIN;
        let p1 = Hex::new(-1, 1);
        let p2 = Hex::new(2, -1);
        let p3 = Hex::new(2, -3);

        assert_eq!(p0.distance_to(p0), 0);
        assert_eq!(p3.distance_to(p3), 0);

        assert_eq!(p0.distance_to(p1), 1);
        assert_eq!(p0.distance_to(p2), 2);
        assert_eq!(p0.distance_to(p3), 3);

        assert_eq!(p1.distance_to(p2), 3);
        assert_eq!(p1.distance_to(p3), 4);
        assert_eq!(p2.distance_to(p3), 2);
    }

    #[test]
    fn test_bound_facing() {
        assert_eq!(bound_facing(0), 0);
        assert_eq!(bound_facing(5), 5);
        assert_eq!(bound_facing(6), 0);
        assert_eq!(bound_facing(-1), 5);
        assert_eq!(bound_facing(-13), 5);
        assert_eq!(Hex::direction(7), Hex::direction(1));
        assert_eq!(Direction::from_index(-2), Direction::SW);
    }

    #[test]
    fn test_neighbors() {
        let neighbors: Vec<Hex> = Hex::new(2, 3).neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        for (dir, neighbor) in Direction::iter().zip(&neighbors) {
            assert_eq!(Hex::new(2, 3).distance_to(*neighbor), 1);
            assert_eq!(Hex::new(2, 3).neighbor(dir), *neighbor);
        }
        let unique: HexSet = neighbors.into_iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_direction_rotation() {
        for dir in Direction::iter() {
            assert_eq!(dir.rotate(6), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(
                dir.to_vector() + dir.opposite().to_vector(),
                Hex::ORIGIN
            );
            // Rotating the vector matches rotating the direction
            assert_eq!(
                dir.to_vector().rotate(Hex::ORIGIN, 1),
                dir.rotate(1).to_vector()
            );
        }
    }

    #[test]
    fn test_rotate() {
        let pivot = Hex::new(2, -1);
        let hex = Hex::new(5, 3);
        assert_eq!(hex.rotate(pivot, 0), hex);
        assert_eq!(hex.rotate(pivot, 6), hex);
        assert_eq!(hex.rotate(pivot, -12), hex);
        assert_eq!(hex.rotate(pivot, 3).rotate(pivot, 3), hex);
        assert_eq!(hex.rotate(pivot, 2).rotate(pivot, -2), hex);
        assert_eq!(
            hex.rotate(pivot, 1).distance_to(pivot),
            hex.distance_to(pivot)
        );
        assert_eq!(Hex::new(1, 0).rotate(Hex::ORIGIN, 1), Hex::new(1, -1));
        assert_eq!(Hex::new(1, 0).rotate(Hex::ORIGIN, -1), Hex::new(0, 1));
    }

    #[test]
    fn test_line_to() {
        assert_eq!(Hex::ORIGIN.line_to(Hex::ORIGIN), vec![Hex::ORIGIN]);
        assert_eq!(
            Hex::new(1, -2).line_to(Hex::new(1, 1)),
            vec![
                Hex::new(1, -2),
                Hex::new(1, -1),
                Hex::new(1, 0),
                Hex::new(1, 1)
            ]
        );

        let from = Hex::new(-3, 1);
        let to = Hex::new(4, -5);
        let line = from.line_to(to);
        assert_eq!(line.len() as i64, from.distance_to(to) + 1);
        assert_eq!(line.first(), Some(&from));
        assert_eq!(line.last(), Some(&to));
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1);
        }
    }

    #[test]
    fn test_ring_iter() {
        assert_eq!(Hex::new(3, 3).ring_iter(0).collect::<Vec<_>>(), vec![
            Hex::new(3, 3)
        ]);

        let center = Hex::new(-2, 1);
        for radius in 1..5 {
            let ring: Vec<Hex> = center.ring_iter(radius).collect();
            assert_eq!(ring.len(), 6 * radius as usize);
            assert_eq!(ring[0], center + Hex::direction(4) * radius as i64);
            for hex in &ring {
                assert_eq!(hex.distance_to(center), radius as i64);
            }
            // The walk is contiguous, including wrapping around to the start
            for (i, hex) in ring.iter().enumerate() {
                assert_eq!(hex.distance_to(ring[(i + 1) % ring.len()]), 1);
            }
        }
    }

    #[test]
    fn test_spiral_iter() {
        let spiral: Vec<Hex> = Hex::ORIGIN.spiral_iter(3).collect();
        assert_eq!(spiral.len(), 37);
        assert_eq!(spiral[0], Hex::ORIGIN);
        // Center outward: distances never decrease
        for pair in spiral.windows(2) {
            assert!(pair[0].length() <= pair[1].length());
        }
    }

    #[test]
    fn test_vertex() {
        let hexes = Hex::ORIGIN.vertex_hexes(Direction::E);
        assert_eq!(hexes, [Hex::ORIGIN, Hex::new(1, 0), Hex::new(1, -1)]);
        for [a, b, c] in
            Direction::iter().map(|dir| Hex::new(4, 4).vertex_hexes(dir))
        {
            assert_eq!(a.distance_to(b), 1);
            assert_eq!(b.distance_to(c), 1);
            assert_eq!(c.distance_to(a), 1);
        }

        // Corners sit 1/√3 away from the center
        for dir in Direction::iter() {
            let corner = Hex::ORIGIN.vertex(dir);
            assert!((corner.length() - 1.0 / 3f64.sqrt()).abs() < 1e-12);
        }
    }
}
