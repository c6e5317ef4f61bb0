//! Regions of the hex grid. An [Area] is an immutable set of exact hexes,
//! built either directly from a list of hexes, from one of the generators in
//! [shapes], or by evaluating a CSG tree ([Builder](crate::Builder)).

pub mod bounding;
pub mod builder;
pub mod shapes;

use crate::{
    area::bounding::Bounding,
    error::{Error, Result},
    hex::{Hex, HexSet},
};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cmp, sync::OnceLock};

/// A set of hex cells with a lazily cached bounding box.
///
/// The bounding box is computed the first time it's needed (or up front, when
/// the code that built the area already knew it) and never changes after
/// that, since areas are never mutated. Empty areas have no bounds.
///
/// Iteration order is unspecified. Use [Self::slice] when a deterministic
/// order is needed.
#[derive(Clone, Debug, Default)]
pub struct Area {
    hexes: HexSet,
    bounds: OnceLock<Bounds>,
}

impl Area {
    /// Create an area with no hexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an area from a set of hexes whose bounds are already known.
    /// The caller is responsible for `bounds` being correct. If the set is
    /// empty, the bounds are ignored.
    pub(crate) fn with_bounds(hexes: HexSet, bounds: Option<Bounds>) -> Self {
        let area = Self {
            hexes,
            bounds: OnceLock::new(),
        };
        if let Some(bounds) = bounds.filter(|_| !area.hexes.is_empty()) {
            debug_assert_eq!(
                Bounds::of(area.hexes.iter().copied()),
                Some(bounds)
            );
            // The lock was created above, so this can't already be set
            let _ = area.bounds.set(bounds);
        }
        area
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.hexes.contains(&hex)
    }

    /// Check if every one of the given hexes is in this area. Vacuously true
    /// for an empty input.
    pub fn contains_hexes(&self, hexes: impl IntoIterator<Item = Hex>) -> bool {
        hexes.into_iter().all(|hex| self.contains(hex))
    }

    /// Number of hexes in this area
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    /// Iterate over the hexes in this area, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = Hex> + '_ {
        self.hexes.iter().copied()
    }

    /// A reference to the underlying set of hexes
    pub fn hexes(&self) -> &HexSet {
        &self.hexes
    }

    /// Move the hex set out of this area
    pub fn into_hexes(self) -> HexSet {
        self.hexes
    }

    /// Materialize this area as a list of hexes, sorted by `(q, r)`. Two
    /// equal areas always produce the same list.
    pub fn slice(&self) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self.iter().collect();
        hexes.sort_unstable();
        hexes
    }

    /// Get the axial bounding box of this area. Computed on first access and
    /// cached after that. Returns an error if the area is empty.
    pub fn bounds(&self) -> Result<Bounds> {
        if self.is_empty() {
            return Err(Error::EmptyArea);
        }
        Ok(*self.bounds.get_or_init(|| {
            // Non-empty, so there's always at least one hex to bound
            Bounds::of(self.iter()).unwrap_or_default()
        }))
    }

    /// Has the bounding box already been computed? Always false for an empty
    /// area, and always true after [Self::materialize] on a non-empty one.
    pub fn bounds_clean(&self) -> bool {
        self.bounds.get().is_some()
    }

    /// Get the bounding box only if it has already been computed. This never
    /// scans the hexes.
    pub(crate) fn cached_bounds(&self) -> Option<Bounds> {
        self.bounds.get().copied()
    }

    /// Compute and cache the bounding box if it isn't already. Does nothing
    /// for an empty area.
    pub fn materialize(&self) -> &Self {
        // An empty area has no bounds; that's the only possible error here
        let _ = self.bounds();
        self
    }

    /// Check if two areas contain exactly the same hexes
    pub fn equals(&self, other: &Area) -> bool {
        self.hexes == other.hexes
    }

    /// Classify how this area relates to `other`. See [Bounding].
    pub fn check_bounding(&self, other: &Area) -> Bounding {
        bounding::check_bounding(self, other, true)
    }

    /// Serialize this area into JSON, as a list of hexes
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(self).expect("error serializing area")
    }

    /// Deserialize an area from a JSON list of hexes. Will fail if the input
    /// is malformed.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(json).context("error deserializing area")
    }
}

impl PartialEq for Area {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Area {}

impl FromIterator<Hex> for Area {
    fn from_iter<T: IntoIterator<Item = Hex>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<HexSet>())
    }
}

impl From<HexSet> for Area {
    fn from(hexes: HexSet) -> Self {
        Self {
            hexes,
            bounds: OnceLock::new(),
        }
    }
}

// Serialize as a sorted list instead of a set. Formats like JSON have no set
// type, and sorting keeps the output stable
impl Serialize for Area {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slice())
    }
}

impl<'de> Deserialize<'de> for Area {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let hexes: Vec<Hex> = Vec::deserialize(deserializer)?;
        Ok(hexes.into_iter().collect())
    }
}

/// An axis-aligned box in axial coordinates, inclusive on both ends. On
/// screen this is a parallelogram, not a rectangle.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[display(fmt = "q:[{}, {}] r:[{}, {}]", min_q, max_q, min_r, max_r)]
pub struct Bounds {
    pub min_q: i64,
    pub max_q: i64,
    pub min_r: i64,
    pub max_r: i64,
}

impl Bounds {
    /// The bounds of a single hex
    pub fn point(hex: Hex) -> Self {
        Self {
            min_q: hex.q(),
            max_q: hex.q(),
            min_r: hex.r(),
            max_r: hex.r(),
        }
    }

    /// Compute the bounds of a collection of hexes. `None` if it's empty.
    pub fn of(hexes: impl IntoIterator<Item = Hex>) -> Option<Self> {
        hexes
            .into_iter()
            .fold(None, |bounds: Option<Bounds>, hex| {
                Some(match bounds {
                    None => Self::point(hex),
                    Some(bounds) => bounds.include(hex),
                })
            })
    }

    /// Grow these bounds (if necessary) to cover `hex`
    pub fn include(self, hex: Hex) -> Self {
        Self {
            min_q: cmp::min(self.min_q, hex.q()),
            max_q: cmp::max(self.max_q, hex.q()),
            min_r: cmp::min(self.min_r, hex.r()),
            max_r: cmp::max(self.max_r, hex.r()),
        }
    }

    /// The smallest bounds that cover both of these
    pub fn union(self, other: Self) -> Self {
        Self {
            min_q: cmp::min(self.min_q, other.min_q),
            max_q: cmp::max(self.max_q, other.max_q),
            min_r: cmp::min(self.min_r, other.min_r),
            max_r: cmp::max(self.max_r, other.max_r),
        }
    }

    pub fn contains(&self, hex: Hex) -> bool {
        (self.min_q..=self.max_q).contains(&hex.q())
            && (self.min_r..=self.max_r).contains(&hex.r())
    }

    /// Check if two boxes share any space. The q and r ranges are checked
    /// independently; both must intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        ranges_overlap((self.min_q, self.max_q), (other.min_q, other.max_q))
            && ranges_overlap(
                (self.min_r, self.max_r),
                (other.min_r, other.max_r),
            )
    }

    /// Number of columns (distinct q values) covered
    pub fn width(&self) -> i64 {
        self.max_q - self.min_q + 1
    }

    /// Number of rows (distinct r values) covered
    pub fn height(&self) -> i64 {
        self.max_r - self.min_r + 1
    }
}

/// Two inclusive ranges intersect if either endpoint of one lies in the
/// other, or one spans the other completely
fn ranges_overlap(
    (a_min, a_max): (i64, i64),
    (b_min, b_max): (i64, i64),
) -> bool {
    let a = a_min..=a_max;
    let b = b_min..=b_max;
    a.contains(&b_min)
        || a.contains(&b_max)
        || b.contains(&a_min)
        || b.contains(&a_max)
}
