use crate::area::Area;
use derive_more::Display;
use log::trace;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// How two areas relate to each other, from the point of view of the first
/// one (`a`). All variants except [Bounding::Undefined] assume both areas are
/// non-empty.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Bounding {
    /// At least one of the areas is empty
    Undefined,
    /// No hex is in both areas
    Distinct,
    /// Some hexes are shared, and each area has at least one hex the other
    /// doesn't
    Overlap,
    /// Every hex of `b` is in `a`, but not the other way around
    Contains,
    /// Every hex of `a` is in `b`, but not the other way around
    ContainedBy,
    /// Both areas have exactly the same hexes
    Equals,
}

/// Fast rejection test. False if either area is empty or their bounding
/// boxes don't intersect on both axes. True means the areas *might* share a
/// hex; it's still possible that they don't.
pub fn might_overlap(a: &Area, b: &Area) -> bool {
    match (a.bounds(), b.bounds()) {
        (Ok(a_bounds), Ok(b_bounds)) => a_bounds.overlaps(&b_bounds),
        _ => false,
    }
}

/// Classify the relationship between two areas. See [Bounding] for the
/// possible outcomes. If `parallel` is set, each area's hexes are scanned on
/// a separate task.
pub fn check_bounding(a: &Area, b: &Area, parallel: bool) -> Bounding {
    if a.is_empty() || b.is_empty() {
        return Bounding::Undefined;
    }
    if !might_overlap(a, b) {
        return Bounding::Distinct;
    }

    let ((a_in_b, overlap_a), (b_in_a, overlap_b)) = if parallel {
        rayon::join(|| scan(a, b), || scan(b, a))
    } else {
        (scan(a, b), scan(b, a))
    };
    let overlap = overlap_a || overlap_b;
    // a contains b if every hex of b is in a
    let contains = b_in_a;
    let contained_by = a_in_b;

    let bounding = if !overlap {
        Bounding::Distinct
    } else if contains && contained_by {
        Bounding::Equals
    } else if contains {
        Bounding::Contains
    } else if contained_by {
        Bounding::ContainedBy
    } else {
        Bounding::Overlap
    };
    trace!(
        "Classified {} hexes against {} hexes as {}",
        a.len(),
        b.len(),
        bounding
    );
    bounding
}

/// Walk every hex of `from` and check membership in `to`. Returns whether
/// every hex was found, and whether any hex was found.
fn scan(from: &Area, to: &Area) -> (bool, bool) {
    let mut all = true;
    let mut any = false;
    for hex in from.iter() {
        if to.contains(hex) {
            any = true;
        } else {
            all = false;
        }
        // Nothing left to learn
        if any && !all {
            break;
        }
    }
    (all, any)
}
