//! Generators for common areas. Every generator returns a finished [Area];
//! combine them with [Shape](crate::Shape) to get anything more complex.

use crate::{
    area::{Area, Bounds},
    hex::{Hex, HexFractional, HexIndexSet, HexSet},
    util::{almost_equal, ULPS},
};
use std::iter;

/// A filled hexagon: every hex within `radius` steps of `center`
pub fn big_hex(center: Hex, radius: u32) -> Area {
    let radius = i64::from(radius);
    let hexes: HexSet = (-radius..=radius)
        .flat_map(|q| {
            // |q|, |r| and |q + r| must all be within the radius
            let r_min = (-radius).max(-q - radius);
            let r_max = radius.min(-q + radius);
            (r_min..=r_max).map(move |r| center + Hex::new(q, r))
        })
        .collect();
    let bounds = Bounds {
        min_q: center.q() - radius,
        max_q: center.q() + radius,
        min_r: center.r() - radius,
        max_r: center.r() + radius,
    };
    Area::with_bounds(hexes, Some(bounds))
}

/// The hexes exactly `radius` steps from `center`. A ring of radius 0 is just
/// the center. See [Hex::ring_iter] for the walk order.
pub fn ring(center: Hex, radius: u32) -> Area {
    // Every ring touches all four extremes of its bounding box
    let big = i64::from(radius);
    let bounds = Bounds {
        min_q: center.q() - big,
        max_q: center.q() + big,
        min_r: center.r() - big,
        max_r: center.r() + big,
    };
    Area::with_bounds(center.ring_iter(radius).collect(), Some(bounds))
}

/// Same hexes as [big_hex], gathered by walking rings from the center
/// outward. See [Hex::spiral_iter] for the walk order.
pub fn spiral(center: Hex, radius: u32) -> Area {
    center.spiral_iter(radius).collect()
}

/// Every hex whose center is within `radius` of `center`, measured in the
/// hex metric (neighbouring centers are 1 apart). Distances that land within
/// a few ULPs of the radius count as inside. A negative or non-finite radius
/// gives an empty area.
pub fn circle(center: Hex, radius: f64) -> Area {
    if !radius.is_finite() || radius < 0.0 {
        return Area::new();
    }
    // Any hex inside the circle is within this many steps
    let reach = (radius.ceil() as u32).saturating_add(1);
    let origin = HexFractional::from(center);
    center
        .spiral_iter(reach)
        .filter(|hex| {
            let distance = HexFractional::from(*hex).distance_to(origin);
            distance <= radius || almost_equal(distance, radius, ULPS)
        })
        .collect()
}

/// The hex version of a rectangle, covering the axial bounds of the given
/// corners. Each row `r` spans `q` from `min_q - r/2` to `max_q - r/2`
/// (rounding toward zero), which offsets alternating rows so the result
/// looks rectangular on screen.
pub fn rectangle(corners: &[Hex]) -> Area {
    let Some(bounds) = Bounds::of(corners.iter().copied()) else {
        return Area::new();
    };
    (bounds.min_r..=bounds.max_r)
        .flat_map(|r| {
            let shift = r / 2;
            (bounds.min_q - shift..=bounds.max_q - shift)
                .map(move |q| Hex::new(q, r))
        })
        .collect()
}

/// Ordered hexes along the polyline through `points`, from the first point
/// to the last. Each segment is drawn with [Hex::line_to]. Hexes shared
/// between segments (or visited twice by a self-intersecting polyline) only
/// appear at their first position.
pub fn line_hexes(points: &[Hex]) -> HexIndexSet {
    match points {
        [] => HexIndexSet::default(),
        [point] => iter::once(*point).collect(),
        _ => points
            .windows(2)
            .flat_map(|pair| pair[0].line_to(pair[1]))
            .collect(),
    }
}

/// The hexes along the polyline through `points`. See [line_hexes] for an
/// ordered version.
pub fn line(points: &[Hex]) -> Area {
    line_hexes(points).into_iter().collect()
}

/// A filled polygon with the given vertices. The outline is drawn through
/// each vertex and back to the first, then each column of the bounding box
/// is scanned from low `r` to high `r`. Every run of consecutive outline
/// hexes in a column is one boundary crossing, and each gap between two runs
/// is filled if the hex halfway through it lies inside the polygon. The
/// result is the outline plus every filled gap.
pub fn polygon(vertices: &[Hex]) -> Area {
    let mut outline_points = vertices.to_vec();
    if let Some(first) = vertices.first() {
        outline_points.push(*first);
    }
    let outline: HexSet = line_hexes(&outline_points).into_iter().collect();
    let Some(bounds) = Bounds::of(outline.iter().copied()) else {
        return Area::new();
    };

    let mut hexes = outline.clone();
    for q in bounds.min_q..=bounds.max_q {
        let mut previous: Option<i64> = None;
        for r in bounds.min_r..=bounds.max_r {
            if !outline.contains(&Hex::new(q, r)) {
                continue;
            }
            if let Some(above) = previous.filter(|above| r - above > 1) {
                let middle = Hex::new(q, above + (r - above) / 2);
                if encloses(vertices, middle) {
                    hexes.extend((above + 1..r).map(|r| Hex::new(q, r)));
                }
            }
            previous = Some(r);
        }
    }
    Area::with_bounds(hexes, Some(bounds))
}

/// Even-odd test for whether a hex center is inside the polygon. Axial
/// coordinates are an affine image of screen space, so crossings can be
/// counted on `q` and `r` directly.
fn encloses(vertices: &[Hex], hex: Hex) -> bool {
    let (q, r) = (hex.q() as f64, hex.r() as f64);
    let mut inside = false;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let (q1, r1) = (a.q() as f64, a.r() as f64);
        let (q2, r2) = (b.q() as f64, b.r() as f64);
        if (r1 > r) != (r2 > r) && q < q1 + (r - r1) * (q2 - q1) / (r2 - r1) {
            inside = !inside;
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    fn hexes(hexes: &[(i64, i64)]) -> Vec<Hex> {
        let mut hexes: Vec<Hex> =
            hexes.iter().map(|&(q, r)| Hex::new(q, r)).collect();
        hexes.sort_unstable();
        hexes
    }

    #[test]
    fn test_big_hex() {
        for radius in 0..6 {
            let area = big_hex(Hex::new(2, -1), radius);
            let radius = i64::from(radius);
            assert_eq!(area.len() as i64, 3 * radius * (radius + 1) + 1);
            assert!(area
                .iter()
                .all(|hex| hex.distance_to(Hex::new(2, -1)) <= radius));
            assert_eq!(area.bounds(), Ok(Bounds::of(area.iter()).unwrap()));
        }
    }

    #[test]
    fn test_ring() {
        assert_eq!(ring(Hex::new(3, 3), 0).slice(), vec![Hex::new(3, 3)]);
        for radius in 1..6 {
            let area = ring(Hex::ORIGIN, radius);
            assert_eq!(area.len() as u32, 6 * radius);
            assert!(area
                .iter()
                .all(|hex| hex.length() == i64::from(radius)));
            assert_eq!(area.bounds(), Ok(Bounds::of(area.iter()).unwrap()));
        }
    }

    #[test]
    fn test_ring_laws() {
        let center = Hex::new(-4, 1);
        let union = (0..=4)
            .map(|i| ring(center, i))
            .fold(Area::new().into(), |acc: crate::Builder, ring| {
                acc.union(ring)
            })
            .build()
            .unwrap();
        assert_eq!(*union, big_hex(center, 4));
        assert_eq!(spiral(center, 4), big_hex(center, 4));

        let difference = big_hex(center, 3)
            .subtract(big_hex(center, 2))
            .build()
            .unwrap();
        assert_eq!(*difference, ring(center, 3));
    }

    #[test]
    fn test_circle() {
        assert_eq!(circle(Hex::ORIGIN, 0.0).slice(), vec![Hex::ORIGIN]);
        // Neighbours are exactly 1 away
        assert_eq!(circle(Hex::ORIGIN, 1.0), big_hex(Hex::ORIGIN, 1));
        // (1, 1) is √3 away, the first hex of ring 2 to fall inside
        assert_eq!(circle(Hex::ORIGIN, 1.5), big_hex(Hex::ORIGIN, 1));
        assert_eq!(circle(Hex::ORIGIN, 3f64.sqrt()).len(), 13);
        assert!(circle(Hex::ORIGIN, -1.0).is_empty());
        assert!(circle(Hex::ORIGIN, f64::NAN).is_empty());
        assert!(circle(Hex::ORIGIN, f64::INFINITY).is_empty());
        assert!(circle(Hex::ORIGIN, f64::NEG_INFINITY).is_empty());
    }

    #[test]
    fn test_rectangle() {
        assert!(rectangle(&[]).is_empty());
        let area = rectangle(&[Hex::new(0, 0), Hex::new(2, 3)]);
        assert_eq!(
            area.slice(),
            hexes(&[
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (2, 1),
                (-1, 2),
                (0, 2),
                (1, 2),
                (-1, 3),
                (0, 3),
                (1, 3),
            ])
        );
    }

    #[test]
    fn test_line() {
        assert!(line(&[]).is_empty());
        assert_eq!(line(&[Hex::new(4, 4)]).slice(), vec![Hex::new(4, 4)]);

        let ordered =
            line_hexes(&[Hex::ORIGIN, Hex::new(3, 0), Hex::new(3, 2)]);
        assert_eq!(
            ordered.into_iter().collect::<Vec<_>>(),
            vec![
                Hex::new(0, 0),
                Hex::new(1, 0),
                Hex::new(2, 0),
                Hex::new(3, 0),
                Hex::new(3, 1),
                Hex::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_triangle() {
        let v0 = Hex::new(1, -2);
        let v1 = Hex::new(1, 1);
        let v2 = Hex::new(-2, 1);
        let border = [
            (1, -2),
            (1, -1),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-2, 1),
            (-1, 0),
            (0, -1),
        ];
        assert_eq!(line(&[v0, v1, v2, v0]).slice(), hexes(&border));

        let mut filled = border.to_vec();
        filled.push((0, 0));
        let area = polygon(&[v0, v1, v2]);
        assert_eq!(area.slice(), hexes(&filled));
        assert!(area.bounds_clean());
    }

    /// Check that every column of a filled triangle is one unbroken run
    /// spanning exactly the outline's extent in that column
    fn assert_columns_filled(vertices: &[Hex]) {
        let mut closed = vertices.to_vec();
        closed.push(vertices[0]);
        let outline = line(&closed);
        let area = polygon(vertices);
        let bounds = area.bounds().unwrap();
        for q in bounds.min_q..=bounds.max_q {
            let column = |area: &Area| -> Vec<i64> {
                let mut rs: Vec<i64> = area
                    .iter()
                    .filter(|hex| hex.q() == q)
                    .map(|hex| hex.r())
                    .collect();
                rs.sort_unstable();
                rs
            };
            let filled = column(&area);
            let edge = column(&outline);
            assert_eq!(
                filled.is_empty(),
                edge.is_empty(),
                "{vertices:?} q={q}"
            );
            if filled.is_empty() {
                continue;
            }
            assert_eq!(filled.first(), edge.first(), "{vertices:?} q={q}");
            assert_eq!(filled.last(), edge.last(), "{vertices:?} q={q}");
            assert_eq!(
                (filled[filled.len() - 1] - filled[0] + 1) as usize,
                filled.len(),
                "{vertices:?} q={q}"
            );
        }
    }

    #[test]
    fn test_triangle_columns() {
        // Runs along the outline used to leak fill below the triangle
        let area = polygon(&[Hex::ORIGIN, Hex::new(-4, -4), Hex::new(-4, -2)]);
        assert!(!area.contains(Hex::new(-4, -1)));
        assert!(!area.contains(Hex::new(-4, 0)));

        for a in -4..=4 {
            for b in -4..=4 {
                for c in -4..=4 {
                    for d in -4..=4 {
                        if a * d == b * c {
                            continue;
                        }
                        assert_columns_filled(&[
                            Hex::ORIGIN,
                            Hex::new(a, b),
                            Hex::new(c, d),
                        ]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_concave_polygon() {
        let vertices = [
            Hex::new(0, 0),
            Hex::new(8, 0),
            Hex::new(8, -8),
            Hex::new(4, -2),
            Hex::new(0, -8),
        ];
        let mut closed = vertices.to_vec();
        closed.push(vertices[0]);
        let outline = line(&closed);
        let area = polygon(&vertices);
        assert_eq!(area.len(), 61);

        // Off the outline, a hex is filled exactly when its center is inside
        let bounds = area.bounds().unwrap();
        for q in bounds.min_q..=bounds.max_q {
            for r in bounds.min_r..=bounds.max_r {
                let hex = Hex::new(q, r);
                if !outline.contains(hex) {
                    assert_eq!(
                        area.contains(hex),
                        encloses(&vertices, hex),
                        "{hex}"
                    );
                }
            }
        }
        // The notch between the two peaks stays empty
        assert!(!area.contains(Hex::new(4, -5)));
    }

    #[test]
    fn test_polygon_degenerate() {
        assert!(polygon(&[]).is_empty());
        assert_eq!(polygon(&[Hex::new(1, 1)]).slice(), vec![Hex::new(1, 1)]);
    }
}
