use crate::{
    curve::{ArcCurve, Curve, LineCurve, Spin},
    hex::HexFractional,
    util::near_zero,
};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A circular arc described by where it starts, which way it's heading at
/// the start, and where it ends. Those three pin down a unique circle (or a
/// straight line, if the end lies dead ahead or behind).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    pub start: HexFractional,
    /// Unit tangent at [Self::start]
    pub tangent: HexFractional,
    pub end: HexFractional,
}

impl CircularArc {
    pub fn new(
        start: HexFractional,
        tangent: HexFractional,
        end: HexFractional,
    ) -> Self {
        Self {
            start,
            tangent,
            end,
        }
    }

    /// Which way the arc turns. Negative area means the end is to the left of
    /// the heading, which is counterclockwise on screen.
    pub fn spin(&self) -> Spin {
        let area = self.orientation();
        if near_zero(area) {
            Spin::None
        } else if area < 0.0 {
            Spin::CounterClockwise
        } else {
            Spin::Clockwise
        }
    }

    /// Convert into a sampleable curve. If the end is (almost) collinear with
    /// the start and its tangent, this is a [LineCurve].
    pub fn to_curve(&self) -> Curve {
        let spin = self.spin();
        if spin == Spin::None {
            return LineCurve::new(self.start, self.end).into();
        }

        let center = self.center();
        let radius = self.start.distance_to(center);
        ArcCurve::new(
            center,
            radius,
            (self.start - center).angle(),
            (self.end - center).angle(),
            spin,
        )
        .into()
    }

    /// Signed area of the triangle (start, start + tangent, end), used only
    /// for its sign
    fn orientation(&self) -> f64 {
        signed_area(self.start, self.start + self.tangent, self.end)
    }

    /// Find the center of the circle. It lies on the normal to the tangent
    /// through the start, and on the perpendicular bisector of the chord.
    /// Only valid when the three points aren't collinear.
    fn center(&self) -> HexFractional {
        let start = self.start.to_cartesian();
        let end = self.end.to_cartesian();
        let tangent = self.tangent.to_cartesian();
        let normal = Vector2::new(-tangent.y, tangent.x);
        let chord = end - start;
        let midpoint = (start + end) / 2.0;
        // Solve (start + normal·s - midpoint) · chord = 0 for s
        let s = (midpoint - start).dot(&chord) / normal.dot(&chord);
        HexFractional::from_cartesian(start + normal * s)
    }
}

/// Twice the signed area of a triangle in axial coordinates. Not a real
/// area (the axes aren't orthogonal), but zero exactly when the points are
/// collinear and its sign gives the winding.
pub(crate) fn signed_area(
    a: HexFractional,
    b: HexFractional,
    c: HexFractional,
) -> f64 {
    a.q() * (b.r() - c.r()) + b.q() * (c.r() - a.r()) + c.q() * (a.r() - b.r())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Hex;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_3;

    fn north() -> HexFractional {
        HexFractional::new(1.0, -2.0).normalize()
    }

    #[test]
    fn test_unit_arcs() {
        for i in 1..=5 {
            let end = HexFractional::from(Hex::direction(i));
            let arc =
                CircularArc::new(HexFractional::new(1.0, 0.0), north(), end);
            let Curve::Arc(curve) = arc.to_curve() else {
                panic!("Expected an arc for direction {i}");
            };
            assert_eq!(curve.spin(), Spin::CounterClockwise);
            assert_approx_eq!(curve.center().q(), 0.0, 1e-9);
            assert_approx_eq!(curve.center().r(), 0.0, 1e-9);
            assert_approx_eq!(curve.radius(), 1.0, 1e-9);
            assert_approx_eq!(curve.length(), i as f64 * FRAC_PI_3, 1e-9);
        }
    }

    #[test]
    fn test_clockwise() {
        // Heading north with the end off to the right
        let arc = CircularArc::new(
            HexFractional::ZERO,
            north(),
            HexFractional::new(1.0, 0.0),
        );
        assert_eq!(arc.spin(), Spin::Clockwise);
        let curve = arc.to_curve();
        assert_eq!(curve.spin(), Spin::Clockwise);
        // A half circle of diameter 1
        assert_approx_eq!(curve.length(), std::f64::consts::PI / 2.0, 1e-9);

        let end = curve.sample(1.0).unwrap();
        assert_approx_eq!(end.position.q(), 1.0, 1e-9);
        assert_approx_eq!(end.position.r(), 0.0, 1e-9);
        // Heading south by the end
        assert_approx_eq!(end.tangent.q(), -north().q(), 1e-9);
        assert_approx_eq!(end.tangent.r(), -north().r(), 1e-9);
    }

    #[test]
    fn test_collinear() {
        let east = HexFractional::new(1.0, 0.0);
        let arc = CircularArc::new(
            HexFractional::ZERO,
            east,
            HexFractional::new(5.0, 0.0),
        );
        assert_eq!(arc.spin(), Spin::None);
        let Curve::Line(line) = arc.to_curve() else {
            panic!("Expected a line");
        };
        assert_approx_eq!(line.length(), 5.0);
    }

    #[test]
    fn test_start_tangent_matches() {
        let tangent = HexFractional::new(0.3, 0.4).normalize();
        let arc = CircularArc::new(
            HexFractional::new(2.0, -1.0),
            tangent,
            HexFractional::new(-1.0, 3.5),
        );
        let start = arc.to_curve().sample(0.0).unwrap();
        assert_approx_eq!(start.position.q(), 2.0, 1e-9);
        assert_approx_eq!(start.position.r(), -1.0, 1e-9);
        assert_approx_eq!(start.tangent.q(), tangent.q(), 1e-9);
        assert_approx_eq!(start.tangent.r(), tangent.r(), 1e-9);
        let end = arc.to_curve().sample(1.0).unwrap();
        assert_approx_eq!(end.position.q(), -1.0, 1e-9);
        assert_approx_eq!(end.position.r(), 3.5, 1e-9);
    }
}
