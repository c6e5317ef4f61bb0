//! Continuous curves in hex space. Every curve is parameterized over
//! `t ∈ [0, 1]`, uniformly by arc length, and can be sampled for position,
//! tangent and curvature at any `t`.

pub mod arc;
pub mod biarc;

use crate::{
    error::{Error, Result},
    hex::HexFractional,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use strum::EnumIter;

/// Direction of travel along a curve, as seen on screen
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
pub enum Spin {
    Clockwise,
    CounterClockwise,
    /// Straight, or a mix of both directions
    None,
}

/// The state of a curve at a single point
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: HexFractional,
    /// Unit vector in the direction of travel
    pub tangent: HexFractional,
    /// Points toward the center of curvature, with length `1 / radius`. Zero
    /// on straight segments.
    pub curvature: HexFractional,
}

/// Any curve this crate can produce
#[derive(Clone, Debug, PartialEq)]
pub enum Curve {
    Line(LineCurve),
    Arc(ArcCurve),
    Piecewise(PiecewiseCurve),
}

impl Curve {
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Arc(arc) => arc.length(),
            Self::Piecewise(piecewise) => piecewise.length(),
        }
    }

    pub fn spin(&self) -> Spin {
        match self {
            Self::Line(_) => Spin::None,
            Self::Arc(arc) => arc.spin(),
            Self::Piecewise(piecewise) => piecewise.spin(),
        }
    }

    /// Sample the curve at `t`. Fails if `t` is outside `[0, 1]`.
    pub fn sample(&self, t: f64) -> Result<Sample> {
        match self {
            Self::Line(line) => line.sample(t),
            Self::Arc(arc) => arc.sample(t),
            Self::Piecewise(piecewise) => piecewise.sample(t),
        }
    }
}

impl From<LineCurve> for Curve {
    fn from(line: LineCurve) -> Self {
        Self::Line(line)
    }
}

impl From<ArcCurve> for Curve {
    fn from(arc: ArcCurve) -> Self {
        Self::Arc(arc)
    }
}

impl From<PiecewiseCurve> for Curve {
    fn from(piecewise: PiecewiseCurve) -> Self {
        Self::Piecewise(piecewise)
    }
}

/// A straight segment
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineCurve {
    start: HexFractional,
    end: HexFractional,
    /// Unit direction from start to end. Zero if the two coincide.
    slope: HexFractional,
    length: f64,
}

impl LineCurve {
    pub fn new(start: HexFractional, end: HexFractional) -> Self {
        let delta = end - start;
        Self {
            start,
            end,
            slope: delta.normalize(),
            length: delta.length(),
        }
    }

    pub fn start(&self) -> HexFractional {
        self.start
    }

    pub fn end(&self) -> HexFractional {
        self.end
    }

    pub fn slope(&self) -> HexFractional {
        self.slope
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn sample(&self, t: f64) -> Result<Sample> {
        check_parameter(t)?;
        Ok(Sample {
            position: self.start.lerp(self.end, t),
            tangent: self.slope,
            curvature: HexFractional::ZERO,
        })
    }
}

/// A section of a circle, traversed in one direction
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArcCurve {
    center: HexFractional,
    radius: f64,
    /// Screen angle of the start point relative to the center, in `[0, 2π)`
    start_angle: f64,
    /// Screen angle of the end point relative to the center, in `[0, 2π)`
    end_angle: f64,
    spin: Spin,
    length: f64,
}

impl ArcCurve {
    /// Create an arc around `center`, starting at `start_angle` and sweeping
    /// in the direction of `spin` until it reaches `end_angle`. The radius
    /// must be positive and the spin must be a real direction; violating
    /// either is a bug in the caller, so this panics.
    pub fn new(
        center: HexFractional,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        spin: Spin,
    ) -> Self {
        assert!(radius > 0.0, "Arc radius must be positive, got {radius}");
        assert_ne!(spin, Spin::None, "Arc must have a direction");
        let mut arc = Self {
            center,
            radius,
            start_angle,
            end_angle,
            spin,
            length: 0.0,
        };
        arc.length = radius * arc.central_angle();
        arc
    }

    pub fn center(&self) -> HexFractional {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Scalar curvature, `1 / radius`
    pub fn curvature(&self) -> f64 {
        1.0 / self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Angle swept from start to end, in `[0, 2π)`
    pub fn central_angle(&self) -> f64 {
        let sweep = match self.spin {
            Spin::Clockwise => self.start_angle - self.end_angle,
            _ => self.end_angle - self.start_angle,
        };
        sweep.rem_euclid(std::f64::consts::TAU)
    }

    /// Screen angle (relative to the center) of the point at `t`
    fn angle_at(&self, t: f64) -> f64 {
        match self.spin {
            Spin::Clockwise => self.start_angle - self.central_angle() * t,
            _ => self.start_angle + self.central_angle() * t,
        }
    }

    pub fn sample(&self, t: f64) -> Result<Sample> {
        check_parameter(t)?;
        let angle = self.angle_at(t);
        let position =
            self.center + HexFractional::from_angle(angle) * self.radius;
        let tangent_angle = match self.spin {
            Spin::Clockwise => angle - FRAC_PI_2,
            _ => angle + FRAC_PI_2,
        };
        Ok(Sample {
            position,
            tangent: HexFractional::from_angle(tangent_angle),
            curvature: (self.center - position).normalize() * self.curvature(),
        })
    }
}

/// A sequence of curves joined end to end. `t` is spread over the segments
/// in proportion to their lengths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PiecewiseCurve {
    segments: Vec<Curve>,
    length: f64,
}

impl PiecewiseCurve {
    pub fn new(segments: Vec<Curve>) -> Self {
        let length = segments.iter().map(Curve::length).sum();
        Self { segments, length }
    }

    pub fn segments(&self) -> &[Curve] {
        &self.segments
    }

    /// Total length of all segments
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The shared spin of all segments, or [Spin::None] if they disagree
    pub fn spin(&self) -> Spin {
        let mut spins = self.segments.iter().map(Curve::spin);
        match spins.next() {
            Some(first) if spins.all(|spin| spin == first) => first,
            _ => Spin::None,
        }
    }

    /// Sample at `t`. Fails if `t` is outside `[0, 1]`, or if there are no
    /// segments to sample.
    pub fn sample(&self, t: f64) -> Result<Sample> {
        check_parameter(t)?;
        let (last, init) =
            self.segments.split_last().ok_or(Error::OutOfRange(t))?;
        if self.length <= 0.0 {
            // Nothing to measure against, so everything maps onto the first
            return self.segments[0].sample(t);
        }

        let target = t * self.length;
        let mut covered = 0.0;
        for segment in init {
            let length = segment.length();
            if target <= covered + length {
                return segment
                    .sample(local_parameter(target - covered, length));
            }
            covered += length;
        }
        // Rounding can leave t = 1 just past the sum of the earlier segments
        last.sample(local_parameter(target - covered, last.length()))
    }
}

/// Map a distance into a segment onto that segment's own `[0, 1]`
fn local_parameter(distance: f64, length: f64) -> f64 {
    if length <= 0.0 {
        0.0
    } else {
        (distance / length).clamp(0.0, 1.0)
    }
}

fn check_parameter(t: f64) -> Result<()> {
    if (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(Error::OutOfRange(t))
    }
}
