//! Biarc interpolation: joining two points, each with a heading, using a pair
//! of circular arcs that meet with a shared tangent.

use crate::{
    curve::{arc::CircularArc, Curve, PiecewiseCurve},
    error::{Error, Result},
    hex::HexFractional,
    util::{cmp_unwrap, near_zero},
};
use log::debug;
use std::f64::consts::FRAC_PI_2;

/// Connect `start` (heading along `start_tangent`) to `end` (arriving along
/// `end_tangent`). Both tangents must be unit length. `ratio` sets how the
/// two arcs split the work: the first arc's control distance is `ratio`
/// times the second's.
///
/// Returns a single arc when the endpoints are already lined up along their
/// tangents, otherwise two arcs. When no pair of arcs fits without one of
/// them collapsing to a point, the leg is split at its midpoint and each
/// half gets its own biarc, giving up to four arcs. The arcs are position
/// and tangent continuous with each other and with the endpoint tangents.
pub fn biarc(
    start: HexFractional,
    start_tangent: HexFractional,
    end: HexFractional,
    end_tangent: HexFractional,
    ratio: f64,
) -> Result<Vec<CircularArc>> {
    solve(start, start_tangent, end, end_tangent, ratio).or_else(|error| {
        if near_zero(start.distance_to(end)) {
            return Err(error);
        }
        debug!("Splitting biarc from {} to {} at its midpoint", start, end);
        let midpoint = start.lerp(end, 0.5);
        let heading = split_tangent(start, start_tangent, end);
        let mut arcs = solve(start, start_tangent, midpoint, heading, ratio)?;
        arcs.extend(solve(midpoint, heading, end, end_tangent, ratio)?);
        Ok(arcs)
    })
}

/// Solve for a single biarc, failing if the joint lands on either endpoint
fn solve(
    start: HexFractional,
    start_tangent: HexFractional,
    end: HexFractional,
    end_tangent: HexFractional,
    ratio: f64,
) -> Result<Vec<CircularArc>> {
    let v = start - end;

    // Both tangents point straight from start to end
    let heading = (start_tangent + end_tangent).normalize();
    if near_zero(v.normalize().dot(heading) + 1.0) {
        return Ok(vec![CircularArc::new(start, start_tangent, end)]);
    }

    let a = 2.0 * ratio * (start_tangent.dot(end_tangent) - 1.0);
    let b = 2.0 * v.dot(start_tangent * ratio + end_tangent);
    let c = v.dot(v);
    let degenerate = || Error::NumericDegenerate { a, b, c };
    if near_zero(c) {
        return Err(degenerate());
    }

    let beta = if near_zero(a) {
        if near_zero(b) {
            // Parallel tangents, perpendicular to the chord. Two half circles
            // meeting in the middle, heading back the way we came.
            let joint = start.lerp(end, 0.5);
            return Ok(vec![
                CircularArc::new(start, start_tangent, joint),
                CircularArc::new(joint, -start_tangent, end),
            ]);
        }
        -c / b
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Err(degenerate());
        }
        // Stable form of the quadratic formula, which avoids cancellation
        // when a is small
        let q = -0.5 * (b + b.signum() * discriminant.sqrt());
        [q / a, c / q]
            .into_iter()
            .filter(|beta| *beta > 0.0)
            .max_by(cmp_unwrap)
            .ok_or_else(degenerate)?
    };
    if !(beta.is_finite() && beta > 0.0) {
        return Err(degenerate());
    }
    let alpha = ratio * beta;

    // Control points: how far each arc reaches along its endpoint tangent
    let start_control = start + start_tangent * alpha;
    let end_control = end - end_tangent * beta;
    let joint = start_control.lerp(end_control, alpha / (alpha + beta));
    // When the end tangent mirrors the single arc's exit tangent, every
    // solution puts the joint on an endpoint
    if near_zero(joint.distance_to(start)) || near_zero(joint.distance_to(end))
    {
        return Err(degenerate());
    }
    let joint_tangent = (end_control - start_control).normalize();

    Ok(vec![
        CircularArc::new(start, start_tangent, joint),
        CircularArc::new(joint, joint_tangent, end),
    ])
}

/// Heading at the midpoint of a split leg: perpendicular to the chord, on
/// the same side as the start tangent. A start tangent that is itself that
/// perpendicular would collapse the first half again, so it gets the other
/// one.
fn split_tangent(
    start: HexFractional,
    start_tangent: HexFractional,
    end: HexFractional,
) -> HexFractional {
    let chord = (end - start).normalize();
    let mut normal = chord.rotate(HexFractional::ZERO, FRAC_PI_2);
    if normal.dot(start_tangent) < 0.0 {
        normal = -normal;
    }
    if near_zero(normal.distance_to(start_tangent)) {
        normal = -normal;
    }
    normal
}

/// Build a smooth sequence of arcs passing through every point of `path`,
/// starting along `start_tangent` and finishing along `end_tangent`. Interior
/// tangents are estimated from the neighbouring points. Fewer than two points
/// gives no arcs.
pub fn smooth_path(
    start_tangent: HexFractional,
    end_tangent: HexFractional,
    path: &[HexFractional],
) -> Result<Vec<CircularArc>> {
    let n = path.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut tangents = vec![HexFractional::ZERO; n];
    tangents[0] = start_tangent;
    tangents[n - 1] = end_tangent;
    for k in 1..n - 1 {
        tangents[k] =
            estimate_tangent(path[k] - path[k - 1], path[k + 1] - path[k]);
    }

    let mut arcs = Vec::with_capacity(2 * (n - 1));
    for k in 0..n - 1 {
        arcs.extend(biarc(
            path[k],
            tangents[k],
            path[k + 1],
            tangents[k + 1],
            1.0,
        )?);
    }
    debug!(
        "Smoothed path of {} waypoints into {} arcs",
        n,
        arcs.len()
    );
    Ok(arcs)
}

/// Same as [smooth_path], but joined into a single curve
pub fn smooth_curve(
    start_tangent: HexFractional,
    end_tangent: HexFractional,
    path: &[HexFractional],
) -> Result<Curve> {
    let arcs = smooth_path(start_tangent, end_tangent, path)?;
    let segments = arcs.iter().map(CircularArc::to_curve).collect();
    Ok(PiecewiseCurve::new(segments).into())
}

/// Blend the incoming and outgoing legs at a waypoint, leaning toward the
/// shorter one
fn estimate_tangent(
    incoming: HexFractional,
    outgoing: HexFractional,
) -> HexFractional {
    let incoming_length = incoming.length();
    let outgoing_length = outgoing.length();
    if incoming_length == 0.0 || outgoing_length == 0.0 {
        return (incoming + outgoing).normalize();
    }
    (incoming * (outgoing_length / incoming_length)
        + outgoing * (incoming_length / outgoing_length))
        .normalize()
}
