//! Honeycomb is a toolkit for exact geometry on a hexagonal grid. It covers
//! three areas:
//!
//! - **Regions**: sets of hex cells ([Area]) combined through a lazy CSG tree
//!   ([Builder]) that evaluates independent subtrees in parallel
//! - **Pathfinding**: A* over the grid with a caller-supplied [Pather]
//! - **Curves**: circular arcs and biarc interpolation of waypoint polylines,
//!   producing G1-continuous paths ([smooth_path])
//!
//! ```
//! use honeycomb::{shapes, Hex, Shape};
//!
//! let hexagon = shapes::big_hex(Hex::ORIGIN, 5);
//! let hole = shapes::ring(Hex::ORIGIN, 2);
//! let donut = hexagon.subtract(hole).build().unwrap();
//! assert_eq!(donut.len(), 91 - 12);
//! ```
//!
//! Hex cells are stored as exact integers. Anything continuous (arc centers,
//! curve samples, interpolation) goes through [HexFractional].

mod area;
mod config;
mod curve;
mod error;
mod hex;
mod path;
mod util;

pub use crate::{
    area::{
        bounding::{check_bounding, might_overlap, Bounding},
        builder::{Builder, CancelToken, Evaluator, Shape},
        shapes, Area, Bounds,
    },
    config::BuildConfig,
    curve::{
        arc::CircularArc,
        biarc::{biarc, smooth_curve, smooth_path},
        ArcCurve, Curve, LineCurve, PiecewiseCurve, Sample, Spin,
    },
    error::{Error, Result},
    hex::{
        Direction, Hex, HexFractional, HexIndexSet, HexMap, HexMatrix, HexSet,
    },
    path::{path_to, AreaPather, Path, Pather, UniformCost},
    util::{almost_equal, cmp_unwrap, EPSILON, ULPS},
};
