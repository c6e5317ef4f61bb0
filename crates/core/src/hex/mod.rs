//! This module holds basic types and data structures related to hexagon grids.
//!
//! ## Coordinate Systems
//!
//! ### Grid Coordinates
//!
//! Hexes are addressed with the [cube coordinate system described by Amit
//! Patel](https://www.redblobgames.com/grids/hexagons/#coordinates-cube),
//! stored in its two-axis (axial) form. Each coordinate has three components
//! (`q`, `r`, and `s`), and **for any hex, all three components are integers
//! and `q + r + s = 0`.** Because of that constraint we only ever store `q`
//! and `r`; `s` is derived on demand.
//!
//! There are two flavors of grid coordinate:
//!
//! - [Hex]: an exact integer cell. This is the canonical representation, and
//!   the only thing an [Area](crate::Area) can hold.
//! - [HexFractional]: a real-valued point in the same axial space. Used for
//!   interpolation, rounding, and all curve math.
//!
//! Distances in both systems use the hex metric, where neighbouring cell
//! centers are exactly 1 apart. For fractional values that means
//! `|v|² = q² + r² + q·r`.
//!
//! ### Screen Coordinates
//!
//! Screen coordinates are plain Cartesian `(x, y)` with `x` pointing right and
//! **`y` pointing down**, i.e. the space a renderer would rasterize into. The
//! mapping uses pointy-topped hexes:
//!
//! ```text
//! x = √3·q + (√3/2)·r
//! y = 3/2·r
//! ```
//!
//! Every orientation word in this crate ("clockwise", "counterclockwise",
//! positive angles) refers to how things look in screen space. In particular,
//! [Direction] indices run counterclockwise: `E, NE, NW, W, SW, SE`.
//!
//! ### Transforms
//!
//! Rigid transforms of exact hexes (rotation by multiples of 60° about a pivot,
//! translation) are expressed as 4×4 integer matrices acting on `(q, r, s, 1)`.
//! See [HexMatrix].

mod data_structure;
mod fractional;
mod matrix;
mod unit;

pub use self::{data_structure::*, fractional::*, matrix::*, unit::*};
