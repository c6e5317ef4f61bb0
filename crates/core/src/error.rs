use thiserror::Error;

/// Recoverable failures surfaced by this crate. Internal invariant violations
/// (e.g. a transform producing a hex with `q + r + s != 0`) are bugs and panic
/// instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Bounds were requested for an area with no hexes
    #[error("cannot compute the bounds of an empty area")]
    EmptyArea,

    /// A curve was sampled outside of its `[0, 1]` parameter range
    #[error("curve parameter {0} is outside of [0, 1]")]
    OutOfRange(f64),

    /// Evaluation observed a cancelled [CancelToken](crate::CancelToken)
    #[error("area evaluation was cancelled")]
    Cancelled,

    /// The biarc quadratic `a·β² + b·β + c = 0` has no positive real root.
    /// This means the inputs were malformed, e.g. both endpoints coincide.
    #[error("biarc has no positive root for a={a}, b={b}, c={c}")]
    NumericDegenerate { a: f64, b: f64, c: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
