use std::cmp::Ordering;

/// Absolute tolerance for collinearity and near-zero checks in curve math
pub const EPSILON: f64 = 1e-10;

/// Default number of units in the last place that two floats may differ by
/// and still be considered equal. See [almost_equal].
pub const ULPS: u64 = 5;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs the elapsed time at the given level (default `Debug`),
/// and evaluates to the value of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Compare two `PartialOrd` values dangerously. If the partial comparison
/// fails (returns `None`), this will panic. This is useful if you have floats
/// that you know for a fact will not be `NaN`.
pub fn cmp_unwrap<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap()
}

/// Check if two floats are within `max_ulps` representable values of each
/// other. ULP distance is meaningless across zero, so values within
/// [f64::EPSILON] of each other are always considered equal. `NaN` is never
/// equal to anything.
pub fn almost_equal(a: f64, b: f64, max_ulps: u64) -> bool {
    if a == b {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if (a - b).abs() <= f64::EPSILON {
        return true;
    }
    if a.is_sign_positive() != b.is_sign_positive() {
        return false;
    }
    // For two floats of the same sign, the bit patterns are ordered the same
    // way as the values, so the difference is the number of floats between
    let distance = (a.to_bits() as i64).wrapping_sub(b.to_bits() as i64);
    distance.unsigned_abs() <= max_ulps
}

/// Check if a float is within [EPSILON] of zero
pub(crate) fn near_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}
