//! Lazy CSG trees over [Area]s. Combinators only record the operation; no
//! hexes are touched until the tree is handed to an [Evaluator].

use crate::{
    area::{
        bounding::{check_bounding, Bounding},
        Area, Bounds,
    },
    config::BuildConfig,
    error::{Error, Result},
    hex::{Hex, HexMatrix, HexSet},
    timed,
};
use anyhow::Context;
use derive_more::Display;
use log::{debug, trace};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use validator::Validate;

/// A node in a CSG tree. Leaves hold finished areas, every other node holds
/// the subtree(s) it operates on. Trees are cheap to clone, since leaf areas
/// are shared.
///
/// Evaluation never caches anything inside the tree, so evaluating the same
/// tree twice does all the work twice and yields equal areas.
#[derive(Clone, Debug, Display)]
pub enum Builder {
    #[display(fmt = "Leaf({})", "_0.len()")]
    Leaf(Arc<Area>),
    #[display(fmt = "Union({}, {})", _0, _1)]
    Union(Box<Builder>, Box<Builder>),
    #[display(fmt = "Intersection({}, {})", _0, _1)]
    Intersection(Box<Builder>, Box<Builder>),
    #[display(fmt = "Subtract({}, {})", _0, _1)]
    Subtract(Box<Builder>, Box<Builder>),
    /// Rotate by `turns` steps of 60° counterclockwise around `pivot`
    #[display(fmt = "Rotate({}, {}, {})", inner, pivot, turns)]
    Rotate {
        inner: Box<Builder>,
        pivot: Hex,
        turns: i64,
    },
    #[display(fmt = "Translate({}, {})", inner, offset)]
    Translate { inner: Box<Builder>, offset: Hex },
    /// Apply an arbitrary rigid transform
    #[display(fmt = "Transform({})", inner)]
    Transform {
        inner: Box<Builder>,
        matrix: HexMatrix,
    },
}

impl Builder {
    /// Get a short name for the operation at the root of this tree, for
    /// logging
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::Union(_, _) => "union",
            Self::Intersection(_, _) => "intersection",
            Self::Subtract(_, _) => "subtract",
            Self::Rotate { .. } => "rotate",
            Self::Translate { .. } => "translate",
            Self::Transform { .. } => "transform",
        }
    }
}

impl From<Area> for Builder {
    fn from(area: Area) -> Self {
        Self::Leaf(Arc::new(area))
    }
}

impl From<Arc<Area>> for Builder {
    fn from(area: Arc<Area>) -> Self {
        Self::Leaf(area)
    }
}

/// The set of combinators shared by finished areas and unevaluated trees.
/// Every combinator returns a new [Builder] without evaluating anything; call
/// [Shape::build] (or [Evaluator::evaluate]) to get the resulting area.
pub trait Shape: Into<Builder> {
    /// Every hex in either operand
    fn union(self, other: impl Into<Builder>) -> Builder {
        Builder::Union(Box::new(self.into()), Box::new(other.into()))
    }

    /// Every hex in both operands
    fn intersection(self, other: impl Into<Builder>) -> Builder {
        Builder::Intersection(Box::new(self.into()), Box::new(other.into()))
    }

    /// Every hex in this operand that isn't in `other`
    fn subtract(self, other: impl Into<Builder>) -> Builder {
        Builder::Subtract(Box::new(self.into()), Box::new(other.into()))
    }

    /// Rotate by `turns` steps of 60° counterclockwise around `pivot`
    fn rotate(self, pivot: Hex, turns: i64) -> Builder {
        Builder::Rotate {
            inner: Box::new(self.into()),
            pivot,
            turns,
        }
    }

    fn translate(self, offset: Hex) -> Builder {
        Builder::Translate {
            inner: Box::new(self.into()),
            offset,
        }
    }

    fn transform(self, matrix: HexMatrix) -> Builder {
        Builder::Transform {
            inner: Box::new(self.into()),
            matrix,
        }
    }

    /// Evaluate with the default [Evaluator]. Leaves and transform results
    /// come back with their bounds materialized. A union carries bounds only
    /// when both of its operands did, and intersection or subtraction
    /// results compute theirs lazily on first use.
    fn build(self) -> Result<Arc<Area>> {
        Evaluator::default().evaluate(&self.into())
    }
}

impl Shape for Area {}
impl Shape for Arc<Area> {}
impl Shape for Builder {}

/// A flag that asks an in-flight evaluation to stop. Clones share the same
/// flag, so one clone can be handed to the evaluator and another kept by
/// whoever wants to cancel it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Cannot be undone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Walks a [Builder] tree and produces an [Area].
///
/// Both operands of a binary node are evaluated concurrently (through
/// [rayon::join]) down to [BuildConfig::max_parallel_depth]; past that,
/// subtrees run on whichever task reached them. The [CancelToken] is checked
/// before each operand is scanned and before each node emits its result.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: BuildConfig,
    cancel: CancelToken,
}

impl Evaluator {
    /// Create a new evaluator. Fails if the config is invalid.
    pub fn new(config: BuildConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid build config")?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Attach a cancellation token, replacing any previous one
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Evaluate a tree into an area. Returns [Error::Cancelled] if the token
    /// was cancelled at any point before the result was ready.
    pub fn evaluate(&self, builder: &Builder) -> Result<Arc<Area>> {
        timed!(
            format!("Evaluating {}", builder.operation()),
            self.evaluate_node(builder, 0)
        )
    }

    /// Classify two areas, scanning them concurrently if
    /// [BuildConfig::parallel_bounding] is enabled
    pub fn check_bounding(&self, a: &Area, b: &Area) -> Bounding {
        check_bounding(a, b, self.config.parallel_bounding)
    }

    fn evaluate_node(
        &self,
        builder: &Builder,
        depth: u32,
    ) -> Result<Arc<Area>> {
        trace!("Evaluating {} at depth {}", builder.operation(), depth);
        let area = match builder {
            Builder::Leaf(area) => {
                self.check_cancelled()?;
                area.materialize();
                Arc::clone(area)
            }
            Builder::Union(a, b) => {
                let (a, b) = self.evaluate_operands(a, b, depth)?;
                self.union(a, b)?
            }
            Builder::Intersection(a, b) => {
                let (a, b) = self.evaluate_operands(a, b, depth)?;
                self.intersection(a, b)?
            }
            Builder::Subtract(a, b) => {
                let (a, b) = self.evaluate_operands(a, b, depth)?;
                self.subtract(a, b)?
            }
            Builder::Rotate {
                inner,
                pivot,
                turns,
            } => {
                let inner = self.evaluate_node(inner, depth + 1)?;
                self.apply_matrix(
                    &inner,
                    &HexMatrix::rotation_about(*pivot, *turns),
                )?
            }
            Builder::Translate { inner, offset } => {
                let inner = self.evaluate_node(inner, depth + 1)?;
                self.apply_matrix(&inner, &HexMatrix::translation(*offset))?
            }
            Builder::Transform { inner, matrix } => {
                let inner = self.evaluate_node(inner, depth + 1)?;
                self.apply_matrix(&inner, matrix)?
            }
        };
        // Partial results are dropped if someone gave up on us
        self.check_cancelled()?;
        Ok(area)
    }

    /// Evaluate both operands of a binary node, forking if we're still
    /// shallow enough
    fn evaluate_operands(
        &self,
        a: &Builder,
        b: &Builder,
        depth: u32,
    ) -> Result<(Arc<Area>, Arc<Area>)> {
        let (a, b) = if self.config.parallel
            && depth < self.config.max_parallel_depth
        {
            rayon::join(
                || self.evaluate_node(a, depth + 1),
                || self.evaluate_node(b, depth + 1),
            )
        } else {
            (
                self.evaluate_node(a, depth + 1),
                self.evaluate_node(b, depth + 1),
            )
        };
        Ok((a?, b?))
    }

    fn union(&self, a: Arc<Area>, b: Arc<Area>) -> Result<Arc<Area>> {
        if a.is_empty() {
            return Ok(b);
        }
        if b.is_empty() {
            return Ok(a);
        }

        // Known bounds can be merged without looking at any hexes
        let bounds = a
            .cached_bounds()
            .zip(b.cached_bounds())
            .map(|(a, b)| a.union(b));

        // Start from a copy of the bigger set so fewer inserts are needed
        let (big, small) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
        self.check_cancelled()?;
        let mut hexes = big.hexes().clone();
        self.check_cancelled()?;
        hexes.extend(small.iter());

        debug!(
            "Union of {} and {} hexes produced {} hexes (bounds merged: {})",
            a.len(),
            b.len(),
            hexes.len(),
            bounds.is_some()
        );
        Ok(Arc::new(Area::with_bounds(hexes, bounds)))
    }

    fn intersection(&self, a: Arc<Area>, b: Arc<Area>) -> Result<Arc<Area>> {
        if disjoint_bounds(&a, &b) {
            debug!(
                "Intersection of {} and {} hexes skipped, bounds are disjoint",
                a.len(),
                b.len()
            );
            return Ok(Arc::new(Area::new()));
        }

        // Membership checks are cheap, so walk whichever set is smaller
        let (small, big) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
        self.check_cancelled()?;
        let hexes: HexSet =
            small.iter().filter(|hex| big.contains(*hex)).collect();

        debug!(
            "Intersection of {} and {} hexes produced {} hexes",
            a.len(),
            b.len(),
            hexes.len()
        );
        Ok(Arc::new(Area::from(hexes)))
    }

    fn subtract(&self, a: Arc<Area>, b: Arc<Area>) -> Result<Arc<Area>> {
        if b.is_empty() || disjoint_bounds(&a, &b) {
            debug!(
                "Subtraction of {} from {} hexes skipped, nothing to remove",
                b.len(),
                a.len()
            );
            return Ok(a);
        }

        self.check_cancelled()?;
        let hexes: HexSet = a.iter().filter(|hex| !b.contains(*hex)).collect();

        debug!(
            "Subtraction of {} hexes from {} hexes produced {} hexes",
            b.len(),
            a.len(),
            hexes.len()
        );
        Ok(Arc::new(Area::from(hexes)))
    }

    /// Move every hex through a matrix. The new bounds are tracked in the
    /// same pass.
    fn apply_matrix(
        &self,
        area: &Area,
        matrix: &HexMatrix,
    ) -> Result<Arc<Area>> {
        self.check_cancelled()?;
        let mut bounds: Option<Bounds> = None;
        let hexes: HexSet = area
            .iter()
            .map(|hex| {
                let hex = matrix.apply(hex);
                bounds = Some(match bounds {
                    None => Bounds::point(hex),
                    Some(bounds) => bounds.include(hex),
                });
                hex
            })
            .collect();
        Ok(Arc::new(Area::with_bounds(hexes, bounds)))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// True only if both areas already know their bounds and those bounds don't
/// touch. Never computes bounds.
fn disjoint_bounds(a: &Area, b: &Area) -> bool {
    match (a.cached_bounds(), b.cached_bounds()) {
        (Some(a), Some(b)) => !a.overlaps(&b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::shapes;

    fn area(hexes: &[(i64, i64)]) -> Area {
        hexes.iter().map(|&(q, r)| Hex::new(q, r)).collect()
    }

    fn sequential() -> Evaluator {
        Evaluator::new(BuildConfig {
            parallel: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_leaf() {
        let built = area(&[(1, 2), (3, 4)]).build().unwrap();
        assert_eq!(built.len(), 2);
        assert!(built.bounds_clean());
    }

    #[test]
    fn test_union() {
        let a = area(&[(0, 0), (1, 0)]);
        let b = area(&[(1, 0), (5, 5)]);
        let built = a.union(b).build().unwrap();
        assert_eq!(
            built.slice(),
            vec![Hex::new(0, 0), Hex::new(1, 0), Hex::new(5, 5)]
        );
        // Both leaves had clean bounds, so the union does too
        assert!(built.bounds_clean());
        assert_eq!(
            built.bounds(),
            Ok(Bounds {
                min_q: 0,
                max_q: 5,
                min_r: 0,
                max_r: 5
            })
        );

        // A subtraction result has no cached bounds to merge
        let hollow = shapes::big_hex(Hex::ORIGIN, 3).subtract(area(&[(0, 0)]));
        let built = hollow.union(area(&[(9, 9)])).build().unwrap();
        assert!(!built.bounds_clean());
        assert_eq!(
            built.bounds(),
            Ok(Bounds {
                min_q: -3,
                max_q: 9,
                min_r: -3,
                max_r: 9
            })
        );
    }

    #[test]
    fn test_intersection() {
        let a = area(&[(0, 0), (1, 0), (2, 0)]);
        let b = area(&[(1, 0), (2, 0), (3, 0)]);
        let built = a.intersection(b).build().unwrap();
        assert_eq!(built.slice(), vec![Hex::new(1, 0), Hex::new(2, 0)]);

        let far = area(&[(50, 50)]);
        let built = area(&[(0, 0)]).intersection(far).build().unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn test_subtract() {
        let a = area(&[(0, 0), (1, 0), (2, 0)]);
        let b = area(&[(1, 0), (7, 7)]);
        let built = a.clone().subtract(b).build().unwrap();
        assert_eq!(built.slice(), vec![Hex::new(0, 0), Hex::new(2, 0)]);

        let built = a.clone().subtract(Area::new()).build().unwrap();
        assert_eq!(*built, a);
        let built = Area::new().subtract(a).build().unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn test_transforms() {
        let a = area(&[(1, 0), (2, 0)]);
        let built = a.clone().translate(Hex::new(0, 3)).build().unwrap();
        assert_eq!(built.slice(), vec![Hex::new(1, 3), Hex::new(2, 3)]);
        assert!(built.bounds_clean());

        let built = a.clone().rotate(Hex::ORIGIN, 3).build().unwrap();
        assert_eq!(built.slice(), vec![Hex::new(-2, 0), Hex::new(-1, 0)]);

        let matrix = HexMatrix::rotation(1)
            .then(HexMatrix::translation(Hex::new(1, 1)));
        let built = a.transform(matrix).build().unwrap();
        assert_eq!(built.slice(), vec![Hex::new(2, 0), Hex::new(3, -1)]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tree = shapes::big_hex(Hex::ORIGIN, 8)
            .subtract(shapes::ring(Hex::ORIGIN, 3))
            .union(
                shapes::big_hex(Hex::new(10, -4), 3).rotate(Hex::new(2, 2), 2),
            )
            .intersection(shapes::big_hex(Hex::new(2, 0), 9));
        let parallel = Evaluator::default().evaluate(&tree).unwrap();
        let sequential = sequential().evaluate(&tree).unwrap();
        assert_eq!(parallel, sequential);
        // Evaluating again does the same work and gets the same result
        assert_eq!(Evaluator::default().evaluate(&tree).unwrap(), parallel);
    }

    #[test]
    fn test_cancel() {
        let cancel = CancelToken::new();
        let evaluator = Evaluator::default().with_cancel(cancel.clone());
        let tree = shapes::big_hex(Hex::ORIGIN, 4)
            .union(shapes::ring(Hex::ORIGIN, 6));
        assert!(evaluator.evaluate(&tree).is_ok());

        cancel.cancel();
        assert!(cancel.is_cancelled());
        assert_eq!(evaluator.evaluate(&tree), Err(Error::Cancelled));
        assert_eq!(
            sequential().with_cancel(cancel).evaluate(&tree),
            Err(Error::Cancelled)
        );
    }

    #[test]
    fn test_invalid_config() {
        let result = Evaluator::new(BuildConfig {
            max_parallel_depth: 100,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let tree = area(&[(0, 0)])
            .union(area(&[(1, 0), (2, 0)]))
            .translate(Hex::new(1, 1));
        assert_eq!(
            tree.to_string(),
            "Translate(Union(Leaf(1), Leaf(2)), {1, 1, -2})"
        );
        assert_eq!(tree.operation(), "translate");
    }
}
