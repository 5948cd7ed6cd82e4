//! Planner types

// Import for doc links
#[allow(unused_imports)]
use crate::api::Planner;
use lazyten_core::Dim;

/// An intermediate tensor in the contraction sequence
#[derive(Debug, Clone)]
pub(super) struct IntermediateTensor {
    /// Dims of this tensor, in axis order
    pub(super) dims: Vec<Dim>,
}

impl IntermediateTensor {
    pub(super) fn new(dims: Vec<Dim>) -> Self {
        Self { dims }
    }
}

/// Greedy contraction order planner (struct-based)
///
/// Implements the [`Planner`] trait using a greedy heuristic.
///
/// # Example
///
/// ```
/// use lazyten_planner::{ContractionSpec, GreedyPlanner, Planner, PlanHints};
///
/// let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
/// let plan = GreedyPlanner::new()
///     .make_plan(&spec, &[vec![10, 20], vec![20, 30]], &PlanHints::default())
///     .unwrap();
///
/// assert_eq!(plan.nodes.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyPlanner;

impl GreedyPlanner {
    /// Create a new greedy planner
    pub fn new() -> Self {
        Self
    }
}

/// Exhaustive planner (struct-based)
///
/// Finds the contraction tree with minimum total FLOPs. Falls back to greedy
/// above [`MAX_OPTIMAL_INPUTS`](super::MAX_OPTIMAL_INPUTS) inputs.
///
/// ```
/// use lazyten_planner::{ContractionSpec, OptimalPlanner, Planner, PlanHints};
///
/// let spec = ContractionSpec::parse("ij,jk,kl->il").unwrap();
/// let plan = OptimalPlanner::new()
///     .make_plan(&spec, &[vec![10, 20], vec![20, 30], vec![30, 10]], &PlanHints::default())
///     .unwrap();
///
/// assert_eq!(plan.nodes.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptimalPlanner;

impl OptimalPlanner {
    pub fn new() -> Self {
        Self
    }
}
