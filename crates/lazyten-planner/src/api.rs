//! Public planner API
//!
//! Provides the main interface for contraction planning: the [`Plan`] produced
//! by a planner, the [`Planner`] trait and the [`PlanHints`] that steer it.

use crate::order::{greedy_planner, optimal_planner};
use crate::parser::ContractionSpec;
use anyhow::{bail, Result};
use lazyten_core::Dim;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planned tensor contraction
///
/// Steps operate on a list of live intermediates that starts as the spec's
/// inputs. A step removes the two positions it names (the larger position
/// first) and appends its result. After the last step exactly one
/// intermediate remains; reducing it to the spec's output dims finishes the
/// contraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    /// Sequence of pairwise contraction steps
    pub nodes: Vec<PlanNode>,
    /// Estimated total FLOPs of the pairwise steps
    pub estimated_flops: f64,
    /// Estimated peak intermediate size (bytes)
    pub estimated_memory: usize,
    /// Contraction order as positions into the live list
    pub order: Vec<(usize, usize)>,
}

impl Plan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            estimated_flops: 0.0,
            estimated_memory: 0,
            order: Vec::new(),
        }
    }

    /// Append a step, keeping `order` and the estimates in sync
    pub fn push(&mut self, node: PlanNode) {
        self.estimated_flops += node.cost;
        self.estimated_memory = self.estimated_memory.max(node.memory);
        self.order.push((node.lhs, node.rhs));
        self.nodes.push(node);
    }

    /// Get the contraction order
    pub fn order(&self) -> &[(usize, usize)] {
        &self.order
    }

    pub fn num_steps(&self) -> usize {
        self.nodes.len()
    }

    /// Validate the plan against the number of inputs it was made for
    ///
    /// Checks:
    /// - every step names two distinct live positions
    /// - exactly one intermediate remains at the end
    /// - cost and memory estimates are finite and non-negative
    pub fn validate(&self, num_inputs: usize) -> Result<()> {
        if self.order.len() != self.nodes.len() {
            bail!(
                "Plan order has {} entries for {} steps",
                self.order.len(),
                self.nodes.len()
            );
        }
        if num_inputs == 0 {
            bail!("Plan made for zero inputs");
        }

        let mut live = num_inputs;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.lhs == node.rhs {
                bail!("Step {}: Self-contraction of position {}", i + 1, node.lhs);
            }
            if node.lhs >= live || node.rhs >= live {
                bail!(
                    "Step {}: Invalid positions ({}, {}) for {} intermediates",
                    i + 1,
                    node.lhs,
                    node.rhs,
                    live
                );
            }
            if node.cost < 0.0 || !node.cost.is_finite() {
                bail!("Step {}: Invalid cost {}", i + 1, node.cost);
            }
            live -= 1;
        }

        if live != 1 {
            bail!("Plan leaves {} intermediates instead of 1", live);
        }
        if self.estimated_flops < 0.0 || !self.estimated_flops.is_finite() {
            bail!("Plan has invalid total FLOPs: {}", self.estimated_flops);
        }

        Ok(())
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

/// A single pairwise contraction step in the plan
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanNode {
    /// Position of the first operand in the live list
    pub lhs: usize,
    /// Position of the second operand in the live list
    pub rhs: usize,
    /// Dims of the first operand
    pub lhs_dims: Vec<Dim>,
    /// Dims of the second operand
    pub rhs_dims: Vec<Dim>,
    /// Dims of the step result, in axis order
    pub output_dims: Vec<Dim>,
    /// Estimated cost (FLOPs) for this contraction
    pub cost: f64,
    /// Intermediate result size (bytes)
    pub memory: usize,
}

impl PlanNode {
    /// This step as a two-input contraction spec
    pub fn spec(&self) -> Result<ContractionSpec> {
        ContractionSpec::new(
            vec![self.lhs_dims.clone(), self.rhs_dims.clone()],
            self.output_dims.clone(),
        )
    }
}

/// Hints for the planner
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanHints {
    /// Rank candidate steps by result size before FLOPs
    pub minimize_memory: bool,
    /// Reject plans whose largest intermediate exceeds this many bytes
    pub memory_budget: Option<usize>,
}

impl PlanHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set memory preference
    pub fn with_minimize_memory(mut self, minimize: bool) -> Self {
        self.minimize_memory = minimize;
        self
    }

    /// Set memory budget in bytes
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    pub(crate) fn check_budget(&self, plan: &Plan) -> Result<()> {
        match self.memory_budget {
            Some(budget) if plan.estimated_memory > budget => bail!(
                "Plan needs {} bytes for its largest intermediate, budget is {}",
                plan.estimated_memory,
                budget
            ),
            _ => Ok(()),
        }
    }
}

/// Main planner trait
///
/// Implementations must be pure: the same spec and shapes always produce the
/// same plan. They are shared across threads.
pub trait Planner: Send + Sync {
    /// Create a contraction plan
    ///
    /// # Arguments
    ///
    /// * `spec` - Operand and output dimension names
    /// * `shapes` - Shapes of input tensors, aligned with `spec.inputs`
    /// * `hints` - Planning hints and preferences
    fn make_plan(
        &self,
        spec: &ContractionSpec,
        shapes: &[Vec<usize>],
        hints: &PlanHints,
    ) -> Result<Plan>;
}

/// Selects a planning algorithm by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlannerKind {
    /// Cheapest pair first
    #[default]
    Greedy,
    /// Exhaustive search over contraction trees (small networks)
    Optimal,
}

impl Planner for PlannerKind {
    fn make_plan(
        &self,
        spec: &ContractionSpec,
        shapes: &[Vec<usize>],
        hints: &PlanHints,
    ) -> Result<Plan> {
        match self {
            PlannerKind::Greedy => greedy_planner(spec, shapes, hints),
            PlannerKind::Optimal => optimal_planner(spec, shapes, hints),
        }
    }
}

impl FromStr for PlannerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(PlannerKind::Greedy),
            "optimal" | "dp" => Ok(PlannerKind::Optimal),
            other => bail!("Unknown planner '{}' (expected 'greedy' or 'optimal')", other),
        }
    }
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerKind::Greedy => write!(f, "greedy"),
            PlannerKind::Optimal => write!(f, "optimal"),
        }
    }
}

// Display implementations for pretty-printing

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contraction Plan:")?;
        writeln!(f, "  Steps: {}", self.nodes.len())?;
        writeln!(f, "  Estimated FLOPs: {:.2e}", self.estimated_flops)?;
        writeln!(
            f,
            "  Peak Memory: {} bytes ({:.2} MB)",
            self.estimated_memory,
            self.estimated_memory as f64 / 1_048_576.0
        )?;

        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(f, "Step {}:", i + 1)?;
            writeln!(f, "  {}", node)?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Contract #{} ({}) with #{} ({}) -> ({})",
            self.lhs,
            self.lhs_dims.join(","),
            self.rhs,
            self.rhs_dims.join(","),
            self.output_dims.join(",")
        )?;
        writeln!(f, "    Cost: {:.2e} FLOPs", self.cost)?;
        write!(f, "    Memory: {} bytes", self.memory)
    }
}
