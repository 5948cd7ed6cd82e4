//! Execution hints and configuration

use lazyten_planner::{PlanHints, PlannerKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Execution hints for controlling contractions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecHints {
    /// Planning algorithm
    pub planner: PlannerKind,
    /// Hints forwarded to the planner
    pub plan: PlanHints,
}

impl ExecHints {
    /// Create new execution hints with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the planning algorithm
    pub fn with_planner(mut self, planner: PlannerKind) -> Self {
        self.planner = planner;
        self
    }

    /// Set memory preference
    pub fn with_minimize_memory(mut self, minimize: bool) -> Self {
        self.plan.minimize_memory = minimize;
        self
    }

    /// Set memory budget in bytes for the largest intermediate
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.plan.memory_budget = Some(bytes);
        self
    }
}
