//! Engine configuration

use lazyten_exec::{ExecHints, DEFAULT_BACKEND};
use lazyten_planner::PlannerKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings shared by every evaluation an [`Evaluator`](crate::Evaluator) runs
///
/// ```
/// use lazyten_engine::EngineConfig;
/// use lazyten_planner::PlannerKind;
///
/// let config = EngineConfig::default()
///     .with_backend("naive")
///     .with_planner(PlannerKind::Optimal)
///     .with_rewrite(true);
/// assert_eq!(config.backend, "naive");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Contraction backend id
    pub backend: String,
    /// Contraction order planner
    pub planner: PlannerKind,
    /// Rewrite reduced products into contractions before evaluating them
    pub rewrite: bool,
    /// Reject contraction plans whose largest intermediate exceeds this many bytes
    pub memory_budget: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            planner: PlannerKind::default(),
            rewrite: false,
            memory_budget: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_planner(mut self, planner: PlannerKind) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_rewrite(mut self, rewrite: bool) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Hints handed to the contraction executor
    pub fn exec_hints(&self) -> ExecHints {
        let hints = ExecHints::new().with_planner(self.planner);
        match self.memory_budget {
            Some(bytes) => hints.with_memory_budget(bytes),
            None => hints,
        }
    }
}
