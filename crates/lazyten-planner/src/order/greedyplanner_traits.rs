//! # GreedyPlanner - Trait Implementations
//!
//! - `Planner`

use crate::api::{Plan, PlanHints, Planner};
use crate::parser::ContractionSpec;
use anyhow::Result;

use super::functions::greedy_planner;
use super::types::GreedyPlanner;

impl Planner for GreedyPlanner {
    fn make_plan(
        &self,
        spec: &ContractionSpec,
        shapes: &[Vec<usize>],
        hints: &PlanHints,
    ) -> Result<Plan> {
        greedy_planner(spec, shapes, hints)
    }
}
