//! # OptimalPlanner - Trait Implementations
//!
//! - `Planner`

use crate::api::{Plan, PlanHints, Planner};
use crate::parser::ContractionSpec;
use anyhow::Result;

use super::functions::optimal_planner;
use super::types::OptimalPlanner;

impl Planner for OptimalPlanner {
    fn make_plan(
        &self,
        spec: &ContractionSpec,
        shapes: &[Vec<usize>],
        hints: &PlanHints,
    ) -> Result<Plan> {
        optimal_planner(spec, shapes, hints)
    }
}
