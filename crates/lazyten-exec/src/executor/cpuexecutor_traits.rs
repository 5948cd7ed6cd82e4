//! # CpuExecutor - Trait Implementations
//!
//! - `Default`
//! - `ContractionBackend`

use super::functions::ContractionBackend;
use super::types::{CpuExecutor, Element};
use crate::ops::execute_dense_contraction;
use crate::semiring::Semiring;
use anyhow::{anyhow, bail, Result};
use lazyten_core::{DenseND, Dim};
use lazyten_planner::{ContractionSpec, Plan};
use std::borrow::Cow;

impl Default for CpuExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> ContractionBackend<T> for CpuExecutor {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn execute(
        &self,
        spec: &ContractionSpec,
        plan: &Plan,
        operands: &[&DenseND<T>],
        semiring: Semiring,
    ) -> Result<DenseND<T>> {
        if operands.len() != spec.num_inputs() {
            bail!(
                "Spec expects {} operands, got {}",
                spec.num_inputs(),
                operands.len()
            );
        }
        if self.validate_plans {
            plan.validate(spec.num_inputs())?;
        }

        let mut live: Vec<(Vec<Dim>, Cow<'_, DenseND<T>>)> = spec
            .inputs
            .iter()
            .cloned()
            .zip(operands.iter().map(|&t| Cow::Borrowed(t)))
            .collect();

        for (step_idx, node) in plan.nodes.iter().enumerate() {
            let (lhs, rhs) = (node.lhs, node.rhs);
            if lhs == rhs || lhs >= live.len() || rhs >= live.len() {
                bail!(
                    "Step {}: Invalid positions ({}, {}) for {} intermediates",
                    step_idx,
                    lhs,
                    rhs,
                    live.len()
                );
            }
            if live[lhs].0 != node.lhs_dims || live[rhs].0 != node.rhs_dims {
                bail!(
                    "Step {}: operands carry ({}) and ({}), plan expects ({}) and ({})",
                    step_idx,
                    live[lhs].0.join(","),
                    live[rhs].0.join(","),
                    node.lhs_dims.join(","),
                    node.rhs_dims.join(",")
                );
            }

            let result =
                execute_dense_contraction(&node.spec()?, &[&*live[lhs].1, &*live[rhs].1], semiring)?;
            tracing::trace!(step = step_idx, dims = ?node.output_dims, "contracted pair");

            live.remove(lhs.max(rhs));
            live.remove(lhs.min(rhs));
            live.push((node.output_dims.clone(), Cow::Owned(result)));
        }

        let (dims, last) = live
            .pop()
            .ok_or_else(|| anyhow!("Plan left no intermediate"))?;
        if !live.is_empty() {
            bail!("Expected 1 final tensor, got {}", live.len() + 1);
        }
        if dims == spec.output {
            return Ok(last.into_owned());
        }
        let finish = ContractionSpec::new(vec![dims], spec.output.clone())?;
        execute_dense_contraction(&finish, &[&*last], semiring)
    }
}
