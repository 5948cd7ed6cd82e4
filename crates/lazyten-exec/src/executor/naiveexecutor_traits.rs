//! # NaiveExecutor - Trait Implementations
//!
//! - `ContractionBackend`

use super::functions::ContractionBackend;
use super::types::{Element, NaiveExecutor};
use crate::ops::execute_dense_contraction;
use crate::semiring::Semiring;
use anyhow::Result;
use lazyten_core::DenseND;
use lazyten_planner::{ContractionSpec, Plan};

impl<T: Element> ContractionBackend<T> for NaiveExecutor {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn execute(
        &self,
        spec: &ContractionSpec,
        _plan: &Plan,
        operands: &[&DenseND<T>],
        semiring: Semiring,
    ) -> Result<DenseND<T>> {
        execute_dense_contraction(spec, operands, semiring)
    }
}
