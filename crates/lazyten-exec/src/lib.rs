//! # lazyten-exec
//!
//! Operators and contraction execution for lazyten.
//!
//! This crate provides:
//! - the operator table ([`ElemOp`], [`BinaryOp`]) and [`Semiring`]s
//! - element-wise and reduction primitives aligned by dimension name
//!   ([`elem_op`], [`binary_op`], [`reduce`])
//! - the [`ContractionBackend`] trait with a pairwise CPU backend and a naive
//!   reference backend, selected by string id through [`backend_for`]
//! - [`contraction`], a builder that plans and executes in one call

#![deny(warnings)]

pub mod executor;
pub mod hints;
pub mod named;
pub mod ops;
pub mod semiring;


// Re-exports
pub use executor::*;
pub use hints::*;
pub use named::*;
pub use ops::execute_dense_contraction;
pub use semiring::Semiring;

use lazyten_core::DenseND;
use lazyten_planner::{ContractionSpec, Planner};

/// Plan and execute a contraction
///
/// # Example
///
/// ```
/// use lazyten_core::DenseND;
/// use lazyten_exec::{contraction, Semiring};
/// use lazyten_planner::ContractionSpec;
///
/// let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
/// let a = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let b = DenseND::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
///
/// let c = contraction(&spec)
///     .inputs(&[&a, &b])
///     .semiring(Semiring::SUM_PRODUCT)
///     .run()
///     .unwrap();
/// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn contraction<'a, T: Element>(spec: &'a ContractionSpec) -> ContractionBuilder<'a, T> {
    ContractionBuilder::new(spec)
}

/// Builder for contractions
pub struct ContractionBuilder<'a, T: Element> {
    spec: &'a ContractionSpec,
    inputs: Option<&'a [&'a DenseND<T>]>,
    semiring: Semiring,
    backend: &'a str,
    hints: ExecHints,
}

impl<'a, T: Element> ContractionBuilder<'a, T> {
    /// Create a new builder with the sum-product semiring on the default backend
    pub fn new(spec: &'a ContractionSpec) -> Self {
        Self {
            spec,
            inputs: None,
            semiring: Semiring::SUM_PRODUCT,
            backend: DEFAULT_BACKEND,
            hints: ExecHints::default(),
        }
    }

    /// Set input tensors, aligned with `spec.inputs`
    pub fn inputs(mut self, inputs: &'a [&'a DenseND<T>]) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn semiring(mut self, semiring: Semiring) -> Self {
        self.semiring = semiring;
        self
    }

    /// Select the backend by id (see [`available_backends`])
    pub fn backend(mut self, id: &'a str) -> Self {
        self.backend = id;
        self
    }

    /// Set execution hints
    pub fn hints(mut self, hints: &ExecHints) -> Self {
        self.hints = hints.clone();
        self
    }

    /// Execute the contraction
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No inputs were provided
    /// - Input count or shapes don't match the spec
    /// - The backend id is unknown
    /// - Planning or execution fails
    pub fn run(self) -> anyhow::Result<DenseND<T>> {
        let inputs = self
            .inputs
            .ok_or_else(|| anyhow::anyhow!("No inputs provided to contraction"))?;
        let shapes: Vec<Vec<usize>> = inputs.iter().map(|t| t.shape().to_vec()).collect();

        let backend = backend_for::<T>(self.backend)?;
        let plan = self
            .hints
            .planner
            .make_plan(self.spec, &shapes, &self.hints.plan)?;
        tracing::debug!(
            spec = %self.spec,
            planner = %self.hints.planner,
            backend = backend.name(),
            semiring = %self.semiring,
            flops = plan.estimated_flops,
            "executing contraction"
        );

        backend.execute(self.spec, &plan, inputs, self.semiring)
    }
}
