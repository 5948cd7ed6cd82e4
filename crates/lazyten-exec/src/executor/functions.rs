//! Backend trait and lookup by id

use super::types::{CpuExecutor, Element, NaiveExecutor};
use crate::semiring::Semiring;
use anyhow::{bail, Result};
use lazyten_core::DenseND;
use lazyten_planner::{ContractionSpec, Plan};

/// Id of the backend used when none is configured
pub const DEFAULT_BACKEND: &str = "cpu";

/// Main executor trait for contractions
///
/// Backends are stateless with respect to a call and may be shared across
/// threads.
pub trait ContractionBackend<T: Element>: Send + Sync {
    /// Stable id this backend is selected by
    fn name(&self) -> &'static str;

    /// Contract `operands` according to `spec` and `plan`
    ///
    /// `operands` align with `spec.inputs`; `plan` was made for `spec` and the
    /// operand shapes. The result carries `spec.output` dims in order.
    fn execute(
        &self,
        spec: &ContractionSpec,
        plan: &Plan,
        operands: &[&DenseND<T>],
        semiring: Semiring,
    ) -> Result<DenseND<T>>;
}

/// Ids accepted by [`backend_for`]
pub fn available_backends() -> &'static [&'static str] {
    &["cpu", "naive"]
}

/// Resolve a backend id
///
/// ```
/// use lazyten_exec::{backend_for, ContractionBackend, DEFAULT_BACKEND};
///
/// let backend = backend_for::<f64>(DEFAULT_BACKEND).unwrap();
/// assert_eq!(backend.name(), "cpu");
/// assert!(backend_for::<f64>("torch").is_err());
/// ```
pub fn backend_for<T: Element>(id: &str) -> Result<Box<dyn ContractionBackend<T>>> {
    match id {
        "cpu" => Ok(Box::new(CpuExecutor::new())),
        "naive" => Ok(Box::new(NaiveExecutor::new())),
        other => bail!(
            "Unknown backend '{}' (available: {})",
            other,
            available_backends().join(", ")
        ),
    }
}
