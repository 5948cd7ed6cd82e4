//! Semiring contraction of expression operands
//!
//! Operands are evaluated first, then aligned by dimension name and handed to
//! the contraction executor as a [`ContractionSpec`]. The output carries the
//! kept dims in the order they first appear across the operands.

use crate::config::EngineConfig;
use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;
use crate::expr::ExprRef;
use lazyten_core::{DenseND, Dim, NamedTensor};
use lazyten_exec::{Element, Semiring};
use lazyten_planner::ContractionSpec;
use std::collections::{BTreeMap, BTreeSet};

impl Evaluator {
    pub(crate) fn contract_operands<T: Element>(
        &self,
        operands: &[ExprRef<T>],
        keep_dims: &BTreeSet<Dim>,
        semiring: Semiring,
    ) -> EvalResult<NamedTensor<T>> {
        if operands.is_empty() {
            return Err(EvalError::EmptyContraction);
        }

        let mut values = Vec::with_capacity(operands.len());
        for (index, operand) in operands.iter().enumerate() {
            match self.eval_node(operand) {
                Ok(value) => values.push(value),
                Err(EvalError::UnsupportedVariant { variant, reason }) => {
                    tracing::debug!(index, %variant, %reason, "operand not materializable");
                    return Err(EvalError::NotMaterializable { index, variant });
                }
                // a nested contraction reports its own operand index
                Err(EvalError::NotMaterializable { variant, .. }) => {
                    tracing::debug!(index, %variant, "nested operand not materializable");
                    return Err(EvalError::NotMaterializable { index, variant });
                }
                Err(other) => return Err(other),
            }
        }

        let mut sizes: BTreeMap<&str, usize> = BTreeMap::new();
        let mut order: Vec<Dim> = Vec::new();
        for value in &values {
            for (dim, size) in value.dim_sizes() {
                match sizes.get(dim) {
                    Some(&seen) if seen != size => {
                        return Err(EvalError::SizeMismatch {
                            dim: dim.to_string(),
                            left: seen,
                            right: size,
                        });
                    }
                    Some(_) => {}
                    None => {
                        sizes.insert(dim, size);
                        order.push(dim.to_string());
                    }
                }
            }
        }

        if let Some(missing) = keep_dims.iter().find(|d| !sizes.contains_key(d.as_str())) {
            return Err(EvalError::DimensionMismatch {
                dim: missing.clone(),
            });
        }

        let output: Vec<Dim> = order
            .into_iter()
            .filter(|d| keep_dims.contains(d))
            .collect();
        let spec = ContractionSpec::new(
            values.iter().map(|v| v.dims().to_vec()).collect(),
            output.clone(),
        )?;
        tracing::debug!(
            spec = %spec,
            semiring = %semiring,
            backend = %self.config().backend,
            "contracting operands"
        );

        let inputs: Vec<&DenseND<T>> = values.iter().map(|v| v.data()).collect();
        let hints = self.config().exec_hints();
        let result = lazyten_exec::contraction(&spec)
            .inputs(&inputs)
            .semiring(semiring)
            .backend(&self.config().backend)
            .hints(&hints)
            .run()?;

        Ok(NamedTensor::new(output, result)?)
    }
}

/// Sum-product contraction of `operands` on the named backend
///
/// Every dim outside `keep_dims` is summed out. Each operand must evaluate
/// to a terminal tensor.
///
/// ```
/// use lazyten_core::NamedTensor;
/// use lazyten_engine::{contract, Expr};
///
/// let a = Expr::tensor(NamedTensor::from_vec(&["i", "j"], vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap());
/// let b = Expr::tensor(NamedTensor::from_vec(&["j", "k"], vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap());
/// let c = contract(&[a, b], ["i", "k"], "cpu").unwrap();
/// assert_eq!(c.dims(), &["i".to_string(), "k".to_string()]);
/// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn contract<T, I, S>(
    operands: &[ExprRef<T>],
    keep_dims: I,
    backend: &str,
) -> EvalResult<NamedTensor<T>>
where
    T: Element,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let config = EngineConfig::default().with_backend(backend);
    contract_with(operands, keep_dims, Semiring::SUM_PRODUCT, &config)
}

/// Contraction under any supported semiring and engine configuration
pub fn contract_with<T, I, S>(
    operands: &[ExprRef<T>],
    keep_dims: I,
    semiring: Semiring,
    config: &EngineConfig,
) -> EvalResult<NamedTensor<T>>
where
    T: Element,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keep: BTreeSet<Dim> = keep_dims
        .into_iter()
        .map(|d| d.as_ref().to_string())
        .collect();
    Evaluator::new(config.clone()).contract_operands(operands, &keep, semiring)
}
