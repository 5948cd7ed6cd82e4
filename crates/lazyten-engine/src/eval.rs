//! Recursive evaluator
//!
//! Walks an expression graph in post-order and produces a concrete
//! [`NamedTensor`]. Children are always evaluated before their parent and
//! nothing is cached: a shared sub-expression is evaluated once per use.

use crate::config::EngineConfig;
use crate::error::{EvalError, EvalResult};
use crate::expr::{Expr, ExprKind};
use crate::normalize::rewrite_contraction;
use lazyten_core::NamedTensor;
use lazyten_exec::{binary_op, elem_op, reduce, BinaryOp, Element, Semiring};

/// Evaluates expressions under one [`EngineConfig`]
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EngineConfig,
}

impl Evaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reduce `node` to a concrete tensor
    pub fn evaluate<T: Element>(&self, node: &Expr<T>) -> EvalResult<NamedTensor<T>> {
        let span = tracing::debug_span!("evaluate", root = %node.kind());
        let _guard = span.enter();
        self.eval_node(node)
    }

    pub(crate) fn eval_node<T: Element>(&self, node: &Expr<T>) -> EvalResult<NamedTensor<T>> {
        tracing::trace!(kind = %node.kind(), "dispatch");
        match node {
            Expr::Tensor(t) => Ok(t.clone()),
            Expr::Variable { name } => Err(EvalError::UnsupportedVariant {
                variant: ExprKind::Variable,
                reason: format!("free variable '{}' has no data", name),
            }),
            Expr::Unary { op, arg } => {
                let value = self.eval_node(arg)?;
                Ok(elem_op(*op, &value)?)
            }
            Expr::Binary { op, lhs, rhs } => {
                let left = self.eval_node(lhs)?;
                let right = self.eval_node(rhs)?;
                combine(*op, &left, &right)
            }
            Expr::Finitary { op, terms } => {
                let (first, rest) = terms
                    .split_first()
                    .ok_or(EvalError::EmptyFinitary { op: *op })?;
                let mut acc = self.eval_node(first)?;
                for term in rest {
                    let value = self.eval_node(term)?;
                    acc = combine(*op, &acc, &value)?;
                }
                Ok(acc)
            }
            Expr::Reduction {
                op,
                arg,
                reduce_dims,
            } => {
                if self.config.rewrite {
                    if let Some(rewritten) = rewrite_contraction(node) {
                        tracing::debug!(op = %op, "reduction rewritten into contraction");
                        // keep the error kind of direct evaluation
                        return self.eval_node(&rewritten).map_err(|err| match err {
                            EvalError::NotMaterializable { index, variant } => {
                                EvalError::UnsupportedVariant {
                                    variant,
                                    reason: format!("factor {} of the reduced product", index),
                                }
                            }
                            other => other,
                        });
                    }
                }
                let value = self.eval_node(arg)?;
                if op.identity::<T>().is_none() {
                    return Err(EvalError::UnsupportedVariant {
                        variant: ExprKind::Reduction,
                        reason: format!("operator '{}' has no identity", op),
                    });
                }
                Ok(reduce(*op, &value, reduce_dims)?)
            }
            Expr::Contraction {
                operands,
                sum_op,
                prod_op,
                keep_dims,
            } => {
                let semiring = Semiring::new(*sum_op, *prod_op).ok_or_else(|| {
                    EvalError::UnsupportedVariant {
                        variant: ExprKind::Contraction,
                        reason: format!("({}, {}) is not a supported semiring", sum_op, prod_op),
                    }
                })?;
                self.contract_operands(operands, keep_dims, semiring)
            }
        }
    }
}

/// Element-wise combination with the size check done up front
fn combine<T: Element>(
    op: BinaryOp,
    left: &NamedTensor<T>,
    right: &NamedTensor<T>,
) -> EvalResult<NamedTensor<T>> {
    for (dim, size) in right.dim_sizes() {
        if let Some(other) = left.size_of(dim) {
            if other != size {
                return Err(EvalError::SizeMismatch {
                    dim: dim.to_string(),
                    left: other,
                    right: size,
                });
            }
        }
    }
    Ok(binary_op(op, left, right)?)
}

/// Evaluate `node` with the default [`EngineConfig`]
///
/// ```
/// use lazyten_core::NamedTensor;
/// use lazyten_engine::{evaluate, Expr};
/// use lazyten_exec::BinaryOp;
///
/// let x = Expr::tensor(NamedTensor::from_vec(&["i"], vec![1.0, 2.0], &[2]).unwrap());
/// let y = Expr::tensor(NamedTensor::from_vec(&["j"], vec![10.0, 20.0], &[2]).unwrap());
/// let outer = evaluate(&Expr::binary(BinaryOp::Mul, x, y)).unwrap();
/// assert_eq!(outer.to_vec(), vec![10.0, 20.0, 20.0, 40.0]);
/// ```
pub fn evaluate<T: Element>(node: &Expr<T>) -> EvalResult<NamedTensor<T>> {
    Evaluator::default().evaluate(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprRef;

    fn leaf(dims: &[&str], values: Vec<f64>, shape: &[usize]) -> ExprRef<f64> {
        Expr::tensor(NamedTensor::from_vec(dims, values, shape).unwrap())
    }

    #[test]
    fn test_terminal_is_returned_as_is() {
        let t = NamedTensor::from_vec(&["a"], vec![1.0, 2.0], &[2]).unwrap();
        assert_eq!(evaluate(&Expr::Tensor(t.clone())).unwrap(), t);
    }

    #[test]
    fn test_reduction_on_two_by_three() {
        let x = leaf(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let over_b = evaluate(&Expr::reduce(BinaryOp::Add, x.clone(), ["b"])).unwrap();
        assert_eq!(over_b.dims(), &["a".to_string()]);
        assert_eq!(over_b.to_vec(), vec![6.0, 15.0]);

        let over_a = evaluate(&Expr::reduce(BinaryOp::Maximum, x.clone(), ["a"])).unwrap();
        assert_eq!(over_a.to_vec(), vec![4.0, 5.0, 6.0]);

        let all = evaluate(&Expr::reduce(BinaryOp::Mul, x, ["a", "b"])).unwrap();
        assert_eq!(all.rank(), 0);
        assert_eq!(all.to_vec(), vec![720.0]);
    }

    #[test]
    fn test_reduction_ignores_absent_dims() {
        let x = leaf(&["a"], vec![1.0, 2.0], &[2]);
        let r = evaluate(&Expr::reduce(BinaryOp::Add, x.clone(), ["zzz"])).unwrap();
        assert_eq!(r, evaluate(&x).unwrap());
    }

    #[test]
    fn test_reduction_without_identity() {
        let x = leaf(&["a"], vec![1.0, 2.0], &[2]);
        let err = evaluate(&Expr::reduce(BinaryOp::Sub, x, ["a"])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::UnsupportedVariant {
                variant: ExprKind::Reduction,
                ..
            }
        ));
    }

    #[test]
    fn test_binary_size_mismatch() {
        let x = leaf(&["a"], vec![1.0, 2.0], &[2]);
        let y = leaf(&["a"], vec![1.0, 2.0, 3.0], &[3]);
        let err = evaluate(&Expr::binary(BinaryOp::Add, x, y)).unwrap_err();
        assert!(matches!(
            err,
            EvalError::SizeMismatch { ref dim, left: 2, right: 3 } if dim == "a"
        ));
    }

    #[test]
    fn test_unary_keeps_dims() {
        let x = leaf(&["a", "b"], vec![0.0, 1.0, 2.0, 3.0], &[2, 2]);
        let y = evaluate(&Expr::unary(lazyten_exec::ElemOp::Sqr, x)).unwrap();
        assert_eq!(y.dims(), &["a".to_string(), "b".to_string()]);
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_finitary() {
        let terms = vec![
            leaf(&["a"], vec![1.0, 2.0], &[2]),
            leaf(&["a"], vec![10.0, 20.0], &[2]),
            leaf(&[], vec![100.0], &[]),
        ];
        let total = evaluate(&Expr::finitary(BinaryOp::Add, terms)).unwrap();
        assert_eq!(total.to_vec(), vec![111.0, 122.0]);

        let err = evaluate(&Expr::<f64>::finitary(BinaryOp::Mul, vec![])).unwrap_err();
        assert!(matches!(err, EvalError::EmptyFinitary { op: BinaryOp::Mul }));
    }

    #[test]
    fn test_variable_is_unsupported() {
        let err = evaluate(&Expr::<f64>::variable("x")).unwrap_err();
        assert!(matches!(
            err,
            EvalError::UnsupportedVariant {
                variant: ExprKind::Variable,
                ..
            }
        ));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_contraction_with_unsupported_semiring() {
        let x = leaf(&["a"], vec![1.0, 2.0], &[2]);
        let node = Expr::contract(vec![x], BinaryOp::Mul, BinaryOp::Add, Vec::<String>::new());
        let err = evaluate(&node).unwrap_err();
        assert!(matches!(
            err,
            EvalError::UnsupportedVariant {
                variant: ExprKind::Contraction,
                ..
            }
        ));
    }

    #[test]
    fn test_errors_propagate_from_children() {
        let bad = Expr::binary(
            BinaryOp::Add,
            leaf(&["a"], vec![1.0], &[1]),
            Expr::<f64>::variable("v"),
        );
        let nested = Expr::unary(lazyten_exec::ElemOp::Exp, bad);
        assert!(evaluate(&nested).is_err());
    }

    #[test]
    fn test_rewrite_keeps_error_kind() {
        let product = Expr::binary(
            BinaryOp::Mul,
            leaf(&["a"], vec![1.0, 2.0], &[2]),
            Expr::<f64>::variable("w"),
        );
        let node = Expr::reduce(BinaryOp::Add, product, ["a"]);
        for rewrite in [false, true] {
            let evaluator = Evaluator::new(EngineConfig::default().with_rewrite(rewrite));
            let err = evaluator.evaluate(&node).unwrap_err();
            assert!(
                matches!(
                    err,
                    EvalError::UnsupportedVariant {
                        variant: ExprKind::Variable,
                        ..
                    }
                ),
                "rewrite={}: {}",
                rewrite,
                err
            );
        }
    }
}
