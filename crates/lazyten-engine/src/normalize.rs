//! Algebraic normalization
//!
//! Pattern helpers that expose the sum-of-products structure hidden in an
//! expression graph, and the rewrite that turns such a structure into a
//! single [`Expr::Contraction`]. Rewrites never change results beyond
//! floating point reassociation.

use crate::expr::{Expr, ExprRef};
use lazyten_core::Dim;
use lazyten_exec::{BinaryOp, Element, Semiring};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Match `Reduction(op, arg, dims)` and yield `(arg, dims)`
///
/// Yields nothing when `node` is not a reduction or reduces with another
/// operator. Operators match by tag only.
pub fn match_reduction<T>(
    op: BinaryOp,
    node: &Expr<T>,
) -> impl Iterator<Item = (&ExprRef<T>, &BTreeSet<Dim>)> {
    match node {
        Expr::Reduction {
            op: node_op,
            arg,
            reduce_dims,
        } if *node_op == op => Some((arg, reduce_dims)),
        _ => None,
    }
    .into_iter()
}

/// Unfold nested `Binary(op, ..)` nodes into their operands
///
/// Any node that is not a `Binary` with `op` is a leaf, including `node`
/// itself. Leaves come out left to right. Only an associative and
/// commutative `op` is unfolded; any other operator yields `node` whole.
///
/// ```
/// use lazyten_core::NamedTensor;
/// use lazyten_engine::{flatten_commutative, Expr};
/// use lazyten_exec::BinaryOp;
///
/// let leaf = |d: &str| Expr::tensor(NamedTensor::from_vec(&[d], vec![1.0, 2.0], &[2]).unwrap());
/// let chain = Expr::binary(
///     BinaryOp::Mul,
///     Expr::binary(BinaryOp::Mul, leaf("a"), leaf("b")),
///     Expr::binary(BinaryOp::Add, leaf("c"), leaf("d")),
/// );
/// assert_eq!(flatten_commutative(BinaryOp::Mul, &chain).len(), 3);
/// ```
pub fn flatten_commutative<T>(op: BinaryOp, node: &ExprRef<T>) -> Vec<ExprRef<T>> {
    if !(op.is_associative() && op.is_commutative()) {
        return vec![Arc::clone(node)];
    }
    let mut leaves = Vec::new();
    let mut work = vec![Arc::clone(node)];
    while let Some(next) = work.pop() {
        match &*next {
            Expr::Binary {
                op: node_op,
                lhs,
                rhs,
            } if *node_op == op => {
                work.push(Arc::clone(rhs));
                work.push(Arc::clone(lhs));
            }
            _ => leaves.push(next),
        }
    }
    leaves
}

/// Rewrite a reduced product into a contraction
///
/// For each supported semiring, `Reduction(sum, Binary(prod, ..), dims)`
/// becomes `Contraction(leaves, sum, prod, keep)` where `leaves` is the
/// flattened product and `keep` is every dim of the product not in `dims`.
/// Returns `None` when no semiring pattern applies.
pub fn rewrite_contraction<T: Element>(node: &Expr<T>) -> Option<ExprRef<T>> {
    for semiring in Semiring::ALL {
        for (arg, reduce_dims) in match_reduction(semiring.sum(), node) {
            if !matches!(&**arg, Expr::Binary { op, .. } if *op == semiring.prod()) {
                continue;
            }
            let keep_dims = arg
                .free_dims()
                .into_iter()
                .filter(|d| !reduce_dims.contains(d))
                .collect();
            return Some(Arc::new(Expr::Contraction {
                operands: flatten_commutative(semiring.prod(), arg),
                sum_op: semiring.sum(),
                prod_op: semiring.prod(),
                keep_dims,
            }));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyten_core::NamedTensor;

    fn leaf(dim: &str) -> ExprRef<f64> {
        Expr::tensor(NamedTensor::from_vec(&[dim], vec![1.0, 2.0], &[2]).unwrap())
    }

    #[test]
    fn test_match_reduction() {
        let red = Expr::reduce(BinaryOp::Add, leaf("a"), ["a"]);
        assert_eq!(match_reduction(BinaryOp::Add, &red).count(), 1);
        assert_eq!(match_reduction(BinaryOp::Maximum, &red).count(), 0);
        assert_eq!(match_reduction(BinaryOp::Add, &leaf("a")).count(), 0);

        let (arg, dims) = match_reduction(BinaryOp::Add, &red).next().unwrap();
        assert_eq!(arg.free_dims(), vec!["a"]);
        assert!(dims.contains("a"));
    }

    #[test]
    fn test_flatten_leaf_is_itself() {
        let a = leaf("a");
        let flat = flatten_commutative(BinaryOp::Mul, &a);
        assert_eq!(flat.len(), 1);
        assert!(Arc::ptr_eq(&flat[0], &a));
    }

    #[test]
    fn test_flatten_order_and_depth() {
        let (a, b, c, d) = (leaf("a"), leaf("b"), leaf("c"), leaf("d"));
        let left = Expr::binary(BinaryOp::Add, a.clone(), b.clone());
        let right = Expr::binary(BinaryOp::Add, c.clone(), d.clone());
        let tree = Expr::binary(BinaryOp::Add, left, right);
        let flat = flatten_commutative(BinaryOp::Add, &tree);
        let expected = [a, b, c, d];
        assert_eq!(flat.len(), 4);
        for (got, want) in flat.iter().zip(expected.iter()) {
            assert!(Arc::ptr_eq(got, want));
        }
    }

    #[test]
    fn test_flatten_keeps_non_commutative_chain_whole() {
        // (a - b) - c is not a - (b - c)
        let chain = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, leaf("a"), leaf("b")),
            leaf("c"),
        );
        let flat = flatten_commutative(BinaryOp::Sub, &chain);
        assert_eq!(flat.len(), 1);
        assert!(Arc::ptr_eq(&flat[0], &chain));

        let quotient = Expr::binary(BinaryOp::Div, leaf("a"), leaf("b"));
        assert_eq!(flatten_commutative(BinaryOp::Div, &quotient).len(), 1);
    }

    #[test]
    fn test_flatten_deep_chain_without_recursion() {
        let mut chain = leaf("x");
        for _ in 0..100_000 {
            chain = Expr::binary(BinaryOp::Mul, chain, leaf("x"));
        }
        assert_eq!(flatten_commutative(BinaryOp::Mul, &chain).len(), 100_001);
        // dropping a deep Arc chain recurses; leak it
        std::mem::forget(chain);
    }

    #[test]
    fn test_rewrite_sum_product() {
        let prod = Expr::binary(BinaryOp::Mul, leaf("a"), Expr::binary(BinaryOp::Mul, leaf("b"), leaf("a")));
        let red = Expr::reduce(BinaryOp::Add, prod, ["a"]);
        let rewritten = rewrite_contraction(&red).unwrap();
        match &*rewritten {
            Expr::Contraction {
                operands,
                sum_op,
                prod_op,
                keep_dims,
            } => {
                assert_eq!(operands.len(), 3);
                assert_eq!((*sum_op, *prod_op), (BinaryOp::Add, BinaryOp::Mul));
                assert_eq!(keep_dims.iter().collect::<Vec<_>>(), vec!["b"]);
            }
            other => panic!("expected a contraction, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_rewrite_log_sum_product() {
        let prod = Expr::binary(BinaryOp::Add, leaf("a"), leaf("b"));
        let red = Expr::reduce(BinaryOp::LogAddExp, prod, ["a", "b"]);
        let rewritten = rewrite_contraction(&red).unwrap();
        assert!(matches!(
            &*rewritten,
            Expr::Contraction { sum_op: BinaryOp::LogAddExp, prod_op: BinaryOp::Add, keep_dims, .. }
                if keep_dims.is_empty()
        ));
    }

    #[test]
    fn test_rewrite_no_pattern() {
        // sum over a sum is not a sum of products
        let inner = Expr::binary(BinaryOp::Add, leaf("a"), leaf("b"));
        assert!(rewrite_contraction(&Expr::reduce(BinaryOp::Add, inner, ["a"])).is_none());
        // the semiring must distribute
        let inner = Expr::binary(BinaryOp::Mul, leaf("a"), leaf("b"));
        assert!(rewrite_contraction(&Expr::reduce(BinaryOp::Minimum, inner, ["a"])).is_none());
        assert!(rewrite_contraction(&leaf("a")).is_none());
    }
}
