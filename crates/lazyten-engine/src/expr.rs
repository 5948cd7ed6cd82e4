//! Deferred expression graph
//!
//! An [`Expr`] describes a computation over named tensors without running it.
//! Nodes are immutable and shared through [`ExprRef`], so one sub-expression
//! can feed several parents. Every operator is a tag from the operator table;
//! the set of node shapes is closed.

use lazyten_core::{Dim, NamedTensor};
use lazyten_exec::{broadcast_dims, BinaryOp, ElemOp, Element};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Shared, immutable handle to an expression node
pub type ExprRef<T> = Arc<Expr<T>>;

/// One node of a deferred computation
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<T> {
    /// Concrete data with named dims
    Tensor(NamedTensor<T>),
    /// A free dimension variable with no data behind it
    Variable { name: Dim },
    /// Element-wise unary operator
    Unary { op: ElemOp, arg: ExprRef<T> },
    /// Element-wise binary operator, aligned by dim name
    Binary {
        op: BinaryOp,
        lhs: ExprRef<T>,
        rhs: ExprRef<T>,
    },
    /// Left fold of a binary operator over any number of terms
    Finitary { op: BinaryOp, terms: Vec<ExprRef<T>> },
    /// Fold of `op` over the listed dims of `arg`
    Reduction {
        op: BinaryOp,
        arg: ExprRef<T>,
        reduce_dims: BTreeSet<Dim>,
    },
    /// Multiply aligned operands with `prod_op`, fold every dim outside
    /// `keep_dims` with `sum_op`
    Contraction {
        operands: Vec<ExprRef<T>>,
        sum_op: BinaryOp,
        prod_op: BinaryOp,
        keep_dims: BTreeSet<Dim>,
    },
}

/// Tag identifying the shape of an [`Expr`] node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Tensor,
    Variable,
    Unary,
    Binary,
    Finitary,
    Reduction,
    Contraction,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprKind::Tensor => "tensor",
            ExprKind::Variable => "variable",
            ExprKind::Unary => "unary",
            ExprKind::Binary => "binary",
            ExprKind::Finitary => "finitary",
            ExprKind::Reduction => "reduction",
            ExprKind::Contraction => "contraction",
        };
        f.write_str(name)
    }
}

fn dim_set<I, S>(dims: I) -> BTreeSet<Dim>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dims.into_iter().map(|d| d.as_ref().to_string()).collect()
}

impl<T> Expr<T> {
    pub fn tensor(t: NamedTensor<T>) -> ExprRef<T> {
        Arc::new(Expr::Tensor(t))
    }

    pub fn variable(name: impl Into<Dim>) -> ExprRef<T> {
        Arc::new(Expr::Variable { name: name.into() })
    }

    pub fn unary(op: ElemOp, arg: ExprRef<T>) -> ExprRef<T> {
        Arc::new(Expr::Unary { op, arg })
    }

    pub fn binary(op: BinaryOp, lhs: ExprRef<T>, rhs: ExprRef<T>) -> ExprRef<T> {
        Arc::new(Expr::Binary { op, lhs, rhs })
    }

    pub fn finitary(op: BinaryOp, terms: Vec<ExprRef<T>>) -> ExprRef<T> {
        Arc::new(Expr::Finitary { op, terms })
    }

    /// Reduce `arg` over `dims` with `op`
    ///
    /// ```
    /// use lazyten_core::NamedTensor;
    /// use lazyten_engine::{evaluate, Expr};
    /// use lazyten_exec::BinaryOp;
    ///
    /// let x = NamedTensor::from_vec(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let total = Expr::reduce(BinaryOp::Add, Expr::tensor(x), ["b"]);
    /// assert_eq!(evaluate(&total).unwrap().to_vec(), vec![6.0, 15.0]);
    /// ```
    pub fn reduce<I, S>(op: BinaryOp, arg: ExprRef<T>, dims: I) -> ExprRef<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Arc::new(Expr::Reduction {
            op,
            arg,
            reduce_dims: dim_set(dims),
        })
    }

    pub fn contract<I, S>(
        operands: Vec<ExprRef<T>>,
        sum_op: BinaryOp,
        prod_op: BinaryOp,
        keep_dims: I,
    ) -> ExprRef<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Arc::new(Expr::Contraction {
            operands,
            sum_op,
            prod_op,
            keep_dims: dim_set(keep_dims),
        })
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Tensor(_) => ExprKind::Tensor,
            Expr::Variable { .. } => ExprKind::Variable,
            Expr::Unary { .. } => ExprKind::Unary,
            Expr::Binary { .. } => ExprKind::Binary,
            Expr::Finitary { .. } => ExprKind::Finitary,
            Expr::Reduction { .. } => ExprKind::Reduction,
            Expr::Contraction { .. } => ExprKind::Contraction,
        }
    }

    /// Immediate children, in evaluation order
    pub fn children(&self) -> Vec<&ExprRef<T>> {
        match self {
            Expr::Tensor(_) | Expr::Variable { .. } => Vec::new(),
            Expr::Unary { arg, .. } | Expr::Reduction { arg, .. } => vec![arg],
            Expr::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Expr::Finitary { terms, .. } => terms.iter().collect(),
            Expr::Contraction { operands, .. } => operands.iter().collect(),
        }
    }
}

impl<T: Element> Expr<T> {
    /// Dims the node carries once evaluated, in result axis order
    ///
    /// A variable carries its own name as a dim.
    pub fn free_dims(&self) -> Vec<Dim> {
        match self {
            Expr::Tensor(t) => t.dims().to_vec(),
            Expr::Variable { name } => vec![name.clone()],
            Expr::Unary { arg, .. } => arg.free_dims(),
            Expr::Binary { lhs, rhs, .. } => broadcast_dims(&lhs.free_dims(), &rhs.free_dims()),
            Expr::Finitary { terms, .. } => terms
                .iter()
                .fold(Vec::new(), |acc, t| broadcast_dims(&acc, &t.free_dims())),
            Expr::Reduction {
                arg, reduce_dims, ..
            } => arg
                .free_dims()
                .into_iter()
                .filter(|d| !reduce_dims.contains(d))
                .collect(),
            Expr::Contraction {
                operands,
                keep_dims,
                ..
            } => operands
                .iter()
                .fold(Vec::new(), |acc, o| broadcast_dims(&acc, &o.free_dims()))
                .into_iter()
                .filter(|d| keep_dims.contains(d))
                .collect(),
        }
    }
}

impl<T> From<NamedTensor<T>> for Expr<T> {
    fn from(t: NamedTensor<T>) -> Self {
        Expr::Tensor(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(dims: &[&str], shape: &[usize]) -> ExprRef<f64> {
        let n = shape.iter().product();
        Expr::tensor(NamedTensor::from_vec(dims, vec![1.0; n], shape).unwrap())
    }

    #[test]
    fn test_kind_and_children() {
        let a = leaf(&["i"], &[2]);
        let b = leaf(&["j"], &[3]);
        let sum = Expr::binary(BinaryOp::Add, a.clone(), b.clone());
        assert_eq!(sum.kind(), ExprKind::Binary);
        assert_eq!(sum.children().len(), 2);
        assert!(Arc::ptr_eq(sum.children()[0], &a));
        assert!(a.children().is_empty());
        assert_eq!(Expr::<f64>::variable("x").kind(), ExprKind::Variable);
    }

    #[test]
    fn test_free_dims() {
        let a = leaf(&["i", "j"], &[2, 3]);
        let b = leaf(&["k", "j"], &[4, 3]);
        let prod = Expr::binary(BinaryOp::Mul, a.clone(), b.clone());
        assert_eq!(prod.free_dims(), vec!["i", "j", "k"]);

        let red = Expr::reduce(BinaryOp::Add, prod, ["j", "absent"]);
        assert_eq!(red.free_dims(), vec!["i", "k"]);

        let con = Expr::contract(vec![b, a], BinaryOp::Add, BinaryOp::Mul, ["i", "k"]);
        assert_eq!(con.free_dims(), vec!["k", "i"]);

        let fin = Expr::finitary(BinaryOp::Add, vec![leaf(&["j"], &[3]), leaf(&["i"], &[2])]);
        assert_eq!(fin.free_dims(), vec!["j", "i"]);

        let var = Expr::<f64>::variable("t");
        assert_eq!(Expr::unary(ElemOp::Exp, var).free_dims(), vec!["t"]);
    }

    #[test]
    fn test_shared_subexpression() {
        let a = leaf(&["i"], &[2]);
        let twice = Expr::binary(BinaryOp::Add, a.clone(), a.clone());
        assert_eq!(Arc::strong_count(&a), 3);
        assert_eq!(twice.free_dims(), vec!["i"]);
    }

    #[test]
    fn test_from_named_tensor() {
        let t = NamedTensor::scalar(2.0_f64);
        let e: Expr<f64> = t.clone().into();
        assert_eq!(e, Expr::Tensor(t));
        assert_eq!(ExprKind::Contraction.to_string(), "contraction");
    }
}
