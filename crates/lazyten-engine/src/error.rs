//! Error types for expression evaluation and contraction

use crate::expr::ExprKind;
use lazyten_core::{Dim, TensorError};
use lazyten_exec::BinaryOp;
use thiserror::Error;

/// Error type for [`evaluate`](crate::evaluate) and [`contract`](crate::contract)
#[derive(Error, Debug)]
pub enum EvalError {
    /// The node cannot be evaluated to concrete data
    #[error("cannot evaluate {variant} node: {reason}")]
    UnsupportedVariant { variant: ExprKind, reason: String },

    /// A finitary node with no terms
    #[error("finitary '{op}' node has no terms")]
    EmptyFinitary { op: BinaryOp },

    /// A contraction operand that does not evaluate to a terminal tensor
    #[error("contraction operand {index} ({variant}) cannot be materialized")]
    NotMaterializable { index: usize, variant: ExprKind },

    /// A kept dimension that no operand carries
    #[error("kept dimension '{dim}' does not appear in any operand")]
    DimensionMismatch { dim: Dim },

    /// The same dimension name with two different sizes
    #[error("dimension '{dim}' has size {left} and {right}")]
    SizeMismatch { dim: Dim, left: usize, right: usize },

    /// A contraction with no operands
    #[error("contraction has no operands")]
    EmptyContraction,

    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// Planner or backend failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result alias for evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;
