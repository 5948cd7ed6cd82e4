//! Error types for tensor construction and named-dimension lookups

use crate::types::Dim;
use thiserror::Error;

/// Error type for `DenseND` and `NamedTensor` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    /// Number of dimension names differs from the rank of the data
    #[error("{dims} dimension names given for data of rank {rank}")]
    RankMismatch { dims: usize, rank: usize },

    /// A dimension name is used for two axes of the same tensor
    #[error("dimension '{0}' appears more than once")]
    DuplicateDim(Dim),

    /// A dimension name was requested that the tensor does not carry
    #[error("dimension '{dim}' not found among {available:?}")]
    UnknownDim { dim: Dim, available: Vec<Dim> },

    /// Index outside the extent of a dimension
    #[error("index {index} out of bounds for dimension '{dim}' of size {size}")]
    OutOfBounds { dim: Dim, index: usize, size: usize },

    /// Shape/data incompatibility
    #[error("invalid shape: {0}")]
    Shape(String),
}
