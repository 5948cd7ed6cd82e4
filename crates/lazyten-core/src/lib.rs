//! # lazyten-core
//!
//! Core tensor types for lazyten: dense storage and named-dimension tensors.
//!
//! - **Dense tensor representation** ([`DenseND`]) backed by scirs2-core's ndarray
//! - **Named terminal tensors** ([`NamedTensor`]): dense data whose axes carry
//!   unique names, the only fully-evaluated value in the expression engine
//! - **Axis metadata** ([`AxisMeta`])
//!
//! ## SciRS2 Integration
//!
//! This crate uses `scirs2-core` for array storage and numeric traits. Direct
//! use of `ndarray` or `num-traits` is avoided.
//!
//! ## Quick Start
//!
//! ```
//! use lazyten_core::{DenseND, NamedTensor};
//!
//! let data = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let t = NamedTensor::new(vec!["row".into(), "col".into()], data).unwrap();
//!
//! assert_eq!(t.size_of("col"), Some(3));
//! assert_eq!(t.value_at(&[("row", 1), ("col", 0)]).unwrap(), 4.0);
//! ```
//!
//! ## Error Handling
//!
//! Construction and lookups return [`TensorError`]:
//!
//! ```
//! use lazyten_core::{DenseND, NamedTensor, TensorError};
//!
//! let data = DenseND::<f64>::zeros(&[2, 2]);
//! let err = NamedTensor::new(vec!["i".into(), "i".into()], data).unwrap_err();
//! assert_eq!(err, TensorError::DuplicateDim("i".into()));
//! ```

#![deny(warnings)]

pub mod dense;
pub mod error;
pub mod types;


pub use error::TensorError;
pub use types::{Axis, AxisMeta, DenseND, Dim, NamedTensor, Rank, Shape};
