//! # lazyten - lazy named-tensor expressions
//!
//! Build a graph of element-wise operators, reductions and semiring
//! contractions over tensors whose axes are named, then evaluate it. Axes line
//! up by name, never by position, and contractions are planned into a cheap
//! pairwise order before they run.
//!
//! This is the **meta crate** that re-exports all lazyten components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use lazyten::prelude::*;
//!
//! let a = NamedTensor::from_vec(&["i", "j"], vec![1.0, 2.0, 3.0, 4.0], &[2, 2])?;
//! let b = NamedTensor::from_vec(&["j", "k"], vec![5.0, 6.0, 7.0, 8.0], &[2, 2])?;
//!
//! let c = contract(&[Expr::tensor(a), Expr::tensor(b)], ["i", "k"], "cpu")?;
//! assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Named Tensors ([`core`])
//!
//! Dense storage and terminal tensors with unique dimension names.
//!
//! ```
//! use lazyten::core::NamedTensor;
//!
//! let t = NamedTensor::from_vec(&["row", "col"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let swapped = t.permute_to(&["col", "row"]).unwrap();
//! assert_eq!(swapped.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//! ```
//!
//! ### Contraction Planning ([`planner`])
//!
//! Greedy and exhaustive pairwise contraction orders with FLOP and memory
//! estimates.
//!
//! ```
//! use lazyten::planner::{greedy_planner, ContractionSpec, PlanHints};
//!
//! let spec = ContractionSpec::parse("ij,jk,kl->il").unwrap();
//! let shapes = vec![vec![10, 200], vec![200, 300], vec![300, 5]];
//! let plan = greedy_planner(&spec, &shapes, &PlanHints::default()).unwrap();
//! assert_eq!(plan.num_steps(), 2);
//! ```
//!
//! ### Operators and Execution ([`exec`])
//!
//! The operator table, semirings, and the CPU and naive contraction
//! backends.
//!
//! ```
//! use lazyten::exec::{Semiring, BinaryOp};
//!
//! assert_eq!(Semiring::new(BinaryOp::Maximum, BinaryOp::Add), Some(Semiring::MAX_PLUS));
//! assert_eq!(Semiring::new(BinaryOp::Sub, BinaryOp::Mul), None);
//! ```
//!
//! ### Expressions ([`engine`])
//!
//! The deferred expression graph, normalizer and evaluator.
//!
//! ```
//! use lazyten::prelude::*;
//!
//! let x = Expr::tensor(NamedTensor::from_vec(&["t", "s"], vec![0.0, -1.0, -2.0, 0.5], &[2, 2]).unwrap());
//! let lse = Expr::reduce(BinaryOp::LogAddExp, x, ["s"]);
//! let out = evaluate(&lse).unwrap();
//! assert_eq!(out.dims(), &["t".to_string()]);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for specs, plans, hints and configuration

#![deny(warnings)]

// Re-export all components
pub use lazyten_core as core;
pub use lazyten_engine as engine;
pub use lazyten_exec as exec;
pub use lazyten_planner as planner;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use lazyten::prelude::*;
    //!
    //! let x = Expr::tensor(NamedTensor::scalar(2.0_f64));
    //! let y = evaluate(&Expr::unary(ElemOp::Sqr, x)).unwrap();
    //! assert_eq!(y.to_vec(), vec![4.0]);
    //! ```

    // Core types
    pub use crate::core::{DenseND, Dim, NamedTensor, TensorError};

    // Expressions
    pub use crate::engine::{
        contract, contract_with, evaluate, EngineConfig, EvalError, Evaluator, Expr, ExprRef,
    };

    // Operators
    pub use crate::exec::{BinaryOp, ElemOp, Semiring};

    // Planner
    pub use crate::planner::{ContractionSpec, PlanHints, PlannerKind};
}
