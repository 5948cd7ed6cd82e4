//! # lazyten-engine
//!
//! Deferred named-tensor expressions and their evaluation.
//!
//! An [`Expr`] graph describes element-wise operators, reductions and
//! semiring contractions over [`NamedTensor`](lazyten_core::NamedTensor)s
//! whose axes are aligned by name. Nothing runs until [`evaluate`] (or an
//! [`Evaluator`] with a custom [`EngineConfig`]) walks the graph.
//!
//! ```
//! use lazyten_core::NamedTensor;
//! use lazyten_engine::{evaluate, Expr};
//! use lazyten_exec::BinaryOp;
//!
//! let a = Expr::tensor(NamedTensor::from_vec(&["i", "j"], vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap());
//! let b = Expr::tensor(NamedTensor::from_vec(&["j", "k"], vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap());
//!
//! // sum_j a[i,j] * b[j,k]
//! let c = Expr::contract(vec![a, b], BinaryOp::Add, BinaryOp::Mul, ["i", "k"]);
//! assert_eq!(evaluate(&c).unwrap().to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! ## Rewriting
//!
//! With [`EngineConfig::rewrite`] set, a reduction over a product such as
//! `Reduction(Add, Binary(Mul, ..))` is turned into a single contraction
//! ([`rewrite_contraction`]) so the planner can pick a good pairwise order.

#![deny(warnings)]

pub mod config;
pub mod contract;
pub mod error;
pub mod eval;
pub mod expr;
pub mod normalize;


pub use config::EngineConfig;
pub use contract::{contract, contract_with};
pub use error::{EvalError, EvalResult};
pub use eval::{evaluate, Evaluator};
pub use expr::{Expr, ExprKind, ExprRef};
pub use normalize::{flatten_commutative, match_reduction, rewrite_contraction};
