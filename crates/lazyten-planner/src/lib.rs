//! # lazyten-planner
//!
//! Contraction order planning over named dimensions.
//!
//! Given the dimension names of every operand, the names to keep and the size
//! of every dimension, a planner decides in which order pairs of operands are
//! combined so that the total cost stays low. Plans only describe the order;
//! executing them is the job of `lazyten-exec`.
//!
//! ## Quick Start
//!
//! ```
//! use lazyten_planner::{greedy_planner, ContractionSpec, PlanHints};
//!
//! let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
//! let shapes = vec![vec![100, 200], vec![200, 300]];
//!
//! let plan = greedy_planner(&spec, &shapes, &PlanHints::default()).unwrap();
//!
//! println!("Estimated FLOPs: {:.2e}", plan.estimated_flops);
//! println!("Peak memory: {} bytes", plan.estimated_memory);
//! ```
//!
//! ## Planners
//!
//! ### Greedy Planner
//!
//! The [`greedy_planner`] repeatedly contracts the pair of live tensors with
//! minimum cost. It runs in O(n³) for n operands and produces good orders for
//! the chain and tree shaped networks that expression evaluation produces.
//!
//! ### Optimal Planner
//!
//! The [`optimal_planner`] runs bitmask dynamic programming over subsets of
//! operands and returns the cheapest contraction tree. It costs O(3ⁿ) time and
//! falls back to greedy above [`MAX_OPTIMAL_INPUTS`] operands.
//!
//! Both are also available behind the [`Planner`] trait, either as unit
//! structs ([`GreedyPlanner`], [`OptimalPlanner`]) or through the
//! [`PlannerKind`] selector that configuration files name.
//!
//! ## Cost Model
//!
//! A pairwise step touching dims `D` costs `2 * prod(size(d) for d in D)`
//! FLOPs; its result costs [`BYTES_PER_ELEMENT`] bytes per element. Planning
//! is deterministic: ties resolve to the lowest positions.
//!
//! ## Logging
//!
//! Chosen steps are logged at `debug` level through the `log` facade; the
//! optimal planner logs a `warn` when it falls back to greedy.

#![deny(warnings)]

pub mod api;
pub mod cost;
pub mod order;
pub mod parser;

#[cfg(test)]
mod property_tests;

// Re-exports
pub use api::*;
pub use cost::*;
pub use order::*;
pub use parser::*;
