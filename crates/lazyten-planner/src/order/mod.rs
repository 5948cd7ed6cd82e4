//! Contraction order search

pub mod functions;
pub mod greedyplanner_traits;
pub mod optimalplanner_traits;
pub mod types;

// Re-export types
pub use types::{GreedyPlanner, OptimalPlanner};
// Re-export functions
pub use functions::*;
