//! Contraction backends and the operator table

pub mod cpuexecutor_traits;
pub mod functions;
pub mod naiveexecutor_traits;
pub mod types;

pub use functions::*;
pub use types::*;
