//! Dense tensor implementation and operations

// Core type definition
pub mod types;

mod shape_ops;

// Supporting modules
pub mod densend_traits;

// Re-export the main type
pub use types::DenseND;
