//! Configuration and parameters
//!
//! Named solver constants and runtime-validated settings.

pub mod constants;
pub mod solver_params;

pub use constants::*;
pub use solver_params::*;
