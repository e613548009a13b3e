//! Pretty printing for programs and types
//!
//! [`source`] renders expressions and statement headers for diagnostics,
//! [`types`] renders type terms with canonical variable names.

pub mod source;
pub mod types;

// Re-export for convenience
pub use source::*;
pub use types::*;
