//! Utility functions for rule implementations.

pub mod allowance;
pub mod classify;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use classify::{callee_path, classify};
