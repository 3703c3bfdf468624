//! Shared value types and helpers used across the SDK.

pub mod decimal;
pub mod fee;
pub mod serde_util;
pub mod types;

// Re-export commonly used items
pub use decimal::{format_dec, from_atomics, to_atomics, DecimalError, DEC_PRECISION};
pub use fee::{Fee, GasPrice};
pub use types::*;
