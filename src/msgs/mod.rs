//! Typed operation kinds shipped with the default registry.
//!
//! Each kind implements [`TypedMsg`](crate::registry::TypedMsg); call
//! `into_operation()` to turn one into a [`TypedOperation`](crate::registry::TypedOperation).

pub mod bank;
pub mod staking;

pub use bank::MsgSend;
pub use staking::{CommissionRates, Description, MsgCreateValidator, MsgEditValidator};
