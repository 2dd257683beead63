//! Fraud Triage math utilities.

pub mod math;

pub use math::geo::*;
pub use math::rolling::*;
