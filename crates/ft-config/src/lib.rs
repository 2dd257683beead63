//! Fraud Triage configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for policy.json
//! - Policy resolution (CLI → env → config dir → built-in defaults)
//! - Semantic validation

pub mod policy;
pub mod resolve;
pub mod validate;

pub use policy::{ClusterPolicy, FrequencyPolicy, OutlierPolicy, PolicyError, RiskPolicy, VelocityPolicy};
pub use resolve::{resolve_policy, PolicySource, ResolvedPolicy};
pub use validate::{validate_policy, ValidationError, ValidationResult};

/// Schema version for policy files.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";
