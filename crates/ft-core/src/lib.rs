//! Fraud Triage Core Library
//!
//! This library provides the core functionality for fraud triage:
//! - Exit codes for CLI operations
//! - Risk scoring engine with per-entity state
//! - CSV transaction ingestion
//! - Report rendering for the supported output formats
//!
//! The binary entry point is in `main.rs`.

pub mod engine;
pub mod exit_codes;
pub mod ingest;
pub mod logging;
pub mod output;

pub use engine::RiskEngine;
