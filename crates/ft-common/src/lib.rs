//! Fraud Triage common types, IDs, and errors.
//!
//! This crate provides foundational types shared across ft-core modules:
//! - Entity and run identity types
//! - Transaction and decision records
//! - Common error types
//! - Output format specifications
//! - Report schema versioning

pub mod decision;
pub mod error;
pub mod id;
pub mod output;
pub mod schema;
pub mod txn;

pub use decision::Decision;
pub use error::{Error, Result};
pub use id::{EntityId, RunId};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
pub use txn::Transaction;
