//! Error types for Fraud Triage.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Only structural failures live here: an unreadable batch file, a header
//! without the required columns, a broken policy. Problems with individual
//! records never surface as errors; the ingestion layer logs and skips them.
//!
//! # Human-Facing Output
//!
//! Errors can be formatted for human consumption with headline, reason, and fix:
//! ```text
//! ✗ Missing Required Columns
//!   Reason: missing required columns: location_lat, location_lon
//!   Fix: Add the listed columns to the CSV header. All five are required.
//! ```
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 12,
//!   "category": "input",
//!   "message": "missing required columns: location_lat, location_lon",
//!   "recoverable": true,
//!   "suggested_action": "manual_intervention",
//!   "context": { "missing_columns": ["location_lat", "location_lon"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Fraud Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Problems with the supplied batch file (missing, empty, malformed).
    Input,
    /// Policy configuration errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation (possibly with backoff).
    Retry,
    /// Run the `check` command to diagnose configuration.
    RunCheck,
    /// Manual intervention required (fix the input and rerun).
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for Fraud Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("input file not found: {path}")]
    InputNotFound { path: String },

    #[error("input is empty: no header row")]
    EmptyInput,

    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid policy file: {0}")]
    InvalidPolicy(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InputNotFound { .. } => 10,
            Error::EmptyInput => 11,
            Error::MissingColumns { .. } => 12,
            Error::MalformedInput(_) => 13,
            Error::Config(_) => 20,
            Error::InvalidPolicy(_) => 21,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InputNotFound { .. }
            | Error::EmptyInput
            | Error::MissingColumns { .. }
            | Error::MalformedInput(_) => ErrorCategory::Input,

            Error::Config(_) | Error::InvalidPolicy(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Every input and config error is recoverable by fixing the file and
    /// rerunning; only serialization failures point at a bug.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Json(_))
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::InputNotFound { .. } => SuggestedAction::ManualIntervention,
            Error::EmptyInput => SuggestedAction::ManualIntervention,
            Error::MissingColumns { .. } => SuggestedAction::ManualIntervention,
            Error::MalformedInput(_) => SuggestedAction::ManualIntervention,
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::InvalidPolicy(_) => SuggestedAction::RunCheck,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => {
                "Check the file path. Relative paths resolve against the current directory."
            }
            Error::EmptyInput => {
                "The file has no header row. Export the batch again with the standard header."
            }
            Error::MissingColumns { .. } => {
                "Add the listed columns to the CSV header. All five are required."
            }
            Error::MalformedInput(_) => {
                "The file structure could not be read as CSV. Check the encoding and delimiter."
            }
            Error::Config(_) => {
                "Run 'ft-core check' to validate configuration, or check syntax in policy.json."
            }
            Error::InvalidPolicy(_) => {
                "Run 'ft-core check' to validate, or remove the policy file to use built-in defaults."
            }
            Error::Io(_) => {
                "Check disk space, permissions, and that the file is readable. Retry the operation."
            }
            Error::Json(_) => {
                "The report failed to serialize. This is a bug; please report it."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => "Input File Not Found",
            Error::EmptyInput => "Empty Input",
            Error::MissingColumns { .. } => "Missing Required Columns",
            Error::MalformedInput(_) => "Malformed Input",
            Error::Config(_) => "Configuration Error",
            Error::InvalidPolicy(_) => "Invalid Policy Configuration",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Structured error response for JSON output.
///
/// Used by agent/pipeline modes for machine-parseable error reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path, column list).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InputNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::MissingColumns { missing } => {
                context.insert("missing_columns".to_string(), serde_json::json!(missing));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
