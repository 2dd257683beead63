//! Policy resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → built-in
//! defaults. Explicitly named paths (CLI flag or `FT_POLICY`) are used as
//! given so that a typo surfaces as a load error instead of silently
//! falling back to defaults; the `FT_CONFIG_DIR` probe requires the file
//! to exist.

use crate::policy::{PolicyError, RiskPolicy};
use std::path::{Path, PathBuf};

/// Environment variable naming a policy file directly.
pub const ENV_POLICY_PATH: &str = "FT_POLICY";

/// Environment variable naming a directory to probe for `policy.json`.
pub const ENV_CONFIG_DIR: &str = "FT_CONFIG_DIR";

/// Standard policy file name inside a config directory.
const POLICY_FILENAME: &str = "policy.json";

/// Where the active policy came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicySource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via the FT_POLICY environment variable.
    Environment,

    /// Found as policy.json under FT_CONFIG_DIR.
    ConfigDir,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for PolicySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicySource::CliArgument => write!(f, "CLI argument"),
            PolicySource::Environment => write!(f, "environment variable"),
            PolicySource::ConfigDir => write!(f, "config directory"),
            PolicySource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved policy location.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPolicy {
    /// Path to the policy file, or `None` for built-in defaults.
    pub path: Option<PathBuf>,

    /// Source of the policy (for diagnostics).
    pub source: PolicySource,
}

impl ResolvedPolicy {
    /// Load the policy this resolution points at.
    pub fn load(&self) -> Result<RiskPolicy, PolicyError> {
        match &self.path {
            Some(path) => RiskPolicy::load(path),
            None => Ok(RiskPolicy::default()),
        }
    }
}

/// Resolve the policy location using the standard resolution order.
///
/// 1. Explicit CLI path (if provided)
/// 2. FT_POLICY environment variable (direct path)
/// 3. FT_CONFIG_DIR environment variable + `policy.json` (must exist)
/// 4. Built-in defaults (None)
pub fn resolve_policy(cli_path: Option<&Path>) -> ResolvedPolicy {
    if let Some(path) = cli_path {
        return ResolvedPolicy {
            path: Some(path.to_path_buf()),
            source: PolicySource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_POLICY_PATH) {
        if !env_path.is_empty() {
            return ResolvedPolicy {
                path: Some(PathBuf::from(env_path)),
                source: PolicySource::Environment,
            };
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if !config_dir.is_empty() {
            let path = PathBuf::from(config_dir).join(POLICY_FILENAME);
            if path.exists() {
                return ResolvedPolicy {
                    path: Some(path),
                    source: PolicySource::ConfigDir,
                };
            }
        }
    }

    ResolvedPolicy::default()
}
