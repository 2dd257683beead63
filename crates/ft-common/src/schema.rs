//! Report schema versioning.

/// Schema version stamped into every machine-readable report payload.
///
/// Bump on any breaking change to the decision or report shapes.
pub const SCHEMA_VERSION: &str = "1.0.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_is_semver_shaped() {
        let parts: Vec<&str> = SCHEMA_VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        for part in parts {
            assert!(part.parse::<u32>().is_ok());
        }
    }
}
