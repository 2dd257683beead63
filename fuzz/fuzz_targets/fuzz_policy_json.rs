//! Fuzz target for policy.json parsing and validation.
//!
//! Tests that policy deserialization and semantic validation handle
//! arbitrary input without panicking.

#![no_main]

use ft_config::{validate_policy, RiskPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing should never panic, only return an error
    if let Ok(policy) = serde_json::from_slice::<RiskPolicy>(data) {
        // Anything that parses must also survive validation
        let _ = validate_policy(&policy);
    }
});
