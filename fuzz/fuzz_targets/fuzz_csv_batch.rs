//! Fuzz target for CSV batch ingestion.
//!
//! Tests that `read_transactions` handles arbitrary byte streams without
//! panicking. Bad rows must be skipped or surfaced as structured errors.

#![no_main]

use ft_core::ingest::read_transactions;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((transactions, stats)) = read_transactions(data) {
        // Every ingested row was read, and counters never disagree
        assert!(stats.rows_ingested <= stats.rows_read);
        assert_eq!(transactions.len(), stats.rows_ingested);
        for txn in &transactions {
            assert!(txn.magnitude.is_finite() && txn.magnitude > 0.0);
        }
    }
});
