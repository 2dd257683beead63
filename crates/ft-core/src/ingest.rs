//! CSV transaction ingestion.
//!
//! Reads transaction batches in the standard column layout, validating
//! structure up front and isolating row-level problems: a malformed row
//! is counted and skipped, never aborting the batch. Credits carry no
//! spend signal and are skipped; debit amounts are folded to their
//! absolute value before scoring.

use ft_common::{Error, Result, Transaction};
use ft_math::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Columns every transaction batch must provide, in reporting order.
const REQUIRED_COLUMNS: [&str; 5] = [
    "user_id",
    "amount",
    "timestamp",
    "location_lat",
    "location_lon",
];

/// One row in the standard batch layout. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    user_id: String,
    amount: f64,
    timestamp: i64,
    location_lat: f64,
    location_lon: f64,
}

/// Counters describing what happened to a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct IngestStats {
    /// Data rows read from the input.
    pub rows_read: usize,
    /// Rows converted into transactions.
    pub rows_ingested: usize,
    /// Rows skipped because the amount was a credit (>= 0).
    pub credits_skipped: usize,
    /// Rows skipped as unparseable or semantically invalid.
    pub rows_invalid: usize,
}

/// Read a transaction batch from a CSV file.
pub fn read_transactions_from_path(path: &Path) -> Result<(Vec<Transaction>, IngestStats)> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    read_transactions(BufReader::new(file))
}

/// Read a transaction batch from any reader producing CSV.
pub fn read_transactions<R: Read>(reader: R) -> Result<(Vec<Transaction>, IngestStats)> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = match rdr.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => match err.into_kind() {
            csv::ErrorKind::Io(io_err) => return Err(Error::Io(io_err)),
            kind => return Err(Error::MalformedInput(format!("unreadable header: {:?}", kind))),
        },
    };

    if headers.is_empty() {
        return Err(Error::EmptyInput);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns { missing });
    }

    let mut transactions = Vec::new();
    let mut stats = IngestStats::default();

    for result in rdr.deserialize::<RawRecord>() {
        stats.rows_read += 1;

        let record = match result {
            Ok(record) => record,
            Err(err) => match err.into_kind() {
                // An I/O failure is structural, not a bad row.
                csv::ErrorKind::Io(io_err) => return Err(Error::Io(io_err)),
                kind => {
                    tracing::warn!(row = stats.rows_read, error = ?kind, "skipping unparseable row");
                    stats.rows_invalid += 1;
                    continue;
                }
            },
        };

        if record.user_id.trim().is_empty() {
            tracing::warn!(row = stats.rows_read, "skipping row with empty user_id");
            stats.rows_invalid += 1;
            continue;
        }

        if !record.amount.is_finite()
            || !record.location_lat.is_finite()
            || !record.location_lon.is_finite()
        {
            tracing::warn!(row = stats.rows_read, "skipping row with non-finite numeric field");
            stats.rows_invalid += 1;
            continue;
        }

        // Credits (and zero) are not spending.
        if record.amount >= 0.0 {
            stats.credits_skipped += 1;
            continue;
        }

        transactions.push(Transaction::new(
            record.user_id,
            record.amount.abs(),
            record.timestamp,
            GeoPoint::new(record.location_lat, record.location_lon),
        ));
        stats.rows_ingested += 1;
    }

    tracing::debug!(
        rows_read = stats.rows_read,
        rows_ingested = stats.rows_ingested,
        credits_skipped = stats.credits_skipped,
        rows_invalid = stats.rows_invalid,
        "batch ingested"
    );

    Ok((transactions, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "user_id,amount,timestamp,location_lat,location_lon";

    fn read(csv: &str) -> Result<(Vec<Transaction>, IngestStats)> {
        read_transactions(Cursor::new(csv.to_string()))
    }

    #[test]
    fn test_reads_debits_and_skips_credits() {
        let input = format!(
            "{HEADER}\nu1,-120.50,1000,40.7,-74.0\nu1,300.00,1060,40.7,-74.0\nu2,-9.99,1100,51.5,-0.1\n"
        );
        let (txns, stats) = read(&input).unwrap();

        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].entity.0, "u1");
        assert_eq!(txns[0].magnitude, 120.50);
        assert_eq!(txns[0].timestamp, 1000);
        assert_eq!(txns[1].entity.0, "u2");

        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_ingested, 2);
        assert_eq!(stats.credits_skipped, 1);
        assert_eq!(stats.rows_invalid, 0);
    }

    #[test]
    fn test_zero_amount_is_a_credit() {
        let input = format!("{HEADER}\nu1,0.0,1000,40.7,-74.0\n");
        let (txns, stats) = read(&input).unwrap();

        assert!(txns.is_empty());
        assert_eq!(stats.credits_skipped, 1);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = read("").unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_header_only_input_is_empty_not_an_error() {
        let (txns, stats) = read(&format!("{HEADER}\n")).unwrap();
        assert!(txns.is_empty());
        assert_eq!(stats.rows_read, 0);
    }

    #[test]
    fn test_missing_columns_reported_in_order() {
        let err = read("user_id,amount,location_lat\nu1,-5.0,40.7\n").unwrap_err();
        match err {
            Error::MissingColumns { missing } => {
                assert_eq!(missing, vec!["timestamp", "location_lon"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let input = format!(
            "{HEADER}\nu1,not-a-number,1000,40.7,-74.0\nu2,-50.0,oops,40.7,-74.0\nu3,-75.0,1200,40.7,-74.0\n"
        );
        let (txns, stats) = read(&input).unwrap();

        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].entity.0, "u3");
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_invalid, 2);
    }

    #[test]
    fn test_non_finite_values_are_invalid_rows() {
        // "NaN" and "inf" parse as f64 but are rejected semantically.
        let input = format!(
            "{HEADER}\nu1,NaN,1000,40.7,-74.0\nu2,-50.0,1100,inf,-74.0\nu3,-75.0,1200,40.7,-74.0\n"
        );
        let (txns, stats) = read(&input).unwrap();

        assert_eq!(txns.len(), 1);
        assert_eq!(stats.rows_invalid, 2);
    }

    #[test]
    fn test_empty_user_id_is_an_invalid_row() {
        let input = format!("{HEADER}\n,-50.0,1000,40.7,-74.0\n");
        let (txns, stats) = read(&input).unwrap();

        assert!(txns.is_empty());
        assert_eq!(stats.rows_invalid, 1);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let input =
            "merchant,user_id,amount,timestamp,location_lat,location_lon\nacme,u1,-5.0,1000,40.7,-74.0\n";
        let (txns, _) = read(input).unwrap();
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = read_transactions_from_path(Path::new("/nonexistent/batch.csv")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }
}
