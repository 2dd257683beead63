//! CLI tests for the analyze, check, schema, and version commands.
//!
//! These tests run the real binary against batch files on disk and
//! verify exit codes, stdout payloads, and stderr error envelopes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a Command for the ft-core binary with a hermetic environment.
fn ft_core() -> Command {
    let mut cmd = Command::cargo_bin("ft-core").expect("ft-core binary should exist");
    cmd.env_remove("FT_POLICY")
        .env_remove("FT_CONFIG_DIR")
        .env_remove("FT_LOG")
        .env_remove("FT_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Two modest debits from unrelated cards. Scores zero everywhere.
const CLEAN_BATCH: &str = "user_id,amount,timestamp,location_lat,location_lon\n\
    u1,-20.00,0,40.7,-74.0\n\
    u2,-35.00,600,51.5,-0.1\n";

/// Four debits ping-ponging between two continents a minute apart. The
/// fourth accumulates velocity plus cluster risk and gets flagged.
const FLAGGED_BATCH: &str = "user_id,amount,timestamp,location_lat,location_lon\n\
    u1,-20.00,0,0.0,0.0\n\
    u1,-20.00,60,50.0,50.0\n\
    u1,-20.00,120,0.0,0.0\n\
    u1,-20.00,180,50.0,50.0\n";

/// One impossible jump. Risk 10 under the default policy, below the flag bar.
const TELEPORT_PAIR: &str = "user_id,amount,timestamp,location_lat,location_lon\n\
    u1,-20.00,0,0.0,0.0\n\
    u1,-20.00,60,50.0,50.0\n";

// ============================================================================
// Analyze Exit Code Tests
// ============================================================================

mod analyze_exit_codes {
    use super::*;

    #[test]
    fn clean_batch_exits_zero() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "clean.csv", CLEAN_BATCH);

        ft_core().arg("analyze").arg(&batch).assert().code(0);
    }

    #[test]
    fn flagged_batch_exits_one() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "flagged.csv", FLAGGED_BATCH);

        ft_core().arg("analyze").arg(&batch).assert().code(1);
    }

    #[test]
    fn missing_batch_exits_input_error() {
        let dir = TempDir::new().unwrap();
        let batch = dir.path().join("does-not-exist.csv");

        ft_core()
            .arg("analyze")
            .arg(&batch)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("does-not-exist.csv"));
    }

    #[test]
    fn empty_batch_exits_input_error() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "empty.csv", "");

        ft_core().arg("analyze").arg(&batch).assert().code(11);
    }

    #[test]
    fn header_only_batch_is_clean() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(
            &dir,
            "header.csv",
            "user_id,amount,timestamp,location_lat,location_lon\n",
        );

        ft_core()
            .arg("analyze")
            .arg(&batch)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"evaluated\": 0"));
    }

    #[test]
    fn incomplete_header_exits_input_error() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "partial.csv", "user_id,amount\nu1,-5.00\n");

        ft_core()
            .arg("analyze")
            .arg(&batch)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("missing required columns"));
    }
}

// ============================================================================
// Analyze Payload Tests
// ============================================================================

mod analyze_payload {
    use super::*;

    #[test]
    fn json_report_has_envelope_and_decisions() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "flagged.csv", FLAGGED_BATCH);

        let output = ft_core().arg("analyze").arg(&batch).assert().code(1);
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
        let report: serde_json::Value =
            serde_json::from_str(&stdout).expect("stdout should be valid JSON");

        assert_eq!(report["schema_version"], "1.0.0");
        assert!(report["run_id"].as_str().unwrap().starts_with("ft-"));
        assert!(report["source"].as_str().unwrap().ends_with("flagged.csv"));
        assert_eq!(report["ingest"]["rows_ingested"], 4);
        assert_eq!(report["stats"]["evaluated"], 4);
        assert_eq!(report["stats"]["flagged"], 1);
        assert_eq!(report["stats"]["entities"], 1);

        let decisions = report["decisions"].as_array().unwrap();
        assert_eq!(decisions.len(), 4);
        assert_eq!(decisions[0]["user_id"], "u1");
        assert_eq!(decisions[0]["risk_score"], 0);
        assert_eq!(decisions[3]["flagged"], true);
        assert_eq!(decisions[3]["risk_score"], 20);
        assert_eq!(
            decisions[3]["reasons"][0],
            "Impossible location jump"
        );
    }

    #[test]
    fn jsonl_format_streams_one_decision_per_line() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "flagged.csv", FLAGGED_BATCH);

        let output = ft_core()
            .args(["analyze", "-f", "jsonl"])
            .arg(&batch)
            .assert()
            .code(1);
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();

        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in lines {
            let decision: serde_json::Value =
                serde_json::from_str(line).expect("each line should be valid JSON");
            assert_eq!(decision["user_id"], "u1");
        }
    }

    #[test]
    fn md_report_lists_only_flagged_transactions() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "flagged.csv", FLAGGED_BATCH);

        ft_core()
            .args(["analyze", "-f", "md"])
            .arg(&batch)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("# Fraud Triage Report"))
            .stdout(predicate::str::contains("| u1 | 20.00 | 20 |"))
            .stdout(predicate::str::contains("Impossible location jump"));
    }

    #[test]
    fn md_report_says_so_when_nothing_flagged() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "clean.csv", CLEAN_BATCH);

        ft_core()
            .args(["analyze", "-f", "md"])
            .arg(&batch)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("No transactions flagged."));
    }

    #[test]
    fn summary_format_is_one_line() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "clean.csv", CLEAN_BATCH);

        ft_core()
            .args(["analyze", "-f", "summary"])
            .arg(&batch)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("2 txns scored, 0 flagged"));
    }
}

// ============================================================================
// Policy Flag Tests
// ============================================================================

mod policy_flag {
    use super::*;

    #[test]
    fn custom_policy_changes_the_flag_bar() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "teleport.csv", TELEPORT_PAIR);
        let policy = write_file(&dir, "strict.json", r#"{"thresholds": {"flag_risk": 10}}"#);

        // Default policy: risk 10 stays below the bar.
        ft_core().arg("analyze").arg(&batch).assert().code(0);

        // Strict policy: the same batch now flags.
        ft_core()
            .arg("analyze")
            .arg(&batch)
            .arg("--policy")
            .arg(&policy)
            .assert()
            .code(1);
    }

    #[test]
    fn unparseable_policy_exits_config_error() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "clean.csv", CLEAN_BATCH);
        let policy = write_file(&dir, "broken.json", "{ not json");

        ft_core()
            .arg("analyze")
            .arg(&batch)
            .arg("--policy")
            .arg(&policy)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("\"category\":\"config\""));
    }

    #[test]
    fn unreachable_flag_threshold_exits_config_error() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "clean.csv", CLEAN_BATCH);
        let policy = write_file(&dir, "zero.json", r#"{"thresholds": {"flag_risk": 0}}"#);

        ft_core()
            .arg("analyze")
            .arg(&batch)
            .arg("--policy")
            .arg(&policy)
            .assert()
            .code(12);
    }

    #[test]
    fn ft_policy_env_is_honored() {
        let dir = TempDir::new().unwrap();
        let batch = write_file(&dir, "teleport.csv", TELEPORT_PAIR);
        let policy = write_file(&dir, "strict.json", r#"{"thresholds": {"flag_risk": 10}}"#);

        ft_core()
            .env("FT_POLICY", &policy)
            .arg("analyze")
            .arg(&batch)
            .assert()
            .code(1);
    }
}

// ============================================================================
// Check Command Tests
// ============================================================================

mod check_command {
    use super::*;

    #[test]
    fn check_with_builtin_defaults_is_ok() {
        ft_core()
            .arg("check")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"status\": \"ok\""))
            .stdout(predicate::str::contains("builtin default"));
    }

    #[test]
    fn check_reports_cli_policy_path() {
        let dir = TempDir::new().unwrap();
        let policy = write_file(&dir, "ok.json", r#"{"frequency": {"max_txns": 3}}"#);

        ft_core()
            .arg("check")
            .arg("--policy")
            .arg(&policy)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("CLI argument"))
            .stdout(predicate::str::contains("ok.json"));
    }

    #[test]
    fn check_with_broken_policy_exits_config_error() {
        let dir = TempDir::new().unwrap();
        let policy = write_file(&dir, "broken.json", "{ not json");

        ft_core()
            .arg("check")
            .arg("--policy")
            .arg(&policy)
            .assert()
            .code(12)
            .stdout(predicate::str::contains("\"status\": \"error\""));
    }

    #[test]
    fn check_human_format_renders_a_headline() {
        ft_core()
            .args(["check", "-f", "md"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("# ft-core check"));
    }
}

// ============================================================================
// Schema and Version Tests
// ============================================================================

mod schema_and_version {
    use super::*;

    #[test]
    fn schema_describes_the_analyze_report() {
        ft_core()
            .arg("schema")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("AnalyzeReport"))
            .stdout(predicate::str::contains("decisions"));
    }

    #[test]
    fn version_command_emits_json_by_default() {
        ft_core()
            .arg("version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("ft_core_version"));
    }

    #[test]
    fn version_flag_prints_binary_name() {
        ft_core()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ft-core"));
    }

    #[test]
    fn invalid_format_value_is_rejected() {
        ft_core()
            .args(["analyze", "batch.csv", "-f", "xml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("xml"));
    }
}
