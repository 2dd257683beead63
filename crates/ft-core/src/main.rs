//! Fraud Triage CLI - Main command dispatcher
//!
//! Usage:
//!   ft-core analyze <batch.csv>            Score a transaction batch
//!   ft-core analyze <batch.csv> -f md      Markdown report of flagged txns
//!   ft-core check                          Validate the active risk policy
//!   ft-core schema                         Print the analyze report schema
//!   ft-core version                        Show version information
//!
//! Policy resolution order: --policy, FT_POLICY, FT_CONFIG_DIR/policy.json,
//! builtin defaults. Run `ft-core check` to see which source is active.

use clap::{Args, Parser, Subcommand};
use ft_common::error::{format_error_human, StructuredError};
use ft_common::{Error, OutputFormat, RunId, SCHEMA_VERSION};
use ft_config::{resolve_policy, validate_policy, ResolvedPolicy, RiskPolicy};
use ft_core::engine::RiskEngine;
use ft_core::exit_codes::ExitCode;
use ft_core::ingest::read_transactions_from_path;
use ft_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ft_core::output::{render, AnalyzeReport, AnalyzeStats};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Fraud Triage - online transaction risk scoring
#[derive(Parser)]
#[command(name = "ft-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a risk policy file (overrides FT_POLICY and FT_CONFIG_DIR)
    #[arg(long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a transaction batch and report per-transaction decisions
    Analyze(AnalyzeArgs),

    /// Validate the active risk policy without scoring anything
    Check,

    /// Print the JSON Schema of the analyze report payload
    Schema,

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the transaction batch (CSV)
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };

    // Machine-readable payloads get machine-readable logs on stderr.
    let cli_format = match cli.global.format {
        OutputFormat::Json | OutputFormat::Jsonl => Some(LogFormat::Jsonl),
        _ => None,
    };

    init_logging(&LogConfig::from_env(cli_level, cli_format));

    let exit_code = match cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, &args),
        Commands::Check => run_check(&cli.global),
        Commands::Schema => run_schema(&cli.global),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Resolve, load, and validate the risk policy for this invocation.
fn load_policy(global: &GlobalOpts) -> Result<(RiskPolicy, ResolvedPolicy), Error> {
    let resolved = resolve_policy(global.policy.as_deref());
    let policy = resolved
        .load()
        .map_err(|e| Error::Config(e.to_string()))?;
    validate_policy(&policy).map_err(|e| Error::InvalidPolicy(e.to_string()))?;
    Ok((policy, resolved))
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let run_id = RunId::new();

    let (policy, resolved) = match load_policy(global) {
        Ok(loaded) => loaded,
        Err(err) => return output_error(global, &run_id, &err),
    };
    tracing::info!(
        run_id = %run_id,
        policy_source = %resolved.source,
        input = %args.input.display(),
        "starting analyze run"
    );

    let (transactions, ingest) = match read_transactions_from_path(&args.input) {
        Ok(batch) => batch,
        Err(err) => return output_error(global, &run_id, &err),
    };

    let engine = RiskEngine::new(policy);
    let mut decisions = Vec::with_capacity(transactions.len());
    let mut flagged = 0usize;
    for txn in &transactions {
        let decision = engine.evaluate(txn);
        if decision.flagged {
            flagged += 1;
            tracing::info!(
                run_id = %run_id,
                entity = %decision.entity,
                risk_score = decision.risk_score,
                "transaction flagged"
            );
        }
        decisions.push(decision);
    }

    let stats = AnalyzeStats {
        evaluated: decisions.len(),
        flagged,
        entities: engine.entity_count(),
    };
    tracing::info!(
        run_id = %run_id,
        evaluated = stats.evaluated,
        flagged = stats.flagged,
        entities = stats.entities,
        "analyze run finished"
    );

    let report = AnalyzeReport::new(
        run_id.clone(),
        args.input.display().to_string(),
        ingest,
        stats,
        decisions,
    );
    match render(&report, global.format) {
        Ok(payload) => {
            let payload = payload.trim_end_matches('\n');
            if !payload.is_empty() {
                println!("{}", payload);
            }
        }
        Err(err) => return output_error(global, &run_id, &err),
    }

    if flagged > 0 {
        ExitCode::Flagged
    } else {
        ExitCode::Clean
    }
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let run_id = RunId::new();
    let resolved = resolve_policy(global.policy.as_deref());

    let (status, detail) = match resolved.load() {
        Ok(policy) => match validate_policy(&policy) {
            Ok(()) => ("ok", None),
            Err(err) => ("error", Some(err.to_string())),
        },
        Err(err) => ("error", Some(err.to_string())),
    };

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id.0,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": status,
        "checks": [{
            "check": "policy",
            "status": status,
            "source": resolved.source.to_string(),
            "path": resolved.path.as_ref().map(|p| p.display().to_string()),
            "using_defaults": resolved.path.is_none(),
            "error": detail,
        }],
    });

    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            println!("{}", serde_json::to_string_pretty(&response).unwrap());
        }
        OutputFormat::Summary => {
            let verdict = if status == "ok" { "OK" } else { "FAILED" };
            println!("[{}] policy check: {}", run_id, verdict);
        }
        _ => {
            let symbol = if status == "ok" { "✓" } else { "✗" };
            println!("# ft-core check");
            println!();
            println!("{} policy: {} ({})", symbol, status, resolved.source);
            if let Some(path) = &resolved.path {
                println!("  Path: {}", path.display());
            }
            if let Some(detail) = &detail {
                println!("  Error: {}", detail);
            }
            println!();
            println!("Run: {}", run_id);
        }
    }

    if status == "ok" {
        ExitCode::Clean
    } else {
        ExitCode::ConfigError
    }
}

fn run_schema(_global: &GlobalOpts) -> ExitCode {
    let schema = schemars::schema_for!(AnalyzeReport);
    match serde_json::to_string_pretty(&schema) {
        Ok(payload) => {
            println!("{}", payload);
            ExitCode::Clean
        }
        Err(err) => {
            tracing::error!(error = %err, "schema serialization failed");
            eprintln!("schema serialization failed: {}", err);
            ExitCode::InternalError
        }
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "ft_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&version_info).unwrap());
        }
        _ => {
            println!("ft-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

/// Report a fatal error on stderr in the requested format and map it
/// to its exit code. The stdout payload stays untouched so downstream
/// consumers never have to parse a partial report.
fn output_error(global: &GlobalOpts, run_id: &RunId, error: &Error) -> ExitCode {
    let exit_code = exit_code_for(error);

    tracing::error!(
        run_id = %run_id,
        code = error.code(),
        error = %error,
        "run aborted"
    );

    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let structured =
                StructuredError::from(error).with_context("run_id", run_id.0.clone());
            eprintln!("{}", structured.to_json());
        }
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(error, use_color));
        }
    }

    exit_code
}

fn exit_code_for(error: &Error) -> ExitCode {
    match error {
        Error::InputNotFound { .. }
        | Error::EmptyInput
        | Error::MissingColumns { .. }
        | Error::MalformedInput(_) => ExitCode::InputError,
        Error::Config(_) | Error::InvalidPolicy(_) => ExitCode::ConfigError,
        Error::Io(_) => ExitCode::IoError,
        Error::Json(_) => ExitCode::InternalError,
    }
}
