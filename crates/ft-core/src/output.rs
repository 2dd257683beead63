//! Report rendering for analyze runs.
//!
//! The JSON payload is the stable machine contract; JSONL emits one
//! decision per line for stream consumers; Markdown and summary are for
//! people. All rendering goes to a string so the caller decides where
//! it lands (stdout is reserved for exactly this payload).

use crate::ingest::IngestStats;
use ft_common::{Decision, OutputFormat, Result, RunId, SCHEMA_VERSION};
use schemars::JsonSchema;
use serde::Serialize;

/// Summary counters for one analyze run.
#[derive(Debug, Clone, Copy, Default, Serialize, JsonSchema)]
pub struct AnalyzeStats {
    /// Transactions scored.
    pub evaluated: usize,
    /// Transactions flagged for review.
    pub flagged: usize,
    /// Distinct entities seen.
    pub entities: usize,
}

/// Full analyze payload.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AnalyzeReport {
    pub schema_version: String,
    pub run_id: RunId,
    pub generated_at: String,
    /// Path of the ingested batch file.
    pub source: String,
    pub ingest: IngestStats,
    pub stats: AnalyzeStats,
    pub decisions: Vec<Decision>,
}

impl AnalyzeReport {
    pub fn new(
        run_id: RunId,
        source: String,
        ingest: IngestStats,
        stats: AnalyzeStats,
        decisions: Vec<Decision>,
    ) -> Self {
        AnalyzeReport {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            source,
            ingest,
            stats,
            decisions,
        }
    }
}

/// Render the report in the requested output format.
pub fn render(report: &AnalyzeReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for decision in &report.decisions {
                out.push_str(&serde_json::to_string(decision)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Summary => Ok(format!(
            "[{}] {} txns scored, {} flagged",
            report.run_id, report.stats.evaluated, report.stats.flagged
        )),
    }
}

fn render_markdown(report: &AnalyzeReport) -> String {
    let mut out = String::new();

    out.push_str("# Fraud Triage Report\n\n");
    out.push_str(&format!("Run: {}\n", report.run_id));
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!(
        "Scored {} transactions across {} entities ({} rows read, {} credits skipped, {} invalid).\n\n",
        report.stats.evaluated,
        report.stats.entities,
        report.ingest.rows_read,
        report.ingest.credits_skipped,
        report.ingest.rows_invalid,
    ));

    let flagged: Vec<&Decision> = report.decisions.iter().filter(|d| d.flagged).collect();
    if flagged.is_empty() {
        out.push_str("No transactions flagged.\n");
        return out;
    }

    out.push_str(&format!("{} flagged:\n\n", flagged.len()));
    out.push_str("| user_id | amount | risk | reasons |\n");
    out.push_str("|---------|-------:|-----:|---------|\n");
    for decision in flagged {
        out.push_str(&format!(
            "| {} | {:.2} | {} | {} |\n",
            decision.entity,
            decision.amount,
            decision.risk_score,
            decision.reasons.join("; "),
        ));
    }

    out
}
