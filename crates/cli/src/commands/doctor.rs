use std::sync::Arc;

use commission_core::config::{AppConfig, LoadOptions};
use commission_core::engine::CommissionEngine;
use commission_db::{connect_with_config, DbPool, SqlSalesLedger};
use serde::Serialize;

use crate::commands::CommandResult;

const SCHEMA_TABLES: [&str; 3] = ["salesperson", "commission_tier", "sale"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Read-only readiness checks. Unlike the other commands this never applies
/// migrations, so a fresh database reports the schema as missing.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                format!("configuration loaded; server would listen on {}", config.listen_address()),
            ));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            for name in ["database_connectivity", "schema", "tier_table"] {
                checks.push(DoctorCheck::skipped(name, "configuration did not load"));
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck::fail(
                    "database_connectivity",
                    format!("failed to initialize async runtime: {error}"),
                ),
                DoctorCheck::skipped("schema", "the async runtime did not start"),
                DoctorCheck::skipped("tier_table", "the async runtime did not start"),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_config(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck::fail(
                        "database_connectivity",
                        format!("failed to connect to database: {error}"),
                    ),
                    DoctorCheck::skipped("schema", "the database is unreachable"),
                    DoctorCheck::skipped("tier_table", "the database is unreachable"),
                ];
            }
        };

        let mut checks = vec![DoctorCheck::pass(
            "database_connectivity",
            format!("connected using `{}`", config.database.url),
        )];

        let schema = check_schema(&pool).await;
        let schema_ready = schema.status == CheckStatus::Pass;
        checks.push(schema);

        if schema_ready {
            checks.push(check_tier_table(&pool).await);
        } else {
            checks.push(DoctorCheck::skipped("tier_table", "the schema is incomplete"));
        }

        pool.close().await;
        checks
    })
}

async fn check_schema(pool: &DbPool) -> DoctorCheck {
    let mut missing = Vec::new();
    for table in SCHEMA_TABLES {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await;

        match found {
            Ok(1) => {}
            Ok(_) => missing.push(table),
            Err(error) => return DoctorCheck::fail("schema", format!("schema query failed: {error}")),
        }
    }

    if missing.is_empty() {
        DoctorCheck::pass("schema", "all ledger tables present")
    } else {
        DoctorCheck::fail(
            "schema",
            format!("missing tables: {}; run `commission migrate`", missing.join(", ")),
        )
    }
}

async fn check_tier_table(pool: &DbPool) -> DoctorCheck {
    let engine = CommissionEngine::new(Arc::new(SqlSalesLedger::new(pool.clone())));

    match engine.tier_table().await {
        Ok(table) if table.is_empty() => DoctorCheck::pass(
            "tier_table",
            "no commission tiers configured; every sale earns 0 until `commission seed` runs",
        ),
        Ok(table) => DoctorCheck::pass(
            "tier_table",
            format!("{} non-overlapping commission tiers loaded", table.len()),
        ),
        Err(error) => DoctorCheck::fail("tier_table", error.to_string()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
