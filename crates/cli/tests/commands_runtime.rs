use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use commission_cli::commands::{commission, doctor, migrate, report, seed};
use rust_decimal::Decimal;
use serde_json::Value;

const MEMORY_DB: &[(&str, &str)] =
    &[("COMMISSION_DATABASE_URL", "sqlite::memory:"), ("COMMISSION_DATABASE_MAX_CONNECTIONS", "1")];

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(MEMORY_DB, || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["salespeople"], 0);
    });
}

#[test]
fn migrate_reports_config_failure_for_non_sqlite_url() {
    with_env(&[("COMMISSION_DATABASE_URL", "postgres://localhost/sales")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_reports_unreachable_database() {
    with_env(
        &[
            ("COMMISSION_DATABASE_URL", "sqlite:///nonexistent-dir/for/commission/cli.db"),
            ("COMMISSION_DATABASE_TIMEOUT_SECS", "1"),
        ],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 4, "expected db connectivity failure code");
            assert_eq!(parse_payload(&result.output)["error_class"], "db_connectivity");
        },
    );
}

#[test]
fn seed_loads_example_data_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_url(&dir.path().join("seed.db"));

    with_env(&[("COMMISSION_DATABASE_URL", url.as_str())], || {
        let first = parse_payload(&seed::run().output);
        assert_eq!(first["status"], "ok");
        assert_eq!(first["data"]["outcome"], "loaded");
        assert_eq!(first["data"]["sales"], 5);

        let second = parse_payload(&seed::run().output);
        assert_eq!(second["status"], "ok");
        assert_eq!(second["data"]["outcome"], "skipped");
        assert_eq!(second["data"]["existing_salespeople"], 3);
    });
}

#[test]
fn commission_quotes_against_seeded_tiers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_url(&dir.path().join("quote.db"));

    with_env(&[("COMMISSION_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = commission::run(Decimal::from(2500));
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["tier"]["name"], "Intermedia");
        let commission = payload["data"]["commission"].as_str().expect("decimal string");
        assert_eq!(commission.parse::<Decimal>().expect("decimal"), Decimal::from(200));
    });
}

#[test]
fn commission_without_tiers_earns_nothing() {
    with_env(MEMORY_DB, || {
        let result = commission::run(Decimal::from(2500));
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["tier"], Value::Null);
        assert!(payload["message"].as_str().unwrap_or_default().contains("no commission tier"));
    });
}

#[test]
fn report_lists_january_sales() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_url(&dir.path().join("report.db"));

    with_env(&[("COMMISSION_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = report::run("2024-01-01", "2024-01-31");
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["totals"]["count"], 2);
        assert_eq!(payload["data"]["lines"][0]["date"], "2024-01-20");
        assert_eq!(payload["data"]["lines"][1]["date"], "2024-01-15");
    });
}

#[test]
fn report_rejects_malformed_dates() {
    with_env(MEMORY_DB, || {
        let result = report::run("2024-01-01", "31/01/2024");
        assert_eq!(result.exit_code, 6, "expected validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("fecha_fin"));
    });
}

#[test]
fn doctor_flags_missing_schema_on_fresh_database() {
    with_env(MEMORY_DB, || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        let checks = payload["checks"].as_array().expect("checks");
        let schema = checks.iter().find(|check| check["name"] == "schema").expect("schema check");
        assert_eq!(schema["status"], "fail");
    });
}

#[test]
fn doctor_passes_after_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = file_url(&dir.path().join("doctor.db"));

    with_env(&[("COMMISSION_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = doctor::run(false);
        assert_eq!(result.exit_code, 0, "{}", result.output);
        assert_eq!(
            result.output.lines().next(),
            Some("doctor: all readiness checks passed")
        );
        assert!(result.output.contains("5 non-overlapping commission tiers"));
    });
}

fn file_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "COMMISSION_DATABASE_URL",
        "COMMISSION_DATABASE_MAX_CONNECTIONS",
        "COMMISSION_DATABASE_TIMEOUT_SECS",
        "COMMISSION_SERVER_BIND_ADDRESS",
        "COMMISSION_SERVER_PORT",
        "COMMISSION_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "COMMISSION_SEED_LOAD_ON_START",
        "COMMISSION_LOGGING_LEVEL",
        "COMMISSION_LOGGING_FORMAT",
        "COMMISSION_LOG_LEVEL",
        "COMMISSION_LOG_FORMAT",
        "PORT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
