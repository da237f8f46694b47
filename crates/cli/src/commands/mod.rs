pub mod commission;
pub mod doctor;
pub mod migrate;
pub mod report;
pub mod seed;

use std::future::Future;
use std::sync::Arc;

use commission_core::config::{AppConfig, LoadOptions};
use commission_core::engine::CommissionEngine;
use commission_core::errors::EngineError;
use commission_db::{connect_with_config, migrations, SqlSalesLedger};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_DB_CONNECT: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;
pub const EXIT_VALIDATION: u8 = 6;
pub const EXIT_STORAGE: u8 = 7;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::ok(command, message.into(), None)
    }

    /// Success carrying a structured payload under `data`.
    pub fn success_with(command: &str, message: impl Into<String>, data: &impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::ok(command, message.into(), Some(value)),
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn ok(command: &str, message: String, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loads configuration, opens and migrates the database, then runs `action`
/// against an engine backed by it. Every failure is already rendered as the
/// command's output.
pub(crate) fn with_engine<T, F, Fut>(command: &str, action: F) -> Result<T, CommandResult>
where
    F: FnOnce(CommissionEngine) -> Fut,
    Fut: Future<Output = Result<T, EngineError>>,
{
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            )
        },
    )?;

    runtime.block_on(async {
        let pool = connect_with_config(&config.database).await.map_err(|error| {
            CommandResult::failure(command, "db_connectivity", error.to_string(), EXIT_DB_CONNECT)
        })?;
        migrations::run_pending(&pool).await.map_err(|error| {
            CommandResult::failure(command, "migration", error.to_string(), EXIT_MIGRATION)
        })?;

        let engine = CommissionEngine::new(Arc::new(SqlSalesLedger::new(pool.clone())));
        let result = action(engine).await;
        pool.close().await;

        result.map_err(|error| engine_failure(command, error))
    })
}

fn engine_failure(command: &str, error: EngineError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        EngineError::Validation(_) => ("validation", EXIT_VALIDATION),
        EngineError::TierTable(_) => ("tier_table", EXIT_STORAGE),
        EngineError::Ledger(_) => ("storage", EXIT_STORAGE),
    };
    CommandResult::failure(command, error_class, error.to_string(), exit_code)
}
