use commission_core::errors::EngineError;

use crate::commands::{with_engine, CommandResult};

/// Applies pending migrations. Opening the engine already migrates, so the
/// action only reports where the schema stands afterwards.
pub fn run() -> CommandResult {
    let counted = with_engine("migrate", |engine| async move {
        Ok::<_, EngineError>(engine.ledger().counts().await?)
    });

    match counted {
        Ok(counts) => CommandResult::success_with("migrate", "applied pending migrations", &counts),
        Err(failure) => failure,
    }
}
