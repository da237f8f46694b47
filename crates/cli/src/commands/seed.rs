use commission_core::seed::SeedDataset;

use crate::commands::{with_engine, CommandResult};

pub fn run() -> CommandResult {
    let dataset = SeedDataset::example();

    match with_engine("seed", |engine| async move { engine.bootstrap(&dataset).await }) {
        Ok(outcome) => CommandResult::success_with("seed", outcome.summary(), &outcome),
        Err(failure) => failure,
    }
}
