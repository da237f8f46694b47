use rust_decimal::Decimal;

use crate::commands::{with_engine, CommandResult};

/// Evaluates `amount` against the stored tier table without recording a sale.
pub fn run(amount: Decimal) -> CommandResult {
    match with_engine("commission", |engine| async move { engine.compute_commission(amount).await })
    {
        Ok(quote) => {
            let message = match quote.tier_name() {
                Some(tier) => format!("commission {} under tier `{tier}`", quote.commission),
                None => format!("no commission tier covers amount {amount}"),
            };
            CommandResult::success_with("commission", message, &quote)
        }
        Err(failure) => failure,
    }
}
