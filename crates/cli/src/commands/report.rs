use commission_core::engine::ReportQuery;

use crate::commands::{with_engine, CommandResult};

pub fn run(from: &str, to: &str) -> CommandResult {
    let query = ReportQuery::new(from, to);

    match with_engine("report", |engine| async move { engine.filter_sales(&query).await }) {
        Ok(report) => {
            let message = format!(
                "{} sales totalling {} with {} in commissions",
                report.totals.count, report.totals.total_amount, report.totals.total_commission
            );
            CommandResult::success_with("report", message, &report)
        }
        Err(failure) => failure,
    }
}
