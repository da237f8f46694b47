pub mod commands;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "commission",
    about = "Sales commission operator CLI",
    long_about = "Apply migrations, load example data, quote commissions, build sales reports and check readiness.",
    after_help = "Examples:\n  commission seed\n  commission commission --amount 2500\n  commission report --from 2024-01-01 --to 2024-01-31\n  commission doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the example salespeople, tiers and sales when the database is empty")]
    Seed,
    #[command(about = "Compute the commission for an amount against the stored tier table")]
    Commission {
        #[arg(long, help = "Sale amount, e.g. 2500 or 1234.50")]
        amount: Decimal,
    },
    #[command(about = "List sales dated within an inclusive range, with totals")]
    Report {
        #[arg(long, help = "First day of the range (YYYY-MM-DD)")]
        from: String,
        #[arg(long, help = "Last day of the range (YYYY-MM-DD)")]
        to: String,
    },
    #[command(about = "Validate config, database connectivity, schema and tier table")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Commission { amount } => commands::commission::run(amount),
        Command::Report { from, to } => commands::report::run(&from, &to),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
