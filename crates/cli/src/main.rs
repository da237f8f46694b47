use std::process::ExitCode;

fn main() -> ExitCode {
    commission_cli::run()
}
