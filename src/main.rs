//! CLI entry point for cmdgate.

use std::process::ExitCode;

use cmdgate::{ARG_OFFSET, ArgumentWindow, run};

fn main() -> ExitCode {
    ExitCode::from(run(ArgumentWindow::from_env(ARG_OFFSET)))
}
