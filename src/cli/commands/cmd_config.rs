use std::process::ExitCode;

use colored::Colorize;

use crate::config::Settings;

pub async fn execute(settings: &Settings) -> ExitCode {
    println!("{}", "=== Effective configuration ===".blue());
    settings.print_config();
    ExitCode::SUCCESS
}
