use std::process::ExitCode;

use clap::Args;
use colored::Colorize;
use strum::IntoEnumIterator;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    cli::commands::print_json,
    config::Settings,
    guard,
    types::OperationType,
};

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Emit the rules as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Danger")]
    danger: String,
    #[tabled(rename = "Destructive")]
    destructive: String,
    #[tabled(rename = "Backup")]
    backup: String,
    #[tabled(rename = "Flagged")]
    flagged: String,
}

pub async fn execute(args: &RulesArgs, settings: &Settings) -> ExitCode {
    let rules = guard::safety_rules(&settings.safety);

    if args.json {
        print_json(&rules);
        return ExitCode::SUCCESS;
    }

    println!("{}", "=== Safety rules ===".blue());
    println!("Environment:          {}", rules.environment);
    println!(
        "Strict mode:          {}",
        if rules.strict_mode {
            "on".red().bold()
        } else {
            "off".green()
        }
    );
    println!("Require confirmation: {}", rules.require_confirmation);
    println!();

    let rows: Vec<RuleRow> = OperationType::iter()
        .map(|op| RuleRow {
            operation: op.to_string(),
            danger: op.danger_level().to_colored_string(),
            destructive: yes_no(rules.destructive_operations.contains(&op)),
            backup: yes_no(op.requires_backup()),
            flagged: yes_no(rules.dangerous_operations.contains(&op)),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);

    ExitCode::SUCCESS
}

fn yes_no(value: bool) -> String {
    if value { "yes".to_string() } else { "-".to_string() }
}
