mod commands;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

pub use crate::cli::commands::ExitOnErr;
use crate::cli::commands::{
    Commands, cmd_analyze, cmd_check, cmd_config, cmd_dry_run, cmd_rules, cmd_snapshots,
    cmd_version,
};
use crate::config::Settings;
use crate::services::AppServices;

pub struct Context<'a> {
    pub settings: &'a Settings,
    pub services: &'a AppServices,
}

#[derive(Parser, Debug)]
#[command(
    name = "schema-guard",
    about = "Migration risk analysis and schema drift detection",
    long_about = format!(
r#"{} - {}
Flags destructive migrations before they run and detects drift from the recorded baseline."#,
"SCHEMA GUARD".green().bold(),
"Know what a migration will do to your data."
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> ExitCode {
        match &self.command {
            Commands::Analyze(args) => cmd_analyze::execute(args, ctx).await,
            Commands::Check(args) => cmd_check::execute(args, ctx).await,
            Commands::DryRun(args) => cmd_dry_run::execute(args, ctx).await,
            Commands::Snapshots { action } => cmd_snapshots::execute(action, ctx).await,
            Commands::Rules(args) => cmd_rules::execute(args, ctx.settings).await,
            Commands::Config => cmd_config::execute(ctx.settings).await,
            Commands::Version(action) => cmd_version::execute(action, ctx.settings).await,
        }
    }
}
