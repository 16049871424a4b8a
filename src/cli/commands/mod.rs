pub mod cmd_analyze;
pub mod cmd_check;
pub mod cmd_config;
pub mod cmd_dry_run;
pub mod cmd_rules;
pub mod cmd_snapshots;
pub mod cmd_version;

use std::process::ExitCode;

use clap::Subcommand;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::{
    cli::{
        Context,
        commands::{
            cmd_analyze::AnalyzeArgs, cmd_check::CheckArgs, cmd_dry_run::DryRunArgs,
            cmd_rules::RulesArgs, cmd_snapshots::SnapshotCommands, cmd_version::VersionCommand,
        },
    },
    utils::ProgressReporter,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze migrations for dangerous operations
    Analyze(AnalyzeArgs),

    /// Check for schema drift between the database and the baseline snapshot
    Check(CheckArgs),

    /// Simulate migrations without executing them
    DryRun(DryRunArgs),

    /// Manage saved schema snapshots
    Snapshots {
        #[command(subcommand)]
        action: SnapshotCommands,
    },

    /// Show the active safety rules
    Rules(RulesArgs),

    /// Print the effective configuration
    Config,

    /// Print version
    Version(VersionCommand),
}

pub trait ExitOnErr<T> {
    fn exit_on_err(self, msg: &str) -> T;
}

impl<T, E: std::fmt::Display> ExitOnErr<T> for Result<T, E> {
    fn exit_on_err(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("❌ {}: {}", msg, e);
                std::process::exit(1);
            }
        }
    }
}

/// Refuse to run when the tool has been switched off in configuration.
pub fn ensure_enabled(ctx: &Context<'_>) -> Result<(), ExitCode> {
    if ctx.settings.enabled {
        return Ok(());
    }
    eprintln!(
        "{}",
        "⚠️  SchemaGuard is disabled. Enable it with SCHEMA_GUARD__ENABLED=true".yellow()
    );
    Err(ExitCode::FAILURE)
}

/// Spinner whose message follows the returned reporter. Hidden when `visible` is false.
pub fn new_spinner(message: impl Into<String>, visible: bool) -> (ProgressBar, ProgressReporter) {
    let spinner = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };

    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let spinner_clone = spinner.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            spinner_clone.set_message(msg);
        }
    });

    (spinner, ProgressReporter::new(Some(tx)))
}

pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("❌ Failed to serialize output: {}", err),
    }
}
