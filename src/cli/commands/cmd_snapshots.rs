use std::process::ExitCode;

use clap::Subcommand;
use colored::Colorize;
use inquire::Confirm;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, print_json},
    },
    repo::StoredSnapshot,
};

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// List saved snapshots, newest first
    List,

    /// Show a saved snapshot
    Show {
        /// Snapshot file name as shown by `snapshots list`
        id: String,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all but the newest snapshots
    #[command(after_help = "EXAMPLES:
    schema-guard snapshots prune
    schema-guard snapshots prune --keep 3 -y")]
    Prune {
        /// Number of snapshots to keep, defaults to drift.keep_snapshots
        #[arg(long)]
        keep: Option<usize>,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Tables")]
    tables: usize,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
}

impl SnapshotRow {
    fn new(index: usize, stored: &StoredSnapshot) -> Self {
        let mut fingerprint = stored.snapshot.hash();
        fingerprint.truncate(12);
        Self {
            index,
            id: stored.id.clone(),
            created: stored
                .snapshot
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            connection: stored.snapshot.connection.clone(),
            tables: stored.snapshot.tables.len(),
            fingerprint,
        }
    }
}

pub async fn execute(action: &SnapshotCommands, ctx: &Context<'_>) -> ExitCode {
    match action {
        SnapshotCommands::List => list(ctx),
        SnapshotCommands::Show { id, json } => show(id, *json, ctx),
        SnapshotCommands::Prune { keep, yes } => prune(*keep, *yes, ctx),
    }
}

fn list(ctx: &Context<'_>) -> ExitCode {
    let snapshots = ctx
        .services
        .drift_service
        .all_snapshots()
        .exit_on_err("Failed to list snapshots");

    if snapshots.is_empty() {
        println!("No snapshots saved in {}", ctx.settings.drift.snapshot_path);
        return ExitCode::SUCCESS;
    }

    let rows: Vec<SnapshotRow> = snapshots
        .iter()
        .enumerate()
        .map(|(i, stored)| SnapshotRow::new(i + 1, stored))
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);

    ExitCode::SUCCESS
}

fn show(id: &str, json: bool, ctx: &Context<'_>) -> ExitCode {
    let snapshot = ctx
        .services
        .drift_service
        .snapshot(id)
        .exit_on_err(&format!("Failed to load snapshot '{}'", id));

    let Some(snapshot) = snapshot else {
        eprintln!("{}", format!("❌ Snapshot '{}' not found", id).red());
        return ExitCode::FAILURE;
    };

    if json {
        print_json(&snapshot);
        return ExitCode::SUCCESS;
    }

    println!("{}", format!("=== {} ===", id).blue());
    println!("Created:     {}", snapshot.created_at.to_rfc3339());
    println!("Connection:  {}", snapshot.connection);
    println!("Fingerprint: {}", snapshot.hash());
    println!("Tables:      {}", snapshot.tables.len());
    for table in &snapshot.tables {
        println!(
            "   • {} ({} columns, {} indexes, {} foreign keys)",
            table.name,
            table.columns.len(),
            table.indexes.len(),
            table.foreign_keys.len()
        );
    }

    ExitCode::SUCCESS
}

fn prune(keep: Option<usize>, yes: bool, ctx: &Context<'_>) -> ExitCode {
    let service = &ctx.services.drift_service;
    let keep = keep.unwrap_or(service.config().keep_snapshots);

    let proceed = yes
        || Confirm::new(&format!(
            "This will delete all but the newest {} snapshot(s). Continue?",
            keep
        ))
        .with_default(false)
        .prompt()
        .unwrap_or(false);

    if !proceed {
        println!("✅ Aborted");
        return ExitCode::SUCCESS;
    }

    let count = service
        .prune_snapshots(keep)
        .exit_on_err("Failed to prune snapshots");

    if count == 0 {
        println!("✅ No snapshots to delete");
    } else {
        println!("✅ Deleted {} snapshot(s)", count);
    }
    ExitCode::SUCCESS
}
