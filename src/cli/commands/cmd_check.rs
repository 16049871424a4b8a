use std::{path::Path, process::ExitCode};

use clap::Args;
use colored::Colorize;
use itertools::Itertools;

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, ensure_enabled, new_spinner, print_json},
    },
    drift::DriftReport,
    entities::SchemaSnapshot,
    services::DriftCheck,
};

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    schema-guard check
    schema-guard check --save
    schema-guard check --schema reporting --json")]
pub struct CheckArgs {
    /// Save the current schema as the new baseline snapshot
    #[arg(long)]
    pub save: bool,

    /// Schema to inspect instead of the configured one
    #[arg(long)]
    pub schema: Option<String>,

    /// Emit the drift check as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: &CheckArgs, ctx: &Context<'_>) -> ExitCode {
    if let Err(code) = ensure_enabled(ctx) {
        return code;
    }

    if !args.json {
        println!("{}", "🔍 Checking for schema drift...".green());
        println!();
    }

    if args.save {
        return save_snapshot(args, ctx);
    }

    let service = &ctx.services.drift_service;
    let (spinner, _) = new_spinner("Capturing live schema...", !args.json);
    let check = service.detect_drift(args.schema.as_deref());
    spinner.finish_and_clear();
    let check = check.exit_on_err("Failed to detect schema drift");
    let saved = service
        .ensure_baseline(&check)
        .exit_on_err("Failed to save baseline snapshot");

    if args.json {
        print_json(&serde_json::json!({ "check": check, "saved_baseline": saved }));
        return exit_code(&check);
    }

    match &check {
        DriftCheck::NoBaseline { message, current } => {
            println!("{}", message.yellow());
            match &saved {
                Some(id) => print_saved(ctx, id, current),
                None => println!(
                    "{}",
                    "💡 Run schema-guard check --save to record a baseline.".dimmed()
                ),
            }
        }
        DriftCheck::Compared { report, .. } if !report.has_drift => {
            println!("{}", "✅ No schema drift detected!".green());
            println!("{}", "Your database schema matches the expected state.".green());
        }
        DriftCheck::Compared { report, .. } => display_drift(report),
    }

    exit_code(&check)
}

fn save_snapshot(args: &CheckArgs, ctx: &Context<'_>) -> ExitCode {
    let service = &ctx.services.drift_service;

    if !args.json {
        println!("{}", "💾 Creating schema snapshot...".green());
    }

    let snapshot = service
        .create_snapshot(args.schema.as_deref())
        .exit_on_err("Failed to capture schema");
    let id = service
        .save_snapshot(&snapshot)
        .exit_on_err("Failed to save schema snapshot");

    if args.json {
        print_json(&serde_json::json!({ "id": id, "snapshot": snapshot }));
        return ExitCode::SUCCESS;
    }

    print_saved(ctx, &id, &snapshot);
    ExitCode::SUCCESS
}

fn print_saved(ctx: &Context<'_>, id: &str, snapshot: &SchemaSnapshot) {
    let file = Path::new(&ctx.settings.drift.snapshot_path).join(id);
    println!("{}", "✅ Schema snapshot saved successfully!".green());
    println!("   Tables: {}", snapshot.tables.len());
    println!("   Connection: {}", snapshot.connection);
    println!("   File: {}", file.display());
}

fn display_drift(report: &DriftReport) {
    println!("{}", "❌ Schema drift detected!".red().bold());
    println!();

    let summary = &report.summary;

    if summary.tables_added > 0 {
        println!(
            "{}",
            format!("📊 Tables Added: {}", summary.tables_added).yellow()
        );
        for table in &report.added_tables {
            println!("   • {}", table);
        }
        println!();
    }

    if summary.tables_removed > 0 {
        println!(
            "{}",
            format!("📊 Tables Removed: {}", summary.tables_removed).red()
        );
        for table in &report.removed_tables {
            println!("   • {}", table);
        }
        println!();
    }

    if summary.tables_modified > 0 {
        println!(
            "{}",
            format!("📊 Tables Modified: {}", summary.tables_modified).yellow()
        );
        for (table, diff) in &report.modified_tables {
            println!("   • {}", table);
            print_names("Added columns", diff.added_columns.iter());
            print_names("Removed columns", diff.removed_columns.iter());
            print_names("Modified columns", diff.modified_columns.keys());
            print_names("Added indexes", diff.added_indexes.iter());
            print_names("Removed indexes", diff.removed_indexes.iter());
            print_names("Modified indexes", diff.modified_indexes.keys());
            print_names("Added foreign keys", diff.added_foreign_keys.iter());
            print_names("Removed foreign keys", diff.removed_foreign_keys.iter());
            print_names("Modified foreign keys", diff.modified_foreign_keys.keys());
        }
        println!();
    }

    println!("Total changes: {}", summary.total_changes);
    println!();
    println!(
        "{}",
        "💡 Tip: Run migrations to sync your database, or update your snapshot:".dimmed()
    );
    println!("{}", "   schema-guard check --save".dimmed());
}

fn print_names<'a>(label: &str, names: impl Iterator<Item = &'a String>) {
    if let Some(joined) = join_names(names) {
        println!("      {}: {}", label, joined);
    }
}

fn join_names<'a>(mut names: impl Iterator<Item = &'a String>) -> Option<String> {
    let joined = names.join(", ");
    (!joined.is_empty()).then_some(joined)
}

fn exit_code(check: &DriftCheck) -> ExitCode {
    if check.has_drift() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
