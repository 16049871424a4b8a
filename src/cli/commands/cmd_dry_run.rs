use std::{path::Path, process::ExitCode};

use clap::Args;
use colored::Colorize;

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, ensure_enabled},
    },
    entities::MigrationOperation,
    utils::{display_name, indent_lines},
};

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    schema-guard dry-run
    schema-guard dry-run create_users --show-sql")]
pub struct DryRunArgs {
    /// Migration file or name fragment; all pending migrations when omitted
    pub migration: Option<String>,

    /// Show the schema statements each detected operation comes from
    #[arg(long)]
    pub show_sql: bool,
}

pub async fn execute(args: &DryRunArgs, ctx: &Context<'_>) -> ExitCode {
    if let Err(code) = ensure_enabled(ctx) {
        return code;
    }

    println!("{}", "🧪 Dry-run mode: Simulating migrations...".green());
    println!();

    let show_sql = args.show_sql || ctx.settings.dry_run.show_sql;

    match &args.migration {
        Some(migration) => dry_run_single(migration, show_sql, ctx),
        None => dry_run_pending(show_sql, ctx),
    }
}

fn dry_run_single(migration: &str, show_sql: bool, ctx: &Context<'_>) -> ExitCode {
    let service = &ctx.services.analysis_service;

    let Some(path) = service
        .resolve_migration(migration)
        .exit_on_err("Failed to resolve migration")
    else {
        eprintln!("{}", format!("Migration file not found: {}", migration).red());
        return ExitCode::FAILURE;
    };

    println!("{}", format!("📄 Analyzing: {}", display_name(&path)).green());
    println!();

    let operations = service.analyze(&path);
    if !operations.is_empty() {
        println!("{}", "⚠️  Dangerous operations detected:".yellow());
        for op in &operations {
            println!("   • {} (Line {})", op.description(), op.line_number);
        }
        println!();
    }

    if show_sql {
        println!("{}", "🔍 Statements that would be executed:".green());
        println!();
        print_statements(&path, &operations, 3);
        println!();
    }

    println!("{}", "✅ Dry-run completed successfully!".green());
    println!("{}", "💡 No changes were made to your database.".dimmed());
    ExitCode::SUCCESS
}

fn dry_run_pending(show_sql: bool, ctx: &Context<'_>) -> ExitCode {
    let service = &ctx.services.analysis_service;
    let pending = service
        .pending_migrations()
        .exit_on_err("Failed to list pending migrations");

    if pending.is_empty() {
        println!("{}", "✅ No pending migrations to dry-run.".green());
        return ExitCode::SUCCESS;
    }

    println!(
        "{}",
        format!("Found {} pending migration(s)", pending.len()).green()
    );
    println!();

    for path in &pending {
        println!("{}", format!("📄 {}", display_name(path)).green());

        let operations = service.analyze(path);
        if operations.is_empty() {
            println!("   ✅ Safe");
        } else {
            println!("{}", "   ⚠️  Dangerous operations:".yellow());
            for op in &operations {
                let line = format!("• {}", op.description());
                println!("      {}", line.color(op.danger_level().color()));
            }
        }

        if show_sql {
            println!();
            println!("   SQL:");
            print_statements(path, &operations, 6);
        }
        println!();
    }

    println!(
        "{}",
        "✅ Dry-run completed for all pending migrations!".green()
    );
    println!("{}", "💡 No changes were made to your database.".dimmed());
    ExitCode::SUCCESS
}

/// Source lines behind each detected operation, in file order.
fn print_statements(path: &Path, operations: &[MigrationOperation], indent: usize) {
    let statements: Vec<String> = operations
        .iter()
        .filter_map(|op| {
            op.raw_code
                .as_ref()
                .map(|code| format!("-- line {}\n{}", op.line_number, code))
        })
        .collect();

    if statements.is_empty() {
        println!(
            "{}",
            indent_lines(
                &format!("(no schema statements detected in {})", display_name(path)),
                indent
            )
            .dimmed()
        );
        return;
    }

    for statement in statements {
        println!("{}", indent_lines(&statement, indent));
    }
}
