use std::{path::Path, process::ExitCode, time::Instant};

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, ensure_enabled, new_spinner, print_json},
    },
    entities::{MigrationOperation, OperationDetail},
    guard::{self, SafetyPolicy, Verdict},
    utils::{display_name, format_elapsed, indent_lines},
};

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    schema-guard analyze
    schema-guard analyze database/migrations/2024_01_01_000000_drop_legacy.php
    schema-guard analyze drop_legacy --json")]
pub struct AnalyzeArgs {
    /// Migration file or name fragment; all pending migrations when omitted
    pub migration: Option<String>,

    /// Emit the analysis as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not flag operations that strict mode would block
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct MigrationAnalysis {
    migration: String,
    operations: Vec<OperationDetail>,
    verdict: Verdict,
}

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Danger")]
    danger: String,
}

impl From<&MigrationOperation> for OperationRow {
    fn from(op: &MigrationOperation) -> Self {
        let target = match op.column_name.as_ref().or(op.index_name.as_ref()) {
            Some(target) => format!("{}.{}", op.table_name, target),
            None => op.table_name.clone(),
        };
        Self {
            line: op.line_number,
            operation: op.operation_type.to_string(),
            target,
            danger: op.danger_level().to_colored_string(),
        }
    }
}

pub async fn execute(args: &AnalyzeArgs, ctx: &Context<'_>) -> ExitCode {
    if let Err(code) = ensure_enabled(ctx) {
        return code;
    }

    if !args.json {
        println!(
            "{}",
            "🔍 Analyzing migrations for dangerous operations...".green()
        );
        println!();
    }

    match &args.migration {
        Some(migration) => analyze_single(migration, args, ctx),
        None => analyze_pending(args, ctx).await,
    }
}

fn analyze_single(migration: &str, args: &AnalyzeArgs, ctx: &Context<'_>) -> ExitCode {
    let service = &ctx.services.analysis_service;

    let Some(path) = service
        .resolve_migration(migration)
        .exit_on_err("Failed to resolve migration")
    else {
        eprintln!("{}", format!("Migration file not found: {}", migration).red());
        return ExitCode::FAILURE;
    };

    let operations = service.analyze(&path);
    let verdict = guard::validate(&operations);

    if args.json {
        print_json(&vec![to_analysis(&path, &operations, &verdict)]);
        return exit_code(&verdict);
    }

    if operations.is_empty() {
        println!(
            "{}",
            "✅ No dangerous operations detected in this migration.".green()
        );
        return ExitCode::SUCCESS;
    }

    let policy = SafetyPolicy::from(&ctx.settings.safety);
    display_analysis(&path, &operations, &verdict, &policy, args.force);

    exit_code(&verdict)
}

async fn analyze_pending(args: &AnalyzeArgs, ctx: &Context<'_>) -> ExitCode {
    let start = Instant::now();
    let (spinner, progress) = new_spinner("Scanning pending migrations...", !args.json);

    let results = ctx
        .services
        .analysis_service
        .analyze_pending_migrations(&progress)
        .await;
    spinner.finish_and_clear();

    let results = results.exit_on_err("Failed to analyze pending migrations");

    let verdicts: Vec<_> = results
        .iter()
        .map(|(path, operations)| (path, operations, guard::validate(operations)))
        .collect();
    let any_unsafe = verdicts.iter().any(|(_, _, verdict)| !verdict.is_safe);

    if args.json {
        let analyses: Vec<_> = verdicts
            .iter()
            .map(|(path, operations, verdict)| to_analysis(path, operations, verdict))
            .collect();
        print_json(&analyses);
        return if any_unsafe {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if results.is_empty() {
        println!("{}", "✅ No pending migrations to analyze.".green());
        return ExitCode::SUCCESS;
    }

    let policy = SafetyPolicy::from(&ctx.settings.safety);
    for (path, operations, verdict) in &verdicts {
        display_analysis(path, operations, verdict, &policy, args.force);
        println!();
    }

    println!(
        "Analyzed {} migration(s) in {}",
        verdicts.len(),
        format_elapsed(start.elapsed())
    );

    if any_unsafe {
        println!();
        println!(
            "{}",
            "⚠️  Some migrations contain dangerous operations!".yellow()
        );
        println!(
            "{}",
            "💡 Tip: Review and backup your database before running these migrations.".dimmed()
        );
        println!(
            "{}",
            "   Use: schema-guard dry-run to see what will be executed.".dimmed()
        );
        return ExitCode::FAILURE;
    }

    println!("{}", "✅ All pending migrations are safe.".green());
    ExitCode::SUCCESS
}

fn display_analysis(
    path: &Path,
    operations: &[MigrationOperation],
    verdict: &Verdict,
    policy: &SafetyPolicy,
    force: bool,
) {
    let color = verdict.danger_level.color();
    println!("📄 {}", display_name(path).color(color));
    println!(
        "   Danger Level: {}",
        verdict.danger_level.to_string().color(color)
    );

    let rows: Vec<OperationRow> = operations.iter().map(OperationRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", indent_lines(&table, 3));

    if !verdict.warnings.is_empty() {
        println!();
        println!("{}", "   Warnings:".yellow());
        for warning in &verdict.warnings {
            println!("   ⚠️  {} (Line {})", warning.operation, warning.line);
            println!("      {}", warning.message);
        }
    }

    if !verdict.destructive_operations.is_empty() {
        println!();
        println!("{}", "   Destructive Operations:".red());
        for operation in &verdict.destructive_operations {
            println!(
                "   ❌ {} (Line {})",
                operation.description, operation.line_number
            );
        }
    }

    if verdict.requires_backup {
        println!();
        println!(
            "{}",
            "   💾 BACKUP RECOMMENDED before running this migration!".yellow()
        );
    }

    if policy.confirmation_required(verdict) {
        println!();
        println!(
            "{}",
            "   ⛔ This migration requires manual confirmation to proceed.".red()
        );
    }

    let blocked: Vec<_> = operations
        .iter()
        .filter(|op| !guard::should_allow(op, force, policy))
        .collect();
    if !blocked.is_empty() {
        println!();
        println!(
            "{}",
            format!(
                "   Blocked in {} (strict mode), rerun with --force to acknowledge:",
                policy.environment
            )
            .red()
            .bold()
        );
        for op in blocked {
            println!("{}", indent_lines(&guard::confirmation_message(op), 3));
        }
    }
}

fn to_analysis(path: &Path, operations: &[MigrationOperation], verdict: &Verdict) -> MigrationAnalysis {
    MigrationAnalysis {
        migration: display_name(path),
        operations: operations.iter().map(MigrationOperation::detail).collect(),
        verdict: verdict.clone(),
    }
}

fn exit_code(verdict: &Verdict) -> ExitCode {
    if verdict.is_safe {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
