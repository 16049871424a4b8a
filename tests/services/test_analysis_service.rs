use anyhow::Result;
use schema_guard::{
    repo::MigrationRepository,
    types::{DangerLevel, OperationType},
    utils::ProgressReporter,
};

use crate::common::{analysis_service, fixture, migrations_dir};

const ALTER_USERS: &str = "2024_01_01_000001_alter_users_table.php";
const CREATE_AUDIT: &str = "2024_01_01_000002_create_audit_table.php";
const DANGEROUS: &str = "2024_01_01_000003_dangerous_operations.php";
const EMPTY: &str = "2024_01_01_000004_add_settings_note.php";

#[tokio::test]
async fn test_analyze_dangerous_fixture() -> Result<()> {
    let dir = migrations_dir(&[DANGEROUS])?;
    let service = analysis_service(&dir, &[])?;

    let operations = service.analyze(&dir.path().join(DANGEROUS));

    let kinds: Vec<_> = operations.iter().map(|op| op.operation_type).collect();
    assert_eq!(
        kinds,
        vec![
            OperationType::DropTableIfExists,
            OperationType::DropColumn,
            OperationType::DropIndex,
        ]
    );

    assert_eq!(operations[0].table_name, "old_logs");
    assert_eq!(operations[0].line_number, 11);
    assert_eq!(operations[1].column_name.as_deref(), Some("old_field"));
    assert_eq!(operations[1].line_number, 14);
    assert_eq!(operations[2].index_name.as_deref(), Some("posts_status_index"));

    assert_eq!(service.danger_level(&fixture(DANGEROUS)), DangerLevel::Critical);
    assert!(service.has_dangerous_operations(&fixture(DANGEROUS)));

    Ok(())
}

#[tokio::test]
async fn test_analyze_alter_fixture() -> Result<()> {
    let dir = migrations_dir(&[ALTER_USERS])?;
    let service = analysis_service(&dir, &[])?;

    let operations = service.analyze(&dir.path().join(ALTER_USERS));

    let kinds: Vec<_> = operations.iter().map(|op| op.operation_type).collect();
    assert_eq!(
        kinds,
        vec![
            OperationType::ChangeColumn,
            OperationType::RenameColumn,
            OperationType::AddIndex,
        ]
    );

    let rename = &operations[1];
    assert_eq!(rename.table_name, "name");
    assert_eq!(rename.column_name.as_deref(), Some("full_name"));
    assert_eq!(rename.line_number, 13);

    assert_eq!(service.danger_level(&fixture(ALTER_USERS)), DangerLevel::High);

    Ok(())
}

#[tokio::test]
async fn test_analyze_missing_file_is_empty() -> Result<()> {
    let dir = migrations_dir(&[])?;
    let service = analysis_service(&dir, &[])?;

    let missing = dir.path().join("nope.php");
    assert!(service.analyze(&missing).is_empty());
    assert_eq!(service.danger_level(&missing), DangerLevel::Safe);
    assert!(!service.has_dangerous_operations(&missing));

    Ok(())
}

#[tokio::test]
async fn test_pending_migrations_exclude_applied() -> Result<()> {
    let dir = migrations_dir(&[ALTER_USERS, CREATE_AUDIT, DANGEROUS, EMPTY])?;
    let service = analysis_service(&dir, &["2024_01_01_000001_alter_users_table"])?;

    let pending: Vec<_> = service
        .pending_migrations()?
        .iter()
        .map(|p| MigrationRepository::migration_name(p))
        .collect();

    assert_eq!(
        pending,
        vec![
            "2024_01_01_000002_create_audit_table",
            "2024_01_01_000003_dangerous_operations",
            "2024_01_01_000004_add_settings_note",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_analyze_pending_keeps_only_files_with_operations() -> Result<()> {
    let dir = migrations_dir(&[ALTER_USERS, CREATE_AUDIT, DANGEROUS, EMPTY])?;
    let service = analysis_service(&dir, &[ALTER_USERS])?;

    let results = service
        .analyze_pending_migrations(&ProgressReporter::silent())
        .await?;

    let names: Vec<_> = results
        .keys()
        .map(|p| MigrationRepository::migration_name(p))
        .collect();
    assert_eq!(
        names,
        vec![
            "2024_01_01_000002_create_audit_table",
            "2024_01_01_000003_dangerous_operations",
        ]
    );

    let create_ops = &results[&dir.path().join(CREATE_AUDIT)];
    assert_eq!(create_ops.len(), 1);
    assert_eq!(create_ops[0].operation_type, OperationType::CreateTable);
    assert_eq!(create_ops[0].table_name, "audit_entries");

    Ok(())
}

#[tokio::test]
async fn test_analyze_pending_with_nothing_pending() -> Result<()> {
    let dir = migrations_dir(&[DANGEROUS])?;
    let service = analysis_service(&dir, &[DANGEROUS])?;

    let results = service
        .analyze_pending_migrations(&ProgressReporter::silent())
        .await?;
    assert!(results.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_resolve_migration_by_path_and_name() -> Result<()> {
    let dir = migrations_dir(&[ALTER_USERS, DANGEROUS])?;
    let service = analysis_service(&dir, &[])?;

    let by_path = service.resolve_migration(&fixture(DANGEROUS).display().to_string())?;
    assert_eq!(by_path, Some(fixture(DANGEROUS)));

    let by_name = service.resolve_migration("alter_users")?;
    assert_eq!(by_name, Some(dir.path().join(ALTER_USERS)));

    assert_eq!(service.resolve_migration("does_not_exist")?, None);

    Ok(())
}
