use std::path::Path;

use anyhow::Result;
use schema_guard::{
    config::Settings,
    entities::ColumnDefinition,
    errors::{DriftError, InspectorError},
    inspector::SchemaDump,
    services::{AppServices, DriftCheck},
};
use tempfile::TempDir;

use crate::common::{fixture, migrations_table, posts_table, users_table};

const UNREACHABLE_DATABASE: &str = "postgres://nobody@127.0.0.1:1/app";

fn write_dump(path: &Path, dump: &SchemaDump) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(dump)?)?;
    Ok(())
}

fn settings(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.database.schema_file = dir.path().join("schema.json").display().to_string();
    settings.drift.snapshot_path = dir.path().join("snapshots").display().to_string();
    settings.migrations.paths = Some(vec![dir.path().join("migrations").display().to_string()]);
    settings
}

#[tokio::test]
async fn test_snapshot_then_detect_drift_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let settings = settings(&dir);
    let schema_file = Path::new(&settings.database.schema_file);

    write_dump(
        schema_file,
        &SchemaDump {
            schema: "public".to_string(),
            tables: vec![users_table(), posts_table(), migrations_table()],
        },
    )?;

    let services = AppServices::new(&settings)?;
    let drift = &services.drift_service;

    assert!(matches!(drift.detect_drift(None)?, DriftCheck::NoBaseline { .. }));

    let baseline = drift.create_snapshot(None)?;
    let id = drift.save_snapshot(&baseline)?;
    assert!(id.starts_with("schema_snapshot_pgsql_"));
    assert!(Path::new(&settings.drift.snapshot_path).join(&id).is_file());
    assert_eq!(drift.snapshot(&id)?, Some(baseline.clone()));

    assert!(!drift.has_drift()?);

    let mut users = users_table();
    users.columns.push(ColumnDefinition::new("phone", "varchar").nullable(true));
    write_dump(
        schema_file,
        &SchemaDump {
            schema: "public".to_string(),
            tables: vec![users, migrations_table()],
        },
    )?;

    let check = drift.detect_drift(None)?;
    let report = check.report().expect("baseline exists");
    assert!(report.has_drift);
    assert_eq!(report.removed_tables, vec!["posts"]);
    assert_eq!(report.modified_tables["users"].added_columns, vec!["phone"]);
    assert_eq!(report.summary.total_changes, 2);

    Ok(())
}

#[tokio::test]
async fn test_unknown_schema_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let settings = settings(&dir);
    write_dump(
        Path::new(&settings.database.schema_file),
        &SchemaDump {
            schema: "public".to_string(),
            tables: vec![users_table()],
        },
    )?;

    let services = AppServices::new(&settings)?;
    let err = services
        .drift_service
        .detect_drift(Some("reporting"))
        .unwrap_err();

    assert!(matches!(
        err,
        DriftError::Inspector(InspectorError::UnknownSchema { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_missing_schema_dump_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let services = AppServices::new(&settings(&dir))?;

    assert!(services.drift_service.create_snapshot(None).is_err());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_database_url_keeps_explicit_ledger() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut settings = settings(&dir);

    let migrations = dir.path().join("migrations");
    std::fs::create_dir(&migrations)?;
    for name in [
        "2024_01_01_000001_alter_users_table.php",
        "2024_01_01_000002_create_audit_table.php",
    ] {
        std::fs::copy(fixture(name), migrations.join(name))?;
    }
    let ledger = dir.path().join("applied.txt");
    std::fs::write(&ledger, "2024_01_01_000001_alter_users_table\n")?;

    settings.database.url = Some(UNREACHABLE_DATABASE.to_string());
    settings.migrations.ledger = Some(ledger.display().to_string());

    // the pool is lazy, so building services never touches the database
    let services = AppServices::new(&settings)?;
    let pending = services.analysis_service.pending_migrations()?;

    assert_eq!(pending.len(), 1);
    assert!(pending[0].ends_with("2024_01_01_000002_create_audit_table.php"));

    Ok(())
}

#[tokio::test]
async fn test_database_url_needs_multi_threaded_runtime() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut settings = settings(&dir);
    settings.database.url = Some(UNREACHABLE_DATABASE.to_string());

    assert!(AppServices::new(&settings).is_err());

    Ok(())
}
