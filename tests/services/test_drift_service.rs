use std::sync::Arc;

use anyhow::Result;
use schema_guard::{
    config::DriftConfig,
    entities::{ColumnDefinition, IndexDefinition},
    services::{DriftCheck, drift_service::NO_BASELINE_MESSAGE},
};
use serde_json::json;

use crate::common::{
    MemoryStore, MockInspector, drift_service, migrations_table, posts_table, users_table,
};

#[tokio::test]
async fn test_no_baseline() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector, store.clone(), DriftConfig::default());

    let check = service.detect_drift(None)?;

    let DriftCheck::NoBaseline { message, current } = &check else {
        panic!("expected no baseline, got {:?}", check);
    };
    assert_eq!(message, NO_BASELINE_MESSAGE);
    assert!(message.contains("No baseline snapshot"));
    assert_eq!(current.table_names(), vec!["users"]);
    assert!(!check.has_drift());
    assert!(check.report().is_none());

    // detection never writes a baseline on its own
    assert_eq!(store.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_ensure_baseline_saves_first_snapshot() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector, store.clone(), DriftConfig::default());

    let check = service.detect_drift(None)?;
    let saved = service.ensure_baseline(&check)?;

    assert_eq!(saved.as_deref(), Some("snapshot-1"));
    assert_eq!(store.len(), 1);

    // once a baseline exists nothing more is written
    let check = service.detect_drift(None)?;
    assert!(check.report().is_some());
    assert_eq!(service.ensure_baseline(&check)?, None);
    assert_eq!(store.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_ensure_baseline_respects_auto_snapshot() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());
    let config = DriftConfig {
        auto_snapshot: false,
        ..Default::default()
    };
    let service = drift_service(inspector, store.clone(), config);

    let check = service.detect_drift(None)?;
    assert_eq!(service.ensure_baseline(&check)?, None);
    assert_eq!(store.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_identical_schema_has_no_drift() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table(), posts_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector, store, DriftConfig::default());

    let baseline = service.create_snapshot(None)?;
    service.save_snapshot(&baseline)?;

    let check = service.detect_drift(None)?;
    let report = check.report().expect("compared against baseline");

    assert!(!report.has_drift);
    assert_eq!(report.summary.total_changes, 0);
    assert!(!service.has_drift()?);

    Ok(())
}

#[tokio::test]
async fn test_removed_table() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table(), posts_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector.clone(), store, DriftConfig::default());

    service.save_snapshot(&service.create_snapshot(None)?)?;
    inspector.set_tables(vec![users_table()]);

    let check = service.detect_drift(None)?;
    let report = check.report().expect("compared against baseline");

    assert!(report.has_drift);
    assert_eq!(report.removed_tables, vec!["posts"]);
    assert!(report.added_tables.is_empty());
    assert_eq!(report.summary.tables_removed, 1);
    assert_eq!(report.summary.total_changes, 1);

    Ok(())
}

#[tokio::test]
async fn test_added_tables_are_sorted() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector.clone(), store, DriftConfig::default());

    service.save_snapshot(&service.create_snapshot(None)?)?;
    inspector.set_tables(vec![users_table(), posts_table()]);

    let report = service
        .detect_drift(None)?
        .report()
        .cloned()
        .expect("compared against baseline");

    assert_eq!(report.added_tables, vec!["posts", "users"]);
    assert_eq!(report.summary.tables_added, 2);
    assert!(service.has_drift()?);

    Ok(())
}

#[tokio::test]
async fn test_nullable_change_is_modified_column() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector.clone(), store, DriftConfig::default());

    service.save_snapshot(&service.create_snapshot(None)?)?;

    let mut users = users_table();
    users.columns[1] = ColumnDefinition::new("email", "varchar")
        .with_length(255)
        .nullable(true);
    inspector.set_tables(vec![users]);

    let report = service
        .detect_drift(None)?
        .report()
        .cloned()
        .expect("compared against baseline");

    assert!(report.has_drift);
    assert_eq!(report.summary.tables_modified, 1);

    let diff = &report.modified_tables["users"];
    let change = &diff.modified_columns["email"];
    assert!(!change.expected.nullable);
    assert!(change.actual.nullable);
    assert!(diff.added_columns.is_empty());
    assert!(diff.removed_columns.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_index_drift_respects_components() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());

    let mut with_index = users_table();
    with_index
        .indexes
        .push(IndexDefinition::new("users_name_index", &["name"]));

    let checking = drift_service(inspector.clone(), store.clone(), DriftConfig::default());
    checking.save_snapshot(&checking.create_snapshot(None)?)?;
    inspector.set_tables(vec![with_index]);

    let report = checking
        .detect_drift(None)?
        .report()
        .cloned()
        .expect("compared against baseline");
    assert_eq!(
        report.modified_tables["users"].added_indexes,
        vec!["users_name_index"]
    );

    let ignoring = drift_service(
        inspector,
        store,
        DriftConfig {
            check_indexes: false,
            ..Default::default()
        },
    );
    assert!(!ignoring.has_drift()?);

    Ok(())
}

#[tokio::test]
async fn test_excluded_tables_are_not_captured() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table(), migrations_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector, store, DriftConfig::default());

    let snapshot = service.create_snapshot(Some("public"))?;

    assert_eq!(snapshot.table_names(), vec!["users"]);
    assert_eq!(snapshot.connection, "pgsql");
    assert_eq!(snapshot.metadata["table_count"], json!(1));
    assert_eq!(snapshot.metadata["schema"], json!("public"));

    Ok(())
}

#[tokio::test]
async fn test_latest_snapshot_is_baseline() -> Result<()> {
    let inspector = Arc::new(MockInspector::new(vec![users_table()]));
    let store = Arc::new(MemoryStore::default());
    let service = drift_service(inspector.clone(), store, DriftConfig::default());

    service.save_snapshot(&service.create_snapshot(None)?)?;
    inspector.set_tables(vec![users_table(), posts_table()]);
    service.save_snapshot(&service.create_snapshot(None)?)?;

    let latest = service.latest_snapshot()?.expect("two snapshots saved");
    assert_eq!(latest.table_names(), vec!["users", "posts"]);
    assert!(!service.has_drift()?);

    assert_eq!(service.all_snapshots()?.len(), 2);
    assert_eq!(service.prune_snapshots(1)?, 1);
    assert_eq!(service.all_snapshots()?.len(), 1);

    Ok(())
}
