#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Result;
use schema_guard::{
    config::DriftConfig,
    entities::{
        ColumnDefinition, ForeignKeyDefinition, IndexDefinition, SchemaSnapshot, TableDefinition,
    },
    errors::{InspectorError, SnapshotError},
    inspector::SchemaInspector,
    repo::{MigrationRepository, SnapshotStore, StoredSnapshot},
    services::{AnalysisService, DriftService},
};
use tempfile::TempDir;

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/migrations");

pub fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

/// Copy the named fixtures into a fresh migrations directory.
pub fn migrations_dir(names: &[&str]) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for name in names {
        std::fs::copy(fixture(name), dir.path().join(name))?;
    }
    Ok(dir)
}

/// Analysis service over `dir`, treating the `applied` migrations as already run.
pub fn analysis_service(dir: &TempDir, applied: &[&str]) -> Result<AnalysisService> {
    let ledger = dir.path().join("applied.txt");
    std::fs::write(&ledger, applied.join("\n"))?;

    let repo = MigrationRepository::new(vec![dir.path().to_path_buf()], "php", Some(ledger));
    Ok(AnalysisService::new(Arc::new(repo)))
}

pub fn users_table() -> TableDefinition {
    TableDefinition::new("users")
        .with_column(ColumnDefinition::new("id", "bigint").auto_increment())
        .with_column(ColumnDefinition::new("email", "varchar").with_length(255))
        .with_column(ColumnDefinition::new("name", "varchar").nullable(true))
        .with_index(IndexDefinition::new("users_pkey", &["id"]).primary())
        .with_index(IndexDefinition::new("users_email_unique", &["email"]).unique())
}

pub fn posts_table() -> TableDefinition {
    TableDefinition::new("posts")
        .with_column(ColumnDefinition::new("id", "bigint").auto_increment())
        .with_column(ColumnDefinition::new("user_id", "bigint"))
        .with_column(ColumnDefinition::new("title", "varchar"))
        .with_foreign_key(
            ForeignKeyDefinition::new("posts_user_id_foreign", &["user_id"], "users", &["id"])
                .on_delete("cascade"),
        )
}

pub fn migrations_table() -> TableDefinition {
    TableDefinition::new("migrations")
        .with_column(ColumnDefinition::new("id", "integer").auto_increment())
        .with_column(ColumnDefinition::new("migration", "varchar"))
}

/// Inspector serving whatever tables the test puts in it.
#[derive(Default)]
pub struct MockInspector {
    tables: Mutex<Vec<TableDefinition>>,
}

impl MockInspector {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }

    pub fn set_tables(&self, tables: Vec<TableDefinition>) {
        *self.tables.lock().unwrap() = tables;
    }
}

impl SchemaInspector for MockInspector {
    fn current_schema(&self) -> Result<String, InspectorError> {
        Ok("public".to_string())
    }

    fn get_tables(&self, _schema: Option<&str>) -> Result<Vec<TableDefinition>, InspectorError> {
        Ok(self.tables.lock().unwrap().clone())
    }
}

/// Snapshot store kept in memory, newest last internally.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<Vec<StoredSnapshot>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }
}

impl SnapshotStore for MemoryStore {
    fn save_snapshot(&self, snapshot: &SchemaSnapshot) -> Result<String, SnapshotError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        let id = format!("snapshot-{}", snapshots.len() + 1);
        snapshots.push(StoredSnapshot {
            id: id.clone(),
            snapshot: snapshot.clone(),
        });
        Ok(id)
    }

    fn all_snapshots(&self) -> Result<Vec<StoredSnapshot>, SnapshotError> {
        Ok(self.snapshots.lock().unwrap().iter().rev().cloned().collect())
    }

    fn snapshot(&self, id: &str) -> Result<Option<SchemaSnapshot>, SnapshotError> {
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| stored.snapshot.clone()))
    }

    fn prune_snapshots(&self, keep: usize) -> Result<usize, SnapshotError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        let excess = snapshots.len().saturating_sub(keep);
        snapshots.drain(..excess);
        Ok(excess)
    }
}

pub fn drift_service(
    inspector: Arc<MockInspector>,
    store: Arc<MemoryStore>,
    config: DriftConfig,
) -> DriftService {
    DriftService::new(inspector, store, "pgsql", None, config)
}
