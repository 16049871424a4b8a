use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    config::DriftConfig,
    drift::{self, DriftReport},
    entities::SchemaSnapshot,
    errors::DriftError,
    inspector::SchemaInspector,
    repo::{SnapshotStore, StoredSnapshot},
};

pub const NO_BASELINE_MESSAGE: &str =
    "No baseline snapshot found. Current schema will be used as baseline.";

/// Outcome of checking the live schema against the latest baseline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriftCheck {
    NoBaseline {
        message: String,
        current: SchemaSnapshot,
    },
    Compared {
        report: DriftReport,
        baseline: SchemaSnapshot,
        current: SchemaSnapshot,
    },
}

impl DriftCheck {
    pub fn has_drift(&self) -> bool {
        match self {
            DriftCheck::NoBaseline { .. } => false,
            DriftCheck::Compared { report, .. } => report.has_drift,
        }
    }

    pub fn current_snapshot(&self) -> &SchemaSnapshot {
        match self {
            DriftCheck::NoBaseline { current, .. } | DriftCheck::Compared { current, .. } => {
                current
            }
        }
    }

    pub fn report(&self) -> Option<&DriftReport> {
        match self {
            DriftCheck::NoBaseline { .. } => None,
            DriftCheck::Compared { report, .. } => Some(report),
        }
    }
}

/// Service layer for snapshot capture and drift detection
pub struct DriftService {
    inspector: Arc<dyn SchemaInspector>,
    store: Arc<dyn SnapshotStore>,
    connection: String,
    schema: Option<String>,
    config: DriftConfig,
}

impl DriftService {
    pub fn new(
        inspector: Arc<dyn SchemaInspector>,
        store: Arc<dyn SnapshotStore>,
        connection: impl Into<String>,
        schema: Option<String>,
        config: DriftConfig,
    ) -> Self {
        Self {
            inspector,
            store,
            connection: connection.into(),
            schema,
            config,
        }
    }

    /// Capture the live schema, minus excluded tables.
    ///
    /// `schema` overrides the configured schema for this capture only.
    pub fn create_snapshot(&self, schema: Option<&str>) -> Result<SchemaSnapshot, DriftError> {
        let schema = schema.or(self.schema.as_deref());
        let tables: Vec<_> = self
            .inspector
            .get_tables(schema)?
            .into_iter()
            .filter(|table| !self.config.is_excluded(&table.name))
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert("table_count".to_string(), json!(tables.len()));
        if let Some(schema) = schema {
            metadata.insert("schema".to_string(), json!(schema));
        }

        debug!(tables = tables.len(), "Captured live schema");
        Ok(SchemaSnapshot::new(&self.connection, tables, metadata))
    }

    pub fn detect_drift(&self, schema: Option<&str>) -> Result<DriftCheck, DriftError> {
        let current = self.create_snapshot(schema)?;

        let Some(baseline) = self.store.latest_snapshot()? else {
            info!("No baseline snapshot found");
            return Ok(DriftCheck::NoBaseline {
                message: NO_BASELINE_MESSAGE.to_string(),
                current,
            });
        };

        let report = self.compare_snapshots(&baseline, &current);
        info!(
            has_drift = report.has_drift,
            total_changes = report.summary.total_changes,
            "Compared schema against baseline"
        );

        Ok(DriftCheck::Compared {
            report,
            baseline,
            current,
        })
    }

    /// Compare two snapshots using the configured component switches.
    pub fn compare_snapshots(
        &self,
        expected: &SchemaSnapshot,
        actual: &SchemaSnapshot,
    ) -> DriftReport {
        drift::compare_snapshots_with(expected, actual, self.config.components())
    }

    pub fn has_drift(&self) -> Result<bool, DriftError> {
        Ok(self.detect_drift(None)?.has_drift())
    }

    /// Save the captured schema as the first baseline when none exists and
    /// `auto_snapshot` is on. Returns the new snapshot id when one was written.
    pub fn ensure_baseline(&self, check: &DriftCheck) -> Result<Option<String>, DriftError> {
        match check {
            DriftCheck::NoBaseline { current, .. } if self.config.auto_snapshot => {
                let id = self.save_snapshot(current)?;
                info!(id = %id, "Saved baseline snapshot");
                Ok(Some(id))
            }
            _ => Ok(None),
        }
    }

    pub fn save_snapshot(&self, snapshot: &SchemaSnapshot) -> Result<String, DriftError> {
        Ok(self.store.save_snapshot(snapshot)?)
    }

    pub fn latest_snapshot(&self) -> Result<Option<SchemaSnapshot>, DriftError> {
        Ok(self.store.latest_snapshot()?)
    }

    pub fn all_snapshots(&self) -> Result<Vec<StoredSnapshot>, DriftError> {
        Ok(self.store.all_snapshots()?)
    }

    pub fn snapshot(&self, id: &str) -> Result<Option<SchemaSnapshot>, DriftError> {
        Ok(self.store.snapshot(id)?)
    }

    pub fn prune_snapshots(&self, keep: usize) -> Result<usize, DriftError> {
        Ok(self.store.prune_snapshots(keep)?)
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }
}
