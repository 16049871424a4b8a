use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{ColumnDefinition, ForeignKeyDefinition, IndexDefinition};

/// Expected (baseline) and actual (live) versions of a changed element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change<T> {
    pub expected: T,
    pub actual: T,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_columns: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_columns: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified_columns: BTreeMap<String, Change<ColumnDefinition>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_indexes: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_indexes: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified_indexes: BTreeMap<String, Change<IndexDefinition>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added_foreign_keys: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_foreign_keys: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified_foreign_keys: BTreeMap<String, Change<ForeignKeyDefinition>>,
}

impl TableDiff {
    pub fn is_empty(&self) -> bool {
        self.added_columns.is_empty()
            && self.removed_columns.is_empty()
            && self.modified_columns.is_empty()
            && self.added_indexes.is_empty()
            && self.removed_indexes.is_empty()
            && self.modified_indexes.is_empty()
            && self.added_foreign_keys.is_empty()
            && self.removed_foreign_keys.is_empty()
            && self.modified_foreign_keys.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub tables_added: usize,
    pub tables_removed: usize,
    pub tables_modified: usize,
    pub total_changes: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub has_drift: bool,
    pub added_tables: Vec<String>,
    pub removed_tables: Vec<String>,
    pub modified_tables: BTreeMap<String, TableDiff>,
    pub summary: DriftSummary,
}

impl DriftReport {
    pub fn new(
        added_tables: Vec<String>,
        removed_tables: Vec<String>,
        modified_tables: BTreeMap<String, TableDiff>,
    ) -> Self {
        let summary = DriftSummary {
            tables_added: added_tables.len(),
            tables_removed: removed_tables.len(),
            tables_modified: modified_tables.len(),
            total_changes: added_tables.len() + removed_tables.len() + modified_tables.len(),
        };

        Self {
            has_drift: summary.total_changes > 0,
            added_tables,
            removed_tables,
            modified_tables,
            summary,
        }
    }
}
