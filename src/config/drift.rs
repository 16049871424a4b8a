use serde::{Deserialize, Serialize};

use crate::{drift::Components, utils::serde::deserialize_opt_vec_from_string};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DriftConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Tables never captured in snapshots
    #[serde(
        default = "default_excluded_tables",
        deserialize_with = "deserialize_opt_vec_from_string"
    )]
    pub excluded_tables: Option<Vec<String>>,

    /// Save the current schema as baseline when none exists yet
    #[serde(default = "default_true")]
    pub auto_snapshot: bool,

    #[serde(default = "default_keep_snapshots")]
    pub keep_snapshots: usize,

    #[serde(default = "default_true")]
    pub check_columns: bool,

    #[serde(default = "default_true")]
    pub check_indexes: bool,

    #[serde(default = "default_true")]
    pub check_foreign_keys: bool,
}

fn default_true() -> bool {
    true
}

fn default_snapshot_path() -> String {
    "./schema-snapshots".to_string()
}

fn default_excluded_tables() -> Option<Vec<String>> {
    Some(vec!["migrations".to_string()])
}

fn default_keep_snapshots() -> usize {
    10
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            excluded_tables: default_excluded_tables(),
            auto_snapshot: default_true(),
            keep_snapshots: default_keep_snapshots(),
            check_columns: default_true(),
            check_indexes: default_true(),
            check_foreign_keys: default_true(),
        }
    }
}

impl DriftConfig {
    pub fn is_excluded(&self, table_name: &str) -> bool {
        self.excluded_tables
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|t| t == table_name)
    }

    pub fn components(&self) -> Components {
        Components {
            columns: self.check_columns,
            indexes: self.check_indexes,
            foreign_keys: self.check_foreign_keys,
        }
    }
}
