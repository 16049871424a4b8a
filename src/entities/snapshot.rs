use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{TableDefinition, content_hash};

/// Point-in-time capture of a database's table definitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub created_at: DateTime<Utc>,
    pub connection: String,

    #[serde(default)]
    pub tables: Vec<TableDefinition>,

    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct Fingerprint<'a> {
    connection: &'a str,
    tables: Vec<String>,
}

impl SchemaSnapshot {
    pub fn new(
        connection: impl Into<String>,
        tables: Vec<TableDefinition>,
        metadata: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            connection: connection.into(),
            tables,
            metadata,
        }
    }

    /// First table carrying the given name.
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Digest over the connection and every table's content hash.
    ///
    /// `created_at` and `metadata` are excluded so two captures of the same
    /// schema fingerprint identically.
    pub fn hash(&self) -> String {
        content_hash(&Fingerprint {
            connection: &self.connection,
            tables: self.tables.iter().map(|t| t.hash()).collect(),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
