use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{entities::TableDefinition, errors::InspectorError, inspector::SchemaInspector};

/// Schema export produced by a driver-specific dump tool.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDump {
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

fn default_schema() -> String {
    "public".to_string()
}

/// Inspector backed by a JSON schema dump on disk, re-read on every call.
pub struct JsonSchemaInspector {
    path: PathBuf,
}

impl JsonSchemaInspector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SchemaDump, InspectorError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| InspectorError::Io {
            path: self.path.clone(),
            source,
        })?;

        let dump: SchemaDump =
            serde_json::from_str(&content).map_err(|source| InspectorError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            schema = %dump.schema,
            tables = dump.tables.len(),
            "Loaded schema dump"
        );
        Ok(dump)
    }
}

impl SchemaInspector for JsonSchemaInspector {
    fn current_schema(&self) -> Result<String, InspectorError> {
        Ok(self.load()?.schema)
    }

    fn get_tables(&self, schema: Option<&str>) -> Result<Vec<TableDefinition>, InspectorError> {
        let dump = self.load()?;

        match schema {
            Some(requested) if requested != dump.schema => Err(InspectorError::UnknownSchema {
                requested: requested.to_string(),
                available: dump.schema,
            }),
            _ => Ok(dump.tables),
        }
    }
}
