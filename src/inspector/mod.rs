mod json_inspector;
pub mod postgres_inspector;

pub use json_inspector::{JsonSchemaInspector, SchemaDump};
pub use postgres_inspector::PostgresInspector;

use crate::{entities::TableDefinition, errors::InspectorError};

/// Source of live table definitions.
///
/// `schema` selects a database schema; `None` means the connection's current one.
pub trait SchemaInspector: Send + Sync {
    fn current_schema(&self) -> Result<String, InspectorError>;

    fn get_tables(&self, schema: Option<&str>) -> Result<Vec<TableDefinition>, InspectorError>;

    fn get_table(
        &self,
        name: &str,
        schema: Option<&str>,
    ) -> Result<Option<TableDefinition>, InspectorError> {
        Ok(self
            .get_tables(schema)?
            .into_iter()
            .find(|table| table.name == name))
    }

    fn table_names(&self, schema: Option<&str>) -> Result<Vec<String>, InspectorError> {
        Ok(self
            .get_tables(schema)?
            .into_iter()
            .map(|table| table.name)
            .collect())
    }

    fn table_exists(&self, name: &str, schema: Option<&str>) -> Result<bool, InspectorError> {
        Ok(self.get_table(name, schema)?.is_some())
    }
}
