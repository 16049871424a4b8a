use serde::{Deserialize, Serialize};

use crate::types::{DangerLevel, OperationType};

/// A single schema mutation recognised in a migration script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOperation {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub table_name: String,
    pub column_name: Option<String>,
    pub index_name: Option<String>,

    /// 1-based line in the source script.
    pub line_number: usize,
    pub raw_code: Option<String>,
}

/// Flattened view of an operation together with its derived risk attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDetail {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub table: String,
    pub column: Option<String>,
    pub index: Option<String>,
    pub line_number: usize,
    pub danger_level: DangerLevel,
    pub is_destructive: bool,
    pub requires_backup: bool,
    pub description: String,
    pub warning: Option<String>,
}

impl MigrationOperation {
    pub fn new(operation_type: OperationType, table_name: impl Into<String>, line_number: usize) -> Self {
        Self {
            operation_type,
            table_name: table_name.into(),
            column_name: None,
            index_name: None,
            line_number,
            raw_code: None,
        }
    }

    pub fn with_column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_raw_code(mut self, raw_code: impl Into<String>) -> Self {
        self.raw_code = Some(raw_code.into());
        self
    }

    pub fn danger_level(&self) -> DangerLevel {
        self.operation_type.danger_level()
    }

    pub fn is_destructive(&self) -> bool {
        self.operation_type.is_destructive()
    }

    pub fn requires_backup(&self) -> bool {
        self.operation_type.requires_backup()
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.operation_type.warning()
    }

    pub fn description(&self) -> String {
        let base = self.operation_type.description();
        let target = self
            .column_name
            .as_deref()
            .or(self.index_name.as_deref())
            .filter(|t| !t.is_empty());

        match target {
            Some(target) => format!("{}: {}.{}", base, self.table_name, target),
            None => format!("{}: {}", base, self.table_name),
        }
    }

    pub fn detail(&self) -> OperationDetail {
        OperationDetail {
            operation_type: self.operation_type,
            table: self.table_name.clone(),
            column: self.column_name.clone(),
            index: self.index_name.clone(),
            line_number: self.line_number,
            danger_level: self.danger_level(),
            is_destructive: self.is_destructive(),
            requires_backup: self.requires_backup(),
            description: self.description(),
            warning: self.warning().map(str::to_string),
        }
    }
}
