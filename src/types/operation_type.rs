use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::types::DangerLevel;

/// Kinds of schema mutation a migration script can perform.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum OperationType {
    #[serde(rename = "createTable")]
    #[strum(serialize = "createTable")]
    CreateTable,

    #[serde(rename = "dropTable")]
    #[strum(serialize = "dropTable")]
    DropTable,

    #[serde(rename = "dropIfExists")]
    #[strum(serialize = "dropIfExists")]
    DropTableIfExists,

    #[serde(rename = "renameTable")]
    #[strum(serialize = "renameTable")]
    RenameTable,

    #[serde(rename = "addColumn")]
    #[strum(serialize = "addColumn")]
    AddColumn,

    #[serde(rename = "dropColumn")]
    #[strum(serialize = "dropColumn")]
    DropColumn,

    #[serde(rename = "modifyColumn")]
    #[strum(serialize = "modifyColumn")]
    ModifyColumn,

    #[serde(rename = "renameColumn")]
    #[strum(serialize = "renameColumn")]
    RenameColumn,

    #[serde(rename = "change")]
    #[strum(serialize = "change")]
    ChangeColumn,

    #[serde(rename = "addIndex")]
    #[strum(serialize = "addIndex")]
    AddIndex,

    #[serde(rename = "dropIndex")]
    #[strum(serialize = "dropIndex")]
    DropIndex,

    #[serde(rename = "addUnique")]
    #[strum(serialize = "addUnique")]
    AddUnique,

    #[serde(rename = "dropUnique")]
    #[strum(serialize = "dropUnique")]
    DropUnique,

    #[serde(rename = "addPrimary")]
    #[strum(serialize = "addPrimary")]
    AddPrimary,

    #[serde(rename = "dropPrimary")]
    #[strum(serialize = "dropPrimary")]
    DropPrimary,

    #[serde(rename = "addForeignKey")]
    #[strum(serialize = "addForeignKey")]
    AddForeignKey,

    #[serde(rename = "dropForeign")]
    #[strum(serialize = "dropForeign")]
    DropForeignKey,

    #[serde(rename = "truncate")]
    #[strum(serialize = "truncate")]
    Truncate,

    #[serde(rename = "alter")]
    #[strum(serialize = "alter")]
    Alter,

    #[serde(rename = "drop")]
    #[strum(serialize = "drop")]
    Drop,
}

impl OperationType {
    pub fn danger_level(&self) -> DangerLevel {
        match self {
            OperationType::DropTable
            | OperationType::DropTableIfExists
            | OperationType::Truncate
            | OperationType::DropColumn => DangerLevel::Critical,

            OperationType::DropPrimary
            | OperationType::DropForeignKey
            | OperationType::ModifyColumn
            | OperationType::ChangeColumn => DangerLevel::High,

            OperationType::DropIndex
            | OperationType::DropUnique
            | OperationType::RenameTable
            | OperationType::RenameColumn => DangerLevel::Medium,

            OperationType::AddColumn
            | OperationType::AddIndex
            | OperationType::AddUnique
            | OperationType::AddPrimary
            | OperationType::AddForeignKey => DangerLevel::Low,

            OperationType::CreateTable => DangerLevel::Safe,

            OperationType::Alter | OperationType::Drop => DangerLevel::Medium,
        }
    }

    /// Operations that irrecoverably remove data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            OperationType::DropTable
                | OperationType::DropTableIfExists
                | OperationType::DropColumn
                | OperationType::Truncate
        )
    }

    pub fn requires_backup(&self) -> bool {
        self.is_destructive()
            || matches!(
                self,
                OperationType::ModifyColumn
                    | OperationType::ChangeColumn
                    | OperationType::DropPrimary
                    | OperationType::DropForeignKey
            )
    }

    pub fn description(&self) -> &'static str {
        match self {
            OperationType::CreateTable => "Creating a new table",
            OperationType::DropTable => "Dropping a table",
            OperationType::DropTableIfExists => "Dropping a table if it exists",
            OperationType::RenameTable => "Renaming a table",
            OperationType::AddColumn => "Adding a new column",
            OperationType::DropColumn => "Dropping a column",
            OperationType::ModifyColumn => "Modifying a column",
            OperationType::RenameColumn => "Renaming a column",
            OperationType::ChangeColumn => "Changing a column definition",
            OperationType::AddIndex => "Adding an index",
            OperationType::DropIndex => "Dropping an index",
            OperationType::AddUnique => "Adding a unique constraint",
            OperationType::DropUnique => "Dropping a unique constraint",
            OperationType::AddPrimary => "Adding a primary key",
            OperationType::DropPrimary => "Dropping a primary key",
            OperationType::AddForeignKey => "Adding a foreign key",
            OperationType::DropForeignKey => "Dropping a foreign key",
            OperationType::Truncate => "Truncating table data",
            OperationType::Alter => "Altering table structure",
            OperationType::Drop => "Dropping database object",
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        match self {
            OperationType::DropTable | OperationType::DropTableIfExists => {
                Some("This will permanently delete the table and ALL its data!")
            }
            OperationType::DropColumn => {
                Some("This will permanently delete the column and ALL its data!")
            }
            OperationType::Truncate => Some("This will delete ALL data in the table!"),
            OperationType::DropPrimary => {
                Some("Dropping the primary key may affect foreign key relationships!")
            }
            OperationType::ModifyColumn | OperationType::ChangeColumn => {
                Some("Modifying the column may cause data loss if types are incompatible!")
            }
            _ => None,
        }
    }

    /// Whether the operation targets a single column of a table.
    pub fn affects_column(&self) -> bool {
        matches!(
            self,
            OperationType::DropColumn | OperationType::ChangeColumn | OperationType::RenameColumn
        )
    }

    /// Whether the operation targets an index or unique constraint.
    pub fn affects_index(&self) -> bool {
        matches!(
            self,
            OperationType::DropIndex
                | OperationType::AddIndex
                | OperationType::DropUnique
                | OperationType::AddUnique
        )
    }
}
