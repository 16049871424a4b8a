use serde::{Deserialize, Serialize};

use crate::utils::serde::deserialize_opt_vec_from_string;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MigrationsConfig {
    /// Directories scanned for migration scripts
    #[serde(
        default = "default_paths",
        deserialize_with = "deserialize_opt_vec_from_string"
    )]
    pub paths: Option<Vec<String>>,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Text file listing applied migrations, one per line
    #[serde(default)]
    pub ledger: Option<String>,

    /// Table recording applied migrations, read when `database.url` is set and no `ledger` is given
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "migrations".to_string()
}

fn default_paths() -> Option<Vec<String>> {
    Some(vec!["./database/migrations".to_string()])
}

fn default_extension() -> String {
    "php".to_string()
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            extension: default_extension(),
            ledger: None,
            table: default_table(),
        }
    }
}
