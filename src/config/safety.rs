use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{types::OperationType, utils::serde::deserialize_opt_vec_from_string};

pub const PRODUCTION: &str = "production";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SafetyConfig {
    /// Deployment environment name, strict mode only applies to `production`
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_true")]
    pub strict_mode_production: bool,

    #[serde(default = "default_true")]
    pub require_confirmation: bool,

    #[serde(
        default = "default_dangerous_operations",
        deserialize_with = "deserialize_opt_vec_from_string"
    )]
    pub dangerous_operations: Option<Vec<String>>,

    #[serde(
        default = "default_destructive_operations",
        deserialize_with = "deserialize_opt_vec_from_string"
    )]
    pub destructive_operations: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

fn default_environment() -> String {
    "local".to_string()
}

fn default_dangerous_operations() -> Option<Vec<String>> {
    Some(
        [
            "dropColumn",
            "dropTable",
            "dropIndex",
            "dropForeign",
            "dropPrimary",
            "dropUnique",
            "drop",
            "dropIfExists",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
}

fn default_destructive_operations() -> Option<Vec<String>> {
    Some(
        ["truncate", "dropColumn", "dropTable"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            strict_mode_production: default_true(),
            require_confirmation: default_true(),
            dangerous_operations: default_dangerous_operations(),
            destructive_operations: default_destructive_operations(),
        }
    }
}

impl SafetyConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(PRODUCTION)
    }

    /// Strict mode is in effect only in production with the flag enabled.
    pub fn strict_mode(&self) -> bool {
        self.is_production() && self.strict_mode_production
    }

    pub fn dangerous_operation_types(&self) -> Vec<OperationType> {
        parse_operation_types(self.dangerous_operations.as_deref().unwrap_or_default())
    }

    pub fn destructive_operation_types(&self) -> Vec<OperationType> {
        parse_operation_types(self.destructive_operations.as_deref().unwrap_or_default())
    }
}

/// Resolve configured operation names, dropping duplicates and unknown names.
fn parse_operation_types(names: &[String]) -> Vec<OperationType> {
    names
        .iter()
        .filter_map(|name| match OperationType::from_str(name.trim()) {
            Ok(op) => Some(op),
            Err(_) => {
                warn!(operation = %name, "Ignoring unknown operation name in safety config");
                None
            }
        })
        .unique()
        .collect()
}
