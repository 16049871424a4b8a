use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::content_hash;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: String,

    pub nullable: bool,

    /// Free-form default value as reported by the database.
    pub default: Option<Value>,

    pub comment: Option<String>,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub auto_increment: bool,
    pub collation: Option<String>,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            column_type: "string".to_string(),
            nullable: false,
            default: None,
            comment: None,
            length: None,
            precision: None,
            scale: None,
            auto_increment: false,
            collation: None,
        }
    }
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            ..Default::default()
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn hash(&self) -> String {
        content_hash(self)
    }
}
