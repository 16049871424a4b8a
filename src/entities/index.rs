use serde::{Deserialize, Serialize};

use crate::entities::content_hash;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDefinition {
    pub name: String,

    /// Indexed columns, in key order.
    pub columns: Vec<String>,

    pub unique: bool,
    pub primary: bool,

    #[serde(rename = "type")]
    pub index_type: Option<String>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.unique = true;
        self
    }

    pub fn hash(&self) -> String {
        content_hash(self)
    }
}
