use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Connection name recorded in snapshots
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Schema to inspect, defaults to the one recorded in the schema dump
    #[serde(default)]
    pub schema: Option<String>,

    /// JSON schema dump exported from the live database
    #[serde(default = "default_schema_file")]
    pub schema_file: String,

    /// PostgreSQL url. When set the live database is inspected instead of `schema_file`
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseConfig {
    /// The url with any password replaced, for display.
    pub fn redacted_url(&self) -> Option<String> {
        self.url.as_deref().map(redact_password)
    }
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection: default_connection(),
            schema: None,
            schema_file: default_schema_file(),
            url: None,
        }
    }
}

fn default_connection() -> String {
    "pgsql".to_string()
}

fn default_schema_file() -> String {
    "./schema.json".to_string()
}
