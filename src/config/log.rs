use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default)]
    pub file_enabled: bool,

    /// Per-target level overrides, `target:level` pairs separated by commas
    #[serde(default, deserialize_with = "deserialize_ext_level")]
    pub ext_level: Option<HashMap<String, String>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: Some("./logs".to_string()),
            console_format: default_console_format(),
            file_enabled: false,
            ext_level: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_console_format() -> String {
    "pretty".to_string()
}

fn deserialize_ext_level<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;

    let map: HashMap<String, String> = s
        .unwrap_or_default()
        .split(',')
        .filter_map(|pair| pair.trim().rsplit_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    if map.is_empty() { Ok(None) } else { Ok(Some(map)) }
}
