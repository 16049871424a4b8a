use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::config::{
    DatabaseConfig, DriftConfig, DryRunConfig, LogConfig, MigrationsConfig, SafetyConfig,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub drift: DriftConfig,

    #[serde(default)]
    pub migrations: MigrationsConfig,

    #[serde(default)]
    pub dry_run: DryRunConfig,

    #[serde(default)]
    pub logs: LogConfig,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            database: DatabaseConfig::default(),
            safety: SafetyConfig::default(),
            drift: DriftConfig::default(),
            migrations: MigrationsConfig::default(),
            dry_run: DryRunConfig::default(),
            logs: LogConfig::default(),
        }
    }
}

fn get_env_file_name() -> String {
    if let Ok(env_file) = std::env::var("SCHEMA_GUARD_ENV_FILE") {
        return env_file;
    }
    if let Ok(env) = std::env::var("SCHEMA_GUARD_ENV") {
        return match env.to_lowercase().as_str() {
            "dev" => ".env.dev".to_string(),
            "test" => ".env.test".to_string(),
            _ => ".env".to_string(),
        };
    }
    ".env".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::from_filename(get_env_file_name()).ok();

        let settings = Config::builder()
            // prefix_separator is what lets nested structs resolve,
            // e.g. SCHEMA_GUARD__SAFETY__ENVIRONMENT
            .add_source(
                Environment::with_prefix("SCHEMA_GUARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn print_config(&self) {
        let mut shown = self.clone();
        shown.database.url = self.database.redacted_url();
        match serde_json::to_string_pretty(&shown) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("Failed to serialize settings: {}", err),
        }
    }
}
