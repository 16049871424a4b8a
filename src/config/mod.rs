pub mod database;
pub mod drift;
pub mod dry_run;
pub mod log;
pub mod migrations;
pub mod safety;
pub mod settings;

pub use database::DatabaseConfig;
pub use drift::DriftConfig;
pub use dry_run::DryRunConfig;
pub use log::LogConfig;
pub use migrations::MigrationsConfig;
pub use safety::SafetyConfig;
pub use settings::Settings;
