use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct DryRunConfig {
    /// Always print matched source lines, as if `--show-sql` was given
    #[serde(default)]
    pub show_sql: bool,
}
