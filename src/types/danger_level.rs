use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Severity scale for schema operations, ordered from harmless to data-destroying.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DangerLevel {
    #[default]
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl DangerLevel {
    pub fn priority(&self) -> u8 {
        match self {
            DangerLevel::Safe => 0,
            DangerLevel::Low => 1,
            DangerLevel::Medium => 2,
            DangerLevel::High => 3,
            DangerLevel::Critical => 4,
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        self.priority() >= DangerLevel::High.priority()
    }

    pub fn max(self, other: DangerLevel) -> DangerLevel {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DangerLevel::Safe => Color::Green,
            DangerLevel::Low => Color::Blue,
            DangerLevel::Medium => Color::Yellow,
            DangerLevel::High | DangerLevel::Critical => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DangerLevel::Safe => "No dangerous operations detected",
            DangerLevel::Low => "Minor schema changes that are generally safe",
            DangerLevel::Medium => "Schema modifications that may affect performance",
            DangerLevel::High => "Potentially destructive operations detected",
            DangerLevel::Critical => "Data loss operations detected - proceed with extreme caution",
        }
    }

    pub fn to_colored_string(&self) -> String {
        let label = self.to_string().to_uppercase();
        match self {
            DangerLevel::Critical => label.color(self.color()).bold().to_string(),
            _ => label.color(self.color()).to_string(),
        }
    }
}
