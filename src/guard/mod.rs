use serde::{Deserialize, Serialize};

use crate::{
    config::SafetyConfig,
    entities::{MigrationOperation, OperationDetail},
    types::{DangerLevel, OperationType},
};

/// Environment and strictness the guard evaluates operations against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    pub environment: String,
    pub strict_mode_production: bool,
    pub require_confirmation: bool,
}

impl SafetyPolicy {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(crate::config::safety::PRODUCTION)
    }

    pub fn strict_mode(&self) -> bool {
        self.is_production() && self.strict_mode_production
    }

    /// Whether operators should be prompted before running a migration with this verdict.
    /// Turning `require_confirmation` off silences the prompt but never `should_allow`.
    pub fn confirmation_required(&self, verdict: &Verdict) -> bool {
        self.require_confirmation && verdict.requires_confirmation
    }
}

impl From<&SafetyConfig> for SafetyPolicy {
    fn from(config: &SafetyConfig) -> Self {
        Self {
            environment: config.environment.clone(),
            strict_mode_production: config.strict_mode_production,
            require_confirmation: config.require_confirmation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationWarning {
    pub operation: String,
    pub message: String,
    pub line: usize,
}

/// Aggregate safety assessment of a migration's operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_safe: bool,
    pub danger_level: DangerLevel,
    pub requires_confirmation: bool,
    pub requires_backup: bool,
    pub warnings: Vec<OperationWarning>,
    pub destructive_operations: Vec<OperationDetail>,
}

impl Verdict {
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRules {
    pub environment: String,
    pub strict_mode: bool,
    pub require_confirmation: bool,
    pub dangerous_operations: Vec<OperationType>,
    pub destructive_operations: Vec<OperationType>,
}

pub fn validate(operations: &[MigrationOperation]) -> Verdict {
    let mut verdict = Verdict::safe();

    for op in operations {
        verdict.danger_level = verdict.danger_level.max(op.danger_level());

        if op.is_destructive() {
            verdict.destructive_operations.push(op.detail());
        }

        verdict.requires_backup |= op.requires_backup();

        if let Some(message) = op.warning() {
            verdict.warnings.push(OperationWarning {
                operation: op.description(),
                message: message.to_string(),
                line: op.line_number,
            });
        }
    }

    verdict.is_safe = verdict.danger_level.priority() < DangerLevel::High.priority();
    verdict.requires_confirmation = verdict.danger_level.requires_confirmation();
    verdict
}

/// Whether an operation may run without interactive confirmation.
pub fn should_allow(operation: &MigrationOperation, force: bool, policy: &SafetyPolicy) -> bool {
    if force {
        return true;
    }

    if policy.strict_mode() {
        return !operation.danger_level().requires_confirmation();
    }

    true
}

pub fn confirmation_message(operation: &MigrationOperation) -> String {
    let mut message = format!(
        "⚠️  {} operation detected:\n\n   {}\n",
        operation.danger_level(),
        operation.description()
    );

    if let Some(warning) = operation.warning() {
        message.push_str(&format!("\n   {}\n", warning));
    }

    message.push_str(&format!("\n   Line: {}\n", operation.line_number));

    if operation.is_destructive() {
        message.push_str("\n   ❌ This operation may cause DATA LOSS!\n");
    }

    if operation.requires_backup() {
        message.push_str("\n   💾 BACKUP RECOMMENDED before proceeding.\n");
    }

    message
}

pub fn safety_rules(config: &SafetyConfig) -> SafetyRules {
    SafetyRules {
        environment: config.environment.clone(),
        strict_mode: config.strict_mode(),
        require_confirmation: config.require_confirmation,
        dangerous_operations: config.dangerous_operation_types(),
        destructive_operations: config.destructive_operation_types(),
    }
}
