use anyhow::Result;
use schema_guard::{
    analyzer,
    config::SafetyConfig,
    guard::{self, SafetyPolicy},
    types::{DangerLevel, OperationType},
};

use crate::common::fixture;

fn production() -> SafetyConfig {
    SafetyConfig {
        environment: "production".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_validate_dangerous_fixture() -> Result<()> {
    let operations = analyzer::analyze_file(&fixture("2024_01_01_000003_dangerous_operations.php"));
    let verdict = guard::validate(&operations);

    assert!(!verdict.is_safe);
    assert_eq!(verdict.danger_level, DangerLevel::Critical);
    assert!(verdict.requires_confirmation);
    assert!(verdict.requires_backup);

    let destructive: Vec<_> = verdict
        .destructive_operations
        .iter()
        .map(|d| (d.operation_type, d.line_number))
        .collect();
    assert_eq!(
        destructive,
        vec![
            (OperationType::DropTableIfExists, 11),
            (OperationType::DropColumn, 14),
        ]
    );

    let warned: Vec<_> = verdict.warnings.iter().map(|w| w.line).collect();
    assert_eq!(warned, vec![11, 14]);

    Ok(())
}

#[tokio::test]
async fn test_validate_safe_fixture() -> Result<()> {
    let operations = analyzer::analyze_file(&fixture("2024_01_01_000002_create_audit_table.php"));
    let verdict = guard::validate(&operations);

    assert!(verdict.is_safe);
    assert_eq!(verdict.danger_level, DangerLevel::Safe);
    assert!(!verdict.requires_confirmation);
    assert!(verdict.destructive_operations.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_production_blocks_without_force() -> Result<()> {
    let operations = analyzer::analyze_file(&fixture("2024_01_01_000003_dangerous_operations.php"));
    let policy = SafetyPolicy::from(&production());

    let blocked: Vec<_> = operations
        .iter()
        .filter(|op| !guard::should_allow(op, false, &policy))
        .map(|op| op.operation_type)
        .collect();
    assert_eq!(
        blocked,
        vec![OperationType::DropTableIfExists, OperationType::DropColumn]
    );

    assert!(operations.iter().all(|op| guard::should_allow(op, true, &policy)));

    let local = SafetyPolicy::from(&SafetyConfig::default());
    assert!(operations.iter().all(|op| guard::should_allow(op, false, &local)));

    Ok(())
}

#[tokio::test]
async fn test_confirmation_message_for_fixture_operation() -> Result<()> {
    let operations = analyzer::analyze_file(&fixture("2024_01_01_000003_dangerous_operations.php"));
    let message = guard::confirmation_message(&operations[0]);

    assert!(message.starts_with("⚠️  critical operation detected:"));
    assert!(message.contains("Line: 11"));
    assert!(message.contains("DATA LOSS"));
    assert!(message.contains("BACKUP RECOMMENDED"));

    Ok(())
}

#[tokio::test]
async fn test_safety_rules_reflect_config() -> Result<()> {
    let rules = guard::safety_rules(&production());

    assert_eq!(rules.environment, "production");
    assert!(rules.strict_mode);
    assert!(rules.destructive_operations.contains(&OperationType::DropTable));
    assert_eq!(rules.dangerous_operations.len(), 8);

    let relaxed = guard::safety_rules(&SafetyConfig {
        strict_mode_production: false,
        ..production()
    });
    assert!(!relaxed.strict_mode);

    Ok(())
}
