mod patterns;

use std::path::Path;

use regex::Captures;
use tracing::{debug, warn};

use crate::{
    entities::MigrationOperation,
    types::{DangerLevel, OperationType},
};
use patterns::PATTERNS;

const UNKNOWN: &str = "unknown";

/// Scan migration source text and return recognised operations in line order.
pub fn analyze_source(source: &str) -> Vec<MigrationOperation> {
    source
        .split('\n')
        .enumerate()
        .filter_map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

/// Analyze a migration file. A missing or unreadable file yields no operations.
pub fn analyze_file(path: &Path) -> Vec<MigrationOperation> {
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let operations = analyze_source(&source);
            debug!(
                path = %path.display(),
                operations = operations.len(),
                "Analyzed migration"
            );
            operations
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Migration file not found");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable migration");
            Vec::new()
        }
    }
}

/// Highest danger level across operations, `Safe` when there are none.
pub fn danger_level(operations: &[MigrationOperation]) -> DangerLevel {
    operations
        .iter()
        .fold(DangerLevel::Safe, |acc, op| acc.max(op.danger_level()))
}

pub fn has_dangerous_operations(operations: &[MigrationOperation]) -> bool {
    operations
        .iter()
        .any(|op| op.danger_level().priority() >= DangerLevel::High.priority())
}

fn parse_line(line: &str, line_number: usize) -> Option<MigrationOperation> {
    let line = line.trim();

    if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
        return None;
    }

    PATTERNS.iter().find_map(|(re, operation_type)| {
        re.captures(line)
            .map(|caps| build_operation(*operation_type, &caps, line_number, line))
    })
}

fn build_operation(
    operation_type: OperationType,
    caps: &Captures,
    line_number: usize,
    raw_code: &str,
) -> MigrationOperation {
    let first = caps.get(1).map(|m| m.as_str());
    let second = caps.get(2).map(|m| m.as_str());

    let table_name = first.unwrap_or(UNKNOWN);
    // A lone capture names both the table and the target.
    let target = second.or(first).unwrap_or(UNKNOWN);

    let operation = MigrationOperation::new(operation_type, table_name, line_number)
        .with_raw_code(raw_code);

    if operation_type.affects_column() {
        operation.with_column(target)
    } else if operation_type.affects_index() {
        operation.with_index(target)
    } else {
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        assert!(analyze_source("").is_empty());
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let source = r#"<?php

// Schema::drop('users');
# Schema::drop('posts');
    // $table->dropColumn('email');
"#;
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_drop_table_line_number() {
        let source = "<?php\n\nSchema::drop('users');\n";
        let ops = analyze_source(source);

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_type, OperationType::DropTable);
        assert_eq!(ops[0].table_name, "users");
        assert_eq!(ops[0].line_number, 3);
        assert_eq!(ops[0].raw_code.as_deref(), Some("Schema::drop('users');"));
    }

    #[test]
    fn test_drop_column_list_is_single_operation() {
        let ops = analyze_source("$table->dropColumn(['email', 'phone']);");

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_type, OperationType::DropColumn);
        assert_eq!(ops[0].table_name, "'email', 'phone'");
        assert_eq!(ops[0].column_name.as_deref(), Some("'email', 'phone'"));
    }

    #[test]
    fn test_single_drop_column() {
        let ops = analyze_source("        $table->dropColumn('email');");

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].table_name, "email");
        assert_eq!(ops[0].column_name.as_deref(), Some("email"));
    }

    #[test]
    fn test_rename_column_captures() {
        let ops = analyze_source("$table->renameColumn('email', 'email_address');");

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_type, OperationType::RenameColumn);
        assert_eq!(ops[0].table_name, "email");
        assert_eq!(ops[0].column_name.as_deref(), Some("email_address"));
    }

    #[test]
    fn test_change_without_captures() {
        let ops = analyze_source("$table->text('email')->change();");

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_type, OperationType::ChangeColumn);
        assert_eq!(ops[0].table_name, "unknown");
        assert_eq!(ops[0].column_name.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_index_operations_set_index_name() {
        let ops = analyze_source(
            "$table->dropIndex(\"users_email_index\");\n$table->unique('email');",
        );

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].operation_type, OperationType::DropIndex);
        assert_eq!(ops[0].index_name.as_deref(), Some("users_email_index"));
        assert_eq!(ops[0].column_name, None);
        assert_eq!(ops[1].operation_type, OperationType::AddUnique);
        assert_eq!(ops[1].index_name.as_deref(), Some("email"));
    }

    #[test]
    fn test_whitespace_and_quote_tolerance() {
        let ops = analyze_source(
            "<?php Schema::drop(  \"users\"  );\n<?php $table->renameColumn(\"old_name\" , \"new_name\");\n<?php Schema::rename(\"old_table\" , \"new_table\");",
        );

        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].table_name, "users");
        assert_eq!(ops[1].operation_type, OperationType::RenameColumn);
        assert_eq!(ops[2].operation_type, OperationType::RenameTable);
        assert_eq!(ops[2].table_name, "old_table");
        assert_eq!(ops[2].column_name, None);
    }

    #[test]
    fn test_spaced_operators_are_detected() {
        let ops = analyze_source(
            "<?php\n$table->string('name');\n  Schema::drop ( 'users' );\n$table -> dropColumn('email');",
        );

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].operation_type, OperationType::DropTable);
        assert_eq!(ops[0].table_name, "users");
        assert_eq!(ops[0].line_number, 3);
        assert_eq!(ops[1].operation_type, OperationType::DropColumn);
        assert_eq!(ops[1].column_name.as_deref(), Some("email"));
        assert_eq!(ops[1].line_number, 4);
        assert_eq!(danger_level(&ops), DangerLevel::Critical);
    }

    #[test]
    fn test_one_operation_per_line() {
        let ops = analyze_source("Schema::drop('a'); Schema::drop('b');");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].table_name, "a");
    }

    #[test]
    fn test_multiple_operations_in_order() {
        let source = r#"<?php

return new class extends Migration
{
    public function up(): void
    {
        Schema::create('users', function (Blueprint $table) {
            $table->id();
        });

        Schema::dropIfExists('old_users');

        $table->dropColumn('email');
    }
};"#;
        let ops = analyze_source(source);

        let types: Vec<OperationType> = ops.iter().map(|o| o.operation_type).collect();
        assert_eq!(
            types,
            vec![
                OperationType::CreateTable,
                OperationType::DropTableIfExists,
                OperationType::DropColumn,
            ]
        );
        assert_eq!(ops[0].line_number, 7);
        assert!(ops.windows(2).all(|w| w[0].line_number < w[1].line_number));
    }

    #[test]
    fn test_danger_level_aggregation() {
        assert_eq!(danger_level(&[]), DangerLevel::Safe);

        let ops = analyze_source("Schema::create('users', function () {\n$table->index('email');");
        assert_eq!(danger_level(&ops), DangerLevel::Low);
        assert!(!has_dangerous_operations(&ops));

        let ops = analyze_source("$table->index('email');\nSchema::drop('users');");
        assert_eq!(danger_level(&ops), DangerLevel::Critical);
        assert!(has_dangerous_operations(&ops));
    }

    #[test]
    fn test_change_column_is_dangerous() {
        let ops = analyze_source("$table->string('name', 100)->change();");
        assert!(has_dangerous_operations(&ops));
        assert_eq!(danger_level(&ops), DangerLevel::High);
    }

    #[test]
    fn test_missing_file() {
        let ops = analyze_file(Path::new("/definitely/not/here/2024_01_01_missing.php"));
        assert!(ops.is_empty());
    }
}
