use std::sync::LazyLock;

use regex::Regex;

use crate::types::OperationType;

/// Quoted identifier, either quote style, surrounding whitespace allowed.
const IDENT: &str = r#"\s*['"](\w+)['"]\s*"#;

/// Let `::` and `->` carry whitespace on either side, as PHP allows.
fn spaced(prefix: &str) -> String {
    prefix.replace("::", r"\s*::\s*").replace("->", r"\s*->\s*")
}

fn call(prefix: &str, args: &str) -> Regex {
    let pattern = format!(r"{}\s*\({}\)", spaced(prefix), args);
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid pattern {}: {}", pattern, e))
}

/// Ordered recognisers; the first one matching a line wins.
pub static PATTERNS: LazyLock<Vec<(Regex, OperationType)>> = LazyLock::new(|| {
    let pair = format!("{},{}", IDENT, IDENT);
    let table_call = format!(r"DB::table\s*\({}\)", IDENT);
    vec![
        (call("Schema::dropIfExists", IDENT), OperationType::DropTableIfExists),
        (call("Schema::drop", IDENT), OperationType::DropTable),
        (call("->dropColumn", IDENT), OperationType::DropColumn),
        (call("->dropColumn", r"\s*\[(.*?)\]\s*"), OperationType::DropColumn),
        (call("->dropIndex", IDENT), OperationType::DropIndex),
        (call("->dropForeign", IDENT), OperationType::DropForeignKey),
        (call("->dropPrimary", r#"\s*(?:['"]\w+['"])?\s*"#), OperationType::DropPrimary),
        (call("->dropUnique", IDENT), OperationType::DropUnique),
        (
            call(&format!("(?:{})?->truncate", table_call), r"\s*"),
            OperationType::Truncate,
        ),
        (
            Regex::new(&format!(r"{}\s*\({}", spaced("Schema::create"), r#"\s*['"](\w+)['"]"#))
                .unwrap_or_else(|e| panic!("invalid create pattern: {}", e)),
            OperationType::CreateTable,
        ),
        (call("->change", r"\s*"), OperationType::ChangeColumn),
        (call("->renameColumn", &pair), OperationType::RenameColumn),
        (call("Schema::rename", &pair), OperationType::RenameTable),
        (call("->foreign", IDENT), OperationType::AddForeignKey),
        (call("->index", IDENT), OperationType::AddIndex),
        (call("->unique", IDENT), OperationType::AddUnique),
        (call("->primary", IDENT), OperationType::AddPrimary),
    ]
});
