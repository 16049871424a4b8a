mod report;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{SchemaSnapshot, TableDefinition};
pub use report::{Change, DriftReport, DriftSummary, TableDiff};

/// Per-table components taken into account when comparing snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub columns: bool,
    pub indexes: bool,
    pub foreign_keys: bool,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            columns: true,
            indexes: true,
            foreign_keys: true,
        }
    }
}

struct NamedDiff<T> {
    added: Vec<String>,
    removed: Vec<String>,
    modified: BTreeMap<String, Change<T>>,
}

/// Index items by name; the first occurrence of a duplicated name wins.
fn by_name<'a, T>(items: &'a [T], name: impl Fn(&T) -> &str) -> BTreeMap<&'a str, &'a T> {
    let mut map = BTreeMap::new();
    for item in items {
        map.entry(name(item)).or_insert(item);
    }
    map
}

fn diff_named<T: Clone + PartialEq>(
    expected: &[T],
    actual: &[T],
    name: impl Fn(&T) -> &str + Copy,
) -> NamedDiff<T> {
    let expected = by_name(expected, name);
    let actual = by_name(actual, name);

    let added = actual
        .keys()
        .filter(|k| !expected.contains_key(*k))
        .map(|k| k.to_string())
        .collect();

    let removed = expected
        .keys()
        .filter(|k| !actual.contains_key(*k))
        .map(|k| k.to_string())
        .collect();

    let modified = expected
        .iter()
        .filter_map(|(k, e)| {
            actual.get(k).filter(|a| **a != *e).map(|a| {
                (
                    k.to_string(),
                    Change {
                        expected: (*e).clone(),
                        actual: (*a).clone(),
                    },
                )
            })
        })
        .collect();

    NamedDiff {
        added,
        removed,
        modified,
    }
}

/// Structural differences between two versions of the same table.
pub fn compare_tables(
    expected: &TableDefinition,
    actual: &TableDefinition,
    components: Components,
) -> TableDiff {
    let mut diff = TableDiff::default();

    if components.columns {
        let d = diff_named(&expected.columns, &actual.columns, |c| c.name.as_str());
        diff.added_columns = d.added;
        diff.removed_columns = d.removed;
        diff.modified_columns = d.modified;
    }

    if components.indexes {
        let d = diff_named(&expected.indexes, &actual.indexes, |i| i.name.as_str());
        diff.added_indexes = d.added;
        diff.removed_indexes = d.removed;
        diff.modified_indexes = d.modified;
    }

    if components.foreign_keys {
        let d = diff_named(&expected.foreign_keys, &actual.foreign_keys, |f| {
            f.name.as_str()
        });
        diff.added_foreign_keys = d.added;
        diff.removed_foreign_keys = d.removed;
        diff.modified_foreign_keys = d.modified;
    }

    diff
}

/// Compare a baseline snapshot against the live one, checking every component.
pub fn compare_snapshots(expected: &SchemaSnapshot, actual: &SchemaSnapshot) -> DriftReport {
    compare_snapshots_with(expected, actual, Components::default())
}

pub fn compare_snapshots_with(
    expected: &SchemaSnapshot,
    actual: &SchemaSnapshot,
    components: Components,
) -> DriftReport {
    let expected_tables = by_name(&expected.tables, |t| t.name.as_str());
    let actual_tables = by_name(&actual.tables, |t| t.name.as_str());

    let added_tables = actual_tables
        .keys()
        .filter(|k| !expected_tables.contains_key(*k))
        .map(|k| k.to_string())
        .collect();

    let removed_tables = expected_tables
        .keys()
        .filter(|k| !actual_tables.contains_key(*k))
        .map(|k| k.to_string())
        .collect();

    let modified_tables = expected_tables
        .iter()
        .filter_map(|(name, e)| {
            let a = actual_tables.get(name)?;
            if *a == *e {
                return None;
            }
            let diff = compare_tables(e, a, components);
            (!diff.is_empty()).then(|| (name.to_string(), diff))
        })
        .collect();

    DriftReport::new(added_tables, removed_tables, modified_tables)
}
