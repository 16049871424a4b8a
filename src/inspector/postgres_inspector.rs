use std::{collections::BTreeMap, sync::Arc};

use serde_json::Value;
use sqlx::FromRow;
use tracing::debug;

use crate::{
    entities::{ColumnDefinition, ForeignKeyDefinition, IndexDefinition, TableDefinition},
    errors::{DatabaseError, InspectorError},
    inspector::SchemaInspector,
    postgres::PgClient,
};

const DEFAULT_SCHEMA: &str = "public";

const TABLES_QUERY: &str = r#"
    SELECT c.relname::text AS name,
           obj_description(c.oid, 'pg_class') AS comment
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = $1 AND c.relkind IN ('r', 'p')
    ORDER BY c.relname
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT c.table_name::text AS table_name,
           c.column_name::text AS column_name,
           c.data_type::text AS data_type,
           c.udt_name::text AS udt_name,
           (c.is_nullable = 'YES') AS nullable,
           c.column_default::text AS column_default,
           c.character_maximum_length::int4 AS length,
           c.numeric_precision::int4 AS precision,
           c.numeric_scale::int4 AS scale,
           (c.is_identity = 'YES') AS is_identity,
           c.collation_name::text AS collation,
           col_description(format('%I.%I', c.table_schema, c.table_name)::regclass,
                           c.ordinal_position::int) AS comment
    FROM information_schema.columns c
    WHERE c.table_schema = $1
    ORDER BY c.table_name, c.ordinal_position
"#;

const INDEXES_QUERY: &str = r#"
    SELECT t.relname::text AS table_name,
           i.relname::text AS index_name,
           ix.indisunique AS is_unique,
           ix.indisprimary AS is_primary,
           am.amname::text AS index_type,
           array_agg(a.attname::text ORDER BY k.ord) AS columns
    FROM pg_index ix
    JOIN pg_class t ON t.oid = ix.indrelid
    JOIN pg_class i ON i.oid = ix.indexrelid
    JOIN pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_am am ON am.oid = i.relam
    CROSS JOIN LATERAL unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
    WHERE n.nspname = $1
    GROUP BY t.relname, i.relname, ix.indisunique, ix.indisprimary, am.amname
    ORDER BY t.relname, i.relname
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
    SELECT t.relname::text AS table_name,
           con.conname::text AS name,
           ft.relname::text AS foreign_table,
           array_agg(a.attname::text ORDER BY k.ord) AS columns,
           array_agg(fa.attname::text ORDER BY k.ord) AS foreign_columns,
           con.confupdtype::text AS on_update,
           con.confdeltype::text AS on_delete
    FROM pg_constraint con
    JOIN pg_class t ON t.oid = con.conrelid
    JOIN pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_class ft ON ft.oid = con.confrelid
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(attnum, fattnum, ord)
    JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
    JOIN pg_attribute fa ON fa.attrelid = con.confrelid AND fa.attnum = k.fattnum
    WHERE con.contype = 'f' AND n.nspname = $1
    GROUP BY t.relname, con.conname, ft.relname, con.confupdtype, con.confdeltype
    ORDER BY t.relname, con.conname
"#;

#[derive(Clone, Debug, FromRow)]
pub struct TableRow {
    pub name: String,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, FromRow)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub udt_name: String,
    pub nullable: bool,
    pub column_default: Option<String>,
    pub length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub is_identity: bool,
    pub collation: Option<String>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, FromRow)]
pub struct IndexRow {
    pub table_name: String,
    pub index_name: String,
    pub is_unique: bool,
    pub is_primary: bool,
    pub index_type: String,
    pub columns: Vec<String>,
}

#[derive(Clone, Debug, FromRow)]
pub struct ForeignKeyRow {
    pub table_name: String,
    pub name: String,
    pub foreign_table: String,
    pub columns: Vec<String>,
    pub foreign_columns: Vec<String>,
    pub on_update: String,
    pub on_delete: String,
}

impl From<ColumnRow> for ColumnDefinition {
    fn from(row: ColumnRow) -> Self {
        let column_type = match row.data_type.as_str() {
            "USER-DEFINED" | "ARRAY" => row.udt_name,
            _ => row.data_type,
        };
        let serial = row
            .column_default
            .as_deref()
            .is_some_and(|default| default.starts_with("nextval("));
        let numeric = column_type == "numeric";

        Self {
            name: row.column_name,
            column_type,
            nullable: row.nullable,
            // Sequence defaults name the sequence, which says nothing about the column shape.
            default: row.column_default.filter(|_| !serial).map(Value::String),
            comment: row.comment,
            length: row.length.and_then(|v| u32::try_from(v).ok()),
            precision: row
                .precision
                .filter(|_| numeric)
                .and_then(|v| u32::try_from(v).ok()),
            scale: row
                .scale
                .filter(|_| numeric)
                .and_then(|v| u32::try_from(v).ok()),
            auto_increment: row.is_identity || serial,
            collation: row.collation,
        }
    }
}

impl From<IndexRow> for IndexDefinition {
    fn from(row: IndexRow) -> Self {
        Self {
            name: row.index_name,
            columns: row.columns,
            unique: row.is_unique,
            primary: row.is_primary,
            index_type: Some(row.index_type),
        }
    }
}

impl From<ForeignKeyRow> for ForeignKeyDefinition {
    fn from(row: ForeignKeyRow) -> Self {
        Self {
            name: row.name,
            columns: row.columns,
            foreign_table: row.foreign_table,
            foreign_columns: row.foreign_columns,
            on_update: referential_action(&row.on_update),
            on_delete: referential_action(&row.on_delete),
        }
    }
}

/// Decode a `pg_constraint` action code. `NO ACTION` is the default and maps to `None`.
pub fn referential_action(code: &str) -> Option<String> {
    let action = match code {
        "r" => "restrict",
        "c" => "cascade",
        "n" => "set null",
        "d" => "set default",
        _ => return None,
    };
    Some(action.to_string())
}

/// Group catalog rows under their tables. Rows for relations outside `tables`, such as views, are dropped.
pub fn assemble_tables(
    tables: Vec<TableRow>,
    columns: Vec<ColumnRow>,
    indexes: Vec<IndexRow>,
    foreign_keys: Vec<ForeignKeyRow>,
) -> Vec<TableDefinition> {
    let mut by_name: BTreeMap<String, TableDefinition> = tables
        .into_iter()
        .map(|row| {
            let mut table = TableDefinition::new(row.name.as_str());
            table.comment = row.comment;
            (row.name, table)
        })
        .collect();

    for row in columns {
        if let Some(table) = by_name.get_mut(&row.table_name) {
            table.columns.push(row.into());
        }
    }
    for row in indexes {
        if let Some(table) = by_name.get_mut(&row.table_name) {
            table.indexes.push(row.into());
        }
    }
    for row in foreign_keys {
        if let Some(table) = by_name.get_mut(&row.table_name) {
            table.foreign_keys.push(row.into());
        }
    }

    by_name.into_values().collect()
}

/// Inspector reading table definitions from a live PostgreSQL database.
pub struct PostgresInspector {
    client: Arc<PgClient>,
}

impl PostgresInspector {
    pub fn new(client: Arc<PgClient>) -> Self {
        Self { client }
    }

    async fn fetch_tables(&self, schema: &str) -> Result<Vec<TableDefinition>, DatabaseError> {
        let pool = self.client.pool();

        let tables: Vec<TableRow> = sqlx::query_as(TABLES_QUERY)
            .bind(schema)
            .fetch_all(pool)
            .await?;
        let columns: Vec<ColumnRow> = sqlx::query_as(COLUMNS_QUERY)
            .bind(schema)
            .fetch_all(pool)
            .await?;
        let indexes: Vec<IndexRow> = sqlx::query_as(INDEXES_QUERY)
            .bind(schema)
            .fetch_all(pool)
            .await?;
        let foreign_keys: Vec<ForeignKeyRow> = sqlx::query_as(FOREIGN_KEYS_QUERY)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        debug!(
            schema,
            tables = tables.len(),
            columns = columns.len(),
            indexes = indexes.len(),
            foreign_keys = foreign_keys.len(),
            "Read PostgreSQL catalog"
        );
        Ok(assemble_tables(tables, columns, indexes, foreign_keys))
    }
}

impl SchemaInspector for PostgresInspector {
    fn current_schema(&self) -> Result<String, InspectorError> {
        let schema: Option<String> = self
            .client
            .block_on(sqlx::query_scalar("SELECT current_schema()::text").fetch_one(self.client.pool()))
            .map_err(DatabaseError::from)?;

        Ok(schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()))
    }

    fn get_tables(&self, schema: Option<&str>) -> Result<Vec<TableDefinition>, InspectorError> {
        let schema = match schema {
            Some(schema) => schema.to_string(),
            None => self.current_schema()?,
        };

        Ok(self.client.block_on(self.fetch_tables(&schema))?)
    }
}
