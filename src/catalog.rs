//! Live-Catalog Introspection
//!
//! This module reads table structure out of a live connection's catalog.
//! Nothing here is cached: every call re-queries `sqlite_master` or the
//! table-info pragma, so descriptors always reflect the catalog as it is
//! right now.
//!
//! # Implementation Notes
//! - Table discovery via `sqlite_master`, excluding `sqlite_%` internals
//! - Column structure via `PRAGMA table_info` in a single pass
//! - Declared types are kept verbatim (SQLite preserves them as written)
//! - Composite primary keys keep the key ordinal order from the pragma

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Structure of one table as read from the live catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,

    /// Columns in definition order
    pub columns: Vec<ColumnDescriptor>,

    /// Primary key column names, in key order (empty when the table has none)
    pub primary_key: Vec<String>,
}

impl TableDescriptor {
    /// Column names in definition order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Structure of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Declared type, verbatim (may be empty for typeless columns)
    pub declared_type: String,

    /// Whether the column allows NULL values
    pub nullable: bool,

    /// Default value expression, if the catalog records one
    pub default: Option<String>,
}

/// Quote an identifier for use in generated SQL
///
/// Always quotes; generated statements must survive table names that collide
/// with keywords or contain unusual characters.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// List user tables in the live catalog, sorted by name
///
/// Engine-internal tables (`sqlite_sequence` and friends) are excluded, the
/// same way every introspection tool over SQLite excludes them.
pub(crate) fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table'
         AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    debug!("discovered {} tables in catalog", names.len());
    Ok(names)
}

/// Read the structure of a single table from the live catalog
///
/// A name absent from the catalog yields a descriptor with no columns; the
/// facade validates names against [`table_names`] before calling this.
pub(crate) fn describe_table(conn: &Connection, table: &str) -> Result<TableDescriptor> {
    let mut stmt =
        conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;

    // cid, name, type, notnull, dflt_value, pk
    let mut columns = Vec::new();
    let mut key_columns: Vec<(i32, String)> = Vec::new();

    let entries = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        let declared_type: String = row.get(2)?;
        let notnull: i32 = row.get(3)?;
        let default: Option<String> = row.get(4)?;
        let pk: i32 = row.get(5)?;
        Ok((name, declared_type, notnull, default, pk))
    })?;

    for entry in entries {
        let (name, declared_type, notnull, default, pk) = entry?;
        if pk > 0 {
            key_columns.push((pk, name.clone()));
        }
        columns.push(ColumnDescriptor { name, declared_type, nullable: notnull == 0, default });
    }

    key_columns.sort_by_key(|(ordinal, _)| *ordinal);
    let primary_key = key_columns.into_iter().map(|(_, name)| name).collect();

    let descriptor = TableDescriptor { name: table.to_string(), columns, primary_key };
    debug!("introspected table {} ({} columns)", table, descriptor.columns.len());
    Ok(descriptor)
}
