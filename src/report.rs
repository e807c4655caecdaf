//! Schema Report Formatting
//!
//! Pure text assembly for the schema report: synthesized `CREATE TABLE`
//! blocks, the sample-query marker line, and the preview rows underneath it.
//! Nothing in this module touches a connection; it renders descriptors and
//! already-fetched rows into the exact layout agents are prompted with.
//!
//! # Layout
//! Each table contributes one block:
//!
//! ```text
//! CREATE TABLE user (
//!     user_id INTEGER NOT NULL,
//!     user_name VARCHAR(16) NOT NULL,
//!     PRIMARY KEY (user_id)
//! )
//!
//! SELECT * FROM 'user' LIMIT 3
//! user_id user_name
//! 13 Harrison
//! 14 Chase
//! ```
//!
//! Blocks are joined with blank lines. An empty table keeps the marker and
//! header lines; a preview limit of zero drops the whole preview section.

use crate::catalog::TableDescriptor;
use crate::value::{clip_chars, SqlValue};

/// Widest a preview cell may render; longer values are cut mid-token
pub const SAMPLE_CELL_MAX_CHARS: usize = 100;

/// Render an identifier for display in synthesized DDL
///
/// Plain identifiers stay bare so the common case reads like hand-written
/// SQL; anything else gets double quotes with embedded quotes doubled.
fn format_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Synthesize a `CREATE TABLE` statement from a table descriptor
pub(crate) fn render_create_table(table: &TableDescriptor) -> String {
    let mut lines = Vec::with_capacity(table.columns.len() + 1);

    for column in &table.columns {
        let mut parts = vec![format_identifier(&column.name)];
        if !column.declared_type.is_empty() {
            parts.push(column.declared_type.clone());
        }
        if let Some(default) = &column.default {
            parts.push(format!("DEFAULT {default}"));
        }
        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        lines.push(format!("\t{}", parts.join(" ")));
    }

    if !table.primary_key.is_empty() {
        let key = table
            .primary_key
            .iter()
            .map(|name| format_identifier(name))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("\tPRIMARY KEY ({key})"));
    }

    format!(
        "CREATE TABLE {} (\n{}\n)",
        format_identifier(&table.name),
        lines.join(",\n")
    )
}

/// The marker line shown above preview rows
///
/// This is display text, not the statement actually executed; it keeps the
/// single-quoted shape agents have learned to read.
pub(crate) fn preview_marker(table: &str, limit: usize) -> String {
    format!("SELECT * FROM '{table}' LIMIT {limit}")
}

/// Render one table block: DDL, then marker, header, and preview rows
///
/// `rows` is `None` when previews are disabled, in which case the block is
/// the DDL alone.
pub(crate) fn render_table_block(
    table: &TableDescriptor,
    limit: usize,
    rows: Option<&[Vec<SqlValue>]>,
) -> String {
    let ddl = render_create_table(table);
    let Some(rows) = rows else {
        return ddl;
    };

    let mut lines = vec![preview_marker(&table.name, limit)];
    lines.push(table.column_names().collect::<Vec<_>>().join(" "));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|value| clip_chars(value.display_text(), SAMPLE_CELL_MAX_CHARS))
            .collect();
        lines.push(cells.join(" "));
    }

    format!("{}\n\n{}", ddl, lines.join("\n"))
}
