//! Database Facade
//!
//! [`SqlDatabase`] wraps a live connection the caller owns and exposes the
//! two operations agent loops need: a schema report shaped for prompting,
//! and ad-hoc statement execution with results rendered as text.
//!
//! The facade holds no state beyond its options. Every report is recomputed
//! from the live catalog at call time, so DDL executed through [`run`] (or
//! through any other handle on the same database) shows up in the next
//! report without any refresh step.
//!
//! [`run`]: SqlDatabase::run

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, quote_identifier, TableDescriptor};
use crate::error::{DbContextError, Result};
use crate::report;
use crate::value::SqlValue;

/// Preview rows included per table when options do not say otherwise
pub const DEFAULT_SAMPLE_ROWS: usize = 3;

/// How much of a result set [`SqlDatabase::run_fetch`] renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fetch {
    /// Every row, rendered as a list of tuple literals
    All,
    /// The first column of the first row, rendered bare
    One,
}

/// Tuning knobs for a [`SqlDatabase`]
///
/// `include_tables` and `ignore_tables` are mutually exclusive; constructing
/// a facade with both set fails with
/// [`ConflictingTableFilters`](DbContextError::ConflictingTableFilters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseOptions {
    /// Preview rows per table in the schema report (0 disables previews)
    #[serde(default = "default_sample_rows")]
    pub sample_rows_in_table_info: usize,

    /// When non-empty, only these tables are visible through the facade
    #[serde(default)]
    pub include_tables: Vec<String>,

    /// Tables hidden from the facade (ignored when `include_tables` is set)
    #[serde(default)]
    pub ignore_tables: Vec<String>,
}

fn default_sample_rows() -> usize {
    DEFAULT_SAMPLE_ROWS
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            sample_rows_in_table_info: DEFAULT_SAMPLE_ROWS,
            include_tables: Vec::new(),
            ignore_tables: Vec::new(),
        }
    }
}

impl DatabaseOptions {
    /// Set how many preview rows each table block carries
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows_in_table_info = rows;
        self
    }

    /// Restrict the facade to the named tables
    pub fn include_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Hide the named tables from the facade
    pub fn ignore_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_tables = tables.into_iter().map(Into::into).collect();
        self
    }
}

/// Thin facade over a live SQLite connection
///
/// The connection stays owned by the caller; the facade only borrows it, so
/// the same connection can keep serving code outside the facade.
///
/// # Examples
///
/// ```
/// use dbcontext::SqlDatabase;
///
/// # fn main() -> dbcontext::Result<()> {
/// let conn = rusqlite::Connection::open_in_memory()?;
/// conn.execute_batch(
///     "CREATE TABLE user (
///         user_id INTEGER NOT NULL,
///         user_name VARCHAR(16) NOT NULL,
///         PRIMARY KEY (user_id)
///     )",
/// )?;
///
/// let db = SqlDatabase::new(&conn);
/// assert_eq!(db.dialect(), "sqlite");
/// assert_eq!(db.table_names()?, vec!["user"]);
/// assert_eq!(db.run("SELECT count(*) FROM user")?, "[(0,)]");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqlDatabase<'c> {
    conn: &'c Connection,
    options: DatabaseOptions,
}

impl<'c> SqlDatabase<'c> {
    /// Wrap a connection with default options
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn, options: DatabaseOptions::default() }
    }

    /// Wrap a connection with explicit options
    ///
    /// # Errors
    ///
    /// Fails when `options` sets both `include_tables` and `ignore_tables`.
    pub fn with_options(conn: &'c Connection, options: DatabaseOptions) -> Result<Self> {
        if !options.include_tables.is_empty() && !options.ignore_tables.is_empty() {
            return Err(DbContextError::ConflictingTableFilters);
        }
        Ok(Self { conn, options })
    }

    /// The SQL dialect the facade speaks
    pub fn dialect(&self) -> &'static str {
        "sqlite"
    }

    /// The options this facade was built with
    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    /// Tables visible through the facade, sorted by name
    ///
    /// Read from the live catalog on every call and narrowed by the
    /// include/ignore filters. A filter naming a table that does not exist
    /// yet is not an error; the table appears once something creates it.
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.effective_table_names()
    }

    /// Schema report for every visible table
    ///
    /// Equivalent to [`get_table_info`](Self::get_table_info) with no subset.
    pub fn table_info(&self) -> Result<String> {
        self.get_table_info(None)
    }

    /// Schema report for a subset of tables, or all visible tables
    ///
    /// Each table contributes a synthesized `CREATE TABLE` block followed by
    /// a preview of stored rows; blocks are separated by blank lines and
    /// ordered by table name. Previews honor `sample_rows_in_table_info`.
    ///
    /// # Errors
    ///
    /// Requesting any table that is not currently visible fails with
    /// [`UnknownTables`](DbContextError::UnknownTables) and produces no
    /// partial report.
    pub fn get_table_info(&self, tables: Option<&[&str]>) -> Result<String> {
        let visible = self.effective_table_names()?;

        let targets: Vec<String> = match tables {
            Some(requested) => {
                let missing: Vec<&str> = requested
                    .iter()
                    .copied()
                    .filter(|name| !visible.iter().any(|v| v == name))
                    .collect();
                if !missing.is_empty() {
                    return Err(DbContextError::unknown_tables(missing));
                }
                visible
                    .into_iter()
                    .filter(|name| requested.contains(&name.as_str()))
                    .collect()
            }
            None => visible,
        };

        debug!("building schema report for {} tables", targets.len());

        let limit = self.options.sample_rows_in_table_info;
        let mut blocks = Vec::with_capacity(targets.len());
        for name in &targets {
            let table = catalog::describe_table(self.conn, name)?;
            let block = if limit == 0 {
                report::render_table_block(&table, limit, None)
            } else {
                let rows = self.fetch_preview(&table, limit)?;
                report::render_table_block(&table, limit, Some(&rows))
            };
            blocks.push(block);
        }

        Ok(blocks.join("\n\n"))
    }

    /// Structure of one visible table, straight from the live catalog
    ///
    /// # Errors
    ///
    /// Fails with [`UnknownTables`](DbContextError::UnknownTables) when the
    /// table is absent or hidden by a filter.
    pub fn describe_table(&self, table: &str) -> Result<TableDescriptor> {
        let visible = self.effective_table_names()?;
        if !visible.iter().any(|v| v == table) {
            return Err(DbContextError::unknown_tables([table]));
        }
        catalog::describe_table(self.conn, table)
    }

    /// Execute one SQL statement and render every result row
    ///
    /// Row-returning statements come back as a list of tuple literals, for
    /// example `[('Harrison',)]`; an empty result set renders as `[]`.
    /// Statements that return no rows (DML, DDL) are executed for effect and
    /// come back as the empty string.
    pub fn run(&self, command: &str) -> Result<String> {
        self.run_fetch(command, Fetch::All)
    }

    /// Execute one SQL statement with an explicit fetch mode
    ///
    /// [`Fetch::One`] renders only the first column of the first row, bare;
    /// on an empty result set it renders the empty string.
    pub fn run_fetch(&self, command: &str, fetch: Fetch) -> Result<String> {
        debug!("executing command: {}", command);
        let mut stmt = self.conn.prepare(command)?;

        if stmt.column_count() == 0 {
            let affected = stmt.execute([])?;
            debug!("statement affected {} rows", affected);
            return Ok(String::new());
        }

        let rows = collect_rows(&mut stmt)?;
        match fetch {
            Fetch::All => Ok(render_rows(&rows)),
            Fetch::One => Ok(rows
                .first()
                .and_then(|row| row.first())
                .map(SqlValue::display_text)
                .unwrap_or_default()),
        }
    }

    /// Live table list narrowed by the configured filters
    fn effective_table_names(&self) -> Result<Vec<String>> {
        let mut names = catalog::table_names(self.conn)?;
        if !self.options.include_tables.is_empty() {
            names.retain(|name| self.options.include_tables.iter().any(|inc| inc == name));
        } else if !self.options.ignore_tables.is_empty() {
            names.retain(|name| !self.options.ignore_tables.iter().any(|ign| ign == name));
        }
        Ok(names)
    }

    /// Fetch up to `limit` stored rows for a table's preview section
    ///
    /// The marker line in the report is display text; this is the statement
    /// actually executed.
    fn fetch_preview(&self, table: &TableDescriptor, limit: usize) -> Result<Vec<Vec<SqlValue>>> {
        let sql = format!("SELECT * FROM {} LIMIT {}", quote_identifier(&table.name), limit);
        let mut stmt = self.conn.prepare(&sql)?;
        collect_rows(&mut stmt)
    }
}

/// Drain a prepared statement into owned values
fn collect_rows(stmt: &mut rusqlite::Statement<'_>) -> Result<Vec<Vec<SqlValue>>> {
    let column_count = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..column_count)
                .map(|idx| SqlValue::from_column(row, idx))
                .collect::<rusqlite::Result<Vec<SqlValue>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Render result rows as a list of tuple literals
///
/// Single-element tuples keep a trailing comma (`('Harrison',)`) so the
/// output never collapses into a parenthesized scalar.
fn render_rows(rows: &[Vec<SqlValue>]) -> String {
    if rows.is_empty() {
        return "[]".to_string();
    }

    let tuples: Vec<String> = rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(SqlValue::literal).collect();
            if cells.len() == 1 {
                format!("({},)", cells[0])
            } else {
                format!("({})", cells.join(", "))
            }
        })
        .collect();

    format!("[{}]", tuples.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
        conn.execute_batch(
            "CREATE TABLE user (
                user_id INTEGER NOT NULL,
                user_name VARCHAR(16) NOT NULL,
                PRIMARY KEY (user_id)
            );
            CREATE TABLE company (
                company_id INTEGER NOT NULL,
                company_location VARCHAR NOT NULL,
                PRIMARY KEY (company_id)
            );",
        )
        .expect("Failed to create test tables");
        conn
    }

    #[test]
    fn test_options_default() {
        let options = DatabaseOptions::default();
        assert_eq!(options.sample_rows_in_table_info, DEFAULT_SAMPLE_ROWS);
        assert!(options.include_tables.is_empty());
        assert!(options.ignore_tables.is_empty());
    }

    #[test]
    fn test_options_builders() {
        let options = DatabaseOptions::default()
            .sample_rows(2)
            .include_tables(["user"]);
        assert_eq!(options.sample_rows_in_table_info, 2);
        assert_eq!(options.include_tables, vec!["user"]);
    }

    #[test]
    fn test_options_deserialize_fills_defaults() {
        let options: DatabaseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DatabaseOptions::default());

        let options: DatabaseOptions =
            serde_json::from_str(r#"{"sample_rows_in_table_info": 0}"#).unwrap();
        assert_eq!(options.sample_rows_in_table_info, 0);
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let conn = seeded_conn();
        let options = DatabaseOptions::default()
            .include_tables(["user"])
            .ignore_tables(["company"]);
        let err = SqlDatabase::with_options(&conn, options).unwrap_err();
        assert!(matches!(err, DbContextError::ConflictingTableFilters));
    }

    #[test]
    fn test_dialect() {
        let conn = seeded_conn();
        assert_eq!(SqlDatabase::new(&conn).dialect(), "sqlite");
    }

    #[test]
    fn test_table_names_include_filter() {
        let conn = seeded_conn();
        let db = SqlDatabase::with_options(
            &conn,
            DatabaseOptions::default().include_tables(["user", "not_yet_created"]),
        )
        .unwrap();
        assert_eq!(db.table_names().unwrap(), vec!["user"]);
    }

    #[test]
    fn test_table_names_ignore_filter() {
        let conn = seeded_conn();
        let db = SqlDatabase::with_options(
            &conn,
            DatabaseOptions::default().ignore_tables(["company"]),
        )
        .unwrap();
        assert_eq!(db.table_names().unwrap(), vec!["user"]);
    }

    #[test]
    fn test_describe_table_respects_filters() {
        let conn = seeded_conn();
        let db = SqlDatabase::with_options(
            &conn,
            DatabaseOptions::default().ignore_tables(["company"]),
        )
        .unwrap();

        assert_eq!(db.describe_table("user").unwrap().primary_key, vec!["user_id"]);
        let err = db.describe_table("company").unwrap_err();
        assert!(matches!(err, DbContextError::UnknownTables(_)));
    }

    #[test]
    fn test_render_rows_empty() {
        assert_eq!(render_rows(&[]), "[]");
    }

    #[test]
    fn test_render_rows_single_column_trailing_comma() {
        let rows = vec![vec![SqlValue::from("Harrison")]];
        assert_eq!(render_rows(&rows), "[('Harrison',)]");
    }

    #[test]
    fn test_render_rows_multi_column() {
        let rows = vec![
            vec![SqlValue::from(13), SqlValue::from("Harrison")],
            vec![SqlValue::from(14), SqlValue::from("Chase")],
        ];
        assert_eq!(render_rows(&rows), "[(13, 'Harrison'), (14, 'Chase')]");
    }

    #[test]
    fn test_fetch_serde_names() {
        assert_eq!(serde_json::to_string(&Fetch::All).unwrap(), "\"all\"");
        assert_eq!(serde_json::from_str::<Fetch>("\"one\"").unwrap(), Fetch::One);
    }
}
