//! Error Handling Infrastructure
//!
//! This module defines the error type used throughout dbcontext.
//!
//! # Error Categories
//! - `Sqlite`: errors originating in the underlying engine, passed through unchanged
//! - `UnknownTables`: a requested table subset named tables absent from the live catalog
//! - `ConflictingTableFilters`: include and ignore filters were both supplied
//!
//! Engine errors are wrapped transparently: the facade never catches,
//! translates, or suppresses what the driver reports.

use thiserror::Error;

/// Main error type for dbcontext operations
#[derive(Error, Debug)]
pub enum DbContextError {
    /// Error reported by the underlying SQLite driver
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Requested tables that do not exist in the live catalog
    #[error("table_names {0:?} not found in database")]
    UnknownTables(Vec<String>),

    /// Both an include list and an ignore list were configured
    #[error("Cannot specify both include_tables and ignore_tables")]
    ConflictingTableFilters,
}

impl DbContextError {
    /// Create an unknown-tables error
    ///
    /// Names are sorted so the message is deterministic regardless of how the
    /// missing set was collected.
    pub fn unknown_tables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Self::UnknownTables(names)
    }
}

/// Result type alias for dbcontext operations
pub type Result<T> = std::result::Result<T, DbContextError>;
