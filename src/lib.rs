//! dbcontext - Schema Reports and SQL Execution for LLM Agents
//!
//! A thin, synchronous facade over a live SQLite connection that the caller
//! owns. It exposes the two operations an agent loop needs between prompts:
//! a schema report formatted for model consumption (per-table `CREATE TABLE`
//! blocks with a short preview of stored rows), and ad-hoc SQL execution
//! with results rendered as plain text.
//!
//! # Core Behavior
//! - Reports are recomputed from the live catalog on every call (no caching)
//! - Row-returning statements render as tuple-literal lists, e.g.
//!   `[('Harrison',)]`; statements without result rows render as `""`
//! - Include/ignore filters narrow which tables the facade exposes
//! - Engine errors propagate unchanged to the caller
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`value`] - SQLite values as owned Rust data, plus text renderings
//! - [`catalog`] - Live-catalog introspection (table and column structure)
//! - [`report`] - Schema report text assembly
//! - [`database`] - The facade itself: options, reports, execution
//!
//! # Public API
//! Most callers only need [`SqlDatabase`] and, when tuning previews or
//! table visibility, [`DatabaseOptions`]:
//! - Facade: [`SqlDatabase`], [`DatabaseOptions`], [`Fetch`]
//! - Structure: [`TableDescriptor`], [`ColumnDescriptor`]
//! - Values: [`SqlValue`]
//! - Errors: [`DbContextError`], [`Result`]

pub mod catalog;   // Live-catalog introspection
pub mod database;  // Facade: schema reports and statement execution
pub mod error;     // Error handling infrastructure
pub mod report;    // Schema report text assembly
pub mod value;     // SQLite values as owned Rust data

// Re-export commonly used types for convenience
pub use catalog::{ColumnDescriptor, TableDescriptor};
pub use database::{DatabaseOptions, Fetch, SqlDatabase, DEFAULT_SAMPLE_ROWS};
pub use error::{DbContextError, Result};
pub use value::SqlValue;
