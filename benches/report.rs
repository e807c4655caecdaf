//! Schema Report Performance Benchmarks
//!
//! Benchmarks for facade operations over in-memory databases:
//! - Report generation for a small catalog
//! - Report generation for a wide catalog with previews
//! - Statement execution and tuple-literal rendering
//!
//! Reports are rebuilt from the live catalog on every call, so these numbers
//! track the full introspect-fetch-render path, not a cache hit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dbcontext::{DatabaseOptions, SqlDatabase};
use rusqlite::Connection;

/// In-memory database with `tables` identical tables of `rows` rows each
fn seeded_conn(tables: usize, rows: usize) -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open in-memory database");

    for t in 0..tables {
        conn.execute_batch(&format!(
            "CREATE TABLE t{t:02} (
                id INTEGER NOT NULL,
                label VARCHAR(32) NOT NULL,
                score REAL,
                PRIMARY KEY (id)
            );"
        ))
        .expect("Failed to create table");

        let mut insert = conn
            .prepare(&format!("INSERT INTO t{t:02} (id, label, score) VALUES (?, ?, ?)"))
            .expect("Failed to prepare insert");
        for r in 0..rows {
            insert
                .execute(rusqlite::params![r as i64, format!("row {r}"), r as f64 / 2.0])
                .expect("Failed to insert");
        }
    }

    conn
}

fn bench_report_small_catalog(c: &mut Criterion) {
    let conn = seeded_conn(2, 3);
    let db = SqlDatabase::new(&conn);

    c.bench_function("schema_report_two_tables", |b| {
        b.iter(|| {
            let report = black_box(&db).table_info();
            assert!(report.is_ok());
            report
        });
    });
}

fn bench_report_wide_catalog(c: &mut Criterion) {
    let conn = seeded_conn(25, 50);
    let db = SqlDatabase::with_options(&conn, DatabaseOptions::default().sample_rows(3))
        .expect("Failed to build facade");

    c.bench_function("schema_report_25_tables", |b| {
        b.iter(|| {
            let report = black_box(&db).table_info();
            assert!(report.is_ok());
            report
        });
    });
}

fn bench_run_select(c: &mut Criterion) {
    let conn = seeded_conn(1, 100);
    let db = SqlDatabase::new(&conn);

    c.bench_function("run_select_100_rows", |b| {
        b.iter(|| {
            let output = db.run(black_box("SELECT id, label, score FROM t00 ORDER BY id"));
            assert!(output.is_ok());
            output
        });
    });
}

criterion_group!(
    benches,
    bench_report_small_catalog,
    bench_report_wide_catalog,
    bench_run_select
);
criterion_main!(benches);
