//! Benchmarks for schema parsing
//!
//! Measures the full parse pipeline on synthetic schemas with many tables,
//! sequentially and on worker threads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlentity_sql::{normalize, split_clauses, SchemaParser};

/// Generate a schema of N tables, each referencing the previous one
fn generate_schema(num_tables: usize, num_columns: usize) -> String {
    let mut sql = String::new();

    for t in 0..num_tables {
        sql.push_str(&format!("-- table {}\nCREATE TABLE table_{} (\n", t, t));
        sql.push_str("    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,\n");
        for c in 0..num_columns {
            let column = match c % 4 {
                0 => format!("    col_{} VARCHAR(255) NOT NULL DEFAULT 'x, y'", c),
                1 => format!("    col_{} DECIMAL(10,2) UNSIGNED DEFAULT 0.00", c),
                2 => format!("    col_{} DATETIME DEFAULT CURRENT_TIMESTAMP", c),
                _ => format!("    col_{} INT COMMENT 'counter'", c),
            };
            sql.push_str(&column);
            sql.push_str(",\n");
        }
        if t > 0 {
            sql.push_str(&format!("    parent_id BIGINT UNSIGNED,\n    FOREIGN KEY (parent_id) REFERENCES table_{}(id),\n", t - 1));
        }
        sql.push_str("    PRIMARY KEY (id)\n) ENGINE=InnoDB;\n\n");
    }

    sql
}

/// Benchmark: full pipeline (100, 500, 1000 tables)
fn bench_parse_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_schema");

    for num_tables in [100, 500, 1000].iter() {
        let sql = generate_schema(*num_tables, 12);

        group.bench_with_input(BenchmarkId::from_parameter(num_tables), num_tables, |b, _| {
            let parser = SchemaParser::new();
            b.iter(|| black_box(parser.parse(&sql)));
        });
    }

    group.finish();
}

/// Benchmark: worker threads on a large schema
fn bench_parallel_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_parse");
    let sql = generate_schema(1000, 24);

    for jobs in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(jobs), jobs, |b, jobs| {
            let parser = SchemaParser::new().with_jobs(*jobs);
            b.iter(|| black_box(parser.parse(&sql)));
        });
    }

    group.finish();
}

/// Benchmark: normalization and clause splitting alone
fn bench_lexical_passes(c: &mut Criterion) {
    let sql = generate_schema(200, 12);

    c.bench_function("normalize", |b| b.iter(|| black_box(normalize(&sql))));

    let normalized = normalize(&sql);
    c.bench_function("split_clauses", |b| b.iter(|| black_box(split_clauses(&normalized).len())));
}

criterion_group!(benches, bench_parse_schema, bench_parallel_parse, bench_lexical_passes);

criterion_main!(benches);
