//! SQLite Foreign-Key Delete Benchmark
//!
//! Measures how the cost of one predicate-filtered bulk `DELETE` grows with
//! the number of `REFERENCES` constraints SQLite must check per deleted row.
//!
//! Three schema variants are built side by side, differing only in FK
//! fan-out (0, 1 and 10 constrained columns). They are populated with
//! identical data, arranged so the rows being deleted are never referenced,
//! and then each base table is bulk-deleted under its own transaction.
//!
//! Run the benchmark: `cargo run --release`
//! Run tests: `cargo test`

pub mod bench;
pub mod config;
pub mod error;
pub mod logging;
pub mod populate;
pub mod report;
pub mod run;
pub mod schema;
pub mod store;
pub mod verify;
