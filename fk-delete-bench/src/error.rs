//! Error kinds for the benchmark pipeline.
//!
//! Every error is fatal: the run stops at the first one, the store is
//! released, and the process exits non-zero with the message below.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("cannot open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot remove stale store file {path}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to close store: {source}")]
    Close {
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to prepare `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to bind {param} = {value} (store error code {code}): {message}")]
    Bind {
        param: String,
        value: String,
        code: i32,
        message: String,
    },

    #[error("failed to execute `{sql}`: {source}")]
    Execute {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to exec `{sql}`: {source}")]
    Exec {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("population integrity violation in {table}: expected {expected} rows, found {actual}")]
    PopulationIntegrityViolation {
        table: String,
        expected: i64,
        actual: i64,
    },

    #[error("unexpected constraint violation deleting from {table} with `{sql}`: {source}")]
    UnexpectedConstraintViolation {
        table: String,
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    #[error("store handle already closed")]
    Closed,
}
