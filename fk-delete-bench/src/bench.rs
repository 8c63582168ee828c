//! The timed bulk delete.

use crate::error::{BenchError, Result};
use crate::populate::BLOCK_LEN;
use crate::store::Store;
use rusqlite::ErrorCode;
use std::time::{Duration, Instant};

/// Elapsed wall-clock time of one delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkResult {
    pub table: String,
    pub elapsed: Duration,
}

impl BenchmarkResult {
    /// Whole seconds, as reported.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }
}

pub fn delete_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE base_id % {BLOCK_LEN} = 0")
}

/// Delete every row whose `base_id` is a multiple of 11 in its own
/// transaction. The clock runs from just after BEGIN until COMMIT returns.
pub fn timed_delete(store: &Store, table: &str) -> Result<BenchmarkResult> {
    let sql = delete_sql(table);
    let tx = store.transaction()?;

    let start = Instant::now();
    store.exec(&sql).map_err(|e| constraint_violation(table, &sql, e))?;
    tx.commit().map_err(|e| constraint_violation(table, &sql, e))?;
    let elapsed = start.elapsed();

    log::debug!("{table}: delete took {:.3}s", elapsed.as_secs_f64());
    Ok(BenchmarkResult {
        table: table.to_string(),
        elapsed,
    })
}

/// Deferred or immediate FK failures are surfaced as their own error kind.
fn constraint_violation(table: &str, sql: &str, err: BenchError) -> BenchError {
    match err {
        BenchError::Exec { source, .. }
            if source.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) =>
        {
            BenchError::UnexpectedConstraintViolation {
                table: table.to_string(),
                sql: sql.to_string(),
                source,
            }
        }
        other => other,
    }
}
