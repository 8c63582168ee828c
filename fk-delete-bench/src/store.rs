//! Thin handle over the SQLite connection used by every phase.
//!
//! All SQL goes through [`Store`] so that each failure is reported as the
//! matching [`BenchError`] kind, carrying the statement text and the
//! store's own message.

use crate::error::{BenchError, Result};
use rusqlite::types::Value;
use rusqlite::{ffi, Connection, Statement, Transaction};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files SQLite may leave next to a database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Process-wide store handle. Opened once, closed exactly once.
pub struct Store {
    conn: Option<Connection>,
}

impl Store {
    /// Open a fresh database at `path`, deleting whatever was there before.
    pub fn open(path: &Path) -> Result<Self> {
        remove_stale(path)?;
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            remove_stale(Path::new(&sidecar))?;
        }

        let conn = Connection::open(path).map_err(|source| BenchError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened store at {}", path.display());
        Ok(Self { conn: Some(conn) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| BenchError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self { conn: Some(conn) })
    }

    /// Close the handle. Calling this again after a successful close is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            None => Ok(()),
            Some(conn) => conn
                .close()
                .map_err(|(_conn, source)| BenchError::Close { source }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(BenchError::Closed)
    }

    /// Run parameterless SQL, discarding any rows.
    pub fn exec(&self, sql: &str) -> Result<()> {
        self.conn()?
            .execute_batch(sql)
            .map_err(|source| BenchError::Exec {
                sql: sql.to_string(),
                source,
            })
    }

    pub fn prepare(&self, sql: &str) -> Result<Prepared<'_>> {
        let stmt = self
            .conn()?
            .prepare(sql)
            .map_err(|source| BenchError::Prepare {
                sql: sql.to_string(),
                source,
            })?;
        Ok(Prepared {
            sql: sql.to_string(),
            stmt,
        })
    }

    /// `SELECT COUNT(*)` over a whole table.
    pub fn count_rows(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let mut prepared = self.prepare(&sql)?;
        prepared
            .stmt
            .query_row([], |row| row.get(0))
            .map_err(|source| BenchError::Execute { sql, source })
    }

    /// Single-value query, used by the verification checks.
    pub fn query_i64(&self, sql: &str) -> Result<i64> {
        let mut prepared = self.prepare(sql)?;
        prepared
            .stmt
            .query_row([], |row| row.get(0))
            .map_err(|source| BenchError::Execute {
                sql: sql.to_string(),
                source,
            })
    }

    /// Begin a transaction. It rolls back if dropped without `commit()`.
    pub fn transaction(&self) -> Result<StoreTransaction<'_>> {
        let tx = self
            .conn()?
            .unchecked_transaction()
            .map_err(|source| BenchError::Exec {
                sql: "BEGIN TRANSACTION".to_string(),
                source,
            })?;
        Ok(StoreTransaction { tx })
    }

    /// Must run outside any transaction; SQLite ignores the pragma otherwise.
    pub fn enable_foreign_keys(&self) -> Result<()> {
        self.exec("PRAGMA foreign_keys = ON")
    }

    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        Ok(self.query_i64("PRAGMA foreign_keys")? == 1)
    }

    /// Whether a table with this name exists in the schema.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        const SQL: &str = "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";
        let count: i64 = self
            .conn()?
            .query_row(SQL, [table], |row| row.get(0))
            .map_err(|source| BenchError::Execute {
                sql: SQL.to_string(),
                source,
            })?;
        Ok(count > 0)
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Store did not close cleanly: {e}");
        }
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::info!("Removed existing store file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BenchError::RemoveStale {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub struct StoreTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl StoreTransaction<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(|source| BenchError::Exec {
            sql: "COMMIT TRANSACTION".to_string(),
            source,
        })
    }
}

/// How a bind call ended.
///
/// A bind failure reported with a zero session error code is not a real
/// failure and is treated as bound. rusqlite never builds an error from
/// `SQLITE_OK`, and a successful `sqlite3_bind_*` resets the session code to
/// zero, so with this binding only `Bound` and `Failed` occur in practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    BenignFalseReturn,
    Failed { code: i32, message: String },
}

impl BindOutcome {
    pub fn classify(result: rusqlite::Result<()>) -> Self {
        match result {
            Ok(()) => BindOutcome::Bound,
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.extended_code == ffi::SQLITE_OK => {
                BindOutcome::BenignFalseReturn
            }
            Err(rusqlite::Error::SqliteFailure(err, message)) => BindOutcome::Failed {
                code: err.extended_code,
                message: message.unwrap_or_else(|| err.to_string()),
            },
            // Raised by the driver before reaching the store: no store code.
            Err(other) => BindOutcome::Failed {
                code: -1,
                message: other.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, BindOutcome::Failed { .. })
    }
}

/// A prepared statement that remembers its SQL for diagnostics.
pub struct Prepared<'conn> {
    sql: String,
    stmt: Statement<'conn>,
}

impl Prepared<'_> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind `value` to the named parameter (`:name`) and report the outcome.
    pub fn try_bind(&mut self, name: &str, value: &Value) -> BindOutcome {
        match self.stmt.parameter_index(name) {
            Ok(Some(idx)) => BindOutcome::classify(self.stmt.raw_bind_parameter(idx, value)),
            Ok(None) => BindOutcome::Failed {
                code: ffi::SQLITE_RANGE,
                message: format!("no parameter named {name} in `{}`", self.sql),
            },
            Err(e) => BindOutcome::classify(Err(e)),
        }
    }

    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self.try_bind(name, &value) {
            BindOutcome::Bound => Ok(()),
            BindOutcome::BenignFalseReturn => {
                log::trace!("Ignoring bind failure with zero error code for {name}");
                Ok(())
            }
            BindOutcome::Failed { code, message } => Err(BenchError::Bind {
                param: name.to_string(),
                value: describe(&value),
                code,
                message,
            }),
        }
    }

    /// Step the statement once with the currently bound values.
    pub fn execute(&mut self) -> Result<usize> {
        self.stmt
            .raw_execute()
            .map_err(|source| BenchError::Execute {
                sql: self.sql().to_string(),
                source,
            })
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => format!("'{s}'"),
        Value::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}
