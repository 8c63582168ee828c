//! Run configuration, read from the environment (and `.env`, if present).
//!
//!   FK_BENCH_DB_PATH    store file, recreated on every run
//!   FK_BENCH_ROW_COUNT  rows per base table
//!   FK_BENCH_LOG_LEVEL  stderr log level (`off`, `error`, ... `trace`)
//!   FK_BENCH_LOG_FILE   optional log file

use crate::error::{BenchError, Result};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "fk_delete_bench.db";
pub const DEFAULT_ROW_COUNT: i64 = 200_000;

const DB_PATH_VAR: &str = "FK_BENCH_DB_PATH";
const ROW_COUNT_VAR: &str = "FK_BENCH_ROW_COUNT";
const LOG_LEVEL_VAR: &str = "FK_BENCH_LOG_LEVEL";
const LOG_FILE_VAR: &str = "FK_BENCH_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub db_path: PathBuf,
    pub row_count: i64,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            row_count: DEFAULT_ROW_COUNT,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// Load `.env` (missing file is fine) and then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_VAR).filter(|p| !p.is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ROW_COUNT_VAR) {
            config.row_count = match raw.trim().parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(BenchError::Config {
                        key: ROW_COUNT_VAR,
                        value: raw,
                    })
                }
            };
        }

        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            config.log_level = raw.trim().parse().map_err(|_| BenchError::Config {
                key: LOG_LEVEL_VAR,
                value: raw.clone(),
            })?;
        }

        config.log_file = lookup(LOG_FILE_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}
