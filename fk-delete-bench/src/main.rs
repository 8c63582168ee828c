//! Standalone runner: recreates the store, populates it, times the three
//! deletes and prints the report to stdout.
//!
//! Usage:
//!   cargo run --release
//!   FK_BENCH_ROW_COUNT=50000 FK_BENCH_DB_PATH=/tmp/fk.db cargo run --release

use anyhow::Context;
use fk_delete_bench::config::BenchConfig;
use fk_delete_bench::logging::initialize_logger;
use fk_delete_bench::run::run;
use std::io;
use std::process;

fn main() {
    if let Err(e) = try_main() {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{e:#}");
        } else {
            eprintln!("fk-delete-bench: {e:#}");
        }
        process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = BenchConfig::from_env().context("invalid configuration")?;
    initialize_logger(config.log_level, config.log_file.as_deref())?;

    log::info!("Starting SQLite foreign-key delete benchmark");
    let results = run(&config, io::stdout().lock()).context("benchmark aborted")?;

    let slowest = results.iter().max_by_key(|r| r.elapsed);
    if let Some(r) = slowest {
        log::info!("Slowest delete: {} ({:.3}s)", r.table, r.elapsed.as_secs_f64());
    }
    Ok(())
}
