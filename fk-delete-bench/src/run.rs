//! The benchmark as a linear sequence of phases.
//!
//! `Uninitialized -> SchemaCreated -> BasesPopulated -> DependentsVerified
//! -> Deleted(0) -> Deleted(1) -> Deleted(10) -> Done`
//!
//! Each [`BenchRun::step`] performs exactly one transition. Any failure
//! moves the run to `Aborted` and returns the error.

use crate::bench::{self, BenchmarkResult};
use crate::config::BenchConfig;
use crate::error::Result;
use crate::populate;
use crate::report::{self, Reporter};
use crate::schema::{self, VARIANTS};
use crate::store::Store;
use crate::verify;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    SchemaCreated,
    BasesPopulated,
    DependentsVerified,
    /// The base table of the variant with this tag has been deleted from.
    Deleted(u32),
    Done,
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }
}

pub struct BenchRun<'s, W: Write> {
    store: &'s Store,
    row_count: i64,
    reporter: Reporter<W>,
    phase: Phase,
    results: Vec<BenchmarkResult>,
}

impl<'s, W: Write> BenchRun<'s, W> {
    pub fn new(store: &'s Store, row_count: i64, out: W) -> Self {
        Self {
            store,
            row_count,
            reporter: Reporter::new(out),
            phase: Phase::Uninitialized,
            results: Vec::with_capacity(VARIANTS.len()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Perform the next transition. Terminal phases are left unchanged.
    pub fn step(&mut self) -> Result<Phase> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }
        match self.advance() {
            Ok(next) => {
                log::info!("{:?} -> {:?}", self.phase, next);
                self.phase = next;
                Ok(next)
            }
            Err(e) => {
                log::debug!("Run aborted during {:?}: {e}", self.phase);
                self.phase = Phase::Aborted;
                Err(e)
            }
        }
    }

    /// Step until `Done`, returning the per-table delete timings.
    pub fn run_to_completion(mut self) -> Result<(Vec<BenchmarkResult>, W)> {
        while !self.phase.is_terminal() {
            self.step()?;
        }
        Ok((self.results, self.reporter.into_inner()))
    }

    fn advance(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Uninitialized => {
                self.reporter.line(report::SCHEMA_LINE)?;
                schema::build(self.store)?;
                Ok(Phase::SchemaCreated)
            }
            Phase::SchemaCreated => {
                self.reporter.line(report::BASES_LINE)?;
                populate::populate_bases(self.store, self.row_count)?;
                verify::check_base_counts(self.store, self.row_count)?;
                Ok(Phase::BasesPopulated)
            }
            Phase::BasesPopulated => {
                self.reporter.line(report::DEPENDENTS_LINE)?;
                populate::populate_dependents(self.store, self.row_count)?;
                verify::check_referential_safety(self.store)?;
                for v in &VARIANTS {
                    let base = self.store.count_rows(&v.base_table())?;
                    let dep = self.store.count_rows(&v.dep_table())?;
                    self.reporter.counts(v, base, dep)?;
                }
                Ok(Phase::DependentsVerified)
            }
            Phase::DependentsVerified => self.delete_variant(0),
            Phase::Deleted(tag) => {
                let done = VARIANTS
                    .iter()
                    .position(|v| v.tag == tag)
                    .map_or(VARIANTS.len(), |i| i + 1);
                if done < VARIANTS.len() {
                    self.delete_variant(done)
                } else {
                    for result in &self.results {
                        self.reporter.timing(result)?;
                    }
                    Ok(Phase::Done)
                }
            }
            Phase::Done | Phase::Aborted => Ok(self.phase),
        }
    }

    fn delete_variant(&mut self, idx: usize) -> Result<Phase> {
        let variant = VARIANTS[idx];
        let result = bench::timed_delete(self.store, &variant.base_table())?;
        self.results.push(result);
        Ok(Phase::Deleted(variant.tag))
    }
}

/// Open a fresh store at the configured path, run every phase, and release
/// the store. The store is closed on every exit path.
pub fn run<W: Write>(config: &BenchConfig, out: W) -> Result<Vec<BenchmarkResult>> {
    let mut store = Store::open(&config.db_path)?;
    log::info!(
        "Benchmarking {} rows per base table in {}",
        config.row_count,
        config.db_path.display()
    );
    let (results, _out) = BenchRun::new(&store, config.row_count, out).run_to_completion()?;
    store.close()?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_in_order() {
        let store = Store::open_in_memory().unwrap();
        let mut run = BenchRun::new(&store, 22, Vec::new());

        let expected = [
            Phase::SchemaCreated,
            Phase::BasesPopulated,
            Phase::DependentsVerified,
            Phase::Deleted(0),
            Phase::Deleted(1),
            Phase::Deleted(10),
            Phase::Done,
        ];
        for phase in expected {
            assert_eq!(run.step().unwrap(), phase);
        }
        // Terminal: stepping again changes nothing.
        assert_eq!(run.step().unwrap(), Phase::Done);
        assert_eq!(run.results().len(), 3);
    }

    #[test]
    fn failure_aborts_the_run() {
        let store = Store::open_in_memory().unwrap();
        store
            .exec("CREATE TABLE Base0 (base_id INTEGER PRIMARY KEY)")
            .unwrap();
        let mut run = BenchRun::new(&store, 22, Vec::new());

        assert!(run.step().is_err());
        assert_eq!(run.phase(), Phase::Aborted);
        assert_eq!(run.step().unwrap(), Phase::Aborted);
        // The failed schema batch left nothing behind.
        assert!(!store.table_exists("Dep0").unwrap());
    }
}
