//! Report module: the human-readable progress and timing lines.
//!
//! Line formats are pure functions so tests can pin them down; [`Reporter`]
//! only writes them out.

use crate::bench::BenchmarkResult;
use crate::schema::Variant;
use std::io::{self, Write};

pub const SCHEMA_LINE: &str = "Creating tables";
pub const BASES_LINE: &str = "Populating base tables";
pub const DEPENDENTS_LINE: &str = "Populating dependent tables";

pub fn count_line(variant: &Variant, base_count: i64, dep_count: i64) -> String {
    format!(
        "{base_count} / {dep_count} rows in {} / {}",
        variant.base_table(),
        variant.dep_table()
    )
}

pub fn timing_line(result: &BenchmarkResult) -> String {
    format!("{}  {} seconds", result.table, result.elapsed_seconds())
}

/// Writes report lines to any sink (stdout in the binary).
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn counts(&mut self, variant: &Variant, base_count: i64, dep_count: i64) -> io::Result<()> {
        self.line(&count_line(variant, base_count, dep_count))
    }

    pub fn timing(&mut self, result: &BenchmarkResult) -> io::Result<()> {
        self.line(&timing_line(result))
    }
}
