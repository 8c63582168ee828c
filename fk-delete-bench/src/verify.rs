//! Sanity checks run between population and the timed deletes.

use crate::error::{BenchError, Result};
use crate::populate::BLOCK_LEN;
use crate::schema::{DEP_COLUMNS, VARIANTS};
use crate::store::Store;

/// Fail unless `table` now holds exactly one row more than `before`.
pub fn check_count_increment(store: &Store, table: &str, before: i64) -> Result<i64> {
    let after = store.count_rows(table)?;
    if after != before + 1 {
        return Err(BenchError::PopulationIntegrityViolation {
            table: table.to_string(),
            expected: before + 1,
            actual: after,
        });
    }
    Ok(after)
}

/// Every base table must hold `count` rows.
pub fn check_base_counts(store: &Store, count: i64) -> Result<()> {
    for v in &VARIANTS {
        let table = v.base_table();
        let actual = store.count_rows(&table)?;
        if actual != count {
            return Err(BenchError::PopulationIntegrityViolation {
                table,
                expected: count,
                actual,
            });
        }
    }
    Ok(())
}

/// Dependent rows holding an id the delete will remove, in any column.
pub fn doomed_references(store: &Store, dep_table: &str) -> Result<i64> {
    let predicate: Vec<String> = DEP_COLUMNS
        .iter()
        .map(|c| format!("{c} % {BLOCK_LEN} = 0"))
        .collect();
    let sql = format!(
        "SELECT COUNT(*) FROM {dep_table} WHERE {}",
        predicate.join(" OR ")
    );
    store.query_i64(&sql)
}

/// No dependent table may reference a base id the delete will remove.
///
/// Checked for the unconstrained variant too, where only the population
/// order keeps the implicit relationship intact.
pub fn check_referential_safety(store: &Store) -> Result<()> {
    for v in &VARIANTS {
        let table = v.dep_table();
        let hits = doomed_references(store, &table)?;
        if hits != 0 {
            return Err(BenchError::PopulationIntegrityViolation {
                table,
                expected: 0,
                actual: hits,
            });
        }
    }
    Ok(())
}
