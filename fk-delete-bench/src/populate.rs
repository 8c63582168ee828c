//! Deterministic population of the base and dependent tables.
//!
//! Base row `i` (1-indexed) holds `val_a = 1000 + i` and `val_b` as its
//! decimal string, identically in every base table.
//!
//! Dependent rows come in blocks of 11 base ids starting at 1, 12, 23, ...
//! A block's row references its first ten ids and never the eleventh, so
//! every base id divisible by 11 stays unreferenced and can be deleted
//! under any FK fan-out.

use crate::error::Result;
use crate::schema::{Variant, DEP_COLUMNS, VARIANTS};
use crate::store::Store;
use crate::verify;

/// Base ids per block; the last one is never referenced.
pub const BLOCK_LEN: i64 = 11;

/// Offset added to the row index to form `val_a`.
pub const VAL_A_OFFSET: i64 = 1000;

/// `(val_a, val_b)` for the i-th base row.
pub fn base_row(i: i64) -> (i64, String) {
    let val_a = VAL_A_OFFSET + i;
    (val_a, val_a.to_string())
}

/// Block starts `1, 12, 23, ...` while the block's last referenced id fits.
pub fn block_starts(count: i64) -> impl Iterator<Item = i64> {
    (1..)
        .step_by(BLOCK_LEN as usize)
        .take_while(move |&i| i + (BLOCK_LEN - 1) <= count)
}

/// Column values of the dependent row for the block starting at `start`.
pub fn block_values(start: i64) -> [i64; 10] {
    std::array::from_fn(|k| start + k as i64)
}

/// Number of dependent rows `populate_dependents(count)` inserts per table.
pub fn expected_dependent_rows(count: i64) -> i64 {
    block_starts(count).count() as i64
}

fn base_insert_sql(variant: &Variant) -> String {
    format!(
        "INSERT INTO {} (val_a, val_b) VALUES (:val_a, :val_b)",
        variant.base_table()
    )
}

fn dep_insert_sql(variant: &Variant) -> String {
    let params: Vec<String> = DEP_COLUMNS.iter().map(|c| format!(":{c}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        variant.dep_table(),
        DEP_COLUMNS.join(", "),
        params.join(", ")
    )
}

/// Insert `count` rows into each base table inside one transaction.
pub fn populate_bases(store: &Store, count: i64) -> Result<()> {
    let tx = store.transaction()?;
    {
        let mut stmts = Vec::with_capacity(VARIANTS.len());
        for v in &VARIANTS {
            stmts.push(store.prepare(&base_insert_sql(v))?);
        }

        for i in 1..=count {
            let (val_a, val_b) = base_row(i);
            for stmt in stmts.iter_mut() {
                stmt.bind(":val_a", val_a)?;
                stmt.bind(":val_b", val_b.clone())?;
                stmt.execute()?;
            }
        }
    }
    tx.commit()?;
    log::info!(
        "Inserted {count} rows into each of {} base tables",
        VARIANTS.len()
    );
    Ok(())
}

/// Insert one dependent row per block into each dependent table.
///
/// Each block gets its own transaction. The row count of the first
/// dependent table is checked after every block.
pub fn populate_dependents(store: &Store, count: i64) -> Result<i64> {
    let mut stmts = Vec::with_capacity(VARIANTS.len());
    for v in &VARIANTS {
        stmts.push(store.prepare(&dep_insert_sql(v))?);
    }
    let canary = VARIANTS[0].dep_table();

    let mut blocks = 0;
    for start in block_starts(count) {
        let tx = store.transaction()?;
        let before = store.count_rows(&canary)?;

        let values = block_values(start);
        for stmt in stmts.iter_mut() {
            for (col, &value) in DEP_COLUMNS.iter().zip(values.iter()) {
                stmt.bind(&format!(":{col}"), value)?;
            }
            stmt.execute()?;
        }

        verify::check_count_increment(store, &canary, before)?;
        tx.commit()?;
        log::trace!("Block at {start} inserted");
        blocks += 1;
    }

    log::info!(
        "Inserted {blocks} rows into each of {} dependent tables",
        VARIANTS.len()
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rows_follow_offset() {
        assert_eq!(base_row(1), (1001, "1001".to_string()));
        assert_eq!(base_row(200_000), (201_000, "201000".to_string()));
    }

    #[test]
    fn block_starts_stop_before_overrun() {
        assert_eq!(block_starts(22).collect::<Vec<_>>(), vec![1, 12]);
        assert_eq!(block_starts(21).collect::<Vec<_>>(), vec![1]);
        assert_eq!(block_starts(10).count(), 0);
        assert_eq!(block_starts(0).count(), 0);
        assert_eq!(block_starts(11).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn blocks_never_touch_multiples_of_eleven() {
        for start in block_starts(2_000) {
            assert_eq!(start % BLOCK_LEN, 1);
            for v in block_values(start) {
                assert_ne!(v % BLOCK_LEN, 0, "block {start} references {v}");
            }
        }
    }

    #[test]
    fn block_values_are_consecutive() {
        assert_eq!(block_values(12), [12, 13, 14, 15, 16, 17, 18, 19, 20, 21]);
    }

    #[test]
    fn expected_rows_for_default_count() {
        // The last block starts at 199981 and ends at 199990.
        assert_eq!(expected_dependent_rows(200_000), 18_181);
    }

    #[test]
    fn insert_sql_uses_named_parameters() {
        assert_eq!(
            base_insert_sql(&VARIANTS[2]),
            "INSERT INTO Base10 (val_a, val_b) VALUES (:val_a, :val_b)"
        );
        let dep = dep_insert_sql(&VARIANTS[1]);
        assert!(dep.starts_with("INSERT INTO Dep1 (col_a, col_b,"));
        assert!(dep.ends_with("(:col_a, :col_b, :col_c, :col_d, :col_e, :col_f, :col_g, :col_h, :col_i, :col_j)"));
    }
}
