//! Schema variants and atomic table creation.
//!
//! Three (base, dependent) table pairs are created. They share one shape and
//! differ only in how many dependent columns carry a `REFERENCES` clause:
//!
//! | Variant | Base table | Dependent table | FK columns |
//! |---------|------------|-----------------|------------|
//! | 0       | `Base0`    | `Dep0`          | none       |
//! | 1       | `Base1`    | `Dep1`          | `col_a`    |
//! | 10      | `Base10`   | `Dep10`         | all ten    |

use crate::error::Result;
use crate::store::Store;

/// The ten integer columns of every dependent table, in order.
pub const DEP_COLUMNS: [&str; 10] = [
    "col_a", "col_b", "col_c", "col_d", "col_e", "col_f", "col_g", "col_h", "col_i", "col_j",
];

/// One schema variant: a tag used in table names and its FK fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub tag: u32,
    pub fk_columns: usize,
}

/// Every variant, in the order phases process them.
pub const VARIANTS: [Variant; 3] = [
    Variant {
        tag: 0,
        fk_columns: 0,
    },
    Variant {
        tag: 1,
        fk_columns: 1,
    },
    Variant {
        tag: 10,
        fk_columns: 10,
    },
];

impl Variant {
    pub fn base_table(&self) -> String {
        format!("Base{}", self.tag)
    }

    pub fn dep_table(&self) -> String {
        format!("Dep{}", self.tag)
    }

    /// Dependent columns that reference the base table.
    pub fn constrained_columns(&self) -> &'static [&'static str] {
        &DEP_COLUMNS[..self.fk_columns.min(DEP_COLUMNS.len())]
    }

    pub fn create_base_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (base_id INTEGER PRIMARY KEY, val_a INTEGER, val_b TEXT)",
            self.base_table()
        )
    }

    pub fn create_dep_sql(&self) -> String {
        let base = self.base_table();
        let constrained = self.constrained_columns();
        let columns: Vec<String> = DEP_COLUMNS
            .iter()
            .map(|col| {
                if constrained.contains(col) {
                    format!("{col} INTEGER NOT NULL REFERENCES {base}(base_id)")
                } else {
                    format!("{col} INTEGER NOT NULL")
                }
            })
            .collect();
        format!(
            "CREATE TABLE {} (dep_id INTEGER PRIMARY KEY, {})",
            self.dep_table(),
            columns.join(", ")
        )
    }
}

/// The six CREATE TABLE statements: all bases first, then all dependents.
pub fn schema_statements() -> Vec<String> {
    let bases = VARIANTS.iter().map(Variant::create_base_sql);
    let deps = VARIANTS.iter().map(Variant::create_dep_sql);
    bases.chain(deps).collect()
}

/// Turn on FK enforcement, then create every table in one transaction.
pub fn build(store: &Store) -> Result<()> {
    store.enable_foreign_keys()?;
    create_all(store, &schema_statements())
}

/// Run `statements` atomically: either all of them take effect or none.
pub fn create_all(store: &Store, statements: &[String]) -> Result<()> {
    let tx = store.transaction()?;
    for sql in statements {
        log::debug!("{sql}");
        // An error drops `tx`, rolling back the tables created so far.
        store.exec(sql)?;
    }
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dep_sql_for_each_fan_out() {
        assert_eq!(
            VARIANTS[0].create_dep_sql(),
            "CREATE TABLE Dep0 (dep_id INTEGER PRIMARY KEY, col_a INTEGER NOT NULL, \
             col_b INTEGER NOT NULL, col_c INTEGER NOT NULL, col_d INTEGER NOT NULL, \
             col_e INTEGER NOT NULL, col_f INTEGER NOT NULL, col_g INTEGER NOT NULL, \
             col_h INTEGER NOT NULL, col_i INTEGER NOT NULL, col_j INTEGER NOT NULL)"
        );

        let one = VARIANTS[1].create_dep_sql();
        assert_eq!(one.matches("REFERENCES Base1(base_id)").count(), 1);
        assert!(one.contains("col_a INTEGER NOT NULL REFERENCES Base1(base_id), col_b"));

        let ten = VARIANTS[2].create_dep_sql();
        assert_eq!(ten.matches("REFERENCES Base10(base_id)").count(), 10);
    }

    #[test]
    fn base_sql_is_identical_across_variants() {
        for v in VARIANTS {
            assert_eq!(
                v.create_base_sql(),
                format!(
                    "CREATE TABLE Base{} (base_id INTEGER PRIMARY KEY, val_a INTEGER, val_b TEXT)",
                    v.tag
                )
            );
        }
    }

    #[test]
    fn constrained_columns_match_fan_out() {
        assert!(VARIANTS[0].constrained_columns().is_empty());
        assert_eq!(VARIANTS[1].constrained_columns(), &["col_a"]);
        assert_eq!(VARIANTS[2].constrained_columns(), &DEP_COLUMNS);
    }

    #[test]
    fn references_follow_constrained_columns() {
        for v in VARIANTS {
            let sql = v.create_dep_sql();
            for col in DEP_COLUMNS {
                let clause = format!("{col} INTEGER NOT NULL REFERENCES {}(base_id)", v.base_table());
                assert_eq!(
                    sql.contains(&clause),
                    v.constrained_columns().contains(&col),
                    "{} {col}",
                    v.dep_table()
                );
            }
        }
    }

    #[test]
    fn build_creates_six_tables_with_fk_on() {
        let store = Store::open_in_memory().unwrap();
        build(&store).unwrap();

        assert!(store.foreign_keys_enabled().unwrap());
        for v in VARIANTS {
            assert!(store.table_exists(&v.base_table()).unwrap());
            assert!(store.table_exists(&v.dep_table()).unwrap());
        }
        let fk_count = store
            .query_i64("SELECT COUNT(*) FROM pragma_foreign_key_list('Dep10')")
            .unwrap();
        assert_eq!(fk_count, 10);
    }

    #[test]
    fn build_twice_fails_and_keeps_first_schema() {
        let store = Store::open_in_memory().unwrap();
        build(&store).unwrap();
        assert!(build(&store).is_err());
        assert!(store.table_exists("Dep10").unwrap());
    }
}
