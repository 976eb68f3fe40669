// Productive / unproductive partitioning.
use tracing::{info, warn};

use crate::columns::{ColumnKey, ColumnMap};
use crate::table::Table;

/// Status token marking an order as unproductive. Matched after trimming and
/// lowercasing; everything else, including a missing status, is productive.
pub const STATUS_UNPRODUCTIVE: &str = "improdutivo";

/// Split a calculated table into (productive, unproductive) subsets.
///
/// When no status column resolves the whole table is treated as productive
/// and the unproductive subset is empty; that is a degrade, not a failure.
pub fn split_by_status(table: &Table, columns: &ColumnMap) -> (Table, Table) {
    let Some(status_col) = columns.get(ColumnKey::Status) else {
        warn!("status column not found, treating all records as productive");
        return (table.clone(), Table::new(table.headers().to_vec()));
    };

    let unproductive_rows: Vec<bool> = (0..table.row_count())
        .map(|i| {
            table
                .cell(i, status_col)
                .map(|s| s.trim().to_lowercase() == STATUS_UNPRODUCTIVE)
                .unwrap_or(false)
        })
        .collect();

    let productive = table.filter_rows(|i| !unproductive_rows[i]);
    let unproductive = table.filter_rows(|i| unproductive_rows[i]);

    info!(
        "total records: {}, productive: {}, unproductive: {}",
        table.row_count(),
        productive.row_count(),
        unproductive.row_count()
    );

    (productive, unproductive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnAliases;

    fn table(status: &[&str]) -> Table {
        let mut t = Table::new(vec!["Equipe".into(), "Status".into()]);
        for (i, s) in status.iter().enumerate() {
            t.push_row(vec![format!("T{i}"), s.to_string()]);
        }
        t
    }

    #[test]
    fn padded_mixed_case_token_is_unproductive() {
        let t = table(&[" Improdutivo ", "IMPRODUTIVO", "Produtivo", ""]);
        let map = ColumnMap::resolve(&t, &ColumnAliases::default());
        let (productive, unproductive) = split_by_status(&t, &map);
        assert_eq!(unproductive.row_count(), 2);
        assert_eq!(productive.row_count(), 2);
        assert_eq!(unproductive.cell(0, "Equipe"), Some("T0"));
        // Missing status counts as productive.
        assert_eq!(productive.cell(1, "Equipe"), Some("T3"));
    }

    #[test]
    fn unresolved_status_degrades_to_all_productive() {
        let mut t = Table::new(vec!["Equipe".into()]);
        t.push_row(vec!["T1".into()]);
        let map = ColumnMap::resolve(&t, &ColumnAliases::default());
        let (productive, unproductive) = split_by_status(&t, &map);
        assert_eq!(productive.row_count(), 1);
        assert!(unproductive.is_empty());
        assert_eq!(unproductive.headers(), t.headers());
    }
}
