// String-typed table with ordered columns and ordered rows.
//
// The source exports do not have a fixed header set, so rows are kept as
// positional string vectors instead of typed structs; typing is imposed
// downstream by the temporal parser and numeric coercion. An empty (or
// whitespace-only) cell is treated as missing everywhere.
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins for duplicated headers.
            index.entry(h.clone()).or_insert(i);
        }
        Self {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn row(&self, i: usize) -> &[String] {
        &self.rows[i]
    }

    /// Cell value by header name; `None` for an unknown column or a cell
    /// holding nothing but whitespace.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        let value = self.rows.get(row)?.get(idx)?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }

    /// Append a new empty column and return its index.
    pub fn add_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        let idx = self.headers.len();
        self.headers.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        for row in &mut self.rows {
            row.push(String::new());
        }
        idx
    }

    pub fn set_cell(&mut self, row: usize, column: &str, value: String) {
        if let Some(idx) = self.column_index(column) {
            if let Some(r) = self.rows.get_mut(row) {
                r[idx] = value;
            }
        }
    }

    /// Reorder rows so that output row `i` is current row `order[i]`.
    /// `order` must be a permutation of `0..row_count()`.
    pub fn permute_rows(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows.len());
        let old = std::mem::take(&mut self.rows);
        let mut slots: Vec<Option<Vec<String>>> = old.into_iter().map(Some).collect();
        self.rows = order
            .iter()
            .map(|&i| slots[i].take().unwrap_or_default())
            .collect();
    }

    /// New table with the same header set holding only rows matching `keep`.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(usize) -> bool,
    {
        let mut out = Table::new(self.headers.clone());
        for (i, row) in self.rows.iter().enumerate() {
            if keep(i) {
                out.rows.push(row.clone());
            }
        }
        out
    }

    /// Move `columns` (in the given order) so they sit immediately before
    /// `target`. Unknown names are skipped; if `target` is unknown the table
    /// is left untouched.
    pub fn move_columns_before(&mut self, columns: &[&str], target: &str) {
        if !self.has_column(target) {
            return;
        }
        let moved: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if moved.is_empty() {
            return;
        }

        let mut order: Vec<String> = self
            .headers
            .iter()
            .filter(|h| !moved.contains(h))
            .cloned()
            .collect();
        let Some(pos) = order.iter().position(|h| h == target) else {
            return;
        };
        for name in moved.iter().rev() {
            order.insert(pos, name.clone());
        }

        let perm: Vec<usize> = order
            .iter()
            .map(|h| self.index[h])
            .collect();
        for row in &mut self.rows {
            let old = std::mem::take(row);
            *row = perm.iter().map(|&i| old[i].clone()).collect();
        }
        self.headers = order;
        self.index.clear();
        for (i, h) in self.headers.iter().enumerate() {
            self.index.entry(h.clone()).or_insert(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["A".into(), "B".into(), "C".into()]);
        t.push_row(vec!["1".into(), "".into(), "x".into()]);
        t.push_row(vec!["2".into(), "  ".into(), "y".into()]);
        t
    }

    #[test]
    fn blank_cells_read_as_missing() {
        let t = sample();
        assert_eq!(t.cell(0, "A"), Some("1"));
        assert_eq!(t.cell(0, "B"), None);
        assert_eq!(t.cell(1, "B"), None);
        assert_eq!(t.cell(0, "Z"), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let mut t = Table::new(vec!["A".into(), "B".into()]);
        t.push_row(vec!["1".into()]);
        assert_eq!(t.row(0).len(), 2);
        assert_eq!(t.cell(0, "B"), None);
    }

    #[test]
    fn add_column_backfills_existing_rows() {
        let mut t = sample();
        t.add_column("D");
        assert_eq!(t.row(0).len(), 4);
        t.set_cell(0, "D", "42".into());
        assert_eq!(t.cell(0, "D"), Some("42"));
        assert_eq!(t.cell(1, "D"), None);
    }

    #[test]
    fn move_columns_lands_before_target() {
        let mut t = sample();
        t.add_column("M1");
        t.add_column("M2");
        t.set_cell(0, "M1", "m1".into());
        t.set_cell(0, "M2", "m2".into());
        t.move_columns_before(&["M1", "M2"], "B");
        assert_eq!(
            t.headers(),
            &["A".to_string(), "M1".into(), "M2".into(), "B".into(), "C".into()]
        );
        assert_eq!(t.cell(0, "M1"), Some("m1"));
        assert_eq!(t.cell(0, "C"), Some("x"));
    }

    #[test]
    fn move_columns_without_target_is_a_no_op() {
        let mut t = sample();
        let before = t.headers().to_vec();
        t.move_columns_before(&["A"], "missing");
        assert_eq!(t.headers(), &before[..]);
    }

    #[test]
    fn filter_rows_keeps_header_set() {
        let t = sample();
        let only_second = t.filter_rows(|i| i == 1);
        assert_eq!(only_second.row_count(), 1);
        assert_eq!(only_second.cell(0, "C"), Some("y"));
    }
}
