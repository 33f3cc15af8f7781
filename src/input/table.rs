use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::input::{InputError, csv_reader};

#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    pub row_ids: Vec<String>,
    pub columns: Vec<String>,
    values: Vec<f64>,
}

impl NumericTable {
    pub fn new(
        row_ids: Vec<String>,
        columns: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self, InputError> {
        if values.len() != row_ids.len() * columns.len() {
            return Err(InputError::InvalidInput(format!(
                "table shape mismatch: {} values for {} rows x {} columns",
                values.len(),
                row_ids.len(),
                columns.len()
            )));
        }
        Ok(Self {
            row_ids,
            columns,
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.columns.len();
        &self.values[row * n..(row + 1) * n]
    }

    pub fn column_at(&self, col: usize, rows: &[usize]) -> Vec<f64> {
        rows.iter().map(|&r| self.get(r, col)).collect()
    }

    pub fn row_index(&self) -> BTreeMap<&str, usize> {
        let mut map = BTreeMap::new();
        for (idx, id) in self.row_ids.iter().enumerate() {
            map.entry(id.as_str()).or_insert(idx);
        }
        map
    }

    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let n = self.columns.len();
        let mut values = Vec::with_capacity(rows.len() * n);
        let mut row_ids = Vec::with_capacity(rows.len());
        for &r in rows {
            row_ids.push(self.row_ids[r].clone());
            values.extend_from_slice(self.row(r));
        }
        Self {
            row_ids,
            columns: self.columns.clone(),
            values,
        }
    }

    pub fn select_columns(&self, cols: &[usize]) -> Self {
        let mut values = Vec::with_capacity(self.row_ids.len() * cols.len());
        for r in 0..self.row_ids.len() {
            let row = self.row(r);
            for &c in cols {
                values.push(row[c]);
            }
        }
        Self {
            row_ids: self.row_ids.clone(),
            columns: cols.iter().map(|&c| self.columns[c].clone()).collect(),
            values,
        }
    }

    pub fn transpose(&self) -> Self {
        let n_rows = self.row_ids.len();
        let n_cols = self.columns.len();
        let mut values = vec![0.0; n_rows * n_cols];
        for r in 0..n_rows {
            for c in 0..n_cols {
                values[c * n_rows + r] = self.values[r * n_cols + c];
            }
        }
        Self {
            row_ids: self.columns.clone(),
            columns: self.row_ids.clone(),
            values,
        }
    }

    pub fn with_clean_gene_columns(&self) -> Self {
        let mut seen = BTreeSet::new();
        let mut keep = Vec::with_capacity(self.columns.len());
        let mut duplicates = 0usize;
        for (idx, label) in self.columns.iter().enumerate() {
            let symbol = clean_gene_label(label);
            if symbol.is_empty() || !seen.insert(symbol) {
                duplicates += 1;
                continue;
            }
            keep.push(idx);
        }
        if duplicates > 0 {
            warn!(
                "dropped {} empty or duplicated gene columns after symbol cleanup",
                duplicates
            );
        }
        let mut out = self.select_columns(&keep);
        out.columns = out.columns.iter().map(|c| clean_gene_label(c)).collect();
        out
    }
}

pub fn clean_gene_label(label: &str) -> String {
    let trimmed = label.trim();
    match trimmed.split_once(" (") {
        Some((symbol, _)) => symbol.trim().to_string(),
        None => trimmed.to_string(),
    }
}

pub fn parse_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if is_missing(s) {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

fn is_missing(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
}

// Columns with any non-numeric, non-missing cell are annotations and are dropped.
pub fn read_numeric_table(
    path: &Path,
    id_column: Option<&str>,
) -> Result<NumericTable, InputError> {
    let mut reader = csv_reader(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if header.len() < 2 {
        return Err(InputError::Parse(format!(
            "{} needs an id column and at least one value column",
            path.display()
        )));
    }

    let id_idx = id_column
        .and_then(|name| header.iter().position(|h| h == name))
        .unwrap_or(0);
    let value_cols: Vec<usize> = (0..header.len()).filter(|&i| i != id_idx).collect();

    let mut row_ids = Vec::new();
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    let mut non_numeric = vec![false; value_cols.len()];
    let mut duplicate_rows = 0usize;

    for (line_idx, record) in reader.records().enumerate() {
        let record = record?;
        let id = record.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            warn!(
                "{}: row {} has empty id; skipping",
                path.display(),
                line_idx + 2
            );
            continue;
        }
        if !seen.insert(id.to_string()) {
            duplicate_rows += 1;
            continue;
        }
        row_ids.push(id.to_string());
        for (slot, &col) in value_cols.iter().enumerate() {
            let raw = record.get(col).unwrap_or("");
            match parse_cell(raw) {
                Some(v) => values.push(v),
                None => {
                    non_numeric[slot] = true;
                    values.push(f64::NAN);
                }
            }
        }
    }

    if duplicate_rows > 0 {
        warn!(
            "{}: {} duplicated row ids; keeping first occurrence",
            path.display(),
            duplicate_rows
        );
    }
    if row_ids.is_empty() {
        return Err(InputError::Parse(format!(
            "{} has no data rows",
            path.display()
        )));
    }

    let columns: Vec<String> = value_cols.iter().map(|&c| header[c].clone()).collect();
    let table = NumericTable::new(row_ids, columns, values)?;

    let keep: Vec<usize> = (0..non_numeric.len()).filter(|&i| !non_numeric[i]).collect();
    if keep.len() == non_numeric.len() {
        return Ok(table);
    }
    let dropped: Vec<&str> = non_numeric
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag)
        .map(|(i, _)| table.columns[i].as_str())
        .collect();
    debug!(
        "{}: dropping non-numeric columns: {}",
        path.display(),
        dropped.join(", ")
    );
    Ok(table.select_columns(&keep))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/table.rs"]
mod tests;
