use std::collections::BTreeSet;
use std::path::Path;

use crate::input::{InputError, csv_reader};

pub const GENE_COLUMN_CANDIDATES: &[&str] = &[
    "SYMBOL",
    "symbol",
    "Gene",
    "gene",
    "Hugo_Symbol",
    "Gene_Symbol",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneList {
    pub column: String,
    pub genes: BTreeSet<String>,
}

pub fn detect_gene_column(header: &[String]) -> Option<usize> {
    GENE_COLUMN_CANDIDATES
        .iter()
        .find_map(|candidate| header.iter().position(|h| h == candidate))
}

pub fn load_gene_list(path: &Path) -> Result<GeneList, InputError> {
    let mut reader = csv_reader(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let idx = detect_gene_column(&header).ok_or_else(|| {
        InputError::InvalidInput(format!(
            "{}: no gene column (expected one of {})",
            path.display(),
            GENE_COLUMN_CANDIDATES.join(", ")
        ))
    })?;

    let mut genes = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        let symbol = record.get(idx).unwrap_or("").trim();
        if !symbol.is_empty() {
            genes.insert(symbol.to_ascii_uppercase());
        }
    }

    Ok(GeneList {
        column: header[idx].clone(),
        genes,
    })
}

pub fn load_ranked_genes(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = csv_reader(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let idx = detect_gene_column(&header).ok_or_else(|| {
        InputError::InvalidInput(format!("{}: no gene column", path.display()))
    })?;

    let mut seen = BTreeSet::new();
    let mut genes = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symbol = record.get(idx).unwrap_or("").trim().to_ascii_uppercase();
        if !symbol.is_empty() && seen.insert(symbol.clone()) {
            genes.push(symbol);
        }
    }
    Ok(genes)
}
