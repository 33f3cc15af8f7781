use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::input::{InputError, csv_reader};
use crate::model::hits::GeneHit;

pub const RESULT_PREFIX: &str = "CRISPR_TME_";
pub const RESULT_SUFFIX: &str = "_Results.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct CancerTable {
    pub cancer: String,
    pub hits: Vec<GeneHit>,
}

pub fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

// Labels whose sanitized forms collide (ignoring case) get a numeric suffix, in input order.
pub fn unique_file_stems<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = BTreeSet::new();
    let mut stems = Vec::new();
    for label in labels {
        let base = sanitize_label(label);
        let mut stem = base.clone();
        let mut suffix = 2;
        while !taken.insert(stem.to_lowercase()) {
            stem = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        if stem != base {
            warn!(
                "cancer label '{}' maps to an existing file name {}; writing it as {}",
                label, base, stem
            );
        }
        stems.push(stem);
    }
    stems
}

pub fn result_file_name(cancer: &str) -> String {
    format!("{}{}{}", RESULT_PREFIX, sanitize_label(cancer), RESULT_SUFFIX)
}

pub fn discover_result_tables(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "result directory {} not found; run the correlate stage first",
            dir.display()
        )));
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(RESULT_PREFIX) && name.ends_with(RESULT_SUFFIX) && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    if paths.is_empty() {
        return Err(InputError::MissingInput(format!(
            "no {}*{} tables in {}; run the correlate stage first",
            RESULT_PREFIX,
            RESULT_SUFFIX,
            dir.display()
        )));
    }
    Ok(paths)
}

pub fn read_result_table(path: &Path) -> Result<CancerTable, InputError> {
    let mut reader = csv_reader(path)?;
    let mut hits = Vec::new();
    for row in reader.deserialize::<GeneHit>() {
        hits.push(row?);
    }

    let cancer = match hits.first() {
        Some(hit) => hit.cancer.clone(),
        None => label_from_file_name(path),
    };
    if let Some(other) = hits.iter().find(|h| h.cancer != cancer) {
        return Err(InputError::InvalidInput(format!(
            "{} mixes cancer labels '{}' and '{}'",
            path.display(),
            cancer,
            other.cancer
        )));
    }

    Ok(CancerTable { cancer, hits })
}

pub fn read_result_tables(dir: &Path) -> Result<Vec<CancerTable>, InputError> {
    let mut tables = Vec::new();
    for path in discover_result_tables(dir)? {
        tables.push(read_result_table(&path)?);
    }
    tables.sort_by(|a, b| a.cancer.cmp(&b.cancer));
    Ok(tables)
}

fn label_from_file_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.strip_prefix(RESULT_PREFIX)
        .and_then(|s| s.strip_suffix(RESULT_SUFFIX))
        .unwrap_or(&name)
        .to_string()
}
