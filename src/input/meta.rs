use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;

use crate::input::{InputError, csv_reader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub sample_id: String,
    pub cancer_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModelMeta {
    pub entries: Vec<ModelEntry>,
}

impl ModelMeta {
    pub fn ids(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.sample_id.as_str()).collect()
    }
}

pub fn load_model_meta(
    path: &Path,
    id_column: &str,
    label_column: &str,
) -> Result<ModelMeta, InputError> {
    let mut reader = csv_reader(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let id_idx = header.iter().position(|h| h == id_column).ok_or_else(|| {
        InputError::InvalidInput(format!(
            "{} has no sample id column '{}'",
            path.display(),
            id_column
        ))
    })?;
    let label_idx = header.iter().position(|h| h == label_column).ok_or_else(|| {
        InputError::InvalidInput(format!(
            "{} has no cancer label column '{}'",
            path.display(),
            label_column
        ))
    })?;

    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    let mut unlabeled = 0usize;

    for record in reader.records() {
        let record = record?;
        let id = record.get(id_idx).unwrap_or("").trim();
        let label = record.get(label_idx).unwrap_or("").trim();
        if id.is_empty() {
            continue;
        }
        if label.is_empty() {
            unlabeled += 1;
            continue;
        }
        if !seen.insert(id.to_string()) {
            warn!(
                "duplicate sample id in metadata; keeping first (id {})",
                id
            );
            continue;
        }
        entries.push(ModelEntry {
            sample_id: id.to_string(),
            cancer_type: label.to_string(),
        });
    }

    if unlabeled > 0 {
        warn!(
            "{} metadata rows have no '{}' label; skipping",
            unlabeled, label_column
        );
    }

    Ok(ModelMeta { entries })
}
