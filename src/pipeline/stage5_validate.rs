use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::input::reference::{load_gene_list, load_ranked_genes};
use crate::model::validation::{ReferenceMatch, ValidationRecord};

#[derive(Debug, Clone)]
pub struct ReferenceInput {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSet {
    pub name: String,
    pub genes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage5Output {
    pub genes: Vec<String>,
    pub references: Vec<ReferenceMatch>,
    pub records: Vec<ValidationRecord>,
}

pub fn run_stage5(hits_path: &Path, references: &[ReferenceInput]) -> PipelineResult<Stage5Output> {
    for reference in references {
        if !reference.path.is_file() {
            return Err(PipelineError::ValidationInput(format!(
                "reference list '{}' not found at {}",
                reference.name,
                reference.path.display()
            )));
        }
    }
    if !hits_path.is_file() {
        return Err(PipelineError::MissingData(format!(
            "global hit list {} not found; run the aggregate stage first",
            hits_path.display()
        )));
    }

    let genes = load_ranked_genes(hits_path)?;

    let mut sets = Vec::with_capacity(references.len());
    for reference in references {
        let list = load_gene_list(&reference.path)
            .map_err(|e| PipelineError::ValidationInput(e.to_string()))?;
        info!(
            "reference {}: {} genes from column '{}'",
            reference.name,
            list.genes.len(),
            list.column
        );
        sets.push(ReferenceSet {
            name: reference.name.clone(),
            genes: list.genes,
        });
    }

    let out = validate_hits(&genes, &sets);
    for m in &out.references {
        info!(
            "{}: {} of {} hits matched",
            m.reference,
            m.n_matched(),
            m.checked
        );
    }
    Ok(out)
}

pub fn validate_hits(genes: &[String], references: &[ReferenceSet]) -> Stage5Output {
    let mut unique = BTreeSet::new();
    let genes: Vec<String> = genes
        .iter()
        .map(|g| g.trim().to_ascii_uppercase())
        .filter(|g| !g.is_empty() && unique.insert(g.clone()))
        .collect();

    let records: Vec<ValidationRecord> = genes
        .iter()
        .map(|gene| ValidationRecord {
            gene: gene.clone(),
            memberships: references.iter().map(|r| r.genes.contains(gene)).collect(),
        })
        .collect();

    let mut matches = Vec::with_capacity(references.len());
    for (idx, reference) in references.iter().enumerate() {
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        for record in &records {
            if record.memberships[idx] {
                matched.push(record.gene.clone());
            } else {
                unmatched.push(record.gene.clone());
            }
        }
        matched.sort();
        unmatched.sort();
        matches.push(ReferenceMatch {
            reference: reference.name.clone(),
            checked: records.len(),
            matched,
            unmatched,
        });
    }

    Stage5Output {
        genes,
        references: matches,
        records,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_validate.rs"]
mod tests;
