use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::input::meta::{ModelMeta, load_model_meta};
use crate::input::table::{NumericTable, read_numeric_table};
use crate::model::thresholds::AnalysisConfig;

#[derive(Debug, Clone)]
pub struct LoadPaths {
    pub model: PathBuf,
    pub gene_effect: PathBuf,
    pub expression: PathBuf,
}

// Samples present in all three inputs, sorted by id; rows of both tables follow that order.
#[derive(Debug, Clone)]
pub struct AlignedData {
    pub cancer_types: Vec<String>,
    pub effect: NumericTable,
    pub expression: NumericTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancerGroup {
    pub label: String,
    pub samples: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadAudit {
    pub n_meta: usize,
    pub n_effect: usize,
    pub n_expression: usize,
    pub n_joined: usize,
    pub n_effect_genes: usize,
    pub n_expression_genes: usize,
    pub effect_transposed: bool,
}

#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub data: AlignedData,
    pub groups: Vec<CancerGroup>,
    pub audit: LoadAudit,
}

pub fn run_stage1(paths: &LoadPaths, config: &AnalysisConfig) -> PipelineResult<Stage1Output> {
    info!(
        "loading inputs: model={}, gene_effect={}, expression={}",
        paths.model.display(),
        paths.gene_effect.display(),
        paths.expression.display()
    );

    let meta = load_model_meta(
        &paths.model,
        &config.sample_id_column,
        &config.cancer_label_column,
    )?;
    let effect = read_numeric_table(&paths.gene_effect, None)?;
    let expression = read_numeric_table(&paths.expression, Some(&config.sample_id_column))?;

    let (data, audit) = align(&meta, effect, expression)?;
    let groups = group_by_cancer(&data);

    info!(
        "aligned {} samples ({} gene-effect genes, {} expression genes) across {} cancer types",
        audit.n_joined,
        audit.n_effect_genes,
        audit.n_expression_genes,
        groups.len()
    );

    Ok(Stage1Output {
        data,
        groups,
        audit,
    })
}

// samples on rows
pub fn orient_samples_on_rows(
    table: NumericTable,
    known_ids: &BTreeSet<&str>,
) -> (NumericTable, bool) {
    let row_hits = table
        .row_ids
        .iter()
        .filter(|id| known_ids.contains(id.as_str()))
        .count();
    let col_hits = table
        .columns
        .iter()
        .filter(|id| known_ids.contains(id.as_str()))
        .count();
    if col_hits > row_hits {
        info!("gene-effect matrix has samples on columns; transposing");
        (table.transpose(), true)
    } else {
        (table, false)
    }
}

pub fn align(
    meta: &ModelMeta,
    effect: NumericTable,
    expression: NumericTable,
) -> PipelineResult<(AlignedData, LoadAudit)> {
    let known = meta.ids();
    let (effect, effect_transposed) = orient_samples_on_rows(effect, &known);
    let effect = effect.with_clean_gene_columns();
    let expression = expression.with_clean_gene_columns();

    let effect_rows = effect.row_index();
    let expression_rows = expression.row_index();

    let mut joined: Vec<(&str, &str, usize, usize)> = Vec::new();
    for entry in &meta.entries {
        let id = entry.sample_id.as_str();
        if let (Some(&e), Some(&x)) = (effect_rows.get(id), expression_rows.get(id)) {
            joined.push((id, entry.cancer_type.as_str(), e, x));
        }
    }
    joined.sort_by(|a, b| a.0.cmp(b.0));

    let audit = LoadAudit {
        n_meta: meta.entries.len(),
        n_effect: effect.n_rows(),
        n_expression: expression.n_rows(),
        n_joined: joined.len(),
        n_effect_genes: effect.n_cols(),
        n_expression_genes: expression.n_cols(),
        effect_transposed,
    };

    if joined.is_empty() {
        return Err(PipelineError::MissingData(format!(
            "no sample ids shared by metadata ({}), gene effect ({}) and expression ({})",
            audit.n_meta, audit.n_effect, audit.n_expression
        )));
    }
    let dropped = audit.n_meta - audit.n_joined;
    if dropped > 0 {
        warn!(
            "{} labelled samples lack gene-effect or expression data; dropped",
            dropped
        );
    }

    let effect_idx: Vec<usize> = joined.iter().map(|j| j.2).collect();
    let expression_idx: Vec<usize> = joined.iter().map(|j| j.3).collect();

    let data = AlignedData {
        cancer_types: joined.iter().map(|j| j.1.to_string()).collect(),
        effect: effect.select_rows(&effect_idx),
        expression: expression.select_rows(&expression_idx),
    };

    Ok((data, audit))
}

pub fn group_by_cancer(data: &AlignedData) -> Vec<CancerGroup> {
    let mut groups: BTreeMap<String, (String, Vec<usize>)> = BTreeMap::new();
    for (idx, label) in data.cancer_types.iter().enumerate() {
        let key = label.to_lowercase();
        let entry = groups
            .entry(key)
            .or_insert_with(|| (label.clone(), Vec::new()));
        if label < &entry.0 {
            entry.0 = label.clone();
        }
        entry.1.push(idx);
    }
    groups
        .into_values()
        .map(|(label, samples)| CancerGroup { label, samples })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
