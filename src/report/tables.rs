use std::path::Path;

use serde::Serialize;

use crate::enrich::EnrichmentTerm;
use crate::error::PipelineResult;
use crate::model::hits::{CancerSummary, Direction, GeneHit, SkippedGroup};
use crate::model::overlap::OverlapMatrix;
use crate::model::validation::{ReferenceMatch, ValidationRecord};
use crate::pipeline::stage4_aggregate::{GeneRecurrence, PresenceMatrix};
use crate::report::{format_f64_6, write_records, write_rows};

const GENE_HIT_HEADER: &[&str] = &[
    "cancer",
    "gene",
    "n",
    "coefficient",
    "p_value",
    "adj_p_value",
    "neg_log10_p",
    "direction",
];
const VOLCANO_HEADER: &[&str] = &[
    "gene",
    "coefficient",
    "neg_log10_p",
    "adj_p_value",
    "direction",
];
const SUMMARY_HEADER: &[&str] = &[
    "cancer",
    "n_samples",
    "n_tested",
    "n_untested",
    "n_positive",
    "n_negative",
    "top_positive",
    "top_negative",
];
const SKIPPED_HEADER: &[&str] = &["cancer", "n_samples", "reason"];
const RECURRENCE_HEADER: &[&str] = &["Gene", "Count"];
const GENE_CANCER_HEADER: &[&str] = &["Gene", "Count", "Cancers"];
const ENRICHMENT_HEADER: &[&str] = &[
    "term_id",
    "source",
    "name",
    "p_value",
    "term_size",
    "intersection_size",
    "query_size",
];
const VALIDATION_SUMMARY_HEADER: &[&str] = &["reference", "checked", "matched", "unmatched"];

#[derive(Serialize)]
struct VolcanoRow<'a> {
    gene: &'a str,
    coefficient: f64,
    neg_log10_p: f64,
    adj_p_value: f64,
    direction: Direction,
}

#[derive(Serialize)]
struct RecurrenceRow<'a> {
    #[serde(rename = "Gene")]
    gene: &'a str,
    #[serde(rename = "Count")]
    count: usize,
}

#[derive(Serialize)]
struct GeneCancerRow<'a> {
    #[serde(rename = "Gene")]
    gene: &'a str,
    #[serde(rename = "Count")]
    count: usize,
    #[serde(rename = "Cancers")]
    cancers: String,
}

#[derive(Serialize)]
struct ValidationSummaryRow<'a> {
    reference: &'a str,
    checked: usize,
    matched: usize,
    unmatched: usize,
}

pub fn write_gene_hits(path: &Path, hits: &[GeneHit]) -> PipelineResult<()> {
    write_records(path, GENE_HIT_HEADER, hits)
}

pub fn write_volcano(path: &Path, hits: &[GeneHit]) -> PipelineResult<()> {
    let mut rows: Vec<VolcanoRow<'_>> = hits
        .iter()
        .map(|h| VolcanoRow {
            gene: &h.gene,
            coefficient: h.coefficient,
            neg_log10_p: h.neg_log10_p,
            adj_p_value: h.adj_p_value,
            direction: h.direction,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.coefficient
            .total_cmp(&b.coefficient)
            .then_with(|| a.gene.cmp(b.gene))
    });
    write_records(path, VOLCANO_HEADER, &rows)
}

pub fn write_cancer_summaries(path: &Path, summaries: &[CancerSummary]) -> PipelineResult<()> {
    write_records(path, SUMMARY_HEADER, summaries)
}

pub fn write_skipped(path: &Path, skipped: &[SkippedGroup]) -> PipelineResult<()> {
    write_records(path, SKIPPED_HEADER, skipped)
}

pub fn write_jaccard_matrix(path: &Path, matrix: &OverlapMatrix<f64>) -> PipelineResult<()> {
    write_matrix(path, matrix, |v| format_f64_6(v))
}

pub fn write_count_matrix(path: &Path, matrix: &OverlapMatrix<usize>) -> PipelineResult<()> {
    write_matrix(path, matrix, |v| v.to_string())
}

fn write_matrix<T: Copy>(
    path: &Path,
    matrix: &OverlapMatrix<T>,
    fmt: impl Fn(T) -> String,
) -> PipelineResult<()> {
    let mut header = Vec::with_capacity(matrix.size() + 1);
    header.push(String::new());
    header.extend(matrix.labels.iter().cloned());

    let mut rows = Vec::with_capacity(matrix.size());
    for (i, label) in matrix.labels.iter().enumerate() {
        let mut row = Vec::with_capacity(matrix.size() + 1);
        row.push(label.clone());
        row.extend(matrix.row(i).iter().map(|&v| fmt(v)));
        rows.push(row);
    }
    write_rows(path, &header, &rows)
}

pub fn write_recurrence(path: &Path, recurrence: &[GeneRecurrence]) -> PipelineResult<()> {
    let rows: Vec<RecurrenceRow<'_>> = recurrence
        .iter()
        .map(|r| RecurrenceRow {
            gene: &r.gene,
            count: r.count,
        })
        .collect();
    write_records(path, RECURRENCE_HEADER, &rows)
}

pub fn write_gene_cancer_map(path: &Path, recurrence: &[GeneRecurrence]) -> PipelineResult<()> {
    let rows: Vec<GeneCancerRow<'_>> = recurrence
        .iter()
        .map(|r| GeneCancerRow {
            gene: &r.gene,
            count: r.count,
            cancers: r.cancers.join("; "),
        })
        .collect();
    write_records(path, GENE_CANCER_HEADER, &rows)
}

pub fn write_presence(path: &Path, presence: &PresenceMatrix) -> PipelineResult<()> {
    let mut header = Vec::with_capacity(presence.cancers.len() + 1);
    header.push(String::new());
    header.extend(presence.cancers.iter().cloned());

    let mut rows = Vec::with_capacity(presence.genes.len());
    for (g, gene) in presence.genes.iter().enumerate() {
        let mut row = Vec::with_capacity(presence.cancers.len() + 1);
        row.push(gene.clone());
        for c in 0..presence.cancers.len() {
            row.push(if presence.is_present(g, c) { "1" } else { "0" }.to_string());
        }
        rows.push(row);
    }
    write_rows(path, &header, &rows)
}

pub fn write_enrichment(path: &Path, terms: &[EnrichmentTerm]) -> PipelineResult<()> {
    write_records(path, ENRICHMENT_HEADER, terms)
}

pub fn write_gene_column(path: &Path, genes: &[String]) -> PipelineResult<()> {
    let header = vec!["Gene".to_string()];
    let rows: Vec<Vec<String>> = genes.iter().map(|g| vec![g.clone()]).collect();
    write_rows(path, &header, &rows)
}

pub fn write_validation_records(
    path: &Path,
    reference_names: &[String],
    records: &[ValidationRecord],
) -> PipelineResult<()> {
    let mut header = vec!["Gene".to_string()];
    header.extend(reference_names.iter().map(|n| format!("in_{}", n)));
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.gene.clone()];
            row.extend(r.memberships.iter().map(|&m| m.to_string()));
            row
        })
        .collect();
    write_rows(path, &header, &rows)
}

pub fn write_validation_summary(path: &Path, matches: &[ReferenceMatch]) -> PipelineResult<()> {
    let rows: Vec<ValidationSummaryRow<'_>> = matches
        .iter()
        .map(|m| ValidationSummaryRow {
            reference: &m.reference,
            checked: m.checked,
            matched: m.n_matched(),
            unmatched: m.n_unmatched(),
        })
        .collect();
    write_records(path, VALIDATION_SUMMARY_HEADER, &rows)
}
