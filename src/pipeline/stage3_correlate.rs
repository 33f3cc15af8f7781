use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::input::table::NumericTable;
use crate::model::hits::{CancerResult, CancerSummary, Direction, GeneHit, SkippedGroup};
use crate::model::thresholds::AnalysisConfig;
use crate::pipeline::stage1_load::CancerGroup;
use crate::stats::{benjamini_hochberg, correlate, neg_log10};

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub results: Vec<CancerResult>,
    pub skipped: Vec<SkippedGroup>,
}

impl Stage3Output {
    pub fn summaries(&self, top: usize) -> Vec<CancerSummary> {
        self.results.iter().map(|r| r.summary(top)).collect()
    }
}

pub fn run_stage3(
    effect: &NumericTable,
    groups: &[CancerGroup],
    signature: &[f64],
    config: &AnalysisConfig,
) -> Stage3Output {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for group in groups {
        match correlate_group(effect, group, signature, config) {
            Ok(result) => {
                info!(
                    "{}: {} samples, {} genes tested, {} positive / {} negative hits",
                    result.cancer,
                    result.n_samples,
                    result.hits.len(),
                    result.count(Direction::Positive),
                    result.count(Direction::Negative)
                );
                results.push(result);
            }
            Err(err) => {
                if err.is_recoverable() {
                    info!("skipping {}: {}", group.label, err);
                } else {
                    warn!("skipping {}: {}", group.label, err);
                }
                skipped.push(SkippedGroup {
                    cancer: group.label.clone(),
                    n_samples: group.samples.len(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Stage3Output { results, skipped }
}

pub fn correlate_group(
    effect: &NumericTable,
    group: &CancerGroup,
    signature: &[f64],
    config: &AnalysisConfig,
) -> PipelineResult<CancerResult> {
    let n_samples = group.samples.len();
    if n_samples < config.min_samples {
        return Err(PipelineError::InsufficientSamples {
            cancer: group.label.clone(),
            n_samples,
            min_samples: config.min_samples,
        });
    }

    let y: Vec<f64> = group.samples.iter().map(|&s| signature[s]).collect();

    let mut tested = Vec::with_capacity(effect.n_cols());
    let mut n_untested = 0usize;
    for col in 0..effect.n_cols() {
        let x = effect.column_at(col, &group.samples);
        match correlate(&x, &y, config.method, config.min_pairs) {
            Some(test) => tested.push((col, test)),
            None => n_untested += 1,
        }
    }

    if tested.is_empty() {
        return Err(PipelineError::MissingData(format!(
            "no gene in {} had {} complete non-constant pairs",
            group.label, config.min_pairs
        )));
    }

    let pvalues: Vec<f64> = tested.iter().map(|(_, t)| t.p_value).collect();
    let adjusted = benjamini_hochberg(&pvalues);

    let mut hits: Vec<GeneHit> = tested
        .iter()
        .zip(adjusted)
        .map(|((col, test), adj_p_value)| GeneHit {
            cancer: group.label.clone(),
            gene: effect.columns[*col].clone(),
            n: test.n,
            coefficient: test.coefficient,
            p_value: test.p_value,
            adj_p_value,
            neg_log10_p: neg_log10(test.p_value),
            direction: Direction::classify(test.coefficient, adj_p_value, config.fdr_alpha),
        })
        .collect();

    hits.sort_by(|a, b| {
        a.adj_p_value
            .total_cmp(&b.adj_p_value)
            .then_with(|| a.p_value.total_cmp(&b.p_value))
            .then_with(|| a.gene.cmp(&b.gene))
    });

    Ok(CancerResult {
        cancer: group.label.clone(),
        n_samples,
        n_untested,
        hits,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_correlate.rs"]
mod tests;
