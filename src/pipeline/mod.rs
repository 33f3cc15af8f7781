pub mod stage1_load;
pub mod stage2_signature;
pub mod stage3_correlate;
pub mod stage4_aggregate;
pub mod stage5_validate;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::enrich::EnrichmentService;
use crate::error::PipelineResult;
use crate::input::results::{
    RESULT_PREFIX, RESULT_SUFFIX, read_result_tables, result_file_name, sanitize_label,
    unique_file_stems,
};
use crate::model::hits::Direction;
use crate::model::thresholds::AnalysisConfig;
use crate::report::json::{
    AggregateSummary, CorrelateSummary, ToolInfo, ValidateSummary, write_summary_json,
};
use crate::report::text::{
    CorrelateReport, render_aggregate_report, render_correlate_report, render_validation_report,
};
use crate::report::{remove_stale, tables, write_text};
use stage1_load::{LoadPaths, run_stage1};
use stage2_signature::run_stage2;
use stage3_correlate::run_stage3;
use stage4_aggregate::{DirectionAggregate, Stage4Output, run_stage4};
use stage5_validate::{ReferenceInput, Stage5Output, run_stage5};

pub const SUMMARY_JSON: &str = "summary.json";
pub const REPORT_TXT: &str = "report.txt";
pub const CANCERWISE_SUMMARY: &str = "Cancerwise_Summary.csv";
pub const SKIPPED_CANCERS: &str = "Skipped_Cancers.csv";
pub const VOLCANO_PREFIX: &str = "Volcano_";
pub const ENRICHMENT_PREFIX: &str = "Enrichment_";
pub const MATCHED_PREFIX: &str = "Matched_in_";
pub const VALIDATION_RECORDS: &str = "Validation_Records.csv";
pub const VALIDATION_SUMMARY: &str = "Validation_Summary.csv";

pub fn global_top_file(direction: Direction) -> String {
    format!("Global_Top_{}_Genes.csv", direction.label())
}

pub fn volcano_file_name(cancer: &str) -> String {
    format!("{}{}.csv", VOLCANO_PREFIX, sanitize_label(cancer))
}

pub fn enrichment_file_name(direction: Direction, cancer: &str) -> String {
    format!(
        "{}{}_{}.csv",
        ENRICHMENT_PREFIX,
        direction.label(),
        sanitize_label(cancer)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelateCounts {
    pub n_tested: usize,
    pub n_skipped: usize,
}

pub fn correlate(
    paths: &LoadPaths,
    out_dir: &Path,
    config: &AnalysisConfig,
) -> PipelineResult<CorrelateCounts> {
    let stage1 = run_stage1(paths, config)?;
    let signature = run_stage2(&stage1.data.expression, &config.immune_markers)?;
    let stage3 = run_stage3(&stage1.data.effect, &stage1.groups, &signature.scores, config);

    fs::create_dir_all(out_dir)?;
    remove_stale(out_dir, RESULT_PREFIX, RESULT_SUFFIX)?;
    remove_stale(out_dir, VOLCANO_PREFIX, ".csv")?;

    let stems = unique_file_stems(stage3.results.iter().map(|r| r.cancer.as_str()));
    for (result, stem) in stage3.results.iter().zip(&stems) {
        tables::write_gene_hits(&out_dir.join(result_file_name(stem)), &result.hits)?;
        tables::write_volcano(&out_dir.join(volcano_file_name(stem)), &result.hits)?;
    }
    let summaries = stage3.summaries(config.summary_top);
    tables::write_cancer_summaries(&out_dir.join(CANCERWISE_SUMMARY), &summaries)?;
    tables::write_skipped(&out_dir.join(SKIPPED_CANCERS), &stage3.skipped)?;

    let summary = CorrelateSummary {
        tool: ToolInfo::current(),
        stage: "correlate",
        config,
        input: &stage1.audit,
        signature: &signature.audit,
        signature_genes: &signature.genes,
        n_cancers_tested: stage3.results.len(),
        n_cancers_skipped: stage3.skipped.len(),
        cancers: &summaries,
        skipped: &stage3.skipped,
    };
    write_summary_json(&out_dir.join(SUMMARY_JSON), &summary)?;
    write_text(
        &out_dir.join(REPORT_TXT),
        &render_correlate_report(&CorrelateReport {
            config,
            n_samples: stage1.audit.n_joined,
            signature_genes: &signature.genes,
            missing_markers: &signature.audit.missing_genes,
            summaries: &summaries,
            skipped: &stage3.skipped,
        }),
    )?;

    info!(
        "correlate: {} cancer types written to {}, {} skipped",
        stage3.results.len(),
        out_dir.display(),
        stage3.skipped.len()
    );
    Ok(CorrelateCounts {
        n_tested: stage3.results.len(),
        n_skipped: stage3.skipped.len(),
    })
}

pub fn aggregate(
    results_dir: &Path,
    out_dir: &Path,
    config: &AnalysisConfig,
    service: Option<&dyn EnrichmentService>,
) -> PipelineResult<Stage4Output> {
    let tables_in = read_result_tables(results_dir)?;
    info!(
        "aggregate: {} result tables from {}",
        tables_in.len(),
        results_dir.display()
    );
    let out = run_stage4(&tables_in, config, service)?;

    fs::create_dir_all(out_dir)?;
    remove_stale(out_dir, ENRICHMENT_PREFIX, ".csv")?;

    write_direction(out_dir, &out.positive, config.global_top)?;
    write_direction(out_dir, &out.negative, config.global_top)?;
    tables::write_presence(&out_dir.join("Presence_Absence_Positive.csv"), &out.presence)?;

    let stems: BTreeMap<&str, String> = out
        .cancers
        .iter()
        .map(|c| c.as_str())
        .zip(unique_file_stems(out.cancers.iter().map(|c| c.as_str())))
        .collect();
    for outcome in &out.enrichment {
        if let Ok(terms) = &outcome.result {
            let stem = stems
                .get(outcome.cancer.as_str())
                .cloned()
                .unwrap_or_else(|| sanitize_label(&outcome.cancer));
            let path = out_dir.join(enrichment_file_name(outcome.direction, &stem));
            tables::write_enrichment(&path, terms)?;
        }
    }

    let summary = AggregateSummary::build(
        config,
        &out,
        service.map(|s| s.name()),
        config.summary_top.max(10),
    );
    write_summary_json(&out_dir.join(SUMMARY_JSON), &summary)?;
    write_text(
        &out_dir.join(REPORT_TXT),
        &render_aggregate_report(&out, config.summary_top.max(10)),
    )?;

    Ok(out)
}

fn write_direction(
    out_dir: &Path,
    aggregate: &DirectionAggregate,
    global_top: usize,
) -> PipelineResult<()> {
    let label = aggregate.direction.label();
    tables::write_jaccard_matrix(
        &out_dir.join(format!("Jaccard_{}_Matrix.csv", label)),
        &aggregate.jaccard,
    )?;
    tables::write_count_matrix(
        &out_dir.join(format!("Overlap_Count_{}.csv", label)),
        &aggregate.overlap,
    )?;
    tables::write_recurrence(
        &out_dir.join(global_top_file(aggregate.direction)),
        aggregate.top(global_top),
    )?;
    tables::write_gene_cancer_map(
        &out_dir.join(format!("Gene_Cancer_Map_{}.csv", label)),
        &aggregate.recurrence,
    )?;
    Ok(())
}

pub fn default_references(compendium: PathBuf, unfiltered: PathBuf) -> Vec<ReferenceInput> {
    vec![
        ReferenceInput {
            name: "Compendium".to_string(),
            path: compendium,
        },
        ReferenceInput {
            name: "Unfiltered".to_string(),
            path: unfiltered,
        },
    ]
}

pub fn validate(
    hits_path: &Path,
    references: &[ReferenceInput],
    out_dir: &Path,
) -> PipelineResult<Stage5Output> {
    let out = run_stage5(hits_path, references)?;

    fs::create_dir_all(out_dir)?;
    remove_stale(out_dir, MATCHED_PREFIX, ".csv")?;

    for m in &out.references {
        let path = out_dir.join(format!(
            "{}{}.csv",
            MATCHED_PREFIX,
            sanitize_label(&m.reference)
        ));
        tables::write_gene_column(&path, &m.matched)?;
    }
    let names: Vec<String> = references.iter().map(|r| r.name.clone()).collect();
    tables::write_validation_records(&out_dir.join(VALIDATION_RECORDS), &names, &out.records)?;
    tables::write_validation_summary(&out_dir.join(VALIDATION_SUMMARY), &out.references)?;

    let n_matched_any = out.records.iter().filter(|r| r.matched_any()).count();
    let summary =
        ValidateSummary::build(hits_path, out.genes.len(), n_matched_any, &out.references);
    write_summary_json(&out_dir.join(SUMMARY_JSON), &summary)?;
    let report = render_validation_report(&out);
    write_text(&out_dir.join(REPORT_TXT), &report)?;
    info!("validation summary:\n{}", report.trim_end());

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
