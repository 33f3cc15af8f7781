use std::path::Path;

use serde::Serialize;

use crate::error::PipelineResult;
use crate::model::hits::{CancerSummary, SkippedGroup};
use crate::model::thresholds::AnalysisConfig;
use crate::model::validation::ReferenceMatch;
use crate::panels::PanelAudit;
use crate::pipeline::stage1_load::LoadAudit;
use crate::pipeline::stage4_aggregate::{DirectionAggregate, Stage4Output};
use crate::report::TOOL_NAME;

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: TOOL_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelateSummary<'a> {
    pub tool: ToolInfo,
    pub stage: &'static str,
    pub config: &'a AnalysisConfig,
    pub input: &'a LoadAudit,
    pub signature: &'a PanelAudit,
    pub signature_genes: &'a [String],
    pub n_cancers_tested: usize,
    pub n_cancers_skipped: usize,
    pub cancers: &'a [CancerSummary],
    pub skipped: &'a [SkippedGroup],
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionSummary {
    pub direction: &'static str,
    pub n_genes: usize,
    pub n_recurrent: usize,
    pub top_genes: Vec<String>,
    pub set_sizes: Vec<(String, usize)>,
}

impl DirectionSummary {
    pub fn from_aggregate(aggregate: &DirectionAggregate, top: usize) -> Self {
        Self {
            direction: aggregate.direction.as_str(),
            n_genes: aggregate.recurrence.len(),
            n_recurrent: aggregate.recurrence.iter().filter(|r| r.count > 1).count(),
            top_genes: aggregate.top(top).iter().map(|r| r.gene.clone()).collect(),
            set_sizes: aggregate
                .sets
                .iter()
                .map(|(cancer, genes)| (cancer.clone(), genes.len()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentFailure {
    pub cancer: String,
    pub direction: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentSummary {
    pub service: Option<String>,
    pub attempted: usize,
    pub failed: usize,
    pub failures: Vec<EnrichmentFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateSummary<'a> {
    pub tool: ToolInfo,
    pub stage: &'static str,
    pub config: &'a AnalysisConfig,
    pub cancers: &'a [String],
    pub positive: DirectionSummary,
    pub negative: DirectionSummary,
    pub enrichment: EnrichmentSummary,
}

impl<'a> AggregateSummary<'a> {
    pub fn build(
        config: &'a AnalysisConfig,
        out: &'a Stage4Output,
        service: Option<&str>,
        top: usize,
    ) -> Self {
        let failures = out
            .enrichment
            .iter()
            .filter_map(|o| {
                o.result.as_ref().err().map(|e| EnrichmentFailure {
                    cancer: o.cancer.clone(),
                    direction: o.direction.as_str(),
                    error: e.clone(),
                })
            })
            .collect::<Vec<_>>();
        Self {
            tool: ToolInfo::current(),
            stage: "aggregate",
            config,
            cancers: &out.cancers,
            positive: DirectionSummary::from_aggregate(&out.positive, top),
            negative: DirectionSummary::from_aggregate(&out.negative, top),
            enrichment: EnrichmentSummary {
                service: service.map(|s| s.to_string()),
                attempted: out.enrichment.len(),
                failed: failures.len(),
                failures,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSummary<'a> {
    pub reference: &'a str,
    pub checked: usize,
    pub n_matched: usize,
    pub n_unmatched: usize,
    pub matched: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateSummary<'a> {
    pub tool: ToolInfo,
    pub stage: &'static str,
    pub hits_file: String,
    pub n_hits: usize,
    pub n_matched_any: usize,
    pub references: Vec<ReferenceSummary<'a>>,
}

impl<'a> ValidateSummary<'a> {
    pub fn build(
        hits_file: &Path,
        n_hits: usize,
        n_matched_any: usize,
        matches: &'a [ReferenceMatch],
    ) -> Self {
        Self {
            tool: ToolInfo::current(),
            stage: "validate",
            hits_file: hits_file.display().to_string(),
            n_hits,
            n_matched_any,
            references: matches
                .iter()
                .map(|m| ReferenceSummary {
                    reference: &m.reference,
                    checked: m.checked,
                    n_matched: m.n_matched(),
                    n_unmatched: m.n_unmatched(),
                    matched: &m.matched,
                })
                .collect(),
        }
    }
}

pub fn render_summary_json<T: Serialize>(summary: &T) -> PipelineResult<String> {
    let mut text = serde_json::to_string_pretty(summary)?;
    text.push('\n');
    Ok(text)
}

pub fn write_summary_json<T: Serialize>(path: &Path, summary: &T) -> PipelineResult<()> {
    let text = render_summary_json(summary)?;
    crate::report::write_text(path, &text)?;
    Ok(())
}
