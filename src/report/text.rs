use crate::model::hits::{CancerSummary, SkippedGroup};
use crate::model::overlap::OverlapMatrix;
use crate::model::thresholds::AnalysisConfig;
use crate::pipeline::stage4_aggregate::{DirectionAggregate, Stage4Output};
use crate::pipeline::stage5_validate::Stage5Output;
use crate::report::format_f64_6;

pub struct CorrelateReport<'a> {
    pub config: &'a AnalysisConfig,
    pub n_samples: usize,
    pub signature_genes: &'a [String],
    pub missing_markers: &'a [String],
    pub summaries: &'a [CancerSummary],
    pub skipped: &'a [SkippedGroup],
}

pub fn render_correlate_report(ctx: &CorrelateReport<'_>) -> String {
    let mut out = String::new();

    out.push_str("Gene Effect vs Immune Signature Report\n");
    out.push_str("======================================\n\n");

    out.push_str("1. Inputs\n");
    out.push_str(&format!("Aligned samples: {}\n", ctx.n_samples));
    out.push_str(&format!(
        "Signature genes: {}\n",
        ctx.signature_genes.join(", ")
    ));
    if !ctx.missing_markers.is_empty() {
        out.push_str(&format!(
            "Missing markers: {}\n",
            ctx.missing_markers.join(", ")
        ));
    }
    out.push_str(&format!(
        "Method: {:?}, FDR alpha: {}, min samples: {}\n\n",
        ctx.config.method, ctx.config.fdr_alpha, ctx.config.min_samples
    ));

    out.push_str("2. Cancer types\n");
    for s in ctx.summaries {
        out.push_str(&format!(
            "{}: n={} tested={} untested={} positive={} negative={}\n",
            s.cancer, s.n_samples, s.n_tested, s.n_untested, s.n_positive, s.n_negative
        ));
        if !s.top_positive.is_empty() {
            out.push_str(&format!("  top positive: {}\n", s.top_positive));
        }
        if !s.top_negative.is_empty() {
            out.push_str(&format!("  top negative: {}\n", s.top_negative));
        }
    }
    out.push('\n');

    out.push_str("3. Skipped\n");
    if ctx.skipped.is_empty() {
        out.push_str("None\n");
    }
    for s in ctx.skipped {
        out.push_str(&format!("{} (n={}): {}\n", s.cancer, s.n_samples, s.reason));
    }

    out
}

pub fn render_aggregate_report(out4: &Stage4Output, top: usize) -> String {
    let mut out = String::new();

    out.push_str("Cross-Cancer Overlap Report\n");
    out.push_str("===========================\n\n");
    out.push_str(&format!("Cancer types: {}\n\n", out4.cancers.len()));

    for (idx, aggregate) in [&out4.positive, &out4.negative].into_iter().enumerate() {
        out.push_str(&format!("{}. {} hits\n", idx + 1, aggregate.direction.label()));
        push_direction(&mut out, aggregate, top);
        out.push('\n');
    }

    out.push_str("3. Enrichment\n");
    if out4.enrichment.is_empty() {
        out.push_str("Not run\n");
    } else {
        out.push_str(&format!(
            "Gene sets profiled: {}, failed: {}\n",
            out4.enrichment.len(),
            out4.enrichment_failures()
        ));
    }

    out
}

fn push_direction(out: &mut String, aggregate: &DirectionAggregate, top: usize) {
    let non_empty = aggregate.sets.values().filter(|s| !s.is_empty()).count();
    out.push_str(&format!(
        "Cancer types with hits: {} of {}\n",
        non_empty,
        aggregate.sets.len()
    ));
    out.push_str(&format!(
        "Mean pairwise Jaccard: {}\n",
        format_f64_6(mean_off_diagonal(&aggregate.jaccard))
    ));
    out.push_str(&format!(
        "{}\n",
        overlap_statement(mean_off_diagonal(&aggregate.jaccard))
    ));
    let genes: Vec<String> = aggregate
        .top(top)
        .iter()
        .map(|r| format!("{} ({})", r.gene, r.count))
        .collect();
    if !genes.is_empty() {
        out.push_str(&format!("Most recurrent: {}\n", genes.join(", ")));
    }
}

fn mean_off_diagonal(matrix: &OverlapMatrix<f64>) -> f64 {
    let n = matrix.size();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += matrix.get(i, j);
            }
        }
    }
    sum / (n * (n - 1)) as f64
}

fn overlap_statement(mean_jaccard: f64) -> &'static str {
    if mean_jaccard >= 0.30 {
        "Hit sets are largely shared across cancer types."
    } else if mean_jaccard >= 0.10 {
        "Hit sets partially overlap across cancer types."
    } else {
        "Hit sets are mostly cancer-type specific."
    }
}

pub fn render_validation_report(out5: &Stage5Output) -> String {
    let mut out = String::new();

    out.push_str("VALIDATION SUMMARY\n");
    out.push_str("==================\n\n");
    out.push_str(&format!("Hits checked: {}\n", out5.genes.len()));
    out.push_str(&format!(
        "Matched in any reference: {}\n\n",
        out5.records.iter().filter(|r| r.matched_any()).count()
    ));

    for m in &out5.references {
        out.push_str(&format!(
            "{}: {} matched, {} unmatched\n",
            m.reference,
            m.n_matched(),
            m.n_unmatched()
        ));
        if !m.matched.is_empty() {
            out.push_str(&format!("  {}\n", m.matched.join(", ")));
        }
    }

    out
}
