use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::input::table::NumericTable;
use crate::panels::{Panel, PanelAudit};
use crate::stats::mean_finite;

#[derive(Debug, Clone, PartialEq)]
pub struct ImmuneSignature {
    pub genes: Vec<String>,
    pub audit: PanelAudit,
    pub scores: Vec<f64>,
}

pub fn run_stage2(
    expression: &NumericTable,
    markers: &[String],
) -> PipelineResult<ImmuneSignature> {
    let panel = Panel::resolve(markers, &expression.columns);
    if panel.genes.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "none of the immune markers ({}) are present in the expression table",
            markers.join(", ")
        )));
    }
    if !panel.missing.is_empty() {
        warn!(
            "immune markers missing from expression: {}",
            panel.missing.join(", ")
        );
    }
    info!(
        "immune signature from {} markers: {}",
        panel.genes.len(),
        panel.symbols.join(", ")
    );

    let scores = score_samples(expression, &panel);
    Ok(ImmuneSignature {
        genes: panel.symbols.clone(),
        audit: panel.audit(),
        scores,
    })
}

pub fn score_samples(expression: &NumericTable, panel: &Panel) -> Vec<f64> {
    let mut scores = Vec::with_capacity(expression.n_rows());
    let mut buf = Vec::with_capacity(panel.genes.len());
    for row in 0..expression.n_rows() {
        buf.clear();
        let values = expression.row(row);
        for &g in &panel.genes {
            buf.push(values[g]);
        }
        scores.push(mean_finite(&buf));
    }
    scores
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_signature.rs"]
mod tests;
