use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::panels::defs::builtin_immune_markers;

pub const GPROFILER_URL: &str = "https://biit.cs.ut.ee/gprofiler/api/gost/profile/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationMethod {
    Spearman,
    Pearson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitSelection {
    Significant,
    TopRanked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub url: String,
    pub organism: String,
    pub sources: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: GPROFILER_URL.to_string(),
            organism: "hsapiens".to_string(),
            sources: vec!["GO:BP".to_string(), "KEGG".to_string()],
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub min_samples: usize,
    pub min_pairs: usize,
    pub fdr_alpha: f64,
    pub method: CorrelationMethod,
    pub hit_selection: HitSelection,
    pub top_n: usize,
    pub global_top: usize,
    pub presence_top: usize,
    pub summary_top: usize,
    pub immune_markers: Vec<String>,
    pub sample_id_column: String,
    pub cancer_label_column: String,
    pub enrichment: EnrichmentConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl AnalysisConfig {
    pub fn default_v1() -> Self {
        Self {
            min_samples: 25,
            min_pairs: 5,
            fdr_alpha: 0.05,
            method: CorrelationMethod::Spearman,
            hit_selection: HitSelection::Significant,
            top_n: 100,
            global_top: 100,
            presence_top: 60,
            summary_top: 3,
            immune_markers: builtin_immune_markers()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sample_id_column: "ModelID".to_string(),
            cancer_label_column: "OncotreePrimaryDisease".to_string(),
            enrichment: EnrichmentConfig::default(),
        }
    }

    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AnalysisConfig = serde_json::from_str(&text).map_err(|e| {
            PipelineError::Configuration(format!("invalid config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.min_samples == 0 {
            return Err(PipelineError::Configuration(
                "min_samples must be at least 1".to_string(),
            ));
        }
        if self.min_pairs < 3 {
            return Err(PipelineError::Configuration(
                "min_pairs must be at least 3".to_string(),
            ));
        }
        if !(self.fdr_alpha > 0.0 && self.fdr_alpha <= 1.0) {
            return Err(PipelineError::Configuration(format!(
                "fdr_alpha must lie in (0, 1], got {}",
                self.fdr_alpha
            )));
        }
        if self.immune_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(PipelineError::Configuration(
                "immune_markers is empty".to_string(),
            ));
        }
        if self.top_n == 0 || self.global_top == 0 {
            return Err(PipelineError::Configuration(
                "top_n and global_top must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/thresholds.rs"]
mod tests;
