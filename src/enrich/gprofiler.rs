use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrich::{EnrichmentService, EnrichmentTerm};
use crate::error::{PipelineError, PipelineResult};
use crate::model::thresholds::EnrichmentConfig;

pub struct GProfilerClient {
    client: Client,
    url: String,
    organism: String,
    sources: Vec<String>,
}

#[derive(Serialize)]
struct ProfileRequest<'a> {
    organism: &'a str,
    query: &'a [String],
    sources: &'a [String],
}

#[derive(Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    result: Vec<ProfileTerm>,
}

#[derive(Deserialize)]
struct ProfileTerm {
    #[serde(default)]
    native: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    name: String,
    p_value: f64,
    #[serde(default)]
    term_size: u64,
    #[serde(default)]
    intersection_size: u64,
    #[serde(default)]
    query_size: u64,
}

impl GProfilerClient {
    pub fn new(config: &EnrichmentConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::EnrichmentService(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            organism: config.organism.clone(),
            sources: config.sources.clone(),
        })
    }
}

impl EnrichmentService for GProfilerClient {
    fn name(&self) -> &str {
        "g:Profiler"
    }

    fn profile(&self, genes: &[String]) -> PipelineResult<Vec<EnrichmentTerm>> {
        debug!("g:Profiler query with {} genes", genes.len());
        let resp = self
            .client
            .post(&self.url)
            .json(&ProfileRequest {
                organism: &self.organism,
                query: genes,
                sources: &self.sources,
            })
            .send()
            .map_err(|e| PipelineError::EnrichmentService(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(PipelineError::EnrichmentService(format!(
                "g:Profiler returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ProfileResponse = resp
            .json()
            .map_err(|e| PipelineError::EnrichmentService(e.to_string()))?;

        let mut terms: Vec<EnrichmentTerm> = parsed
            .result
            .into_iter()
            .map(|t| EnrichmentTerm {
                term_id: t.native,
                source: t.source,
                name: t.name,
                p_value: t.p_value,
                term_size: t.term_size,
                intersection_size: t.intersection_size,
                query_size: t.query_size,
            })
            .collect();
        terms.sort_by(|a, b| {
            a.p_value
                .total_cmp(&b.p_value)
                .then_with(|| a.term_id.cmp(&b.term_id))
        });
        Ok(terms)
    }
}
