pub mod gprofiler;

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;

pub use gprofiler::GProfilerClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentTerm {
    pub term_id: String,
    pub source: String,
    pub name: String,
    pub p_value: f64,
    pub term_size: u64,
    pub intersection_size: u64,
    pub query_size: u64,
}

pub trait EnrichmentService {
    fn name(&self) -> &str;

    fn profile(&self, genes: &[String]) -> PipelineResult<Vec<EnrichmentTerm>>;
}
