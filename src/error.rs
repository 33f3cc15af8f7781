use thiserror::Error;

use crate::input::InputError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing data: {0}")]
    MissingData(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("insufficient samples for {cancer}: {n_samples} < {min_samples}")]
    InsufficientSamples {
        cancer: String,
        n_samples: usize,
        min_samples: usize,
    },

    #[error("enrichment service error: {0}")]
    EnrichmentService(String),

    #[error("validation input error: {0}")]
    ValidationInput(String),

    #[error(transparent)]
    Input(InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<InputError> for PipelineError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::MissingInput(msg) => PipelineError::MissingData(msg),
            other => PipelineError::Input(other),
        }
    }
}

impl PipelineError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::InsufficientSamples { .. } | PipelineError::EnrichmentService(_)
        )
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
