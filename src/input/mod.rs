use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod meta;
pub mod reference;
pub mod results;
pub mod table;

pub const MODEL_FILE: &str = "Model.csv";
pub const GENE_EFFECT_FILE: &str = "CRISPRGeneEffect.csv";
pub const EXPRESSION_FILE: &str = "OmicsExpressionTPMLogp1HumanProteinCodingGenes.csv";
pub const COMPENDIUM_FILE: &str = "Compendium_Cancer_Genes.tsv";
pub const UNFILTERED_FILE: &str = "Unfiltered_drivers.tsv";

pub const CORRELATE_DIR: &str = "Cancer_Specific_Results";
pub const AGGREGATE_DIR: &str = "Enrichment_and_Overlap_Results";
pub const VALIDATE_DIR: &str = "Validation_Results";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn model(&self) -> PathBuf {
        self.root.join(MODEL_FILE)
    }

    pub fn gene_effect(&self) -> PathBuf {
        self.root.join(GENE_EFFECT_FILE)
    }

    pub fn expression(&self) -> PathBuf {
        self.root.join(EXPRESSION_FILE)
    }

    pub fn compendium(&self) -> PathBuf {
        self.root.join(COMPENDIUM_FILE)
    }

    pub fn unfiltered(&self) -> PathBuf {
        self.root.join(UNFILTERED_FILE)
    }

    pub fn correlate_dir(&self) -> PathBuf {
        self.root.join(CORRELATE_DIR)
    }

    pub fn aggregate_dir(&self) -> PathBuf {
        self.root.join(AGGREGATE_DIR)
    }

    pub fn validate_dir(&self) -> PathBuf {
        self.root.join(VALIDATE_DIR)
    }
}

pub fn require_file(path: &Path) -> Result<(), InputError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(InputError::MissingInput(format!(
            "required file {} not found",
            path.display()
        )))
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    require_file(path)?;
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn delimiter_for(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".txt") {
        b'\t'
    } else {
        b','
    }
}

pub fn csv_reader(path: &Path) -> Result<csv::Reader<Box<dyn Read>>, InputError> {
    let reader = open_maybe_gz(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
