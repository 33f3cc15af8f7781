use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::thresholds::{AnalysisConfig, CorrelationMethod, HitSelection};

#[derive(Debug, Parser)]
#[command(
    name = "kira-immunodep",
    version,
    about = "Correlate CRISPR gene effects with an immune signature across cancer types"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Working directory holding the inputs and stage output directories"
    )]
    pub workdir: PathBuf,

    #[arg(long, global = true, help = "JSON file overriding the default analysis settings")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Per-cancer correlation of gene effect with the immune signature.
    Correlate(CorrelateArgs),
    /// Cross-cancer overlap, recurrence and enrichment of the hit lists.
    Aggregate(AggregateArgs),
    /// Match the global hit list against curated driver lists.
    Validate(ValidateArgs),
    /// All three stages in order.
    Run(RunArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    #[arg(long, help = "Sample metadata table (default <workdir>/Model.csv)")]
    pub model: Option<PathBuf>,

    #[arg(long, help = "Gene-effect matrix (default <workdir>/CRISPRGeneEffect.csv)")]
    pub gene_effect: Option<PathBuf>,

    #[arg(
        long,
        help = "Expression matrix (default <workdir>/OmicsExpressionTPMLogp1HumanProteinCodingGenes.csv)"
    )]
    pub expression: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ThresholdArgs {
    #[arg(long, help = "Minimum samples per cancer type")]
    pub min_samples: Option<usize>,

    #[arg(long, help = "Adjusted p-value cutoff for hits")]
    pub fdr_alpha: Option<f64>,

    #[arg(long, help = "Minimum complete pairs for a gene to be tested")]
    pub min_pairs: Option<usize>,

    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    #[arg(long, value_delimiter = ',', help = "Comma-separated immune marker genes")]
    pub markers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct AggregateOptions {
    #[arg(long, help = "Genes per cancer type under --hit-selection top-ranked")]
    pub top_n: Option<usize>,

    #[arg(long, help = "Rows in the global top-gene lists")]
    pub global_top: Option<usize>,

    #[arg(long, value_enum)]
    pub hit_selection: Option<SelectionArg>,

    #[arg(long, default_value_t = false, help = "Skip the g:Profiler enrichment step")]
    pub no_enrichment: bool,

    #[arg(long, help = "Alternative g:Profiler profile endpoint")]
    pub enrichment_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[arg(long, help = "Output directory (default <workdir>/Cancer_Specific_Results)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[arg(long, help = "Per-cancer result directory (default <workdir>/Cancer_Specific_Results)")]
    pub results: Option<PathBuf>,

    #[command(flatten)]
    pub options: AggregateOptions,

    #[arg(long, help = "Output directory (default <workdir>/Enrichment_and_Overlap_Results)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(
        long,
        help = "Global hit list (default <workdir>/Enrichment_and_Overlap_Results/Global_Top_Positive_Genes.csv)"
    )]
    pub hits: Option<PathBuf>,

    #[arg(long, help = "Curated compendium list (default <workdir>/Compendium_Cancer_Genes.tsv)")]
    pub compendium: Option<PathBuf>,

    #[arg(long, help = "Unfiltered driver list (default <workdir>/Unfiltered_drivers.tsv)")]
    pub unfiltered: Option<PathBuf>,

    #[arg(long, help = "Output directory (default <workdir>/Validation_Results)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[command(flatten)]
    pub options: AggregateOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Spearman,
    Pearson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionArg {
    Significant,
    TopRanked,
}

impl From<MethodArg> for CorrelationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Spearman => CorrelationMethod::Spearman,
            MethodArg::Pearson => CorrelationMethod::Pearson,
        }
    }
}

impl From<SelectionArg> for HitSelection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Significant => HitSelection::Significant,
            SelectionArg::TopRanked => HitSelection::TopRanked,
        }
    }
}

impl ThresholdArgs {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(v) = self.min_samples {
            config.min_samples = v;
        }
        if let Some(v) = self.fdr_alpha {
            config.fdr_alpha = v;
        }
        if let Some(v) = self.min_pairs {
            config.min_pairs = v;
        }
        if let Some(v) = self.method {
            config.method = v.into();
        }
        if let Some(markers) = &self.markers {
            config.immune_markers = markers.clone();
        }
    }
}

impl AggregateOptions {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        if let Some(v) = self.global_top {
            config.global_top = v;
        }
        if let Some(v) = self.hit_selection {
            config.hit_selection = v.into();
        }
        if self.no_enrichment {
            config.enrichment.enabled = false;
        }
        if let Some(url) = &self.enrichment_url {
            config.enrichment.url = url.clone();
        }
    }
}
