mod cli;
mod enrich;
mod error;
mod input;
mod logging;
mod model;
mod panels;
mod pipeline;
mod report;
mod stats;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{AggregateOptions, Cli, Commands, InputArgs, ThresholdArgs};
use crate::enrich::{EnrichmentService, GProfilerClient};
use crate::error::PipelineResult;
use crate::input::Workspace;
use crate::model::hits::Direction;
use crate::model::thresholds::AnalysisConfig;
use crate::pipeline::stage1_load::LoadPaths;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> PipelineResult<()> {
    let ws = Workspace::new(&cli.workdir);
    let base = base_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Correlate(args) => {
            let config = resolve_config(base, Some(&args.thresholds), None)?;
            let out = args.out.unwrap_or_else(|| ws.correlate_dir());
            pipeline::correlate(&load_paths(&ws, &args.input), &out, &config)?;
        }
        Commands::Aggregate(args) => {
            let config = resolve_config(base, None, Some(&args.options))?;
            let results = args.results.unwrap_or_else(|| ws.correlate_dir());
            let out = args.out.unwrap_or_else(|| ws.aggregate_dir());
            let service = build_service(&config);
            pipeline::aggregate(&results, &out, &config, service_ref(&service))?;
        }
        Commands::Validate(args) => {
            let hits = args
                .hits
                .unwrap_or_else(|| default_hits_path(&ws.aggregate_dir()));
            let references = pipeline::default_references(
                args.compendium.unwrap_or_else(|| ws.compendium()),
                args.unfiltered.unwrap_or_else(|| ws.unfiltered()),
            );
            let out = args.out.unwrap_or_else(|| ws.validate_dir());
            pipeline::validate(&hits, &references, &out)?;
        }
        Commands::Run(args) => {
            let config = resolve_config(base, Some(&args.thresholds), Some(&args.options))?;
            let counts =
                pipeline::correlate(&load_paths(&ws, &args.input), &ws.correlate_dir(), &config)?;
            info!(
                "run: correlate finished ({} tested, {} skipped)",
                counts.n_tested, counts.n_skipped
            );
            let service = build_service(&config);
            pipeline::aggregate(
                &ws.correlate_dir(),
                &ws.aggregate_dir(),
                &config,
                service_ref(&service),
            )?;
            let references = pipeline::default_references(ws.compendium(), ws.unfiltered());
            pipeline::validate(
                &default_hits_path(&ws.aggregate_dir()),
                &references,
                &ws.validate_dir(),
            )?;
        }
    }
    Ok(())
}

fn base_config(path: Option<&Path>) -> PipelineResult<AnalysisConfig> {
    match path {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            AnalysisConfig::from_json_file(path)
        }
        None => Ok(AnalysisConfig::default_v1()),
    }
}

fn resolve_config(
    mut config: AnalysisConfig,
    thresholds: Option<&ThresholdArgs>,
    options: Option<&AggregateOptions>,
) -> PipelineResult<AnalysisConfig> {
    if let Some(t) = thresholds {
        t.apply(&mut config);
    }
    if let Some(o) = options {
        o.apply(&mut config);
    }
    config.validate()?;
    Ok(config)
}

fn load_paths(ws: &Workspace, input: &InputArgs) -> LoadPaths {
    LoadPaths {
        model: input.model.clone().unwrap_or_else(|| ws.model()),
        gene_effect: input.gene_effect.clone().unwrap_or_else(|| ws.gene_effect()),
        expression: input.expression.clone().unwrap_or_else(|| ws.expression()),
    }
}

fn default_hits_path(aggregate_dir: &Path) -> PathBuf {
    aggregate_dir.join(pipeline::global_top_file(Direction::Positive))
}

fn build_service(config: &AnalysisConfig) -> Option<GProfilerClient> {
    if !config.enrichment.enabled {
        info!("enrichment disabled");
        return None;
    }
    match GProfilerClient::new(&config.enrichment) {
        Ok(client) => Some(client),
        Err(err) => {
            warn!("enrichment unavailable, continuing without it: {}", err);
            None
        }
    }
}

fn service_ref(service: &Option<GProfilerClient>) -> Option<&dyn EnrichmentService> {
    service.as_ref().map(|s| s as &dyn EnrichmentService)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
