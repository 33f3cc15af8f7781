use super::*;

use crate::model::thresholds::{CorrelationMethod, HitSelection};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_parse_correlate_defaults() {
    let cli = parse(&["kira-immunodep", "correlate"]);
    assert_eq!(cli.workdir, PathBuf::from("."));
    assert!(cli.config.is_none());
    assert!(!cli.verbose);
    match cli.command {
        Commands::Correlate(args) => {
            assert!(args.out.is_none());
            assert!(args.input.model.is_none());
            assert!(args.thresholds.min_samples.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_global_options_after_subcommand() {
    let cli = parse(&[
        "kira-immunodep",
        "run",
        "--workdir",
        "/data/depmap",
        "--config",
        "cfg.json",
        "-v",
    ]);
    assert_eq!(cli.workdir, PathBuf::from("/data/depmap"));
    assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Run(_)));
}

#[test]
fn test_parse_threshold_flags() {
    let cli = parse(&[
        "kira-immunodep",
        "correlate",
        "--min-samples",
        "10",
        "--fdr-alpha",
        "0.1",
        "--method",
        "pearson",
        "--markers",
        "CD274,STAT1",
    ]);
    let Commands::Correlate(args) = cli.command else {
        panic!("expected correlate");
    };
    let config =
        resolve_config(AnalysisConfig::default_v1(), Some(&args.thresholds), None).unwrap();
    assert_eq!(config.min_samples, 10);
    assert_eq!(config.fdr_alpha, 0.1);
    assert_eq!(config.method, CorrelationMethod::Pearson);
    assert_eq!(config.immune_markers, vec!["CD274", "STAT1"]);
}

#[test]
fn test_parse_aggregate_options() {
    let cli = parse(&[
        "kira-immunodep",
        "aggregate",
        "--hit-selection",
        "top-ranked",
        "--top-n",
        "50",
        "--no-enrichment",
    ]);
    let Commands::Aggregate(args) = cli.command else {
        panic!("expected aggregate");
    };
    let config = resolve_config(AnalysisConfig::default_v1(), None, Some(&args.options)).unwrap();
    assert_eq!(config.hit_selection, HitSelection::TopRanked);
    assert_eq!(config.top_n, 50);
    assert!(!config.enrichment.enabled);
    assert!(build_service(&config).is_none());
}

#[test]
fn test_parse_rejects_unknown_method() {
    let res = Cli::try_parse_from(["kira-immunodep", "correlate", "--method", "kendall"]);
    assert!(res.is_err());
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["kira-immunodep"]).is_err());
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"min_samples": 40, "fdr_alpha": 0.01}"#).unwrap();

    let base = base_config(Some(&path)).unwrap();
    assert_eq!(base.min_samples, 40);

    let thresholds = ThresholdArgs {
        min_samples: Some(12),
        ..Default::default()
    };
    let config = resolve_config(base, Some(&thresholds), None).unwrap();
    assert_eq!(config.min_samples, 12);
    assert_eq!(config.fdr_alpha, 0.01);
}

#[test]
fn test_resolve_config_rejects_invalid_override() {
    let thresholds = ThresholdArgs {
        fdr_alpha: Some(0.0),
        ..Default::default()
    };
    let err = resolve_config(AnalysisConfig::default_v1(), Some(&thresholds), None).unwrap_err();
    assert!(matches!(err, crate::error::PipelineError::Configuration(_)));
}

#[test]
fn test_default_paths_follow_workspace() {
    let ws = Workspace::new("/w");
    let paths = load_paths(&ws, &InputArgs::default());
    assert_eq!(paths.model, PathBuf::from("/w/Model.csv"));
    assert_eq!(paths.gene_effect, PathBuf::from("/w/CRISPRGeneEffect.csv"));
    assert_eq!(
        default_hits_path(&ws.aggregate_dir()),
        PathBuf::from("/w/Enrichment_and_Overlap_Results/Global_Top_Positive_Genes.csv")
    );
}
