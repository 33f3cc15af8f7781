use tempfile::TempDir;

use super::*;

#[test]
fn test_default_v1_values() {
    let c = AnalysisConfig::default_v1();
    assert_eq!(c.min_samples, 25);
    assert_eq!(c.min_pairs, 5);
    assert_eq!(c.fdr_alpha, 0.05);
    assert_eq!(c.method, CorrelationMethod::Spearman);
    assert_eq!(c.hit_selection, HitSelection::Significant);
    assert_eq!(c.global_top, 100);
    assert_eq!(c.presence_top, 60);
    assert_eq!(c.immune_markers.len(), 10);
    assert_eq!(c.enrichment.url, GPROFILER_URL);
    assert!(c.validate().is_ok());
}

#[test]
fn test_json_partial_override_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"min_samples": 10, "method": "pearson", "hit_selection": "top-ranked",
            "enrichment": {"enabled": false}}"#,
    )
    .unwrap();
    let c = AnalysisConfig::from_json_file(&path).unwrap();
    assert_eq!(c.min_samples, 10);
    assert_eq!(c.method, CorrelationMethod::Pearson);
    assert_eq!(c.hit_selection, HitSelection::TopRanked);
    assert!(!c.enrichment.enabled);
    assert_eq!(c.enrichment.organism, "hsapiens");
    assert_eq!(c.fdr_alpha, 0.05);
}

#[test]
fn test_json_unknown_field_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"min_sample": 10}"#).unwrap();
    let err = AnalysisConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn test_missing_config_file() {
    let err = AnalysisConfig::from_json_file(Path::new("/nonexistent/config.json")).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut c = AnalysisConfig::default_v1();
    c.fdr_alpha = 1.5;
    assert!(c.validate().is_err());

    let mut c = AnalysisConfig::default_v1();
    c.min_samples = 0;
    assert!(c.validate().is_err());

    let mut c = AnalysisConfig::default_v1();
    c.min_pairs = 2;
    assert!(c.validate().is_err());

    let mut c = AnalysisConfig::default_v1();
    c.immune_markers = vec![" ".to_string()];
    assert!(c.validate().is_err());
}
