use std::fmt::Write as _;
use std::fs;

use tempfile::TempDir;

use super::*;
use crate::input::Workspace;

/// Two cancer types of 12 samples; POS1 tracks STAT1 in both, POS2 only in the first.
fn write_inputs(ws: &Workspace) {
    write_labelled_inputs(ws, "Glioma", "Skin Cancer");
}

fn write_labelled_inputs(ws: &Workspace, first: &str, second: &str) {
    let mut model = String::from("ModelID,OncotreePrimaryDisease\n");
    let mut effect = String::from(",POS1 (1),POS2 (2),NEG1 (3),FLAT (4)\n");
    let mut expr = String::from(",STAT1 (6772),MYC (4609)\n");
    for i in 0..24usize {
        let id = format!("ACH-{:03}", i);
        let cancer = if i < 12 { first } else { second };
        let k = (i % 12) as f64;
        let pos2 = if i < 12 { k } else { ((i * 5) % 7) as f64 };
        writeln!(model, "{},{}", id, cancer).unwrap();
        writeln!(effect, "{},{},{},{},0.1", id, k * 0.2, pos2, -k).unwrap();
        writeln!(expr, "{},{},{}", id, k, 1.0).unwrap();
    }
    fs::write(ws.model(), model).unwrap();
    fs::write(ws.gene_effect(), effect).unwrap();
    fs::write(ws.expression(), expr).unwrap();
    fs::write(ws.compendium(), "SYMBOL\tROLE\nPOS1\tTSG\nTP53\tTSG\n").unwrap();
    fs::write(ws.unfiltered(), "SYMBOL\nPOS2\n").unwrap();
}

fn config() -> AnalysisConfig {
    let mut c = AnalysisConfig::default_v1();
    c.min_samples = 10;
    c.enrichment.enabled = false;
    c
}

fn paths(ws: &Workspace) -> LoadPaths {
    LoadPaths {
        model: ws.model(),
        gene_effect: ws.gene_effect(),
        expression: ws.expression(),
    }
}

#[test]
fn test_file_names() {
    assert_eq!(volcano_file_name("Skin Cancer"), "Volcano_Skin_Cancer.csv");
    assert_eq!(
        enrichment_file_name(Direction::Negative, "Head/Neck"),
        "Enrichment_Negative_Head_Neck.csv"
    );
    assert_eq!(global_top_file(Direction::Positive), "Global_Top_Positive_Genes.csv");
}

#[test]
fn test_three_stages_end_to_end() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    write_inputs(&ws);
    let config = config();

    let counts = correlate(&paths(&ws), &ws.correlate_dir(), &config).unwrap();
    assert_eq!(counts, CorrelateCounts { n_tested: 2, n_skipped: 0 });
    let results = ws.correlate_dir();
    assert!(results.join("CRISPR_TME_Glioma_Results.csv").is_file());
    assert!(results.join("CRISPR_TME_Skin_Cancer_Results.csv").is_file());
    assert!(results.join("Volcano_Skin_Cancer.csv").is_file());
    let cancerwise = fs::read_to_string(results.join(CANCERWISE_SUMMARY)).unwrap();
    let mut lines = cancerwise.lines();
    assert!(lines.next().unwrap().starts_with("cancer,n_samples,n_tested,n_untested,"));
    assert!(lines.next().unwrap().starts_with("Glioma,12,3,1,"));
    assert!(results.join(SKIPPED_CANCERS).is_file());
    assert!(results.join(SUMMARY_JSON).is_file());

    let agg = aggregate(&results, &ws.aggregate_dir(), &config, None).unwrap();
    assert_eq!(agg.cancers, vec!["Glioma", "Skin Cancer"]);
    assert_eq!(agg.positive.recurrence[0].gene, "POS1");
    assert_eq!(agg.positive.recurrence[0].count, 2);
    assert_eq!(agg.positive.jaccard.get_by_label("Glioma", "Skin Cancer"), Some(0.5));
    for name in [
        "Jaccard_Positive_Matrix.csv",
        "Jaccard_Negative_Matrix.csv",
        "Overlap_Count_Positive.csv",
        "Global_Top_Negative_Genes.csv",
        "Gene_Cancer_Map_Positive.csv",
        "Presence_Absence_Positive.csv",
        SUMMARY_JSON,
    ] {
        assert!(ws.aggregate_dir().join(name).is_file(), "{}", name);
    }

    let refs = default_references(ws.compendium(), ws.unfiltered());
    let hits = ws.aggregate_dir().join(global_top_file(Direction::Positive));
    let val = validate(&hits, &refs, &ws.validate_dir()).unwrap();
    assert_eq!(val.genes, vec!["POS1", "POS2"]);
    assert_eq!(val.references[0].matched, vec!["POS1"]);
    assert_eq!(val.references[1].matched, vec!["POS2"]);
    assert!(ws.validate_dir().join("Matched_in_Compendium.csv").is_file());
    assert!(ws.validate_dir().join(VALIDATION_SUMMARY).is_file());
}

#[test]
fn test_labels_with_same_file_name_are_both_aggregated() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    write_labelled_inputs(&ws, "Head/Neck", "Head Neck");
    let config = config();

    let counts = correlate(&paths(&ws), &ws.correlate_dir(), &config).unwrap();
    assert_eq!(counts, CorrelateCounts { n_tested: 2, n_skipped: 0 });
    let results = ws.correlate_dir();
    assert!(results.join("CRISPR_TME_Head_Neck_Results.csv").is_file());
    assert!(results.join("CRISPR_TME_Head_Neck_2_Results.csv").is_file());
    assert!(results.join("Volcano_Head_Neck_2.csv").is_file());

    let agg = aggregate(&results, &ws.aggregate_dir(), &config, None).unwrap();
    assert_eq!(agg.cancers, vec!["Head Neck", "Head/Neck"]);
    assert_eq!(agg.positive.recurrence[0].gene, "POS1");
    assert_eq!(agg.positive.recurrence[0].count, 2);
}

#[test]
fn test_rerun_produces_identical_tables() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    write_inputs(&ws);
    let config = config();

    correlate(&paths(&ws), &ws.correlate_dir(), &config).unwrap();
    aggregate(&ws.correlate_dir(), &ws.aggregate_dir(), &config, None).unwrap();
    let first_hits = fs::read(ws.correlate_dir().join("CRISPR_TME_Glioma_Results.csv")).unwrap();
    let first_jaccard = fs::read(ws.aggregate_dir().join("Jaccard_Positive_Matrix.csv")).unwrap();

    correlate(&paths(&ws), &ws.correlate_dir(), &config).unwrap();
    aggregate(&ws.correlate_dir(), &ws.aggregate_dir(), &config, None).unwrap();
    assert_eq!(
        first_hits,
        fs::read(ws.correlate_dir().join("CRISPR_TME_Glioma_Results.csv")).unwrap()
    );
    assert_eq!(
        first_jaccard,
        fs::read(ws.aggregate_dir().join("Jaccard_Positive_Matrix.csv")).unwrap()
    );
}

#[test]
fn test_small_groups_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    write_inputs(&ws);
    let mut config = config();
    config.min_samples = 13;

    let counts = correlate(&paths(&ws), &ws.correlate_dir(), &config).unwrap();
    assert_eq!(counts, CorrelateCounts { n_tested: 0, n_skipped: 2 });
    let skipped = fs::read_to_string(ws.correlate_dir().join(SKIPPED_CANCERS)).unwrap();
    assert_eq!(skipped.lines().count(), 3);

    let err = aggregate(&ws.correlate_dir(), &ws.aggregate_dir(), &config, None).unwrap_err();
    assert!(matches!(err, crate::error::PipelineError::MissingData(_)));
}

#[test]
fn test_validate_without_aggregate_output() {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    write_inputs(&ws);
    let refs = default_references(ws.compendium(), ws.unfiltered());
    let hits = ws.aggregate_dir().join(global_top_file(Direction::Positive));
    let err = validate(&hits, &refs, &ws.validate_dir()).unwrap_err();
    assert!(matches!(err, crate::error::PipelineError::MissingData(_)));
}
