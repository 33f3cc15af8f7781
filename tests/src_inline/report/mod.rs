use std::fs;

use tempfile::TempDir;

use super::json::{ToolInfo, render_summary_json};
use super::tables::{write_gene_hits, write_recurrence, write_skipped, write_volcano};
use super::*;
use crate::input::results::{read_result_table, result_file_name};
use crate::model::hits::{Direction, GeneHit, SkippedGroup};
use crate::pipeline::stage4_aggregate::GeneRecurrence;

fn hits() -> Vec<GeneHit> {
    vec![
        GeneHit {
            cancer: "Head/Neck".to_string(),
            gene: "STAT1".to_string(),
            n: 31,
            coefficient: 0.612_345_678_9,
            p_value: 2.5e-7,
            adj_p_value: 1.1e-5,
            neg_log10_p: 6.602_059_991_3,
            direction: Direction::Positive,
        },
        GeneHit {
            cancer: "Head/Neck".to_string(),
            gene: "MYC".to_string(),
            n: 30,
            coefficient: -0.1,
            p_value: 0.6,
            adj_p_value: 0.8,
            neg_log10_p: 0.221_848_749_6,
            direction: Direction::Neutral,
        },
    ]
}

#[test]
fn test_format_f64_6() {
    assert_eq!(format_f64_6(0.5), "0.500000");
    assert_eq!(format_f64_6(1.0 / 3.0), "0.333333");
}

#[test]
fn test_gene_hits_read_back_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(result_file_name("Head/Neck"));
    write_gene_hits(&path, &hits()).unwrap();

    let table = read_result_table(&path).unwrap();
    assert_eq!(table.cancer, "Head/Neck");
    assert_eq!(table.hits, hits());
}

#[test]
fn test_writes_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Volcano_Head_Neck.csv");
    write_volcano(&path, &hits()).unwrap();
    let first = fs::read(&path).unwrap();
    write_volcano(&path, &hits()).unwrap();
    assert_eq!(first, fs::read(&path).unwrap());

    let text = String::from_utf8(first).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("gene,coefficient,neg_log10_p,adj_p_value,direction"));
    assert!(lines.next().unwrap().starts_with("MYC,"));
}

#[test]
fn test_empty_tables_keep_header() {
    let dir = TempDir::new().unwrap();
    let skipped = dir.path().join("Skipped_Cancers.csv");
    write_skipped(&skipped, &[] as &[SkippedGroup]).unwrap();
    assert_eq!(fs::read_to_string(&skipped).unwrap(), "cancer,n_samples,reason\n");

    let top = dir.path().join("Global_Top_Positive_Genes.csv");
    write_recurrence(&top, &[] as &[GeneRecurrence]).unwrap();
    assert_eq!(fs::read_to_string(&top).unwrap(), "Gene,Count\n");
}

#[test]
fn test_remove_stale_only_matching_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("CRISPR_TME_Old_Results.csv"), "x").unwrap();
    fs::write(dir.path().join("Cancerwise_Summary.csv"), "x").unwrap();
    let removed = remove_stale(dir.path(), "CRISPR_TME_", "_Results.csv").unwrap();
    assert_eq!(removed, 1);
    assert!(dir.path().join("Cancerwise_Summary.csv").exists());
    assert_eq!(remove_stale(&dir.path().join("missing"), "a", "b").unwrap(), 0);
}

#[test]
fn test_summary_json_carries_tool_info() {
    let text = render_summary_json(&ToolInfo::current()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["name"], TOOL_NAME);
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}
